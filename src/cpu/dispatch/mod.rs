/*!
dispatch - Orchestrator for a single fetch / decode / execute step

Overview
========
Coordinates a single instruction step:
1. Stops if the CPU is halted.
2. Fetches the opcode byte at PC; `0x00` halts with PC unchanged. A PC
   outside memory is an addressing fault like any other bad access.
3. Classifies the byte by high nibble (`isa::OpClass`) and resolves it
   through the canonical opcode table. Unmapped bytes are decode faults.
4. Fetches the class-width instruction bytes (bounds-checked) and decodes
   the operand fields.
5. Advances PC by the instruction width, then hands the instruction to its
   class family handler. Branches overwrite PC afterwards.

Family Handlers
===============
- zero_operand   : NOP, RET, IL, IU
- one_register   : INT, LPC/LSP/LIP/LCR, NOT, PUS/POP, SIP/SSP/SCR
- two_register   : moves, byte load/store, ALU, branches, compares, shifts
- three_register : divide, BAL, block and masked memory transfers
- immediate      : LI

Each family exposes `handle(...) -> Result<bool, FaultKind>` returning
`Ok(false)` for an opcode it does not own, so a mismatch between the decoder
and the families surfaces as a decode fault rather than a silent no-op.
*/

use tracing::trace;

use crate::bus::Bus;
use crate::cpu::regs::CpuRegs;
use crate::error::FaultKind;
use crate::isa::{HALT, Instruction, Opcode, Operands};

mod immediate;
mod one_register;
mod three_register;
mod two_register;
mod zero_operand;

/// Result of one dispatcher step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// An instruction ran to completion.
    Executed(Instruction),
    /// The halt byte was fetched (or the CPU was already halted).
    Halted,
}

/// Execute one instruction.
pub(crate) fn step<C: CpuRegs>(cpu: &mut C, bus: &mut Bus) -> Result<StepOutcome, FaultKind> {
    if cpu.halted() {
        return Ok(StepOutcome::Halted);
    }
    let pc = cpu.pc();
    let byte = bus.read(pc)?;
    if byte == HALT {
        cpu.set_halted(true);
        return Ok(StepOutcome::Halted);
    }

    // Reject unmapped opcodes before touching their operand bytes.
    let width = Opcode::try_from(byte)?.class().width();
    let inst = Instruction::decode(bus.fetch(pc, width)?)?;
    trace!(pc, %inst, "exec");

    cpu.advance_pc(width);
    execute(inst, cpu, bus)?;
    Ok(StepOutcome::Executed(inst))
}

/// Route a decoded instruction (PC already advanced) to its family.
pub(crate) fn execute<C: CpuRegs>(
    inst: Instruction,
    cpu: &mut C,
    bus: &mut Bus,
) -> Result<(), FaultKind> {
    let op = inst.opcode;
    let handled = match inst.operands {
        Operands::None => zero_operand::handle(op, cpu, bus)?,
        Operands::One(r) => one_register::handle(op, r, cpu, bus)?,
        Operands::Two(a, b) => two_register::handle(op, a, b, cpu, bus)?,
        Operands::Three(a, b, c) => three_register::handle(op, a, b, c, cpu, bus)?,
        Operands::Imm(r, imm) => immediate::handle(op, r, imm, cpu),
    };
    if handled {
        Ok(())
    } else {
        Err(FaultKind::UnknownOpcode { opcode: op.byte() })
    }
}
