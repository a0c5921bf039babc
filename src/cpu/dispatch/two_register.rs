/*!
two_register.rs - Two-register opcode family handler (every high nibble not
claimed by another class)

Overview
========
Operands are two register numbers `a` and `b`. Unless stated otherwise the
result is written back to `a`.

Moves / byte memory access:
  L   (0x01)  a = b
  LS  (0x02)  a = mem8[b]             (zero-extended byte load)
  ST  (0x03)  mem8[b] = a & 0xFF      (byte store)

Arithmetic (64-bit two's complement, wrapping):
  A  (0x04) / AU (0x05)   add       signed / unsigned
  S  (0x06) / SU (0x07)   subtract  signed / unsigned
  M  (0x08) / MU (0x09)   multiply  signed / unsigned
The signed and unsigned forms produce identical bit patterns; both are kept
as distinct opcodes of the instruction set.

Logical:
  AND (0x0A), OR (0x0B), XOR (0x0C)
  SHL (0x11), SHR (0x12)  logical shifts; a count >= 64 yields 0

Branches (condition = value of register `a`, target = value of register `b`):
  B   (0x0D)  if CR covers a: PC = b
  BAS (0x0E)  if CR covers a: push(PC); PC = b
"Covers" means every bit set in `a` is also set in CR, so a zero condition
always branches. A taken branch to a target outside memory faults before
anything is pushed.

Compares (set exactly one of CR.LT / CR.GT / CR.EQ, clearing the others):
  CP  (0x0F)  signed
  CPU (0x10)  unsigned
*/

use crate::bus::Bus;
use crate::cpu::execute::{
    branch_condition, check_target, compare_signed, compare_unsigned, push, shift_left,
    shift_right,
};
use crate::cpu::regs::CpuRegs;
use crate::error::FaultKind;
use crate::isa::Opcode;

pub(super) fn handle<C: CpuRegs>(
    opcode: Opcode,
    a: u8,
    b: u8,
    cpu: &mut C,
    bus: &mut Bus,
) -> Result<bool, FaultKind> {
    let (ra, rb) = (cpu.reg(a), cpu.reg(b));
    match opcode {
        // ---------------- Moves / memory ----------------
        Opcode::L => cpu.set_reg(a, rb),
        Opcode::Ls => {
            let v = bus.read(rb)?;
            cpu.set_reg(a, v as u64);
        }
        Opcode::St => bus.write(rb, (ra & 0xFF) as u8)?,

        // ---------------- Arithmetic ----------------
        Opcode::A | Opcode::Au => cpu.update_reg(a, |v| v.wrapping_add(rb)),
        Opcode::S | Opcode::Su => cpu.update_reg(a, |v| v.wrapping_sub(rb)),
        Opcode::M => cpu.update_reg(a, |v| (v as i64).wrapping_mul(rb as i64) as u64),
        Opcode::Mu => cpu.update_reg(a, |v| v.wrapping_mul(rb)),

        // ---------------- Logical ----------------
        Opcode::And => cpu.update_reg(a, |v| v & rb),
        Opcode::Or => cpu.update_reg(a, |v| v | rb),
        Opcode::Xor => cpu.update_reg(a, |v| v ^ rb),
        Opcode::Shl => cpu.update_reg(a, |v| shift_left(v, rb)),
        Opcode::Shr => cpu.update_reg(a, |v| shift_right(v, rb)),

        // ---------------- Branches ----------------
        Opcode::B | Opcode::Bas => {
            if branch_condition(cpu, ra) {
                check_target(bus, rb)?;
                if opcode == Opcode::Bas {
                    let ret = cpu.pc();
                    push(cpu, bus, ret)?;
                }
                cpu.set_pc(rb);
            }
        }

        // ---------------- Compares ----------------
        Opcode::Cp => compare_signed(cpu, ra, rb),
        Opcode::Cpu => compare_unsigned(cpu, ra, rb),

        _ => return Ok(false),
    }
    Ok(true)
}
