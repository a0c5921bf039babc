/*!
interrupt.rs - Software interrupt controller

Overview
========
Resolves an interrupt number raised by `INT` to one of two behaviors:

  number == 1   Synchronous system call. Register 0 selects the call:
                  1 => emit the low byte of register 1 to the console
                  * => fatal `UnknownSyscall`
  otherwise     Vectored interrupt. The current PC (already past the `INT`
                instruction) is pushed, and PC is loaded from the
                interrupt-vector table slot `IP + number * 8`. A vector
                pointing outside memory faults before the push.

Return from a vectored interrupt is an ordinary `RET`, which pops the saved
PC and resumes right after the `INT`.

The IL/IU enable flag is not consulted: interrupts are synchronous calls
and there is no deferred-delivery queue for the flag to gate.
*/

use tracing::debug;

use crate::bus::{Bus, WORD_BYTES};
use crate::cpu::execute::{check_target, push};
use crate::cpu::regs::CpuRegs;
use crate::error::FaultKind;

/// Interrupt number reserved for system calls.
pub const SYSCALL_INTERRUPT: u8 = 1;
/// Register holding the system-call selector.
pub const SYSCALL_SELECTOR_REG: u8 = 0;
/// Register holding the system-call argument.
pub const SYSCALL_ARG_REG: u8 = 1;
/// Selector: write one byte to the console.
pub const SYSCALL_PUTCHAR: u64 = 1;

/// Number of slots in the interrupt-vector table.
pub const VECTOR_COUNT: u64 = 256;

/// Address of vector table slot `number` for a table based at `ip`.
#[inline]
pub fn vector_slot(ip: u64, number: u8) -> u64 {
    ip.wrapping_add(number as u64 * WORD_BYTES)
}

/// Raise software interrupt `number`.
pub(crate) fn raise<C: CpuRegs>(cpu: &mut C, bus: &mut Bus, number: u8) -> Result<(), FaultKind> {
    if number == SYSCALL_INTERRUPT {
        return syscall(cpu, bus);
    }
    let handler = check_target(bus, bus.read_word(vector_slot(cpu.ip(), number))?)?;
    let return_pc = cpu.pc();
    push(cpu, bus, return_pc)?;
    debug!(number, handler, return_pc, "vectored interrupt");
    cpu.set_pc(handler);
    Ok(())
}

fn syscall<C: CpuRegs>(cpu: &mut C, bus: &mut Bus) -> Result<(), FaultKind> {
    match cpu.reg(SYSCALL_SELECTOR_REG) {
        SYSCALL_PUTCHAR => {
            let byte = (cpu.reg(SYSCALL_ARG_REG) & 0xFF) as u8;
            debug!(byte, "syscall putchar");
            bus.emit(byte)
        }
        selector => Err(FaultKind::UnknownSyscall { selector }),
    }
}
