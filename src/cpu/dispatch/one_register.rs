/*!
one_register.rs - One-register opcode family handler (high nibble 0x80)

Overview
========
Every opcode in this family carries a single operand byte `r`.

Interrupts:
  INT (0x81)  raise software interrupt number `r` (the operand byte itself,
              not the contents of register `r`)

Special-register reads (PC reads as the address after this instruction):
  LPC (0x82), LSP (0x83), LIP (0x84), LCR (0x85)

Register / stack:
  NOT (0x86)  r = !r
  PUS (0x87)  push(r)
  POP (0x88)  r = pop()

Special-register writes (privileged):
  SIP (0x89), SSP (0x8A), SCR (0x8B)

Return Contract
===============
`handle` returns Ok(true) if the opcode was executed, Ok(false) if it is not
part of this family; faults from stack or interrupt traffic propagate.
*/

use crate::bus::Bus;
use crate::cpu::execute::{pop, push};
use crate::cpu::interrupt;
use crate::cpu::regs::CpuRegs;
use crate::error::FaultKind;
use crate::isa::Opcode;

pub(super) fn handle<C: CpuRegs>(
    opcode: Opcode,
    r: u8,
    cpu: &mut C,
    bus: &mut Bus,
) -> Result<bool, FaultKind> {
    match opcode {
        Opcode::Int => interrupt::raise(cpu, bus, r)?,

        Opcode::Lpc => cpu.set_reg(r, cpu.pc()),
        Opcode::Lsp => cpu.set_reg(r, cpu.sp()),
        Opcode::Lip => cpu.set_reg(r, cpu.ip()),
        Opcode::Lcr => cpu.set_reg(r, cpu.cr()),

        Opcode::Not => cpu.update_reg(r, |v| !v),
        Opcode::Pus => {
            let v = cpu.reg(r);
            push(cpu, bus, v)?;
        }
        Opcode::Pop => {
            let v = pop(cpu, bus)?;
            cpu.set_reg(r, v);
        }

        Opcode::Sip => cpu.set_ip(cpu.reg(r)),
        Opcode::Ssp => cpu.set_sp(cpu.reg(r)),
        Opcode::Scr => cpu.set_cr(cpu.reg(r)),

        _ => return Ok(false),
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use crate::cpu::state::EQUAL;
    use crate::error::FaultKind;
    use crate::isa::Opcode;
    use crate::test_utils::{enc, setup};

    #[test]
    fn special_register_reads() {
        let mut prog = Vec::new();
        for (op, r) in [
            (Opcode::Lpc, 1),
            (Opcode::Lsp, 2),
            (Opcode::Lip, 3),
            (Opcode::Lcr, 4),
        ] {
            prog.extend(enc::one(op, r));
        }
        let (mut m, _out) = setup(&prog);
        m.cpu_mut().state_mut().cr = EQUAL;
        m.run().unwrap();
        let cpu = m.cpu();
        assert_eq!(cpu.reg(1), 2);
        assert_eq!(cpu.reg(2), cpu.sp());
        assert_eq!(cpu.reg(3), cpu.ip());
        assert_eq!(cpu.reg(4), EQUAL);
    }

    #[test]
    fn special_register_writes() {
        let mut prog = Vec::new();
        prog.extend(enc::one(Opcode::Sip, 1));
        prog.extend(enc::one(Opcode::Ssp, 2));
        prog.extend(enc::one(Opcode::Scr, 3));
        let (mut m, _out) = setup(&prog);
        m.cpu_mut().set_reg(1, 0x100);
        m.cpu_mut().set_reg(2, 0x200);
        m.cpu_mut().set_reg(3, 0b101);
        m.run().unwrap();
        assert_eq!(m.cpu().ip(), 0x100);
        assert_eq!(m.cpu().sp(), 0x200);
        assert_eq!(m.cpu().cr(), 0b101);
    }

    #[test]
    fn not_complements_in_place() {
        let (mut m, _out) = setup(&enc::one(Opcode::Not, 9));
        m.cpu_mut().set_reg(9, 0x00FF_00FF_00FF_00FF);
        m.step().unwrap();
        assert_eq!(m.cpu().reg(9), 0xFF00_FF00_FF00_FF00);
    }

    #[test]
    fn push_then_pop_moves_value_between_registers() {
        let mut prog = enc::one(Opcode::Pus, 1);
        prog.extend(enc::one(Opcode::Pop, 2));
        let (mut m, _out) = setup(&prog);
        m.cpu_mut().set_reg(1, 0xABCD);
        let sp = m.cpu().sp();
        m.step().unwrap();
        assert_eq!(m.cpu().sp(), sp - 8);
        m.step().unwrap();
        assert_eq!(m.cpu().reg(2), 0xABCD);
        assert_eq!(m.cpu().sp(), sp);
    }

    #[test]
    fn pop_past_top_of_memory_faults() {
        let (mut m, _out) = setup(&enc::one(Opcode::Pop, 2));
        // SP at the end of memory: the popped word would lie past it.
        let size = m.bus().size();
        m.cpu_mut().set_sp(size);
        let fault = m.step().unwrap_err();
        assert!(matches!(fault.kind, FaultKind::AddressOutOfRange { .. }));
        assert_eq!(fault.pc, 0);
    }
}
