/*!
zero_operand.rs - Zero-operand opcode family handler (high nibble 0xF0)

  NOP (0xF1)  no effect
  RET (0xF2)  PC = pop(); an out-of-range return address faults with SP
              unchanged
  IL  (0xF3)  disable interrupt delivery
  IU  (0xF4)  enable interrupt delivery

The interrupt-enable flag is machine-wide but advisory; `INT` does not
consult it.
*/

use crate::bus::Bus;
use crate::cpu::execute::{check_target, pop};
use crate::cpu::regs::CpuRegs;
use crate::error::FaultKind;
use crate::isa::Opcode;

pub(super) fn handle<C: CpuRegs>(
    opcode: Opcode,
    cpu: &mut C,
    bus: &mut Bus,
) -> Result<bool, FaultKind> {
    match opcode {
        Opcode::Nop => {}
        Opcode::Ret => {
            check_target(bus, bus.read_word(cpu.sp())?)?;
            let ret = pop(cpu, bus)?;
            cpu.set_pc(ret);
        }
        Opcode::Il => cpu.set_interrupts_enabled(false),
        Opcode::Iu => cpu.set_interrupts_enabled(true),
        _ => return Ok(false),
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use crate::error::FaultKind;
    use crate::isa::Opcode;
    use crate::test_utils::{TEST_MEMORY_SIZE, enc, setup};

    #[test]
    fn nop_only_advances_pc() {
        let (mut m, _out) = setup(&enc::nop());
        let before = m.cpu().state().clone();
        m.step().unwrap();
        assert_eq!(m.cpu().pc(), 1);
        assert_eq!(m.cpu().state().registers, before.registers);
        assert_eq!(m.cpu().sp(), before.sp);
    }

    #[test]
    fn ret_pops_pc() {
        let (mut m, _out) = setup(&enc::zero(Opcode::Ret));
        m.push(0x30).unwrap();
        let sp = m.cpu().sp();
        m.step().unwrap();
        assert_eq!(m.cpu().pc(), 0x30);
        assert_eq!(m.cpu().sp(), sp + 8);
    }

    #[test]
    fn il_iu_toggle_interrupt_flag() {
        let mut prog = enc::zero(Opcode::Il);
        prog.extend(enc::zero(Opcode::Iu));
        let (mut m, _out) = setup(&prog);
        m.step().unwrap();
        assert!(!m.cpu().interrupts_enabled());
        m.step().unwrap();
        assert!(m.cpu().interrupts_enabled());
    }

    #[test]
    fn ret_to_address_outside_memory_faults() {
        let mut prog = enc::nop();
        prog.extend(enc::zero(Opcode::Ret));
        let (mut m, _out) = setup(&prog);
        m.push(0x1_0000_0000).unwrap();
        let sp = m.cpu().sp();
        m.step().unwrap();
        let fault = m.step().unwrap_err();
        assert_eq!(fault.pc, 1);
        assert_eq!(
            fault.kind,
            FaultKind::AddressOutOfRange {
                addr: 0x1_0000_0000,
                len: 1,
                size: TEST_MEMORY_SIZE
            }
        );
        assert_eq!(m.cpu().sp(), sp);
    }
}
