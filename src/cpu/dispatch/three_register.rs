/*!
three_register.rs - Three-register opcode family handler (high nibble 0xC0)

Overview
========
Operands are three register numbers `a`, `b`, `c`.

Division (quotient to `a`, remainder to `c`; `c` is written last so it wins
when `a == c`):
  D   (0xC1)  signed, truncating toward zero
  DU  (0xC2)  unsigned
A zero divisor is a `DivisionByZero` fault.

Branch-and-link:
  BAL (0xC3)  if CR covers a: c = PC (return address); PC = b
The target is read and bounds-checked before the link register is written.

Block transfers (`first = a`, `last = b`, address = value of `c`, captured
before the loop):
  LSM (0xC4)  r[first..=last] = mem64[addr]
  STM (0xC5)  mem64[addr] = r[first..=last]
The address is NOT advanced between registers: every register in the range
reads or writes the same word, so STM leaves `r[last]` in memory. An empty
range (`first > last`) transfers nothing.

Masked transfers (mask = value of `a`, address = value of `c`):
  LUM (0xC6)  b = (b & !mask) | (mem64[addr] & mask)
  SUM (0xC7)  mem64[addr] = (mem64[addr] & !mask) | (b & mask)
*/

use crate::bus::Bus;
use crate::cpu::execute::{
    branch_condition, check_target, div_signed, div_unsigned, merge_masked,
};
use crate::cpu::regs::CpuRegs;
use crate::error::FaultKind;
use crate::isa::Opcode;

pub(super) fn handle<C: CpuRegs>(
    opcode: Opcode,
    a: u8,
    b: u8,
    c: u8,
    cpu: &mut C,
    bus: &mut Bus,
) -> Result<bool, FaultKind> {
    match opcode {
        Opcode::D | Opcode::Du => {
            let (x, y) = (cpu.reg(a), cpu.reg(b));
            let (q, r) = if opcode == Opcode::D {
                div_signed(x, y)?
            } else {
                div_unsigned(x, y)?
            };
            cpu.set_reg(a, q);
            cpu.set_reg(c, r);
        }
        Opcode::Bal => {
            let (cond, target) = (cpu.reg(a), cpu.reg(b));
            if branch_condition(cpu, cond) {
                check_target(bus, target)?;
                cpu.set_reg(c, cpu.pc());
                cpu.set_pc(target);
            }
        }
        Opcode::Lsm => {
            let addr = cpu.reg(c);
            for i in a..=b {
                let v = bus.read_word(addr)?;
                cpu.set_reg(i, v);
            }
        }
        Opcode::Stm => {
            let addr = cpu.reg(c);
            for i in a..=b {
                bus.write_word(addr, cpu.reg(i))?;
            }
        }
        Opcode::Lum => {
            let (mask, addr) = (cpu.reg(a), cpu.reg(c));
            let incoming = bus.read_word(addr)?;
            cpu.update_reg(b, |v| merge_masked(v, incoming, mask));
        }
        Opcode::Sum => {
            let (mask, v, addr) = (cpu.reg(a), cpu.reg(b), cpu.reg(c));
            let current = bus.read_word(addr)?;
            bus.write_word(addr, merge_masked(current, v, mask))?;
        }
        _ => return Ok(false),
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use crate::cpu::state::{EQUAL, GREATER_THAN};
    use crate::error::FaultKind;
    use crate::isa::Opcode;
    use crate::test_utils::{TEST_MEMORY_SIZE, enc, setup};

    #[test]
    fn signed_divide_with_remainder() {
        let (mut m, _out) = setup(&enc::three(Opcode::D, 1, 2, 3));
        m.cpu_mut().set_reg(1, (-17i64) as u64);
        m.cpu_mut().set_reg(2, 5);
        m.step().unwrap();
        assert_eq!(m.cpu().reg(1), (-3i64) as u64);
        assert_eq!(m.cpu().reg(3), (-2i64) as u64);
        assert_eq!(m.cpu().pc(), 4);
    }

    #[test]
    fn unsigned_divide_with_remainder() {
        let (mut m, _out) = setup(&enc::three(Opcode::Du, 1, 2, 3));
        m.cpu_mut().set_reg(1, u64::MAX);
        m.cpu_mut().set_reg(2, 10);
        m.step().unwrap();
        assert_eq!(m.cpu().reg(1), u64::MAX / 10);
        assert_eq!(m.cpu().reg(3), 5);
    }

    #[test]
    fn divide_by_zero_faults_at_instruction_pc() {
        let mut prog = enc::nop();
        prog.extend(enc::three(Opcode::Du, 1, 2, 3));
        let (mut m, _out) = setup(&prog);
        m.cpu_mut().set_reg(1, 9);
        m.step().unwrap();
        let fault = m.step().unwrap_err();
        assert_eq!(fault.kind, FaultKind::DivisionByZero);
        assert_eq!(fault.pc, 1);
        assert_eq!(m.cpu().reg(1), 9);
    }

    #[test]
    fn bal_links_and_jumps_when_taken() {
        let (mut m, _out) = setup(&enc::three(Opcode::Bal, 1, 2, 3));
        m.cpu_mut().state_mut().cr = GREATER_THAN;
        m.cpu_mut().set_reg(1, GREATER_THAN);
        m.cpu_mut().set_reg(2, 0x90);
        m.step().unwrap();
        assert_eq!(m.cpu().pc(), 0x90);
        assert_eq!(m.cpu().reg(3), 4);
    }

    #[test]
    fn bal_not_taken_leaves_link_register() {
        let (mut m, _out) = setup(&enc::three(Opcode::Bal, 1, 2, 3));
        m.cpu_mut().set_reg(1, EQUAL);
        m.cpu_mut().set_reg(2, 0x90);
        m.cpu_mut().set_reg(3, 0xAA);
        m.step().unwrap();
        assert_eq!(m.cpu().pc(), 4);
        assert_eq!(m.cpu().reg(3), 0xAA);
    }

    #[test]
    fn lsm_broadcasts_one_word_to_every_register_in_range() {
        let (mut m, _out) = setup(&enc::three(Opcode::Lsm, 10, 12, 1));
        m.cpu_mut().set_reg(1, 0x400);
        m.bus_mut().write_word(0x400, 0x1111).unwrap();
        m.bus_mut().write_word(0x408, 0x2222).unwrap();
        m.step().unwrap();
        assert_eq!(m.cpu().reg(10), 0x1111);
        assert_eq!(m.cpu().reg(11), 0x1111);
        assert_eq!(m.cpu().reg(12), 0x1111);
        assert_eq!(m.cpu().reg(13), 0);
    }

    #[test]
    fn stm_leaves_last_register_at_single_address() {
        let (mut m, _out) = setup(&enc::three(Opcode::Stm, 10, 12, 1));
        m.cpu_mut().set_reg(1, 0x400);
        for (i, v) in [(10u8, 0xA), (11, 0xB), (12, 0xC)] {
            m.cpu_mut().set_reg(i, v);
        }
        m.step().unwrap();
        assert_eq!(m.bus().read_word(0x400).unwrap(), 0xC);
        assert_eq!(m.bus().read_word(0x408).unwrap(), 0);
    }

    #[test]
    fn empty_block_range_is_a_no_op() {
        let (mut m, _out) = setup(&enc::three(Opcode::Lsm, 12, 10, 1));
        m.cpu_mut().set_reg(1, 0x400);
        m.bus_mut().write_word(0x400, 0x1111).unwrap();
        m.step().unwrap();
        assert_eq!(m.cpu().reg(10), 0);
        assert_eq!(m.cpu().reg(12), 0);
    }

    #[test]
    fn lum_merges_masked_memory_into_register() {
        let (mut m, _out) = setup(&enc::three(Opcode::Lum, 1, 2, 3));
        m.cpu_mut().set_reg(1, 0x0000_FFFF);
        m.cpu_mut().set_reg(2, 0xAAAA_AAAA);
        m.cpu_mut().set_reg(3, 0x400);
        m.bus_mut().write_word(0x400, 0x5555_1234).unwrap();
        m.step().unwrap();
        assert_eq!(m.cpu().reg(2), 0xAAAA_1234);
    }

    #[test]
    fn sum_merges_masked_register_into_memory() {
        let (mut m, _out) = setup(&enc::three(Opcode::Sum, 1, 2, 3));
        m.cpu_mut().set_reg(1, 0xFF00);
        m.cpu_mut().set_reg(2, 0x1234);
        m.cpu_mut().set_reg(3, 0x400);
        m.bus_mut().write_word(0x400, 0xABCD).unwrap();
        m.step().unwrap();
        assert_eq!(m.bus().read_word(0x400).unwrap(), 0x12CD);
    }

    #[test]
    fn block_transfer_out_of_range_faults() {
        let (mut m, _out) = setup(&enc::three(Opcode::Stm, 0, 3, 1));
        m.cpu_mut().set_reg(1, u64::MAX - 2);
        let fault = m.step().unwrap_err();
        assert!(matches!(fault.kind, FaultKind::AddressOutOfRange { .. }));
    }

    #[test]
    fn bal_outside_memory_faults_without_linking() {
        let mut prog = enc::nop();
        prog.extend(enc::three(Opcode::Bal, 1, 2, 3));
        let (mut m, _out) = setup(&prog);
        m.cpu_mut().set_reg(2, TEST_MEMORY_SIZE);
        m.cpu_mut().set_reg(3, 0xAA);
        m.step().unwrap();
        let fault = m.step().unwrap_err();
        assert_eq!(fault.pc, 1);
        assert_eq!(
            fault.kind,
            FaultKind::AddressOutOfRange {
                addr: TEST_MEMORY_SIZE,
                len: 1,
                size: TEST_MEMORY_SIZE
            }
        );
        assert_eq!(m.cpu().reg(3), 0xAA);
    }
}
