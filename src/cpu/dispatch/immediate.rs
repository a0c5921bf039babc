//! Immediate opcode family (high nibble 0xE0): `LI r, imm64`.
//!
//! The 8-byte literal is already decoded (big-endian) by the dispatcher, so
//! nothing here can fault.

use crate::cpu::regs::CpuRegs;
use crate::isa::Opcode;

pub(super) fn handle<C: CpuRegs>(opcode: Opcode, r: u8, imm: u64, cpu: &mut C) -> bool {
    match opcode {
        Opcode::Li => cpu.set_reg(r, imm),
        _ => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{enc, setup};

    #[test]
    fn li_loads_literal_and_advances_ten() {
        let (mut m, _out) = setup(&enc::li(5, 0x1122_3344_5566_7788));
        m.step().unwrap();
        assert_eq!(m.cpu().reg(5), 0x1122_3344_5566_7788);
        assert_eq!(m.cpu().pc(), 10);
    }
}
