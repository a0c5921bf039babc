/*!
regs.rs - CpuRegs trait providing a minimal, generic register + flag
interface for instruction semantics and dispatch.

The trait does NOT include:
  - Stack push/pop
  - Instruction fetch
  - Bus access of any kind

Memory, stack, and fetch operations stay explicit at call sites via
`&mut Bus` so handlers never over-borrow the machine. Static dispatch via
generics keeps the hot path free of trait objects.
*/

use crate::cpu::state::CpuState;

/// Architectural register / flag API needed by instruction semantics.
///
/// ALL mutating methods take &mut self, enabling generic call sites:
///   fn op<T: CpuRegs>(cpu: &mut T) { ... }
pub trait CpuRegs {
    // ---------------------------------------------------------------------
    // Read accessors
    // ---------------------------------------------------------------------
    fn reg(&self, index: u8) -> u64;
    fn pc(&self) -> u64;
    fn sp(&self) -> u64;
    fn ip(&self) -> u64;
    fn cr(&self) -> u64;
    fn interrupts_enabled(&self) -> bool;
    fn halted(&self) -> bool;

    // ---------------------------------------------------------------------
    // Mutators
    // ---------------------------------------------------------------------
    fn set_reg(&mut self, index: u8, value: u64);
    fn set_pc(&mut self, v: u64);
    fn set_sp(&mut self, v: u64);
    fn set_ip(&mut self, v: u64);
    fn set_cr(&mut self, v: u64);
    fn set_interrupts_enabled(&mut self, on: bool);
    fn set_halted(&mut self, h: bool);

    /// Advance PC by `delta` (wrapping at 64 bits).
    fn advance_pc(&mut self, delta: u64);

    /// Read-modify-write of one register.
    #[inline]
    fn update_reg(&mut self, index: u8, f: impl FnOnce(u64) -> u64) {
        let v = f(self.reg(index));
        self.set_reg(index, v);
    }

    // ---------------------------------------------------------------------
    // Flag operations
    // ---------------------------------------------------------------------

    /// True if every bit of `mask` is set in CR.
    fn cr_covers(&self, mask: u64) -> bool;

    /// Replace the comparison flags, preserving other CR bits.
    fn set_compare_flag(&mut self, flag: u64);
}

// -------------------------------------------------------------------------
// Implementation: CpuState (canonical)
// -------------------------------------------------------------------------

impl CpuRegs for CpuState {
    #[inline]
    fn reg(&self, index: u8) -> u64 {
        self.reg(index)
    }
    #[inline]
    fn pc(&self) -> u64 {
        self.pc()
    }
    #[inline]
    fn sp(&self) -> u64 {
        self.sp()
    }
    #[inline]
    fn ip(&self) -> u64 {
        self.ip()
    }
    #[inline]
    fn cr(&self) -> u64 {
        self.cr()
    }
    #[inline]
    fn interrupts_enabled(&self) -> bool {
        self.interrupts_enabled()
    }
    #[inline]
    fn halted(&self) -> bool {
        self.halted()
    }

    #[inline]
    fn set_reg(&mut self, index: u8, value: u64) {
        self.set_reg(index, value);
    }
    #[inline]
    fn set_pc(&mut self, v: u64) {
        self.set_pc(v);
    }
    #[inline]
    fn set_sp(&mut self, v: u64) {
        self.set_sp(v);
    }
    #[inline]
    fn set_ip(&mut self, v: u64) {
        self.set_ip(v);
    }
    #[inline]
    fn set_cr(&mut self, v: u64) {
        self.set_cr(v);
    }
    #[inline]
    fn set_interrupts_enabled(&mut self, on: bool) {
        self.set_interrupts_enabled(on);
    }
    #[inline]
    fn set_halted(&mut self, h: bool) {
        self.set_halted(h);
    }

    #[inline]
    fn advance_pc(&mut self, delta: u64) {
        self.advance_pc(delta);
    }

    #[inline]
    fn cr_covers(&self, mask: u64) -> bool {
        self.cr_covers(mask)
    }
    #[inline]
    fn set_compare_flag(&mut self, flag: u64) {
        self.set_compare_flag(flag);
    }
}
