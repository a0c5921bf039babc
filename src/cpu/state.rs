/*!
state.rs - Canonical CPU architectural state (register file, special
registers, condition flags) and inline-friendly helpers.

Overview
========
`CpuState` is the single authoritative owner for all architecturally visible
registers and execution control booleans. It intentionally excludes:
  - Memory / bus logic
  - Instruction decode / dispatch logic
Those live in higher layers (bus, dispatch, execute modules).

Special Registers
=================
  PC - byte offset of the next instruction to fetch
  SP - byte offset of the current stack top (stack grows downward)
  IP - base offset of the 256-entry interrupt-vector table
  CR - condition register; comparison flags live in bits 61..=63

Condition Register Layout
=========================
Bit: 63 62 61 60..0
     LT GT EQ (unused, preserved)
Compare instructions replace exactly these three bits; the remaining bits are
only ever changed by `SCR`.
*/

/// Number of general-purpose registers.
pub const REGISTER_COUNT: usize = 256;

/// Condition-register flag masks.
pub const LESS_THAN: u64 = 1 << 63;
pub const GREATER_THAN: u64 = 1 << 62;
pub const EQUAL: u64 = 1 << 61;
/// All comparison flag bits.
pub const COMPARE_FLAGS: u64 = LESS_THAN | GREATER_THAN | EQUAL;

/// Pure architectural register / flag container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuState {
    pub registers: [u64; REGISTER_COUNT],
    pub pc: u64,
    pub sp: u64,
    pub ip: u64,
    pub cr: u64,
    /// Interrupt delivery enable (IL/IU). Advisory: nothing is deferred on it.
    pub interrupts_enabled: bool,
    pub halted: bool,
}

impl Default for CpuState {
    fn default() -> Self {
        Self {
            registers: [0; REGISTER_COUNT],
            pc: 0,
            sp: 0,
            ip: 0,
            cr: 0,
            interrupts_enabled: true,
            halted: false,
        }
    }
}

impl CpuState {
    // ---------------------------------------------------------------------
    // Construction
    // ---------------------------------------------------------------------

    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    // ---------------------------------------------------------------------
    // Register file
    // ---------------------------------------------------------------------
    #[inline]
    pub fn reg(&self, index: u8) -> u64 {
        self.registers[index as usize]
    }
    #[inline]
    pub fn set_reg(&mut self, index: u8, value: u64) {
        self.registers[index as usize] = value;
    }

    // ---------------------------------------------------------------------
    // Special registers (read)
    // ---------------------------------------------------------------------
    #[inline]
    pub fn pc(&self) -> u64 {
        self.pc
    }
    #[inline]
    pub fn sp(&self) -> u64 {
        self.sp
    }
    #[inline]
    pub fn ip(&self) -> u64 {
        self.ip
    }
    #[inline]
    pub fn cr(&self) -> u64 {
        self.cr
    }
    #[inline]
    pub fn interrupts_enabled(&self) -> bool {
        self.interrupts_enabled
    }
    #[inline]
    pub fn halted(&self) -> bool {
        self.halted
    }

    // ---------------------------------------------------------------------
    // Special registers (write)
    // ---------------------------------------------------------------------
    #[inline]
    pub fn set_pc(&mut self, v: u64) {
        self.pc = v;
    }
    #[inline]
    pub fn set_sp(&mut self, v: u64) {
        self.sp = v;
    }
    #[inline]
    pub fn set_ip(&mut self, v: u64) {
        self.ip = v;
    }
    #[inline]
    pub fn set_cr(&mut self, v: u64) {
        self.cr = v;
    }
    #[inline]
    pub fn set_interrupts_enabled(&mut self, on: bool) {
        self.interrupts_enabled = on;
    }
    #[inline]
    pub fn set_halted(&mut self, h: bool) {
        self.halted = h;
    }

    /// Advance PC by `delta` bytes (wrapping at 64 bits).
    #[inline]
    pub fn advance_pc(&mut self, delta: u64) {
        self.pc = self.pc.wrapping_add(delta);
    }

    // ---------------------------------------------------------------------
    // Condition flags
    // ---------------------------------------------------------------------

    /// True if every bit of `mask` is set in CR.
    #[inline]
    pub fn cr_covers(&self, mask: u64) -> bool {
        self.cr & mask == mask
    }

    /// Replace the comparison flags with `flag`, preserving unrelated CR bits.
    #[inline]
    pub fn set_compare_flag(&mut self, flag: u64) {
        self.cr = (self.cr & !COMPARE_FLAGS) | (flag & COMPARE_FLAGS);
    }
}
