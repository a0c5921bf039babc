/*!
core::Cpu - Canonical CPU façade wrapping `CpuState`.

Design
======
- `Cpu` stores a single field: `state: CpuState`.
- Public API exposes construction, register accessors, halt state control,
  stack helpers, and stepping.
- Instruction execution is delegated to the generic dispatcher operating on
  `CpuState` through the `CpuRegs` trait; the façade adds nothing to the
  per-instruction path.

The CPU does not own memory. Every operation that touches memory takes the
`Bus` explicitly, which lets the owning `Machine` hold both side by side and
lend them out independently.
*/

use crate::bus::Bus;
use crate::cpu::dispatch::{self, StepOutcome};
use crate::cpu::execute;
use crate::cpu::state::CpuState;
use crate::error::FaultKind;

#[derive(Debug, Clone, Default)]
pub struct Cpu {
    state: CpuState,
}

impl Cpu {
    /// Construct a new CPU with power-up defaults.
    pub fn new() -> Self {
        Self {
            state: CpuState::new(),
        }
    }

    /// Return immutable reference to internal state (for inspection / testing).
    pub fn state(&self) -> &CpuState {
        &self.state
    }

    /// Return mutable reference to internal state.
    pub fn state_mut(&mut self) -> &mut CpuState {
        &mut self.state
    }

    /// True once the halt opcode has been executed.
    pub fn is_halted(&self) -> bool {
        self.state.halted
    }

    /// Set or clear the halted flag (clear it to resume after a halt).
    pub fn set_halted(&mut self, h: bool) {
        self.state.halted = h;
    }

    // ---------------------------------------------------------------------
    // Register accessors (read)
    // ---------------------------------------------------------------------
    pub fn reg(&self, index: u8) -> u64 {
        self.state.reg(index)
    }
    pub fn registers(&self) -> &[u64] {
        &self.state.registers
    }
    pub fn pc(&self) -> u64 {
        self.state.pc
    }
    pub fn sp(&self) -> u64 {
        self.state.sp
    }
    pub fn ip(&self) -> u64 {
        self.state.ip
    }
    pub fn cr(&self) -> u64 {
        self.state.cr
    }
    pub fn interrupts_enabled(&self) -> bool {
        self.state.interrupts_enabled
    }

    // ---------------------------------------------------------------------
    // Register mutators (write)
    // ---------------------------------------------------------------------
    pub fn set_reg(&mut self, index: u8, v: u64) {
        self.state.set_reg(index, v);
    }
    pub fn set_pc(&mut self, v: u64) {
        self.state.pc = v;
    }
    pub fn set_sp(&mut self, v: u64) {
        self.state.sp = v;
    }
    pub fn set_ip(&mut self, v: u64) {
        self.state.ip = v;
    }
    pub fn set_cr(&mut self, v: u64) {
        self.state.cr = v;
    }

    // ---------------------------------------------------------------------
    // Stack
    // ---------------------------------------------------------------------
    pub fn push(&mut self, bus: &mut Bus, v: u64) -> Result<(), FaultKind> {
        execute::push(&mut self.state, bus, v)
    }

    pub fn pop(&mut self, bus: &mut Bus) -> Result<u64, FaultKind> {
        execute::pop(&mut self.state, bus)
    }

    // ---------------------------------------------------------------------
    // Execution
    // ---------------------------------------------------------------------

    /// Execute one instruction using the generic dispatcher.
    pub fn step(&mut self, bus: &mut Bus) -> Result<StepOutcome, FaultKind> {
        dispatch::step(&mut self.state, bus)
    }
}
