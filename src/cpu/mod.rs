/*!
cpu::mod - Public façade for the CPU core.

Layout:

```text
    state.rs      - Core CPU state (register file, PC/SP/IP/CR, flags).
    regs.rs       - CpuRegs trait: register + flag API used by handlers.
    execute.rs    - Instruction semantic helpers (stack, compare, ALU).
    interrupt.rs  - Software interrupt controller (syscalls + vector table).
    dispatch/     - Fetch / decode / execute step and the per-class
                    opcode family handlers.
    core/         - `Cpu` façade owning `CpuState`.
```

The public surface is exposed via the `Cpu` facade (wrapping `CpuState`).
Downstream code should not rely on internal module layout.

Usage:
```rust
use emu64::bus::Bus;
use emu64::cpu::Cpu;

let mut bus = Bus::new(4096);
let mut cpu = Cpu::new();
cpu.set_sp(4096 - 8);
assert_eq!(cpu.step(&mut bus), Ok(emu64::cpu::StepOutcome::Halted));
```
*/

pub mod core;
pub mod dispatch;
pub mod execute;
pub mod interrupt;
pub mod regs;
pub mod state;

// Re-exports:
// - Cpu (facade over CpuState)
// - CpuState (raw state; exposed for tests, dumps, trait impls)
// - Condition flag constants (canonical bit masks)
pub use crate::cpu::core::Cpu;
pub use crate::cpu::dispatch::StepOutcome;
pub use crate::cpu::regs::CpuRegs;
pub use crate::cpu::state::{
    COMPARE_FLAGS, CpuState, EQUAL, GREATER_THAN, LESS_THAN, REGISTER_COUNT,
};
