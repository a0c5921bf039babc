#![doc = r#"
emu64 library crate.

A software model of a small 64-bit register machine: 256 general-purpose
registers, flat big-endian byte-addressed memory, a downward-growing stack,
a condition register set by compares, and software interrupts (one of which
is a console system call).

Modules:
- asm: line assembler producing images for the machine
- bus: memory image and console device behind one bounds-checked facade
- config: machine layout (memory size, stack reservation, vector table)
- cpu: CPU core (facade + state + dispatch + execute modules)
- error: fault, assembler, and configuration error types
- isa: opcode table, operand classes, instruction encode/decode
- logging: tracing subscriber setup shared by the binaries
- machine: CPU + bus + config as one runnable value, with the state dump

In tests, shared encoders and machine builders are available under
`crate::test_utils`.
"#]

pub mod asm;
pub mod bus;
pub mod config;
pub mod cpu;
pub mod error;
pub mod isa;
pub mod logging;
pub mod machine;

// Re-export commonly used types at the crate root for convenience.
pub use bus::Bus;
pub use config::MachineConfig;
pub use cpu::core::Cpu;
pub use error::{AsmError, ConfigError, FaultKind, MachineFault};
pub use machine::{Machine, StopReason};

// Shared test utilities (only compiled for tests)
#[cfg(test)]
pub mod test_utils;
