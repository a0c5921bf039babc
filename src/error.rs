/*!
error.rs - Typed faults and errors surfaced by the machine, assembler, and config loader.

Fault Model
===========
Every fault raised while executing is unrecoverable: the run loop stops and
hands a `MachineFault` (failing PC + `FaultKind`) back to the caller. The
core never terminates the process itself; the runner binary decides how to
report the fault (message + diagnostic dump) and which exit status to use.

Instruction handlers and bus accessors return `Result<_, FaultKind>`; the
machine attaches the PC of the instruction being executed when the fault
crosses the step boundary.
*/

use thiserror::Error;

/// Reason an instruction could not complete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FaultKind {
    /// Opcode byte not present in its class's mapping.
    #[error("unknown instruction 0x{opcode:02X}")]
    UnknownOpcode { opcode: u8 },
    /// Interrupt 1 requested with an unsupported selector in register 0.
    #[error("invalid interrupt command at INT 0x1: {selector}")]
    UnknownSyscall { selector: u64 },
    /// A memory access touched bytes outside the memory buffer.
    #[error("address 0x{addr:016X} (+{len}) outside memory of {size} bytes")]
    AddressOutOfRange { addr: u64, len: u64, size: u64 },
    #[error("division by zero")]
    DivisionByZero,
    /// The console device rejected a byte.
    #[error("console write failed: {0}")]
    ConsoleWrite(String),
}

/// Fatal fault with the PC of the instruction that raised it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("ERROR @0x{pc:016X}: {kind}")]
pub struct MachineFault {
    pub pc: u64,
    pub kind: FaultKind,
}

impl MachineFault {
    #[inline]
    pub fn new(pc: u64, kind: FaultKind) -> Self {
        Self { pc, kind }
    }
}

/// Assembly failure at a 1-based source line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {reason}")]
pub struct AsmError {
    pub line: usize,
    pub reason: AsmErrorReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AsmErrorReason {
    #[error("unknown mnemonic '{0}'")]
    UnknownMnemonic(String),
    #[error("{mnemonic} expects {expected} operand(s), got {actual}")]
    OperandCount {
        mnemonic: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("expected register number, got '{0}'")]
    BadRegister(String),
    #[error("expected immediate #num or $num, got '{0}'")]
    BadImmediate(String),
}

/// Errors raised while loading or validating a `MachineConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
