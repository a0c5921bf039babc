//! Shared test utilities: a capturing console sink, instruction encoders,
//! and ready-to-step machines.
//!
//! `setup` builds a 16 KiB machine with a 256-word stack reservation, so the
//! vector table sits directly below the stack and addresses up to a few KiB
//! are free for test data.

#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use crate::bus::{Bus, Console};
use crate::config::MachineConfig;
use crate::machine::Machine;

pub const TEST_MEMORY_SIZE: u64 = 0x4000;
pub const TEST_STACK_WORDS: u64 = 256;

/// Console sink whose clones share one buffer.
#[derive(Debug, Clone, Default)]
pub struct CaptureSink {
    buf: Rc<RefCell<Vec<u8>>>,
}

impl CaptureSink {
    pub fn contents(&self) -> Vec<u8> {
        self.buf.borrow().clone()
    }
}

impl Write for CaptureSink {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.borrow_mut().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Bus of `size` bytes with `program` at address 0 and a discarding console.
pub fn bus_with_program(program: &[u8], size: usize) -> Bus {
    let mut bus = Bus::with_console(size, Console::new(io::sink()));
    bus.memory_mut()
        .load_image(program)
        .expect("program fits in test bus");
    bus
}

pub fn test_config() -> MachineConfig {
    MachineConfig {
        memory_size: TEST_MEMORY_SIZE,
        stack_words: TEST_STACK_WORDS,
        ..MachineConfig::default()
    }
}

/// Machine with `program` loaded at 0 and console output captured.
pub fn setup(program: &[u8]) -> (Machine, CaptureSink) {
    let sink = CaptureSink::default();
    let mut m = Machine::with_console(test_config(), sink.clone()).expect("test config is valid");
    m.load_image(program).expect("program fits in test memory");
    (m, sink)
}

/// Instruction encoders.
pub mod enc {
    use crate::isa::{Instruction, Opcode, Operands};

    fn encode(opcode: Opcode, operands: Operands) -> Vec<u8> {
        Instruction { opcode, operands }.encode()
    }

    pub fn nop() -> Vec<u8> {
        zero(Opcode::Nop)
    }

    pub fn zero(op: Opcode) -> Vec<u8> {
        encode(op, Operands::None)
    }

    pub fn one(op: Opcode, r: u8) -> Vec<u8> {
        encode(op, Operands::One(r))
    }

    pub fn two(op: Opcode, a: u8, b: u8) -> Vec<u8> {
        encode(op, Operands::Two(a, b))
    }

    pub fn three(op: Opcode, a: u8, b: u8, c: u8) -> Vec<u8> {
        encode(op, Operands::Three(a, b, c))
    }

    pub fn li(r: u8, imm: u64) -> Vec<u8> {
        encode(Opcode::Li, Operands::Imm(r, imm))
    }
}
