#![doc = r#"
Bus module: façade over the machine's memory and its single output device.

Modules and responsibilities
- Bus: public façade implemented directly in this module. Every CPU-visible
  access (instruction fetch, stack traffic, vector lookups, loads/stores) goes
  through it so bounds checks live in one place.
- memory: flat big-endian memory image with checked byte/word accessors.
- console: byte sink behind the character-output system call.

The CPU never touches `Memory` directly; handlers receive `&mut Bus`.
"#]

pub mod console;
pub mod memory;

pub use console::Console;
pub use memory::{Memory, WORD_BYTES};

use crate::error::FaultKind;

#[derive(Debug)]
pub struct Bus {
    memory: Memory,
    console: Console,
}

impl Bus {
    /// Zeroed memory of `memory_size` bytes, console on stdout.
    pub fn new(memory_size: usize) -> Self {
        Self::with_console(memory_size, Console::stdout())
    }

    pub fn with_console(memory_size: usize, console: Console) -> Self {
        Self {
            memory: Memory::new(memory_size),
            console,
        }
    }

    // ---------------------------------------------------------------------
    // CPU-visible accessors
    // ---------------------------------------------------------------------

    #[inline]
    pub fn read(&self, addr: u64) -> Result<u8, FaultKind> {
        self.memory.read_u8(addr)
    }

    #[inline]
    pub fn write(&mut self, addr: u64, value: u8) -> Result<(), FaultKind> {
        self.memory.write_u8(addr, value)
    }

    #[inline]
    pub fn read_word(&self, addr: u64) -> Result<u64, FaultKind> {
        self.memory.read_word(addr)
    }

    #[inline]
    pub fn write_word(&mut self, addr: u64, value: u64) -> Result<(), FaultKind> {
        self.memory.write_word(addr, value)
    }

    /// Borrow the `len` instruction bytes at `addr`.
    #[inline]
    pub fn fetch(&self, addr: u64, len: u64) -> Result<&[u8], FaultKind> {
        self.memory.slice(addr, len)
    }

    /// Write one byte to the console device.
    #[inline]
    pub fn emit(&mut self, byte: u8) -> Result<(), FaultKind> {
        self.console.emit(byte)
    }

    // ---------------------------------------------------------------------
    // Integration helpers
    // ---------------------------------------------------------------------

    #[inline]
    pub fn size(&self) -> u64 {
        self.memory.size()
    }

    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    pub fn console_mut(&mut self) -> &mut Console {
        &mut self.console
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::CaptureSink;

    #[test]
    fn emit_reaches_console_sink() {
        let sink = CaptureSink::default();
        let mut bus = Bus::with_console(16, Console::new(sink.clone()));
        bus.emit(b'h').unwrap();
        bus.emit(b'i').unwrap();
        assert_eq!(sink.contents(), b"hi");
    }

    #[test]
    fn fetch_is_bounds_checked() {
        let mut bus = Bus::with_console(4, Console::new(std::io::sink()));
        bus.write(3, 0xE1).unwrap();
        assert_eq!(bus.fetch(3, 1).unwrap(), &[0xE1]);
        assert!(matches!(
            bus.fetch(3, 10),
            Err(FaultKind::AddressOutOfRange { addr: 3, len: 10, size: 4 })
        ));
    }
}
