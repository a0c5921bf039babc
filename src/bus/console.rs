/*!
Console device: byte sink behind the character-output system call.

The console defaults to the process's standard output. Embedders and tests
may substitute any `std::io::Write` implementation (for example an in-memory
buffer) to capture program output.
*/

use std::io::{self, Write};

use crate::error::FaultKind;

/// Output device written by `INT 1` / selector 1.
pub struct Console {
    sink: Box<dyn Write>,
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console").finish_non_exhaustive()
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::stdout()
    }
}

impl Console {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    pub fn new(sink: impl Write + 'static) -> Self {
        Self {
            sink: Box::new(sink),
        }
    }

    /// Emit one byte.
    #[inline]
    pub fn emit(&mut self, byte: u8) -> Result<(), FaultKind> {
        self.sink
            .write_all(&[byte])
            .map_err(|e| FaultKind::ConsoleWrite(e.to_string()))
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.sink.flush()
    }
}
