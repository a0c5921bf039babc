/*!
Machine configuration: memory size, stack reservation, interrupt-vector base,
and an optional step limit.

Sources, lowest to highest precedence:
- `MachineConfig::default()` (5 MiB memory, 1024-word stack reservation)
- a TOML file (`MachineConfig::from_file`), any subset of the fields
- command-line overrides applied by the runner binary

Example file:

```toml
memory_size = 1048576
stack_words = 512
interrupt_vector_base = 0x8000
max_steps = 1000000
```

Layout:
- SP starts at the top word slot, `memory_size - 8`; the stack grows down.
- IP defaults to `SP - 8 * stack_words`, directly below the stack
  reservation. The 256-slot vector table must fit in memory.
*/

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::bus::WORD_BYTES;
use crate::cpu::interrupt::VECTOR_COUNT;
use crate::error::ConfigError;

/// Default memory size (5 MiB).
pub const DEFAULT_MEMORY_SIZE: u64 = 5 * 1024 * 1024;
/// Default stack reservation in words.
pub const DEFAULT_STACK_WORDS: u64 = 1024;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MachineConfig {
    /// Total memory size in bytes.
    pub memory_size: u64,
    /// Words reserved for the stack below the top of memory.
    pub stack_words: u64,
    /// Explicit interrupt-vector table base; derived from the stack when unset.
    pub interrupt_vector_base: Option<u64>,
    /// Stop after this many executed instructions.
    pub max_steps: Option<u64>,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            memory_size: DEFAULT_MEMORY_SIZE,
            stack_words: DEFAULT_STACK_WORDS,
            interrupt_vector_base: None,
            max_steps: None,
        }
    }
}

impl MachineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_str(&fs::read_to_string(path)?)
    }

    /// Initial stack pointer: the top word slot of memory.
    #[inline]
    pub fn stack_top(&self) -> u64 {
        self.memory_size - WORD_BYTES
    }

    /// Interrupt-vector base, explicit or directly below the stack reservation.
    pub fn vector_base(&self) -> u64 {
        self.interrupt_vector_base.unwrap_or_else(|| {
            self.stack_top()
                .saturating_sub(self.stack_words.saturating_mul(WORD_BYTES))
        })
    }

    /// Check that memory holds at least one word and the vector table fits.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.memory_size < WORD_BYTES {
            return Err(ConfigError::Invalid(format!(
                "memory_size {} is smaller than one word",
                self.memory_size
            )));
        }
        if usize::try_from(self.memory_size).is_err() {
            return Err(ConfigError::Invalid(format!(
                "memory_size {} is not addressable on this host",
                self.memory_size
            )));
        }
        let reserved = self.stack_words.checked_mul(WORD_BYTES);
        if self.interrupt_vector_base.is_none() && reserved.is_none_or(|r| r > self.stack_top()) {
            return Err(ConfigError::Invalid(format!(
                "stack reservation of {} words does not fit in {} bytes",
                self.stack_words, self.memory_size
            )));
        }
        let table_end = self
            .vector_base()
            .checked_add(VECTOR_COUNT * WORD_BYTES);
        if table_end.is_none_or(|end| end > self.memory_size) {
            return Err(ConfigError::Invalid(format!(
                "interrupt vector table at 0x{:X} does not fit in {} bytes",
                self.vector_base(),
                self.memory_size
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_layout() {
        let c = MachineConfig::default();
        assert_eq!(c.memory_size, 5 * 1024 * 1024);
        assert_eq!(c.stack_top(), 5 * 1024 * 1024 - 8);
        assert_eq!(c.vector_base(), 5 * 1024 * 1024 - 8 - 8 * 1024);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let c = MachineConfig::from_toml_str("memory_size = 65536\nmax_steps = 10\n").unwrap();
        assert_eq!(c.memory_size, 65536);
        assert_eq!(c.stack_words, DEFAULT_STACK_WORDS);
        assert_eq!(c.max_steps, Some(10));
        assert_eq!(c.vector_base(), 65536 - 8 - 8 * 1024);
    }

    #[test]
    fn explicit_vector_base_wins() {
        let c = MachineConfig::from_toml_str("interrupt_vector_base = 0x100").unwrap();
        assert_eq!(c.vector_base(), 0x100);
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(matches!(
            MachineConfig::from_toml_str("memory = 1"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn rejects_layouts_that_do_not_fit() {
        for text in [
            "memory_size = 4",
            "memory_size = 4096\nstack_words = 1024",
            "memory_size = 4096\nstack_words = 16\ninterrupt_vector_base = 4000",
        ] {
            assert!(
                matches!(
                    MachineConfig::from_toml_str(text),
                    Err(ConfigError::Invalid(_))
                ),
                "{text}"
            );
        }
    }
}
