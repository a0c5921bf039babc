/*!
Memory module: the machine's single flat, byte-addressed memory image.

Address model:
- Addresses are unsigned 64-bit byte offsets into one contiguous buffer.
- No mirroring, relocation, or segmentation: code, data, the stack, and the
  interrupt-vector table all share this space.
- Words are 8 bytes, big-endian (most significant byte at the lowest address).

Every accessor is bounds-checked. An access that touches any byte outside
`[0, size)` yields `FaultKind::AddressOutOfRange` instead of wrapping.
*/

use std::ops::Range;

use crate::error::FaultKind;

/// Size of one machine word in bytes.
pub const WORD_BYTES: u64 = 8;

/// Owned, zero-initialized byte buffer with checked word access.
#[derive(Clone)]
pub struct Memory {
    data: Vec<u8>,
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memory").field("size", &self.data.len()).finish()
    }
}

impl Memory {
    /// Allocate `size` bytes of zeroed memory.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0; size],
        }
    }

    /// Total size in bytes.
    #[inline]
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// Resolve `[addr, addr + len)` to a buffer range or fault.
    #[inline]
    fn range(&self, addr: u64, len: u64) -> Result<Range<usize>, FaultKind> {
        let fault = || FaultKind::AddressOutOfRange {
            addr,
            len,
            size: self.size(),
        };
        let end = addr.checked_add(len).ok_or_else(fault)?;
        if end > self.size() {
            return Err(fault());
        }
        // Both bounds are <= data.len(), which already fits in usize.
        Ok(addr as usize..end as usize)
    }

    #[inline]
    pub fn read_u8(&self, addr: u64) -> Result<u8, FaultKind> {
        let r = self.range(addr, 1)?;
        Ok(self.data[r.start])
    }

    #[inline]
    pub fn write_u8(&mut self, addr: u64, value: u8) -> Result<(), FaultKind> {
        let r = self.range(addr, 1)?;
        self.data[r.start] = value;
        Ok(())
    }

    /// Read the big-endian word at `[addr, addr + 8)`.
    #[inline]
    pub fn read_word(&self, addr: u64) -> Result<u64, FaultKind> {
        let r = self.range(addr, WORD_BYTES)?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(&self.data[r]);
        Ok(u64::from_be_bytes(buf))
    }

    /// Write `value` big-endian to `[addr, addr + 8)`.
    #[inline]
    pub fn write_word(&mut self, addr: u64, value: u64) -> Result<(), FaultKind> {
        let r = self.range(addr, WORD_BYTES)?;
        self.data[r].copy_from_slice(&value.to_be_bytes());
        Ok(())
    }

    /// Borrow `len` bytes starting at `addr`.
    #[inline]
    pub fn slice(&self, addr: u64, len: u64) -> Result<&[u8], FaultKind> {
        let r = self.range(addr, len)?;
        Ok(&self.data[r])
    }

    /// Copy a program image to offset 0. Bytes past the image keep their value.
    pub fn load_image(&mut self, image: &[u8]) -> Result<(), FaultKind> {
        let r = self.range(0, image.len() as u64)?;
        self.data[r].copy_from_slice(image);
        Ok(())
    }

    /// Expose the whole buffer (read-only). Useful for diagnostics or hashing.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}
