//! Byte-addressable persistent storage interface.
//!
//! Every persisted structure (log ring, alarm gates, network settings)
//! talks to a [`PersistentRegion`]. The device adapter implements it for
//! the whole EEPROM; [`Window`] narrows it to one structure's slice so
//! offsets inside each store start at zero.

use crate::app::ports::StorageError;

/// Value of a never-written EEPROM cell.
pub const ERASED: u8 = 0xFF;

pub trait PersistentRegion {
    /// Size of the region in bytes.
    fn size(&self) -> usize;

    /// Fill `buf` from `offset`.
    fn read_at(&self, offset: usize, buf: &mut [u8]) -> Result<(), StorageError>;

    /// Write `bytes` at `offset`. Returns once the bytes are durable.
    fn write_at(&mut self, offset: usize, bytes: &[u8]) -> Result<(), StorageError>;
}

/// Reject accesses that would cross the end of a region of `size` bytes.
pub fn check_bounds(offset: usize, len: usize, size: usize) -> Result<(), StorageError> {
    match offset.checked_add(len) {
        Some(end) if end <= size => Ok(()),
        _ => Err(StorageError::OutOfBounds { offset, len }),
    }
}

/// A fixed sub-range `[base, base + size)` of another region.
pub struct Window<'a> {
    inner: &'a mut dyn PersistentRegion,
    base: usize,
    size: usize,
}

impl<'a> Window<'a> {
    pub fn new(inner: &'a mut dyn PersistentRegion, base: usize, size: usize) -> Self {
        Self { inner, base, size }
    }
}

impl PersistentRegion for Window<'_> {
    fn size(&self) -> usize {
        self.size
    }

    fn read_at(&self, offset: usize, buf: &mut [u8]) -> Result<(), StorageError> {
        check_bounds(offset, buf.len(), self.size)?;
        self.inner.read_at(self.base + offset, buf)
    }

    fn write_at(&mut self, offset: usize, bytes: &[u8]) -> Result<(), StorageError> {
        check_bounds(offset, bytes.len(), self.size)?;
        self.inner.write_at(self.base + offset, bytes)
    }
}

/// RAM-backed region, erased on creation. Used by tests and the fuzz
/// harness; counts writes so durability can be asserted.
#[derive(Debug, Clone)]
pub struct MemRegion {
    bytes: Vec<u8>,
    writes: usize,
}

impl MemRegion {
    pub fn new(size: usize) -> Self {
        Self {
            bytes: vec![ERASED; size],
            writes: 0,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl PersistentRegion for MemRegion {
    fn size(&self) -> usize {
        self.bytes.len()
    }

    fn read_at(&self, offset: usize, buf: &mut [u8]) -> Result<(), StorageError> {
        check_bounds(offset, buf.len(), self.bytes.len())?;
        buf.copy_from_slice(&self.bytes[offset..offset + buf.len()]);
        Ok(())
    }

    fn write_at(&mut self, offset: usize, bytes: &[u8]) -> Result<(), StorageError> {
        check_bounds(offset, bytes.len(), self.bytes.len())?;
        self.bytes[offset..offset + bytes.len()].copy_from_slice(bytes);
        self.writes += 1;
        Ok(())
    }
}
