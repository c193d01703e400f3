//! File-backed EEPROM adapter.
//!
//! Implements [`PersistentRegion`] over a fixed-size image file. Reads are
//! served from an in-memory copy; every write goes to the file and is
//! synced before returning, matching the byte-level durability of the
//! real part.
//!
//! A missing or short image is extended with erased (`0xFF`) bytes, so a
//! fresh file behaves like a never-programmed device.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use log::{info, warn};

use crate::app::ports::StorageError;
use crate::storage::region::{ERASED, PersistentRegion, check_bounds};

pub struct FileEeprom {
    image: Vec<u8>,
    file: File,
}

impl FileEeprom {
    /// Open (or create) the image at `path`, sized to `size` bytes.
    pub fn open(path: impl AsRef<Path>, size: usize) -> std::io::Result<Self> {
        let path = path.as_ref();
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        let mut image = Vec::with_capacity(size);
        file.read_to_end(&mut image)?;
        let stored = image.len();

        if stored != size {
            if stored > size {
                warn!(
                    "eeprom: {} is {} bytes, only the first {} are used",
                    path.display(),
                    stored,
                    size
                );
            }
            image.resize(size, ERASED);
            file.seek(SeekFrom::Start(0))?;
            file.write_all(&image)?;
            file.set_len(size as u64)?;
            file.sync_all()?;
        }

        info!(
            "eeprom: {} ({} bytes, {} loaded)",
            path.display(),
            size,
            stored.min(size)
        );
        Ok(Self { image, file })
    }

    fn persist(&mut self, offset: usize, bytes: &[u8]) -> std::io::Result<()> {
        self.file.seek(SeekFrom::Start(offset as u64))?;
        self.file.write_all(bytes)?;
        self.file.sync_data()
    }

    /// Re-read `offset..end` from the file into the image.
    fn reload(&mut self, offset: usize, end: usize) -> std::io::Result<()> {
        self.file.seek(SeekFrom::Start(offset as u64))?;
        self.file.read_exact(&mut self.image[offset..end])
    }
}

impl PersistentRegion for FileEeprom {
    fn size(&self) -> usize {
        self.image.len()
    }

    fn read_at(&self, offset: usize, buf: &mut [u8]) -> Result<(), StorageError> {
        check_bounds(offset, buf.len(), self.image.len())?;
        buf.copy_from_slice(&self.image[offset..offset + buf.len()]);
        Ok(())
    }

    fn write_at(&mut self, offset: usize, bytes: &[u8]) -> Result<(), StorageError> {
        check_bounds(offset, bytes.len(), self.image.len())?;
        let end = offset + bytes.len();
        if let Err(e) = self.persist(offset, bytes) {
            warn!("eeprom: write of {} bytes at {} failed: {}", bytes.len(), offset, e);
            // A partial write may have reached the file.
            if let Err(e) = self.reload(offset, end) {
                warn!("eeprom: bytes {}..{} may differ from the file: {}", offset, end, e);
            }
            return Err(StorageError::Io);
        }
        self.image[offset..end].copy_from_slice(bytes);
        Ok(())
    }
}
