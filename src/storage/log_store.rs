//! Circular log of sensor readings kept directly in EEPROM.
//!
//! ```text
//!  0      2      4                                              247
//!  ┌──────┬──────┬────────┬────────┬─────┬─────────┐
//!  │ next │ count│ slot 0 │ slot 1 │ ... │ slot 26 │
//!  └──────┴──────┴────────┴────────┴─────┴─────────┘
//!   u16 LE u16 LE  9 bytes each
//! ```
//!
//! The header is rewritten on every append and clear, so after a power
//! loss only the payload of the entry being written can be inconsistent.
//! Once full, the slot at `next` holds the oldest surviving entry.
//!
//! Like the other region stores, [`CircularLog`] keeps only the
//! bookkeeping; the region is passed in on every call.

use log::{debug, warn};

use super::region::PersistentRegion;
use crate::app::ports::StorageError;
use crate::drivers::rtc::{self, DateTime};

/// Total bytes owned by the log, header included.
pub const REGION_SIZE: usize = super::LOG_LEN;
pub const HEADER_SIZE: usize = 4;
pub const ENTRY_SIZE: usize = rtc::ENCODED_LEN + 2;
pub const CAPACITY: usize = (REGION_SIZE - HEADER_SIZE) / ENTRY_SIZE;

const DATA_START: usize = HEADER_SIZE;
const DATA_SPAN: usize = CAPACITY * ENTRY_SIZE;

/// One logged sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: DateTime,
    /// Whole degrees Celsius.
    pub temperature_c: i8,
    pub humidity_pct: u8,
}

impl LogEntry {
    pub fn to_bytes(&self) -> [u8; ENTRY_SIZE] {
        let mut out = [0u8; ENTRY_SIZE];
        out[..rtc::ENCODED_LEN].copy_from_slice(&self.timestamp.to_bytes());
        out[rtc::ENCODED_LEN] = self.temperature_c as u8;
        out[rtc::ENCODED_LEN + 1] = self.humidity_pct;
        out
    }

    pub fn from_bytes(b: &[u8; ENTRY_SIZE]) -> Self {
        let mut ts = [0u8; rtc::ENCODED_LEN];
        ts.copy_from_slice(&b[..rtc::ENCODED_LEN]);
        Self {
            timestamp: DateTime::from_bytes(&ts),
            temperature_c: b[rtc::ENCODED_LEN] as i8,
            humidity_pct: b[rtc::ENCODED_LEN + 1],
        }
    }
}

/// Aggregates over the stored entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogStats {
    pub min_temperature_c: i8,
    pub max_temperature_c: i8,
    pub min_humidity_pct: u8,
    pub max_humidity_pct: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircularLog {
    write_offset: usize,
    count: usize,
}

impl Default for CircularLog {
    fn default() -> Self {
        Self {
            write_offset: DATA_START,
            count: 0,
        }
    }
}

impl CircularLog {
    /// Load the header from `region`. An erased or inconsistent header is
    /// reset (the whole region is cleared) with a warning.
    pub fn open(region: &mut dyn PersistentRegion) -> Result<Self, StorageError> {
        let mut header = [0u8; HEADER_SIZE];
        region.read_at(0, &mut header)?;
        let write_offset = usize::from(u16::from_le_bytes([header[0], header[1]]));
        let count = usize::from(u16::from_le_bytes([header[2], header[3]]));

        let log = Self { write_offset, count };
        if log.header_is_valid() {
            debug!("log: {} entries, next slot at {}", count, write_offset);
            return Ok(log);
        }

        warn!(
            "log: invalid header (offset={}, count={}), clearing",
            write_offset, count
        );
        let mut log = Self::default();
        log.clear(region)?;
        Ok(log)
    }

    fn header_is_valid(&self) -> bool {
        let aligned = self.write_offset >= DATA_START
            && (self.write_offset - DATA_START) % ENTRY_SIZE == 0
            && self.write_offset + ENTRY_SIZE <= REGION_SIZE;
        // Until the ring wraps, the next slot follows the last entry.
        let consistent = self.count == CAPACITY
            || self.write_offset == DATA_START + self.count * ENTRY_SIZE;
        aligned && self.count <= CAPACITY && consistent
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub const fn capacity(&self) -> usize {
        CAPACITY
    }

    /// Byte offset, within the log region, of the next slot to be written.
    pub fn write_offset(&self) -> usize {
        self.write_offset
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Write `entry` into the next slot, overwriting the oldest entry once
    /// the ring is full.
    pub fn append(
        &mut self,
        region: &mut dyn PersistentRegion,
        entry: &LogEntry,
    ) -> Result<(), StorageError> {
        region.write_at(self.write_offset, &entry.to_bytes())?;

        let mut next = self.write_offset + ENTRY_SIZE;
        if next + ENTRY_SIZE > REGION_SIZE {
            next = DATA_START;
        }
        let count = (self.count + 1).min(CAPACITY);
        write_header(region, next, count)?;

        self.write_offset = next;
        self.count = count;
        Ok(())
    }

    /// Zero the whole region and reset the header.
    pub fn clear(&mut self, region: &mut dyn PersistentRegion) -> Result<(), StorageError> {
        let mut image = [0u8; REGION_SIZE];
        image[..HEADER_SIZE].copy_from_slice(&header_bytes(DATA_START, 0));
        region.write_at(0, &image)?;
        self.write_offset = DATA_START;
        self.count = 0;
        Ok(())
    }

    /// Entry `i` counted from the oldest, or `None` when `i >= count`.
    pub fn get(
        &self,
        region: &dyn PersistentRegion,
        i: usize,
    ) -> Result<Option<LogEntry>, StorageError> {
        if i >= self.count {
            return Ok(None);
        }
        let mut buf = [0u8; ENTRY_SIZE];
        region.read_at(self.slot_offset(i), &mut buf)?;
        Ok(Some(LogEntry::from_bytes(&buf)))
    }

    /// Entries from oldest to newest.
    pub fn iter<'a>(
        &'a self,
        region: &'a dyn PersistentRegion,
    ) -> impl Iterator<Item = Result<LogEntry, StorageError>> + 'a {
        (0..self.count).map(move |i| -> Result<LogEntry, StorageError> {
            let mut buf = [0u8; ENTRY_SIZE];
            region.read_at(self.slot_offset(i), &mut buf)?;
            Ok(LogEntry::from_bytes(&buf))
        })
    }

    /// Min/max over every stored entry; `None` for an empty log.
    pub fn stats(&self, region: &dyn PersistentRegion) -> Result<Option<LogStats>, StorageError> {
        let mut stats: Option<LogStats> = None;
        for entry in self.iter(region) {
            let e = entry?;
            let s = stats.get_or_insert(LogStats {
                min_temperature_c: e.temperature_c,
                max_temperature_c: e.temperature_c,
                min_humidity_pct: e.humidity_pct,
                max_humidity_pct: e.humidity_pct,
            });
            s.min_temperature_c = s.min_temperature_c.min(e.temperature_c);
            s.max_temperature_c = s.max_temperature_c.max(e.temperature_c);
            s.min_humidity_pct = s.min_humidity_pct.min(e.humidity_pct);
            s.max_humidity_pct = s.max_humidity_pct.max(e.humidity_pct);
        }
        Ok(stats)
    }

    fn slot_offset(&self, i: usize) -> usize {
        let oldest = if self.count == CAPACITY {
            self.write_offset
        } else {
            DATA_START
        };
        let offset = oldest + i * ENTRY_SIZE;
        if offset + ENTRY_SIZE > REGION_SIZE {
            offset - DATA_SPAN
        } else {
            offset
        }
    }
}

fn header_bytes(write_offset: usize, count: usize) -> [u8; HEADER_SIZE] {
    let [o0, o1] = (write_offset as u16).to_le_bytes();
    let [c0, c1] = (count as u16).to_le_bytes();
    [o0, o1, c0, c1]
}

fn write_header(
    region: &mut dyn PersistentRegion,
    write_offset: usize,
    count: usize,
) -> Result<(), StorageError> {
    region.write_at(0, &header_bytes(write_offset, count))
}
