//! Persisted alarm thresholds.
//!
//! Four consecutive `i16` little-endian values, whole degrees Fahrenheit,
//! expected in ascending order. They are stored as entered and never
//! re-sorted.

use log::warn;

use super::region::{ERASED, PersistentRegion};
use crate::app::ports::StorageError;

pub const GATE_COUNT: usize = 4;
const ENCODED_LEN: usize = GATE_COUNT * 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlarmGates([i16; GATE_COUNT]);

impl AlarmGates {
    pub const fn new(gates: [i16; GATE_COUNT]) -> Self {
        Self(gates)
    }

    /// Read the gates; an erased block falls back to `defaults`, which are
    /// written back so the next boot finds them.
    pub fn load(
        region: &mut dyn PersistentRegion,
        defaults: [i16; GATE_COUNT],
    ) -> Result<Self, StorageError> {
        let mut raw = [0u8; ENCODED_LEN];
        region.read_at(0, &mut raw)?;

        if raw.iter().all(|&b| b == ERASED) {
            warn!("gates: none stored, using defaults {:?}", defaults);
            let gates = Self(defaults);
            gates.store(region)?;
            return Ok(gates);
        }

        let mut gates = [0i16; GATE_COUNT];
        for (g, pair) in gates.iter_mut().zip(raw.chunks_exact(2)) {
            *g = i16::from_le_bytes([pair[0], pair[1]]);
        }
        Ok(Self(gates))
    }

    pub fn store(&self, region: &mut dyn PersistentRegion) -> Result<(), StorageError> {
        let mut raw = [0u8; ENCODED_LEN];
        for (pair, g) in raw.chunks_exact_mut(2).zip(self.0) {
            pair.copy_from_slice(&g.to_le_bytes());
        }
        region.write_at(0, &raw)
    }

    pub fn as_array(&self) -> [i16; GATE_COUNT] {
        self.0
    }

    /// Replace one gate. Returns `false` for an index past the last gate.
    pub fn set(&mut self, index: usize, value: i16) -> bool {
        match self.0.get_mut(index) {
            Some(g) => {
                *g = value;
                true
            }
            None => false,
        }
    }

    pub fn is_ascending(&self) -> bool {
        self.0.windows(2).all(|w| w[0] <= w[1])
    }
}
