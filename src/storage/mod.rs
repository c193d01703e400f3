//! Persistent storage: EEPROM layout and the structures kept in it.
//!
//! | Bytes      | Contents                                   |
//! |------------|--------------------------------------------|
//! | 0 .. 247   | [`log_store`] header + 27 log entries      |
//! | 247 .. 273 | [`settings`] network settings blob         |
//! | 273 .. 281 | [`gates`] four alarm thresholds (i16 LE)   |
//! | 281 ..     | unused                                     |

pub mod gates;
pub mod log_store;
pub mod region;
pub mod settings;

pub use region::{MemRegion, PersistentRegion, Window};

/// Size of the EEPROM device.
pub const EEPROM_SIZE: usize = 1024;

pub const LOG_BASE: usize = 0;
pub const LOG_LEN: usize = 247;

pub const NETWORK_BASE: usize = LOG_BASE + LOG_LEN;
pub const NETWORK_LEN: usize = 26;

pub const GATES_BASE: usize = NETWORK_BASE + NETWORK_LEN;
pub const GATES_LEN: usize = 8;

pub fn log_window(dev: &mut dyn PersistentRegion) -> Window<'_> {
    Window::new(dev, LOG_BASE, LOG_LEN)
}

pub fn network_window(dev: &mut dyn PersistentRegion) -> Window<'_> {
    Window::new(dev, NETWORK_BASE, NETWORK_LEN)
}

pub fn gates_window(dev: &mut dyn PersistentRegion) -> Window<'_> {
    Window::new(dev, GATES_BASE, GATES_LEN)
}
