//! Actuator and peripheral models driven by the application core.
//!
//! These are pure state machines; the bytes and colours they produce reach
//! the hardware through the port traits in [`app::ports`](crate::app::ports).

pub mod led_bank;
pub mod line_editor;
pub mod rtc;
