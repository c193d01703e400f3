//! Typed commands produced by the interpreter.
//!
//! The [`decode`](crate::interpreter::dispatch::decode) stage turns a
//! [`TokenSequence`](crate::interpreter::TokenSequence) into one of these;
//! [`AppService`](super::service::AppService) then executes it against the
//! live subsystems. Operands are carried exactly as entered; range checks
//! happen at execution so the diagnostic can name the offending field.

use crate::drivers::led_bank::{LightMode, Rgb};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `LED` / `RGB`: print every light's state and the blink rate.
    LedStatus,
    /// `LED ON|OFF|BLINK` on the user light.
    LedMode(LightMode),
    /// `LED RED|GREEN|YELLOW` or `RGB r g b` on the user light.
    LedColour(Rgb),

    /// `DHT`: latest reading and display scale.
    DhtStatus,
    /// `DHT MONITOR`: print every sample until a key is pressed.
    DhtMonitor,
    /// `DHT LOG`: dump the persisted history, oldest first.
    LogDump,
    /// `DHT LOG INFO`: entry count, next write offset, min/max.
    LogInfo,
    /// `DHT LOG CLEAR`
    LogClear,
    /// `DHT ALARM`: gates and current alarm state.
    AlarmStatus,

    /// `TIME` / `DATE`
    ClockStatus,

    SetTime { hour: u8, minute: u8, second: u8 },
    /// Year is two digits, 2000-based.
    SetDate { year: u8, month: u8, day: u8 },
    SetBlinkRate(u16),
    /// 0 selects Celsius, 1 Fahrenheit.
    SetScale(u8),
    SetAlarmGate { index: u8, value: u16 },

    Version,
    Help,
}

impl Command {
    /// Whether the command must come from the local console.
    pub const fn interactive_only(&self) -> bool {
        matches!(self, Self::DhtMonitor)
    }
}
