//! Host time adapters.
//!
//! - [`MonotonicClock`] drives the poll loop's interval timers from
//!   `std::time::Instant`.
//! - [`SoftRtc`] stands in for the battery-backed RTC chip: it follows the
//!   host wall clock, shifted by whatever offset the last `SET TIME` or
//!   `SET DATE` introduced.

use std::time::Instant;

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use log::{info, warn};

use crate::app::ports::ClockPort;
use crate::drivers::rtc::DateTime;

/// Milliseconds since the adapter was created.
pub struct MonotonicClock {
    start: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

#[derive(Debug, Default)]
pub struct SoftRtc {
    offset: TimeDelta,
}

impl SoftRtc {
    pub fn new() -> Self {
        Self::default()
    }

    fn wall() -> NaiveDateTime {
        Local::now().naive_local()
    }
}

impl ClockPort for SoftRtc {
    fn now(&mut self) -> DateTime {
        to_rtc(Self::wall() + self.offset)
    }

    fn set(&mut self, ts: DateTime) {
        let Some(target) = from_rtc(&ts) else {
            warn!("rtc: refusing unrepresentable time {}", ts);
            return;
        };
        self.offset = target - Self::wall();
        info!("rtc: set to {} (offset {}s)", ts, self.offset.num_seconds());
    }
}

/// Two-digit years only; anything outside 2000..=2099 is clamped.
pub fn to_rtc(t: NaiveDateTime) -> DateTime {
    DateTime {
        year: (t.year() - 2000).clamp(0, 99) as u8,
        month: t.month() as u8,
        day: t.day() as u8,
        weekday: t.weekday().number_from_monday() as u8,
        hour: t.hour() as u8,
        minute: t.minute() as u8,
        second: t.second() as u8,
    }
}

pub fn from_rtc(ts: &DateTime) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(
        i32::from(ts.full_year()),
        u32::from(ts.month),
        u32::from(ts.day),
    )?
    .and_hms_opt(
        u32::from(ts.hour),
        u32::from(ts.minute),
        u32::from(ts.second),
    )
}
