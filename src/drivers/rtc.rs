//! Real-time clock model: timestamp type and range-checked updates.
//!
//! The chip itself sits behind [`ClockPort`](crate::app::ports::ClockPort);
//! this module only decides whether a requested time or date is valid and
//! builds the timestamp to write.

use core::fmt;

use chrono::{Datelike, NaiveDate};

/// Packed size of a timestamp inside a log entry.
pub const ENCODED_LEN: usize = 7;

/// Calendar timestamp as kept by the RTC chip.
///
/// `year` counts from 2000; `weekday` is 1 (Monday) through 7 (Sunday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateTime {
    pub year: u8,
    pub month: u8,
    pub day: u8,
    pub weekday: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl DateTime {
    /// Storage order: second, minute, hour, weekday, day, month, year.
    pub const fn to_bytes(&self) -> [u8; ENCODED_LEN] {
        [
            self.second,
            self.minute,
            self.hour,
            self.weekday,
            self.day,
            self.month,
            self.year,
        ]
    }

    pub const fn from_bytes(b: &[u8; ENCODED_LEN]) -> Self {
        Self {
            second: b[0],
            minute: b[1],
            hour: b[2],
            weekday: b[3],
            day: b[4],
            month: b[5],
            year: b[6],
        }
    }

    pub fn full_year(&self) -> u16 {
        2000 + u16::from(self.year)
    }

    /// `yyyy/mm/dd`
    pub fn date(&self) -> impl fmt::Display + '_ {
        DatePart(self)
    }

    /// `hh:mm:ss`
    pub fn time(&self) -> impl fmt::Display + '_ {
        TimePart(self)
    }
}

struct DatePart<'a>(&'a DateTime);

impl fmt::Display for DatePart<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ts = self.0;
        write!(f, "{:04}/{:02}/{:02}", ts.full_year(), ts.month, ts.day)
    }
}

struct TimePart<'a>(&'a DateTime);

impl fmt::Display for TimePart<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ts = self.0;
        write!(f, "{:02}:{:02}:{:02}", ts.hour, ts.minute, ts.second)
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date(), self.time())
    }
}

/// A rejected time or date, carrying the candidate that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidDateTime(pub DateTime);

impl fmt::Display for InvalidDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid Date-Time: {}", self.0)
    }
}

/// Replace the time of day in `base`.
pub fn with_time(base: DateTime, hour: u8, minute: u8, second: u8) -> Result<DateTime, InvalidDateTime> {
    let ts = DateTime {
        hour,
        minute,
        second,
        ..base
    };
    if hour > 23 || minute > 59 || second > 59 {
        return Err(InvalidDateTime(ts));
    }
    Ok(ts)
}

/// Replace the calendar date in `base`. `year` is two digits (1–99).
///
/// The weekday is recomputed from the new date.
pub fn with_date(base: DateTime, year: u8, month: u8, day: u8) -> Result<DateTime, InvalidDateTime> {
    let mut ts = DateTime {
        year,
        month,
        day,
        ..base
    };
    if !(1..=99).contains(&year) {
        return Err(InvalidDateTime(ts));
    }
    let date = NaiveDate::from_ymd_opt(
        2000 + i32::from(year),
        u32::from(month),
        u32::from(day),
    )
    .ok_or(InvalidDateTime(ts))?;
    ts.weekday = date.weekday().number_from_monday() as u8;
    Ok(ts)
}
