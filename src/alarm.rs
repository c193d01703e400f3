//! Temperature alarm evaluator.
//!
//! Classifies a reading against four ascending gates into one of five
//! ordinal levels:
//!
//! ```text
//!   reading ≤ g0        → MajorUnder (-2)
//!   g0 < reading ≤ g1   → MinorUnder (-1)
//!   g1 < reading ≤ g2   → Comfortable (0)
//!   g2 < reading ≤ g3   → MinorOver  (+1)
//!   g3 < reading        → MajorOver  (+2)
//! ```
//!
//! Only a change of level is reported, once, to the [`AlarmNotifier`].
//! The gates are read as given; an unsorted set yields whatever the
//! comparison chain produces.

use log::info;

use crate::app::ports::{AlarmNotifier, Urgency};
use crate::drivers::led_bank::Rgb;
use crate::storage::gates::GATE_COUNT;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(i8)]
pub enum AlarmLevel {
    MajorUnder = -2,
    MinorUnder = -1,
    Comfortable = 0,
    MinorOver = 1,
    MajorOver = 2,
}

impl AlarmLevel {
    pub fn classify(reading: i16, gates: &[i16; GATE_COUNT]) -> Self {
        if reading <= gates[0] {
            Self::MajorUnder
        } else if reading <= gates[1] {
            Self::MinorUnder
        } else if reading <= gates[2] {
            Self::Comfortable
        } else if reading <= gates[3] {
            Self::MinorOver
        } else {
            Self::MajorOver
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::MajorUnder => "Major Under",
            Self::MinorUnder => "Minor Under",
            Self::Comfortable => "Comfortable",
            Self::MinorOver => "Minor Over",
            Self::MajorOver => "Major Over",
        }
    }

    /// Alarm light colour: purple, blue, green, orange, red.
    pub fn colour(self) -> Rgb {
        match self {
            Self::MajorUnder => (40, 0, 40),
            Self::MinorUnder => (0, 0, 50),
            Self::Comfortable => (0, 50, 0),
            Self::MinorOver => (50, 25, 0),
            Self::MajorOver => (100, 0, 0),
        }
    }

    pub fn urgency(self) -> Urgency {
        match self {
            Self::Comfortable => Urgency::Calm,
            _ => Urgency::Attention,
        }
    }
}

/// Result of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Changed(AlarmLevel),
    Unchanged,
}

#[derive(Debug)]
pub struct AlarmEvaluator {
    level: AlarmLevel,
}

impl Default for AlarmEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl AlarmEvaluator {
    pub const fn new() -> Self {
        Self {
            level: AlarmLevel::Comfortable,
        }
    }

    pub fn level(&self) -> AlarmLevel {
        self.level
    }

    /// Classify `reading_f` (whole degrees Fahrenheit) and notify on change.
    pub fn evaluate(
        &mut self,
        reading_f: i16,
        gates: &[i16; GATE_COUNT],
        notifier: &mut dyn AlarmNotifier,
    ) -> Transition {
        let level = AlarmLevel::classify(reading_f, gates);
        if level == self.level {
            return Transition::Unchanged;
        }

        info!(
            "alarm: {} -> {} at {}°F",
            self.level.description(),
            level.description(),
            reading_f
        );
        self.level = level;
        notifier.alarm_changed(level.description(), level.colour(), level.urgency());
        Transition::Changed(level)
    }
}
