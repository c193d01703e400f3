//! Interval timers for the cooperative poll loop.
//!
//! Every timed behaviour (blink, DHT sampling, logging, network polling)
//! owns one [`Interval`]. The loop asks each timer whether it is due
//! against the same monotonically increasing millisecond counter.
//!
//! ```text
//!   now ──▶ Interval::poll(now) ──▶ true  → run the behaviour once
//!                                  false → skip this pass
//! ```

use log::trace;

#[derive(Debug, Clone)]
pub struct Interval {
    label: &'static str,
    period_ms: u64,
    next_due_ms: u64,
}

impl Interval {
    /// A timer that is due on the first poll.
    pub fn new(label: &'static str, period_ms: u64) -> Self {
        Self {
            label,
            period_ms: period_ms.max(1),
            next_due_ms: 0,
        }
    }

    /// `true` at most once per period. A timer that fell more than one
    /// period behind resynchronises to `now_ms` instead of firing a burst.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        if now_ms < self.next_due_ms {
            return false;
        }
        let next = self.next_due_ms.saturating_add(self.period_ms);
        self.next_due_ms = if next <= now_ms {
            trace!("{}: behind by {} ms, resyncing", self.label, now_ms - self.next_due_ms);
            now_ms.saturating_add(self.period_ms)
        } else {
            next
        };
        true
    }
}
