//! Consecutive-day date ranges.

use chrono::{NaiveDate, TimeDelta};

/// Every date from `.0` through `.1`, both ends included. Empty when the
/// end precedes the start.
#[derive(Clone, Eq, PartialEq, Copy, Debug)]
pub struct DateRange(pub NaiveDate, pub NaiveDate);

impl DateRange {
    /// The `len` consecutive days starting at `start`.
    pub fn days_from(start: NaiveDate, len: usize) -> DateRange {
        match len {
            0 => DateRange(start, start - TimeDelta::days(1)),
            n => DateRange(start, start + TimeDelta::days(n as i64 - 1)),
        }
    }

    /// Number of days in the range, zero when the end precedes the start.
    pub fn num_days(&self) -> i64 {
        ((self.1 - self.0).num_days() + 1).max(0)
    }
}

impl Iterator for DateRange {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        if self.0 > self.1 {
            return None;
        }
        let current = self.0;
        match current.succ_opt() {
            Some(next) => self.0 = next,
            // last representable date: close the range after yielding it
            None => self.1 = current.pred_opt()?,
        }
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.num_days() as usize;
        (n, Some(n))
    }
}
