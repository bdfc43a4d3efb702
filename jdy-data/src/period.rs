//! Human-readable period labels such as "Early Jun – Late Oct".

use chrono::{Datelike, NaiveDate};
use std::fmt;

/// Third of a month a day falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonthPosition {
    /// Days 1 to 10
    Early,
    /// Days 11 to 20
    Mid,
    /// Day 21 to month end
    Late,
}

impl MonthPosition {
    pub fn of(date: &NaiveDate) -> MonthPosition {
        match date.day() {
            1..=10 => MonthPosition::Early,
            11..=20 => MonthPosition::Mid,
            _ => MonthPosition::Late,
        }
    }
}

impl fmt::Display for MonthPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MonthPosition::Early => "Early",
            MonthPosition::Mid => "Mid",
            MonthPosition::Late => "Late",
        };
        f.write_str(s)
    }
}

/// "Early Jun", "Late Oct", ...
pub fn position_label(date: &NaiveDate) -> String {
    format!("{} {}", MonthPosition::of(date), date.format("%b"))
}

/// Label for the period from `start` to `end`, collapsed to a single
/// position when both ends land in the same third of the same month.
pub fn period_label(start: &NaiveDate, end: &NaiveDate) -> String {
    let first = position_label(start);
    let last = position_label(end);
    if first == last {
        first
    } else {
        format!("{first} – {last}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap()
    }

    #[test]
    fn test_month_position_boundaries() {
        assert_eq!(MonthPosition::of(&date(6, 1)), MonthPosition::Early);
        assert_eq!(MonthPosition::of(&date(6, 10)), MonthPosition::Early);
        assert_eq!(MonthPosition::of(&date(6, 11)), MonthPosition::Mid);
        assert_eq!(MonthPosition::of(&date(6, 20)), MonthPosition::Mid);
        assert_eq!(MonthPosition::of(&date(6, 21)), MonthPosition::Late);
        assert_eq!(MonthPosition::of(&date(10, 31)), MonthPosition::Late);
    }

    #[test]
    fn test_period_label() {
        assert_eq!(period_label(&date(6, 3), &date(10, 25)), "Early Jun – Late Oct");
        assert_eq!(period_label(&date(7, 12), &date(7, 25)), "Mid Jul – Late Jul");
        assert_eq!(period_label(&date(7, 12), &date(7, 18)), "Mid Jul");
        // same third, different month
        assert_eq!(period_label(&date(6, 2), &date(7, 2)), "Early Jun – Early Jul");
    }
}
