//! Runs of consecutive dates during which a flow series stays at or above a
//! capacity threshold.

use crate::period::period_label;
use chrono::NaiveDate;
use jdy_core::{Result, Series, YieldError};
use log::debug;
use serde::{Deserialize, Serialize};

/// Maximum pickup capacity (MCM); the top of the threshold ladder.
pub const MAX_PICKUP: f64 = 3.0;

/// Spacing of the threshold ladder (MCM).
pub const THRESHOLD_STEP: f64 = 0.1;

/// A maximal run of dates whose value is at or above `threshold`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdRun {
    pub threshold: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Number of observations in the run; calendar days for a daily series.
    pub duration_days: i64,
}

impl ThresholdRun {
    /// "Early Jun – Late Oct" style label for the run.
    pub fn label(&self) -> String {
        period_label(&self.start_date, &self.end_date)
    }
}

/// Inclusive index span into a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct IndexSpan {
    start: usize,
    end: usize,
}

impl IndexSpan {
    fn len(&self) -> usize {
        self.end - self.start + 1
    }
}

/// Maximal spans of consecutive points whose value satisfies `keep`.
/// Missing values never satisfy it.
fn spans_where(series: &Series, keep: impl Fn(f64) -> bool) -> Vec<IndexSpan> {
    let mut spans = Vec::new();
    let mut open: Option<usize> = None;
    for (idx, value) in series.values().enumerate() {
        let inside = value.is_some_and(&keep);
        match (inside, open) {
            (true, None) => open = Some(idx),
            (false, Some(start)) => {
                spans.push(IndexSpan {
                    start,
                    end: idx - 1,
                });
                open = None;
            }
            _ => {}
        }
    }
    if let Some(start) = open {
        spans.push(IndexSpan {
            start,
            end: series.len() - 1,
        });
    }
    spans
}

/// Runs per threshold, ascending by threshold. Only thresholds reached at
/// least once are present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThresholdRunMap {
    entries: Vec<(f64, Vec<ThresholdRun>)>,
}

impl ThresholdRunMap {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, threshold: f64) -> bool {
        self.get(threshold).is_some()
    }

    /// Runs for `threshold`, matched to within rounding noise.
    pub fn get(&self, threshold: f64) -> Option<&[ThresholdRun]> {
        self.entries
            .iter()
            .find(|(t, _)| (t - threshold).abs() < 1e-9)
            .map(|(_, runs)| runs.as_slice())
    }

    pub fn thresholds(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|(t, _)| *t)
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, &[ThresholdRun])> + '_ {
        self.entries.iter().map(|(t, runs)| (*t, runs.as_slice()))
    }

    /// Highest threshold reached, if any.
    pub fn highest(&self) -> Option<f64> {
        self.entries.last().map(|(t, _)| *t)
    }
}

/// For each threshold, every maximal run of dates where `series >= threshold`.
///
/// Thresholds must be strictly increasing; those above `cap` are skipped.
pub fn extract_runs(series: &Series, thresholds: &[f64], cap: f64) -> Result<ThresholdRunMap> {
    if let Some((position, pair)) = thresholds
        .windows(2)
        .enumerate()
        .find(|(_, pair)| !(pair[0] < pair[1]))
    {
        return Err(YieldError::NonMonotonicThresholds {
            position: position + 1,
            previous: pair[0],
            next: pair[1],
        });
    }

    let points = series.points();
    let mut entries = Vec::new();
    for &threshold in thresholds.iter().filter(|t| **t <= cap) {
        let runs: Vec<ThresholdRun> = spans_where(series, |v| v >= threshold)
            .into_iter()
            .map(|span| ThresholdRun {
                threshold,
                start_date: points[span.start].date,
                end_date: points[span.end].date,
                duration_days: span.len() as i64,
            })
            .collect();
        if runs.is_empty() {
            continue;
        }
        debug!(
            "{}: {} run(s) at or above {:.2}",
            series.name(),
            runs.len(),
            threshold
        );
        entries.push((threshold, runs));
    }
    Ok(ThresholdRunMap { entries })
}

/// The ladder `step, 2·step, ...` up to and including `cap`, rounded to
/// strip accumulated floating-point noise (0.30000000000000004 -> 0.3).
pub fn threshold_levels(step: f64, cap: f64) -> Vec<f64> {
    if !(step > 0.0) || !cap.is_finite() || cap < step {
        return Vec::new();
    }
    let count = (cap / step + 1e-9).floor() as usize;
    (1..=count)
        .map(|i| (i as f64 * step * 1e6).round() / 1e6)
        .collect()
}

/// A closed date interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Spans where the series is strictly above `level`; used to shade the
/// stretches where flow exceeds the maximum pickup.
pub fn spans_above(series: &Series, level: f64) -> Vec<DateSpan> {
    let points = series.points();
    spans_where(series, |v| v > level)
        .into_iter()
        .map(|span| DateSpan {
            start: points[span.start].date,
            end: points[span.end].date,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn series(values: &[f64]) -> Series {
        Series::daily("Nikhop", d(1), values.iter().map(|v| Some(*v)).collect())
    }

    #[test]
    fn test_two_runs_including_trailing() {
        let s = series(&[0.2, 0.6, 0.6, 0.1, 0.9]);
        let map = extract_runs(&s, &[0.5], MAX_PICKUP).unwrap();
        let runs = map.get(0.5).unwrap();
        assert_eq!(
            runs,
            &[
                ThresholdRun {
                    threshold: 0.5,
                    start_date: d(2),
                    end_date: d(3),
                    duration_days: 2,
                },
                ThresholdRun {
                    threshold: 0.5,
                    start_date: d(5),
                    end_date: d(5),
                    duration_days: 1,
                },
            ]
        );
    }

    #[test]
    fn test_equality_counts_as_reached() {
        let s = series(&[0.5, 0.4, 0.5]);
        let map = extract_runs(&s, &[0.5], MAX_PICKUP).unwrap();
        assert_eq!(map.get(0.5).unwrap().len(), 2);
    }

    #[test]
    fn test_run_open_at_start_and_end() {
        let s = series(&[1.0, 1.0, 1.0]);
        let map = extract_runs(&s, &[0.5, 1.0], MAX_PICKUP).unwrap();
        let runs = map.get(1.0).unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].start_date, d(1));
        assert_eq!(runs[0].end_date, d(3));
        assert_eq!(runs[0].duration_days, 3);
    }

    #[test]
    fn test_unreached_thresholds_are_absent() {
        let s = series(&[0.2, 0.6]);
        let map = extract_runs(&s, &[0.5, 0.7, 0.9], MAX_PICKUP).unwrap();
        assert_eq!(map.thresholds().collect::<Vec<_>>(), vec![0.5]);
        assert!(!map.contains(0.7));
        assert_eq!(map.highest(), Some(0.5));
    }

    #[test]
    fn test_thresholds_above_cap_skipped() {
        let s = series(&[5.0, 5.0]);
        let map = extract_runs(&s, &[1.0, 3.0, 3.5], MAX_PICKUP).unwrap();
        assert_eq!(map.thresholds().collect::<Vec<_>>(), vec![1.0, 3.0]);
    }

    #[test]
    fn test_missing_values_break_runs() {
        let s = Series::daily("Nikhop", d(1), vec![Some(1.0), None, Some(1.0)]);
        let map = extract_runs(&s, &[0.5], MAX_PICKUP).unwrap();
        assert_eq!(map.get(0.5).unwrap().len(), 2);
    }

    #[test]
    fn test_empty_series() {
        let s = series(&[]);
        let map = extract_runs(&s, &[0.1, 0.2], MAX_PICKUP).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn test_non_monotonic_thresholds() {
        let s = series(&[0.2, 0.6]);
        let err = extract_runs(&s, &[0.5, 0.3, 0.7], MAX_PICKUP).unwrap_err();
        assert_eq!(
            err,
            YieldError::NonMonotonicThresholds {
                position: 1,
                previous: 0.5,
                next: 0.3,
            }
        );
        let err = extract_runs(&s, &[0.5, 0.5], MAX_PICKUP).unwrap_err();
        assert!(matches!(err, YieldError::NonMonotonicThresholds { .. }));
    }

    #[test]
    fn test_runs_are_maximal_and_separated() {
        let values = [0.3, 1.2, 2.5, 0.9, 3.1, 3.2, 0.0, 1.4, 1.6, 2.0];
        let s = series(&values);
        let levels = threshold_levels(THRESHOLD_STEP, MAX_PICKUP);
        let map = extract_runs(&s, &levels, MAX_PICKUP).unwrap();
        let dates: Vec<NaiveDate> = s.dates().collect();
        for (t, runs) in map.iter() {
            for run in runs {
                let start = dates.iter().position(|x| *x == run.start_date).unwrap();
                let end = dates.iter().position(|x| *x == run.end_date).unwrap();
                assert!(values[start..=end].iter().all(|v| *v >= t));
                if start > 0 {
                    assert!(values[start - 1] < t);
                }
                if end + 1 < values.len() {
                    assert!(values[end + 1] < t);
                }
            }
            for pair in runs.windows(2) {
                assert!(pair[1].start_date > pair[0].end_date + chrono::TimeDelta::days(1));
            }
        }
    }

    #[test]
    fn test_threshold_levels() {
        let levels = threshold_levels(THRESHOLD_STEP, MAX_PICKUP);
        assert_eq!(levels.len(), 30);
        assert_eq!(levels[0], 0.1);
        assert_eq!(levels[2], 0.3);
        assert_eq!(levels[29], 3.0);
        assert!(threshold_levels(0.0, 3.0).is_empty());
        assert!(threshold_levels(0.5, 0.2).is_empty());
    }

    #[test]
    fn test_spans_above_is_strict() {
        let s = series(&[3.0, 3.1, 3.2, 3.0, 3.5]);
        let spans = spans_above(&s, MAX_PICKUP);
        assert_eq!(
            spans,
            vec![
                DateSpan { start: d(2), end: d(3) },
                DateSpan { start: d(5), end: d(5) },
            ]
        );
    }

    #[test]
    fn test_run_label() {
        let run = ThresholdRun {
            threshold: 1.0,
            start_date: d(2),
            end_date: NaiveDate::from_ymd_opt(2024, 10, 28).unwrap(),
            duration_days: 149,
        };
        assert_eq!(run.label(), "Early Jun – Late Oct");
    }
}
