//! Capacity summary table: for each reached threshold, how many days the
//! flow was available and over which periods.

use crate::period::period_label;
use crate::threshold::{extract_runs, ThresholdRun, ThresholdRunMap};
use itertools::Itertools;
use jdy_core::{Result, Series};
use serde::Serialize;

/// One row of the capacity summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapacityRow {
    pub capacity: f64,
    /// Dates at or above `capacity`, across all runs.
    pub days: usize,
    /// Run labels joined with ", ".
    pub period: String,
    #[serde(skip)]
    pub runs: Vec<ThresholdRun>,
}

impl CapacityRow {
    fn from_runs(capacity: f64, runs: &[ThresholdRun]) -> CapacityRow {
        CapacityRow {
            capacity,
            days: runs.iter().map(|r| r.duration_days as usize).sum(),
            period: runs.iter().map(ThresholdRun::label).join(", "),
            runs: runs.to_vec(),
        }
    }

    /// Label spanning the first to the last qualifying date, ignoring any
    /// gaps between runs.
    pub fn envelope_label(&self) -> Option<String> {
        let first = self.runs.first()?;
        let last = self.runs.last()?;
        Some(period_label(&first.start_date, &last.end_date))
    }
}

/// Capacity summary for one junction, rows ascending by capacity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdSummary {
    pub junction: String,
    pub rows: Vec<CapacityRow>,
}

impl ThresholdSummary {
    pub fn from_runs(junction: impl Into<String>, runs: &ThresholdRunMap) -> ThresholdSummary {
        ThresholdSummary {
            junction: junction.into(),
            rows: runs
                .iter()
                .map(|(capacity, runs)| CapacityRow::from_runs(capacity, runs))
                .collect(),
        }
    }

    /// Rows from the highest capacity down, as listed beside a chart.
    pub fn rows_descending(&self) -> impl Iterator<Item = &CapacityRow> {
        self.rows.iter().rev()
    }

    pub fn row(&self, capacity: f64) -> Option<&CapacityRow> {
        self.rows
            .iter()
            .find(|row| (row.capacity - capacity).abs() < 1e-9)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Extract runs for `thresholds` and summarize them.
pub fn summarize(series: &Series, thresholds: &[f64], cap: f64) -> Result<ThresholdSummary> {
    let runs = extract_runs(series, thresholds, cap)?;
    Ok(ThresholdSummary::from_runs(series.name(), &runs))
}
