//! Row and column summaries that accompany the dependable yield.

use crate::percentile::{compute_dependable_yield, row_values, select_columns};
use jdy_core::{ObservationTable, Result, Series};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Header of the dependable column on a junction detail sheet.
pub const DEPENDABLE_COLUMN: &str = "75% Dependable";

/// The selected year columns of one junction sheet plus the derived
/// per-date dependable yield, minimum, maximum and mean.
#[derive(Debug, Clone, PartialEq)]
pub struct JunctionDetail {
    pub table: ObservationTable,
    pub dependable: Series,
    pub min: Series,
    pub max: Series,
    pub mean: Series,
}

impl JunctionDetail {
    pub fn build(source: &ObservationTable, percentile: f64, columns: &[&str]) -> Result<Self> {
        let dependable = compute_dependable_yield(source, percentile, columns)?;
        let selected = select_columns(source, columns)?;
        let mut table = ObservationTable::new(source.name(), source.dates().to_vec());
        for (key, values) in columns.iter().zip(&selected) {
            table.push_column(*key, values.to_vec());
        }

        let rows: Vec<Vec<f64>> = (0..source.num_rows())
            .map(|row| row_values(&selected, row))
            .collect();
        let derive = |name: &str, f: fn(&[f64]) -> Option<f64>| {
            Series::new(
                name,
                source.dates().to_vec(),
                rows.iter().map(|r| f(r)).collect(),
            )
        };
        Ok(JunctionDetail {
            table,
            dependable,
            min: derive("Min", min_of)?,
            max: derive("Max", max_of)?,
            mean: derive("Mean", mean_of)?,
        })
    }

    /// The detail sheet: year columns followed by the derived columns.
    pub fn to_table(&self) -> ObservationTable {
        let mut table = self.table.clone();
        table.push_column(DEPENDABLE_COLUMN, self.dependable.values().collect());
        for series in [&self.min, &self.max, &self.mean] {
            table.push_column(series.name(), series.values().collect());
        }
        table
    }
}

fn min_of(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

fn max_of(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

fn mean_of(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Which whole-season figure the overview reports for each junction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverviewMode {
    #[default]
    Max,
    Min,
    Mean,
}

impl FromStr for OverviewMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "max" => Ok(OverviewMode::Max),
            "min" => Ok(OverviewMode::Min),
            "mean" | "average" => Ok(OverviewMode::Mean),
            other => Err(format!("unknown overview mode {other:?}, expected max, min or mean")),
        }
    }
}

impl fmt::Display for OverviewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverviewMode::Max => f.write_str("max"),
            OverviewMode::Min => f.write_str("min"),
            OverviewMode::Mean => f.write_str("mean"),
        }
    }
}

/// Whole-season summary of one junction column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JunctionOverview {
    pub junction: String,
    pub max: f64,
    pub min: f64,
    pub mean: f64,
}

impl JunctionOverview {
    /// `None` if the series has no valid values.
    pub fn from_series(series: &Series) -> Option<JunctionOverview> {
        let values: Vec<f64> = series.values().flatten().filter(|v| !v.is_nan()).collect();
        Some(JunctionOverview {
            junction: series.name().to_string(),
            max: max_of(&values)?,
            min: min_of(&values)?,
            mean: mean_of(&values)?,
        })
    }

    pub fn value(&self, mode: OverviewMode) -> f64 {
        match mode {
            OverviewMode::Max => self.max,
            OverviewMode::Min => self.min,
            OverviewMode::Mean => self.mean,
        }
    }
}

/// Overview rows for every column of a date × junction table. Junctions
/// without any valid value are left out.
pub fn overview(table: &ObservationTable) -> Result<Vec<JunctionOverview>> {
    let mut rows = Vec::new();
    for key in table.column_keys() {
        let series = table.series(key)?;
        if let Some(row) = JunctionOverview::from_series(&series) {
            rows.push(row);
        }
    }
    Ok(rows)
}
