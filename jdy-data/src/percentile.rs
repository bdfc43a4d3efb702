//! Row-wise percentiles across the year columns of a junction sheet.
//!
//! The "75% dependable yield" of a day is the flow exceeded in at least 75%
//! of the years on record, i.e. the 25th percentile of that day's values.

use jdy_core::{ObservationTable, Result, Series, YieldError};
use log::{debug, info};

/// Percentile giving the 75% dependable yield.
pub const DEPENDABLE_PERCENTILE: f64 = 0.25;

/// Name of the aggregate table (date × junction).
pub const DEPENDABLE_TABLE_NAME: &str = "75_Percent_Dependability";

/// Which observation columns of a sheet take part in the calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnSelection {
    #[default]
    All,
    /// Only the first N columns, in sheet order.
    First(usize),
}

impl ColumnSelection {
    pub fn resolve<'a>(&self, table: &'a ObservationTable) -> Vec<&'a str> {
        let keys = table.column_keys();
        match *self {
            ColumnSelection::All => keys.collect(),
            ColumnSelection::First(n) => keys.take(n).collect(),
        }
    }
}

/// Linearly interpolated percentile of `values`; `None` when empty or when
/// `p` lies outside `[0, 1]`.
///
/// NaN entries are treated as missing.
pub fn percentile_of(values: &[f64], p: f64) -> Option<f64> {
    if !(0.0..=1.0).contains(&p) {
        return None;
    }
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    sorted.sort_unstable_by(|a, b| a.total_cmp(b));
    percentile_sorted(&sorted, p)
}

fn percentile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let rank = p * last as f64;
    let lower = rank.floor() as usize;
    let upper = (rank.ceil() as usize).min(last);
    let fraction = rank - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Look up `columns` in `table`, checking each one spans the date axis.
pub(crate) fn select_columns<'a>(
    table: &'a ObservationTable,
    columns: &[&str],
) -> Result<Vec<&'a [Option<f64>]>> {
    if columns.is_empty() {
        return Err(YieldError::ColumnMismatch {
            table: table.name().to_string(),
            detail: "no columns requested".to_string(),
        });
    }
    columns
        .iter()
        .map(|key| {
            let column = table.column(key).ok_or_else(|| YieldError::ColumnMismatch {
                table: table.name().to_string(),
                detail: format!("column {key} not found"),
            })?;
            if column.values.len() != table.num_rows() {
                return Err(YieldError::ColumnMismatch {
                    table: table.name().to_string(),
                    detail: format!(
                        "column {key} has {} values for {} dates",
                        column.values.len(),
                        table.num_rows()
                    ),
                });
            }
            Ok(column.values.as_slice())
        })
        .collect()
}

/// The valid (present, non-NaN) values of one row across `columns`.
pub(crate) fn row_values(columns: &[&[Option<f64>]], row: usize) -> Vec<f64> {
    columns
        .iter()
        .filter_map(|column| column[row])
        .filter(|v| !v.is_nan())
        .collect()
}

/// Per-date percentile across `columns` of `table`.
///
/// Dates without any valid observation come out as `None`.
pub fn compute_dependable_yield(
    table: &ObservationTable,
    percentile: f64,
    columns: &[&str],
) -> Result<Series> {
    if !(0.0..=1.0).contains(&percentile) {
        return Err(YieldError::InvalidPercentile(percentile));
    }
    let selected = select_columns(table, columns)?;
    let values = (0..table.num_rows())
        .map(|row| percentile_of(&row_values(&selected, row), percentile))
        .collect();
    Series::new(table.name(), table.dates().to_vec(), values)
}

/// Run the aggregator over every junction sheet and collect the results into
/// one date × junction table.
pub fn dependable_yield_table(
    tables: &[ObservationTable],
    percentile: f64,
    selection: ColumnSelection,
) -> Result<ObservationTable> {
    let mut results = Vec::with_capacity(tables.len());
    for table in tables {
        let columns = selection.resolve(table);
        debug!("{}: using columns {:?}", table.name(), columns);
        let series = compute_dependable_yield(table, percentile, &columns)?;
        if let (Some(lo), Some(hi)) = (series.min_value(), series.max_value()) {
            info!(
                "{}: {} columns, {} dates, dependable range {:.4} to {:.4}",
                table.name(),
                columns.len(),
                series.len(),
                lo,
                hi
            );
        } else {
            info!("{}: no valid observations", table.name());
        }
        results.push(series);
    }
    ObservationTable::from_series(DEPENDABLE_TABLE_NAME, &results)
}
