//! Record structs for the non-sheet outputs: dashboard JSON and the
//! capacity summary CSV.

use crate::writer::DateStyle;
use jdy_core::ObservationTable;
use jdy_data::stats::{JunctionOverview, OverviewMode};
use jdy_data::summary::ThresholdSummary;
use serde::Serialize;
use serde_json::{Map, Number, Value};
use std::io::Write;

/// One row of the dashboard data file: `{"Date": "1-Jun", "<junction>": value}`.
/// Missing values are `null`.
pub fn dashboard_records(table: &ObservationTable) -> Vec<Map<String, Value>> {
    let style = DateStyle::for_dates(table.dates());
    table
        .dates()
        .iter()
        .enumerate()
        .map(|(row, date)| {
            let mut record = Map::new();
            record.insert("Date".to_string(), Value::String(style.format(date)));
            for column in table.columns() {
                let value = column
                    .values
                    .get(row)
                    .copied()
                    .flatten()
                    .and_then(Number::from_f64)
                    .map_or(Value::Null, Value::Number);
                record.insert(column.key.clone(), value);
            }
            record
        })
        .collect()
}

pub fn write_dashboard_json<W: Write>(table: &ObservationTable, writer: W) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(writer, &dashboard_records(table))?;
    Ok(())
}

/// A row of the capacity summary CSV.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapacityRecord {
    #[serde(rename = "Junction")]
    pub junction: String,
    #[serde(rename = "Capacity")]
    pub capacity: String,
    #[serde(rename = "Days")]
    pub days: usize,
    #[serde(rename = "Period")]
    pub period: String,
}

impl CapacityRecord {
    /// Rows of `summary`, highest capacity first.
    pub fn from_summary(summary: &ThresholdSummary) -> Vec<CapacityRecord> {
        summary
            .rows_descending()
            .map(|row| CapacityRecord {
                junction: summary.junction.clone(),
                capacity: format!("{:.1}", row.capacity),
                days: row.days,
                period: row.period.clone(),
            })
            .collect()
    }
}

/// Write the capacity summaries of several junctions into one CSV.
pub fn write_capacity_summaries<W: Write>(
    summaries: &[ThresholdSummary],
    writer: W,
) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for summary in summaries {
        for record in CapacityRecord::from_summary(summary) {
            wtr.serialize(record)?;
        }
    }
    wtr.flush()?;
    Ok(())
}

/// A row of the junction overview printed by the `overview` command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewRecord {
    #[serde(rename = "Junction")]
    pub junction: String,
    #[serde(rename = "Value")]
    pub value: String,
}

impl OverviewRecord {
    pub fn new(overview: &JunctionOverview, mode: OverviewMode) -> OverviewRecord {
        OverviewRecord {
            junction: overview.junction.clone(),
            value: format!("{:.4}", overview.value(mode)),
        }
    }
}

pub fn write_overview<W: Write>(
    overviews: &[JunctionOverview],
    mode: OverviewMode,
    writer: W,
) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for overview in overviews {
        wtr.serialize(OverviewRecord::new(overview, mode))?;
    }
    wtr.flush()?;
    Ok(())
}
