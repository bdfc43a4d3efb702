use crate::error::{Result, YieldError};
use crate::series::Series;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One named column of an [`ObservationTable`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub key: String,
    pub values: Vec<Option<f64>>,
}

/// A named table of observation columns sharing one date axis.
///
/// For a junction sheet the columns are years; for an output or flow sheet
/// they are junctions. Columns keep their insertion order. Pushing a column
/// does not check its length; consumers that need a rectangular table
/// validate the columns they read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationTable {
    name: String,
    dates: Vec<NaiveDate>,
    columns: Vec<Column>,
}

impl ObservationTable {
    pub fn new(name: impl Into<String>, dates: Vec<NaiveDate>) -> ObservationTable {
        ObservationTable {
            name: name.into(),
            dates,
            columns: Vec::new(),
        }
    }

    /// Assemble a table from series that share a date axis; each series
    /// becomes a column keyed by its name.
    pub fn from_series(name: impl Into<String>, series: &[Series]) -> Result<ObservationTable> {
        let name = name.into();
        let dates: Vec<NaiveDate> = match series.first() {
            Some(first) => first.dates().collect(),
            None => Vec::new(),
        };
        let mut table = ObservationTable::new(name, dates);
        for s in series {
            if !s.dates().eq(table.dates.iter().copied()) {
                return Err(YieldError::AxisMismatch {
                    name: s.name().to_string(),
                });
            }
            table.push_column(s.name(), s.values().collect());
        }
        Ok(table)
    }

    pub fn push_column(&mut self, key: impl Into<String>, values: Vec<Option<f64>>) {
        self.columns.push(Column {
            key: key.into(),
            values,
        });
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_keys(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.key.as_str())
    }

    pub fn column(&self, key: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.key == key)
    }

    pub fn num_rows(&self) -> usize {
        self.dates.len()
    }

    /// Extract one column as a series named after its key.
    pub fn series(&self, key: &str) -> Result<Series> {
        let column = self.column(key).ok_or_else(|| YieldError::ColumnMismatch {
            table: self.name.clone(),
            detail: format!("column {key} not found"),
        })?;
        if column.values.len() != self.dates.len() {
            return Err(YieldError::ColumnMismatch {
                table: self.name.clone(),
                detail: format!(
                    "column {key} has {} values for {} dates",
                    column.values.len(),
                    self.dates.len()
                ),
            });
        }
        Series::new(key, self.dates.clone(), column.values.clone())
    }
}
