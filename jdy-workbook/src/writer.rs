//! Writing tables back out as CSV sheets.

use anyhow::Context;
use chrono::NaiveDate;
use flate2::{write::GzEncoder, Compression};
use jdy_core::ObservationTable;
use jdy_utils::{dates, sheets::unique_sheet_name};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// How the date column is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStyle {
    /// `2024-06-01`
    Iso,
    /// `1-Jun`
    Season,
}

impl DateStyle {
    /// Season dates when every date sits in the season year, ISO otherwise.
    pub fn for_dates(dates: &[NaiveDate]) -> DateStyle {
        if dates::all_in_season_year(dates) {
            DateStyle::Season
        } else {
            DateStyle::Iso
        }
    }

    pub fn format(&self, date: &NaiveDate) -> String {
        match self {
            DateStyle::Iso => dates::format_date(date),
            DateStyle::Season => dates::format_season_date(date),
        }
    }
}

pub(crate) fn format_value(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Write `table` as CSV: a `Date` column followed by one column per key.
/// Missing values are left empty.
pub fn write_sheet<W: Write>(table: &ObservationTable, writer: W, style: DateStyle) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    let mut header = vec!["Date"];
    header.extend(table.column_keys());
    wtr.write_record(&header)?;
    for (row, date) in table.dates().iter().enumerate() {
        let mut record = Vec::with_capacity(table.columns().len() + 1);
        record.push(style.format(date));
        for column in table.columns() {
            record.push(format_value(column.values.get(row).copied().flatten()));
        }
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes sheets into an output workbook directory.
pub struct WorkbookWriter {
    dir: PathBuf,
    compress: bool,
    sheet_names: Vec<String>,
}

impl WorkbookWriter {
    /// Create (or reuse) the output directory.
    pub fn create(dir: impl AsRef<Path>, compress: bool) -> anyhow::Result<WorkbookWriter> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("creating output workbook {}", dir.display()))?;
        Ok(WorkbookWriter {
            dir,
            compress,
            sheet_names: Vec::new(),
        })
    }

    /// Names of the sheets written so far.
    pub fn sheet_names(&self) -> &[String] {
        &self.sheet_names
    }

    /// Write `table` as a sheet named after the table.
    pub fn write(&mut self, table: &ObservationTable) -> anyhow::Result<PathBuf> {
        self.write_named(table.name(), table)
    }

    /// Write `table` under a sanitized, de-duplicated form of `name`.
    pub fn write_named(&mut self, name: &str, table: &ObservationTable) -> anyhow::Result<PathBuf> {
        let sheet_name = unique_sheet_name(name, &self.sheet_names);
        let extension = if self.compress { "csv.gz" } else { "csv" };
        let path = self.dir.join(format!("{sheet_name}.{extension}"));
        let style = DateStyle::for_dates(table.dates());
        let file =
            File::create(&path).with_context(|| format!("creating sheet {}", path.display()))?;
        if self.compress {
            let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
            write_sheet(table, &mut encoder, style)?;
            encoder.finish()?.flush()?;
        } else {
            let mut out = BufWriter::new(file);
            write_sheet(table, &mut out, style)?;
            out.flush()?;
        }
        log::info!("Wrote sheet {} to {}", sheet_name, path.display());
        self.sheet_names.push(sheet_name);
        Ok(path)
    }
}
