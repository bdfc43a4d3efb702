//! Sheet loading: CSV text into [`ObservationTable`]s.
//!
//! Missing-value markers (`""`, `NaN`, `N/A`, `NA`, `---`, `null`) become
//! `None`. Any other non-numeric cell, infinities included, is an error
//! naming the sheet, row and column.

use crate::{SheetSource, Workbook};
use anyhow::{bail, Context};
use flate2::read::GzDecoder;
use jdy_core::ObservationTable;
use jdy_utils::{dates::parse_sheet_date, sheets::is_placeholder_header};
use std::fs::File;
use std::io::{BufReader, Read};

/// Cells treated as "no data", compared case-insensitively.
pub const MISSING_MARKERS: [&str; 6] = ["", "nan", "n/a", "na", "---", "null"];

/// Truncation applied while loading a sheet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Keep only the first N observation columns (the date column excluded).
    pub max_columns: Option<usize>,
    /// Keep only the first N data rows.
    pub max_rows: Option<usize>,
}

/// Parse one observation cell.
pub fn parse_value(cell: &str) -> anyhow::Result<Option<f64>> {
    let cell = cell.trim();
    if MISSING_MARKERS
        .iter()
        .any(|marker| cell.eq_ignore_ascii_case(marker))
    {
        return Ok(None);
    }
    let value: f64 = cell
        .parse()
        .with_context(|| format!("not a number: {cell:?}"))?;
    if value.is_nan() {
        return Ok(None);
    }
    if value.is_infinite() {
        bail!("not a finite number: {cell:?}");
    }
    Ok(Some(value))
}

/// Read one sheet from CSV text.
pub fn read_sheet<R: Read>(
    name: &str,
    reader: R,
    options: &LoadOptions,
) -> anyhow::Result<ObservationTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .with_context(|| format!("reading header of sheet {name}"))?
        .clone();
    match headers.get(0) {
        None => bail!("sheet {name} has no header row"),
        Some(h) if !h.eq_ignore_ascii_case("date") => {
            log::warn!("sheet {name}: first column {h:?} is not \"Date\"; using it as the date axis")
        }
        Some(_) => {}
    }

    let keep: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(_, h)| !is_placeholder_header(h))
        .map(|(idx, h)| (idx, h.to_string()))
        .take(options.max_columns.unwrap_or(usize::MAX))
        .collect();

    let mut dates = Vec::new();
    let mut columns: Vec<Vec<Option<f64>>> = vec![Vec::new(); keep.len()];
    for (idx, result) in rdr.records().enumerate() {
        // header is line 1
        let line = idx + 2;
        let record = result.with_context(|| format!("sheet {name}, line {line}"))?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        if options.max_rows.is_some_and(|max| dates.len() >= max) {
            break;
        }
        let date = parse_sheet_date(record.get(0).unwrap_or(""))
            .with_context(|| format!("sheet {name}, line {line}"))?;
        if let Some(previous) = dates.last() {
            if date <= *previous {
                bail!("sheet {name}, line {line}: date {date} does not follow {previous}");
            }
        }
        dates.push(date);
        for (slot, (col, key)) in keep.iter().enumerate() {
            let value = parse_value(record.get(*col).unwrap_or(""))
                .with_context(|| format!("sheet {name}, line {line}, column {key}"))?;
            columns[slot].push(value);
        }
    }

    let mut table = ObservationTable::new(name, dates);
    for ((_, key), values) in keep.into_iter().zip(columns) {
        table.push_column(key, values);
    }
    log::debug!(
        "sheet {}: {} dates x {} columns",
        name,
        table.num_rows(),
        table.columns().len()
    );
    Ok(table)
}

/// Open a sheet file for reading, decompressing when needed.
pub fn open_sheet(sheet: &SheetSource) -> anyhow::Result<Box<dyn Read>> {
    let file = File::open(&sheet.path)
        .with_context(|| format!("opening sheet {}", sheet.path.display()))?;
    let reader = BufReader::new(file);
    Ok(if sheet.compressed {
        Box::new(GzDecoder::new(reader))
    } else {
        Box::new(reader)
    })
}

impl Workbook {
    /// Load the sheet called `name`.
    pub fn load_sheet(&self, name: &str, options: &LoadOptions) -> anyhow::Result<ObservationTable> {
        let sheet = self
            .sheet(name)
            .with_context(|| format!("sheet {name} not found in {}", self.root().display()))?;
        read_sheet(&sheet.name, open_sheet(sheet)?, options)
    }

    /// Load every sheet, in workbook order.
    pub fn load_all(&self, options: &LoadOptions) -> anyhow::Result<Vec<ObservationTable>> {
        self.sheets()
            .iter()
            .map(|sheet| {
                log::info!("Loading sheet {}", sheet.name);
                read_sheet(&sheet.name, open_sheet(sheet)?, options)
            })
            .collect()
    }

    /// Load the only sheet of a single-sheet workbook (a flow sheet file).
    pub fn load_single(&self, options: &LoadOptions) -> anyhow::Result<ObservationTable> {
        match self.sheets() {
            [sheet] => read_sheet(&sheet.name, open_sheet(sheet)?, options),
            sheets => bail!(
                "expected one sheet in {}, found {}",
                self.root().display(),
                sheets.len()
            ),
        }
    }
}
