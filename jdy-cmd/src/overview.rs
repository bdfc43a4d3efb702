//! The `overview` command.

use anyhow::Context;
use jdy_data::stats::{overview, OverviewMode};
use jdy_workbook::loader::LoadOptions;
use jdy_workbook::models::write_overview;
use jdy_workbook::Workbook;
use log::info;
use std::io::Write;
use std::path::Path;

/// Print `Junction,Value` for every junction of a dependable table sheet.
pub fn run_overview(input: &Path, mode: OverviewMode) -> anyhow::Result<()> {
    run_overview_to(input, mode, std::io::stdout().lock())
}

/// Same as [`run_overview`], writing the CSV to `out`.
pub fn run_overview_to<W: Write>(input: &Path, mode: OverviewMode, out: W) -> anyhow::Result<()> {
    let table = Workbook::open(input)?
        .load_single(&LoadOptions::default())
        .with_context(|| format!("loading {}", input.display()))?;
    let rows = overview(&table)?;
    info!(
        "{}: {} of {} junction(s) have data, reporting {mode}",
        table.name(),
        rows.len(),
        table.columns().len()
    );
    write_overview(&rows, mode, out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dependable_sheet(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("75_Percent_Dependability.csv");
        std::fs::write(&path, "Date,Nikhop,Rangdum,Dry\n1-Jun,1.5,2,\n2-Jun,0.5,,\n").unwrap();
        path
    }

    #[test]
    fn test_run_overview_to() {
        let dir = tempfile::tempdir().unwrap();
        let path = dependable_sheet(dir.path());

        let mut out = Vec::new();
        run_overview_to(&path, OverviewMode::Mean, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Junction,Value\nNikhop,1.0000\nRangdum,2.0000\n"
        );

        let mut out = Vec::new();
        run_overview_to(&path, OverviewMode::Max, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Junction,Value\nNikhop,1.5000\nRangdum,2.0000\n"
        );
    }

    #[test]
    fn test_run_overview_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        assert!(run_overview(&dir.path().join("missing.csv"), OverviewMode::Max).is_err());
    }
}
