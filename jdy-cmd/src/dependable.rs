//! The `dependable` command: junction workbook in, dependable yield
//! workbook out.

use anyhow::Context;
use jdy_chart::dependable::{render_dependable, render_junction};
use jdy_chart::{save_svg, ChartOptions};
use jdy_core::ObservationTable;
use jdy_data::percentile::{dependable_yield_table, ColumnSelection};
use jdy_data::stats::JunctionDetail;
use jdy_utils::sheets::unique_sheet_name;
use jdy_workbook::loader::LoadOptions;
use jdy_workbook::models::write_dashboard_json;
use jdy_workbook::writer::WorkbookWriter;
use jdy_workbook::Workbook;
use log::info;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct DependableArgs {
    pub input: PathBuf,
    pub output: PathBuf,
    pub percentile: f64,
    pub num_years: Option<usize>,
    pub num_days: Option<usize>,
    pub compress: bool,
    pub json: Option<PathBuf>,
    pub chart: Option<PathBuf>,
    pub charts_dir: Option<PathBuf>,
}

/// One chart per junction column of `summary`, named after the junction.
fn write_junction_charts(summary: &ObservationTable, dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating chart directory {}", dir.display()))?;
    let mut stems: Vec<String> = Vec::new();
    for key in summary.column_keys() {
        let series = summary.series(key)?;
        let svg = render_junction(&series, &ChartOptions::default())?;
        let stem = unique_sheet_name(key, &stems);
        save_svg(&dir.join(format!("{stem}.svg")), &svg)?;
        stems.push(stem);
    }
    info!("Wrote {} junction chart(s) to {}", stems.len(), dir.display());
    Ok(())
}

/// Write the `75_Percent_Dependability` sheet followed by one detail sheet
/// per junction, plus the optional JSON and chart.
pub fn run_dependable(args: &DependableArgs) -> anyhow::Result<()> {
    let options = LoadOptions {
        max_columns: None,
        max_rows: args.num_days,
    };
    let selection = args
        .num_years
        .map(ColumnSelection::First)
        .unwrap_or_default();

    let workbook = Workbook::open(&args.input)?;
    let tables = workbook.load_all(&options)?;
    info!(
        "Loaded {} junction sheet(s) from {}",
        tables.len(),
        args.input.display()
    );

    let summary = dependable_yield_table(&tables, args.percentile, selection)
        .with_context(|| format!("computing dependable yield for {}", args.input.display()))?;

    let mut writer = WorkbookWriter::create(&args.output, args.compress)?;
    writer.write(&summary)?;
    for table in &tables {
        let columns = selection.resolve(table);
        let detail = JunctionDetail::build(table, args.percentile, &columns)
            .with_context(|| format!("building detail sheet for {}", table.name()))?;
        writer.write(&detail.to_table())?;
    }
    info!(
        "Wrote {} sheet(s) to {}",
        writer.sheet_names().len(),
        args.output.display()
    );

    if let Some(path) = &args.json {
        let file =
            File::create(path).with_context(|| format!("creating {}", path.display()))?;
        write_dashboard_json(&summary, BufWriter::new(file))?;
        info!("Wrote dashboard data {}", path.display());
    }
    if let Some(path) = &args.chart {
        let svg = render_dependable(&summary, &ChartOptions::default())?;
        save_svg(path, &svg)?;
    }
    if let Some(dir) = &args.charts_dir {
        write_junction_charts(&summary, dir)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NIKHOP: &str = "Date,1975,1976,1977,1978\n1-Jun,10,20,30,\n2-Jun,,,,\n3-Jun,1,2,3,4\n";
    const RANGDUM: &str = "Date,1975,1976,1977,1978\n1-Jun,5,5,5,5\n2-Jun,1,,,\n3-Jun,0,0,0,0\n";

    fn input_workbook(dir: &std::path::Path) -> PathBuf {
        let input = dir.join("junctions");
        std::fs::create_dir(&input).unwrap();
        std::fs::write(input.join("Nikhop.csv"), NIKHOP).unwrap();
        std::fs::write(input.join("Rangdum.csv"), RANGDUM).unwrap();
        input
    }

    #[test]
    fn test_run_dependable() {
        let dir = tempfile::tempdir().unwrap();
        let args = DependableArgs {
            input: input_workbook(dir.path()),
            output: dir.path().join("out"),
            percentile: 0.25,
            num_years: Some(3),
            num_days: None,
            compress: false,
            json: Some(dir.path().join("dashboard.json")),
            chart: Some(dir.path().join("dependable.svg")),
            charts_dir: Some(dir.path().join("junction_charts")),
        };
        run_dependable(&args).unwrap();

        let summary =
            std::fs::read_to_string(dir.path().join("out/75_Percent_Dependability.csv")).unwrap();
        assert_eq!(summary, "Date,Nikhop,Rangdum\n1-Jun,15,5\n2-Jun,,1\n3-Jun,1.5,0\n");

        let detail = std::fs::read_to_string(dir.path().join("out/Nikhop.csv")).unwrap();
        assert!(detail.starts_with("Date,1975,1976,1977,75% Dependable,Min,Max,Mean\n"));
        assert!(detail.contains("1-Jun,10,20,30,15,10,30,20\n"));

        let json = std::fs::read_to_string(dir.path().join("dashboard.json")).unwrap();
        assert!(json.contains("\"Nikhop\": 15.0"));
        assert!(dir.path().join("dependable.svg").exists());

        let nikhop = std::fs::read_to_string(dir.path().join("junction_charts/Nikhop.svg")).unwrap();
        assert!(nikhop.contains("Min: 1.5000"));
        assert!(nikhop.contains("Max: 15.0000"));
        assert!(dir.path().join("junction_charts/Rangdum.svg").exists());
    }

    #[test]
    fn test_run_dependable_rejects_bad_percentile() {
        let dir = tempfile::tempdir().unwrap();
        let args = DependableArgs {
            input: input_workbook(dir.path()),
            output: dir.path().join("out"),
            percentile: 1.5,
            num_years: None,
            num_days: None,
            compress: false,
            json: None,
            chart: None,
            charts_dir: None,
        };
        assert!(run_dependable(&args).is_err());
    }
}
