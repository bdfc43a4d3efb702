//! The `thresholds` command: threshold periods, capacity summaries and
//! availability charts for each junction of a reduced flow sheet.

use anyhow::{bail, Context};
use jdy_chart::availability::{render_availability, AvailabilityInput, AvailabilityStyle};
use jdy_chart::{save_svg, ChartOptions};
use jdy_core::{ObservationTable, Series};
use jdy_data::summary::{summarize, ThresholdSummary};
use jdy_data::threshold::threshold_levels;
use jdy_utils::sheets::unique_sheet_name;
use jdy_workbook::loader::LoadOptions;
use jdy_workbook::models::write_capacity_summaries;
use jdy_workbook::Workbook;
use log::{info, warn};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// File name of the combined capacity summary.
pub const CAPACITY_SUMMARY_FILE: &str = "capacity_summary.csv";

#[derive(Debug, Clone)]
pub struct ThresholdArgs {
    pub reduced: PathBuf,
    pub base: Option<PathBuf>,
    pub output: PathBuf,
    pub junctions: Vec<String>,
    pub max_pickup: f64,
    pub step: f64,
    pub style: AvailabilityStyle,
}

fn load_flow_sheet(path: &Path) -> anyhow::Result<ObservationTable> {
    Workbook::open(path)?
        .load_single(&LoadOptions::default())
        .with_context(|| format!("loading flow sheet {}", path.display()))
}

/// Base flow for `junction`, if the base sheet has it on the same dates.
fn base_series(base: &ObservationTable, reduced: &Series) -> Option<Series> {
    let series = match base.series(reduced.name()) {
        Ok(series) => series,
        Err(e) => {
            warn!("{}: no base flow ({e})", reduced.name());
            return None;
        }
    };
    if !series.dates().eq(reduced.dates()) {
        warn!("{}: base flow dates differ from reduced flow, not drawn", reduced.name());
        return None;
    }
    Some(series)
}

fn process_junction(
    args: &ThresholdArgs,
    levels: &[f64],
    reduced: &ObservationTable,
    base: Option<&ObservationTable>,
    junction: &str,
    chart_stem: &str,
) -> anyhow::Result<ThresholdSummary> {
    let series = reduced.series(junction)?;
    let summary = summarize(&series, levels, args.max_pickup)?;
    match summary.rows.last() {
        Some(top) => info!(
            "{junction}: {} capacities reached, up to {:.1} MCM for {} days",
            summary.rows.len(),
            top.capacity,
            top.days
        ),
        None => info!("{junction}: no capacity reached"),
    }

    let base = base.and_then(|b| base_series(b, &series));
    let input = AvailabilityInput {
        reduced: &series,
        base: base.as_ref(),
        summary: &summary,
        max_pickup: args.max_pickup,
    };
    let svg = render_availability(&input, args.style, &ChartOptions::default())?;
    let path = args.output.join(format!("{chart_stem}_availability.svg"));
    save_svg(&path, &svg)?;
    Ok(summary)
}

/// Chart every requested junction and write the capacity summary CSV.
/// A junction that fails is logged and skipped.
pub fn run_thresholds(args: &ThresholdArgs) -> anyhow::Result<()> {
    let levels = threshold_levels(args.step, args.max_pickup);
    if levels.is_empty() {
        bail!(
            "no thresholds between step {} and maximum pickup {}",
            args.step,
            args.max_pickup
        );
    }
    let reduced = load_flow_sheet(&args.reduced)?;
    let base = args.base.as_deref().map(load_flow_sheet).transpose()?;
    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("creating output directory {}", args.output.display()))?;

    let junctions: Vec<String> = if args.junctions.is_empty() {
        reduced.column_keys().map(str::to_string).collect()
    } else {
        args.junctions.clone()
    };
    info!(
        "Processing {} junction(s) over {} threshold(s)",
        junctions.len(),
        levels.len()
    );

    let mut summaries = Vec::new();
    let mut chart_stems: Vec<String> = Vec::new();
    for junction in &junctions {
        let stem = unique_sheet_name(junction, &chart_stems);
        chart_stems.push(stem.clone());
        match process_junction(args, &levels, &reduced, base.as_ref(), junction, &stem) {
            Ok(summary) => summaries.push(summary),
            Err(e) => warn!("Skipping junction {junction}: {e:#}"),
        }
    }

    let path = args.output.join(CAPACITY_SUMMARY_FILE);
    let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    write_capacity_summaries(&summaries, BufWriter::new(file))?;
    info!(
        "Wrote capacity summary for {} of {} junction(s) to {}",
        summaries.len(),
        junctions.len(),
        path.display()
    );
    Ok(())
}
