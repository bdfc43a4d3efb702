//! Command implementations for the junction dependable yield CLI.
//!
//! `dependable` turns a workbook of junction sheets into the 75% dependable
//! yield workbook, `thresholds` charts when each pickup capacity is
//! available, and `overview` prints one figure per junction.

use clap::Subcommand;
use jdy_chart::availability::AvailabilityStyle;
use jdy_data::percentile::DEPENDABLE_PERCENTILE;
use jdy_data::stats::OverviewMode;
use jdy_data::threshold::{MAX_PICKUP, THRESHOLD_STEP};
use std::path::PathBuf;

pub mod dependable;
pub mod overview;
pub mod thresholds;

#[derive(Subcommand)]
pub enum Command {
    /// Compute the dependable yield of every junction sheet in a workbook
    Dependable {
        /// Workbook directory (one CSV sheet per junction) or a single sheet
        #[arg(short = 'i', long)]
        input: PathBuf,

        /// Output workbook directory
        #[arg(short = 'o', long)]
        output: PathBuf,

        /// Percentile taken across years; 0.25 is the 75% dependable flow
        #[arg(short = 'p', long, default_value_t = DEPENDABLE_PERCENTILE)]
        percentile: f64,

        /// Use only the first N year columns of each sheet
        #[arg(long)]
        num_years: Option<usize>,

        /// Use only the first N dates of each sheet
        #[arg(long)]
        num_days: Option<usize>,

        /// Gzip every output sheet
        #[arg(long)]
        compress: bool,

        /// Also write the dependable table as dashboard JSON
        #[arg(long)]
        json: Option<PathBuf>,

        /// Also write an SVG overview chart
        #[arg(long)]
        chart: Option<PathBuf>,

        /// Also write one SVG chart per junction into this directory
        #[arg(long)]
        charts_dir: Option<PathBuf>,
    },

    /// Extract threshold periods and draw availability charts per junction
    Thresholds {
        /// Reduced flow sheet (junction columns)
        #[arg(short = 'r', long)]
        reduced: PathBuf,

        /// Base flow sheet, drawn for comparison
        #[arg(short = 'b', long)]
        base: Option<PathBuf>,

        /// Output directory for charts and the capacity summary
        #[arg(short = 'o', long)]
        output: PathBuf,

        /// Junctions to process (default: every column of the reduced sheet)
        #[arg(short = 'j', long = "junction")]
        junctions: Vec<String>,

        /// Maximum pickup capacity (MCM)
        #[arg(long, default_value_t = MAX_PICKUP)]
        max_pickup: f64,

        /// Threshold ladder step (MCM)
        #[arg(long, default_value_t = THRESHOLD_STEP)]
        step: f64,

        /// Chart style: bars or stacked
        #[arg(long, default_value_t = AvailabilityStyle::Bars)]
        style: AvailabilityStyle,
    },

    /// Print one whole-season figure per junction of a dependable table
    Overview {
        /// Dependable table sheet (Date plus one column per junction)
        #[arg(short = 'i', long)]
        input: PathBuf,

        /// Figure to report: max, min or mean
        #[arg(short = 'm', long, default_value_t = OverviewMode::Max)]
        mode: OverviewMode,
    },
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Dependable {
            input,
            output,
            percentile,
            num_years,
            num_days,
            compress,
            json,
            chart,
            charts_dir,
        } => dependable::run_dependable(&dependable::DependableArgs {
            input,
            output,
            percentile,
            num_years,
            num_days,
            compress,
            json,
            chart,
            charts_dir,
        }),
        Command::Thresholds {
            reduced,
            base,
            output,
            junctions,
            max_pickup,
            step,
            style,
        } => thresholds::run_thresholds(&thresholds::ThresholdArgs {
            reduced,
            base,
            output,
            junctions,
            max_pickup,
            step,
            style,
        }),
        Command::Overview { input, mode } => overview::run_overview(&input, mode),
    }
}
