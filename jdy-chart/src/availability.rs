//! Availability chart: when a junction's reduced flow can supply each
//! pickup capacity, drawn next to its Capacity / Days / Period table.

use crate::palette::{band_color, lighten, row_background, BAND_COLORS, BAND_WIDTH};
use crate::ChartOptions;
use anyhow::bail;
use chrono::NaiveDate;
use jdy_core::Series;
use jdy_data::summary::ThresholdSummary;
use jdy_data::threshold::spans_above;
use plotters::chart::ChartContext;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::fmt;
use std::str::FromStr;

/// Half the height of a threshold bar (MCM).
const BAR_HALF_HEIGHT: f64 = 0.04;
const ROW_HEIGHT: i32 = 20;

pub(crate) type DateChart<'a, 'b> =
    ChartContext<'a, SVGBackend<'b>, Cartesian2d<RangedDate<NaiveDate>, RangedCoordf64>>;

/// How the threshold availability is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AvailabilityStyle {
    /// One horizontal bar per run, at the height of its threshold.
    #[default]
    Bars,
    /// Each day's flow split into 0.5 MCM bands, capped at the maximum pickup.
    Stacked,
}

impl FromStr for AvailabilityStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bars" => Ok(AvailabilityStyle::Bars),
            "stacked" => Ok(AvailabilityStyle::Stacked),
            other => Err(format!("unknown chart style {other:?}, expected bars or stacked")),
        }
    }
}

impl fmt::Display for AvailabilityStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AvailabilityStyle::Bars => f.write_str("bars"),
            AvailabilityStyle::Stacked => f.write_str("stacked"),
        }
    }
}

/// What goes on one junction's availability chart.
#[derive(Debug, Clone, Copy)]
pub struct AvailabilityInput<'a> {
    pub reduced: &'a Series,
    pub base: Option<&'a Series>,
    pub summary: &'a ThresholdSummary,
    pub max_pickup: f64,
}

/// One day's slice of a 0.5 MCM band in the stacked view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandSegment {
    pub date: NaiveDate,
    pub band: usize,
    pub lower: f64,
    pub upper: f64,
}

/// Split each day's flow, capped at `cap`, into consecutive bands of
/// [`BAND_WIDTH`]. Missing, non-finite and non-positive values give no
/// segments.
pub fn band_segments(series: &Series, cap: f64) -> Vec<BandSegment> {
    let mut segments = Vec::new();
    for point in series.points() {
        let Some(value) = point.value.filter(|v| v.is_finite()) else {
            continue;
        };
        let top = value.min(cap);
        let mut band = 0;
        let mut lower = 0.0;
        while lower < top {
            segments.push(BandSegment {
                date: point.date,
                band,
                lower,
                upper: (lower + BAND_WIDTH).min(top),
            });
            band += 1;
            lower = band as f64 * BAND_WIDTH;
        }
    }
    segments
}

pub(crate) fn next_day(date: NaiveDate) -> NaiveDate {
    date.succ_opt().unwrap_or(date)
}

/// Draw `series` as a line broken at missing values.
pub(crate) fn draw_flow_line(
    chart: &mut DateChart<'_, '_>,
    series: &Series,
    label: &str,
    color: RGBAColor,
) -> anyhow::Result<()> {
    for (i, segment) in series.valid_segments().into_iter().enumerate() {
        let anno = chart.draw_series(LineSeries::new(segment, color.stroke_width(2)))?;
        if i == 0 {
            anno.label(label)
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
        }
    }
    Ok(())
}

/// Render the availability chart of one junction as an SVG document.
pub fn render_availability(
    input: &AvailabilityInput<'_>,
    style: AvailabilityStyle,
    options: &ChartOptions,
) -> anyhow::Result<String> {
    let name = input.reduced.name();
    let (Some(start), Some(last)) = (input.reduced.first_date(), input.reduced.last_date()) else {
        bail!("{name}: no dates to chart");
    };
    let end = next_day(last);
    let peak = [
        input.reduced.max_value(),
        input.base.and_then(Series::max_value),
    ]
    .into_iter()
    .flatten()
    .fold(input.max_pickup, f64::max);
    let y_max = peak + BAND_WIDTH;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (options.width, options.height))
            .into_drawing_area();
        root.fill(&WHITE)?;
        let (chart_area, table_area) = root.split_horizontally(options.width * 2 / 3);

        let x_range: RangedDate<NaiveDate> = (start..end).into();
        let mut chart = ChartBuilder::on(&chart_area)
            .caption(format!("{name}: flow availability by capacity"), ("sans-serif", 20))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(x_range, 0f64..y_max)?;
        chart
            .configure_mesh()
            .x_labels(10)
            .x_label_formatter(&|d: &NaiveDate| d.format("%-d-%b").to_string())
            .y_desc("Flow (MCM)")
            .draw()?;

        let shade = RGBColor(0x80, 0x80, 0x80).mix(0.25);
        let spans = spans_above(input.reduced, input.max_pickup);
        if !spans.is_empty() {
            chart
                .draw_series(spans.iter().map(|span| {
                    Rectangle::new([(span.start, 0.0), (next_day(span.end), y_max)], shade.filled())
                }))?
                .label("Above maximum pickup")
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], shade.filled()));
        }

        match style {
            AvailabilityStyle::Bars => {
                for row in &input.summary.rows {
                    let color = band_color(row.capacity);
                    chart.draw_series(row.runs.iter().map(|run| {
                        Rectangle::new(
                            [
                                (run.start_date, row.capacity - BAR_HALF_HEIGHT),
                                (next_day(run.end_date), row.capacity + BAR_HALF_HEIGHT),
                            ],
                            color.filled(),
                        )
                    }))?;
                }
            }
            AvailabilityStyle::Stacked => {
                chart.draw_series(band_segments(input.reduced, input.max_pickup).into_iter().map(
                    |segment| {
                        let color = BAND_COLORS[segment.band.min(BAND_COLORS.len() - 1)];
                        Rectangle::new(
                            [(segment.date, segment.lower), (next_day(segment.date), segment.upper)],
                            color.filled(),
                        )
                    },
                ))?;
            }
        }

        draw_flow_line(&mut chart, input.reduced, "Reduced flow", BLUE.to_rgba())?;
        if let Some(base) = input.base {
            draw_flow_line(&mut chart, base, "Base flow", GREEN.to_rgba())?;
        }
        chart
            .draw_series(LineSeries::new(
                vec![(start, input.max_pickup), (end, input.max_pickup)],
                RED.stroke_width(2),
            ))?
            .label(format!("Maximum pickup ({:.1} MCM)", input.max_pickup))
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        draw_capacity_table(&table_area, input.summary)?;
        root.present()?;
    }
    log::debug!("{name}: rendered {style} availability chart");
    Ok(svg)
}

fn draw_capacity_table(
    area: &DrawingArea<SVGBackend<'_>, Shift>,
    summary: &ThresholdSummary,
) -> anyhow::Result<()> {
    let (width, _) = area.dim_in_pixel();
    let columns = [10, 80, 140, width as i32 - 10];
    let title = ("sans-serif", 16).into_font().color(&BLACK);
    let header = ("sans-serif", 12).into_font().color(&WHITE);
    let text = ("sans-serif", 12).into_font().color(&BLACK);

    area.draw(&Text::new("Capacity Summary", (columns[0], 20), title))?;
    let header_top = 45;
    for (i, label) in ["Capacity", "Days", "Period"].into_iter().enumerate() {
        area.draw(&Rectangle::new(
            [(columns[i], header_top), (columns[i + 1], header_top + ROW_HEIGHT)],
            RGBColor(0x33, 0x33, 0x33).filled(),
        ))?;
        area.draw(&Text::new(label, (columns[i] + 4, header_top + 4), header.clone()))?;
    }

    if summary.is_empty() {
        area.draw(&Text::new(
            "No capacity reached",
            (columns[0] + 4, header_top + ROW_HEIGHT + 4),
            text,
        ))?;
        return Ok(());
    }
    for (row_idx, row) in summary.rows_descending().enumerate() {
        let top = header_top + ROW_HEIGHT * (row_idx as i32 + 1);
        let cells = [
            format!("{:.1}", row.capacity),
            row.days.to_string(),
            row.period.clone(),
        ];
        let backgrounds = [
            lighten(band_color(row.capacity)),
            row_background(row_idx),
            row_background(row_idx),
        ];
        for (i, (cell, background)) in cells.iter().zip(backgrounds).enumerate() {
            area.draw(&Rectangle::new(
                [(columns[i], top), (columns[i + 1], top + ROW_HEIGHT)],
                background.filled(),
            ))?;
            area.draw(&Text::new(cell.as_str(), (columns[i] + 4, top + 4), text.clone()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jdy_data::summary::summarize;

    fn jun(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn reduced() -> Series {
        Series::daily(
            "Nikhop",
            jun(1),
            vec![Some(0.4), Some(1.2), None, Some(3.4), Some(2.6), Some(0.9)],
        )
    }

    #[test]
    fn test_band_segments() {
        let series = Series::daily("Nikhop", jun(1), vec![Some(1.2), None, Some(3.4), Some(0.0)]);
        let segments = band_segments(&series, 3.0);
        let first_day: Vec<(usize, f64, f64)> = segments
            .iter()
            .filter(|s| s.date == jun(1))
            .map(|s| (s.band, s.lower, s.upper))
            .collect();
        assert_eq!(first_day, vec![(0, 0.0, 0.5), (1, 0.5, 1.0), (2, 1.0, 1.2)]);

        let third_day: Vec<&BandSegment> = segments.iter().filter(|s| s.date == jun(3)).collect();
        assert_eq!(third_day.len(), 6);
        assert_eq!(third_day[5].upper, 3.0);
        assert!(segments.iter().all(|s| s.date != jun(2) && s.date != jun(4)));
    }

    #[test]
    fn test_band_segments_skip_non_finite() {
        let series = Series::daily(
            "Nikhop",
            jun(1),
            vec![Some(f64::NAN), Some(f64::INFINITY), Some(0.7)],
        );
        let segments = band_segments(&series, 3.0);
        assert_eq!(segments.len(), 2);
        assert!(segments.iter().all(|s| s.date == jun(3)));
    }

    #[test]
    fn test_style_parse() {
        assert_eq!("bars".parse::<AvailabilityStyle>(), Ok(AvailabilityStyle::Bars));
        assert_eq!("Stacked".parse::<AvailabilityStyle>(), Ok(AvailabilityStyle::Stacked));
        assert!("pie".parse::<AvailabilityStyle>().is_err());
        assert_eq!(AvailabilityStyle::Stacked.to_string(), "stacked");
    }

    #[test]
    fn test_render_both_styles() {
        let reduced = reduced();
        let base = Series::daily("Nikhop", jun(1), vec![Some(1.0); 6]);
        let summary = summarize(&reduced, &[0.5, 1.0, 2.5, 3.0], 3.0).unwrap();
        let input = AvailabilityInput {
            reduced: &reduced,
            base: Some(&base),
            summary: &summary,
            max_pickup: 3.0,
        };
        for style in [AvailabilityStyle::Bars, AvailabilityStyle::Stacked] {
            let svg = render_availability(&input, style, &ChartOptions::default()).unwrap();
            assert!(svg.contains("<svg"));
            assert!(svg.contains("Nikhop"));
            assert!(svg.contains("Capacity Summary"));
            assert!(svg.contains("Above maximum pickup"));
        }
    }

    #[test]
    fn test_render_without_reached_capacity() {
        let dry = Series::daily("Dry", jun(1), vec![Some(0.0), Some(0.05)]);
        let summary = summarize(&dry, &[0.1, 0.2], 3.0).unwrap();
        let input = AvailabilityInput {
            reduced: &dry,
            base: None,
            summary: &summary,
            max_pickup: 3.0,
        };
        let svg = render_availability(&input, AvailabilityStyle::Bars, &ChartOptions::default()).unwrap();
        assert!(svg.contains("No capacity reached"));
        assert!(!svg.contains("Above maximum pickup"));
    }

    #[test]
    fn test_render_empty_series_fails() {
        let empty = Series::daily("Empty", jun(1), vec![]);
        let summary = summarize(&empty, &[0.1], 3.0).unwrap();
        let input = AvailabilityInput {
            reduced: &empty,
            base: None,
            summary: &summary,
            max_pickup: 3.0,
        };
        assert!(render_availability(&input, AvailabilityStyle::Bars, &ChartOptions::default()).is_err());
    }
}
