//! Dependable yield charts: an overview with one line per junction, and a
//! chart per junction with its Min / Max / Mean box.

use crate::availability::{draw_flow_line, next_day};
use crate::ChartOptions;
use anyhow::bail;
use chrono::NaiveDate;
use jdy_core::{ObservationTable, Series};
use jdy_data::stats::JunctionOverview;
use plotters::prelude::*;

const LINE_COLOR: RGBColor = RGBColor(0x2E, 0x86, 0xAB);
const MARKER_COLOR: RGBColor = RGBColor(0xA2, 0x3B, 0x72);
const STATS_BOX_COLOR: RGBColor = RGBColor(0xF5, 0xDE, 0xB3);

/// Lines of the stats box drawn on a junction chart.
pub fn stats_lines(series: &Series) -> Vec<String> {
    match JunctionOverview::from_series(series) {
        Some(stats) => vec![
            format!("Min: {:.4}", stats.min),
            format!("Max: {:.4}", stats.max),
            format!("Mean: {:.4}", stats.mean),
        ],
        None => vec!["No data".to_string()],
    }
}

/// Chart of one junction's dependable yield, with a marker per date.
pub fn render_junction(series: &Series, options: &ChartOptions) -> anyhow::Result<String> {
    let name = series.name();
    let (Some(start), Some(last)) = (series.first_date(), series.last_date()) else {
        bail!("{name}: no dates to chart");
    };
    let peak = series.max_value().unwrap_or(0.0).max(0.0);

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (options.width, options.height))
            .into_drawing_area();
        root.fill(&WHITE)?;
        let x_range: RangedDate<NaiveDate> = (start..next_day(last)).into();
        let mut chart = ChartBuilder::on(&root)
            .caption(format!("75% Dependable Yield - {name}"), ("sans-serif", 20))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(x_range, 0f64..peak * 1.1 + 0.1)?;
        chart
            .configure_mesh()
            .x_labels(15)
            .x_label_formatter(&|d: &NaiveDate| d.format("%-d-%b").to_string())
            .x_desc("Date")
            .y_desc("75% Dependable Yield")
            .draw()?;

        draw_flow_line(&mut chart, series, name, LINE_COLOR.to_rgba())?;
        chart.draw_series(series.points().iter().filter_map(|p| {
            p.value
                .map(|v| Circle::new((p.date, v), 3, MARKER_COLOR.filled()))
        }))?;

        let lines = stats_lines(series);
        let (left, top) = (80, 60);
        let bottom = top + 10 + 18 * lines.len() as i32;
        root.draw(&Rectangle::new(
            [(left, top), (left + 150, bottom)],
            STATS_BOX_COLOR.mix(0.7).filled(),
        ))?;
        root.draw(&Rectangle::new(
            [(left, top), (left + 150, bottom)],
            RGBColor(0x80, 0x80, 0x80).stroke_width(1),
        ))?;
        let text = ("sans-serif", 13).into_font().color(&BLACK);
        for (i, line) in lines.iter().enumerate() {
            root.draw(&Text::new(
                line.as_str(),
                (left + 8, top + 6 + 18 * i as i32),
                text.clone(),
            ))?;
        }
        root.present()?;
    }
    log::debug!("{name}: rendered dependable chart");
    Ok(svg)
}

pub fn render_dependable(table: &ObservationTable, options: &ChartOptions) -> anyhow::Result<String> {
    let (Some(start), Some(last)) = (table.dates().first(), table.dates().last()) else {
        bail!("{}: no dates to chart", table.name());
    };
    let series = table
        .column_keys()
        .map(|key| table.series(key))
        .collect::<Result<Vec<_>, _>>()?;
    let peak = series
        .iter()
        .filter_map(|s| s.max_value())
        .fold(0.0, f64::max);

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (options.width, options.height))
            .into_drawing_area();
        root.fill(&WHITE)?;
        let x_range: RangedDate<NaiveDate> = (*start..next_day(*last)).into();
        let mut chart = ChartBuilder::on(&root)
            .caption("75% dependable yield by junction", ("sans-serif", 20))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(x_range, 0f64..peak + 0.5)?;
        chart
            .configure_mesh()
            .x_labels(10)
            .x_label_formatter(&|d: &NaiveDate| d.format("%-d-%b").to_string())
            .y_desc("Flow (MCM)")
            .draw()?;

        for (i, s) in series.iter().enumerate() {
            draw_flow_line(&mut chart, s, s.name(), Palette99::pick(i).to_rgba())?;
        }
        if !series.is_empty() {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()?;
        }
        root.present()?;
    }
    log::debug!("rendered dependable overview of {} junction(s)", series.len());
    Ok(svg)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jun(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    #[test]
    fn test_render_dependable() {
        let mut table = ObservationTable::new("75_Percent_Dependability", vec![jun(1), jun(2), jun(3)]);
        table.push_column("Nikhop", vec![Some(1.5), None, Some(2.0)]);
        table.push_column("Rangdum", vec![Some(0.5), Some(0.7), Some(0.6)]);
        let svg = render_dependable(&table, &ChartOptions::default()).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Nikhop"));
        assert!(svg.contains("Rangdum"));
    }

    #[test]
    fn test_render_junction() {
        let series = Series::daily("Nikhop", jun(1), vec![Some(1.0), None, Some(2.0), Some(3.0)]);
        let svg = render_junction(&series, &ChartOptions::default()).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("75% Dependable Yield - Nikhop"));
        assert!(svg.contains("Min: 1.0000"));
        assert!(svg.contains("Max: 3.0000"));
        assert!(svg.contains("Mean: 2.0000"));
    }

    #[test]
    fn test_render_junction_without_values() {
        let series = Series::daily("Dry", jun(1), vec![None, None]);
        assert_eq!(stats_lines(&series), vec!["No data"]);
        let svg = render_junction(&series, &ChartOptions::default()).unwrap();
        assert!(svg.contains("No data"));

        let empty = Series::daily("Empty", jun(1), vec![]);
        assert!(render_junction(&empty, &ChartOptions::default()).is_err());
    }

    #[test]
    fn test_render_dependable_needs_dates() {
        let table = ObservationTable::new("empty", vec![]);
        assert!(render_dependable(&table, &ChartOptions::default()).is_err());
    }
}
