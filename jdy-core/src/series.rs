use crate::date_range::DateRange;
use crate::error::{Result, YieldError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single dated observation. `value` is `None` when the source had no data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

/// An ordered run of observations for one junction.
///
/// Dates are strictly increasing; this is checked whenever a series is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    name: String,
    points: Vec<DataPoint>,
}

impl Series {
    /// Build a series from parallel date and value vectors.
    pub fn new(
        name: impl Into<String>,
        dates: Vec<NaiveDate>,
        values: Vec<Option<f64>>,
    ) -> Result<Series> {
        let name = name.into();
        if dates.len() != values.len() {
            return Err(YieldError::MalformedSeries {
                name,
                detail: format!("{} dates but {} values", dates.len(), values.len()),
            });
        }
        let points = dates
            .into_iter()
            .zip(values)
            .map(|(date, value)| DataPoint { date, value })
            .collect();
        Series::from_points(name, points)
    }

    /// Build a series from points already paired with their dates.
    pub fn from_points(name: impl Into<String>, points: Vec<DataPoint>) -> Result<Series> {
        let name = name.into();
        if let Some(pair) = points.windows(2).find(|pair| pair[0].date >= pair[1].date) {
            return Err(YieldError::MalformedSeries {
                detail: format!("{} is not followed by a later date ({})", pair[0].date, pair[1].date),
                name,
            });
        }
        Ok(Series { name, points })
    }

    /// A daily series starting at `start`, one day per value.
    pub fn daily(name: impl Into<String>, start: NaiveDate, values: Vec<Option<f64>>) -> Series {
        let points = DateRange::days_from(start, values.len())
            .zip(values)
            .map(|(date, value)| DataPoint { date, value })
            .collect();
        Series {
            name: name.into(),
            points,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.points.iter().map(|p| p.date)
    }

    pub fn values(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.points.iter().map(|p| p.value)
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    /// Largest valid value, ignoring missing observations.
    pub fn max_value(&self) -> Option<f64> {
        self.values().flatten().reduce(f64::max)
    }

    /// Smallest valid value, ignoring missing observations.
    pub fn min_value(&self) -> Option<f64> {
        self.values().flatten().reduce(f64::min)
    }

    /// Split the series into maximal stretches of valid values, so that
    /// missing observations show up as gaps rather than zeros.
    pub fn valid_segments(&self) -> Vec<Vec<(NaiveDate, f64)>> {
        let mut segments = Vec::new();
        let mut current = Vec::new();
        for point in &self.points {
            match point.value {
                Some(v) => current.push((point.date, v)),
                None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
                None => {}
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jun(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    #[test]
    fn test_new_rejects_length_mismatch() {
        let err = Series::new("Nikhop", vec![jun(1), jun(2)], vec![Some(1.0)]).unwrap_err();
        assert!(matches!(err, YieldError::MalformedSeries { .. }));
    }

    #[test]
    fn test_new_rejects_unordered_dates() {
        let err = Series::new("Nikhop", vec![jun(2), jun(2)], vec![Some(1.0), None]).unwrap_err();
        assert!(matches!(err, YieldError::MalformedSeries { .. }));
    }

    #[test]
    fn test_daily_assigns_consecutive_dates() {
        let series = Series::daily("Nikhop", jun(29), vec![Some(1.0), None, Some(2.0)]);
        assert_eq!(series.len(), 3);
        assert_eq!(series.last_date(), NaiveDate::from_ymd_opt(2024, 7, 1));
    }

    #[test]
    fn test_min_max_ignore_missing() {
        let series = Series::daily("Nikhop", jun(1), vec![None, Some(2.5), Some(0.5), None]);
        assert_eq!(series.max_value(), Some(2.5));
        assert_eq!(series.min_value(), Some(0.5));
        let empty = Series::daily("Empty", jun(1), vec![None, None]);
        assert_eq!(empty.max_value(), None);
    }

    #[test]
    fn test_valid_segments_break_on_missing() {
        let series = Series::daily(
            "Nikhop",
            jun(1),
            vec![Some(1.0), Some(2.0), None, None, Some(3.0)],
        );
        let segments = series.valid_segments();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0], vec![(jun(1), 1.0), (jun(2), 2.0)]);
        assert_eq!(segments[1], vec![(jun(5), 3.0)]);
    }
}
