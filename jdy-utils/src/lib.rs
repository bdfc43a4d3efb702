//! Shared utility functions for JDY crates.

/// Date utility functions
pub mod dates {
    use anyhow::{anyhow, Context};
    use chrono::{Datelike, NaiveDate};

    /// Year that season dates ("1-Jun") are placed in. A leap year, so that
    /// "29-Feb" rows still parse.
    pub const SEASON_YEAR: i32 = 2024;

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    /// Format a NaiveDate as a season date, e.g. "1-Jun"
    pub fn format_season_date(date: &NaiveDate) -> String {
        date.format("%-d-%b").to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s, "%Y-%m-%d")?)
    }

    /// Parse a season date such as "1-Jun" or "01-June" into [`SEASON_YEAR`].
    pub fn parse_season_date(s: &str) -> anyhow::Result<NaiveDate> {
        let with_year = format!("{SEASON_YEAR}-{}", s.trim());
        NaiveDate::parse_from_str(&with_year, "%Y-%d-%b")
            .with_context(|| format!("not a season date: {s:?}"))
    }

    /// Parse a sheet date cell. Accepts ISO dates (optionally followed by a
    /// time, as spreadsheet exports often add one) and season dates.
    pub fn parse_sheet_date(s: &str) -> anyhow::Result<NaiveDate> {
        let cell = s.trim();
        let first_token = cell.split_whitespace().next().unwrap_or("");
        if let Ok(date) = parse_date(first_token) {
            return Ok(date);
        }
        parse_season_date(cell).map_err(|_| anyhow!("unrecognized date {cell:?}"))
    }

    /// True when every date falls inside [`SEASON_YEAR`], so the year can be
    /// dropped when writing.
    pub fn all_in_season_year(dates: &[NaiveDate]) -> bool {
        dates.iter().all(|d| d.year() == SEASON_YEAR)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_parse_season_date() {
            let jun1 = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
            assert_eq!(parse_season_date("1-Jun").unwrap(), jun1);
            assert_eq!(parse_season_date("01-Jun").unwrap(), jun1);
            assert_eq!(
                parse_season_date("29-Feb").unwrap(),
                NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
            );
            assert!(parse_season_date("32-Jun").is_err());
        }

        #[test]
        fn test_parse_sheet_date() {
            let oct31 = NaiveDate::from_ymd_opt(2024, 10, 31).unwrap();
            assert_eq!(parse_sheet_date("2024-10-31").unwrap(), oct31);
            assert_eq!(parse_sheet_date("2024-10-31 00:00:00").unwrap(), oct31);
            assert_eq!(parse_sheet_date(" 31-Oct ").unwrap(), oct31);
            assert!(parse_sheet_date("Date").is_err());
        }

        #[test]
        fn test_format_and_parse() {
            let date = NaiveDate::from_ymd_opt(2024, 6, 5).unwrap();
            assert_eq!(format_season_date(&date), "5-Jun");
            assert_eq!(parse_season_date(&format_season_date(&date)).unwrap(), date);
            let formatted = format_date(&date);
            assert_eq!(formatted, "2024-06-05");
            assert_eq!(parse_date(&formatted).unwrap(), date);
        }

        #[test]
        fn test_all_in_season_year() {
            let a = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
            let b = NaiveDate::from_ymd_opt(1975, 6, 1).unwrap();
            assert!(all_in_season_year(&[a]));
            assert!(!all_in_season_year(&[a, b]));
        }
    }
}

/// Sheet naming helpers
pub mod sheets {
    /// Longest sheet name spreadsheet applications accept.
    pub const MAX_SHEET_NAME_LEN: usize = 31;

    /// Replace characters spreadsheets reject in sheet names and truncate to
    /// [`MAX_SHEET_NAME_LEN`] characters.
    pub fn sanitize_sheet_name(name: &str) -> String {
        name.chars()
            .map(|c| match c {
                ':' | '\\' | '/' | '?' | '*' | '[' | ']' => '_',
                c => c,
            })
            .take(MAX_SHEET_NAME_LEN)
            .collect()
    }

    /// Sanitized form of `name` that is not in `taken`, suffixed `_2`, `_3`,
    /// ... on collision and still within [`MAX_SHEET_NAME_LEN`].
    pub fn unique_sheet_name(name: &str, taken: &[String]) -> String {
        let base = sanitize_sheet_name(name);
        if !taken.contains(&base) {
            return base;
        }
        (2..)
            .map(|n| {
                let suffix = format!("_{n}");
                let keep = MAX_SHEET_NAME_LEN - suffix.len();
                format!("{}{}", base.chars().take(keep).collect::<String>(), suffix)
            })
            .find(|candidate| !taken.contains(candidate))
            .unwrap_or(base)
    }

    /// True for headers a spreadsheet export invents for blank columns.
    pub fn is_placeholder_header(header: &str) -> bool {
        let header = header.trim();
        header.is_empty() || header.starts_with("Unnamed")
    }

}
