use chrono::{Datelike, NaiveDate};

use crate::error::AppError;

/// Canonical English month names. The normalizer isolates exactly these
/// spellings, so dates rendered into prompts must use them too.
pub const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Parse an ISO `YYYY-MM-DD` date. A trailing time part (`2024-06-21T00:00:00Z`)
/// is ignored, as browsers commonly send one.
pub fn parse_date(value: &str) -> Result<NaiveDate, AppError> {
    let trimmed = value.trim();
    let date_part = trimmed.split_once('T').map_or(trimmed, |(date, _)| date);

    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("تاریخ نامعتبر است: {trimmed}")))
}

/// Render a date as `{day} {Month} {year}`, e.g. `21 June 2024`.
pub fn format_naive_date(date: NaiveDate) -> String {
    format!("{} {} {}", date.day(), MONTHS[date.month0() as usize], date.year())
}

/// Parse and render an ISO date string.
pub fn format_date(value: &str) -> Result<String, AppError> {
    parse_date(value).map(format_naive_date)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_date_should_use_day_month_year() {
        assert_eq!(format_date("2024-06-21").unwrap(), "21 June 2024");
    }

    #[test]
    fn format_date_should_not_pad_day() {
        assert_eq!(format_date("2024-06-01").unwrap(), "1 June 2024");
        assert_eq!(format_date("2025-01-07").unwrap(), "7 January 2025");
    }

    #[test]
    fn format_date_should_ignore_time_part() {
        assert_eq!(
            format_date("2024-12-31T20:30:00.000Z").unwrap(),
            "31 December 2024"
        );
    }

    #[test]
    fn format_date_should_reject_invalid_dates() {
        assert!(matches!(
            format_date("2024-02-30"),
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(format_date("tomorrow"), Err(AppError::ValidationError(_))));
        assert!(matches!(format_date(""), Err(AppError::ValidationError(_))));
    }

    #[test]
    fn every_month_should_render_with_its_canonical_name() {
        for (index, name) in MONTHS.iter().enumerate() {
            let date = NaiveDate::from_ymd_opt(2024, index as u32 + 1, 15).unwrap();
            assert_eq!(format_naive_date(date), format!("15 {name} 2024"));
        }
    }
}
