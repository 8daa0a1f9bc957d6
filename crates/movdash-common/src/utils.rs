//! Utility functions used across movdash

use crate::{MovDashError, Result};
use chrono::NaiveDate;

/// Parse a `YYYY-MM-DD` date given on the command line or in a selection file
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        MovDashError::validation(format!("'{value}' is not a date in YYYY-MM-DD form"))
    })
}

/// Validate a `YYYY-MM` month bucket and return it normalized
pub fn parse_month(value: &str) -> Result<String> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d")
        .map(|d| d.format(crate::MONTH_BUCKET_FORMAT).to_string())
        .map_err(|_| {
            MovDashError::validation_field(
                format!("'{value}' is not a month in YYYY-MM form"),
                "month",
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-03-31").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()
        );
        assert!(parse_date("31/03/2024").is_err());
        assert!(parse_date("2024-02-30").is_err());
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2024-03").unwrap(), "2024-03");
        assert_eq!(parse_month("2024-3").unwrap(), "2024-03");
        assert!(parse_month("2024-13").is_err());
        assert!(parse_month("March").is_err());
    }
}
