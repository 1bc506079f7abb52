//! `DD-MON-YYYY` dates as printed in the score report (`15-MAY-2025`).
//!
//! Usable as a serde `with` module on `NaiveDate` fields.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serializer};

/// chrono pattern for the report's date form. `%b` parses case-insensitively.
pub const REPORT_DATE_FORMAT: &str = "%d-%b-%Y";

/// Parse a report date such as `15-MAY-2025`.
pub fn parse(s: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(s.trim(), REPORT_DATE_FORMAT)
}

/// Render a date in the report's form, upper-casing the month.
pub fn format(date: &NaiveDate) -> String {
    date.format(REPORT_DATE_FORMAT).to_string().to_uppercase()
}

pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format(date))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse(&s).map_err(|e| serde::de::Error::custom(format!("invalid date {s:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_uppercases_month() {
        let d = NaiveDate::from_ymd_opt(2025, 5, 15).unwrap();
        assert_eq!(format(&d), "15-MAY-2025");
    }

    #[test]
    fn test_parse_any_case() {
        let d = NaiveDate::from_ymd_opt(2025, 5, 2).unwrap();
        assert_eq!(parse("02-MAY-2025").unwrap(), d);
        assert_eq!(parse("02-May-2025").unwrap(), d);
        assert_eq!(parse(" 02-may-2025 ").unwrap(), d);
    }

    #[test]
    fn test_parse_rejects_impossible_dates() {
        assert!(parse("31-FEB-2025").is_err());
        assert!(parse("2025-05-15").is_err());
    }
}
