use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

/// Wire and display format for due dates.
pub const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Parse a `YYYY-MM-DD` calendar date.
///
/// # Errors
/// Returns an error if the string is not a valid calendar date.
pub fn parse_date(s: &str) -> Result<Date, time::error::Parse> {
    Date::parse(s.trim(), DATE_FORMAT)
}

/// Render a date as `YYYY-MM-DD`.
#[must_use]
pub fn format_date(date: Date) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), u8::from(date.month()), date.day())
}

/// Serde adapter storing dates as `YYYY-MM-DD` strings.
pub mod serde_date {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Date;

    /// Serialize a date as `YYYY-MM-DD`.
    ///
    /// # Errors
    /// Propagates serializer failures.
    pub fn serialize<S>(date: &Date, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&super::format_date(*date))
    }

    /// Deserialize a `YYYY-MM-DD` string.
    ///
    /// # Errors
    /// Fails when the input is not a valid calendar date.
    pub fn deserialize<'de, D>(d: D) -> Result<Date, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(d)?;
        super::parse_date(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn parse_and_format_agree() {
        let parsed = parse_date(" 2024-02-29 ").unwrap_or_else(|err| panic!("leap day: {err}"));
        assert_eq!(parsed, date!(2024 - 02 - 29));
        assert_eq!(format_date(parsed), "2024-02-29");
    }

    #[test]
    fn parse_rejects_impossible_dates() {
        assert!(parse_date("2023-02-29").is_err());
        assert!(parse_date("05/01/2024").is_err());
        assert!(parse_date("").is_err());
    }
}
