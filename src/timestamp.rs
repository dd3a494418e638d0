//! Transaction timestamps as sent by the transactions service.

use std::fmt::Display;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::{
    Date, OffsetDateTime, PrimitiveDateTime,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description,
};

use crate::Error;

const DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month repr:numerical padding:zero]-[day padding:zero]");

const DATE_TIME_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

const DATE_TIME_SUBSECOND_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]");

const DISPLAY_DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[day padding:zero]/[month repr:numerical padding:zero]/[year]");

/// When a transaction was created.
///
/// The original text is kept as-is so that it can be passed through
/// unchanged. The calendar date is read from the text as written, without
/// converting between timezones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamp {
    text: String,
    date: Date,
}

impl Timestamp {
    /// Parse a timestamp in one of the accepted forms:
    /// - an RFC 3339 date-time, e.g. "2020-05-10T13:00:00.000Z",
    /// - a date-time without an offset, e.g. "2020-05-10T13:00:00",
    /// - a calendar date, e.g. "2020-05-10".
    ///
    /// # Errors
    /// Returns [Error::InvalidTimestamp] if `text` is in none of these forms.
    pub fn parse(text: &str) -> Result<Self, Error> {
        let date = OffsetDateTime::parse(text, &Rfc3339)
            .map(|date_time| date_time.date())
            .or_else(|_| Date::parse(text, DATE_FORMAT))
            .or_else(|_| PrimitiveDateTime::parse(text, DATE_TIME_FORMAT).map(|dt| dt.date()))
            .or_else(|_| {
                PrimitiveDateTime::parse(text, DATE_TIME_SUBSECOND_FORMAT).map(|dt| dt.date())
            })
            .map_err(|_| Error::InvalidTimestamp(text.to_owned()))?;

        Ok(Self {
            text: text.to_owned(),
            date,
        })
    }

    /// The timestamp exactly as it was received.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The calendar date of the timestamp.
    pub fn date(&self) -> Date {
        self.date
    }

    /// The date formatted as "DD/MM/YYYY".
    pub fn display_date(&self) -> String {
        self.date
            .format(DISPLAY_DATE_FORMAT)
            .unwrap_or_else(|_| self.date.to_string())
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;

        Timestamp::parse(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::Error;

    use super::Timestamp;

    #[test]
    fn parses_calendar_date() {
        let timestamp = Timestamp::parse("2020-05-10").unwrap();

        assert_eq!(timestamp.date(), date!(2020 - 05 - 10));
        assert_eq!(timestamp.display_date(), "10/05/2020");
    }

    #[test]
    fn parses_rfc3339_without_timezone_conversion() {
        let timestamp = Timestamp::parse("2020-05-10T23:30:00.000-03:00").unwrap();

        assert_eq!(timestamp.date(), date!(2020 - 05 - 10));
        assert_eq!(timestamp.display_date(), "10/05/2020");
    }

    #[test]
    fn parses_utc_date_time() {
        let timestamp = Timestamp::parse("2021-01-02T03:04:05Z").unwrap();

        assert_eq!(timestamp.display_date(), "02/01/2021");
    }

    #[test]
    fn parses_date_time_without_offset() {
        assert_eq!(
            Timestamp::parse("2019-12-31T18:00:00").unwrap().display_date(),
            "31/12/2019"
        );
        assert_eq!(
            Timestamp::parse("2019-12-31T18:00:00.123").unwrap().display_date(),
            "31/12/2019"
        );
    }

    #[test]
    fn keeps_original_text() {
        let text = "2020-05-10T13:00:00.000Z";
        let timestamp = Timestamp::parse(text).unwrap();

        assert_eq!(timestamp.as_str(), text);
        assert_eq!(timestamp.to_string(), text);
        assert_eq!(serde_json::to_string(&timestamp).unwrap(), format!("\"{text}\""));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(
            Timestamp::parse("yesterday"),
            Err(Error::InvalidTimestamp("yesterday".to_owned()))
        );
        assert_eq!(
            Timestamp::parse("2020-13-40"),
            Err(Error::InvalidTimestamp("2020-13-40".to_owned()))
        );
    }

    #[test]
    fn deserialize_rejects_invalid_timestamp() {
        let result: Result<Timestamp, _> = serde_json::from_str("\"10/05/2020\"");

        assert!(result.is_err());
    }
}
