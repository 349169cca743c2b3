//! Vote timestamps on the wire.
//!
//! Every `voteDate` is written as `02 Jan 06 15:04 -0700` (day, short month,
//! two-digit year, hour and minute, numeric offset), whether it is headed for
//! an HTTP body or a stored voter document. Decoding accepts the same pattern
//! and treats `"null"` as the zero timestamp.

use serde::{de, ser, Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};
use time::{macros::{datetime, format_description}, Duration, OffsetDateTime};

/// Example of the wire layout, used in error messages.
pub const VOTE_DATE_LAYOUT: &str = "02 Jan 06 15:04 -0700";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid vote date {text:?}, expected format like \"{VOTE_DATE_LAYOUT}\"")]
pub struct VoteDateError {
    pub text: String,
}

/// A point in time at minute precision with the offset it was recorded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VoteDate(OffsetDateTime);

impl VoteDate {
    /// `0001-01-01 00:00 +0000`, what `"null"` decodes to. Its wire form
    /// `01 Jan 01 00:00 +0000` reads back as 2001, so a zero date that has
    /// been encoded and decoded is no longer `is_zero`.
    pub const ZERO: VoteDate = VoteDate(datetime!(0001-01-01 0:00 UTC));

    pub fn now() -> Self {
        Self::from_datetime(OffsetDateTime::now_utc())
    }

    /// Drops seconds and sub-seconds so the value survives a trip through
    /// the wire format unchanged.
    pub fn from_datetime(datetime: OffsetDateTime) -> Self {
        let datetime = datetime
            - Duration::seconds(i64::from(datetime.second()))
            - Duration::nanoseconds(i64::from(datetime.nanosecond()));
        Self(datetime)
    }

    pub fn datetime(&self) -> OffsetDateTime {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    pub fn to_wire(&self) -> Result<String, time::error::Format> {
        self.0.format(format_description!(
            "[day] [month repr:short] [year repr:last_two] [hour]:[minute] [offset_hour sign:mandatory][offset_minute]"
        ))
    }

    pub fn parse(text: &str) -> Result<Self, VoteDateError> {
        let invalid = || VoteDateError { text: text.to_string() };

        let trimmed = text.trim_matches('"');
        if trimmed == "null" {
            return Ok(Self::ZERO);
        }

        let parts: Vec<&str> = trimmed.split(' ').collect();
        let [day, month, year, clock, offset] = parts.as_slice() else {
            return Err(invalid());
        };
        if year.len() != 2 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        // Two-digit years pivot at 69: 69..=99 is the 1900s, 00..=68 the 2000s.
        let short: i32 = year.parse().map_err(|_| invalid())?;
        let full_year = if short >= 69 { 1900 + short } else { 2000 + short };

        let expanded = format!("{day} {month} {full_year} {clock} {offset}");
        OffsetDateTime::parse(
            &expanded,
            format_description!(
                "[day] [month repr:short case_sensitive:false] [year] [hour]:[minute] [offset_hour sign:mandatory][offset_minute]"
            ),
        )
        .map(Self)
        .map_err(|_| invalid())
    }
}

impl Default for VoteDate {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<OffsetDateTime> for VoteDate {
    fn from(datetime: OffsetDateTime) -> Self {
        Self::from_datetime(datetime)
    }
}

impl fmt::Display for VoteDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.to_wire().map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl FromStr for VoteDate {
    type Err = VoteDateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for VoteDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let text = self.to_wire().map_err(<S::Error as ser::Error>::custom)?;
        serializer.serialize_str(&text)
    }
}

impl<'de> Deserialize<'de> for VoteDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(Self::ZERO),
            Some(text) => Self::parse(&text).map_err(de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{macros::offset, UtcOffset};

    #[test]
    fn formats_with_two_digit_year_and_offset() {
        let date = VoteDate::from_datetime(datetime!(2006-01-02 15:04:59 -7));
        assert_eq!(date.to_string(), "02 Jan 06 15:04 -0700");
    }

    #[test]
    fn round_trip_truncates_to_minute_and_keeps_offset() {
        let original = datetime!(2023-11-05 08:30:45.123 +5:30);
        let date = VoteDate::from(original);

        let json = serde_json::to_string(&date).unwrap();
        assert_eq!(json, "\"05 Nov 23 08:30 +0530\"");

        let decoded: VoteDate = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, date);
        assert_eq!(decoded.datetime(), datetime!(2023-11-05 08:30 +5:30));
        assert_eq!(decoded.datetime().offset(), offset!(+5:30));
    }

    #[test]
    fn null_decodes_to_zero() {
        let quoted: VoteDate = serde_json::from_str("\"null\"").unwrap();
        let literal: VoteDate = serde_json::from_str("null").unwrap();
        assert!(quoted.is_zero());
        assert!(literal.is_zero());
        assert_eq!(literal.datetime().offset(), UtcOffset::UTC);
    }

    #[test]
    fn rejects_other_layouts() {
        assert!(VoteDate::parse("2023-11-05T08:30:00Z").is_err());
        assert!(VoteDate::parse("05 Nov 2023 08:30 +0530").is_err());
        assert!(VoteDate::parse("05 Nov 23 08:30").is_err());
        assert!(serde_json::from_str::<VoteDate>("\"yesterday\"").is_err());
    }

    #[test]
    fn month_names_ignore_case() {
        let expected = datetime!(2023-11-05 08:30 +5:30);
        assert_eq!(VoteDate::parse("05 nov 23 08:30 +0530").unwrap().datetime(), expected);
        assert_eq!(VoteDate::parse("05 NOV 23 08:30 +0530").unwrap().datetime(), expected);
    }

    #[test]
    fn zero_reads_back_as_2001() {
        let wire = VoteDate::ZERO.to_string();
        assert_eq!(wire, "01 Jan 01 00:00 +0000");

        let decoded: VoteDate = wire.parse().unwrap();
        assert!(!decoded.is_zero());
        assert_eq!(decoded.datetime(), datetime!(2001-01-01 0:00 UTC));
        assert_eq!(decoded.to_string(), wire);
    }

    #[test]
    fn two_digit_years_pivot_at_69() {
        assert_eq!(VoteDate::parse("01 Jan 69 00:00 +0000").unwrap().datetime().year(), 1969);
        assert_eq!(VoteDate::parse("01 Jan 68 00:00 +0000").unwrap().datetime().year(), 2068);
    }
}
