use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::macros::format_description;
use time::{Date, Month, Weekday};

use crate::ValidationError;

/// Calendar date of a trading session, serialized as ISO `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TradingDate(Date);

impl TradingDate {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let format = format_description!("[year]-[month]-[day]");
        Date::parse(input.trim(), &format)
            .map(Self)
            .map_err(|_| ValidationError::InvalidDate {
                value: input.to_owned(),
            })
    }

    pub fn from_ymd(year: i32, month: u8, day: u8) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidDate {
            value: format!("{year:04}-{month:02}-{day:02}"),
        };
        let month = Month::try_from(month).map_err(|_| invalid())?;
        Date::from_calendar_date(year, month, day)
            .map(Self)
            .map_err(|_| invalid())
    }

    pub const fn from_date(date: Date) -> Self {
        Self(date)
    }

    pub const fn into_inner(self) -> Date {
        self.0
    }

    /// Next Monday-to-Friday date. Exchange holidays are not modelled.
    pub fn next_weekday(self) -> Option<Self> {
        let mut next = self.0.next_day()?;
        while matches!(next.weekday(), Weekday::Saturday | Weekday::Sunday) {
            next = next.next_day()?;
        }
        Some(Self(next))
    }

    pub fn format_iso(self) -> String {
        format!(
            "{:04}-{:02}-{:02}",
            self.0.year(),
            u8::from(self.0.month()),
            self.0.day()
        )
    }
}

impl Display for TradingDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_iso())
    }
}

impl FromStr for TradingDate {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl Serialize for TradingDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.format_iso())
    }
}

impl<'de> Deserialize<'de> for TradingDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_date() {
        let parsed = TradingDate::parse("2025-08-29").expect("must parse");
        assert_eq!(parsed.format_iso(), "2025-08-29");
        assert_eq!(parsed, TradingDate::from_ymd(2025, 8, 29).expect("valid"));
    }

    #[test]
    fn rejects_malformed_dates() {
        for input in ["2025/08/29", "2025-02-30", "yesterday", ""] {
            let err = TradingDate::parse(input).expect_err("must fail");
            assert!(matches!(err, ValidationError::InvalidDate { .. }), "{input}");
        }
    }

    #[test]
    fn next_weekday_skips_weekend() {
        let friday = TradingDate::parse("2025-08-29").expect("must parse");
        let monday = friday.next_weekday().expect("in range");
        assert_eq!(monday.to_string(), "2025-09-01");
    }

    #[test]
    fn orders_chronologically() {
        let earlier = TradingDate::parse("2024-12-31").expect("must parse");
        let later = TradingDate::parse("2025-01-02").expect("must parse");
        assert!(earlier < later);
    }
}
