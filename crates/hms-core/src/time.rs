//! Timestamp parsing and display formatting
//!
//! The backend emits `created_at` either as RFC 3339 with an offset or as a
//! naive ISO timestamp; naive values are taken as UTC.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use std::fmt;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a backend timestamp.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Date as shown in tables, e.g. `1/5/2025`.
pub fn format_date<Tz>(at: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    at.with_timezone(tz).format("%-m/%-d/%Y").to_string()
}

/// Time of day as shown in tables, e.g. `9:05:00 AM`.
pub fn format_time<Tz>(at: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    at.with_timezone(tz).format("%-I:%M:%S %p").to_string()
}

/// `serde(with = ...)` adapter for lenient backend timestamps
pub mod timestamp {
    use super::parse_timestamp;
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    /// Serialize as RFC 3339
    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&at.to_rfc3339())
    }

    /// Deserialize RFC 3339 or naive ISO (as UTC)
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_timestamp(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid timestamp '{raw}'")))
    }

    /// Same as the parent module for `Option<DateTime<Utc>>`
    pub mod option {
        use super::parse_timestamp;
        use chrono::{DateTime, Utc};
        use serde::{de, Deserialize, Deserializer, Serializer};

        /// Serialize as RFC 3339 or null
        pub fn serialize<S: Serializer>(
            at: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match at {
                Some(at) => serializer.serialize_some(&at.to_rfc3339()),
                None => serializer.serialize_none(),
            }
        }

        /// Deserialize an optional lenient timestamp
        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) => parse_timestamp(&raw)
                    .map(Some)
                    .ok_or_else(|| de::Error::custom(format!("invalid timestamp '{raw}'"))),
                None => Ok(None),
            }
        }
    }

    /// Optional timestamp where anything unparsable reads as `None`
    ///
    /// Pair with `#[serde(default)]` so a missing key is accepted too.
    pub mod lenient {
        use super::parse_timestamp;
        use chrono::{DateTime, Utc};
        use serde::de::IgnoredAny;
        use serde::{Deserialize, Deserializer, Serializer};

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Other(IgnoredAny),
        }

        /// Serialize as RFC 3339 or null
        pub fn serialize<S: Serializer>(
            at: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            super::option::serialize(at, serializer)
        }

        /// Deserialize, never failing on the value itself
        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            Ok(match Raw::deserialize(deserializer)? {
                Raw::Text(raw) => parse_timestamp(&raw),
                Raw::Other(_) => None,
            })
        }
    }
}
