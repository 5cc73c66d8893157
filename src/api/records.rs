//! Records returned by the TaskRouter and Conversations APIs.
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One TaskRouter worker.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorkerRecord {
    pub sid: String,
    pub friendly_name: String,
    #[serde(default)]
    pub activity_name: Option<String>,
    #[serde(with = "timestamp")]
    pub date_created: DateTime<Utc>,
    #[serde(default, with = "timestamp::optional")]
    pub date_status_changed: Option<DateTime<Utc>>,
}

/// One TaskRouter task queue.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QueueRecord {
    pub sid: String,
    pub friendly_name: String,
    #[serde(default)]
    pub target_workers: Option<String>,
    #[serde(with = "timestamp")]
    pub date_created: DateTime<Utc>,
}

/// One Conversations address configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AddressRecord {
    pub sid: String,
    #[serde(default)]
    pub friendly_name: Option<String>,
    #[serde(rename = "type")]
    pub address_type: String,
    pub address: String,
    #[serde(with = "timestamp")]
    pub date_created: DateTime<Utc>,
}

/// Accepts RFC 3339 (`2024-01-02T03:04:05Z`) and RFC 2822 (`Tue, 02 Jan 2024 03:04:05 +0000`).
pub(crate) mod timestamp {
    use chrono::{DateTime, Utc};
    use serde::{de::Error, Deserialize, Deserializer};

    pub fn parse(raw: &str) -> Result<DateTime<Utc>, String> {
        DateTime::parse_from_rfc3339(raw)
            .or_else(|_| DateTime::parse_from_rfc2822(raw))
            .map(|parsed| parsed.with_timezone(&Utc))
            .map_err(|err| format!("invalid timestamp `{raw}`: {err}"))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(D::Error::custom)
    }

    pub mod optional {
        use super::*;

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) if !raw.trim().is_empty() => parse(&raw).map(Some).map_err(D::Error::custom),
                _ => Ok(None),
            }
        }
    }
}
