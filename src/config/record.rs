use std::time::Duration;

use chrono::{DateTime, FixedOffset, Months, Offset, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::lib::errors::CliError;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Longest accepted request timeout (one hour).
pub const MAX_TIMEOUT_SECS: u64 = 3600;
pub const DEFAULT_TIMEZONE: &str = "UTC";
pub const DEFAULT_INACTIVITY_MONTHS: u32 = 6;

/// Field set stored for one named profile.
///
/// Keys are written in upper case (`USERNAME`, `WORKSPACE_SID`, ...). Keys
/// outside this set are ignored when the store is read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct ProfileRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_sid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_sid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inactivity_months: Option<u32>,
}

/// Offset used to render report timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportTimezone(FixedOffset);

impl ReportTimezone {
    pub fn utc() -> Self {
        Self(Utc.fix())
    }

    /// Accepts `UTC`, `Z` or a fixed offset such as `+02:00` / `-0530`.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let value = raw.trim();
        if value.eq_ignore_ascii_case("utc") || value.eq_ignore_ascii_case("z") {
            return Ok(Self::utc());
        }

        let malformed = || format!("expected UTC or an offset like +02:00, got `{value}`");

        let (sign, rest) = match value.as_bytes().first() {
            Some(b'+') => (1, &value[1..]),
            Some(b'-') => (-1, &value[1..]),
            _ => return Err(malformed()),
        };
        if !rest.is_ascii() {
            return Err(malformed());
        }
        // Only `HH:MM` or `HHMM`.
        let (hours, minutes) = match (rest.len(), rest.as_bytes().get(2)) {
            (5, Some(b':')) => (&rest[..2], &rest[3..]),
            (4, _) => (&rest[..2], &rest[2..]),
            _ => return Err(malformed()),
        };
        if !hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let hours: i32 = hours.parse().map_err(|_| format!("bad hours in `{value}`"))?;
        let minutes: i32 = minutes.parse().map_err(|_| format!("bad minutes in `{value}`"))?;
        if hours > 23 || minutes > 59 {
            return Err(format!("offset `{value}` is out of range"));
        }

        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
            .map(Self)
            .ok_or_else(|| format!("offset `{value}` is out of range"))
    }

    pub fn format(&self, timestamp: &DateTime<Utc>) -> String {
        timestamp
            .with_timezone(&self.0)
            .to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

impl Default for ReportTimezone {
    fn default() -> Self {
        Self::utc()
    }
}

/// Window after which a worker without a status change counts as inactive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InactivityWindow {
    months: u32,
}

impl InactivityWindow {
    pub const fn new(months: u32) -> Self {
        Self { months }
    }

    pub const fn months(&self) -> u32 {
        self.months
    }

    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        now.checked_sub_months(Months::new(self.months))
    }

    /// True when `last_change` lies before the window ending at `now`.
    pub fn is_inactive(&self, last_change: Option<&DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        match (last_change, self.cutoff(now)) {
            (Some(changed), Some(cutoff)) => *changed < cutoff,
            _ => false,
        }
    }
}

impl Default for InactivityWindow {
    fn default() -> Self {
        Self::new(DEFAULT_INACTIVITY_MONTHS)
    }
}

/// Derived settings of a stored profile with defaults applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileSettings {
    pub timeout: Duration,
    pub timezone: ReportTimezone,
    pub inactivity: InactivityWindow,
}

impl Default for ProfileSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            timezone: ReportTimezone::utc(),
            inactivity: InactivityWindow::default(),
        }
    }
}

pub fn parse_settings(profile: &str, record: &ProfileRecord) -> Result<ProfileSettings, CliError> {
    let timeout_secs = record.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS);
    if !(1..=MAX_TIMEOUT_SECS).contains(&timeout_secs) {
        return Err(CliError::InvalidProfileField {
            profile: profile.to_string(),
            field: "TIMEOUT",
            message: format!("timeout must be between 1 and {MAX_TIMEOUT_SECS} seconds"),
        });
    }

    let timezone = ReportTimezone::parse(record.timezone.as_deref().unwrap_or(DEFAULT_TIMEZONE))
        .map_err(|message| CliError::InvalidProfileField {
            profile: profile.to_string(),
            field: "TIMEZONE",
            message,
        })?;

    let inactivity =
        InactivityWindow::new(record.inactivity_months.unwrap_or(DEFAULT_INACTIVITY_MONTHS));

    Ok(ProfileSettings {
        timeout: Duration::from_secs(timeout_secs),
        timezone,
        inactivity,
    })
}

/// Returns the trimmed value when it is non-empty.
pub(crate) fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
