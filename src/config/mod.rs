//! Resolve the effective configuration for one invocation.
use std::time::Duration;

use tracing::error;

use crate::{api::Credentials, lib::errors::CliError};

pub mod record;
pub mod store;
pub mod telemetry;

pub use record::{
    parse_settings, InactivityWindow, ProfileRecord, ProfileSettings, ReportTimezone,
    DEFAULT_INACTIVITY_MONTHS, DEFAULT_TIMEOUT_SECS, DEFAULT_TIMEZONE, MAX_TIMEOUT_SECS,
};
pub use store::{is_guest_profile, ProfileStore, StoredProfile, GUEST_PROFILE, GUEST_PROFILE_ALIAS};

use record::non_empty;

/// Credential scheme in effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    UsernamePassword,
    Token,
}

impl AuthMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            AuthMode::UsernamePassword => "username/password",
            AuthMode::Token => "token",
        }
    }
}

/// Effective configuration; built once and read-only afterwards.
#[derive(Debug, Clone)]
pub struct Configuration {
    profile: String,
    guest: bool,
    credentials: Credentials,
    workspace_sid: Option<String>,
    service_sid: Option<String>,
    settings: ProfileSettings,
}

impl Configuration {
    pub fn profile(&self) -> &str {
        &self.profile
    }

    pub fn is_guest(&self) -> bool {
        self.guest
    }

    pub fn auth_mode(&self) -> AuthMode {
        match self.credentials {
            Credentials::Basic { .. } => AuthMode::UsernamePassword,
            Credentials::Token(_) => AuthMode::Token,
        }
    }

    pub fn workspace_sid(&self) -> Option<&str> {
        self.workspace_sid.as_deref()
    }

    pub fn service_sid(&self) -> Option<&str> {
        self.service_sid.as_deref()
    }

    pub fn timeout(&self) -> Duration {
        self.settings.timeout
    }

    pub fn timezone(&self) -> ReportTimezone {
        self.settings.timezone
    }

    pub fn inactivity(&self) -> InactivityWindow {
        self.settings.inactivity
    }

    /// Replace the inactivity window for this invocation (`--months`).
    pub fn with_inactivity_months(mut self, months: Option<u32>) -> Self {
        if let Some(months) = months {
            self.settings.inactivity = InactivityWindow::new(months);
        }
        self
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}

/// Build the configuration for `profile`, layering `runtime_token` on top.
///
/// Fails with `MissingCredentials` when neither username/password nor a token
/// is available, so no API call is ever attempted without credentials.
pub fn resolve(
    store: &ProfileStore,
    profile: &str,
    runtime_token: Option<&str>,
) -> Result<Configuration, CliError> {
    let runtime_token = non_empty(runtime_token);
    let resolved = match store.load_profile(profile)? {
        StoredProfile::Guest => guest_configuration(profile, runtime_token),
        StoredProfile::Named(record) => named_configuration(profile, record, runtime_token),
    };

    match resolved {
        Ok(config) => {
            telemetry::log_resolved(&config);
            Ok(config)
        }
        Err(err) => {
            error!(
                target: "flex_support_cli::config",
                profile,
                reason = %err,
                "Failed to resolve configuration"
            );
            Err(err)
        }
    }
}

fn guest_configuration(
    profile: &str,
    runtime_token: Option<String>,
) -> Result<Configuration, CliError> {
    let token = runtime_token.ok_or_else(|| CliError::MissingCredentials {
        profile: profile.to_string(),
        message: "the guest profile requires --token (or FLEX_SUPPORT_TOKEN)".into(),
    })?;

    Ok(Configuration {
        profile: profile.to_string(),
        guest: true,
        credentials: Credentials::Token(token),
        workspace_sid: None,
        service_sid: None,
        settings: ProfileSettings::default(),
    })
}

fn named_configuration(
    profile: &str,
    record: ProfileRecord,
    runtime_token: Option<String>,
) -> Result<Configuration, CliError> {
    let settings = parse_settings(profile, &record)?;
    let username = non_empty(record.username.as_deref());
    let password = non_empty(record.password.as_deref());
    let token = runtime_token.or_else(|| non_empty(record.token.as_deref()));

    let credentials = match (username, password, token) {
        (Some(username), Some(password), _) => Credentials::Basic { username, password },
        (_, _, Some(token)) => Credentials::Token(token),
        _ => {
            return Err(CliError::MissingCredentials {
                profile: profile.to_string(),
                message: "store USERNAME and PASSWORD or TOKEN, or pass --token".into(),
            })
        }
    };

    Ok(Configuration {
        profile: profile.to_string(),
        guest: false,
        credentials,
        workspace_sid: non_empty(record.workspace_sid.as_deref()),
        service_sid: non_empty(record.service_sid.as_deref()),
        settings,
    })
}
