use std::{io, path::PathBuf, process::ExitCode};

use thiserror::Error;

/// Failures reported by the platform REST client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The HTTP client could not be built (TLS backend, invalid timeout, ...).
    #[error("Failed to build HTTP client: {source}")]
    Client {
        #[source]
        source: reqwest::Error,
    },
    /// Transport-level failure before a response arrived.
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// The platform answered with a non-success status.
    #[error("{url} returned HTTP {status}: {message}")]
    Status {
        url: String,
        status: u16,
        message: String,
    },
    /// The response body did not match the expected shape.
    #[error("Unexpected response from {url}: {message}")]
    Decode { url: String, message: String },
}

impl ApiError {
    /// True when the platform rejected the supplied credentials.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Status { status: 401 | 403, .. })
    }
}

/// Terminal failures of one CLI invocation.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Profile '{name}' not found in {path}")]
    ProfileNotFound { name: String, path: PathBuf },
    #[error("Profile store {path} is unreadable: {message}")]
    StoreUnreadable { path: PathBuf, message: String },
    #[error("Failed to write profile store {path}: {message}")]
    StoreWrite { path: PathBuf, message: String },
    #[error("Missing credentials for profile '{profile}': {message}")]
    MissingCredentials { profile: String, message: String },
    #[error("No TaskRouter workspace SID for profile '{profile}'; pass -w/--workspace-sid or store WORKSPACE_SID")]
    MissingWorkspace { profile: String },
    #[error("{operation} is not permitted with {auth_mode} authentication")]
    UnauthorizedOperation {
        operation: &'static str,
        auth_mode: &'static str,
    },
    #[error("Platform request failed: {source}")]
    ExternalService {
        #[from]
        source: ApiError,
    },
    #[error("Profile '{profile}' has invalid `{field}`: {message}")]
    InvalidProfileField {
        profile: String,
        field: &'static str,
        message: String,
    },
    #[error("Interactive input failed: {message}")]
    Prompt { message: String },
    #[error("Failed to write report {path}: {message}")]
    Report { path: PathBuf, message: String },
}

impl CliError {
    /// Stable machine-readable code printed alongside the message.
    pub const fn code(&self) -> &'static str {
        match self {
            CliError::ProfileNotFound { .. } => "PROFILE_NOT_FOUND",
            CliError::StoreUnreadable { .. } => "STORE_UNREADABLE",
            CliError::StoreWrite { .. } => "STORE_WRITE",
            CliError::MissingCredentials { .. } => "MISSING_CREDENTIALS",
            CliError::MissingWorkspace { .. } => "MISSING_WORKSPACE",
            CliError::UnauthorizedOperation { .. } => "UNAUTHORIZED_OPERATION",
            CliError::ExternalService { .. } => "EXTERNAL_SERVICE",
            CliError::InvalidProfileField { .. } => "INVALID_PROFILE_FIELD",
            CliError::Prompt { .. } => "PROMPT_FAILED",
            CliError::Report { .. } => "REPORT_FAILED",
        }
    }

    /// Raw process exit status for this failure.
    pub const fn exit_status(&self) -> u8 {
        match self {
            CliError::ProfileNotFound { .. } => 10,
            CliError::StoreUnreadable { .. } => 11,
            CliError::StoreWrite { .. } => 12,
            CliError::MissingCredentials { .. } => 13,
            CliError::MissingWorkspace { .. } => 14,
            CliError::UnauthorizedOperation { .. } => 15,
            CliError::ExternalService { .. } => 16,
            CliError::InvalidProfileField { .. } => 17,
            CliError::Prompt { .. } => 18,
            CliError::Report { .. } => 19,
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit_status())
    }

    pub(crate) fn store_unreadable(path: PathBuf, message: impl Into<String>) -> Self {
        Self::StoreUnreadable {
            path,
            message: message.into(),
        }
    }

    pub(crate) fn store_write(path: PathBuf, source: &io::Error) -> Self {
        Self::StoreWrite {
            path,
            message: source.to_string(),
        }
    }

    pub(crate) fn report(path: PathBuf, message: impl ToString) -> Self {
        Self::Report {
            path,
            message: message.to_string(),
        }
    }
}

impl From<dialoguer::Error> for CliError {
    fn from(value: dialoguer::Error) -> Self {
        CliError::Prompt {
            message: value.to_string(),
        }
    }
}
