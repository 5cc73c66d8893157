//! Platform REST client: credentials, record streams, and the client seam.
//!
//! Dispatch code only sees [`PlatformClient`] and [`ClientFactory`]; the HTTP
//! implementation lives in [`http`].
use std::{fmt, time::Duration};

use crate::lib::errors::ApiError;

pub mod http;
pub mod pagination;
pub mod records;

pub use http::{HttpClientFactory, HttpPlatformClient};
pub use records::{AddressRecord, QueueRecord, WorkerRecord};

/// Default number of records requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 50;
/// Largest page size the platform accepts.
pub const MAX_PAGE_SIZE: u32 = 1000;
/// Basic-auth username sent in token mode.
pub const TOKEN_AUTH_USERNAME: &str = "token";

/// Lazily pulled sequence of records; each item may carry a request failure.
pub type RecordStream<'a, T> = Box<dyn Iterator<Item = Result<T, ApiError>> + 'a>;

/// Credentials presented to the platform.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Account SID and auth token.
    Basic { username: String, password: String },
    /// Support token.
    Token(String),
}

impl Credentials {
    /// Username/password pair for HTTP basic authentication.
    pub fn basic_auth(&self) -> (&str, &str) {
        match self {
            Credentials::Basic { username, password } => (username, password),
            Credentials::Token(token) => (TOKEN_AUTH_USERNAME, token),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Credentials::Token(_) => f.debug_tuple("Token").field(&"<redacted>").finish(),
        }
    }
}

/// Per-connection settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientSettings {
    pub timeout: Duration,
    pub page_size: u32,
}

/// Capabilities consumed from the platform.
pub trait PlatformClient {
    /// Default Conversations service SID; doubles as a credential check.
    fn default_conversation_service(&self) -> Result<String, ApiError>;
    fn workers<'a>(&'a self, workspace_sid: &str) -> RecordStream<'a, WorkerRecord>;
    fn task_queues<'a>(&'a self, workspace_sid: &str) -> RecordStream<'a, QueueRecord>;
    fn address_configurations(&self) -> RecordStream<'_, AddressRecord>;
}

/// Builds authenticated clients.
pub trait ClientFactory {
    fn connect(
        &self,
        credentials: &Credentials,
        settings: &ClientSettings,
    ) -> Result<Box<dyn PlatformClient>, ApiError>;
}
