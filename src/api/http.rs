//! Blocking HTTP implementation of [`PlatformClient`].
use std::env;

use reqwest::{blocking::Client, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::{
    pagination::{decode_page, PageStream},
    AddressRecord, ClientFactory, ClientSettings, Credentials, PlatformClient, QueueRecord,
    RecordStream, WorkerRecord,
};
use crate::lib::errors::ApiError;

pub const TASKROUTER_BASE_URL: &str = "https://taskrouter.twilio.com";
pub const CONVERSATIONS_BASE_URL: &str = "https://conversations.twilio.com";
pub const TASKROUTER_URL_ENV: &str = "FLEX_SUPPORT_TASKROUTER_URL";
pub const CONVERSATIONS_URL_ENV: &str = "FLEX_SUPPORT_CONVERSATIONS_URL";

const USER_AGENT: &str = concat!("flex-support-cli/", env!("CARGO_PKG_VERSION"));

/// Base URLs of the two API domains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub taskrouter: String,
    pub conversations: String,
}

impl Endpoints {
    /// Production hosts unless overridden by environment variables.
    pub fn from_env() -> Self {
        let pick = |key: &str, default: &str| {
            env::var(key)
                .ok()
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        Self {
            taskrouter: pick(TASKROUTER_URL_ENV, TASKROUTER_BASE_URL),
            conversations: pick(CONVERSATIONS_URL_ENV, CONVERSATIONS_BASE_URL),
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            taskrouter: TASKROUTER_BASE_URL.to_string(),
            conversations: CONVERSATIONS_BASE_URL.to_string(),
        }
    }
}

/// Factory producing [`HttpPlatformClient`]s.
#[derive(Debug, Clone, Default)]
pub struct HttpClientFactory {
    endpoints: Endpoints,
}

impl HttpClientFactory {
    pub fn new(endpoints: Endpoints) -> Self {
        Self { endpoints }
    }

    pub fn from_env() -> Self {
        Self::new(Endpoints::from_env())
    }
}

impl ClientFactory for HttpClientFactory {
    fn connect(
        &self,
        credentials: &Credentials,
        settings: &ClientSettings,
    ) -> Result<Box<dyn PlatformClient>, ApiError> {
        let client = HttpPlatformClient::new(credentials.clone(), settings, self.endpoints.clone())?;
        Ok(Box::new(client))
    }
}

/// REST client authenticating every request with HTTP basic auth.
#[derive(Debug)]
pub struct HttpPlatformClient {
    http: Client,
    credentials: Credentials,
    endpoints: Endpoints,
    page_size: u32,
}

impl HttpPlatformClient {
    pub fn new(
        credentials: Credentials,
        settings: &ClientSettings,
        endpoints: Endpoints,
    ) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(settings.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| ApiError::Client { source })?;
        Ok(Self {
            http,
            credentials,
            endpoints,
            page_size: settings.page_size,
        })
    }

    fn get_json(&self, url: &str) -> Result<Value, ApiError> {
        let (username, password) = self.credentials.basic_auth();
        debug!(target: "flex_support_cli::api", url, "GET");

        let response = self
            .http
            .get(url)
            .basic_auth(username, Some(password))
            .send()
            .map_err(|source| ApiError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let error = ApiError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                message: error_message(&body),
            };
            warn!(target: "flex_support_cli::api", url, status = status.as_u16(), "Request rejected");
            return Err(error);
        }

        response.json::<Value>().map_err(|err| ApiError::Decode {
            url: url.to_string(),
            message: err.to_string(),
        })
    }

    fn stream<'a, T>(&'a self, first_url: Result<String, ApiError>, key: &'static str) -> RecordStream<'a, T>
    where
        T: DeserializeOwned + 'a,
    {
        match first_url {
            Ok(url) => Box::new(PageStream::new(url, move |page_url: &str| {
                let body = self.get_json(page_url)?;
                decode_page(page_url, body, key)
            })),
            Err(err) => Box::new(std::iter::once(Err(err))),
        }
    }

    fn list_url(&self, base: &str, segments: &[&str]) -> Result<String, ApiError> {
        build_url(base, segments, Some(self.page_size))
    }
}

impl PlatformClient for HttpPlatformClient {
    fn default_conversation_service(&self) -> Result<String, ApiError> {
        let url = build_url(&self.endpoints.conversations, &["v1", "Configuration"], None)?;
        let body = self.get_json(&url)?;
        body.get("default_chat_service_sid")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or(ApiError::Decode {
                url,
                message: "missing `default_chat_service_sid`".into(),
            })
    }

    fn workers<'a>(&'a self, workspace_sid: &str) -> RecordStream<'a, WorkerRecord> {
        let url = self.list_url(
            &self.endpoints.taskrouter,
            &["v1", "Workspaces", workspace_sid, "Workers"],
        );
        self.stream(url, "workers")
    }

    fn task_queues<'a>(&'a self, workspace_sid: &str) -> RecordStream<'a, QueueRecord> {
        let url = self.list_url(
            &self.endpoints.taskrouter,
            &["v1", "Workspaces", workspace_sid, "TaskQueues"],
        );
        self.stream(url, "task_queues")
    }

    fn address_configurations(&self) -> RecordStream<'_, AddressRecord> {
        let url = self.list_url(
            &self.endpoints.conversations,
            &["v1", "Configuration", "Addresses"],
        );
        self.stream(url, "address_configurations")
    }
}

/// Join `segments` onto `base` with percent-encoding and an optional `PageSize`.
fn build_url(base: &str, segments: &[&str], page_size: Option<u32>) -> Result<String, ApiError> {
    let invalid = |message: String| ApiError::Decode {
        url: base.to_string(),
        message,
    };
    let mut url = Url::parse(base).map_err(|err| invalid(err.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| invalid("base URL cannot carry a path".into()))?
        .pop_if_empty()
        .extend(segments);
    if let Some(page_size) = page_size {
        url.query_pairs_mut()
            .append_pair("PageSize", &page_size.to_string());
    }
    Ok(url.into())
}

/// Prefer the platform's JSON `message` over the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}
