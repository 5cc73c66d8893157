//! Resolved invocation: command request, profile selection, and token/store resolution.
use std::{env, path::PathBuf};

use crate::config::GUEST_PROFILE;

/// Environment fallback for `--token`.
pub const TOKEN_ENV: &str = "FLEX_SUPPORT_TOKEN";

/// `profiles` sub-actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfilesAction {
    Create,
    List,
}

/// `taskrouter` sub-actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskrouterAction {
    Queues,
    Workers,
}

/// `conversations` sub-actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationsAction {
    Addresses,
}

/// Command handed to the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandRequest {
    Profiles(ProfilesAction),
    Taskrouter {
        action: TaskrouterAction,
        workspace_sid: Option<String>,
    },
    Conversations(ConversationsAction),
}

/// Source for the runtime token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Cli,
    Env,
    Missing,
}

/// Which profile to use and what to layer on top of it.
#[derive(Clone, PartialEq, Eq)]
pub struct ProfileSelection {
    pub profile: String,
    pub token: Option<String>,
    pub token_source: TokenSource,
    pub inactivity_months: Option<u32>,
}

impl ProfileSelection {
    /// Guest profile with the given runtime token.
    pub fn guest(token: Option<String>) -> Self {
        let token_source = if token.is_some() {
            TokenSource::Cli
        } else {
            TokenSource::Missing
        };
        Self {
            profile: GUEST_PROFILE.to_string(),
            token,
            token_source,
            inactivity_months: None,
        }
    }

    pub fn named(profile: impl Into<String>) -> Self {
        Self {
            profile: profile.into(),
            token: None,
            token_source: TokenSource::Missing,
            inactivity_months: None,
        }
    }
}

impl std::fmt::Debug for ProfileSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileSelection")
            .field("profile", &self.profile)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("token_source", &self.token_source)
            .field("inactivity_months", &self.inactivity_months)
            .finish()
    }
}

/// Everything the runtime needs for one invocation.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Profile store location, or why none could be determined.
    pub store_path: Result<PathBuf, &'static str>,
    pub store_path_overridden: bool,
    pub selection: ProfileSelection,
    pub quiet: bool,
    pub output_dir: PathBuf,
    pub page_size: u32,
    pub command: CommandRequest,
}

/// Resolve token in the order: CLI override → env var.
pub fn resolve_token(token_override: Option<String>) -> (Option<String>, TokenSource) {
    resolve_token_from(token_override, env::var(TOKEN_ENV).ok())
}

fn resolve_token_from(
    token_override: Option<String>,
    env_token: Option<String>,
) -> (Option<String>, TokenSource) {
    if let Some(token) = token_override.and_then(|v| normalize_token(&v)) {
        return (Some(token), TokenSource::Cli);
    }

    if let Some(token) = env_token.and_then(|v| normalize_token(&v)) {
        return (Some(token), TokenSource::Env);
    }

    (None, TokenSource::Missing)
}

fn normalize_token(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}
