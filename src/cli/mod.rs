//! CLI entrypoint module structure.
pub mod args;
pub mod launch;

pub use args::{CliCommand, ConversationsArgs, LaunchArgs, ProfilesArgs, TaskrouterArgs};
pub use launch::{
    resolve_token, CommandRequest, ConversationsAction, Invocation, ProfileSelection,
    ProfilesAction, TaskrouterAction, TokenSource, TOKEN_ENV,
};
