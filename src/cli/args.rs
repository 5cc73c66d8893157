//! CLI argument definitions and `Invocation` construction.
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{ArgGroup, Args, Parser, Subcommand};

use super::{
    resolve_token, CommandRequest, ConversationsAction, Invocation, ProfileSelection,
    ProfilesAction, TaskrouterAction,
};
use crate::{
    api::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE},
    config::GUEST_PROFILE,
    lib::fs::{resolve_store_path, STORE_PATH_ENV},
};

/// Command groups.
#[derive(Debug, Clone, Subcommand)]
pub enum CliCommand {
    /// Create or list stored credential profiles.
    Profiles(ProfilesArgs),
    /// Export TaskRouter workers or task queues to CSV.
    Taskrouter(TaskrouterArgs),
    /// Export Conversations data to CSV.
    Conversations(ConversationsArgs),
}

/// `profiles` actions; exactly one is required.
#[derive(Debug, Clone, Args)]
#[command(group(
    ArgGroup::new("profiles_action")
        .required(true)
        .args(["create_profile", "list_profiles"])
))]
pub struct ProfilesArgs {
    /// Interactively create a profile after verifying its credentials.
    #[arg(long)]
    pub create_profile: bool,
    /// List stored profile names.
    #[arg(long)]
    pub list_profiles: bool,
}

/// `taskrouter` actions; exactly one is required.
#[derive(Debug, Clone, Args)]
#[command(group(
    ArgGroup::new("taskrouter_action")
        .required(true)
        .args(["tr_queues", "tr_workers"])
))]
pub struct TaskrouterArgs {
    /// Workspace SID (overrides the profile's WORKSPACE_SID).
    #[arg(short = 'w', long = "workspace-sid", value_name = "SID")]
    pub workspace_sid: Option<String>,
    /// Generate the TaskRouter queues report.
    #[arg(long)]
    pub tr_queues: bool,
    /// Generate the TaskRouter workers report.
    #[arg(long)]
    pub tr_workers: bool,
}

/// `conversations` actions; exactly one is required.
#[derive(Debug, Clone, Args)]
#[command(group(
    ArgGroup::new("conversations_action")
        .required(true)
        .args(["conv_addresses"])
))]
pub struct ConversationsArgs {
    /// Generate the Conversations address configuration report.
    #[arg(long)]
    pub conv_addresses: bool,
}

/// Command-line arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "flex-support-cli",
    version,
    about = "Flex Support CLI: export TaskRouter and Conversations data to CSV",
    long_about = None
)]
pub struct LaunchArgs {
    /// Stored profile to use (`default` is the token-only guest profile).
    #[arg(long, global = true, default_value = GUEST_PROFILE, value_name = "NAME")]
    pub profile: String,
    /// Support token (overrides FLEX_SUPPORT_TOKEN).
    #[arg(long, global = true, value_name = "VALUE")]
    pub token: Option<String>,
    /// Path to the profile store (overrides FLEX_SUPPORT_CLI_CONFIG).
    #[arg(long = "config", global = true, value_name = "PATH")]
    pub config_override: Option<PathBuf>,
    /// Suppress progress output; errors are still printed.
    #[arg(short, long, global = true)]
    pub quiet: bool,
    /// Directory to write reports into.
    #[arg(short = 'o', long, global = true, default_value = ".", value_name = "DIR")]
    pub output_dir: PathBuf,
    /// Records requested per API page.
    #[arg(
        long,
        global = true,
        default_value_t = DEFAULT_PAGE_SIZE,
        value_parser = clap::value_parser!(u32).range(1..=MAX_PAGE_SIZE as i64)
    )]
    pub page_size: u32,
    /// Inactivity window in months (overrides the profile's INACTIVITY_MONTHS).
    #[arg(long, global = true, value_name = "N")]
    pub months: Option<u32>,
    #[command(subcommand)]
    pub command: CliCommand,
}

impl LaunchArgs {
    /// Build an `Invocation` from CLI args and environment variables.
    pub fn into_invocation(self) -> Result<Invocation> {
        let store_path_overridden =
            self.config_override.is_some() || std::env::var_os(STORE_PATH_ENV).is_some();
        let store_path = resolve_store_path(self.config_override);
        let (token, token_source) = resolve_token(self.token);
        let profile = self.profile.trim().to_string();
        if profile.is_empty() {
            return Err(anyhow!("--profile must not be empty"));
        }

        Ok(Invocation {
            store_path,
            store_path_overridden,
            selection: ProfileSelection {
                profile,
                token,
                token_source,
                inactivity_months: self.months,
            },
            quiet: self.quiet,
            output_dir: self.output_dir,
            page_size: self.page_size,
            command: command_request(self.command),
        })
    }
}

fn command_request(command: CliCommand) -> CommandRequest {
    match command {
        CliCommand::Profiles(args) => {
            if args.create_profile {
                CommandRequest::Profiles(ProfilesAction::Create)
            } else {
                CommandRequest::Profiles(ProfilesAction::List)
            }
        }
        CliCommand::Taskrouter(args) => CommandRequest::Taskrouter {
            action: if args.tr_queues {
                TaskrouterAction::Queues
            } else {
                TaskrouterAction::Workers
            },
            workspace_sid: args.workspace_sid,
        },
        CliCommand::Conversations(_) => CommandRequest::Conversations(ConversationsAction::Addresses),
    }
}
