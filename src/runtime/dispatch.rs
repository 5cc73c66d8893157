//! Map a command request to its handler.
use std::{path::PathBuf, time::Duration};

use chrono::Utc;
use tracing::info;

use crate::{
    api::{
        AddressRecord, ClientFactory, ClientSettings, Credentials, PlatformClient, QueueRecord,
        WorkerRecord,
    },
    cli::{CommandRequest, ConversationsAction, ProfileSelection, ProfilesAction, TaskrouterAction},
    config::{self, AuthMode, Configuration, ProfileRecord, ProfileStore, DEFAULT_TIMEOUT_SECS},
    lib::errors::CliError,
    reports::{write_report, ReportSummary},
};

use super::{output::OutputSink, prompt::Prompter};

/// Settings that apply to every command of one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchSettings {
    pub output_dir: PathBuf,
    pub page_size: u32,
}

/// What a command produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    ProfileSaved { name: String },
    ProfilesListed(Vec<String>),
    Report(ReportSummary),
}

/// Routes each command group to its handler. Holds no state between commands.
pub struct Dispatcher<'a> {
    store: &'a ProfileStore,
    clients: &'a dyn ClientFactory,
    prompter: &'a mut dyn Prompter,
    sink: &'a mut dyn OutputSink,
    settings: DispatchSettings,
}

impl<'a> Dispatcher<'a> {
    pub fn new(
        store: &'a ProfileStore,
        clients: &'a dyn ClientFactory,
        prompter: &'a mut dyn Prompter,
        sink: &'a mut dyn OutputSink,
        settings: DispatchSettings,
    ) -> Self {
        Self {
            store,
            clients,
            prompter,
            sink,
            settings,
        }
    }

    /// Run `command`. Profile management never resolves a configuration.
    pub fn dispatch(
        &mut self,
        selection: &ProfileSelection,
        command: &CommandRequest,
    ) -> Result<Outcome, CliError> {
        info!(
            target: "flex_support_cli::dispatch",
            command = ?command,
            profile = %selection.profile,
            token_source = ?selection.token_source,
            "Dispatching command"
        );

        match command {
            CommandRequest::Profiles(ProfilesAction::Create) => self.create_profile(),
            CommandRequest::Profiles(ProfilesAction::List) => self.list_profiles(),
            CommandRequest::Taskrouter {
                action,
                workspace_sid,
            } => {
                let config = self.resolve(selection)?;
                self.taskrouter(&config, *action, workspace_sid.as_deref())
                    .map(Outcome::Report)
            }
            CommandRequest::Conversations(ConversationsAction::Addresses) => {
                let config = self.resolve(selection)?;
                self.conversation_addresses(&config).map(Outcome::Report)
            }
        }
    }

    fn resolve(&self, selection: &ProfileSelection) -> Result<Configuration, CliError> {
        Ok(
            config::resolve(self.store, &selection.profile, selection.token.as_deref())?
                .with_inactivity_months(selection.inactivity_months),
        )
    }

    fn connect(
        &self,
        credentials: &Credentials,
        config: Option<&Configuration>,
    ) -> Result<Box<dyn PlatformClient>, CliError> {
        let timeout = config
            .map(Configuration::timeout)
            .unwrap_or_else(|| Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        let settings = ClientSettings {
            timeout,
            page_size: self.settings.page_size,
        };
        Ok(self.clients.connect(credentials, &settings)?)
    }

    fn list_profiles(&mut self) -> Result<Outcome, CliError> {
        let names = self.store.list_profiles()?;
        if names.is_empty() {
            self.sink.line(&format!(
                "No profiles found in {}",
                self.store.path().display()
            ));
        }
        for name in &names {
            self.sink.line(name);
        }
        Ok(Outcome::ProfilesListed(names))
    }

    /// Prompt, verify credentials against the platform, then save.
    ///
    /// Nothing is written unless every step succeeds.
    fn create_profile(&mut self) -> Result<Outcome, CliError> {
        let name = self.prompter.input("Profile name")?.trim().to_string();
        if name.is_empty() {
            return Err(CliError::InvalidProfileField {
                profile: name,
                field: "name",
                message: "profile name must not be empty".into(),
            });
        }

        let username = self.prompter.input("Account SID (username)")?.trim().to_string();
        let password = self.prompter.secret("Auth token (password)")?.trim().to_string();
        if username.is_empty() || password.is_empty() {
            return Err(CliError::MissingCredentials {
                profile: name,
                message: "username and password must both be provided".into(),
            });
        }

        let credentials = Credentials::Basic {
            username: username.clone(),
            password: password.clone(),
        };
        let client = self.connect(&credentials, None)?;
        let service_sid = client.default_conversation_service()?;
        self.sink.line(&format!(
            "Credentials verified; default conversations service is {service_sid}"
        ));

        let workspace_sid = self
            .prompter
            .input("TaskRouter workspace SID")?
            .trim()
            .to_string();
        let record = ProfileRecord {
            username: Some(username),
            password: Some(password),
            workspace_sid: (!workspace_sid.is_empty()).then_some(workspace_sid),
            service_sid: Some(service_sid),
            ..ProfileRecord::default()
        };
        self.store.save_profile(&name, &record)?;
        self.sink.line(&format!(
            "Saved profile '{name}' to {}",
            self.store.path().display()
        ));

        Ok(Outcome::ProfileSaved { name })
    }

    fn taskrouter(
        &mut self,
        config: &Configuration,
        action: TaskrouterAction,
        workspace_flag: Option<&str>,
    ) -> Result<ReportSummary, CliError> {
        if action == TaskrouterAction::Queues && config.auth_mode() == AuthMode::Token {
            return Err(CliError::UnauthorizedOperation {
                operation: "TaskRouter queue report",
                auth_mode: AuthMode::Token.as_str(),
            });
        }

        let workspace_sid = workspace_flag
            .map(str::trim)
            .filter(|sid| !sid.is_empty())
            .or_else(|| config.workspace_sid())
            .map(str::to_string)
            .ok_or_else(|| CliError::MissingWorkspace {
                profile: config.profile().to_string(),
            })?;

        let client = self.connect(config.credentials(), Some(config))?;
        let timezone = config.timezone();
        let output_dir = self.settings.output_dir.clone();

        let summary = match action {
            TaskrouterAction::Workers => {
                self.sink.line("Listing TaskRouter workers...");
                let now = Utc::now();
                let window = config.inactivity();
                let mut inactive = 0usize;
                let sink = &mut *self.sink;
                let summary = write_report(
                    &output_dir,
                    &workspace_sid,
                    client.workers(&workspace_sid),
                    &timezone,
                    |worker: &WorkerRecord| {
                        if window.is_inactive(worker.date_status_changed.as_ref(), now) {
                            inactive += 1;
                        }
                        sink.line(&format!("Writing {} to report", worker.sid));
                    },
                )?;
                self.sink.line(&format!(
                    "{inactive} of {} workers have not changed status in {} months",
                    summary.rows,
                    window.months()
                ));
                summary
            }
            TaskrouterAction::Queues => {
                self.sink.line("Listing TaskRouter queues...");
                let sink = &mut *self.sink;
                write_report(
                    &output_dir,
                    &workspace_sid,
                    client.task_queues(&workspace_sid),
                    &timezone,
                    |queue: &QueueRecord| {
                        sink.line(&format!("Writing {} to report", queue.sid))
                    },
                )?
            }
        };

        self.report_written(&summary);
        Ok(summary)
    }

    fn conversation_addresses(&mut self, config: &Configuration) -> Result<ReportSummary, CliError> {
        let client = self.connect(config.credentials(), Some(config))?;
        let output_dir = self.settings.output_dir.clone();

        self.sink.line("Listing Conversations address configurations...");
        let sink = &mut *self.sink;
        let summary = write_report(
            &output_dir,
            config.profile(),
            client.address_configurations(),
            &config.timezone(),
            |address: &AddressRecord| {
                sink.line(&format!("Writing {} to report", address.sid))
            },
        )?;

        self.report_written(&summary);
        Ok(summary)
    }

    fn report_written(&mut self, summary: &ReportSummary) {
        self.sink.line(&format!(
            "Wrote {} rows to {}",
            summary.rows,
            summary.path.display()
        ));
    }
}
