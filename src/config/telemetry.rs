use std::path::PathBuf;

use tracing::{debug, info, warn};

use super::Configuration;
use crate::lib::fs::STORE_PATH_ENV;

pub fn log_store_source(resolution: &Result<PathBuf, &'static str>, from_override: bool) {
    let path = match resolution {
        Ok(path) => path,
        Err(reason) => {
            warn!(
                target: "flex_support_cli::config",
                reason,
                "Profile store location unknown; only the guest profile is usable"
            );
            return;
        }
    };
    if from_override {
        info!(
            target: "flex_support_cli::config",
            path = %path.display(),
            "Using profile store from --config or FLEX_SUPPORT_CLI_CONFIG"
        );
    } else {
        debug!(
            target: "flex_support_cli::config",
            path = %path.display(),
            env = STORE_PATH_ENV,
            "Using default profile store in the home directory"
        );
    }
}

pub fn log_resolved(config: &Configuration) {
    info!(
        target: "flex_support_cli::config",
        profile = config.profile(),
        guest = config.is_guest(),
        auth_mode = config.auth_mode().as_str(),
        has_workspace = config.workspace_sid().is_some(),
        timeout_secs = config.timeout().as_secs(),
        inactivity_months = config.inactivity().months(),
        "Configuration resolved"
    );
}
