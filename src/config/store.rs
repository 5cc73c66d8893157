//! Per-user TOML file holding named credential profiles.
use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::record::ProfileRecord;
use crate::lib::{
    errors::CliError,
    fs::{write_file_replacing, STORE_FILE_NAME},
};

/// Name of the built-in guest profile.
pub const GUEST_PROFILE: &str = "default";
/// Alternative spelling accepted for the guest profile.
pub const GUEST_PROFILE_ALIAS: &str = "guest";

/// Returns true for names reserved for the built-in guest profile.
pub fn is_guest_profile(name: &str) -> bool {
    name == GUEST_PROFILE || name == GUEST_PROFILE_ALIAS
}

/// Result of looking up a profile by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredProfile {
    /// The reserved guest profile; never read from disk.
    Guest,
    Named(ProfileRecord),
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    profiles: BTreeMap<String, ProfileRecord>,
}

/// Handle on the profile store file. The file is read on every call.
///
/// A store whose location could not be determined still answers guest
/// lookups; every file access fails as unreadable.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
    unresolved: Option<&'static str>,
}

impl ProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            unresolved: None,
        }
    }

    /// Store with no usable location; `reason` is reported on access.
    pub fn unresolved(reason: &'static str) -> Self {
        Self {
            path: Path::new("~").join(STORE_FILE_NAME),
            unresolved: Some(reason),
        }
    }

    pub fn from_resolution(resolution: Result<PathBuf, &'static str>) -> Self {
        match resolution {
            Ok(path) => Self::new(path),
            Err(reason) => Self::unresolved(reason),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.unresolved.is_none()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Profile names in lexicographic order; empty when the file is absent.
    pub fn list_profiles(&self) -> Result<Vec<String>, CliError> {
        Ok(self.read_document()?.profiles.into_keys().collect())
    }

    /// Look up `name`; guest names short-circuit to [`StoredProfile::Guest`].
    pub fn load_profile(&self, name: &str) -> Result<StoredProfile, CliError> {
        if is_guest_profile(name) {
            debug!(
                target: "flex_support_cli::store",
                profile = name,
                "Using built-in guest profile"
            );
            return Ok(StoredProfile::Guest);
        }

        let mut document = self.read_document()?;
        document
            .profiles
            .remove(name)
            .map(StoredProfile::Named)
            .ok_or_else(|| CliError::ProfileNotFound {
                name: name.to_string(),
                path: self.path.clone(),
            })
    }

    /// Insert or fully replace the table for `name` and rewrite the file.
    pub fn save_profile(&self, name: &str, record: &ProfileRecord) -> Result<(), CliError> {
        if name.trim().is_empty() {
            return Err(CliError::InvalidProfileField {
                profile: name.to_string(),
                field: "name",
                message: "profile name must not be empty".into(),
            });
        }
        if is_guest_profile(name) {
            warn!(
                target: "flex_support_cli::store",
                profile = name,
                "Saving a profile under a reserved guest name; it cannot be selected with --profile"
            );
        }

        let mut document = self.read_document()?;
        document.profiles.insert(name.to_string(), record.clone());

        let encoded = toml::to_string_pretty(&document).map_err(|err| CliError::StoreWrite {
            path: self.path.clone(),
            message: err.to_string(),
        })?;
        write_file_replacing(&self.path, encoded.as_bytes())
            .map_err(|err| CliError::store_write(self.path.clone(), &err))?;

        info!(
            target: "flex_support_cli::store",
            path = %self.path.display(),
            profile = name,
            profiles = document.profiles.len(),
            "Saved profile"
        );
        Ok(())
    }

    fn read_document(&self) -> Result<StoreDocument, CliError> {
        if let Some(reason) = self.unresolved {
            return Err(CliError::store_unreadable(self.path.clone(), reason));
        }
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(
                    target: "flex_support_cli::store",
                    path = %self.path.display(),
                    "Profile store absent; treating as empty"
                );
                return Ok(StoreDocument::default());
            }
            Err(err) => return Err(CliError::store_unreadable(self.path.clone(), err.to_string())),
        };

        toml::from_str(&raw).map_err(|err| {
            let error = CliError::store_unreadable(self.path.clone(), err.to_string());
            warn!(
                target: "flex_support_cli::store",
                path = %self.path.display(),
                reason = %error,
                "Failed to parse profile store"
            );
            error
        })
    }
}
