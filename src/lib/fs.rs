//! Filesystem helpers: profile store location and whole-file replacement.

use std::{
    env,
    ffi::OsString,
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;

/// File name of the profile store inside the user's home directory.
pub const STORE_FILE_NAME: &str = ".flex-support-cli.toml";
/// Environment variable overriding the profile store location.
pub const STORE_PATH_ENV: &str = "FLEX_SUPPORT_CLI_CONFIG";
/// Environment variable name for user home directory.
const HOME_ENV: &str = "HOME";
/// Windows fallback for the home directory.
const USERPROFILE_ENV: &str = "USERPROFILE";

/// Resolve the profile store path.
///
/// Resolution order:
/// 1. `override_path` (the `--config` flag).
/// 2. `$FLEX_SUPPORT_CLI_CONFIG` when set and non-empty.
/// 3. `$HOME/.flex-support-cli.toml` (`%USERPROFILE%` on Windows).
pub fn resolve_store_path(override_path: Option<PathBuf>) -> Result<PathBuf, &'static str> {
    resolve_store_path_from(
        override_path,
        env::var_os(STORE_PATH_ENV),
        env::var_os(HOME_ENV).or_else(|| env::var_os(USERPROFILE_ENV)),
    )
}

/// Resolve the store path from explicit values (testable helper).
fn resolve_store_path_from(
    override_path: Option<PathBuf>,
    env_path: Option<OsString>,
    home: Option<OsString>,
) -> Result<PathBuf, &'static str> {
    if let Some(path) = override_path {
        return Ok(path);
    }

    if let Some(path) = env_path.filter(|value| !value.is_empty()) {
        return Ok(PathBuf::from(path));
    }

    if let Some(home) = home.filter(|value| !value.is_empty()) {
        return Ok(PathBuf::from(home).join(STORE_FILE_NAME));
    }

    Err("HOME is unset and no profile store path was given")
}

/// Replace `path` with `contents` without exposing a partially written file.
///
/// The data goes to a temporary file in the same directory, which is then
/// renamed over the target. Missing parent directories are created.
pub fn write_file_replacing(path: &Path, contents: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent)?;

    let mut staged = NamedTempFile::new_in(&parent)?;
    staged.write_all(contents)?;
    staged.as_file().sync_all()?;
    staged.persist(path).map_err(|err| err.error)?;
    Ok(())
}
