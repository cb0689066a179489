//! Configuration management for `bugtrack`.
//!
//! Configuration is loaded from a YAML file in the workspace root
//! (`.bugtrack/config.yaml`) and may be overridden per invocation by CLI
//! flags or their `BUGTRACK_*` environment variables.
//!
//! ## Precedence (highest to lowest)
//!
//! 1. CLI flag / environment variable
//! 2. `.bugtrack/config.yaml`
//! 3. Built-in defaults
//!
//! Relative paths are resolved against the workspace root.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use bugtrack_lib::store::RecordStore;
use bugtrack_lib::users::UserStore;
use bugtrack_lib::{BugError, Result};

/// Directory holding workspace metadata.
pub const CONFIG_DIR: &str = ".bugtrack";

/// Config file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.yaml";

/// Default bug file, relative to the workspace root.
pub const DEFAULT_DATA_FILE: &str = "data/bugs.txt";

/// Default account file, relative to the workspace root.
pub const DEFAULT_USERS_FILE: &str = ".bugtrack/users.json";

/// Contents of `.bugtrack/config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Bug file path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
    /// Account file path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users_file: Option<PathBuf>,
}

/// Per-invocation overrides collected from the command line.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub root: Option<PathBuf>,
    pub data_file: Option<PathBuf>,
    pub users_file: Option<PathBuf>,
    pub user: Option<String>,
    pub password: Option<String>,
}

/// Fully resolved paths for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub root: PathBuf,
    pub data_file: PathBuf,
    pub users_file: PathBuf,
}

impl ResolvedConfig {
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        config_path(&self.root)
    }

    /// Record store over the configured bug file.
    #[must_use]
    pub fn record_store(&self) -> RecordStore {
        RecordStore::open(&self.data_file)
    }

    /// Open the configured account file.
    ///
    /// # Errors
    ///
    /// Returns an error if the account file exists but cannot be read.
    pub fn user_store(&self) -> Result<UserStore> {
        UserStore::open(&self.users_file)
    }
}

/// Path of the config file for a workspace root.
#[must_use]
pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_DIR).join(CONFIG_FILE)
}

/// Read `.bugtrack/config.yaml`, or defaults when it does not exist.
///
/// # Errors
///
/// Returns `Config` if the file cannot be read or parsed.
pub fn load_file_config(root: &Path) -> Result<FileConfig> {
    let path = config_path(root);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(FileConfig::default()),
        Err(e) => {
            return Err(BugError::Config(format!(
                "cannot read {}: {e}",
                path.display()
            )));
        }
    };

    if content.trim().is_empty() {
        return Ok(FileConfig::default());
    }

    serde_yaml::from_str(&content)
        .map_err(|e| BugError::Config(format!("invalid {}: {e}", path.display())))
}

/// Serialize a config for writing to disk.
///
/// # Errors
///
/// Returns `Config` if serialization fails.
pub fn render_file_config(config: &FileConfig) -> Result<String> {
    serde_yaml::to_string(config).map_err(|e| BugError::Config(e.to_string()))
}

/// Resolve the workspace root and file paths for this invocation.
///
/// # Errors
///
/// Returns an error if the working directory is unavailable or the
/// config file is invalid.
pub fn resolve(cli: &CliOverrides) -> Result<ResolvedConfig> {
    let root = match &cli.root {
        Some(root) => root.clone(),
        None => std::env::current_dir()?,
    };
    let root = dunce::canonicalize(&root).unwrap_or(root);

    let file = load_file_config(&root)?;

    let data_file = cli
        .data_file
        .clone()
        .or(file.data_file)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));
    let users_file = cli
        .users_file
        .clone()
        .or(file.users_file)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_USERS_FILE));

    let resolved = ResolvedConfig {
        data_file: root.join(data_file),
        users_file: root.join(users_file),
        root,
    };
    tracing::debug!(
        "Resolved bug file {} and user file {}",
        resolved.data_file.display(),
        resolved.users_file.display()
    );
    Ok(resolved)
}
