//! Path resolution for the config file and the notebook directory.

use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::config::{default_config_path, default_store_dir, DiaryConfig};
use crate::constants::env_vars;
use crate::errors::CliError;

/// Resolve the config file path, checking SECRET_DIARY_CONFIG first.
pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var(env_vars::CONFIG) {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

/// Resolve the notebook directory: `--store`, then config, then the XDG data dir.
pub fn resolve_store_dir(cli: &Cli, config: &DiaryConfig) -> anyhow::Result<PathBuf> {
    if let Some(path) = cli.store.as_deref().filter(|p| !p.trim().is_empty()) {
        return Ok(PathBuf::from(path));
    }
    if let Some(path) = config.store.path.as_deref().filter(|p| !p.trim().is_empty()) {
        return Ok(PathBuf::from(path));
    }
    default_store_dir()
}

/// Error for commands run against a directory with no notebook database.
pub fn not_initialized(db_path: &Path) -> CliError {
    CliError::not_found(
        format!("No notebook found at {}", db_path.display()),
        "Run `secret-diary init`, or point --store at an existing notebook directory.",
    )
}
