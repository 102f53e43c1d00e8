//! Application context for the secret-diary CLI.
//!
//! Bundles the parsed arguments with the lazily loaded config file.

use std::io::IsTerminal;
use std::path::PathBuf;

use chrono_tz::Tz;
use once_cell::unsync::OnceCell;

use diary_core::storage::DB_FILE_NAME;
use diary_core::{Session, SqliteStore};

use crate::cli::Cli;
use crate::config::{read_config, DiaryConfig};
use crate::helpers::{parse_timezone, TableFormat};
use crate::ui::UiContext;

use super::password::unlock_with_retry;
use super::resolver::{not_initialized, resolve_config_path, resolve_store_dir};

pub struct AppContext<'a> {
    cli: &'a Cli,
    config: OnceCell<DiaryConfig>,
}

impl<'a> AppContext<'a> {
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            config: OnceCell::new(),
        }
    }

    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// The config file, or defaults when none exists yet.
    pub fn config(&self) -> anyhow::Result<&DiaryConfig> {
        self.config.get_or_try_init(|| {
            let path = resolve_config_path()?;
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading config");
                read_config(&path)
            } else {
                Ok(DiaryConfig::default())
            }
        })
    }

    /// Editor command from `[ui] editor`, if configured.
    pub fn editor(&self) -> anyhow::Result<Option<&str>> {
        Ok(self.config()?.ui.editor.as_deref())
    }

    /// Display timezone from `[ui] timezone`.
    pub fn timezone(&self) -> anyhow::Result<Option<Tz>> {
        self.config()?
            .ui
            .timezone
            .as_deref()
            .map(parse_timezone)
            .transpose()
    }

    /// Build the UI context for a command's output flags.
    ///
    /// A broken `[ui] timezone` falls back to UTC with a warning rather than
    /// failing the command.
    pub fn ui_context(&self, json: bool, format: Option<TableFormat>) -> UiContext {
        let timezone = self.timezone().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "ignoring display timezone");
            None
        });
        UiContext::from_env(json, format, self.cli.no_color, timezone)
    }

    pub fn store_dir(&self) -> anyhow::Result<PathBuf> {
        resolve_store_dir(self.cli, self.config()?)
    }

    /// Open (and create if needed) the store directory and database.
    pub fn create_store(&self) -> anyhow::Result<SqliteStore> {
        let dir = self.store_dir()?;
        let options = self.config()?.store_options();
        tracing::debug!(dir = %dir.display(), "opening store");
        Ok(SqliteStore::open(&dir, &options)?)
    }

    /// Open an existing notebook; a missing database is reported, not created.
    pub fn open_store(&self) -> anyhow::Result<SqliteStore> {
        let dir = self.store_dir()?;
        let db_path = dir.join(DB_FILE_NAME);
        if !db_path.exists() {
            return Err(not_initialized(&db_path).into());
        }
        let options = self.config()?.store_options();
        tracing::debug!(path = %db_path.display(), "opening store");
        Ok(SqliteStore::open_file(&db_path, &options)?)
    }

    /// Unlock a session against `store`, prompting when stdin is a TTY.
    pub fn unlock(&self, store: &SqliteStore, no_input: bool) -> anyhow::Result<Session> {
        let interactive = std::io::stdin().is_terminal() && !no_input;
        let ui_ctx = UiContext::for_stderr(self.cli.no_color);
        unlock_with_retry(store, interactive, &ui_ctx)
    }
}
