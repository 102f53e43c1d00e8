//! Diagnostic logging to stderr.
//!
//! Commands write their results to stdout; everything emitted through
//! `tracing` goes to stderr so piped output stays clean. Nothing logged
//! here may contain a password, key, or decrypted field.

use anyhow::Context;
use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

use crate::constants::env_vars;

/// Map `-v` repetitions to a level. `-q` pins the level to errors.
pub fn level_for(verbose: u8, quiet: bool) -> Level {
    if quiet {
        return Level::ERROR;
    }
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Build the filter: `SECRET_DIARY_LOG` wins, otherwise the flag level.
pub fn build_filter(verbose: u8, quiet: bool) -> EnvFilter {
    let level = level_for(verbose, quiet);
    EnvFilter::builder()
        .with_env_var(env_vars::LOG)
        .with_default_directive(level.into())
        .from_env_lossy()
}

/// Install the global subscriber.
pub fn init(verbose: u8, quiet: bool, color: bool) -> anyhow::Result<()> {
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(build_filter(verbose, quiet))
        .with_writer(std::io::stderr)
        .with_ansi(color)
        .with_target(verbose >= 2)
        .with_file(false)
        .with_line_number(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set log subscriber")?;
    Ok(())
}
