//! Parsing helpers for command arguments and config values.

use chrono_tz::Tz;
use diary_core::NoteId;

use crate::errors::CliError;

/// `--format` values for list-style commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Table,
    Plain,
}

/// Parse `--format`, rejecting it alongside `--json`.
pub fn parse_table_format(value: Option<&str>, json: bool) -> anyhow::Result<Option<TableFormat>> {
    let format = match value {
        None => return Ok(None),
        Some("table") => TableFormat::Table,
        Some("plain") => TableFormat::Plain,
        Some(other) => {
            return Err(CliError::invalid_input(format!(
                "Unsupported format: {} (use table or plain)",
                other
            ))
            .into())
        }
    };
    if json {
        return Err(CliError::invalid_input("--format cannot be used with --json").into());
    }
    Ok(Some(format))
}

/// Parse a note id argument.
pub fn parse_note_id(value: &str) -> anyhow::Result<NoteId> {
    value
        .parse::<NoteId>()
        .map_err(|e| CliError::invalid_input(e.to_string()).into())
}

/// Normalize `--tags`: trim each tag and drop empties, keeping the comma form.
pub fn normalize_tags(raw: &str) -> String {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse an IANA timezone name from config.
pub fn parse_timezone(name: &str) -> anyhow::Result<Tz> {
    name.trim().parse::<Tz>().map_err(|_| {
        CliError::invalid_input(format!("Unknown timezone in config: {}", name)).into()
    })
}
