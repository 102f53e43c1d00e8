//! Helpers shared by command handlers.
//!
//! - **input**: password prompt, note body from flag, stdin, or editor
//! - **parsing**: `--format`, note ids, tags, timezones

mod input;
mod parsing;

pub(crate) use input::env_password;
pub use input::{prompt_password, read_note_body};
pub use parsing::{normalize_tags, parse_note_id, parse_table_format, parse_timezone, TableFormat};
