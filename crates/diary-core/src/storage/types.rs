//! Core types for notebook storage.
//!
//! Everything here carries ciphertext blobs; only `id` and `created_at`
//! are plaintext.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DiaryError, Result};

/// Identifier of a stored note (SQLite rowid, assigned by the store).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(pub i64);

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NoteId {
    type Err = DiaryError;

    fn from_str(value: &str) -> Result<Self> {
        let id: i64 = value
            .trim()
            .parse()
            .map_err(|_| DiaryError::InvalidInput(format!("Invalid note id: {}", value)))?;
        if id <= 0 {
            return Err(DiaryError::InvalidInput(format!(
                "Note ids are positive integers (got {})",
                id
            )));
        }
        Ok(NoteId(id))
    }
}

/// Outcome of [`NoteStore::initialize`](super::NoteStore::initialize).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// A salt was generated and persisted
    Created,
    /// A salt already existed and was left untouched
    AlreadyInitialized,
}

/// A note ready for insertion; every field except `created_at` is ciphertext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub title: Vec<u8>,
    pub tags: Vec<u8>,
    pub body: Vec<u8>,
    pub created_at: String,
}

/// A full stored note as returned by `get_note`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteRecord {
    pub id: NoteId,
    pub title: Vec<u8>,
    pub tags: Vec<u8>,
    pub body: Vec<u8>,
    pub created_at: String,
}

/// Row of `list_notes`: everything but the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteSummary {
    pub id: NoteId,
    pub title: Vec<u8>,
    pub tags: Vec<u8>,
    pub created_at: String,
}

/// Row of `list_all_for_search`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRecord {
    pub id: NoteId,
    pub title: Vec<u8>,
    pub body: Vec<u8>,
}

/// Format a creation timestamp: RFC 3339, UTC, microseconds, trailing `Z`.
pub fn format_created_at(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Validate a `created_at` string before it is persisted.
///
/// Must parse as RFC 3339 and be expressed in UTC with a trailing `Z`.
pub fn validate_created_at(value: &str) -> Result<()> {
    if !value.ends_with('Z') {
        return Err(DiaryError::InvalidInput(format!(
            "created_at must be UTC with a trailing 'Z': {}",
            value
        )));
    }
    DateTime::parse_from_rfc3339(value)
        .map_err(|e| DiaryError::InvalidInput(format!("Invalid created_at {}: {}", value, e)))?;
    Ok(())
}
