//! Storage engine trait definition.
//!
//! The `NoteStore` trait is the narrow surface the rest of the notebook
//! talks to. Implementations persist ciphertext and plaintext metadata only;
//! they never see a password, a key, or decrypted fields.

use super::types::{InitOutcome, NewNote, NoteId, NoteRecord, NoteSummary, SearchRecord};
use crate::crypto::Salt;
use crate::error::Result;

/// Durable store for the salt and the encrypted notes.
///
/// All implementations must ensure:
/// - Every mutating call commits before returning
/// - A failed insert leaves the store unchanged
/// - Note ids are assigned monotonically and never reused
pub trait NoteStore: Send + Sync {
    /// Persist a fresh salt unless one already exists.
    ///
    /// Calling this twice is not an error: the second call returns
    /// `InitOutcome::AlreadyInitialized` and leaves the salt unchanged.
    ///
    /// # Errors
    ///
    /// Returns `DiaryError::RandomnessUnavailable` if no salt can be drawn.
    fn initialize(&self) -> Result<InitOutcome>;

    /// Read the per-store salt.
    ///
    /// # Errors
    ///
    /// Returns `DiaryError::NotInitialized` if `initialize` was never run.
    fn get_salt(&self) -> Result<Salt>;

    /// Append a note and return its newly assigned id.
    ///
    /// # Errors
    ///
    /// Returns `DiaryError::InvalidInput` if `created_at` is not an
    /// RFC 3339 UTC timestamp ending in `Z`.
    fn insert_note(&self, note: &NewNote) -> Result<NoteId>;

    /// List every note without its body, newest id first.
    fn list_notes(&self) -> Result<Vec<NoteSummary>>;

    /// Fetch one note.
    ///
    /// # Errors
    ///
    /// Returns `DiaryError::NotFound` if no note has this id.
    fn get_note(&self, id: NoteId) -> Result<NoteRecord>;

    /// Full scan of `(id, title, body)` for client-side search, newest first.
    fn list_all_for_search(&self) -> Result<Vec<SearchRecord>>;

    /// Number of stored notes.
    fn note_count(&self) -> Result<u64>;

    /// Check structural integrity of the store.
    ///
    /// Verifies:
    /// - Backend consistency (e.g. SQLite `integrity_check`)
    /// - Salt presence and length
    /// - Every note carries a timestamp
    fn check_integrity(&self) -> Result<()>;
}
