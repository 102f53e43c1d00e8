//! Storage abstraction for the notebook.
//!
//! The storage layer keeps the salt and the encrypted notes:
//! - `traits`: the `NoteStore` interface
//! - `types`: ciphertext-carrying row types and timestamp helpers
//! - `sqlite`: the SQLite (WAL) implementation
//!
//! ## Security
//!
//! Stores never perform encryption or decryption. Titles, tags and bodies
//! arrive and leave as opaque blobs; only ids and creation timestamps are
//! stored in the clear so they can be indexed.

pub mod sqlite;
pub mod traits;
pub mod types;

pub use sqlite::{SqliteStore, StoreOptions, DB_FILE_NAME};
pub use traits::NoteStore;
pub use types::{
    format_created_at, validate_created_at, InitOutcome, NewNote, NoteId, NoteRecord, NoteSummary,
    SearchRecord,
};
