//! # Diary Core
//!
//! Core library for secret-diary - a local notebook whose titles, tags and
//! bodies are encrypted at rest under a key derived from a master password.
//!
//! This crate owns key derivation, field encryption and the SQLite record
//! store. Prompting, editors and rendering live in the CLI crate.
//!
//! ## Architecture
//!
//! - **crypto**: PBKDF2 key derivation and XChaCha20-Poly1305 field cipher
//! - **storage**: `NoteStore` trait and the SQLite (WAL) implementation
//! - **session**: the unlocked capability that encrypts and decrypts notes
//! - **fs**: private directory creation and atomic renames
//!
//! ## Example
//!
//! ```no_run
//! use diary_core::{NoteDraft, NoteStore, Session, SqliteStore, StoreOptions};
//! use secrecy::SecretString;
//!
//! # fn main() -> diary_core::Result<()> {
//! let store = SqliteStore::open("/tmp/diary".as_ref(), &StoreOptions::default())?;
//! store.initialize()?;
//!
//! let session = Session::unlock(&store, &SecretString::from("hunter2".to_string()))?;
//! let id = session.add_note(
//!     &store,
//!     &NoteDraft {
//!         title: "Diary".into(),
//!         tags: "personal".into(),
//!         body: "Today was fine".into(),
//!     },
//! )?;
//! assert_eq!(session.read_note(&store, id)?.body, "Today was fine");
//! # Ok(())
//! # }
//! ```

pub mod crypto;
pub mod error;
pub mod fs;
pub mod session;
pub mod storage;

pub use error::{DiaryError, Result};
pub use session::{Note, NoteDraft, NoteHeader, SearchHit, Session};
pub use storage::{InitOutcome, NoteId, NoteStore, SqliteStore, StoreOptions};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
