//! Error types for diary core operations.
//!
//! Errors are descriptive at the core level; the CLI layer maps these to
//! user-facing messages and exit codes.

use thiserror::Error;

use crate::storage::NoteId;

/// Result type alias for diary operations.
pub type Result<T> = std::result::Result<T, DiaryError>;

/// Core error type for diary operations.
#[derive(Debug, Error)]
pub enum DiaryError {
    /// No salt has been persisted yet
    #[error("Notebook is not initialized")]
    NotInitialized,

    /// Requested note id does not exist
    #[error("No such note: {0}")]
    NotFound(NoteId),

    /// Wrong password, or a ciphertext blob was tampered with or truncated
    #[error("Decryption failed (wrong password or corrupted data)")]
    Decryption,

    /// Another writer held the store lock past every retry
    #[error("Store is busy (gave up after {attempts} attempts)")]
    Busy { attempts: u32 },

    /// The OS randomness source failed
    #[error("Randomness source unavailable: {0}")]
    RandomnessUnavailable(String),

    /// Encryption failure other than decryption
    #[error("Encryption error: {0}")]
    Crypto(String),

    /// Integrity check failure
    #[error("Integrity check failed: {0}")]
    Integrity(String),

    /// Invalid caller input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Storage backend error (generic)
    #[error("Storage error: {0}")]
    Storage(String),

    /// SQLite-specific storage error
    #[error("SQLite error: {source}")]
    Sqlite {
        #[from]
        source: rusqlite::Error,
    },

    /// I/O error
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}
