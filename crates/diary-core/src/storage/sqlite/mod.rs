//! SQLite storage backend.
//!
//! One database file per notebook, opened in WAL mode so a second process
//! can read while a writer commits. Writers take the lock up front with
//! `BEGIN IMMEDIATE`, and every mutating call commits before it returns.

mod retry;
mod row;

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rusqlite::{params, Connection, DatabaseName, OptionalExtension, TransactionBehavior};

use crate::crypto::{new_salt, Salt, SALT_LENGTH};
use crate::error::{DiaryError, Result};
use crate::storage::traits::NoteStore;
use crate::storage::types::{
    validate_created_at, InitOutcome, NewNote, NoteId, NoteRecord, NoteSummary, SearchRecord,
};

use retry::run_with_retry;

/// File name of the notebook database inside the store directory.
pub const DB_FILE_NAME: &str = "secret_diary.db";

/// Metadata key under which the salt lives.
const SALT_KEY: &str = "salt";

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS meta (
    k TEXT PRIMARY KEY,
    v BLOB NOT NULL
);

CREATE TABLE IF NOT EXISTS notes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title BLOB NOT NULL,
    tags BLOB NOT NULL,
    body BLOB NOT NULL,
    created_at TEXT NOT NULL
);
"#;

/// Tuning for lock contention between processes.
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// How long SQLite itself waits on a locked database per statement
    pub busy_timeout: Duration,
    /// Total attempts per operation before surfacing `DiaryError::Busy`
    pub busy_retries: u32,
    /// First backoff delay; doubles on each retry
    pub retry_backoff: Duration,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            busy_timeout: Duration::from_millis(2_000),
            busy_retries: 3,
            retry_backoff: Duration::from_millis(50),
        }
    }
}

/// SQLite-backed note store.
pub struct SqliteStore {
    path: PathBuf,
    conn: Mutex<Connection>,
    options: StoreOptions,
}

impl SqliteStore {
    /// Open (or create) the notebook in `dir`.
    ///
    /// The directory is created with owner-only permissions if absent and
    /// the schema is applied idempotently. Opening does not create a salt;
    /// call [`NoteStore::initialize`] for that.
    pub fn open(dir: &Path, options: &StoreOptions) -> Result<Self> {
        crate::fs::ensure_private_dir(dir)?;
        Self::open_file(&dir.join(DB_FILE_NAME), options)
    }

    /// Open (or create) a notebook database at an explicit file path.
    pub fn open_file(path: &Path, options: &StoreOptions) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        conn.busy_timeout(options.busy_timeout)?;

        let journal_mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        if !journal_mode.eq_ignore_ascii_case("wal") {
            tracing::warn!(%journal_mode, "SQLite refused WAL journal mode");
        }
        conn.pragma_update(None, "synchronous", "FULL")?;

        run_with_retry(
            &mut conn,
            "apply_schema",
            options.busy_retries,
            options.retry_backoff,
            |conn| {
                conn.execute_batch(SCHEMA)?;
                Ok(())
            },
        )?;

        tracing::debug!(path = %path.display(), "opened notebook store");

        Ok(Self {
            path: path.to_path_buf(),
            conn: Mutex::new(conn),
            options: options.clone(),
        })
    }

    /// Path of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write a consistent copy of the database to `destination`.
    ///
    /// Uses SQLite's online backup into a temp file next to the destination,
    /// then renames it into place. Ciphertext is copied as-is, so no key is
    /// needed. Returns the size of the backup in bytes.
    pub fn backup_to(&self, destination: &Path) -> Result<u64> {
        let parent = match destination.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent)?;

        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| DiaryError::Storage(format!("System time error: {}", e)))?
            .as_nanos();
        let temp_path = parent.join(format!(".secret-diary-backup-{}.tmp", nanos));

        {
            let conn = self.lock_conn()?;
            if let Err(err) = conn.backup(DatabaseName::Main, &temp_path, None) {
                let _ = std::fs::remove_file(&temp_path);
                return Err(err.into());
            }
        }

        OpenOptions::new().read(true).open(&temp_path)?.sync_all()?;
        let bytes = std::fs::metadata(&temp_path)?.len();
        crate::fs::rename_with_fallback(&temp_path, destination)?;

        tracing::info!(destination = %destination.display(), bytes, "backup written");
        Ok(bytes)
    }

    /// Lock the database connection, returning an error if the mutex is poisoned.
    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| DiaryError::Storage("SQLite connection poisoned".to_string()))
    }

    fn with_retry<T, F>(&self, op_name: &str, op: F) -> Result<T>
    where
        F: FnMut(&mut Connection) -> Result<T>,
    {
        let mut conn = self.lock_conn()?;
        run_with_retry(
            &mut conn,
            op_name,
            self.options.busy_retries,
            self.options.retry_backoff,
            op,
        )
    }
}

impl NoteStore for SqliteStore {
    fn initialize(&self) -> Result<InitOutcome> {
        let outcome = self.with_retry("initialize", |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let existing: Option<i64> = tx
                .query_row("SELECT 1 FROM meta WHERE k = ?1", [SALT_KEY], |row| {
                    row.get(0)
                })
                .optional()?;
            if existing.is_some() {
                return Ok(InitOutcome::AlreadyInitialized);
            }

            let salt = new_salt()?;
            tx.execute(
                "INSERT INTO meta (k, v) VALUES (?1, ?2)",
                params![SALT_KEY, salt.as_bytes().as_slice()],
            )?;
            tx.commit()?;
            Ok(InitOutcome::Created)
        })?;

        tracing::info!(path = %self.path.display(), ?outcome, "initialize");
        Ok(outcome)
    }

    fn get_salt(&self) -> Result<Salt> {
        let stored: Option<Vec<u8>> = self.with_retry("get_salt", |conn| {
            Ok(conn
                .query_row("SELECT v FROM meta WHERE k = ?1", [SALT_KEY], |row| {
                    row.get(0)
                })
                .optional()?)
        })?;
        match stored {
            Some(bytes) => Salt::from_slice(&bytes),
            None => Err(DiaryError::NotInitialized),
        }
    }

    fn insert_note(&self, note: &NewNote) -> Result<NoteId> {
        validate_created_at(&note.created_at)?;

        let id = self.with_retry("insert_note", |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            tx.execute(
                "INSERT INTO notes (title, tags, body, created_at) VALUES (?1, ?2, ?3, ?4)",
                params![note.title, note.tags, note.body, note.created_at],
            )?;
            let id = tx.last_insert_rowid();
            tx.commit()?;
            Ok(NoteId(id))
        })?;

        tracing::debug!(%id, "note inserted");
        Ok(id)
    }

    fn list_notes(&self) -> Result<Vec<NoteSummary>> {
        self.with_retry("list_notes", |conn| {
            let mut stmt = conn.prepare_cached(row::SELECT_SUMMARIES)?;
            let rows = stmt.query_map([], row::note_summary)?;
            Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
        })
    }

    fn get_note(&self, id: NoteId) -> Result<NoteRecord> {
        let record = self.with_retry("get_note", |conn| {
            Ok(conn
                .query_row(row::SELECT_NOTE, [id.0], row::note_record)
                .optional()?)
        })?;
        record.ok_or(DiaryError::NotFound(id))
    }

    fn list_all_for_search(&self) -> Result<Vec<SearchRecord>> {
        self.with_retry("list_all_for_search", |conn| {
            let mut stmt = conn.prepare_cached(row::SELECT_SEARCH)?;
            let rows = stmt.query_map([], row::search_record)?;
            Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
        })
    }

    fn note_count(&self) -> Result<u64> {
        let count: i64 = self.with_retry("note_count", |conn| {
            Ok(conn.query_row("SELECT COUNT(*) FROM notes", [], |row| row.get(0))?)
        })?;
        Ok(count.max(0) as u64)
    }

    fn check_integrity(&self) -> Result<()> {
        let (report, salt, missing_timestamps) = self.with_retry("check_integrity", |conn| {
            let report: String = conn.query_row("PRAGMA integrity_check", [], |row| row.get(0))?;
            let salt: Option<Vec<u8>> = conn
                .query_row("SELECT v FROM meta WHERE k = ?1", [SALT_KEY], |row| {
                    row.get(0)
                })
                .optional()?;
            let missing_timestamps: i64 = conn.query_row(
                "SELECT COUNT(*) FROM notes WHERE created_at = ''",
                [],
                |row| row.get(0),
            )?;
            Ok((report, salt, missing_timestamps))
        })?;

        if report != "ok" {
            return Err(DiaryError::Integrity(format!(
                "SQLite integrity_check reported: {}",
                report
            )));
        }
        match salt {
            None => return Err(DiaryError::NotInitialized),
            Some(bytes) if bytes.len() != SALT_LENGTH => {
                return Err(DiaryError::Integrity(format!(
                    "Salt has {} bytes, expected {}",
                    bytes.len(),
                    SALT_LENGTH
                )));
            }
            Some(_) => {}
        }
        if missing_timestamps > 0 {
            return Err(DiaryError::Integrity(format!(
                "{} note(s) have no creation timestamp",
                missing_timestamps
            )));
        }

        tracing::info!(path = %self.path.display(), "integrity check passed");
        Ok(())
    }
}
