//! Bounded retry for SQLite lock contention.
//!
//! SQLite's own busy handler waits up to `busy_timeout` per statement; this
//! layer retries the whole operation a few more times with exponential
//! backoff before giving up with `DiaryError::Busy`.

use std::time::Duration;

use rusqlite::{Connection, ErrorCode};

use crate::error::{DiaryError, Result};

/// Whether an error is SQLite lock contention.
pub(super) fn is_busy(err: &DiaryError) -> bool {
    match err {
        DiaryError::Sqlite { source } => matches!(
            source.sqlite_error_code(),
            Some(ErrorCode::DatabaseBusy) | Some(ErrorCode::DatabaseLocked)
        ),
        _ => false,
    }
}

/// Delay before the retry following `attempt` (1-based).
pub(super) fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(1u32 << attempt.saturating_sub(1).min(8))
}

/// Run `op` until it succeeds, fails with a non-busy error, or
/// `max_attempts` busy failures have been seen.
pub(super) fn run_with_retry<T, F>(
    conn: &mut Connection,
    op_name: &str,
    max_attempts: u32,
    base_backoff: Duration,
    mut op: F,
) -> Result<T>
where
    F: FnMut(&mut Connection) -> Result<T>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt: u32 = 0;
    loop {
        attempt += 1;
        match op(conn) {
            Err(err) if is_busy(&err) => {
                if attempt >= max_attempts {
                    tracing::warn!(op = op_name, attempts = attempt, "store still busy, giving up");
                    return Err(DiaryError::Busy { attempts: attempt });
                }
                let delay = backoff_delay(base_backoff, attempt);
                tracing::debug!(op = op_name, attempt, ?delay, "store busy, retrying");
                std::thread::sleep(delay);
            }
            other => return other,
        }
    }
}
