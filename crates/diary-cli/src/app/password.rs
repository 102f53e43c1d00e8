//! Master password handling with retry logic.

use diary_core::{DiaryError, NoteStore, Session};

use crate::constants::MAX_PASSWORD_ATTEMPTS;
use crate::errors::CliError;
use crate::helpers::{env_password, prompt_password};
use crate::ui::progress::Spinner;
use crate::ui::UiContext;

/// Unlock a session, prompting up to three times on a TTY.
///
/// A password from the environment gets exactly one attempt.
pub fn unlock_with_retry(
    store: &dyn NoteStore,
    interactive: bool,
    ui_ctx: &UiContext,
) -> anyhow::Result<Session> {
    if let Some(password) = env_password()? {
        let spinner = Spinner::start(ui_ctx, "Deriving key");
        let result = Session::unlock(store, &password);
        spinner.clear();
        return result.map_err(Into::into);
    }

    // Fail before prompting if the notebook has no salt.
    store.get_salt()?;

    let max_attempts = if interactive { MAX_PASSWORD_ATTEMPTS } else { 1 };
    let mut attempts: u32 = 0;
    loop {
        attempts += 1;
        let password = prompt_password(interactive)?;
        let spinner = Spinner::start(ui_ctx, "Deriving key");
        let result = Session::unlock(store, &password);
        spinner.clear();
        match result {
            Ok(session) => return Ok(session),
            Err(DiaryError::Decryption) => {
                tracing::info!(attempts, "password rejected");
                let remaining = max_attempts.saturating_sub(attempts);
                if remaining == 0 {
                    return Err(CliError::auth_failed_with_hint(
                        "Too many failed password attempts.",
                        "If you forgot your password, the notes cannot be recovered. Backups use the same password.",
                    )
                    .into());
                }
                eprintln!(
                    "Incorrect password. {} attempt{} remaining.",
                    remaining,
                    if remaining == 1 { "" } else { "s" }
                );
            }
            Err(err) => return Err(err.into()),
        }
    }
}
