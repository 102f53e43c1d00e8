//! CLI error types for structured error handling.
//!
//! This module provides typed errors that map to specific exit codes,
//! and the classification `main` uses to turn any error into an exit code
//! plus an optional hint.

use std::fmt;

use diary_core::DiaryError;

use crate::constants::exit_codes;

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Resource not found (store, note)
    NotFound { message: String, hint: String },

    /// Authentication failed (wrong password, too many attempts)
    AuthFailed {
        message: String,
        hint: Option<String>,
    },

    /// Invalid user input
    InvalidInput(String),

    /// Integrity check failed
    IntegrityFailed(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NotFound { message, .. } => write!(f, "{}", message),
            CliError::AuthFailed { message, .. } => write!(f, "{}", message),
            CliError::InvalidInput(message) => write!(f, "{}", message),
            CliError::IntegrityFailed(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Create a NotFound error with message and hint.
    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::NotFound {
            message: message.into(),
            hint: hint.into(),
        }
    }

    /// Create an AuthFailed error with message and hint.
    pub fn auth_failed_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::AuthFailed {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput(message.into())
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::AuthFailed { .. } => exit_codes::AUTH_FAILED,
            CliError::InvalidInput(_) => exit_codes::INVALID_INPUT,
            CliError::IntegrityFailed(_) => exit_codes::INTEGRITY_FAILED,
        }
    }

    pub fn hint(&self) -> Option<&str> {
        match self {
            CliError::NotFound { hint, .. } => Some(hint),
            CliError::AuthFailed { hint, .. } => hint.as_deref(),
            CliError::InvalidInput(_) => None,
            CliError::IntegrityFailed(_) => {
                Some("Restore from a backup, or export what still decrypts.")
            }
        }
    }
}

/// Exit code and hint for a failed command.
#[derive(Debug, PartialEq, Eq)]
pub struct Failure {
    pub code: i32,
    pub hint: Option<String>,
}

/// Classify an error from a command handler.
pub fn classify(err: &anyhow::Error) -> Failure {
    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        return Failure {
            code: cli_err.exit_code(),
            hint: cli_err.hint().map(str::to_string),
        };
    }
    if let Some(core_err) = err.downcast_ref::<DiaryError>() {
        return classify_core(core_err);
    }
    Failure {
        code: exit_codes::GENERAL,
        hint: None,
    }
}

fn classify_core(err: &DiaryError) -> Failure {
    let (code, hint) = match err {
        DiaryError::NotInitialized => (
            exit_codes::NOT_FOUND,
            Some("Run `secret-diary init` to create the notebook."),
        ),
        DiaryError::NotFound(_) => (
            exit_codes::NOT_FOUND,
            Some("Run `secret-diary list` to see note IDs."),
        ),
        DiaryError::Decryption => (
            exit_codes::AUTH_FAILED,
            Some("Check your password. Set SECRET_DIARY_PASSWORD for non-interactive use."),
        ),
        DiaryError::Busy { .. } => (
            exit_codes::BUSY,
            Some("Another secret-diary process is writing; try again in a moment."),
        ),
        DiaryError::InvalidInput(_) => (exit_codes::INVALID_INPUT, None),
        DiaryError::Integrity(_) => (
            exit_codes::INTEGRITY_FAILED,
            Some("Restore from a backup, or export what still decrypts."),
        ),
        DiaryError::RandomnessUnavailable(_)
        | DiaryError::Crypto(_)
        | DiaryError::Storage(_)
        | DiaryError::Sqlite { .. }
        | DiaryError::Io { .. } => (exit_codes::GENERAL, None),
    };
    Failure {
        code,
        hint: hint.map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diary_core::NoteId;

    #[test]
    fn test_core_errors_map_to_exit_codes() {
        let cases = [
            (DiaryError::NotInitialized, exit_codes::NOT_FOUND),
            (DiaryError::NotFound(NoteId(9)), exit_codes::NOT_FOUND),
            (DiaryError::Decryption, exit_codes::AUTH_FAILED),
            (DiaryError::Busy { attempts: 3 }, exit_codes::BUSY),
            (
                DiaryError::InvalidInput("bad".into()),
                exit_codes::INVALID_INPUT,
            ),
            (
                DiaryError::Integrity("bad".into()),
                exit_codes::INTEGRITY_FAILED,
            ),
            (DiaryError::Storage("x".into()), exit_codes::GENERAL),
        ];
        for (err, code) in cases {
            assert_eq!(classify(&anyhow::Error::new(err)).code, code);
        }
    }

    #[test]
    fn test_not_initialized_hints_init() {
        let failure = classify(&anyhow::Error::new(DiaryError::NotInitialized));
        assert!(failure.hint.unwrap().contains("secret-diary init"));
    }

    #[test]
    fn test_cli_errors_keep_their_codes() {
        let err = anyhow::Error::new(CliError::invalid_input("nope"));
        assert_eq!(classify(&err).code, exit_codes::INVALID_INPUT);

        let err = anyhow::Error::new(CliError::not_found("missing", "look elsewhere"));
        let failure = classify(&err);
        assert_eq!(failure.code, exit_codes::NOT_FOUND);
        assert_eq!(failure.hint.as_deref(), Some("look elsewhere"));
    }

    #[test]
    fn test_context_wrapped_core_error_still_classified() {
        let err = anyhow::Error::new(DiaryError::Decryption).context("reading note 3");
        assert_eq!(classify(&err).code, exit_codes::AUTH_FAILED);
    }

    #[test]
    fn test_plain_anyhow_is_general() {
        assert_eq!(classify(&anyhow::anyhow!("boom")).code, exit_codes::GENERAL);
    }
}
