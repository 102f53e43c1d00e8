//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// Unclassified failure.
    pub const GENERAL: i32 = 1;

    /// Resource not found (notebook not initialized, note id).
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or arguments.
    pub const INVALID_INPUT: i32 = 4;

    /// Authentication failed (wrong password, tampered data).
    pub const AUTH_FAILED: i32 = 5;

    /// Integrity check failed.
    pub const INTEGRITY_FAILED: i32 = 6;

    /// Another process held the store lock too long.
    pub const BUSY: i32 = 7;
}

/// Environment variables read by the CLI.
pub mod env_vars {
    pub const PASSWORD: &str = "SECRET_DIARY_PASSWORD";
    pub const CONFIG: &str = "SECRET_DIARY_CONFIG";
    pub const LOG: &str = "SECRET_DIARY_LOG";
}

/// Interactive password attempts before giving up.
pub const MAX_PASSWORD_ATTEMPTS: u32 = 3;

/// Directory name under the XDG config/data homes.
pub const APP_DIR: &str = "secret-diary";
