//! Constants used throughout the CLI.

/// Environment variable holding the password for non-interactive use.
pub const PASSWORD_ENV: &str = "CREDHASH_PASSWORD";

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "CREDHASH_LOG";

/// Default log filter when `CREDHASH_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Message printed for every failed verification, whatever the cause.
pub const AUTH_FAILED_MESSAGE: &str = "Authentication failed";

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// Invalid user input or configuration.
    pub const INVALID_INPUT: i32 = 4;

    /// Verification failed (wrong password or unusable record).
    pub const AUTH_FAILED: i32 = 5;
}
