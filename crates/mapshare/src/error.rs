//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use mapshare_config::ConfigError;
use mapshare_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach MapShare at {url}: {reason}")]
    #[diagnostic(
        code(mapshare::connection_failed),
        help("Check the link name and --base-url, and that the service is reachable.")
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Sending the message failed: {reason}")]
    #[diagnostic(
        code(mapshare::send_failed),
        help("The message was not delivered. Nothing is retried; run the command again.")
    )]
    SendFailed { reason: String },

    #[error("MapShare rejected the link credentials: {message}")]
    #[diagnostic(
        code(mapshare::auth_failed),
        help("Set the link password with password_env, MAPSHARE_PASSWORD, or the profile's password field.")
    )]
    AuthFailed { message: String },

    // ── Targets ──────────────────────────────────────────────────────
    #[error("No valid device targets")]
    #[diagnostic(
        code(mapshare::no_valid_targets),
        help("Targets must name a known device with an Id, or be a raw device ID.")
    )]
    NoValidTargets,

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(mapshare::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(mapshare::profile_not_found),
        help("Available profiles: {available}")
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No MapShare link configured")]
    #[diagnostic(
        code(mapshare::no_config),
        help(
            "Pass --link, or add a profile to the config file.\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("{0}")]
    #[diagnostic(code(mapshare::config))]
    Config(String),

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(mapshare::timeout),
        help("Increase the timeout with --timeout or the profile's timeout field.")
    )]
    Timeout { seconds: u64 },

    // ── Lifecycle / IO ───────────────────────────────────────────────
    #[error("Coordinator was shut down before the operation finished")]
    #[diagnostic(code(mapshare::shutdown))]
    Shutdown,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(mapshare::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::SendFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::NoValidTargets | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },
            CoreError::RefreshFailed { reason } => CliError::ConnectionFailed {
                url: "(device refresh)".into(),
                reason,
            },
            CoreError::NoValidTargets => CliError::NoValidTargets,
            CoreError::Transport { message, .. } => CliError::SendFailed { reason: message },
            CoreError::Config { message } => CliError::Config(message),
            CoreError::CoordinatorShutdown => CliError::Shutdown,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
                name,
                available: String::new(),
            },
            other => CliError::Config(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_exit_codes() {
        let cases = [
            (CoreError::NoValidTargets, exit_code::NOT_FOUND),
            (CoreError::Timeout { timeout_secs: 10 }, exit_code::TIMEOUT),
            (
                CoreError::Transport {
                    message: "HTTP 500".into(),
                    status: Some(500),
                },
                exit_code::CONNECTION,
            ),
            (
                CoreError::AuthenticationFailed {
                    message: "401".into(),
                },
                exit_code::AUTH,
            ),
            (CoreError::CoordinatorShutdown, exit_code::GENERAL),
        ];
        for (core, expected) in cases {
            assert_eq!(CliError::from(core).exit_code(), expected);
        }
    }

    #[test]
    fn config_validation_is_a_usage_error() {
        let err = CliError::from(ConfigError::Validation {
            field: "profiles.x.base_url".into(),
            reason: "bad".into(),
        });
        assert_eq!(err.exit_code(), exit_code::USAGE);
    }
}
