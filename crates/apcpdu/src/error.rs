//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use apcpdu_config::ConfigError;
use apcpdu_core::{CoreError, SnmpError};

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach PDU at {target}")]
    #[diagnostic(
        code(apcpdu::connection_failed),
        help(
            "Check that the management card is reachable over UDP.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { target: String, reason: String },

    #[error("PDU at {target} rejected the community string")]
    #[diagnostic(
        code(apcpdu::auth_failed),
        help("Store the right community with: apcpdu config set-community")
    )]
    AuthFailed { target: String },

    #[error("Request timed out after {timeout_ms}ms")]
    #[diagnostic(
        code(apcpdu::timeout),
        help(
            "Increase the timeout with --timeout, or check the host and community.\n\
             PowerNet agents silently drop requests with the wrong community."
        )
    )]
    Timeout { timeout_ms: u64 },

    // ── Device ───────────────────────────────────────────────────────
    #[error("The PDU has no object at {oid}")]
    #[diagnostic(
        code(apcpdu::not_found),
        help("Outlet numbers run from 1 to the value of: apcpdu outlets count")
    )]
    NotFound { oid: String },

    #[error("The PDU did not apply the change at {oid}: requested {requested}, got {confirmed}")]
    #[diagnostic(
        code(apcpdu::rejected),
        help("Writes need the read-write community configured on the management card.")
    )]
    Rejected {
        oid: String,
        requested: String,
        confirmed: String,
    },

    #[error("Unexpected response from the PDU: {message}")]
    #[diagnostic(code(apcpdu::unexpected_response))]
    UnexpectedResponse { message: String },

    #[error("SNMP error: {message}")]
    #[diagnostic(code(apcpdu::snmp))]
    Snmp { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(apcpdu::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("No PDU host configured")]
    #[diagnostic(
        code(apcpdu::no_host),
        help(
            "Pass --host, set APCPDU_HOST, or create a profile with: apcpdu config init\n\
             Config file: {path}"
        )
    )]
    NoHost { path: String },

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(apcpdu::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: apcpdu config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(apcpdu::config))]
    Config(Box<ConfigError>),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("'{action}' requires confirmation")]
    #[diagnostic(
        code(apcpdu::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Rejected { .. } => exit_code::CONFLICT,
            Self::Validation { .. }
            | Self::NoHost { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Protocol(err) => err.into(),

            CoreError::SessionClosed => CliError::Snmp {
                message: "session closed".into(),
            },

            CoreError::NoSuchObject { oid } => CliError::NotFound {
                oid: oid.to_string(),
            },

            err @ (CoreError::InvalidResponseShape { .. } | CoreError::Decode { .. }) => {
                CliError::UnexpectedResponse {
                    message: err.to_string(),
                }
            }

            CoreError::Validation { field, reason } => CliError::Validation { field, reason },

            CoreError::DeviceRejectedChange {
                oid,
                requested,
                confirmed,
            } => CliError::Rejected {
                oid: oid.to_string(),
                requested,
                confirmed,
            },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}

impl From<SnmpError> for CliError {
    fn from(err: SnmpError) -> Self {
        match err {
            SnmpError::Timeout { timeout_ms, .. } => CliError::Timeout { timeout_ms },
            SnmpError::Network { target, message } => CliError::ConnectionFailed {
                target,
                reason: message,
            },
            SnmpError::Authentication { target } => CliError::AuthFailed { target },
            other => CliError::Snmp {
                message: other.to_string(),
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoProfile { profile } => CliError::ProfileNotFound {
                name: profile,
                available: "(see: apcpdu config show)".into(),
            },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config(Box::new(other)),
        }
    }
}
