use thiserror::Error;

use crate::oid::Oid;

/// Top-level error type for the `apcpdu-snmp` crate.
///
/// Covers every failure the session adapter can surface: transport,
/// agent-reported status, malformed traffic, and session misuse.
/// `apcpdu-core` maps these into domain errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// No response within the session's timeout budget.
    #[error("Request to {target} timed out after {timeout_ms}ms")]
    Timeout { target: String, timeout_ms: u64 },

    /// Socket-level failure (unreachable, refused, resolution failure).
    #[error("Network error communicating with {target}: {message}")]
    Network { target: String, message: String },

    // ── Agent ───────────────────────────────────────────────────────
    /// SNMPv1 `noSuchName`: the agent has no object at this OID.
    #[error("No such object: {oid}")]
    NoSuchName { oid: Oid },

    /// Any other non-zero error-status in a response PDU.
    #[error("Agent reported {status} at index {index}")]
    Agent {
        status: String,
        index: u32,
        oid: Option<Oid>,
    },

    /// Community string rejected.
    #[error("Authentication failed for {target}")]
    Authentication { target: String },

    // ── Data ────────────────────────────────────────────────────────
    /// Response could not be decoded or did not match the request.
    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    /// The agent misbehaved mid-walk (non-increasing OIDs, loops).
    #[error("Walk of {root} aborted: {reason}")]
    WalkAborted { root: Oid, reason: String },

    /// A value cannot be encoded for a SET request.
    #[error("Cannot encode {type_name} for a SET request")]
    Encode { type_name: &'static str },

    /// OID string failed to parse.
    #[error("Invalid OID: {0}")]
    InvalidOid(String),

    // ── Session ─────────────────────────────────────────────────────
    /// Host missing or unusable at session creation.
    #[error("Invalid host: {reason}")]
    InvalidHost { reason: String },

    /// The session was closed; no further requests are possible.
    #[error("Session is closed")]
    SessionClosed,
}

impl Error {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Returns `true` if this is a transient error worth retrying.
    ///
    /// The library never retries on its own; this is advice for callers.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Network { .. })
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
