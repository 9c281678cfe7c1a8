// ── Core error types ──
//
// Errors surfaced by PDU operations. Session-level failures pass through
// as `Protocol`, except the few that mean something specific to a caller
// (closed session, missing object, bad host). Everything else here is a
// domain check applied to an otherwise successful response.

use apcpdu_snmp::Oid;
use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Session ──────────────────────────────────────────────────────
    #[error(transparent)]
    Protocol(apcpdu_snmp::Error),

    #[error("Session is closed")]
    SessionClosed,

    // ── Response shape ───────────────────────────────────────────────
    /// Unknown OID, or an outlet index past the device's outlet count.
    #[error("No such object on the device: {oid}")]
    NoSuchObject { oid: Oid },

    #[error("Expected {expected} varbind(s) for {oid}, got {actual}")]
    InvalidResponseShape {
        oid: Oid,
        expected: usize,
        actual: usize,
    },

    #[error("Cannot decode value at {oid}: {message}")]
    Decode { oid: Oid, message: String },

    // ── Writes ───────────────────────────────────────────────────────
    /// Rejected locally; nothing was sent to the device.
    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    /// The SET completed but the agent echoed a different value.
    #[error("Device did not apply change at {oid}: requested {requested}, confirmed {confirmed}")]
    DeviceRejectedChange {
        oid: Oid,
        requested: String,
        confirmed: String,
    },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Protocol(e) if e.is_timeout())
    }

    pub(crate) fn decode(oid: &Oid, message: impl Into<String>) -> Self {
        Self::Decode {
            oid: oid.clone(),
            message: message.into(),
        }
    }
}

// ── Conversion from session errors ───────────────────────────────────

impl From<apcpdu_snmp::Error> for CoreError {
    fn from(err: apcpdu_snmp::Error) -> Self {
        match err {
            apcpdu_snmp::Error::SessionClosed => CoreError::SessionClosed,
            apcpdu_snmp::Error::NoSuchName { oid } => CoreError::NoSuchObject { oid },
            apcpdu_snmp::Error::InvalidHost { reason } => CoreError::Config { message: reason },
            apcpdu_snmp::Error::InvalidOid(message) => CoreError::Validation {
                field: "oid".into(),
                reason: message,
            },
            other => CoreError::Protocol(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_such_name_becomes_no_such_object() {
        let oid = Oid::from_arcs(&[1, 3, 6, 1, 4, 1, 318, 1, 1, 4, 4, 2, 1, 4, 99]);
        let err = CoreError::from(apcpdu_snmp::Error::NoSuchName { oid: oid.clone() });
        assert!(matches!(err, CoreError::NoSuchObject { oid: o } if o == oid));
    }

    #[test]
    fn timeout_passes_through_as_protocol() {
        let err = CoreError::from(apcpdu_snmp::Error::Timeout {
            target: "10.0.20.41:161".into(),
            timeout_ms: 1000,
        });
        assert!(err.is_timeout());
        assert!(matches!(err, CoreError::Protocol(_)));
    }

    #[test]
    fn closed_session_is_surfaced_directly() {
        let err = CoreError::from(apcpdu_snmp::Error::SessionClosed);
        assert!(matches!(err, CoreError::SessionClosed));
    }
}
