// Transport seam and shared transport configuration.
//
// `SnmpTransport` is the only contract the session depends on. The UDP
// implementation wraps `async-snmp`; tests plug in `MockTransport`.

use std::future::Future;
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::oid::Oid;
use crate::value::{Value, Varbind};

pub const DEFAULT_PORT: u16 = 161;
pub const DEFAULT_COMMUNITY: &str = "private";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1000);
pub const DEFAULT_RETRIES: u32 = 1;

/// SNMP protocol version spoken on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Version {
    /// SNMPv1 -- what PowerNet PDUs ship with.
    #[default]
    V1,
    V2c,
}

/// Connection settings for a single agent.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub host: String,
    pub port: u16,
    pub community: SecretString,
    pub version: Version,
    /// Per-request timeout handed to the collaborator.
    pub timeout: Duration,
    /// Retransmissions after the first attempt.
    pub retries: u32,
}

impl TransportConfig {
    /// Config for `host` with every other field at its default.
    ///
    /// Fails if `host` is empty or whitespace.
    pub fn new(host: impl Into<String>) -> Result<Self> {
        let config = Self {
            host: host.into(),
            port: DEFAULT_PORT,
            community: SecretString::from(DEFAULT_COMMUNITY.to_owned()),
            version: Version::default(),
            timeout: DEFAULT_TIMEOUT,
            retries: DEFAULT_RETRIES,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(Error::InvalidHost {
                reason: "host must not be empty".into(),
            });
        }
        Ok(())
    }

    /// `host:port`, bracketing bare IPv6 literals.
    pub fn target(&self) -> String {
        let host = self.host.trim();
        if host.contains(':') && !host.starts_with('[') {
            format!("[{host}]:{}", self.port)
        } else {
            format!("{host}:{}", self.port)
        }
    }

    /// Upper bound for a single GET/SET including every retransmission.
    pub fn deadline(&self) -> Duration {
        self.timeout.saturating_mul(self.retries.saturating_add(1))
    }
}

/// The three SNMP primitives the domain layer is built on.
///
/// Implementations must return `get` results in request order, one
/// varbind per requested OID. `walk` is all-or-nothing: an error
/// discards anything collected so far.
pub trait SnmpTransport: Send + Sync {
    fn get(&self, oids: &[Oid]) -> impl Future<Output = Result<Vec<Varbind>>> + Send;

    /// Issue a SET and return the varbinds the agent echoed back.
    fn set(&self, oid: &Oid, value: &Value) -> impl Future<Output = Result<Vec<Varbind>>> + Send;

    /// Collect every varbind strictly below `root`.
    fn walk(&self, root: &Oid, page_size: u32)
    -> impl Future<Output = Result<Vec<Varbind>>> + Send;

    /// `true` if responses are matched to requests by ID, so several
    /// requests may be in flight at once. When `false`, the session
    /// serializes all traffic.
    fn supports_concurrent_requests(&self) -> bool {
        false
    }

    /// Human-readable peer, for logs and error messages.
    fn peer(&self) -> String;
}
