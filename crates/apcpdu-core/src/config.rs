// ── Runtime connection configuration ──
//
// Describes *how* to reach one PDU. Carries the community string and
// timing knobs but never touches disk: the CLI resolves profiles and
// hands a `DeviceConfig` in.

use std::time::Duration;

use apcpdu_snmp::transport::{DEFAULT_COMMUNITY, DEFAULT_PORT, DEFAULT_RETRIES, DEFAULT_TIMEOUT};
use apcpdu_snmp::{TransportConfig, Version};
use secrecy::SecretString;

use crate::error::CoreError;

/// Configuration for talking to a single PDU.
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    /// Hostname or IP address of the PDU's management card.
    pub host: String,
    pub port: u16,
    /// SNMP community. Write access needs the read-write community.
    pub community: SecretString,
    pub version: Version,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Retransmissions after the first attempt.
    pub retries: u32,
}

impl DeviceConfig {
    /// Config for `host` using the PowerNet factory defaults.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            community: SecretString::from(DEFAULT_COMMUNITY.to_owned()),
            version: Version::default(),
            timeout: DEFAULT_TIMEOUT,
            retries: DEFAULT_RETRIES,
        }
    }

    #[must_use]
    pub fn with_community(mut self, community: SecretString) -> Self {
        self.community = community;
        self
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.host.trim().is_empty() {
            return Err(CoreError::Config {
                message: "PDU host must not be empty".into(),
            });
        }
        if self.timeout.is_zero() {
            return Err(CoreError::Config {
                message: "timeout must be greater than zero".into(),
            });
        }
        Ok(())
    }

    /// Validated transport settings for the session layer.
    pub fn transport_config(&self) -> Result<TransportConfig, CoreError> {
        self.validate()?;
        let config = TransportConfig {
            host: self.host.trim().to_owned(),
            port: self.port,
            community: self.community.clone(),
            version: self.version,
            timeout: self.timeout,
            retries: self.retries,
        };
        config.validate()?;
        Ok(config)
    }
}
