//! Shared configuration for apcpdu.
//!
//! TOML profiles, community-string resolution (env + keyring + plaintext),
//! and translation to `apcpdu_core::DeviceConfig`. The CLI layers its own
//! flag overrides on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use apcpdu_core::{DEFAULT_COMMUNITY, DeviceConfig, Version};

/// Keyring service name for stored community strings.
pub const KEYRING_SERVICE: &str = "apcpdu";

/// Overrides the config file location.
pub const CONFIG_ENV: &str = "APCPDU_CONFIG";

/// Community string used by every profile that has none of its own.
pub const COMMUNITY_ENV: &str = "APCPDU_COMMUNITY";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{profile}' not found")]
    NoProfile { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named PDU profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Look up `name`, or the default profile when `name` is `None`.
    pub fn profile<'a>(
        &'a self,
        name: Option<&'a str>,
    ) -> Result<(&'a str, &'a Profile), ConfigError> {
        let name = name.or(self.default_profile.as_deref()).unwrap_or("default");
        self.profiles
            .get(name)
            .map(|profile| (name, profile))
            .ok_or_else(|| ConfigError::NoProfile {
                profile: name.into(),
            })
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_retries")]
    pub retries: u32,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout_ms: default_timeout_ms(),
            retries: default_retries(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout_ms() -> u64 {
    1000
}
fn default_retries() -> u32 {
    1
}

/// A named PDU profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Hostname or IP of the management card.
    pub host: String,

    /// UDP port (default 161).
    pub port: Option<u16>,

    /// Community string (plaintext -- prefer keyring or env var).
    pub community: Option<String>,

    /// Environment variable name containing the community string.
    pub community_env: Option<String>,

    /// `v1` (default) or `v2c`.
    pub version: Option<Version>,

    /// Override the default timeout.
    pub timeout_ms: Option<u64>,

    /// Override the default retry count.
    pub retries: Option<u32>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path: `APCPDU_CONFIG`, else platform conventions.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }
    ProjectDirs::from("com", "apcpdu", "apcpdu").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("apcpdu");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file, still honoring `APCPDU_` overrides.
///
/// Nested keys use a double underscore: `APCPDU_DEFAULTS__TIMEOUT_MS`,
/// `APCPDU_PROFILES__LAB__HOST`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(
            Env::prefixed("APCPDU_")
                .ignore(&["config", "community"])
                .split("__"),
        );

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Community resolution (without CLI flags) ────────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, ConfigError> {
    Ok(keyring::Entry::new(
        KEYRING_SERVICE,
        &format!("{profile_name}/community"),
    )?)
}

/// Resolve the community string for a profile.
///
/// Order: the profile's `community_env` variable, `APCPDU_COMMUNITY`,
/// the system keyring, plaintext in the profile, then the factory
/// default `private`.
pub fn resolve_community(profile: &Profile, profile_name: &str) -> SecretString {
    // 1. Profile's community_env → env var lookup
    if let Some(ref env_name) = profile.community_env {
        if let Ok(val) = std::env::var(env_name) {
            return SecretString::from(val);
        }
    }

    // 2. Shared env var
    if let Ok(val) = std::env::var(COMMUNITY_ENV) {
        return SecretString::from(val);
    }

    // 3. System keyring
    if let Ok(entry) = keyring_entry(profile_name) {
        if let Ok(secret) = entry.get_password() {
            return SecretString::from(secret);
        }
    }

    // 4. Plaintext in config
    if let Some(ref community) = profile.community {
        return SecretString::from(community.clone());
    }

    SecretString::from(DEFAULT_COMMUNITY.to_owned())
}

/// Store a community string in the system keyring for `profile_name`.
pub fn store_community(profile_name: &str, community: &SecretString) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(community.expose_secret())?;
    Ok(())
}

/// Build a `DeviceConfig` from a profile -- no CLI flag overrides.
pub fn profile_to_device_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<DeviceConfig, ConfigError> {
    if profile.host.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "host".into(),
            reason: format!("profile '{profile_name}' has no host"),
        });
    }

    let timeout_ms = profile.timeout_ms.unwrap_or(defaults.timeout_ms);
    if timeout_ms == 0 {
        return Err(ConfigError::Validation {
            field: "timeout_ms".into(),
            reason: "must be greater than zero".into(),
        });
    }

    let mut config = DeviceConfig::new(profile.host.trim())
        .with_community(resolve_community(profile, profile_name));
    if let Some(port) = profile.port {
        config.port = port;
    }
    config.version = profile.version.unwrap_or_default();
    config.timeout = Duration::from_millis(timeout_ms);
    config.retries = profile.retries.unwrap_or(defaults.retries);
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn lab_profile() -> Profile {
        Profile {
            host: "10.0.20.41".into(),
            community: Some("lab-rw".into()),
            ..Profile::default()
        }
    }

    #[test]
    fn profile_lookup_falls_back_to_default_name() {
        let mut config = Config::default();
        config.profiles.insert("default".into(), lab_profile());

        let (name, profile) = config.profile(None).unwrap();
        assert_eq!(name, "default");
        assert_eq!(profile.host, "10.0.20.41");

        assert!(matches!(
            config.profile(Some("rack9")),
            Err(ConfigError::NoProfile { profile }) if profile == "rack9"
        ));
    }

    #[test]
    fn device_config_applies_defaults_and_overrides() {
        let defaults = Defaults {
            timeout_ms: 2500,
            retries: 0,
            ..Defaults::default()
        };
        let profile = Profile {
            port: Some(1161),
            version: Some(Version::V2c),
            retries: Some(2),
            ..lab_profile()
        };

        let device = profile_to_device_config(&profile, "lab", &defaults).unwrap();
        assert_eq!(device.host, "10.0.20.41");
        assert_eq!(device.port, 1161);
        assert_eq!(device.version, Version::V2c);
        assert_eq!(device.timeout, Duration::from_millis(2500));
        assert_eq!(device.retries, 2);
    }

    #[test]
    fn empty_host_is_rejected() {
        let profile = Profile {
            host: " ".into(),
            ..Profile::default()
        };
        let err = profile_to_device_config(&profile, "lab", &Defaults::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "host"));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let profile = Profile {
            timeout_ms: Some(0),
            ..lab_profile()
        };
        let err = profile_to_device_config(&profile, "lab", &Defaults::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "timeout_ms"));
    }
}
