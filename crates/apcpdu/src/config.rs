//! CLI config layer: thin wrapper around `apcpdu_config`.
//!
//! Adds the global-flag overrides on top of the shared profile resolution.

use std::time::Duration;

use clap::ValueEnum;
use secrecy::SecretString;

use apcpdu_core::{DeviceConfig, Version};

use crate::cli::{GlobalOpts, SnmpVersion};
use crate::error::CliError;

pub use apcpdu_config::{
    Config, Defaults, Profile, config_path, load_config, profile_to_device_config, save_config,
    store_community,
};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Comma-separated profile names for diagnostics.
pub fn available_profiles(config: &Config) -> String {
    if config.profiles.is_empty() {
        "(none)".into()
    } else {
        config
            .profiles
            .keys()
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Fill `--output` and `--color` from `[defaults]` when neither the flag
/// nor its environment variable was given.
pub fn apply_display_defaults(
    global: &mut GlobalOpts,
    defaults: &Defaults,
) -> Result<(), CliError> {
    if global.output.is_none() {
        global.output = Some(parse_default("defaults.output", &defaults.output)?);
    }
    if global.color.is_none() {
        global.color = Some(parse_default("defaults.color", &defaults.color)?);
    }
    Ok(())
}

fn parse_default<T: ValueEnum>(field: &str, raw: &str) -> Result<T, CliError> {
    <T as ValueEnum>::from_str(raw, true).map_err(|reason| CliError::Validation {
        field: field.into(),
        reason,
    })
}

/// Build a `DeviceConfig` from the loaded config, profile, and CLI overrides.
pub fn build_device_config(global: &GlobalOpts, cfg: &Config) -> Result<DeviceConfig, CliError> {
    let profile_name = active_profile_name(global, cfg);

    let mut profile = if let Some(profile) = cfg.profiles.get(&profile_name) {
        profile.clone()
    } else if global.profile.is_some() {
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: available_profiles(cfg),
        });
    } else {
        // No profile -- build from CLI flags / env vars alone
        Profile::default()
    };

    if let Some(ref host) = global.host {
        host.clone_into(&mut profile.host);
    }
    if profile.host.trim().is_empty() {
        return Err(CliError::NoHost {
            path: config_path().display().to_string(),
        });
    }

    let mut device = profile_to_device_config(&profile, &profile_name, &cfg.defaults)?;
    apply_overrides(&mut device, global)?;
    Ok(device)
}

/// Flags beat profile values.
fn apply_overrides(device: &mut DeviceConfig, global: &GlobalOpts) -> Result<(), CliError> {
    if let Some(port) = global.port {
        device.port = port;
    }
    if let Some(ref community) = global.community {
        device.community = SecretString::from(community.clone());
    }
    if let Some(version) = global.snmp_version {
        device.version = match version {
            SnmpVersion::V1 => Version::V1,
            SnmpVersion::V2c => Version::V2c,
        };
    }
    if let Some(timeout) = global.timeout {
        if timeout == 0 {
            return Err(CliError::Validation {
                field: "timeout".into(),
                reason: "must be greater than zero".into(),
            });
        }
        device.timeout = Duration::from_millis(timeout);
    }
    if let Some(retries) = global.retries {
        device.retries = retries;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::cli::{Cli, ColorMode, OutputFormat};

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["apcpdu"];
        argv.extend_from_slice(args);
        argv.extend(["power", "draw"]);
        Cli::parse_from(argv).global
    }

    fn defaults(output: &str, color: &str) -> Defaults {
        Defaults {
            output: output.into(),
            color: color.into(),
            ..Defaults::default()
        }
    }

    #[test]
    fn config_defaults_fill_unset_display_flags() {
        let mut opts = global(&[]);
        let defaults = defaults("json-compact", "never");
        apply_display_defaults(&mut opts, &defaults).unwrap();
        assert_eq!(opts.output_format(), OutputFormat::JsonCompact);
        assert_eq!(opts.color_mode(), ColorMode::Never);
    }

    #[test]
    fn display_flags_beat_config_defaults() {
        let mut opts = global(&["--output", "plain", "--color", "always"]);
        let defaults = defaults("yaml", "never");
        apply_display_defaults(&mut opts, &defaults).unwrap();
        assert_eq!(opts.output_format(), OutputFormat::Plain);
        assert_eq!(opts.color_mode(), ColorMode::Always);
    }

    #[test]
    fn unknown_default_output_is_a_validation_error() {
        let mut opts = global(&[]);
        let defaults = defaults("xml", "auto");
        let err = apply_display_defaults(&mut opts, &defaults).unwrap_err();
        assert!(
            matches!(&err, CliError::Validation { field, .. } if field == "defaults.output"),
            "got {err:?}"
        );
    }

    #[test]
    fn device_config_comes_from_the_loaded_profile() {
        let cfg = Config {
            default_profile: Some("lab".into()),
            profiles: [(
                "lab".to_owned(),
                Profile {
                    host: "10.0.20.41".into(),
                    port: Some(1161),
                    ..Profile::default()
                },
            )]
            .into_iter()
            .collect(),
            ..Config::default()
        };
        let opts = global(&["--retries", "3"]);
        let device = build_device_config(&opts, &cfg).unwrap();
        assert_eq!(device.host, "10.0.20.41");
        assert_eq!(device.port, 1161);
        assert_eq!(device.retries, 3);
    }
}
