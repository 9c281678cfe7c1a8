//! Config subcommand handlers.

use dialoguer::{Input, Select};
use secrecy::SecretString;

use apcpdu_core::{DEFAULT_COMMUNITY, DEFAULT_PORT, Version};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn prompt_community(label: &str) -> Result<String, CliError> {
    let community = rpassword::prompt_password(label).map_err(prompt_err)?;
    if community.is_empty() {
        return Err(CliError::Validation {
            field: "community".into(),
            reason: "community string cannot be empty".into(),
        });
    }
    Ok(community)
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &mut GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            config::apply_display_defaults(global, &cfg.defaults)?;
            let out = output::render_single(
                global.output_format(),
                &cfg,
                |c| toml::to_string_pretty(c).unwrap_or_else(|_| format!("{c:#?}")),
                |c| c.profiles.keys().cloned().collect::<Vec<_>>().join("\n"),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Init => init(),

        ConfigCommand::SetCommunity => {
            let cfg = config::load_config()?;
            let profile_name = config::active_profile_name(global, &cfg);
            if !cfg.profiles.contains_key(&profile_name) {
                return Err(CliError::ProfileNotFound {
                    name: profile_name,
                    available: config::available_profiles(&cfg),
                });
            }

            let community = prompt_community("Community string: ")?;
            config::store_community(&profile_name, &SecretString::from(community))?;
            eprintln!("✓ Community stored in system keyring for profile '{profile_name}'");
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config()?;

            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: config::available_profiles(&cfg),
                    name,
                });
            }

            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            eprintln!("✓ Default profile set to '{name}'");
            Ok(())
        }
    }
}

// ── Init: interactive wizard ─────────────────────────────────────────

fn init() -> Result<(), CliError> {
    let config_path = config::config_path();
    // Loaded before prompting: a file that fails to parse is never overwritten.
    let mut cfg: Config = config::load_config()?;

    eprintln!("apcpdu configuration wizard");
    eprintln!("   Config path: {}\n", config_path.display());

    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default("default".into())
        .interact_text()
        .map_err(prompt_err)?;

    let host: String = Input::new()
        .with_prompt("PDU host or IP")
        .interact_text()
        .map_err(prompt_err)?;
    if host.trim().is_empty() {
        return Err(CliError::Validation {
            field: "host".into(),
            reason: "host cannot be empty".into(),
        });
    }

    let port: u16 = Input::new()
        .with_prompt("SNMP port")
        .default(DEFAULT_PORT)
        .interact_text()
        .map_err(prompt_err)?;

    let versions = &["SNMPv1 (PowerNet default)", "SNMPv2c"];
    let version = match Select::new()
        .with_prompt("SNMP version")
        .items(versions)
        .default(0)
        .interact()
        .map_err(prompt_err)?
    {
        0 => Version::V1,
        _ => Version::V2c,
    };

    eprintln!("   Leave empty to use the factory default '{DEFAULT_COMMUNITY}'");
    let community = rpassword::prompt_password("Community string: ").map_err(prompt_err)?;

    let community_field = if community.is_empty() {
        None
    } else {
        let store_choices = &[
            "Store in system keyring (recommended)",
            "Save to config file (plaintext)",
        ];
        let store_selection = Select::new()
            .with_prompt("Where to store the community string?")
            .items(store_choices)
            .default(0)
            .interact()
            .map_err(prompt_err)?;

        if store_selection == 0 {
            config::store_community(&profile_name, &SecretString::from(community))?;
            eprintln!("   ✓ Community stored in system keyring");
            None
        } else {
            Some(community)
        }
    };

    let profile = Profile {
        host: host.trim().to_owned(),
        port: (port != DEFAULT_PORT).then_some(port),
        community: community_field,
        version: Some(version),
        ..Profile::default()
    };

    cfg.profiles.insert(profile_name.clone(), profile);
    cfg.default_profile = Some(profile_name.clone());

    let written = config::save_config(&cfg)?;

    eprintln!("\n✓ Configuration written to {}", written.display());
    eprintln!("  Active profile: {profile_name}");
    eprintln!("\n  Test it: apcpdu outlets count");

    Ok(())
}
