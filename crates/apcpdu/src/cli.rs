//! Clap derive structures for the `apcpdu` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Only depends on clap so `build.rs` can include it for man pages.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// apcpdu -- control APC PowerNet PDUs over SNMP
#[derive(Debug, Parser)]
#[command(
    name = "apcpdu",
    version,
    about = "Control APC PowerNet PDUs over SNMP",
    long_about = "Query and switch outlets, read load and alarm thresholds on\n\
        APC rack PDUs through the PowerNet MIB (SNMPv1 or v2c).",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// PDU profile to use
    #[arg(long, short = 'p', env = "APCPDU_PROFILE", global = true)]
    pub profile: Option<String>,

    /// PDU hostname or IP (overrides profile)
    #[arg(long, short = 'H', env = "APCPDU_HOST", global = true)]
    pub host: Option<String>,

    /// SNMP port (overrides profile)
    #[arg(long, env = "APCPDU_PORT", global = true)]
    pub port: Option<u16>,

    /// SNMP community string (overrides profile, env and keyring)
    #[arg(long, global = true)]
    pub community: Option<String>,

    /// SNMP protocol version (overrides profile)
    #[arg(long, value_enum, global = true)]
    pub snmp_version: Option<SnmpVersion>,

    /// Per-request timeout in milliseconds
    #[arg(long, env = "APCPDU_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Retransmissions after the first attempt
    #[arg(long, global = true)]
    pub retries: Option<u32>,

    /// Output format [default: `defaults.output` from config, else table]
    #[arg(long, short = 'o', env = "APCPDU_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: `defaults.color` from config, else auto]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SnmpVersion {
    /// SNMPv1 (PowerNet default)
    V1,
    /// SNMPv2c (bulk walks)
    V2c,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Inspect, switch and rename outlets
    #[command(alias = "outlet", alias = "o")]
    Outlets(OutletsArgs),

    /// Read phase load, thresholds and load state
    #[command(alias = "load")]
    Power(PowerArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Outlets ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct OutletsArgs {
    #[command(subcommand)]
    pub command: OutletsCommand,
}

/// A 1-based outlet number.
#[derive(Debug, Args)]
pub struct OutletArg {
    /// Outlet number (starting at 1)
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    pub outlet: u32,
}

#[derive(Debug, Subcommand)]
pub enum OutletsCommand {
    /// Number of outlets on the PDU
    Count,

    /// List every outlet with its name and power state
    #[command(alias = "ls")]
    List,

    /// Show an outlet's name
    Name(OutletArg),

    /// Show an outlet's power state
    State(OutletArg),

    /// Switch an outlet on
    On(OutletArg),

    /// Switch an outlet off
    Off(OutletArg),

    /// Write a raw power control code (on, off, or an integer such as 3 for reboot)
    SetState {
        #[command(flatten)]
        outlet: OutletArg,

        /// `on`, `off`, `true`, `false`, or a non-negative integer code
        state: String,
    },

    /// Rename an outlet (at most 20 characters)
    Rename {
        #[command(flatten)]
        outlet: OutletArg,

        /// New outlet name
        name: String,
    },
}

// ── Power ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PowerArgs {
    #[command(subcommand)]
    pub command: PowerCommand,
}

#[derive(Debug, Subcommand)]
pub enum PowerCommand {
    /// Phase 1 current draw in amps
    Draw,

    /// Phase 1 low, near-overload and overload thresholds
    Thresholds,

    /// Phase 1 load state (normal, low, near-overload, overload)
    State,

    /// Draw, thresholds and load state together
    Status,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file location
    Path,

    /// Display the current configuration
    Show,

    /// Create a profile with guided setup
    Init,

    /// Store the active profile's community string in the system keyring
    SetCommunity,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
