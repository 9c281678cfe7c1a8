//! Command dispatch: bridges CLI args -> `Pdu` calls -> output formatting.

pub mod config_cmd;
pub mod outlets;
pub mod power;
pub mod util;

use apcpdu_core::Pdu;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Validate a device-bound command without contacting the device.
pub fn preflight(cmd: &Command) -> Result<(), CliError> {
    match cmd {
        Command::Outlets(args) => outlets::preflight(args),
        _ => Ok(()),
    }
}

/// Dispatch a device-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, pdu: &Pdu, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Outlets(args) => outlets::handle(pdu, args, global).await,
        Command::Power(args) => power::handle(pdu, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
