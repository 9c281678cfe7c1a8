//! Shared helpers for command handlers.

use std::io::IsTerminal;

use apcpdu_core::OutletIndex;

use crate::cli::OutletArg;
use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal there is nobody to ask, so the action is refused.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))
}

/// Convert a clap-validated outlet number into an `OutletIndex`.
pub fn outlet_index(arg: &OutletArg) -> Result<OutletIndex, CliError> {
    OutletIndex::new(arg.outlet).ok_or_else(|| CliError::Validation {
        field: "outlet".into(),
        reason: "outlet numbers start at 1".into(),
    })
}
