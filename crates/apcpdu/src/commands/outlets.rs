//! Outlet command handlers.

use serde::Serialize;
use tabled::Tabled;

use apcpdu_core::{MAX_OUTLET_NAME_LEN, OutletMap, Pdu, PowerState};

use crate::cli::{GlobalOpts, OutletsArgs, OutletsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct OutletView {
    outlet: String,
    name: Option<String>,
    state: String,
    code: Option<i32>,
}

#[derive(Tabled)]
struct OutletRow {
    #[tabled(rename = "#")]
    outlet: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "State")]
    state: String,
}

impl From<&OutletView> for OutletRow {
    fn from(v: &OutletView) -> Self {
        Self {
            outlet: v.outlet.clone(),
            name: v.name.clone().unwrap_or_else(|| "-".into()),
            state: v.state.clone(),
        }
    }
}

/// Join the name and state walks on outlet key.
fn join_outlets(names: &OutletMap<String>, states: &OutletMap<PowerState>) -> Vec<OutletView> {
    let mut views: Vec<OutletView> = names
        .iter()
        .map(|(key, name)| {
            let state = states.get(key.as_str()).copied();
            OutletView {
                outlet: key.to_string(),
                name: Some(name.clone()),
                state: state.map_or_else(|| "-".into(), |s| s.to_string()),
                code: state.map(PowerState::code),
            }
        })
        .collect();

    // States for outlets the name walk did not return.
    for (key, state) in states {
        if names.get(key.as_str()).is_none() {
            views.push(OutletView {
                outlet: key.to_string(),
                name: None,
                state: state.to_string(),
                code: Some(state.code()),
            });
        }
    }
    views
}

/// Checks that need no device round trip, run before connecting.
pub fn preflight(args: &OutletsArgs) -> Result<(), CliError> {
    match args.command {
        OutletsCommand::Rename { ref name, .. } => {
            let length = name.chars().count();
            if length > MAX_OUTLET_NAME_LEN {
                return Err(CliError::Validation {
                    field: "name".into(),
                    reason: format!(
                        "outlet names are at most {MAX_OUTLET_NAME_LEN} characters, got {length}"
                    ),
                });
            }
            Ok(())
        }
        OutletsCommand::SetState { ref state, .. } => {
            state.parse::<apcpdu_core::PowerCommand>()?;
            Ok(())
        }
        _ => Ok(()),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(pdu: &Pdu, args: OutletsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let format = global.output_format();

    match args.command {
        OutletsCommand::Count => {
            let count = pdu.total_outlets().await?;
            let out = output::render_single(
                format,
                &count,
                |c| format!("Outlets: {c}"),
                u32::to_string,
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        OutletsCommand::List => {
            let names = pdu.all_outlet_names().await?;
            let states = pdu.all_outlet_power_states().await?;
            let views = join_outlets(&names, &states);
            let out = output::render_list(format, &views, |v| OutletRow::from(v), |v| {
                format!("{}\t{}\t{}", v.outlet, v.name.as_deref().unwrap_or("-"), v.state)
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        OutletsCommand::Name(ref arg) => {
            let outlet = util::outlet_index(arg)?;
            let name = pdu.outlet_name(outlet).await?;
            let out = output::render_single(format, &name, String::clone, String::clone);
            output::print_output(&out, global.quiet);
            Ok(())
        }

        OutletsCommand::State(ref arg) => {
            let outlet = util::outlet_index(arg)?;
            let state = pdu.outlet_power_state(outlet).await?;
            let out = output::render_single(
                format,
                &state,
                |s| format!("Outlet {outlet}: {s}"),
                |s| s.code().to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        OutletsCommand::On(ref arg) => {
            let outlet = util::outlet_index(arg)?;
            if !util::confirm(
                &format!("Switch on outlet {outlet}?"),
                "outlets on",
                global.yes,
            )? {
                return Ok(());
            }
            pdu.set_power_state(outlet, true).await?;
            if !global.quiet {
                eprintln!("Outlet {outlet} switched on");
            }
            Ok(())
        }

        OutletsCommand::Off(ref arg) => {
            let outlet = util::outlet_index(arg)?;
            if !util::confirm(
                &format!("Switch off outlet {outlet}? Attached equipment loses power."),
                "outlets off",
                global.yes,
            )? {
                return Ok(());
            }
            pdu.set_power_state(outlet, false).await?;
            if !global.quiet {
                eprintln!("Outlet {outlet} switched off");
            }
            Ok(())
        }

        OutletsCommand::SetState {
            ref outlet,
            ref state,
        } => {
            let outlet = util::outlet_index(outlet)?;
            let command: apcpdu_core::PowerCommand = state.parse()?;
            if !util::confirm(
                &format!(
                    "Write power control code {} to outlet {outlet}?",
                    command.code()
                ),
                "outlets set-state",
                global.yes,
            )? {
                return Ok(());
            }
            pdu.set_power_state(outlet, command).await?;
            if !global.quiet {
                eprintln!(
                    "Outlet {outlet} set to {}",
                    PowerState::from_code(command.code())
                );
            }
            Ok(())
        }

        OutletsCommand::Rename {
            ref outlet,
            ref name,
        } => {
            let outlet = util::outlet_index(outlet)?;
            pdu.set_outlet_name(outlet, name).await?;
            if !global.quiet {
                eprintln!("Outlet {outlet} renamed to '{name}'");
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_keeps_state_only_outlets() {
        let names: OutletMap<String> = [(1_u32, "web01".to_owned()), (2, "db01".to_owned())]
            .into_iter()
            .collect();
        let states: OutletMap<PowerState> = [
            (1_u32, PowerState::ON),
            (2, PowerState::OFF),
            (3, PowerState::ON),
        ]
        .into_iter()
        .collect();

        let views = join_outlets(&names, &states);
        assert_eq!(views.len(), 3);
        assert_eq!(views[1].name.as_deref(), Some("db01"));
        assert_eq!(views[1].code, Some(2));
        assert_eq!(views[2].outlet, "3");
        assert!(views[2].name.is_none());
    }
}
