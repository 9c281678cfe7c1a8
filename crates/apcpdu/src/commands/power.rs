//! Phase load command handlers.

use owo_colors::OwoColorize;
use serde::Serialize;

use apcpdu_core::{LoadState, LoadThresholds, Pdu};

use crate::cli::{GlobalOpts, PowerArgs, PowerCommand};
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct PowerStatus {
    draw_amps: f64,
    thresholds: LoadThresholds,
    load_state: LoadState,
}

fn thresholds_detail(t: &LoadThresholds) -> String {
    [
        format!("Low:           {:.1} A", t.low),
        format!("Near overload: {:.1} A", t.near_overload),
        format!("Overload:      {:.1} A", t.overload),
    ]
    .join("\n")
}

fn paint_state(state: LoadState, color: bool) -> String {
    let label = state.to_string();
    if !color {
        return label;
    }
    match state {
        LoadState::Normal => label.green().to_string(),
        LoadState::Low => label.cyan().to_string(),
        LoadState::NearOverload => label.yellow().to_string(),
        LoadState::Overload => label.red().bold().to_string(),
    }
}

fn status_detail(s: &PowerStatus, color: bool) -> String {
    [
        format!("Draw:          {:.1} A", s.draw_amps),
        thresholds_detail(&s.thresholds),
        format!("Load state:    {}", paint_state(s.load_state, color)),
    ]
    .join("\n")
}

pub async fn handle(pdu: &Pdu, args: PowerArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let format = global.output_format();
    let color = output::should_color(global.color_mode());

    let out = match args.command {
        PowerCommand::Draw => {
            let draw = pdu.power_draw().await?;
            output::render_single(format, &draw, |a| format!("{a:.1} A"), f64::to_string)
        }

        PowerCommand::Thresholds => {
            let thresholds = pdu.load_thresholds().await?;
            output::render_single(format, &thresholds, thresholds_detail, |t| {
                format!("{}\n{}\n{}", t.low, t.near_overload, t.overload)
            })
        }

        PowerCommand::State => {
            let state = pdu.load_state().await?;
            output::render_single(
                format,
                &state,
                |s| paint_state(*s, color),
                LoadState::to_string,
            )
        }

        PowerCommand::Status => {
            let status = PowerStatus {
                draw_amps: pdu.power_draw().await?,
                thresholds: pdu.load_thresholds().await?,
                load_state: pdu.load_state().await?,
            };
            output::render_single(
                format,
                &status,
                |s| status_detail(s, color),
                |s| format!("{}\t{}", s.draw_amps, s.load_state),
            )
        }
    };

    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncolored_state_is_kebab_case() {
        assert_eq!(paint_state(LoadState::NearOverload, false), "near-overload");
    }

    #[test]
    fn colored_state_carries_escape_codes() {
        let painted = paint_state(LoadState::Overload, true);
        assert!(painted.contains("\u{1b}["));
        assert!(painted.contains("overload"));
    }

    #[test]
    fn status_lists_every_figure() {
        let status = PowerStatus {
            draw_amps: 12.5,
            thresholds: LoadThresholds {
                low: 0.0,
                near_overload: 13.0,
                overload: 16.0,
            },
            load_state: LoadState::Normal,
        };
        let detail = status_detail(&status, false);
        assert!(detail.contains("12.5 A"));
        assert!(detail.contains("16.0 A"));
        assert!(detail.ends_with("normal"));
    }
}
