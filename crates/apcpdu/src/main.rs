mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use apcpdu_core::Pdu;

use crate::cli::{Cli, Command};
use crate::error::{CliError, exit_code};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    let code = match run(cli).await {
        Ok(()) => exit_code::SUCCESS,
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            code
        }
    };
    std::process::exit(code);
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(mut cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a PDU session
        Command::Config(args) => commands::config_cmd::handle(args, &mut cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "apcpdu", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            commands::preflight(&cmd)?;
            let cfg = config::load_config()?;
            config::apply_display_defaults(&mut cli.global, &cfg.defaults)?;
            let device = config::build_device_config(&cli.global, &cfg)?;
            let pdu = Pdu::connect(&device).await?;

            tracing::debug!(command = ?cmd, host = %device.host, "dispatching command");
            let result = commands::dispatch(cmd, &pdu, &cli.global).await;
            if let Err(err) = pdu.close().await {
                tracing::debug!(error = %err, "session close failed");
            }
            result
        }
    }
}
