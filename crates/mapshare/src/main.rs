mod cli;
mod commands;
mod config;
mod devices;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
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
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // No link needed
        Command::Config(ref args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "mapshare", &mut std::io::stdout());
            Ok(())
        }

        Command::Send(args) => {
            let coordinator = commands::connect(&cli.global).await?;
            let result = commands::send::handle(args, &coordinator, &cli.global).await;
            coordinator.shutdown().await;
            result
        }

        Command::Notify(args) => {
            let coordinator = commands::connect(&cli.global).await?;
            let result = commands::notify::handle(args, &coordinator, &cli.global).await;
            coordinator.shutdown().await;
            result
        }
    }
}
