mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, GlobalOpts, LogFormat};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(&cli.global);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

/// Log lines are the report of a migration run, so the default is `info`.
fn filter_directive(global: &GlobalOpts) -> &'static str {
    if global.quiet {
        return "warn";
    }
    match global.verbose {
        0 => "info",
        1 => "info,lwmig=debug,lwmig_core=debug,lwmig_api=debug,lwmig_config=debug",
        2 => "info,lwmig=trace,lwmig_core=trace,lwmig_api=trace,lwmig_config=trace",
        _ => "trace",
    }
}

fn init_tracing(global: &GlobalOpts) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(global)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    match global.log_format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "lwmig", &mut std::io::stdout());
            Ok(())
        }
        Command::Config(args) => commands::config_cmd::handle(&args, &cli.global),
        Command::Inspect(args) => commands::inspect::handle(&args, &cli.global).await,
        Command::Migrate(args) => {
            tracing::debug!(?args, "dispatching migrate");
            commands::migrate::handle(&args, &cli.global).await
        }
    }
}
