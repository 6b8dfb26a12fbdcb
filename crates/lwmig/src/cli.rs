//! Clap derive structures for the `lwmig` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// lwmig -- move ABP LoRaWAN devices from Tektelic to The Things Stack
#[derive(Debug, Parser)]
#[command(
    name = "lwmig",
    version,
    about = "Migrate ABP LoRaWAN devices from Tektelic to The Things Stack",
    long_about = "Reads the device inventory of a Tektelic application and re-creates every\n\
        complete ABP device on The Things Stack: identity, network-server session\n\
        and application-server session. Session keys and DevAddr are carried over\n\
        so devices keep transmitting without a rejoin.",
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
    /// Config file (defaults to the platform config dir)
    #[arg(long, env = "LWMIG_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds (overrides config)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', global = true)]
    pub insecure: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log line format
    #[arg(
        long,
        env = "LWMIG_LOG_FORMAT",
        default_value = "text",
        global = true
    )]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per line
    Json,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Provision the application's ABP devices on The Things Stack
    #[command(alias = "run")]
    Migrate(MigrateArgs),

    /// List the source inventory and what each device is missing
    #[command(alias = "ls")]
    Inspect(InspectArgs),

    /// Show the effective configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migrate only this device EUI (repeatable; comma-separated in the env var)
    #[arg(
        long = "device",
        short = 'd',
        env = "LWMIG_DEVICES",
        value_delimiter = ',',
        value_name = "EUI"
    )]
    pub devices: Vec<String>,

    /// Devices provisioned at once
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    pub concurrency: Option<u16>,
}

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// List a customer's devices instead of the configured application's
    #[arg(long, value_name = "ID")]
    pub customer: Option<String>,

    /// Print the raw device records as JSON
    #[arg(long)]
    pub json: bool,

    /// With --json, print only the first device
    #[arg(long, requires = "json")]
    pub first: bool,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the merged configuration with tokens redacted
    Show,

    /// Print the config file path
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
