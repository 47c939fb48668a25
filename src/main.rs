use anyhow::Result;
use bankcap::core::log::init_logging;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for bankcap::AppCommand {
    fn from(cmd: Commands) -> bankcap::AppCommand {
        match cmd {
            Commands::Run => bankcap::AppCommand::Run,
            Commands::Report => bankcap::AppCommand::Report,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full extract-transform-load pipeline and the reports
    Run,
    /// Re-run the reporting queries against the existing database
    Report,
    /// Create default configuration
    Setup,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => bankcap::cli::setup::setup(),
        Some(cmd) => bankcap::run_command(cmd.into(), cli.config_path.as_deref()).await,
        // The tool is the pipeline: no subcommand runs the whole thing.
        None => bankcap::run_command(bankcap::AppCommand::Run, cli.config_path.as_deref()).await,
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
