use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use cotacao::core::log::init_logging;

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

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Serve the latest quote over HTTP
    Serve,
    /// Fetch the quote from the service and write it to a file
    Report,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config_path = cli.config_path.as_deref();
    let result = match cli.command {
        Some(Commands::Setup) => cotacao::cli::setup::setup(),
        Some(Commands::Serve) => cotacao::run_command(cotacao::AppCommand::Serve, config_path).await,
        Some(Commands::Report) => {
            cotacao::run_command(cotacao::AppCommand::Report, config_path).await
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
