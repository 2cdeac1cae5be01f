mod auth;
mod output;
mod upload;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use auth::AuthCommands;
use output::Output;
use upload::UploadCommands;

#[derive(Debug, Parser)]
#[command(name = "dkimdb")]
#[command(about = "Feed DKIM domain/selector pairs into the DKIM archive")]
struct Cli {
    /// Print run log records as JSON lines instead of `[HH:MM:SS] message`
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Submit domain/selector pairs to the archive
    Upload {
        #[command(subcommand)]
        command: UploadCommands,
    },
    /// Inspect or end the archive session
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
}

fn init_tracing(config: &dkimdb_core::AppConfig) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        // The run log is already printed on stdout; keep its tracing mirror
        // off stderr unless RUST_LOG asks for it.
        Err(_) => EnvFilter::try_new(&config.log_level)?
            .add_directive("dkimdb::run_log=warn".parse()?),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = dkimdb_core::load_app_config()?;
    init_tracing(&config)?;
    tracing::debug!(env = %config.env, base_url = %config.base_url, "configuration loaded");

    let output = Output::new(cli.json);
    match cli.command {
        Commands::Upload { command } => upload::run_upload(&config, command, output).await,
        Commands::Auth { command } => auth::run_auth(&config, command, output).await,
    }
}
