mod commands;
mod error;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::commands::{CommandContext, Commands};
use crate::error::CliError;

#[derive(Parser)]
#[command(name = "onboard")]
#[command(version = env!("ONBOARD_VERSION"))]
#[command(about = "Complete, inspect, or reset user onboarding", long_about = None)]
struct Cli {
    /// JSON file backing the key-value store
    #[arg(
        long,
        global = true,
        env = "ONBOARD_STORE",
        default_value = "onboarding-store.json"
    )]
    store: PathBuf,

    /// Onboarding configuration file (TOML)
    #[arg(long, global = true, env = "ONBOARD_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let context = match CommandContext::load(cli.store, cli.config).await {
        Ok(context) => context,
        Err(e) => {
            print_error(&e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = cli.command.execute(&context).await {
        print_error(&e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_error(error: &CliError) {
    eprintln!("error: {error}");

    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        eprintln!("caused by: {cause}");
        source = std::error::Error::source(cause);
    }
}
