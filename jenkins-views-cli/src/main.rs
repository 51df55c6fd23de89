use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "jviews", about = "Manage Jenkins views")]
#[command(version, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Read configuration from this file instead of the user/project files
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Jenkins URL (overrides config and JENKINS_URL)
    #[arg(long, global = true)]
    url: Option<String>,

    /// Jenkins user (overrides config and JENKINS_USER)
    #[arg(long, global = true)]
    user: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Views(commands::views::ViewCommands),
    /// Manage the stored API token
    Auth(commands::auth::AuthArgs),
    /// Manage configuration
    Config(commands::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let default = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &cli.config {
        Some(path) => config::ConfigLoader::load_file(path)?,
        None => config::ConfigLoader::load()?,
    };
    if let Some(url) = cli.url {
        config.server.url = url;
    }
    if let Some(user) = cli.user {
        config.server.username = Some(user);
    }

    match cli.command {
        Commands::Views(command) => {
            let client = commands::view_client(&config.server)?;
            commands::views::run(&client, command).await
        }
        Commands::Auth(args) => commands::auth::run(args, &config.server).map(|_| ExitCode::SUCCESS),
        Commands::Config(args) => commands::config::run(args, &config).map(|_| ExitCode::SUCCESS),
    }
}
