mod commands;
mod utils;

use clap::{CommandFactory, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "doproxy")]
#[command(version)]
#[command(about = "Manage DigitalOcean droplets behind an HAProxy load balancer", long_about = None)]
struct Cli {
    /// Configuration file (default: $DOPROXY_CONFIG, ./doproxy.yml, ~/.config/doproxy/doproxy.yml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print backend droplets in the inventory file
    Print,
    /// Create a new backend droplet and reload
    Create,
    /// Create a new backend droplet from a snapshot of the master and reload
    Clone,
    /// Delete a droplet and reload
    Delete {
        /// Line number of the droplet in the inventory (0-based)
        #[arg(allow_negative_numbers = true)]
        ordinal: Option<i64>,
    },
    /// Generate HAProxy config and reload HAProxy
    Reload,
    /// Generate HAProxy config based on inventory
    Generate,
}

const DEFAULT_LOG_FILTER: &str = "warn,doproxy=info,doproxy_core=info,doproxy_cloud_digitalocean=info";

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    init_logging();

    if let Err(e) = run(command, cli.config).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(command: Commands, config: Option<PathBuf>) -> anyhow::Result<()> {
    let config = config.as_deref();

    match command {
        Commands::Print => commands::print::handle(config).await?,
        Commands::Create => commands::create::handle(config).await?,
        Commands::Clone => commands::clone::handle(config).await?,
        Commands::Delete { ordinal } => commands::delete::handle(config, ordinal).await?,
        Commands::Reload => commands::reload::handle(config).await?,
        Commands::Generate => commands::generate::handle(config).await?,
    }

    Ok(())
}
