//! brisk CLI
//!
//! Inspects the resolved configuration and checks that the application
//! context can be built.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

use brisk_app::{AppContext, Config};

/// Configuration and connectivity checks for a brisk service.
#[derive(Parser)]
#[command(name = "brisk")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file (defaults apply when omitted).
    #[arg(short, long, env = "BRISK_CONFIG")]
    config: Option<PathBuf>,

    /// Log at debug level regardless of the configuration.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resolved configuration.
    Check,

    /// Build the application context and run a round-trip query.
    Ping,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if cli.verbose {
        config.log.level = "debug".to_string();
    }

    match cli.command {
        Commands::Check => {
            print!("{}", toml::to_string_pretty(&config)?);
            println!("# environment: {}", config.environment());
        }

        Commands::Ping => {
            let ctx = AppContext::init(config).await?;
            ctx.logger().install_global()?;

            info!("Pinging {}...", ctx.config().database.url);
            ctx.ping().await?;
            info!("Database reachable.");
        }
    }

    Ok(())
}
