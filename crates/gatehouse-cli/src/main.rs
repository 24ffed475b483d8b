mod cmd;
mod output;

use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "gatehouse",
    about = "Login server with accounts and signed session cookies",
    version,
    propagate_version = true
)]
struct Cli {
    /// YAML config file (missing file = built-in defaults)
    #[arg(
        long,
        global = true,
        env = "GATEHOUSE_CONFIG",
        default_value = "gatehouse.yaml"
    )]
    config: PathBuf,

    /// Log at debug level
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Address to listen on (overrides config and GATEHOUSE_BIND)
        #[arg(long)]
        bind: Option<SocketAddr>,

        /// Keep accounts in memory instead of Postgres
        #[arg(long)]
        memory: bool,
    },

    /// Apply database migrations
    Migrate,

    /// Print a fresh random SESSION_KEY
    Keygen,

    /// Validate the configuration
    CheckConfig {
        /// Output as JSON
        #[arg(long, short = 'j')]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        match &cli.command {
            Commands::Serve { .. } | Commands::Migrate => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Serve { bind, memory } => cmd::serve::run(&cli.config, bind, memory),
        Commands::Migrate => cmd::migrate::run(&cli.config),
        Commands::Keygen => cmd::keygen::run(),
        Commands::CheckConfig { json } => cmd::check_config::run(&cli.config, json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
