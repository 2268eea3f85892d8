use anyhow::Result;
use clap::{Parser, Subcommand};
use log::{debug, error};
use std::path::PathBuf;
use std::time::Duration;

use streakkeeper_infrastructure::logging;
use streakkeeper_lib::application::services::ConfigService;
use streakkeeper_lib::presentation::bootstrap::build_services;
use streakkeeper_lib::presentation::commands::*;
use streakkeeper_lib::presentation::error::CommandError;

#[derive(Parser)]
#[command(name = "streakkeeper")]
#[command(about = "Daily check-in streaks, leaderboard and shared story on the Stacks ledger")]
#[command(version)]
struct Cli {
    /// Path to config file (defaults to the user config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank the configured participants by streak
    Leaderboard {
        /// Address whose row is marked as yours
        #[arg(short, long)]
        actor: Option<String>,

        /// Re-rank every N seconds until interrupted
        #[arg(long)]
        refresh_secs: Option<u64>,

        #[arg(long)]
        json: bool,
    },

    /// Show streak statistics and milestone progress for an address
    Stats {
        address: String,

        #[arg(long)]
        json: bool,
    },

    /// Statistics and leaderboard for a connected wallet
    Dashboard {
        #[arg(short, long)]
        actor: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Show the shared on-chain story and its contributors
    Story {
        #[arg(long)]
        json: bool,
    },

    /// Draft the next part of the story around a word
    Generate {
        #[arg(short, long)]
        word: String,

        /// Overrides the configured genre
        #[arg(short, long)]
        genre: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Relay check-in alerts for a chainhook payload file ("-" for stdin)
    Alert {
        #[arg(short, long)]
        payload: PathBuf,

        #[arg(long)]
        json: bool,
    },

    /// Print the explorer link for a transaction
    TxLink { tx_id: String },

    /// Inspect or change the configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write the configuration file
    Init,
    /// Persist a new log level
    SetLogLevel { level: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ConfigService::load(cli.config.as_deref())?;
    let level = if cli.verbose {
        "debug"
    } else {
        config.get_log_level().as_str()
    };
    logging::init_logger(&ConfigService::default_log_dir(), level)?;
    debug!("Using config {}", config.config_path().display());

    if let Err(e) = run(cli.command, &mut config).await {
        error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
    Ok(())
}

async fn run(command: Commands, config: &mut ConfigService) -> Result<(), CommandError> {
    if let Commands::Config { action } = &command {
        return match action {
            ConfigAction::Show => show_config(config),
            ConfigAction::Init => init_config(config),
            ConfigAction::SetLogLevel { level } => set_log_level(config, level),
        };
    }

    let services = build_services(config.config())?;

    match command {
        Commands::Leaderboard {
            actor,
            refresh_secs: Some(secs),
            json,
        } => watch_leaderboard(&services, actor.as_deref(), Duration::from_secs(secs), json).await,
        Commands::Leaderboard { actor, json, .. } => {
            show_leaderboard(&services, actor.as_deref(), json).await
        }
        Commands::Stats { address, json } => show_stats(&services, &address, json).await,
        Commands::Dashboard { actor, json } => {
            show_dashboard(&services, actor.as_deref(), json).await
        }
        Commands::Story { json } => show_story(&services, json).await,
        Commands::Generate { word, genre, json } => {
            generate_story_part(&services, &word, genre.as_deref(), json).await
        }
        Commands::Alert { payload, json } => relay_check_in_alert(&services, &payload, json).await,
        Commands::TxLink { tx_id } => show_tx_link(&services, &tx_id),
        Commands::Config { .. } => Ok(()),
    }
}
