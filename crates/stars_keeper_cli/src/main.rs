//! Stars Keeper CLI - keeps a local SQLite copy of your GitHub stars.

mod commands;
mod config;
mod progress;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stars-keeper")]
#[command(version)]
#[command(about = "Keep a local SQLite copy of your GitHub stars")]
#[command(
    long_about = "Stars Keeper fetches every repository starred by the authenticated GitHub \
user, along with its README, and upserts them into a local SQLite database. Running \
sync again overwrites existing rows in place."
)]
#[command(after_long_help = r#"EXAMPLES
    Sync your stars:
        $ stars-keeper sync

    Sync without fetching READMEs, 100 stars per request:
        $ stars-keeper sync --no-readme --page-size 100

    Delete the local database:
        $ stars-keeper purge --yes

    Generate shell completions:
        $ stars-keeper completions bash > ~/.local/share/bash-completion/completions/stars-keeper

CONFIGURATION
    Stars Keeper reads configuration from:
      1. ~/.config/stars-keeper/config.toml (or $XDG_CONFIG_HOME/stars-keeper/config.toml)
      2. ./stars-keeper.toml
      3. Environment variables (STARS_KEEPER_* prefix, e.g., STARS_KEEPER_GITHUB__TOKEN)
      4. .env file in current directory

ENVIRONMENT VARIABLES
    STARS_KEEPER_DATABASE__PATH        Database file (default: ~/.config/stars-keeper/main.db)
    STARS_KEEPER_GITHUB__TOKEN         GitHub personal access token
    GITHUB_TOKEN                       Used when no token is configured
    STARS_KEEPER_GITHUB__API_URL       GitHub API root (GitHub Enterprise)
    STARS_KEEPER_SYNC__PAGE_SIZE       Stars per request, 1-100 (default: 50)
    STARS_KEEPER_SYNC__FETCH_README    Fetch READMEs (default: true)
    STARS_KEEPER_SYNC__IDENTITY_SCHEME digest or legacy (default: digest)
"#)]
struct Cli {
    /// Database file (overrides config)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch your starred repositories into the local database
    Sync(SyncArgs),
    /// Delete the local database
    Purge {
        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

#[derive(Debug, Clone, clap::Args)]
struct SyncArgs {
    /// Stars requested per page, 1-100 (default from config or 50)
    #[arg(short, long)]
    page_size: Option<u32>,

    /// Don't fetch repository READMEs
    #[arg(long)]
    no_readme: bool,

    /// Derive star IDs the way earlier releases did
    #[arg(long)]
    legacy_ids: bool,
}

#[derive(Subcommand)]
enum MigrateAction {
    /// Apply all pending migrations
    Up,
    /// Show migration status
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new("stars_keeper=info,stars_keeper_cli=info"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Commands::Completions { shell } = &cli.command {
        commands::meta::handle_completions(*shell)?;
        return Ok(());
    }

    // Load configuration (config file -> env vars -> defaults)
    let config = config::Config::load().map_err(|e| format!("Invalid configuration: {e}"))?;

    let database_path = cli
        .database
        .clone()
        .or_else(|| config.database_path())
        .ok_or("Could not determine the config directory; set database.path or pass --database")?;

    if database_path.is_relative() {
        tracing::warn!(
            "Database path '{}' is relative - behavior depends on current directory. \
             Consider using an absolute path.",
            database_path.display()
        );
    }

    match cli.command {
        Commands::Sync(args) => {
            ensure_parent_dir(&database_path)?;
            commands::sync::handle_sync(args, &config, &database_path).await?;
        }
        Commands::Purge { yes } => {
            commands::purge::handle_purge(&database_path, yes)?;
        }
        Commands::Migrate { action } => {
            ensure_parent_dir(&database_path)?;
            commands::migrate::handle_migrate(action, &database_path).await?;
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}

/// Create the database's parent directory if it doesn't exist yet.
fn ensure_parent_dir(database_path: &std::path::Path) -> std::io::Result<()> {
    if let Some(parent) = database_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}
