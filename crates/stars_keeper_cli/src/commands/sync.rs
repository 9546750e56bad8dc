use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use console::Term;
use stars_keeper::github::GitHubClient;
use stars_keeper::sync::{StarSync, SyncError, SyncOptions};
use stars_keeper::{IdentityScheme, connect_and_migrate, sqlite_url};

use crate::SyncArgs;
use crate::config::Config;
use crate::progress::LoggingReporter;
use crate::shutdown::shutdown_token;

/// Merge CLI flags over the configured sync options.
fn resolve_options(args: &SyncArgs, config: &Config) -> SyncOptions {
    let mut options = config.sync_options();
    if let Some(page_size) = args.page_size {
        options.page_size = page_size;
    }
    if args.no_readme {
        options.fetch_readme = false;
    }
    if args.legacy_ids {
        options.identity_scheme = IdentityScheme::Legacy;
    }
    options
}

pub(crate) async fn handle_sync(
    args: SyncArgs,
    config: &Config,
    database_path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let token = config.github_token().ok_or(
        "No GitHub token configured. Set STARS_KEEPER_GITHUB__TOKEN or GITHUB_TOKEN, \
         or add [github] token to the config file.",
    )?;
    let client = match config.github.api_url.as_deref() {
        Some(api_url) => GitHubClient::with_api_url(&token, api_url),
        None => GitHubClient::new(&token),
    };

    let options = resolve_options(&args, config);
    let db = Arc::new(connect_and_migrate(&sqlite_url(database_path)).await?);
    tracing::info!(database = %database_path.display(), "Opened database");

    let mut sync = StarSync::new(Arc::new(client), Arc::clone(&db), options)
        .with_shutdown(shutdown_token())
        .with_progress(LoggingReporter::new().into_callback());

    let started = Instant::now();
    let outcome = sync.run().await;
    let elapsed = started.elapsed();

    let is_tty = Term::stdout().is_term();
    match outcome {
        Ok(result) => {
            if is_tty {
                println!(
                    "\nSynced {} stars ({} repositories) in {:.1}s",
                    result.stars_saved,
                    result.repositories_saved,
                    elapsed.as_secs_f64()
                );
            } else {
                tracing::info!(
                    fetched = result.fetched,
                    stars = result.stars_saved,
                    repositories = result.repositories_saved,
                    elapsed_ms = elapsed.as_millis(),
                    "Sync complete"
                );
            }
            Ok(())
        }
        Err(SyncError::Cancelled) => {
            if is_tty {
                eprintln!("Sync cancelled. Rows saved so far are kept; run sync again to finish.");
            }
            Err(SyncError::Cancelled.into())
        }
        Err(e) => Err(e.into()),
    }
}
