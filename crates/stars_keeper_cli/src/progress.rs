//! Progress reporting for sync runs.
//!
//! Sync progress is written as structured `tracing` events, so it shows up
//! the same way on a terminal, in CI logs and when piped.

use stars_keeper::sync::{ProgressCallback, SyncProgress};

/// Logging reporter using tracing for structured output.
pub struct LoggingReporter;

impl LoggingReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(&self, event: SyncProgress) {
        match event {
            SyncProgress::FetchingStars { login, per_page } => {
                tracing::info!(login = %login, per_page, "Fetching starred repositories");
            }

            SyncProgress::FetchedPage {
                page,
                last_page,
                count,
                total_so_far,
            } => match last_page {
                Some(last_page) => {
                    tracing::info!(page, last_page, count, total_so_far, "Fetched page")
                }
                None => tracing::info!(page, count, total_so_far, "Fetched page"),
            },

            SyncProgress::FetchComplete { total } => {
                tracing::info!(total, "Fetch complete");
            }

            SyncProgress::Persisted {
                repository_id,
                full_name,
                saved_so_far,
            } => match full_name {
                Some(repo) => tracing::debug!(repo = %repo, saved_so_far, "Saved to database"),
                None => tracing::debug!(repository_id, saved_so_far, "Saved to database"),
            },

            SyncProgress::PersistComplete {
                stars,
                repositories,
            } => {
                tracing::info!(stars, repositories, "Persist complete");
            }

            _ => {}
        }
    }

    /// Convert to a ProgressCallback for the library.
    pub fn into_callback(self) -> ProgressCallback {
        Box::new(move |event| self.handle(event))
    }
}

impl Default for LoggingReporter {
    fn default() -> Self {
        Self::new()
    }
}
