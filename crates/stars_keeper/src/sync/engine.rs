//! Pipeline coordinator: one fetch task and one persist task joined by a
//! single-slot queue.
//!
//! The fetch stage walks the starred listing and hands items over one at a
//! time; the persist stage upserts each item as it arrives. Whichever stage
//! fails first cancels the other, and the run reports that first error.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use stars_keeper::github::GitHubClient;
//! use stars_keeper::sync::{StarSync, SyncOptions};
//!
//! let client = Arc::new(GitHubClient::new(&token));
//! let db = Arc::new(stars_keeper::connect_and_migrate(&url).await?);
//! let result = StarSync::new(client, db, SyncOptions::default()).run().await?;
//! println!("Saved {} stars", result.stars_saved);
//! ```

mod fetch;
mod persist;

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;

use super::error::{Result, Stage, StageError, SyncError};
use super::progress::ProgressCallback;
use super::types::{HANDOFF_CAPACITY, PipelineState, SyncOptions, SyncResult};
use crate::source::StarSource;

use fetch::{FetchCounts, run_fetch};
use persist::{PersistCounts, run_persist};

/// What a finished stage produced.
enum StageOutput {
    Fetched(FetchCounts),
    Persisted(PersistCounts),
}

type StageResult = std::result::Result<StageOutput, (Stage, StageError)>;

/// Syncs the authenticated user's stars into the local store.
pub struct StarSync {
    source: Arc<dyn StarSource>,
    db: Arc<DatabaseConnection>,
    options: SyncOptions,
    state: PipelineState,
    shutdown: Option<CancellationToken>,
    on_progress: Option<Arc<ProgressCallback>>,
}

impl StarSync {
    pub fn new(
        source: Arc<dyn StarSource>,
        db: Arc<DatabaseConnection>,
        options: SyncOptions,
    ) -> Self {
        Self {
            source,
            db,
            options,
            state: PipelineState::Idle,
            shutdown: None,
            on_progress: None,
        }
    }

    /// Cancel the run when `token` fires.
    ///
    /// The run observes a child token, so failures inside the pipeline never
    /// cancel `token` itself.
    pub fn with_shutdown(mut self, token: CancellationToken) -> Self {
        self.shutdown = Some(token);
        self
    }

    /// Report progress through `callback`.
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.on_progress = Some(Arc::new(callback));
        self
    }

    /// Current pipeline state.
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Run the sync to completion.
    ///
    /// Succeeds only if both stages finish without error. A failed run can be
    /// invoked again; writes are idempotent.
    ///
    /// # Errors
    ///
    /// - [`SyncError::Failed`] with the first stage error observed
    /// - [`SyncError::Cancelled`] if the shutdown token stopped a stage early
    /// - [`SyncError::TaskPanicked`] if a stage panicked
    #[tracing::instrument(
        skip_all,
        fields(
            page_size = self.options.effective_page_size(),
            fetch_readme = self.options.fetch_readme,
            identity_scheme = %self.options.identity_scheme,
        )
    )]
    pub async fn run(&mut self) -> Result<SyncResult> {
        self.state = PipelineState::Running;
        let outcome = self.run_pipeline().await;

        self.state = match &outcome {
            Ok(result) => {
                tracing::info!(
                    fetched = result.fetched,
                    stars = result.stars_saved,
                    repositories = result.repositories_saved,
                    "Sync succeeded"
                );
                PipelineState::Succeeded
            }
            Err(e) => {
                tracing::warn!(error = %e, "Sync failed");
                PipelineState::Failed
            }
        };
        outcome
    }

    async fn run_pipeline(&self) -> Result<SyncResult> {
        let cancel = match &self.shutdown {
            Some(token) => token.child_token(),
            None => CancellationToken::new(),
        };
        let (tx, rx) = mpsc::channel(HANDOFF_CAPACITY);
        let mut tasks: JoinSet<StageResult> = JoinSet::new();

        {
            let source = Arc::clone(&self.source);
            let options = self.options.clone();
            let cancel = cancel.clone();
            let on_progress = self.on_progress.clone();
            tasks.spawn(async move {
                let result = run_fetch(source, options, tx, cancel.clone(), on_progress).await;
                if result.is_err() {
                    cancel.cancel();
                }
                result
                    .map(StageOutput::Fetched)
                    .map_err(|e| (Stage::Fetch, e))
            });
        }

        {
            let db = Arc::clone(&self.db);
            let identity_scheme = self.options.identity_scheme;
            let cancel = cancel.clone();
            let on_progress = self.on_progress.clone();
            tasks.spawn(async move {
                let result = run_persist(db, identity_scheme, rx, cancel.clone(), on_progress).await;
                if result.is_err() {
                    cancel.cancel();
                }
                result
                    .map(StageOutput::Persisted)
                    .map_err(|e| (Stage::Persist, e))
            });
        }

        let mut result = SyncResult::default();
        let mut first_error: Option<SyncError> = None;
        let mut stopped_early = false;

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(StageOutput::Fetched(counts))) => {
                    result.fetched = counts.handed_over;
                    stopped_early |= counts.cancelled;
                }
                Ok(Ok(StageOutput::Persisted(counts))) => {
                    result.stars_saved = counts.stars;
                    result.repositories_saved = counts.repositories;
                    stopped_early |= counts.cancelled;
                }
                Ok(Err((stage, source))) => {
                    cancel.cancel();
                    tracing::debug!(%stage, error = %source, "Stage failed, cancelling pipeline");
                    first_error.get_or_insert(SyncError::Failed { stage, source });
                }
                Err(e) => {
                    cancel.cancel();
                    let message = join_error_message(e);
                    tracing::error!(%message, "Sync task failed");
                    first_error.get_or_insert(SyncError::TaskPanicked { message });
                }
            }
        }

        if let Some(err) = first_error {
            return Err(err);
        }
        // A shutdown that lands after both stages drained does not undo the run.
        if stopped_early {
            return Err(SyncError::Cancelled);
        }
        Ok(result)
    }
}

fn join_error_message(e: JoinError) -> String {
    if e.is_panic() {
        let payload = e.into_panic();
        if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        }
    } else if e.is_cancelled() {
        "Task was cancelled".to_string()
    } else {
        format!("Task failed: {}", e)
    }
}
