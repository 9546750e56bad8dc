//! Progress reporting for sync runs.
//!
//! Events are emitted from both pipeline stages, so callbacks must be
//! `Send + Sync` and cheap; the CLI turns them into log lines.

/// Progress events emitted during a sync run.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum SyncProgress {
    /// Starting to fetch stars for a user.
    FetchingStars {
        /// The authenticated user's login.
        login: String,
        /// Requested page size.
        per_page: u32,
    },

    /// Fetched a page of starred repositories.
    FetchedPage {
        /// Page number (1-indexed).
        page: u32,
        /// Last page number, if the upstream reported it.
        last_page: Option<u32>,
        /// Number of items on this page.
        count: usize,
        /// Running total of items fetched so far.
        total_so_far: usize,
    },

    /// The fetch stage reached the last page.
    FetchComplete {
        /// Total number of items fetched.
        total: usize,
    },

    /// A star and its repository were written.
    Persisted {
        /// Repository ID.
        repository_id: i64,
        /// `owner/name`, when known.
        full_name: Option<String>,
        /// Running total of stars saved.
        saved_so_far: usize,
    },

    /// The persist stage drained the queue.
    PersistComplete {
        /// Star rows written.
        stars: usize,
        /// Repository rows written.
        repositories: usize,
    },
}

/// Callback for progress updates during sync operations.
pub type ProgressCallback = Box<dyn Fn(SyncProgress) + Send + Sync>;

/// Emit a progress event if a callback is provided.
///
/// # Example
///
/// ```ignore
/// use stars_keeper::sync::{emit, SyncProgress, ProgressCallback};
///
/// fn report(on_progress: Option<&ProgressCallback>) {
///     emit(on_progress, SyncProgress::FetchComplete { total: 42 });
/// }
/// ```
#[inline]
pub fn emit(on_progress: Option<&ProgressCallback>, event: SyncProgress) {
    if let Some(cb) = on_progress {
        cb(event);
    }
}
