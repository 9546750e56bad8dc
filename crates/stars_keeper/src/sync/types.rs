//! Sync options, results and constants.

use crate::identity::IdentityScheme;

/// Default number of starred repositories requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Largest page size the GitHub API accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Capacity of the queue between the fetch and persist stages.
///
/// With a capacity of one the fetcher can run at most one item ahead of the
/// persister.
pub const HANDOFF_CAPACITY: usize = 1;

/// Options for a sync run.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Starred repositories requested per page.
    pub page_size: u32,
    /// Whether to fetch each repository's README.
    pub fetch_readme: bool,
    /// How star identifiers are derived.
    pub identity_scheme: IdentityScheme,
}

impl SyncOptions {
    /// The page size actually requested, clamped to `1..=MAX_PAGE_SIZE`.
    pub fn effective_page_size(&self) -> u32 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            fetch_readme: true,
            identity_scheme: IdentityScheme::Digest,
        }
    }
}

/// Result of a completed sync run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncResult {
    /// Starred items received from the upstream.
    pub fetched: usize,
    /// Star rows written.
    pub stars_saved: usize,
    /// Repository rows written.
    pub repositories_saved: usize,
}

/// Lifecycle of a sync run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PipelineState {
    /// Not started yet.
    #[default]
    Idle,
    /// Both stages are running.
    Running,
    /// Both stages finished without error.
    Succeeded,
    /// A stage failed or the run was cancelled.
    Failed,
}
