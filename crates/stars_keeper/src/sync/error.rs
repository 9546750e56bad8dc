//! Sync pipeline error types.

use thiserror::Error;

use crate::github::GitHubError;
use crate::store::StoreError;

/// The pipeline stage an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetch,
    Persist,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fetch => write!(f, "fetch"),
            Self::Persist => write!(f, "persist"),
        }
    }
}

/// An error raised inside a single stage.
#[derive(Debug, Error)]
pub enum StageError {
    #[error(transparent)]
    GitHub(#[from] GitHubError),

    /// A starred item arrived without its repository.
    #[error("Starred item from {starred_at} has no repository")]
    MissingRepository { starred_at: String },

    #[error("Failed to save {kind} {id}: {source}")]
    Persist {
        kind: &'static str,
        id: String,
        #[source]
        source: StoreError,
    },
}

/// Errors returned by a sync run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The first stage error, which cancelled the rest of the run.
    #[error("{stage} stage failed: {source}")]
    Failed {
        stage: Stage,
        #[source]
        source: StageError,
    },

    /// The run was cancelled from outside before it finished.
    #[error("Sync cancelled")]
    Cancelled,

    #[error("Sync task panicked: {message}")]
    TaskPanicked { message: String },
}

impl SyncError {
    /// The stage that failed, if any.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Failed { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

/// Result type for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;
