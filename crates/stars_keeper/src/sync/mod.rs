//! Star sync pipeline.
//!
//! # Module Structure
//!
//! - [`types`] - Core types: `SyncOptions`, `SyncResult`, `PipelineState`, constants
//! - [`error`] - `SyncError` and the per-stage errors it wraps
//! - [`progress`] - Progress reporting: `SyncProgress`, `ProgressCallback`, `emit()`
//! - [`engine`] - The coordinator, `StarSync`, and its fetch and persist stages
//!
//! # Example
//!
//! ```ignore
//! use stars_keeper::sync::{StarSync, SyncOptions, SyncProgress};
//!
//! let mut sync = StarSync::new(client, db, SyncOptions::default())
//!     .with_shutdown(token)
//!     .with_progress(Box::new(|event| println!("{event:?}")));
//! let result = sync.run().await?;
//! ```

pub mod engine;
mod error;
mod progress;
mod types;

pub use engine::StarSync;
pub use error::{Result, Stage, StageError, SyncError};
pub use progress::{ProgressCallback, SyncProgress, emit};
pub use types::{
    DEFAULT_PAGE_SIZE, HANDOFF_CAPACITY, MAX_PAGE_SIZE, PipelineState, SyncOptions, SyncResult,
};
