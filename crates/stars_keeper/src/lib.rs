//! Stars Keeper - keeps a local SQLite copy of a GitHub user's stars.
//!
//! A sync walks the authenticated user's starred repositories page by page,
//! optionally attaches each repository's README, and upserts one star row and
//! one repository row per item. Star rows are keyed by a deterministic hash of
//! repository ID and star time, so running a sync again overwrites rows in
//! place.
//!
//! # Features
//!
//! - `migrate` - Enables database migration support. When enabled, you can use
//!   [`connect_and_migrate`] to create the schema on connection.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use stars_keeper::{GitHubClient, StarSync, SyncOptions, connect_and_migrate, store};
//!
//! let db = Arc::new(connect_and_migrate("sqlite://main.db?mode=rwc").await?);
//! let client = Arc::new(GitHubClient::new(&token));
//!
//! StarSync::new(client, Arc::clone(&db), SyncOptions::default()).run().await?;
//! println!("{} stars", store::stars::count(&db).await?);
//! ```

pub mod db;
pub mod entity;
pub mod github;
pub mod identity;
pub mod source;
pub mod store;
pub mod sync;

#[cfg(feature = "migrate")]
pub mod migration;

pub use db::{connect, purge, sqlite_url};
#[cfg(feature = "migrate")]
pub use db::connect_and_migrate;
pub use entity::prelude::*;
pub use github::{GitHubClient, GitHubError};
pub use identity::{IdentityScheme, identity};
pub use source::StarSource;
pub use store::StoreError;
pub use sync::{PipelineState, StarSync, SyncError, SyncOptions, SyncProgress, SyncResult};
