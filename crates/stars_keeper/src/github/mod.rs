//! GitHub API client for starred repositories.
//!
//! # Module Structure
//!
//! - [`error`] - Error types for GitHub API operations
//! - [`types`] - Starred items and pages as the pipeline consumes them
//! - [`client`] - HTTP client, Link header pagination and status mapping
//!
//! ```ignore
//! use stars_keeper::github::GitHubClient;
//! use stars_keeper::source::StarSource;
//!
//! let client = GitHubClient::new(&token);
//! let login = client.authenticated_user().await?;
//! let page = client.starred_page(&login, 1, 50).await?;
//! ```

mod client;
mod error;
mod types;

pub use client::{DEFAULT_API_URL, GitHubClient, LinkPagination, parse_link_header};
pub use error::GitHubError;
pub use types::{RepositoryResource, StarredItem, StarredPage};
