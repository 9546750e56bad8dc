//! The upstream the sync pipeline reads stars from.

use async_trait::async_trait;

use crate::github::{GitHubError, StarredPage};

/// An upstream that lists a user's starred repositories.
///
/// Implemented by [`GitHubClient`](crate::github::GitHubClient) and by
/// in-memory fakes in tests.
///
/// # Implementation Notes
///
/// Implementors should:
/// - Number pages from 1 and report `next_page` only when another page exists
/// - Return `Ok(None)` from [`readme`](StarSource::readme) when the repository
///   has no README, and an error for anything else that went wrong
#[async_trait]
pub trait StarSource: Send + Sync {
    /// Resolve the login of the authenticated user.
    async fn authenticated_user(&self) -> Result<String, GitHubError>;

    /// Fetch one page of the user's starred repositories.
    async fn starred_page(
        &self,
        login: &str,
        page: u32,
        per_page: u32,
    ) -> Result<StarredPage, GitHubError>;

    /// Fetch the README for a repository, if it has one.
    async fn readme(&self, owner: &str, name: &str) -> Result<Option<String>, GitHubError>;
}
