//! GitHub API error types.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur when talking to the GitHub API.
#[derive(Debug, Error)]
pub enum GitHubError {
    /// The request could not be sent or the response could not be read.
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Rate limit exceeded. Resets at {reset_at}")]
    RateLimited { reset_at: DateTime<Utc> },

    #[error("Authentication required")]
    AuthRequired,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unexpected HTTP status {status} for {route}")]
    UnexpectedStatus { status: u16, route: String },

    /// The response body was not the JSON shape we expected.
    #[error("Failed to decode response from {route}: {source}")]
    Decode {
        route: String,
        #[source]
        source: serde_json::Error,
    },
}

impl GitHubError {
    /// Check if this error indicates rate limiting.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }

    /// Check if this error is a 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_predicates() {
        let rate_limited = GitHubError::RateLimited {
            reset_at: Utc::now(),
        };
        assert!(rate_limited.is_rate_limited());
        assert!(!rate_limited.is_not_found());

        let not_found = GitHubError::NotFound("/repos/o/r/readme".to_string());
        assert!(not_found.is_not_found());
        assert!(!GitHubError::AuthRequired.is_rate_limited());
    }

    #[test]
    fn test_error_messages() {
        let err = GitHubError::UnexpectedStatus {
            status: 502,
            route: "/user".to_string(),
        };
        assert_eq!(err.to_string(), "Unexpected HTTP status 502 for /user");
        assert_eq!(
            GitHubError::AuthRequired.to_string(),
            "Authentication required"
        );
    }
}
