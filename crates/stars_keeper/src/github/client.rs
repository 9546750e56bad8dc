//! GitHub API client for starred repositories.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, USER_AGENT};
use reqwest::{Response, StatusCode};
use serde::Deserialize;

use super::error::GitHubError;
use super::types::{StarredItem, StarredPage};
use crate::source::StarSource;

/// Base URL of the public GitHub REST API.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Star listings with `starred_at` timestamps.
const STAR_MEDIA_TYPE: &str = "application/vnd.github.star+json";
/// Raw file contents.
const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw+json";
const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";

const CLIENT_USER_AGENT: &str = concat!("stars-keeper/", env!("CARGO_PKG_VERSION"));

/// Pagination information extracted from GitHub's Link header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkPagination {
    /// The last page number (from rel="last" link).
    pub last_page: Option<u32>,
    /// The next page number (from rel="next" link).
    pub next_page: Option<u32>,
}

/// Parse the Link header to extract pagination info.
///
/// GitHub Link headers look like:
/// `<https://api.github.com/user/1/starred?per_page=50&page=2>; rel="next", <...&page=3>; rel="last"`
pub fn parse_link_header(link_header: &str) -> LinkPagination {
    let mut info = LinkPagination::default();

    for part in link_header.split(',') {
        let mut url = None;
        let mut rel = None;

        for segment in part.trim().split(';') {
            let segment = segment.trim();
            if let Some(inner) = segment.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
                url = Some(inner);
            } else if let Some(rel_value) = segment.strip_prefix("rel=") {
                rel = Some(rel_value.trim_matches('"'));
            }
        }

        if let (Some(url), Some(rel_type)) = (url, rel)
            && let Some(page_num) = extract_page_from_url(url)
        {
            match rel_type {
                "last" => info.last_page = Some(page_num),
                "next" => info.next_page = Some(page_num),
                _ => {}
            }
        }
    }

    info
}

/// Extract the page parameter from a URL.
fn extract_page_from_url(url: &str) -> Option<u32> {
    let (_, query) = url.split_once('?')?;

    query
        .split('&')
        .find_map(|param| param.strip_prefix("page="))
        .and_then(|value| value.parse().ok())
}

fn header_i64(headers: &HeaderMap, name: &str) -> Option<i64> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<i64>().ok())
}

/// Read the rate limit reset time from response headers.
///
/// Primary limits carry `x-ratelimit-reset` (epoch seconds); secondary limits
/// only send `retry-after` (seconds from now).
fn rate_limit_reset(headers: &HeaderMap) -> DateTime<Utc> {
    header_i64(headers, "x-ratelimit-reset")
        .and_then(|epoch| DateTime::from_timestamp(epoch, 0))
        .or_else(|| {
            header_i64(headers, "retry-after")
                .map(|secs| Utc::now() + chrono::Duration::seconds(secs))
        })
        .unwrap_or_else(Utc::now)
}

fn rate_limit_exhausted(headers: &HeaderMap) -> bool {
    headers
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim() == "0")
        || headers.contains_key("retry-after")
}

/// Map a non-success response to a [`GitHubError`].
fn error_for_status(status: StatusCode, headers: &HeaderMap, route: &str) -> GitHubError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => GitHubError::RateLimited {
            reset_at: rate_limit_reset(headers),
        },
        StatusCode::FORBIDDEN if rate_limit_exhausted(headers) => GitHubError::RateLimited {
            reset_at: rate_limit_reset(headers),
        },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GitHubError::AuthRequired,
        StatusCode::NOT_FOUND => GitHubError::NotFound(route.to_string()),
        _ => GitHubError::UnexpectedStatus {
            status: status.as_u16(),
            route: route.to_string(),
        },
    }
}

#[derive(Deserialize)]
struct AuthenticatedUser {
    login: String,
}

/// GitHub client implementing [`StarSource`].
#[derive(Clone)]
pub struct GitHubClient {
    /// Shared HTTP client (one connection pool for every request).
    http_client: reqwest::Client,
    token: Arc<String>,
    api_url: Arc<String>,
}

impl GitHubClient {
    /// Create a client for the public GitHub API.
    pub fn new(token: &str) -> Self {
        Self::with_api_url(token, DEFAULT_API_URL)
    }

    /// Create a client against a different API root (GitHub Enterprise, test servers).
    pub fn with_api_url(token: &str, api_url: &str) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            token: Arc::new(token.to_string()),
            api_url: Arc::new(api_url.trim_end_matches('/').to_string()),
        }
    }

    /// The API root this client talks to.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Send an authenticated GET and return the response if it succeeded.
    async fn get(&self, route: &str, accept: &str) -> Result<Response, GitHubError> {
        let url = format!("{}{}", self.api_url, route);
        tracing::debug!(%route, "GitHub request");

        let response = self
            .http_client
            .get(&url)
            .header(ACCEPT, accept)
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .header(AUTHORIZATION, format!("Bearer {}", self.token.as_str()))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(error_for_status(status, response.headers(), route))
        }
    }

    async fn get_json(
        &self,
        route: &str,
        accept: &str,
    ) -> Result<(serde_json::Value, HeaderMap), GitHubError> {
        let response = self.get(route, accept).await?;
        let headers = response.headers().clone();
        let bytes = response.bytes().await?;
        let value = serde_json::from_slice(&bytes).map_err(|source| GitHubError::Decode {
            route: route.to_string(),
            source,
        })?;
        Ok((value, headers))
    }
}

#[async_trait]
impl StarSource for GitHubClient {
    async fn authenticated_user(&self) -> Result<String, GitHubError> {
        let route = "/user";
        let (value, _) = self.get_json(route, JSON_MEDIA_TYPE).await?;
        let user = AuthenticatedUser::deserialize(value).map_err(|source| GitHubError::Decode {
            route: route.to_string(),
            source,
        })?;
        Ok(user.login)
    }

    async fn starred_page(
        &self,
        login: &str,
        page: u32,
        per_page: u32,
    ) -> Result<StarredPage, GitHubError> {
        let route = format!("/users/{login}/starred?per_page={per_page}&page={page}");
        let (value, headers) = self.get_json(&route, STAR_MEDIA_TYPE).await?;

        let decode = |source| GitHubError::Decode {
            route: route.clone(),
            source,
        };
        let raw_items: Vec<serde_json::Value> = serde_json::from_value(value).map_err(decode)?;
        let items = raw_items
            .into_iter()
            .map(StarredItem::from_value)
            .collect::<Result<Vec<_>, _>>()
            .map_err(decode)?;

        let links = headers
            .get("link")
            .and_then(|v| v.to_str().ok())
            .map(parse_link_header)
            .unwrap_or_default();

        Ok(StarredPage {
            items,
            next_page: links.next_page,
            last_page: links.last_page,
        })
    }

    async fn readme(&self, owner: &str, name: &str) -> Result<Option<String>, GitHubError> {
        let route = format!("/repos/{owner}/{name}/readme");
        match self.get(&route, RAW_MEDIA_TYPE).await {
            Ok(response) => Ok(Some(response.text().await?)),
            Err(GitHubError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
