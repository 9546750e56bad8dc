//! Upstream resources as the sync pipeline sees them.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One starred repository, as returned with the star media type.
///
/// The typed fields are extracted for the pipeline; `body` keeps the whole
/// upstream resource so it can be stored verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct StarredItem {
    /// When the repository was starred.
    pub starred_at: DateTime<Utc>,
    /// The starred repository, if the upstream resource carried one.
    pub repository: Option<RepositoryResource>,
    /// The star resource exactly as received.
    pub body: serde_json::Value,
}

/// A repository resource nested in a star.
#[derive(Debug, Clone, PartialEq)]
pub struct RepositoryResource {
    /// GitHub repository ID.
    pub id: i64,
    /// Owner login.
    pub owner: Option<String>,
    /// Repository name.
    pub name: Option<String>,
    /// `owner/name`.
    pub full_name: Option<String>,
    /// Repository description.
    pub description: Option<String>,
    /// Repository topics.
    pub topics: Vec<String>,
    /// README contents, attached by the fetch stage.
    pub readme: Option<String>,
    /// The repository resource exactly as received.
    pub body: serde_json::Value,
}

impl RepositoryResource {
    /// Owner and name, when both are known.
    pub fn owner_and_name(&self) -> Option<(&str, &str)> {
        Some((self.owner.as_deref()?, self.name.as_deref()?))
    }
}

/// One page of starred repositories.
#[derive(Debug, Clone, Default)]
pub struct StarredPage {
    /// Items on this page, in upstream order.
    pub items: Vec<StarredItem>,
    /// The next page number, or `None` on the last page.
    pub next_page: Option<u32>,
    /// The last page number, when the server advertises one.
    pub last_page: Option<u32>,
}

#[derive(Deserialize)]
struct StarFields {
    starred_at: DateTime<Utc>,
    #[serde(default)]
    repo: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct RepositoryFields {
    id: i64,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    owner: Option<OwnerFields>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    topics: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct OwnerFields {
    login: String,
}

impl StarredItem {
    /// Extract a starred item from a raw star resource.
    pub fn from_value(body: serde_json::Value) -> Result<Self, serde_json::Error> {
        let fields = StarFields::deserialize(&body)?;
        let repository = match fields.repo {
            Some(repo) if !repo.is_null() => Some(RepositoryResource::from_value(repo)?),
            _ => None,
        };

        Ok(Self {
            starred_at: fields.starred_at,
            repository,
            body,
        })
    }
}

impl RepositoryResource {
    /// Extract a repository from a raw repository resource.
    pub fn from_value(body: serde_json::Value) -> Result<Self, serde_json::Error> {
        let fields = RepositoryFields::deserialize(&body)?;

        Ok(Self {
            id: fields.id,
            owner: fields.owner.map(|o| o.login),
            name: fields.name,
            full_name: fields.full_name,
            description: fields.description,
            topics: fields.topics.unwrap_or_default(),
            readme: None,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn star_json() -> serde_json::Value {
        json!({
            "starred_at": "2024-01-02T03:04:05Z",
            "repo": {
                "id": 1296269,
                "name": "Hello-World",
                "full_name": "octocat/Hello-World",
                "owner": { "login": "octocat", "id": 1 },
                "description": "This your first repo!",
                "topics": ["octocat", "api"],
                "stargazers_count": 80
            }
        })
    }

    #[test]
    fn test_from_value_extracts_fields() {
        let item = StarredItem::from_value(star_json()).expect("valid star");
        let repo = item.repository.as_ref().expect("repository present");

        assert_eq!(item.starred_at.to_rfc3339(), "2024-01-02T03:04:05+00:00");
        assert_eq!(repo.id, 1296269);
        assert_eq!(repo.owner_and_name(), Some(("octocat", "Hello-World")));
        assert_eq!(repo.full_name.as_deref(), Some("octocat/Hello-World"));
        assert_eq!(repo.topics, vec!["octocat", "api"]);
        assert!(repo.readme.is_none());
    }

    #[test]
    fn test_from_value_keeps_unknown_fields_in_body() {
        let item = StarredItem::from_value(star_json()).expect("valid star");
        assert_eq!(item.body, star_json());
        assert_eq!(
            item.repository.expect("repository").body["stargazers_count"],
            80
        );
    }

    #[test]
    fn test_from_value_without_repository() {
        let item = StarredItem::from_value(json!({
            "starred_at": "2024-01-02T03:04:05Z",
            "repo": null
        }))
        .expect("valid star");
        assert!(item.repository.is_none());
    }

    #[test]
    fn test_from_value_null_topics_and_missing_owner() {
        let item = StarredItem::from_value(json!({
            "starred_at": "2024-01-02T03:04:05Z",
            "repo": { "id": 5, "name": "lonely", "topics": null }
        }))
        .expect("valid star");
        let repo = item.repository.expect("repository");
        assert!(repo.topics.is_empty());
        assert_eq!(repo.owner_and_name(), None);
    }

    #[test]
    fn test_from_value_rejects_missing_timestamp() {
        let result = StarredItem::from_value(json!({ "repo": { "id": 1 } }));
        assert!(result.is_err());
    }
}
