//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DatabaseConnection};
use serde_json::json;
use stars_keeper::connect_and_migrate;
use stars_keeper::github::{GitHubError, StarredItem, StarredPage};
use stars_keeper::source::StarSource;

/// Maximum time any sync should take in tests.
/// If exceeded, there's likely a hang/deadlock.
pub const SYNC_TIMEOUT: Duration = Duration::from_secs(10);

/// An in-memory upstream serving a fixed list of pages.
#[derive(Default)]
pub struct FakeSource {
    pages: Vec<StarredPage>,
    fail_on_page: Option<u32>,
    page_delay: Option<Duration>,
    requested_pages: Mutex<Vec<u32>>,
}

impl FakeSource {
    pub fn new(pages: Vec<StarredPage>) -> Self {
        Self {
            pages,
            ..Default::default()
        }
    }

    /// Fail with an authentication error when `page` is requested.
    pub fn failing_on_page(mut self, page: u32) -> Self {
        self.fail_on_page = Some(page);
        self
    }

    /// Sleep before answering every page request.
    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = Some(delay);
        self
    }

    pub fn requested_pages(&self) -> Vec<u32> {
        self.requested_pages.lock().expect("lock").clone()
    }
}

#[async_trait]
impl StarSource for FakeSource {
    async fn authenticated_user(&self) -> Result<String, GitHubError> {
        Ok("octocat".to_string())
    }

    async fn starred_page(
        &self,
        _login: &str,
        page: u32,
        _per_page: u32,
    ) -> Result<StarredPage, GitHubError> {
        self.requested_pages.lock().expect("lock").push(page);
        if let Some(delay) = self.page_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_on_page == Some(page) {
            return Err(GitHubError::AuthRequired);
        }
        Ok(self
            .pages
            .get(page as usize - 1)
            .cloned()
            .unwrap_or_default())
    }

    async fn readme(&self, _owner: &str, name: &str) -> Result<Option<String>, GitHubError> {
        Ok(Some(format!("# {name}")))
    }
}

/// A starred item for repository `id` named `name`.
pub fn star(id: i64, name: &str, starred_at: &str) -> StarredItem {
    star_with_description(id, name, starred_at, None)
}

pub fn star_with_description(
    id: i64,
    name: &str,
    starred_at: &str,
    description: Option<&str>,
) -> StarredItem {
    StarredItem::from_value(json!({
        "starred_at": starred_at,
        "repo": {
            "id": id,
            "name": name,
            "full_name": format!("octocat/{name}"),
            "owner": { "login": "octocat" },
            "description": description,
            "topics": ["rust"]
        }
    }))
    .expect("valid star")
}

/// A starred item whose repository is missing.
pub fn orphan_star(starred_at: &str) -> StarredItem {
    StarredItem::from_value(json!({ "starred_at": starred_at, "repo": null }))
        .expect("valid star")
}

/// Split items into linked pages of `per_page` items.
pub fn paginate(items: Vec<StarredItem>, per_page: usize) -> Vec<StarredPage> {
    let chunks: Vec<Vec<StarredItem>> = items.chunks(per_page).map(<[_]>::to_vec).collect();
    let page_count = chunks.len() as u32;

    chunks
        .into_iter()
        .zip(1u32..)
        .map(|(items, page)| StarredPage {
            items,
            next_page: (page < page_count).then_some(page + 1),
            last_page: Some(page_count),
        })
        .collect()
}

/// Numbered stars for repositories `1..=count`, one minute apart.
pub fn numbered_stars(count: i64) -> Vec<StarredItem> {
    (1..=count)
        .map(|i| star(i, &format!("repo-{i}"), &format!("2024-01-01T00:{i:02}:00Z")))
        .collect()
}

/// Create an in-memory SQLite database with migrations applied.
pub async fn setup_db() -> Arc<DatabaseConnection> {
    let db = connect_and_migrate("sqlite::memory:")
        .await
        .expect("Failed to create test database");
    Arc::new(db)
}

/// Make every insert of repository `id` fail.
pub async fn reject_repository(db: &DatabaseConnection, id: i64) {
    db.execute_unprepared(&format!(
        "CREATE TRIGGER reject_repository_{id} BEFORE INSERT ON repositories \
         WHEN NEW.id = {id} BEGIN SELECT RAISE(ABORT, 'rejected'); END"
    ))
    .await
    .expect("create trigger");
}
