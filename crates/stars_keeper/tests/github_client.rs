//! GitHub client tests against a local fake API server.

#![cfg(feature = "migrate")]

mod common;

use std::collections::HashMap;
use std::sync::Arc;

use axum::Router;
use axum::extract::{Path, Query};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde_json::json;
use stars_keeper::github::{GitHubClient, GitHubError};
use stars_keeper::source::StarSource;
use stars_keeper::store::{repositories, stars};
use stars_keeper::sync::{StarSync, SyncOptions};

const TOKEN: &str = "test-token";

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some("Bearer test-token")
}

async fn user(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, "Bad credentials").into_response();
    }
    axum::Json(json!({ "login": "octocat", "id": 1 })).into_response()
}

async fn starred(
    Path(login): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if login == "limited" {
        return (
            StatusCode::FORBIDDEN,
            [
                ("x-ratelimit-remaining", "0"),
                ("x-ratelimit-reset", "1700000000"),
            ],
            "API rate limit exceeded",
        )
            .into_response();
    }
    if login == "throttled" {
        return (
            StatusCode::FORBIDDEN,
            [("retry-after", "30")],
            "You have exceeded a secondary rate limit",
        )
            .into_response();
    }
    let accept = headers.get(header::ACCEPT).and_then(|v| v.to_str().ok());
    if accept != Some("application/vnd.github.star+json") {
        return (StatusCode::BAD_REQUEST, "star media type required").into_response();
    }

    let page: u32 = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let per_page = params.get("per_page").map(String::as_str).unwrap_or("30");
    let repo = |id: i64, name: &str| {
        json!({
            "id": id,
            "name": name,
            "full_name": format!("octocat/{name}"),
            "owner": { "login": "octocat" },
            "description": format!("The {name} repository"),
            "topics": ["demo"]
        })
    };

    match page {
        1 => {
            let link = format!(
                "<http://localhost/users/{login}/starred?per_page={per_page}&page=2>; rel=\"next\", \
                 <http://localhost/users/{login}/starred?per_page={per_page}&page=2>; rel=\"last\""
            );
            let body = json!([
                { "starred_at": "2024-01-01T00:00:00Z", "repo": repo(1, "hello") },
                { "starred_at": "2024-01-02T00:00:00Z", "repo": repo(2, "missing") }
            ]);
            ([(header::LINK, link)], axum::Json(body)).into_response()
        }
        2 => {
            let link = format!(
                "<http://localhost/users/{login}/starred?per_page={per_page}&page=1>; rel=\"prev\""
            );
            let body = json!([
                { "starred_at": "2024-01-03T00:00:00Z", "repo": repo(3, "plain") }
            ]);
            ([(header::LINK, link)], axum::Json(body)).into_response()
        }
        _ => axum::Json(json!([])).into_response(),
    }
}

async fn readme(Path((_owner, name)): Path<(String, String)>) -> Response {
    match name.as_str() {
        "missing" => (StatusCode::NOT_FOUND, "Not Found").into_response(),
        "broken" => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        _ => format!("# {name}\n").into_response(),
    }
}

/// Serve the fake API on an ephemeral port and return its base URL.
async fn spawn_server() -> String {
    let app = Router::new()
        .route("/user", get(user))
        .route("/users/{login}/starred", get(starred))
        .route("/repos/{owner}/{name}/readme", get(readme));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn test_authenticated_user() {
    let url = spawn_server().await;

    let client = GitHubClient::with_api_url(TOKEN, &url);
    assert_eq!(client.authenticated_user().await.expect("user"), "octocat");

    let anonymous = GitHubClient::with_api_url("wrong", &url);
    let err = anonymous
        .authenticated_user()
        .await
        .expect_err("bad token should fail");
    assert!(matches!(err, GitHubError::AuthRequired));
}

#[tokio::test]
async fn test_starred_page_follows_link_header() {
    let url = spawn_server().await;
    let client = GitHubClient::with_api_url(TOKEN, &url);

    let first = client.starred_page("octocat", 1, 2).await.expect("page 1");
    assert_eq!(first.items.len(), 2);
    assert_eq!(first.next_page, Some(2));
    assert_eq!(first.last_page, Some(2));
    let repo = first.items[0].repository.as_ref().expect("repository");
    assert_eq!(repo.id, 1);
    assert_eq!(repo.owner_and_name(), Some(("octocat", "hello")));
    assert_eq!(first.items[0].body["starred_at"], "2024-01-01T00:00:00Z");

    let second = client.starred_page("octocat", 2, 2).await.expect("page 2");
    assert_eq!(second.items.len(), 1);
    assert_eq!(second.next_page, None);
    assert_eq!(second.last_page, None);
}

#[tokio::test]
async fn test_starred_page_rate_limited() {
    let url = spawn_server().await;
    let client = GitHubClient::with_api_url(TOKEN, &url);

    let err = client
        .starred_page("limited", 1, 50)
        .await
        .expect_err("rate limited");

    match err {
        GitHubError::RateLimited { reset_at } => assert_eq!(reset_at.timestamp(), 1_700_000_000),
        other => panic!("expected rate limit error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_starred_page_secondary_rate_limit() {
    let url = spawn_server().await;
    let client = GitHubClient::with_api_url(TOKEN, &url);

    let err = client
        .starred_page("throttled", 1, 50)
        .await
        .expect_err("secondary rate limit");

    assert!(err.is_rate_limited(), "expected rate limit error, got {err:?}");
}

#[tokio::test]
async fn test_readme_lookup() {
    let url = spawn_server().await;
    let client = GitHubClient::with_api_url(TOKEN, &url);

    assert_eq!(
        client.readme("octocat", "hello").await.expect("readme"),
        Some("# hello\n".to_string())
    );
    assert_eq!(
        client.readme("octocat", "missing").await.expect("404 is not an error"),
        None
    );
    let err = client
        .readme("octocat", "broken")
        .await
        .expect_err("500 should fail");
    assert!(matches!(
        err,
        GitHubError::UnexpectedStatus { status: 500, .. }
    ));
}

#[tokio::test]
async fn test_full_sync_against_fake_api() {
    let url = spawn_server().await;
    let db = common::setup_db().await;
    let client: Arc<dyn StarSource> = Arc::new(GitHubClient::with_api_url(TOKEN, &url));
    let options = SyncOptions {
        page_size: 2,
        ..Default::default()
    };

    let result = StarSync::new(client, Arc::clone(&db), options)
        .run()
        .await
        .expect("sync should succeed");

    assert_eq!(result.fetched, 3);
    assert_eq!(stars::count(&db).await.expect("count"), 3);

    let hello = repositories::find_by_id(&db, 1)
        .await
        .expect("query")
        .expect("stored");
    assert_eq!(hello.readme.as_deref(), Some("# hello\n"));
    assert_eq!(hello.description.as_deref(), Some("The hello repository"));

    let missing = repositories::find_by_id(&db, 2)
        .await
        .expect("query")
        .expect("stored");
    assert!(missing.readme.is_none());
}
