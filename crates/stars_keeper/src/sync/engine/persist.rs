//! Persist stage: drain the queue into the store.

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::entity::{repository, star};
use crate::github::StarredItem;
use crate::identity::{IdentityScheme, format_timestamp};
use crate::store::{self, StoreError};

use super::super::error::StageError;
use super::super::progress::{ProgressCallback, SyncProgress, emit};

/// Rows written by the persist stage.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(super) struct PersistCounts {
    pub(super) stars: usize,
    pub(super) repositories: usize,
    /// Set when cancellation stopped the stage before the queue closed.
    pub(super) cancelled: bool,
}

/// Receive items until the queue closes, upserting each one.
///
/// Every item is written as its repository first, then its star, each in its
/// own transaction. Cancellation stops the stage before the next write.
pub(super) async fn run_persist(
    db: Arc<DatabaseConnection>,
    identity_scheme: IdentityScheme,
    mut rx: mpsc::Receiver<StarredItem>,
    cancel: CancellationToken,
    on_progress: Option<Arc<ProgressCallback>>,
) -> Result<PersistCounts, StageError> {
    let on_progress = on_progress.as_deref();
    let mut counts = PersistCounts::default();

    loop {
        let item = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("Persist cancelled while waiting for items");
                counts.cancelled = true;
                break;
            }
            item = rx.recv() => match item {
                Some(item) => item,
                None => break,
            },
        };

        let (repository, star) = to_models(item, identity_scheme)?;
        let repository_id = repository.id;
        let full_name = repository.full_name.clone();

        if cancel.is_cancelled() {
            counts.cancelled = true;
            break;
        }
        store::repositories::upsert(&db, repository)
            .await
            .map_err(|source| StageError::Persist {
                kind: "repository",
                id: repository_id.to_string(),
                source,
            })?;
        counts.repositories += 1;

        if cancel.is_cancelled() {
            counts.cancelled = true;
            break;
        }
        let star_id = star.id.clone();
        store::stars::upsert(&db, star)
            .await
            .map_err(|source| StageError::Persist {
                kind: "star",
                id: star_id,
                source,
            })?;
        counts.stars += 1;

        emit(
            on_progress,
            SyncProgress::Persisted {
                repository_id,
                full_name,
                saved_so_far: counts.stars,
            },
        );
    }

    tracing::debug!(
        stars = counts.stars,
        repositories = counts.repositories,
        cancelled = counts.cancelled,
        "Persist stage finished"
    );
    if !counts.cancelled {
        emit(
            on_progress,
            SyncProgress::PersistComplete {
                stars: counts.stars,
                repositories: counts.repositories,
            },
        );
    }
    Ok(counts)
}

/// Split a starred item into the rows it is stored as.
pub(super) fn to_models(
    item: StarredItem,
    identity_scheme: IdentityScheme,
) -> Result<(repository::Model, star::Model), StageError> {
    let starred_at = format_timestamp(&item.starred_at);
    let Some(resource) = item.repository else {
        return Err(StageError::MissingRepository { starred_at });
    };

    let id = identity_scheme.identity(resource.id, &item.starred_at);
    let star_body = serde_json::to_string(&item.body).map_err(|source| StageError::Persist {
        kind: "star",
        id: id.clone(),
        source: StoreError::Serialize {
            kind: "star",
            source,
        },
    })?;
    let repository_body =
        serde_json::to_string(&resource.body).map_err(|source| StageError::Persist {
            kind: "repository",
            id: resource.id.to_string(),
            source: StoreError::Serialize {
                kind: "repository",
                source,
            },
        })?;

    let repository = repository::Model {
        id: resource.id,
        body: repository_body,
        description: resource.description,
        topics: serde_json::Value::from(resource.topics),
        full_name: resource.full_name,
        readme: resource.readme,
    };
    let star = star::Model {
        id,
        starred_at,
        repository_id: resource.id,
        body: star_body,
    };

    Ok((repository, star))
}
