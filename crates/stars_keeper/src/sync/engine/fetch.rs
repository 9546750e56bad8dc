//! Fetch stage: walk the starred listing and hand items to the persister.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::github::StarredItem;
use crate::source::StarSource;

use super::super::error::StageError;
use super::super::progress::{ProgressCallback, SyncProgress, emit};
use super::super::types::SyncOptions;

/// How the fetch stage ended.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(super) struct FetchCounts {
    pub(super) handed_over: usize,
    /// Set when cancellation stopped the stage before the last page.
    pub(super) cancelled: bool,
}

impl FetchCounts {
    fn cancelled(handed_over: usize) -> Self {
        Self {
            handed_over,
            cancelled: true,
        }
    }
}

/// Fetch every starred item and send it down `tx`.
///
/// Cancellation, or the persist stage going away, ends the stage early
/// without error. `tx` is dropped on every return path, which closes the
/// queue.
pub(super) async fn run_fetch(
    source: Arc<dyn StarSource>,
    options: SyncOptions,
    tx: mpsc::Sender<StarredItem>,
    cancel: CancellationToken,
    on_progress: Option<Arc<ProgressCallback>>,
) -> Result<FetchCounts, StageError> {
    let on_progress = on_progress.as_deref();

    let login = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Ok(FetchCounts::cancelled(0)),
        login = source.authenticated_user() => login?,
    };

    let per_page = options.effective_page_size();
    tracing::debug!(%login, per_page, "Fetching starred repositories");
    emit(
        on_progress,
        SyncProgress::FetchingStars {
            login: login.clone(),
            per_page,
        },
    );

    let mut page = 1u32;
    let mut total = 0usize;

    loop {
        if cancel.is_cancelled() {
            tracing::debug!(page, "Fetch cancelled before page request");
            return Ok(FetchCounts::cancelled(total));
        }

        let starred = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(FetchCounts::cancelled(total)),
            starred = source.starred_page(&login, page, per_page) => starred?,
        };

        emit(
            on_progress,
            SyncProgress::FetchedPage {
                page,
                last_page: starred.last_page,
                count: starred.items.len(),
                total_so_far: total + starred.items.len(),
            },
        );

        for mut item in starred.items {
            if options.fetch_readme {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Ok(FetchCounts::cancelled(total)),
                    enriched = attach_readme(source.as_ref(), &mut item) => enriched?,
                }
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::debug!(page, "Fetch cancelled during hand-off");
                    return Ok(FetchCounts::cancelled(total));
                }
                sent = tx.send(item) => {
                    if sent.is_err() {
                        // The persist stage reports why it stopped.
                        tracing::debug!(page, "Persist stage closed the queue");
                        return Ok(FetchCounts {
                            handed_over: total,
                            cancelled: false,
                        });
                    }
                }
            }
            total += 1;
        }

        match starred.next_page {
            Some(next) if next > page => page = next,
            _ => break,
        }
    }

    tracing::debug!(total, "Fetched all starred repositories");
    emit(on_progress, SyncProgress::FetchComplete { total });
    Ok(FetchCounts {
        handed_over: total,
        cancelled: false,
    })
}

/// Attach the repository README to `item`. A missing README leaves it unset.
async fn attach_readme(source: &dyn StarSource, item: &mut StarredItem) -> Result<(), StageError> {
    let Some(repository) = item.repository.as_mut() else {
        return Ok(());
    };
    let Some((owner, name)) = repository.owner_and_name() else {
        return Ok(());
    };

    let readme = source.readme(owner, name).await?;
    if readme.is_none() {
        tracing::debug!(repository_id = repository.id, "Repository has no README");
    }
    repository.readme = readme;
    Ok(())
}
