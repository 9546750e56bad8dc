//! Repository records.

use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, Set, TransactionTrait};

use crate::entity::repository::{ActiveModel, Column, Entity as Repository, Model};

use super::errors::Result;

/// Conflict handling for repository upserts: last write wins on every column.
pub(crate) fn upsert_on_conflict() -> OnConflict {
    OnConflict::column(Column::Id)
        .update_columns([
            Column::Body,
            Column::Description,
            Column::Topics,
            Column::FullName,
            Column::Readme,
        ])
        .to_owned()
}

/// Insert a repository, or overwrite the row with the same id.
///
/// Runs in its own transaction. No field-level merge happens: columns the
/// incoming record leaves empty are cleared.
pub async fn upsert(db: &DatabaseConnection, repository: Model) -> Result<()> {
    let model = ActiveModel {
        id: Set(repository.id),
        body: Set(repository.body),
        description: Set(repository.description),
        topics: Set(repository.topics),
        full_name: Set(repository.full_name),
        readme: Set(repository.readme),
    };

    let txn = db.begin().await?;
    Repository::insert(model)
        .on_conflict(upsert_on_conflict())
        .exec_without_returning(&txn)
        .await?;
    txn.commit().await?;

    Ok(())
}

/// Find a repository by its GitHub ID.
pub async fn find_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<Model>> {
    Ok(Repository::find_by_id(id).one(db).await?)
}

/// All repositories ordered by ID.
pub async fn find_all(db: &DatabaseConnection) -> Result<Vec<Model>> {
    Ok(Repository::find()
        .order_by_asc(Column::Id)
        .all(db)
        .await?)
}

/// Number of stored repositories.
pub async fn count(db: &DatabaseConnection) -> Result<u64> {
    Ok(Repository::find().count(db).await?)
}
