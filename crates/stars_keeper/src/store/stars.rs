//! Star records.

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use crate::entity::star::{ActiveModel, Column, Entity as Star, Model};

use super::errors::Result;

/// Conflict handling for star upserts: overwrite every column.
pub(crate) fn upsert_on_conflict() -> OnConflict {
    OnConflict::column(Column::Id)
        .update_columns([Column::StarredAt, Column::RepositoryId, Column::Body])
        .to_owned()
}

/// Insert a star, or overwrite the row with the same id.
///
/// Runs in its own transaction. On error the transaction is dropped, which
/// rolls it back.
pub async fn upsert(db: &DatabaseConnection, star: Model) -> Result<()> {
    let model = ActiveModel {
        id: Set(star.id),
        starred_at: Set(star.starred_at),
        repository_id: Set(star.repository_id),
        body: Set(star.body),
    };

    let txn = db.begin().await?;
    Star::insert(model)
        .on_conflict(upsert_on_conflict())
        .exec_without_returning(&txn)
        .await?;
    txn.commit().await?;

    Ok(())
}

/// Find a star by its identifier.
pub async fn find_by_id(db: &DatabaseConnection, id: &str) -> Result<Option<Model>> {
    Ok(Star::find_by_id(id.to_string()).one(db).await?)
}

/// All stars for one repository, oldest first.
pub async fn find_by_repository(db: &DatabaseConnection, repository_id: i64) -> Result<Vec<Model>> {
    Ok(Star::find()
        .filter(Column::RepositoryId.eq(repository_id))
        .order_by_asc(Column::StarredAt)
        .all(db)
        .await?)
}

/// All stars, oldest first.
pub async fn find_all(db: &DatabaseConnection) -> Result<Vec<Model>> {
    Ok(Star::find()
        .order_by_asc(Column::StarredAt)
        .order_by_asc(Column::Id)
        .all(db)
        .await?)
}

/// Number of stored stars.
pub async fn count(db: &DatabaseConnection) -> Result<u64> {
    Ok(Star::find().count(db).await?)
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, QueryTrait};

    use super::*;

    #[test]
    fn test_upsert_query_overwrites_every_column() {
        let model = ActiveModel {
            id: Set("abc".to_string()),
            starred_at: Set("2024-01-02T03:04:05Z".to_string()),
            repository_id: Set(42),
            body: Set("{}".to_string()),
        };

        let sql = Star::insert(model)
            .on_conflict(upsert_on_conflict())
            .build(DatabaseBackend::Sqlite)
            .to_string();

        assert!(sql.contains("ON CONFLICT (\"id\") DO UPDATE"), "{sql}");
        for column in ["starred_at", "repository_id", "body"] {
            assert!(
                sql.contains(&format!("\"{column}\" = \"excluded\".\"{column}\"")),
                "SQL should overwrite {column}: {sql}"
            );
        }
    }
}
