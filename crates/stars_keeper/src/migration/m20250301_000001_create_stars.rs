//! Create the `stars` table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Stars::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Stars::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Stars::StarredAt).string().not_null())
                    .col(ColumnDef::new(Stars::RepositoryId).big_integer().not_null())
                    .col(ColumnDef::new(Stars::Body).text().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_stars_repository_id")
                    .table(Stars::Table)
                    .col(Stars::RepositoryId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Stars::Table).if_exists().to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Stars {
    Table,
    Id,
    StarredAt,
    RepositoryId,
    Body,
}
