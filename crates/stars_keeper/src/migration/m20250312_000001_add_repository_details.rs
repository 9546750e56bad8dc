//! Add descriptive columns to `repositories`.
//!
//! SQLite only accepts one column per `ALTER TABLE`, and has no
//! `ADD COLUMN IF NOT EXISTS`, so each column is added on its own and skipped
//! when it is already present.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for column in [
            ColumnDef::new(Repositories::Description).text().null().to_owned(),
            ColumnDef::new(Repositories::Topics)
                .json()
                .not_null()
                .default(Expr::cust("'[]'"))
                .to_owned(),
            ColumnDef::new(Repositories::FullName).string().null().to_owned(),
            ColumnDef::new(Repositories::Readme).text().null().to_owned(),
        ] {
            let name = column.get_column_name();
            if manager.has_column("repositories", &name).await? {
                continue;
            }

            manager
                .alter_table(
                    Table::alter()
                        .table(Repositories::Table)
                        .add_column(column)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for column in [
            Repositories::Readme,
            Repositories::FullName,
            Repositories::Topics,
            Repositories::Description,
        ] {
            if !manager
                .has_column("repositories", column.to_string())
                .await?
            {
                continue;
            }

            manager
                .alter_table(
                    Table::alter()
                        .table(Repositories::Table)
                        .drop_column(column)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Repositories {
    Table,
    Description,
    Topics,
    FullName,
    Readme,
}
