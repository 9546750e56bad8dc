//! Database migrations for the stars-keeper schema.
//!
//! This module is only available when the `migrate` feature is enabled.
//! Applied migrations are recorded in `stars_keeper_migrations`, and every
//! migration is written so that running it against an up-to-date schema is a
//! no-op.

pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_stars;
mod m20250301_000002_create_repositories;
mod m20250312_000001_add_repository_details;

/// The migrator that runs all migrations.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_stars::Migration),
            Box::new(m20250301_000002_create_repositories::Migration),
            Box::new(m20250312_000001_add_repository_details::Migration),
        ]
    }

    fn migration_table_name() -> SeaRc<dyn Iden> {
        SeaRc::new(Alias::new("stars_keeper_migrations"))
    }
}
