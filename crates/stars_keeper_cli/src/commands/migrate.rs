use std::path::Path;

use stars_keeper::db;
use stars_keeper::migration::{Migrator, MigratorTrait};

use crate::MigrateAction;

pub(crate) async fn handle_migrate(
    action: MigrateAction,
    database_path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = db::connect(&db::sqlite_url(database_path)).await?;

    match action {
        MigrateAction::Up => {
            println!("Applying migrations...");
            Migrator::up(&db, None).await?;
            println!("Migrations applied successfully.");
        }
        MigrateAction::Status => {
            println!("Migration status:");
            Migrator::status(&db).await?;
        }
    }

    Ok(())
}
