//! Database connection utilities.

use std::io;
use std::path::{Path, PathBuf};

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Suffixes of the side files SQLite creates next to a WAL-mode database.
const SQLITE_SIDE_FILES: [&str; 2] = ["-wal", "-shm"];

/// Configure SQLite-specific pragmas for better performance and concurrency.
///
/// This sets:
/// - `journal_mode=WAL` - Write-ahead logging for better concurrent access
/// - `busy_timeout=5000` - Wait up to 5 seconds for locks instead of failing immediately
/// - `synchronous=NORMAL` - Good balance of safety and performance with WAL
async fn configure_sqlite(db: &DatabaseConnection) -> Result<(), DbErr> {
    use sea_orm::{ConnectionTrait, Statement};

    for pragma in [
        "PRAGMA journal_mode=WAL",
        "PRAGMA busy_timeout=5000",
        "PRAGMA synchronous=NORMAL",
    ] {
        db.execute(Statement::from_string(
            db.get_database_backend(),
            pragma.to_string(),
        ))
        .await?;
    }

    Ok(())
}

/// Build a SQLite connection URL for a database file.
///
/// `mode=rwc` opens the file read-write and creates it if it doesn't exist.
pub fn sqlite_url(path: &Path) -> String {
    format!("sqlite://{}?mode=rwc", path.display())
}

/// Establish a connection to the database.
///
/// For SQLite databases, this automatically configures WAL journal mode,
/// a 5 second busy timeout and NORMAL synchronous mode.
///
/// # Arguments
/// * `database_url` - Database connection string (e.g., `sqlite:///path/to/main.db?mode=rwc`)
///
/// # Errors
/// Returns `DbErr` if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;

    if database_url.starts_with("sqlite://") {
        configure_sqlite(&db).await?;
    }

    Ok(db)
}

/// Establish a connection to the database and run all pending migrations.
///
/// Safe to call against an already-initialized database: applied migrations
/// are skipped and every migration tolerates an up-to-date schema.
///
/// # Errors
/// Returns `DbErr` if the connection cannot be established or migrations fail.
///
/// # Example
/// ```ignore
/// let db = stars_keeper::connect_and_migrate("sqlite::memory:").await?;
/// ```
#[cfg(feature = "migrate")]
pub async fn connect_and_migrate(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    use sea_orm_migration::MigratorTrait;

    let db = connect(database_url).await?;
    crate::migration::Migrator::up(&db, None).await?;
    Ok(db)
}

/// Delete the database file at `path`, together with its WAL side files.
///
/// Returns `Ok(false)` without touching the filesystem when the database file
/// does not exist, and `Ok(true)` once it has been removed. Open connections
/// should be closed first.
pub fn purge(path: &Path) -> io::Result<bool> {
    match std::fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "Database does not exist, nothing to purge");
            return Ok(false);
        }
        Err(e) => return Err(e),
    }

    for side_file in side_files(path) {
        match std::fs::remove_file(&side_file) {
            Ok(()) => {
                tracing::debug!(path = %side_file.display(), "Removed database side file");
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
    }

    tracing::info!(path = %path.display(), "Purged database");
    Ok(true)
}

fn side_files(path: &Path) -> impl Iterator<Item = PathBuf> + '_ {
    SQLITE_SIDE_FILES.iter().map(move |suffix| {
        let mut name = path.as_os_str().to_owned();
        name.push(suffix);
        PathBuf::from(name)
    })
}
