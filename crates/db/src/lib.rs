//! Persistence layer: SQLite pool bootstrap, entity models, declarative
//! filters, per-table repositories and the [`session::Store`] /
//! [`session::Session`] unit-of-work abstraction the domain services run on.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

pub mod filter;
pub mod models;
pub mod repositories;
pub mod session;

pub use session::{Session, SqliteSession, SqliteStore, Store};

pub type DbPool = sqlx::SqlitePool;

/// Create a connection pool from a database URL.
///
/// The database file is created if missing. WAL journaling lets the HTTP
/// path keep reading while a sweep transaction is writing.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal);

    SqlitePoolOptions::new()
        .max_connections(8)
        .connect_with(options)
        .await
}

/// Verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
