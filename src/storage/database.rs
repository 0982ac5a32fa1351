use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::core::config::AppConfig;
use crate::core::error::StorageError;

const DB_FILE: &str = "refscout.db";
const SCHEMA: &str = include_str!("../../migrations/001_initial.sql");

/// Handle on the conversation store. Cheap to clone; every repo shares the
/// pool, and each operation holds a connection only for its own duration.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn open(config: &AppConfig) -> Result<Self, StorageError> {
        let dir = config.data_path();
        std::fs::create_dir_all(&dir).map_err(|e| StorageError::Database(e.to_string()))?;
        Self::open_file(&dir.join(DB_FILE)).await
    }

    async fn open_file(path: &Path) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| StorageError::Database(e.to_string()))?;

        Ok(Self { pool })
    }

    /// Idempotent: the bundled schema uses IF NOT EXISTS throughout and is
    /// safe to run on every process start.
    pub async fn run_migrations(&self) -> Result<(), StorageError> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Migration(e.to_string()))?;
        Ok(())
    }

    pub fn sessions(&self) -> super::SessionRepo {
        super::SessionRepo::new(self.pool.clone())
    }

    pub fn messages(&self) -> super::MessageRepo {
        super::MessageRepo::new(self.pool.clone())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
