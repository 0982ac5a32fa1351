use chrono::{DateTime, Utc};
use crate::core::error::StorageError;
use crate::core::session::Session;
use sqlx::SqlitePool;

pub struct SessionRepo {
    pool: SqlitePool,
}

impl SessionRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, session: &Session) -> Result<(), StorageError> {
        sqlx::query("INSERT INTO sessions (id, title, created_at) VALUES (?, ?, ?)")
            .bind(&session.id)
            .bind(&session.title)
            .bind(session.created_at.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Database(e.to_string()))?;
        Ok(())
    }

    pub async fn get(&self, id: &str) -> Result<Session, StorageError> {
        let row: (String, String, String) =
            sqlx::query_as("SELECT id, title, created_at FROM sessions WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| StorageError::Database(e.to_string()))?
                .ok_or_else(|| StorageError::NotFound(format!("session {id}")))?;

        Ok(row_to_session(row))
    }

    pub async fn list(&self) -> Result<Vec<Session>, StorageError> {
        let rows: Vec<(String, String, String)> =
            sqlx::query_as("SELECT id, title, created_at FROM sessions ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| StorageError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(row_to_session).collect())
    }

    pub async fn rename(&self, id: &str, title: &str) -> Result<(), StorageError> {
        let result = sqlx::query("UPDATE sessions SET title = ? WHERE id = ?")
            .bind(title)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("session {id}")));
        }
        Ok(())
    }

    /// Deletes the session and all of its messages in one transaction, so a
    /// failure cannot leave orphaned messages behind.
    pub async fn delete(&self, id: &str) -> Result<(), StorageError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StorageError::Database(e.to_string()))?;

        sqlx::query("DELETE FROM messages WHERE session_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| StorageError::Database(e.to_string()))?;

        let result = sqlx::query("DELETE FROM sessions WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| StorageError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("session {id}")));
        }

        tx.commit()
            .await
            .map_err(|e| StorageError::Database(e.to_string()))?;
        Ok(())
    }
}

fn row_to_session(row: (String, String, String)) -> Session {
    Session {
        id: row.0,
        title: row.1,
        created_at: DateTime::parse_from_rfc3339(&row.2)
            .unwrap_or_default()
            .with_timezone(&Utc),
    }
}
