use chrono::{DateTime, Utc};
use crate::core::error::StorageError;
use crate::core::message::{Message, MessageRole};
use sqlx::SqlitePool;

/// Maximum snippet length returned by `search`, in characters.
const SNIPPET_RADIUS: usize = 40;

pub struct MessageRepo {
    pool: SqlitePool,
}

/// One history-search match. Deduplicated per (session, content) pair.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub session_id: String,
    pub title: String,
    pub snippet: String,
    pub matched_at: DateTime<Utc>,
}

impl MessageRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts with the next AUTOINCREMENT id; that id is the canonical
    /// ordering value within the session. Appending into a session that does
    /// not exist fails with `ForeignKeyViolation` rather than creating one.
    pub async fn append(
        &self,
        session_id: &str,
        role: MessageRole,
        content: &str,
    ) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO messages (session_id, role, content, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(session_id)
        .bind(role.as_str())
        .bind(content)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, session_id))?;
        Ok(())
    }

    pub async fn list(&self, session_id: &str) -> Result<Vec<Message>, StorageError> {
        let rows: Vec<(i64, String, String, String, String)> = sqlx::query_as(
            "SELECT id, session_id, role, content, created_at \
             FROM messages WHERE session_id = ? ORDER BY id ASC",
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Database(e.to_string()))?;

        rows.into_iter().map(row_to_message).collect()
    }

    /// Literal, case-sensitive substring search over message content across
    /// all sessions. One hit per distinct (session, content) pair, most
    /// recent match first.
    pub async fn search(&self, keyword: &str) -> Result<Vec<SearchHit>, StorageError> {
        let rows: Vec<(String, String, String, String)> = sqlx::query_as(
            "SELECT m.session_id, s.title, m.content, MAX(m.created_at) AS matched_at \
             FROM messages m JOIN sessions s ON s.id = m.session_id \
             WHERE instr(m.content, ?) > 0 \
             GROUP BY m.session_id, m.content \
             ORDER BY matched_at DESC",
        )
        .bind(keyword)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|(session_id, title, content, matched_at)| SearchHit {
                session_id,
                title,
                snippet: make_snippet(&content, keyword),
                matched_at: DateTime::parse_from_rfc3339(&matched_at)
                    .unwrap_or_default()
                    .with_timezone(&Utc),
            })
            .collect())
    }
}

fn map_insert_error(e: sqlx::Error, session_id: &str) -> StorageError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.kind() == sqlx::error::ErrorKind::ForeignKeyViolation {
            return StorageError::ForeignKeyViolation(format!("session {session_id}"));
        }
    }
    StorageError::Database(e.to_string())
}

fn row_to_message(row: (i64, String, String, String, String)) -> Result<Message, StorageError> {
    let role = MessageRole::parse(&row.2)
        .ok_or_else(|| StorageError::Database(format!("unknown role: {}", row.2)))?;

    Ok(Message {
        id: row.0,
        session_id: row.1,
        role,
        content: row.3,
        created_at: DateTime::parse_from_rfc3339(&row.4)
            .unwrap_or_default()
            .with_timezone(&Utc),
    })
}

/// Cuts a window of the matched content around the first occurrence of the
/// keyword, on char boundaries.
fn make_snippet(content: &str, keyword: &str) -> String {
    let hit = match content.find(keyword) {
        Some(pos) => pos,
        None => return truncate_chars(content, SNIPPET_RADIUS * 2),
    };

    let start = content[..hit]
        .char_indices()
        .rev()
        .nth(SNIPPET_RADIUS.saturating_sub(1))
        .map(|(i, _)| i)
        .unwrap_or(0);
    let tail = &content[hit + keyword.len()..];
    let end = tail
        .char_indices()
        .nth(SNIPPET_RADIUS)
        .map(|(i, _)| hit + keyword.len() + i)
        .unwrap_or(content.len());

    let mut snippet = String::new();
    if start > 0 {
        snippet.push('…');
    }
    snippet.push_str(&content[start..end]);
    if end < content.len() {
        snippet.push('…');
    }
    snippet
}

fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((i, _)) => format!("{}…", &s[..i]),
        None => s.to_string(),
    }
}
