use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder title given to sessions that have not been auto-titled yet.
pub const DEFAULT_SESSION_TITLE: &str = "New conversation";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(title: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title,
            created_at: Utc::now(),
        }
    }
}
