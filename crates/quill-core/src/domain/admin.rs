use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Admin entity - the author and owner of posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Admin {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Admin {
    /// Create a new admin with timestamps. The id is assigned by the database.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            name: name.into(),
            email: email.into(),
            created_at: now,
            updated_at: now,
        }
    }
}
