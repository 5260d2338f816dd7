use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Comment left by a reader on a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i32,
    pub post_id: i32,
    pub name: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(post_id: i32, name: impl Into<String>, body: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            post_id,
            name: name.into(),
            body: body.into(),
            created_at: now,
            updated_at: now,
        }
    }
}
