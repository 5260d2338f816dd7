use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Tag;
use crate::error::DomainError;

/// Visibility of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicationStatus {
    #[default]
    Draft,
    Public,
}

impl PublicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PublicationStatus::Draft => "draft",
            PublicationStatus::Public => "public",
        }
    }

    pub fn is_public(&self) -> bool {
        matches!(self, PublicationStatus::Public)
    }

    /// Publish timestamp to store when saving a post with this status.
    ///
    /// A timestamp, once recorded, is kept forever; only the first save as
    /// `Public` records `now`.
    pub fn resolve_published_at(
        &self,
        previous: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        match (previous, self) {
            (Some(published_at), _) => Some(published_at),
            (None, PublicationStatus::Public) => Some(now),
            (None, PublicationStatus::Draft) => None,
        }
    }
}

impl fmt::Display for PublicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PublicationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(PublicationStatus::Draft),
            "public" => Ok(PublicationStatus::Public),
            other => Err(DomainError::UnknownPublicationStatus(other.to_string())),
        }
    }
}

/// Post entity - a blog article with its tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i32,
    pub admin_id: i32,
    pub category_id: Option<i32>,
    pub title: String,
    pub md_content: String,
    pub html_content: String,
    pub publication_status: PublicationStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub tags: Vec<Tag>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn is_public(&self) -> bool {
        self.publication_status.is_public()
    }

    pub fn tag_ids(&self) -> Vec<i32> {
        self.tags.iter().map(|t| t.id).collect()
    }
}

/// Writable attributes of a post, as submitted by an admin.
#[derive(Debug, Clone, Default)]
pub struct PostDraft {
    pub category_id: Option<i32>,
    pub title: String,
    pub md_content: String,
    pub html_content: String,
    pub publication_status: PublicationStatus,
    /// Requested tag names; missing tags are created on save.
    pub tags: Vec<String>,
}
