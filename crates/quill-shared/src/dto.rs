//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validation::{Validate, ValidationErrors};

/// Accepted values of `publication_status`.
pub const PUBLICATION_STATUSES: [&str; 2] = ["draft", "public"];

pub const TITLE_REQUIRED: &str = "A title is required";
pub const CONTENT_REQUIRED: &str = "The content field is required.";
pub const STATUS_INVALID: &str = "The selected publication status is invalid.";
pub const NAME_REQUIRED: &str = "A name is required";
pub const BODY_REQUIRED: &str = "A comment body is required";

/// One entry of a post's `tags` array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagInput {
    pub name: String,
}

/// Body of `POST`/`PUT` on admin posts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditPostRequest {
    #[serde(default)]
    pub title: Option<String>,
    /// Markdown source.
    #[serde(default)]
    pub content: Option<String>,
    /// Pre-rendered HTML. Rendered from `content` when absent.
    #[serde(default)]
    pub html_content: Option<String>,
    #[serde(default)]
    pub category_id: Option<i32>,
    #[serde(default)]
    pub tags: Vec<TagInput>,
    #[serde(default)]
    pub publication_status: Option<String>,
}

impl EditPostRequest {
    pub fn is_public(&self) -> bool {
        self.publication_status.as_deref() == Some("public")
    }

    pub fn tag_names(&self) -> Vec<String> {
        self.tags.iter().map(|t| t.name.clone()).collect()
    }
}

impl Validate for EditPostRequest {
    /// Title and content are only required once a post goes public.
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Some(status) = self.publication_status.as_deref() {
            if !PUBLICATION_STATUSES.contains(&status) {
                errors.add("publication_status", STATUS_INVALID);
            }
        }

        if self.is_public() {
            errors.require("title", self.title.as_deref(), TITLE_REQUIRED);
            errors.require("content", self.content.as_deref(), CONTENT_REQUIRED);
        }

        errors.into_result()
    }
}

/// Body of category create/update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryRequest {
    #[serde(default)]
    pub name: String,
}

impl Validate for CategoryRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("name", Some(self.name.as_str()), NAME_REQUIRED);
        errors.into_result()
    }
}

/// Body of tag create/update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagRequest {
    #[serde(default)]
    pub name: String,
}

impl Validate for TagRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("name", Some(self.name.as_str()), NAME_REQUIRED);
        errors.into_result()
    }
}

/// Body of a new comment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub body: String,
}

impl Validate for CommentRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("name", Some(self.name.as_str()), NAME_REQUIRED);
        errors.require("body", Some(self.body.as_str()), BODY_REQUIRED);
        errors.into_result()
    }
}

/// `?page=&per_page=` on listing routes.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

/// One page of a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    pub data: Vec<T>,
    pub current_page: u64,
    pub per_page: u64,
    pub total: u64,
    pub last_page: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagResponse {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: i32,
    pub admin_id: i32,
    pub category_id: Option<i32>,
    pub title: String,
    /// Markdown source.
    pub content: String,
    pub html_content: String,
    pub publication_status: String,
    pub published_at: Option<DateTime<Utc>>,
    pub tags: Vec<TagResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A public post with its neighbours and related posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailResponse {
    pub post: PostResponse,
    pub previous: Option<PostResponse>,
    pub next: Option<PostResponse>,
    pub related: Vec<PostResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: i32,
    pub post_id: i32,
    pub name: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Response containing an admin's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub roles: Vec<String>,
}
