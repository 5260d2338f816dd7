use async_trait::async_trait;

use crate::domain::{Admin, Category, Comment, Page, PageRequest, Post, PostDraft, Tag};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Admin repository.
#[async_trait]
pub trait AdminRepository: BaseRepository<Admin, i32> {
    async fn find_by_email(&self, email: &str) -> Result<Option<Admin>, RepoError>;
}

/// Category repository.
#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, i32> {
    /// All categories ordered by name.
    async fn find_all(&self) -> Result<Vec<Category>, RepoError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, RepoError>;
}

/// Tag repository.
#[async_trait]
pub trait TagRepository: BaseRepository<Tag, i32> {
    /// All tags ordered by name.
    async fn find_all(&self) -> Result<Vec<Tag>, RepoError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Tag>, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, i32> {
    /// Comments of a post, oldest first.
    async fn find_by_post_id(&self, post_id: i32) -> Result<Vec<Comment>, RepoError>;
}

/// Post repository.
///
/// Listings are newest first unless noted. Lookups that must hit a row return
/// `RepoError::NotFound` instead of `None`.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Every post regardless of status.
    async fn find_all(&self, page: PageRequest) -> Result<Page<Post>, RepoError>;

    async fn find_published(&self, page: PageRequest) -> Result<Page<Post>, RepoError>;

    /// Newest public post.
    async fn find_latest(&self) -> Result<Post, RepoError>;

    /// Public posts in random order.
    async fn find_by_random(&self, page: PageRequest) -> Result<Page<Post>, RepoError>;

    async fn find_by_id(&self, id: i32) -> Result<Post, RepoError>;

    async fn find_all_by_category_name(
        &self,
        name: &str,
        page: PageRequest,
    ) -> Result<Page<Post>, RepoError>;

    async fn find_all_by_tag_name(
        &self,
        name: &str,
        page: PageRequest,
    ) -> Result<Page<Post>, RepoError>;

    /// Newest public post with exactly this title.
    async fn find_by_title(&self, title: &str) -> Result<Post, RepoError>;

    /// Public posts sharing at least one tag with `post`, excluding `post` itself.
    async fn find_related(&self, post: &Post, page: PageRequest) -> Result<Page<Post>, RepoError>;

    /// Public post right before `id`.
    async fn find_previous(&self, id: i32) -> Result<Option<Post>, RepoError>;

    /// Public post right after `id`.
    async fn find_next(&self, id: i32) -> Result<Option<Post>, RepoError>;

    /// Create a post owned by `admin_id` and sync its tags.
    async fn store(&self, admin_id: i32, draft: PostDraft) -> Result<Post, RepoError>;

    /// Overwrite a post. Tags are only re-synced when `draft.tags` is non-empty.
    async fn update_by_id(&self, id: i32, draft: PostDraft) -> Result<Post, RepoError>;

    /// Delete a post together with its tag links and comments.
    async fn destroy_by_id(&self, id: i32) -> Result<(), RepoError>;
}
