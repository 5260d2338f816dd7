//! Application state - shared across all handlers.

use std::sync::Arc;

use sea_orm::{DbConn, DbErr};

use quill_core::ports::{
    AdminRepository, CategoryRepository, CommentRepository, PostRepository, RateLimiter,
    TagRepository, TokenService,
};
use quill_infra::database::{
    SqlAdminRepository, SqlCategoryRepository, SqlCommentRepository, SqlPostRepository,
    SqlTagRepository, connect,
};
use quill_infra::JwtTokenService;

use crate::config::{AppConfig, PaginationConfig};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: DbConn,
    pub posts: Arc<dyn PostRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub tags: Arc<dyn TagRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub admins: Arc<dyn AdminRepository>,
    pub token_service: Arc<dyn TokenService>,
    /// Applied to the public API when set.
    pub rate_limiter: Option<Arc<dyn RateLimiter>>,
    pub pagination: PaginationConfig,
}

impl AppState {
    /// Wire the SQL repositories over one connection pool.
    pub fn new(
        db: DbConn,
        token_service: Arc<dyn TokenService>,
        pagination: PaginationConfig,
    ) -> Self {
        Self {
            posts: Arc::new(SqlPostRepository::new(db.clone())),
            categories: Arc::new(SqlCategoryRepository::new(db.clone())),
            tags: Arc::new(SqlTagRepository::new(db.clone())),
            comments: Arc::new(SqlCommentRepository::new(db.clone())),
            admins: Arc::new(SqlAdminRepository::new(db.clone())),
            db,
            token_service,
            rate_limiter: None,
            pagination,
        }
    }

    pub fn with_rate_limiter(mut self, limiter: Arc<dyn RateLimiter>) -> Self {
        self.rate_limiter = Some(limiter);
        self
    }

    /// Connect to the database and build the state described by `config`.
    pub async fn from_config(config: &AppConfig) -> Result<Self, DbErr> {
        let db = connect(&config.database).await?;
        let token_service: Arc<dyn TokenService> =
            Arc::new(JwtTokenService::new(config.jwt.clone()));

        let state = Self::new(db, token_service, config.pagination);

        #[cfg(feature = "rate-limit")]
        let state = state.with_rate_limiter(Arc::new(quill_infra::InMemoryRateLimiter::new(
            config.rate_limit.clone(),
        )));

        tracing::info!("Application state initialized");
        Ok(state)
    }
}
