//! Database connection management and SeaORM repositories.

mod connections;
mod error;
mod post_repo;
mod schema;
mod sql_base;
mod sql_repo;

pub mod entity;

pub use connections::{DatabaseConfig, connect};
pub use post_repo::SqlPostRepository;
pub use schema::create_schema;
pub use sql_base::SqlRepository;
pub use sql_repo::{
    SqlAdminRepository, SqlCategoryRepository, SqlCommentRepository, SqlTagRepository,
};
