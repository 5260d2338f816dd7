//! Domain entities - the core business objects.

mod admin;
mod category;
mod comment;
mod markdown;
mod page;
mod post;
mod tag;

pub use admin::Admin;
pub use category::Category;
pub use comment::Comment;
pub use markdown::render_markdown;
pub use page::{Page, PageRequest};
pub use post::{Post, PostDraft, PublicationStatus};
pub use tag::{LinkDiff, Tag, missing_tag_names, normalize_tag_names};
