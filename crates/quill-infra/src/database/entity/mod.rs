//! SeaORM entities, one module per table.

pub mod admin;
pub mod category;
pub mod comment;
pub mod post;
pub mod tag;
pub mod tag_post;

/// Human-readable name of an entity, used in not-found errors.
pub trait EntityLabel {
    const LABEL: &'static str;
}

/// Domain ids of 0 mean "not persisted yet"; let the database assign one.
pub(crate) fn key(id: i32) -> sea_orm::ActiveValue<i32> {
    if id == 0 {
        sea_orm::ActiveValue::NotSet
    } else {
        sea_orm::ActiveValue::Set(id)
    }
}
