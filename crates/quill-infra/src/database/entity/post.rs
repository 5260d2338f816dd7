//! Post entity for SeaORM.

use sea_orm::entity::prelude::*;

use quill_core::domain::{Post, PublicationStatus, Tag};
use quill_core::error::RepoError;

use super::EntityLabel;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub admin_id: i32,
    pub category_id: Option<i32>,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub md_content: String,
    #[sea_orm(column_type = "Text")]
    pub html_content: String,
    /// `draft` or `public`.
    pub publication_status: String,
    pub published_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::admin::Entity",
        from = "Column::AdminId",
        to = "super::admin::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Admin,
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Category,
    #[sea_orm(has_many = "super::comment::Entity")]
    Comment,
    #[sea_orm(has_many = "super::tag_post::Entity")]
    TagPost,
}

impl Related<super::admin::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Admin.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl Related<super::tag_post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TagPost.def()
    }
}

/// Tags reached through the `tag_post` join table.
impl Related<super::tag::Entity> for Entity {
    fn to() -> RelationDef {
        super::tag_post::Relation::Tag.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::tag_post::Relation::Post.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl EntityLabel for Entity {
    const LABEL: &'static str = "Post";
}

impl Model {
    /// Convert to the domain post. Fails only on a status string this
    /// version does not know.
    pub fn into_domain(self, tags: Vec<Tag>) -> Result<Post, RepoError> {
        let publication_status: PublicationStatus = self.publication_status.parse()?;

        Ok(Post {
            id: self.id,
            admin_id: self.admin_id,
            category_id: self.category_id,
            title: self.title,
            md_content: self.md_content,
            html_content: self.html_content,
            publication_status,
            published_at: self.published_at.map(Into::into),
            tags,
            created_at: self.created_at.into(),
            updated_at: self.updated_at.into(),
        })
    }
}
