//! Tag entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use super::{EntityLabel, key};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tags")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::tag_post::Entity")]
    TagPost,
}

impl Related<super::tag_post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TagPost.def()
    }
}

/// Posts reached through the `tag_post` join table.
impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        super::tag_post::Relation::Post.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::tag_post::Relation::Tag.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl EntityLabel for Entity {
    const LABEL: &'static str = "Tag";
}

impl From<Model> for quill_core::domain::Tag {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<quill_core::domain::Tag> for ActiveModel {
    fn from(tag: quill_core::domain::Tag) -> Self {
        Self {
            id: key(tag.id),
            name: Set(tag.name),
            created_at: Set(tag.created_at.into()),
            updated_at: Set(tag.updated_at.into()),
        }
    }
}
