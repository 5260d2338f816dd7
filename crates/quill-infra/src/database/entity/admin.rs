//! Admin entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use super::{EntityLabel, key};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "admins")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::post::Entity")]
    Post,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl EntityLabel for Entity {
    const LABEL: &'static str = "Admin";
}

impl From<Model> for quill_core::domain::Admin {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<quill_core::domain::Admin> for ActiveModel {
    fn from(admin: quill_core::domain::Admin) -> Self {
        Self {
            id: key(admin.id),
            name: Set(admin.name),
            email: Set(admin.email),
            created_at: Set(admin.created_at.into()),
            updated_at: Set(admin.updated_at.into()),
        }
    }
}
