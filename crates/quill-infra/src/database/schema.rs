//! Table bootstrap from the entity definitions.
//!
//! This is not a migration system: it only creates tables that are missing
//! and never alters existing ones.

use sea_orm::{ConnectionTrait, DbConn, DbErr, EntityTrait, Schema};

use super::entity::{admin, category, comment, post, tag, tag_post};

/// Create every table that does not exist yet, referenced tables first.
pub async fn create_schema(db: &DbConn) -> Result<(), DbErr> {
    create_table(db, admin::Entity).await?;
    create_table(db, category::Entity).await?;
    create_table(db, tag::Entity).await?;
    create_table(db, post::Entity).await?;
    create_table(db, tag_post::Entity).await?;
    create_table(db, comment::Entity).await?;

    tracing::info!("Database schema ready");
    Ok(())
}

async fn create_table<E>(db: &DbConn, entity: E) -> Result<(), DbErr>
where
    E: EntityTrait,
{
    let backend = db.get_database_backend();
    let mut stmt = Schema::new(backend).create_table_from_entity(entity);
    stmt.if_not_exists();

    db.execute(backend.build(&stmt)).await?;
    tracing::debug!(table = entity.table_name(), "Table ensured");
    Ok(())
}
