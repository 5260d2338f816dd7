//! Tag handlers.

use actix_web::{HttpResponse, web};

use quill_core::domain::Tag;
use quill_shared::Validate;
use quill_shared::dto::{PageQuery, TagRequest};

use super::views;
use crate::middleware::auth::AdminIdentity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/v1/tags
pub async fn index(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let tags = state.tags.find_all().await?;
    let body: Vec<_> = tags.into_iter().map(views::tag).collect();

    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/v1/tags/{name}/posts
pub async fn posts(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = views::page_request(&query, state.pagination.posts_per_page);
    let posts = state.posts.find_all_by_tag_name(&path, page).await?;

    Ok(HttpResponse::Ok().json(views::page_response(posts, views::post)))
}

/// POST /api/v1/admin/tags
pub async fn store(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
    body: web::Json<TagRequest>,
) -> AppResult<HttpResponse> {
    body.validate()?;

    let tag = state.tags.save(Tag::new(body.name.trim())).await?;
    tracing::info!(tag_id = tag.id, name = %tag.name, "Tag created");

    Ok(HttpResponse::Created().json(views::tag(tag)))
}

/// PUT /api/v1/admin/tags/{id}
pub async fn update(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<TagRequest>,
) -> AppResult<HttpResponse> {
    body.validate()?;

    let mut tag = state
        .tags
        .find_by_id(path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Tag not found".to_string()))?;
    tag.rename(body.name.trim());
    let tag = state.tags.save(tag).await?;

    Ok(HttpResponse::Ok().json(views::tag(tag)))
}

/// DELETE /api/v1/admin/tags/{id}
pub async fn destroy(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    state.tags.delete(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
