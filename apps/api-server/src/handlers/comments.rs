//! Comment handlers.

use actix_web::{HttpResponse, web};

use quill_core::domain::Comment;
use quill_shared::Validate;
use quill_shared::dto::CommentRequest;

use super::views;
use crate::middleware::auth::AdminIdentity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Comments are only visible on public posts.
async fn ensure_public_post(state: &AppState, post_id: i32) -> AppResult<()> {
    let post = state.posts.find_by_id(post_id).await?;
    if post.is_public() {
        Ok(())
    } else {
        Err(AppError::NotFound("Post not found".to_string()))
    }
}

/// GET /api/v1/posts/{id}/comments
pub async fn index(state: web::Data<AppState>, path: web::Path<i32>) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    ensure_public_post(&state, post_id).await?;

    let comments = state.comments.find_by_post_id(post_id).await?;
    let body: Vec<_> = comments.into_iter().map(views::comment).collect();

    Ok(HttpResponse::Ok().json(body))
}

/// POST /api/v1/posts/{id}/comments
pub async fn store(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let request = body.into_inner();
    request.validate()?;
    ensure_public_post(&state, post_id).await?;

    let comment = state
        .comments
        .save(Comment::new(post_id, request.name.trim(), request.body))
        .await?;
    tracing::info!(post_id, comment_id = comment.id, "Comment added");

    Ok(HttpResponse::Created().json(views::comment(comment)))
}

/// DELETE /api/v1/admin/comments/{id}
pub async fn destroy(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    state.comments.delete(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
