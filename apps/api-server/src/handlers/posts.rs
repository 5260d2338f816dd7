//! Post handlers, public and admin.

use actix_web::{HttpResponse, web};

use quill_core::domain::{PageRequest, PostDraft, PublicationStatus, render_markdown};
use quill_shared::Validate;
use quill_shared::dto::{EditPostRequest, PageQuery, PostDetailResponse};

use super::views;
use crate::middleware::auth::AdminIdentity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Validate a request body and turn it into the writable attributes of a post.
fn into_draft(request: EditPostRequest) -> AppResult<PostDraft> {
    request.validate()?;

    let tags = request.tag_names();
    let publication_status = request
        .publication_status
        .as_deref()
        .map(str::parse::<PublicationStatus>)
        .transpose()?
        .unwrap_or_default();

    let md_content = request.content.unwrap_or_default();
    let html_content = match request.html_content {
        Some(html) if !html.trim().is_empty() => html,
        _ => render_markdown(&md_content),
    };

    Ok(PostDraft {
        category_id: request.category_id,
        title: request.title.unwrap_or_default(),
        md_content,
        html_content,
        publication_status,
        tags,
    })
}

/// GET /api/v1/posts
pub async fn index(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = views::page_request(&query, state.pagination.posts_per_page);
    let posts = state.posts.find_published(page).await?;

    Ok(HttpResponse::Ok().json(views::page_response(posts, views::post)))
}

/// GET /api/v1/posts/latest
pub async fn latest(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let post = state.posts.find_latest().await?;
    Ok(HttpResponse::Ok().json(views::post(post)))
}

/// GET /api/v1/posts/random
pub async fn random(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = views::page_request(&query, state.pagination.posts_per_page);
    let posts = state.posts.find_by_random(page).await?;

    Ok(HttpResponse::Ok().json(views::page_response(posts, views::post)))
}

/// GET /api/v1/posts/title/{title}
pub async fn by_title(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post = state.posts.find_by_title(&path).await?;
    Ok(HttpResponse::Ok().json(views::post(post)))
}

/// GET /api/v1/posts/{id}
///
/// A public post with its neighbours and related posts. Drafts are reported
/// as missing.
pub async fn show(state: web::Data<AppState>, path: web::Path<i32>) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let post = state.posts.find_by_id(id).await?;
    if !post.is_public() {
        return Err(AppError::NotFound("Post not found".to_string()));
    }

    let previous = state.posts.find_previous(id).await?;
    let next = state.posts.find_next(id).await?;
    let related = state
        .posts
        .find_related(&post, PageRequest::first(state.pagination.related_posts_limit))
        .await?;

    Ok(HttpResponse::Ok().json(PostDetailResponse {
        post: views::post(post),
        previous: previous.map(views::post),
        next: next.map(views::post),
        related: related.items.into_iter().map(views::post).collect(),
    }))
}

/// GET /api/v1/admin/posts
pub async fn admin_index(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = views::page_request(&query, state.pagination.posts_per_page);
    let posts = state.posts.find_all(page).await?;

    Ok(HttpResponse::Ok().json(views::page_response(posts, views::post)))
}

/// GET /api/v1/admin/posts/{id}
pub async fn admin_show(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let post = state.posts.find_by_id(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(views::post(post)))
}

/// POST /api/v1/admin/posts
pub async fn store(
    AdminIdentity(identity): AdminIdentity,
    state: web::Data<AppState>,
    body: web::Json<EditPostRequest>,
) -> AppResult<HttpResponse> {
    let draft = into_draft(body.into_inner())?;
    let post = state.posts.store(identity.admin_id, draft).await?;

    Ok(HttpResponse::Created().json(views::post(post)))
}

/// PUT /api/v1/admin/posts/{id}
pub async fn update(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<EditPostRequest>,
) -> AppResult<HttpResponse> {
    let draft = into_draft(body.into_inner())?;
    let post = state.posts.update_by_id(path.into_inner(), draft).await?;

    Ok(HttpResponse::Ok().json(views::post(post)))
}

/// DELETE /api/v1/admin/posts/{id}
pub async fn destroy(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    state.posts.destroy_by_id(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
