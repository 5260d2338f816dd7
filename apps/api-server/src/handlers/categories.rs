//! Category handlers.

use actix_web::{HttpResponse, web};

use quill_core::domain::Category;
use quill_shared::Validate;
use quill_shared::dto::{CategoryRequest, PageQuery};

use super::views;
use crate::middleware::auth::AdminIdentity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/v1/categories
pub async fn index(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let categories = state.categories.find_all().await?;
    let body: Vec<_> = categories.into_iter().map(views::category).collect();

    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/v1/categories/{name}/posts
pub async fn posts(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = views::page_request(&query, state.pagination.posts_per_page);
    let posts = state.posts.find_all_by_category_name(&path, page).await?;

    Ok(HttpResponse::Ok().json(views::page_response(posts, views::post)))
}

/// POST /api/v1/admin/categories
pub async fn store(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
    body: web::Json<CategoryRequest>,
) -> AppResult<HttpResponse> {
    body.validate()?;

    let category = state
        .categories
        .save(Category::new(body.name.trim()))
        .await?;
    tracing::info!(category_id = category.id, name = %category.name, "Category created");

    Ok(HttpResponse::Created().json(views::category(category)))
}

/// PUT /api/v1/admin/categories/{id}
pub async fn update(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<CategoryRequest>,
) -> AppResult<HttpResponse> {
    body.validate()?;

    let mut category = state
        .categories
        .find_by_id(path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;
    category.rename(body.name.trim());
    let category = state.categories.save(category).await?;

    Ok(HttpResponse::Ok().json(views::category(category)))
}

/// DELETE /api/v1/admin/categories/{id}
///
/// Posts of the category become uncategorised.
pub async fn destroy(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    state.categories.delete(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
