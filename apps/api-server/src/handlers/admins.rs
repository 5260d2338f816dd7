//! Admin account handlers.

use actix_web::{HttpResponse, web};

use quill_shared::dto::AdminResponse;

use crate::middleware::auth::AdminIdentity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/v1/admin/me
pub async fn me(
    AdminIdentity(identity): AdminIdentity,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let admin = state
        .admins
        .find_by_id(identity.admin_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Admin not found".to_string()))?;

    Ok(HttpResponse::Ok().json(AdminResponse {
        id: admin.id,
        name: admin.name,
        email: admin.email,
        roles: identity.roles,
    }))
}
