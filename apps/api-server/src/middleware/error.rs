//! Error handling - RFC 7807 responses, plus the `{messages}` validation body.

use std::fmt;

use actix_web::{
    HttpMessage, HttpRequest, HttpResponse, ResponseError, error::JsonPayloadError,
    http::StatusCode,
};

use quill_core::error::{DomainError, RepoError};
use quill_shared::{ErrorResponse, ValidationErrorResponse, ValidationErrors};

use crate::observability::RequestId;

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Unauthorized,
    Forbidden,
    Conflict(String),
    Internal(String),
    Validation(ValidationErrors),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {msg}"),
            AppError::BadRequest(msg) => write!(f, "Bad request: {msg}"),
            AppError::Unauthorized => write!(f, "Unauthorized"),
            AppError::Forbidden => write!(f, "Forbidden"),
            AppError::Conflict(msg) => write!(f, "Conflict: {msg}"),
            AppError::Internal(msg) => write!(f, "Internal error: {msg}"),
            AppError::Validation(errors) => write!(f, "{errors}"),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        let error = match self {
            AppError::Validation(messages) => {
                return HttpResponse::build(status).json(ValidationErrorResponse {
                    messages: messages.clone(),
                });
            }
            AppError::NotFound(detail) => ErrorResponse::new(404, "Not Found").with_detail(detail),
            AppError::BadRequest(detail) => {
                ErrorResponse::new(400, "Bad Request").with_detail(detail)
            }
            AppError::Unauthorized => ErrorResponse::new(401, "Unauthorized"),
            AppError::Forbidden => ErrorResponse::new(403, "Forbidden"),
            AppError::Conflict(detail) => ErrorResponse::new(409, "Conflict").with_detail(detail),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::new(500, "Internal Server Error")
            }
        };

        HttpResponse::build(status).json(error)
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(errors)
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(_) => AppError::NotFound(err.to_string()),
            RepoError::Constraint(msg) => AppError::Conflict(msg),
            RepoError::Domain(e) => {
                tracing::error!("Stored data failed domain checks: {}", e);
                AppError::Internal("Invalid stored data".to_string())
            }
            RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            RepoError::Query(msg) => {
                tracing::error!("Database query error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

/// Malformed JSON bodies become a 400 problem response tagged with the request ID.
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    let mut problem = ErrorResponse::new(400, "Bad Request").with_detail(err.to_string());
    if let Some(request_id) = req.extensions().get::<RequestId>() {
        problem = problem.with_request_id(request_id.as_str());
    }

    let response = HttpResponse::BadRequest().json(problem);
    actix_web::error::InternalError::from_response(err, response).into()
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use actix_web::body::to_bytes;

    use super::*;

    #[test]
    fn test_repo_errors_map_to_statuses() {
        assert_eq!(
            AppError::from(RepoError::NotFound("Post")).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(RepoError::Constraint("dup".into())).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(RepoError::Query("boom".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_detail_names_the_entity() {
        match AppError::from(RepoError::NotFound("Category")) {
            AppError::NotFound(detail) => assert_eq!(detail, "Category not found"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[actix_rt::test]
    async fn test_validation_body_uses_messages_key() {
        let mut errors = ValidationErrors::new();
        errors.add("title", "A title is required");

        let response = AppError::Validation(errors).error_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["messages"]["title"][0], "A title is required");
    }
}
