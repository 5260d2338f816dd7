//! # Quill Shared
//!
//! Wire types of the Quill HTTP API: request bodies with their validation
//! rules, response bodies and error bodies. Free of server dependencies so a
//! client can depend on it too.

pub mod dto;
pub mod response;
pub mod validation;

pub use response::{ErrorResponse, ValidationErrorResponse};
pub use validation::{Validate, ValidationErrors};
