//! # Quill API Server
//!
//! actix-web application for the Quill blog backend. The binary in `main.rs`
//! only loads configuration and serves [`configure`]; tests mount the same
//! configuration in-process.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod state;
pub mod telemetry;

use actix_web::web;

use crate::middleware::error::json_error_handler;
use crate::state::AppState;

/// Register shared data, the JSON body config and every route.
pub fn configure(state: AppState) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(state.token_service.clone()))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler));

        handlers::configure_routes(cfg, &state);
        cfg.app_data(web::Data::new(state));
    }
}
