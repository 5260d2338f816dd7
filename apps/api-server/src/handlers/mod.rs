//! HTTP handlers and route configuration.

mod admins;
mod categories;
mod comments;
mod health;
mod posts;
mod tags;
mod views;

use actix_web::web;

use crate::state::AppState;

/// Configure all application routes.
///
/// The admin scope is registered before the public one so `/v1/admin/...`
/// is never swallowed by the `/v1` prefix.
pub fn configure_routes(cfg: &mut web::ServiceConfig, state: &AppState) {
    let admin = web::scope("/v1/admin")
        .route("/me", web::get().to(admins::me))
        .service(
            web::scope("/posts")
                .route("", web::get().to(posts::admin_index))
                .route("", web::post().to(posts::store))
                .route("/{id}", web::get().to(posts::admin_show))
                .route("/{id}", web::put().to(posts::update))
                .route("/{id}", web::delete().to(posts::destroy)),
        )
        .service(
            web::scope("/categories")
                .route("", web::post().to(categories::store))
                .route("/{id}", web::put().to(categories::update))
                .route("/{id}", web::delete().to(categories::destroy)),
        )
        .service(
            web::scope("/tags")
                .route("", web::post().to(tags::store))
                .route("/{id}", web::put().to(tags::update))
                .route("/{id}", web::delete().to(tags::destroy)),
        )
        .route("/comments/{id}", web::delete().to(comments::destroy));

    let public = web::scope("/v1")
        // Fixed paths first, `/posts/{id}` would match them otherwise.
        .route("/posts", web::get().to(posts::index))
        .route("/posts/latest", web::get().to(posts::latest))
        .route("/posts/random", web::get().to(posts::random))
        .route("/posts/title/{title}", web::get().to(posts::by_title))
        .route("/posts/{id}", web::get().to(posts::show))
        .route("/posts/{id}/comments", web::get().to(comments::index))
        .route("/posts/{id}/comments", web::post().to(comments::store))
        .route("/categories", web::get().to(categories::index))
        .route("/categories/{name}/posts", web::get().to(categories::posts))
        .route("/tags", web::get().to(tags::index))
        .route("/tags/{name}/posts", web::get().to(tags::posts));

    #[cfg(feature = "rate-limit")]
    let public = public.wrap(crate::middleware::rate_limit::RateLimitMiddleware::new(
        state.rate_limiter.clone(),
    ));
    #[cfg(not(feature = "rate-limit"))]
    let _ = state;

    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .service(admin)
            .service(public),
    );
}
