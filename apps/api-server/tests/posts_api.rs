//! HTTP routes against an in-memory SQLite database.

use std::sync::Arc;

use actix_web::http::{StatusCode, header};
use actix_web::{App, test};
use serde_json::{Value, json};

use api_server::config::PaginationConfig;
use api_server::observability::RequestIdMiddleware;
use api_server::state::AppState;
use quill_core::domain::Admin;
use quill_core::ports::{BaseRepository, RateLimiter, TokenService};
use quill_infra::{DatabaseConfig, JwtConfig, JwtTokenService, SqlAdminRepository, connect};

const SECRET: &str = "integration-secret";

struct Harness {
    state: AppState,
    jwt: JwtTokenService,
    admin_id: i32,
}

impl Harness {
    async fn new() -> Self {
        let db = connect(&DatabaseConfig::in_memory()).await.unwrap();
        let admin = SqlAdminRepository::new(db.clone())
            .save(Admin::new("Jane", "jane@example.com"))
            .await
            .unwrap();

        let config = JwtConfig {
            secret: SECRET.to_string(),
            ..JwtConfig::default()
        };
        let token_service: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.clone()));

        Self {
            state: AppState::new(db, token_service, PaginationConfig::default()),
            jwt: JwtTokenService::new(config),
            admin_id: admin.id,
        }
    }

    fn token(&self, roles: &[&str]) -> String {
        let roles = roles.iter().map(|r| r.to_string()).collect();
        let token = self
            .jwt
            .generate_token(self.admin_id, "jane@example.com", roles)
            .unwrap();
        format!("Bearer {token}")
    }

    fn admin(&self) -> String {
        self.token(&["admin"])
    }
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .wrap(RequestIdMiddleware)
                .configure(api_server::configure($state)),
        )
        .await
    };
}

/// POST an admin post and return the 201 body.
macro_rules! create_post {
    ($app:expr, $auth:expr, $body:expr $(,)?) => {{
        let req = test::TestRequest::post()
            .uri("/api/v1/admin/posts")
            .insert_header((header::AUTHORIZATION, $auth.to_string()))
            .set_json($body)
            .to_request();
        let resp = test::call_service($app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        body
    }};
}

#[actix_rt::test]
async fn test_health_reports_database() {
    let h = Harness::new().await;
    let app = app!(h.state.clone());

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "up");
}

#[actix_rt::test]
async fn test_admin_routes_require_a_token() {
    let h = Harness::new().await;
    let app = app!(h.state.clone());

    let req = test::TestRequest::post()
        .uri("/api/v1/admin/posts")
        .set_json(json!({ "title": "x" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/posts")
        .insert_header((header::AUTHORIZATION, h.token(&["reader"])))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_rt::test]
async fn test_public_post_without_title_is_rejected() {
    let h = Harness::new().await;
    let app = app!(h.state.clone());

    let req = test::TestRequest::post()
        .uri("/api/v1/admin/posts")
        .insert_header((header::AUTHORIZATION, h.admin()))
        .set_json(json!({ "publication_status": "public" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["messages"]["title"][0], "A title is required");
    assert_eq!(
        body["messages"]["content"][0],
        "The content field is required."
    );
}

#[actix_rt::test]
async fn test_malformed_json_is_a_bad_request() {
    let h = Harness::new().await;
    let app = app!(h.state.clone());

    let req = test::TestRequest::post()
        .uri("/api/v1/admin/posts")
        .insert_header((header::AUTHORIZATION, h.admin()))
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["title"], "Bad Request");
    assert!(body["request_id"].is_string());
}

#[actix_rt::test]
async fn test_create_post_with_tags() {
    let h = Harness::new().await;
    let app = app!(h.state.clone());

    let post = create_post!(
        &app,
        &h.admin(),
        json!({
            "title": "Hello",
            "content": "# Hello",
            "publication_status": "public",
            "tags": [{ "name": "rust" }, { "name": "go" }]
        }),
    );

    assert_eq!(post["admin_id"], h.admin_id);
    assert_eq!(post["html_content"], "<h1>Hello</h1>\n");
    assert!(post["published_at"].is_string());
    let names: Vec<_> = post["tags"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["go", "rust"]);

    let req = test::TestRequest::get().uri("/api/v1/tags").to_request();
    let tags: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(tags.as_array().unwrap().len(), 2);
}

#[actix_rt::test]
async fn test_drafts_stay_out_of_public_routes() {
    let h = Harness::new().await;
    let app = app!(h.state.clone());
    let auth = h.admin();

    create_post!(
        &app,
        &auth,
        json!({ "title": "Live", "content": "x", "publication_status": "public" }),
    );
    let draft = create_post!(&app, &auth, json!({ "title": "Wip" }));
    assert_eq!(draft["publication_status"], "draft");
    assert!(draft["published_at"].is_null());

    let req = test::TestRequest::get().uri("/api/v1/posts").to_request();
    let page: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["data"][0]["title"], "Live");
    assert_eq!(page["current_page"], 1);
    assert_eq!(page["last_page"], 1);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/posts/{}", draft["id"]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/posts")
        .insert_header((header::AUTHORIZATION, auth))
        .to_request();
    let page: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(page["total"], 2);
}

#[actix_rt::test]
async fn test_post_detail_links_neighbours_and_related() {
    let h = Harness::new().await;
    let app = app!(h.state.clone());
    let auth = h.admin();

    let public = |title: &str, tag: &str| {
        json!({
            "title": title,
            "content": "body",
            "publication_status": "public",
            "tags": [{ "name": tag }]
        })
    };
    let first = create_post!(&app, &auth, public("First", "rust"));
    let second = create_post!(&app, &auth, public("Second", "go"));
    let third = create_post!(&app, &auth, public("Third", "rust"));

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/posts/{}", second["id"]))
        .to_request();
    let detail: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(detail["post"]["title"], "Second");
    assert_eq!(detail["previous"]["id"], first["id"]);
    assert_eq!(detail["next"]["id"], third["id"]);
    assert_eq!(detail["related"], json!([]));

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/posts/{}", first["id"]))
        .to_request();
    let detail: Value = test::call_and_read_body_json(&app, req).await;
    assert!(detail["previous"].is_null());
    assert_eq!(detail["related"][0]["title"], "Third");
}

#[actix_rt::test]
async fn test_update_and_delete_post() {
    let h = Harness::new().await;
    let app = app!(h.state.clone());
    let auth = h.admin();

    let post = create_post!(
        &app,
        &auth,
        json!({ "title": "Old", "tags": [{ "name": "rust" }] }),
    );
    let uri = format!("/api/v1/admin/posts/{}", post["id"]);

    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header((header::AUTHORIZATION, auth.clone()))
        .set_json(json!({ "title": "New", "content": "text", "publication_status": "public" }))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["title"], "New");
    assert_eq!(updated["tags"][0]["name"], "rust");
    assert!(updated["published_at"].is_string());

    let req = test::TestRequest::delete()
        .uri(&uri)
        .insert_header((header::AUTHORIZATION, auth.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header((header::AUTHORIZATION, auth))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "Post not found");
}

#[actix_rt::test]
async fn test_comments_on_public_post() {
    let h = Harness::new().await;
    let app = app!(h.state.clone());
    let auth = h.admin();

    let post = create_post!(
        &app,
        &auth,
        json!({ "title": "Talk", "content": "x", "publication_status": "public" }),
    );
    let draft = create_post!(&app, &auth, json!({ "title": "Hidden" }));
    let uri = format!("/api/v1/posts/{}/comments", post["id"]);

    let req = test::TestRequest::post()
        .uri(&uri)
        .set_json(json!({ "name": "Ann", "body": "Nice" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri(&uri)
        .set_json(json!({ "name": "Ann" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["messages"]["body"][0], "A comment body is required");

    let req = test::TestRequest::get().uri(&uri).to_request();
    let comments: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(comments.as_array().unwrap().len(), 1);
    assert_eq!(comments[0]["name"], "Ann");

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/posts/{}/comments", draft["id"]))
        .set_json(json!({ "name": "Ann", "body": "Early" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_category_admin_and_listing() {
    let h = Harness::new().await;
    let app = app!(h.state.clone());
    let auth = h.admin();

    let req = test::TestRequest::post()
        .uri("/api/v1/admin/categories")
        .insert_header((header::AUTHORIZATION, auth.clone()))
        .set_json(json!({ "name": "Rust" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let category: Value = test::read_body_json(resp).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/admin/categories")
        .insert_header((header::AUTHORIZATION, auth.clone()))
        .set_json(json!({ "name": "Rust" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    create_post!(
        &app,
        &auth,
        json!({
            "title": "In category",
            "content": "x",
            "category_id": category["id"],
            "publication_status": "public"
        }),
    );

    let req = test::TestRequest::get()
        .uri("/api/v1/categories/Rust/posts")
        .to_request();
    let page: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(page["data"][0]["title"], "In category");

    let req = test::TestRequest::get()
        .uri("/api/v1/categories/Nope/posts")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri("/api/v1/admin/posts")
        .insert_header((header::AUTHORIZATION, auth))
        .set_json(json!({ "title": "Lost", "category_id": 999 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_tag_admin_and_listing() {
    let h = Harness::new().await;
    let app = app!(h.state.clone());
    let auth = h.admin();

    let req = test::TestRequest::post()
        .uri("/api/v1/admin/tags")
        .insert_header((header::AUTHORIZATION, auth.clone()))
        .set_json(json!({ "name": "rsut" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let tag: Value = test::read_body_json(resp).await;
    let tag_uri = format!("/api/v1/admin/tags/{}", tag["id"]);

    let req = test::TestRequest::post()
        .uri("/api/v1/admin/tags")
        .insert_header((header::AUTHORIZATION, auth.clone()))
        .set_json(json!({ "name": "rsut" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::post()
        .uri("/api/v1/admin/tags")
        .insert_header((header::AUTHORIZATION, auth.clone()))
        .set_json(json!({ "name": "  " }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["messages"]["name"][0], "A name is required");

    let req = test::TestRequest::put()
        .uri(&tag_uri)
        .insert_header((header::AUTHORIZATION, auth.clone()))
        .set_json(json!({ "name": "rust" }))
        .to_request();
    let renamed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(renamed["id"], tag["id"]);
    assert_eq!(renamed["name"], "rust");

    let shown = create_post!(
        &app,
        &auth,
        json!({
            "title": "Shown",
            "content": "x",
            "publication_status": "public",
            "tags": [{ "name": "rust" }]
        }),
    );
    create_post!(
        &app,
        &auth,
        json!({ "title": "Hidden", "tags": [{ "name": "rust" }] }),
    );

    let req = test::TestRequest::get().uri("/api/v1/tags").to_request();
    let tags: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(tags.as_array().map(Vec::len), Some(1));
    assert_eq!(tags[0]["name"], "rust");

    let req = test::TestRequest::get()
        .uri("/api/v1/tags/rust/posts")
        .to_request();
    let page: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["data"][0]["title"], "Shown");

    let req = test::TestRequest::delete()
        .uri(&tag_uri)
        .insert_header((header::AUTHORIZATION, auth.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/admin/posts/{}", shown["id"]))
        .insert_header((header::AUTHORIZATION, auth.clone()))
        .to_request();
    let post: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(post["tags"], json!([]));

    let req = test::TestRequest::get()
        .uri("/api/v1/tags/rust/posts")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::put()
        .uri(&tag_uri)
        .insert_header((header::AUTHORIZATION, auth))
        .set_json(json!({ "name": "gone" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_me_returns_token_admin() {
    let h = Harness::new().await;
    let app = app!(h.state.clone());

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/me")
        .insert_header((header::AUTHORIZATION, h.admin()))
        .to_request();
    let me: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(me["id"], h.admin_id);
    assert_eq!(me["email"], "jane@example.com");
    assert_eq!(me["roles"], json!(["admin"]));
}

#[actix_rt::test]
async fn test_request_id_is_echoed() {
    let h = Harness::new().await;
    let app = app!(h.state.clone());

    let req = test::TestRequest::get()
        .uri("/api/health")
        .insert_header(("X-Request-ID", "abc-123"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.headers().get("x-request-id").unwrap(), "abc-123");
}

#[cfg(feature = "rate-limit")]
#[actix_rt::test]
async fn test_public_api_is_rate_limited() {
    use std::time::Duration;

    use quill_infra::{InMemoryRateLimiter, RateLimitConfig};

    let h = Harness::new().await;
    let limiter: Arc<dyn RateLimiter> = Arc::new(InMemoryRateLimiter::new(RateLimitConfig {
        max_requests: 2,
        window: Duration::from_secs(60),
    }));
    let app = app!(h.state.clone().with_rate_limiter(limiter));

    for _ in 0..2 {
        let req = test::TestRequest::get().uri("/api/v1/posts").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get().uri("/api/v1/posts").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(resp.headers().contains_key(header::RETRY_AFTER));

    // Health and admin routes sit outside the limited scope.
    let req = test::TestRequest::get().uri("/api/health").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[cfg(feature = "rate-limit")]
#[actix_rt::test]
async fn test_rate_limiter_failure_fails_open() {
    use quill_core::ports::{RateLimitError, RateLimitResult};

    struct BrokenLimiter;

    #[async_trait::async_trait]
    impl RateLimiter for BrokenLimiter {
        async fn check(&self, _key: &str) -> Result<RateLimitResult, RateLimitError> {
            Err(RateLimitError::Backend("unreachable".to_string()))
        }
    }

    let h = Harness::new().await;
    let app = app!(h.state.clone().with_rate_limiter(Arc::new(BrokenLimiter)));

    let req = test::TestRequest::get().uri("/api/v1/posts").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}
