use std::sync::Arc;

use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use chrono::{Duration, Utc};
use quill_core::domain::{Category, Post, Role, User};
use quill_core::ports::{Repositories, TokenService};
use quill_infra::{InMemoryStore, JwtConfig, JwtTokenService};
use serde_json::{Value, json};
use uuid::Uuid;

use super::configure_routes;
use crate::observability::RequestIdMiddleware;
use crate::state::AppState;

struct Harness {
    repos: Repositories,
    tokens: Arc<dyn TokenService>,
    user: User,
    admin: User,
    category: Category,
}

impl Harness {
    async fn new() -> Self {
        let repos = Arc::new(InMemoryStore::new()).repositories();
        let user = repos
            .users
            .insert(User::new("Ada".into(), "ada@example.com".into(), Role::User))
            .await
            .unwrap();
        let admin = repos
            .users
            .insert(User::new("Root".into(), "root@example.com".into(), Role::Admin))
            .await
            .unwrap();
        let category = repos
            .categories
            .insert(Category::new("Programming".into()))
            .await
            .unwrap();
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(JwtConfig {
            secret: "handler-tests".into(),
            expiration_hours: 1,
            issuer: "quill-tests".into(),
        }));

        Self {
            repos,
            tokens,
            user,
            admin,
            category,
        }
    }

    fn bearer(&self, user: &User) -> (&'static str, String) {
        let token = self
            .tokens
            .generate_token(user.id, &user.name, user.role)
            .unwrap();
        ("Authorization", format!("Bearer {token}"))
    }

    async fn seed_posts(&self, count: i64) -> Vec<Post> {
        let mut posts = Vec::new();
        for i in 0..count {
            let mut post = Post::new(
                self.user.id,
                self.category.id,
                format!("post {i}"),
                "hello there".into(),
            );
            post.created_at = Utc::now() - Duration::minutes(i);
            posts.push(self.repos.posts.insert(post).await.unwrap());
        }
        posts
    }
}

/// Initialise the full route table over the harness' store and token service.
macro_rules! app {
    ($h:expr) => {
        test::init_service(
            App::new()
                .wrap(RequestIdMiddleware)
                .app_data(web::Data::new(AppState::from_repositories(
                    &$h.repos, "memory",
                )))
                .app_data(web::Data::new($h.tokens.clone()))
                .configure(configure_routes),
        )
        .await
    };
}

async fn body(resp: ServiceResponse) -> Value {
    test::read_body_json(resp).await
}

#[actix_web::test]
async fn test_health_reports_storage() {
    let h = Harness::new().await;
    let app = app!(h);

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
    let json = body(resp).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["storage"], "memory");
}

#[actix_web::test]
async fn test_request_id_is_echoed() {
    let h = Harness::new().await;
    let app = app!(h);

    let req = test::TestRequest::get()
        .uri("/api/health")
        .insert_header(("X-Request-ID", "abc-123"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    let echoed = resp.headers().get("x-request-id").unwrap();
    assert_eq!(echoed.to_str().unwrap(), "abc-123");
}

#[actix_web::test]
async fn test_list_posts_second_page() {
    let h = Harness::new().await;
    h.seed_posts(15).await;
    let app = app!(h);

    let req = test::TestRequest::get()
        .uri("/api/v1/posts?page=2&limit=10")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body(resp).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["count"], 5);
    assert_eq!(json["total"], 15);
    assert_eq!(json["pagination"], json!({ "prev": { "page": 1, "limit": 10 } }));
    assert_eq!(json["data"][0]["title"], "post 10");
    assert_eq!(json["data"][0]["author"]["name"], "Ada");
    assert_eq!(json["data"][0]["category"]["name"], "Programming");
    assert_eq!(json["data"][0]["comments"], json!([]));
}

#[actix_web::test]
async fn test_list_posts_malformed_paging_uses_defaults() {
    let h = Harness::new().await;
    h.seed_posts(12).await;
    let app = app!(h);

    let req = test::TestRequest::get()
        .uri("/api/v1/posts?page=abc&limit=-3")
        .to_request();
    let json = body(test::call_service(&app, req).await).await;

    assert_eq!(json["count"], 10);
    assert_eq!(json["total"], 12);
    assert_eq!(json["pagination"], json!({ "next": { "page": 2, "limit": 10 } }));
}

#[actix_web::test]
async fn test_list_posts_oversized_paging_uses_defaults() {
    let h = Harness::new().await;
    h.seed_posts(12).await;
    let app = app!(h);

    for uri in [
        "/api/v1/posts?limit=9223372036854775808",
        "/api/v1/posts?page=3&limit=9223372036854775807",
        "/api/v1/posts?page=18446744073709551615&limit=2",
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK, "{uri}");
        let json = body(resp).await;
        assert_eq!(json["count"], 10, "{uri}");
        assert_eq!(json["pagination"], json!({ "next": { "page": 2, "limit": 10 } }));
    }
}

#[actix_web::test]
async fn test_list_posts_rejects_bad_author() {
    let h = Harness::new().await;
    let app = app!(h);

    let req = test::TestRequest::get()
        .uri("/api/v1/posts?author=nobody")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = body(resp).await;
    assert_eq!(json["status"], 400);
    assert_eq!(json["title"], "Bad Request");
}

#[actix_web::test]
async fn test_search_requires_query() {
    let h = Harness::new().await;
    let app = app!(h);

    let req = test::TestRequest::get()
        .uri("/api/v1/posts/search")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body(resp).await["detail"], "Please provide a search query");
}

#[actix_web::test]
async fn test_search_matches_without_comments() {
    let h = Harness::new().await;
    h.seed_posts(2).await;
    let app = app!(h);

    let req = test::TestRequest::get()
        .uri("/api/v1/posts/search?query=HELLO")
        .to_request();
    let json = body(test::call_service(&app, req).await).await;

    assert_eq!(json["count"], 2);
    assert!(json.get("pagination").is_none());
    assert!(json["data"][0].get("comments").is_none());
}

#[actix_web::test]
async fn test_like_requires_token() {
    let h = Harness::new().await;
    let post = h.seed_posts(1).await.remove(0);
    let app = app!(h);

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/posts/{}/like", post.id))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_like_toggles() {
    let h = Harness::new().await;
    let post = h.seed_posts(1).await.remove(0);
    let app = app!(h);
    let uri = format!("/api/v1/posts/{}/like", post.id);

    let like = test::TestRequest::put()
        .uri(&uri)
        .insert_header(h.bearer(&h.user))
        .to_request();
    let json = body(test::call_service(&app, like).await).await;
    assert_eq!(json["data"]["likes"], json!([h.user.id]));

    let unlike = test::TestRequest::put()
        .uri(&uri)
        .insert_header(h.bearer(&h.user))
        .to_request();
    let json = body(test::call_service(&app, unlike).await).await;
    assert_eq!(json["data"]["likes"], json!([]));
}

#[actix_web::test]
async fn test_like_missing_post() {
    let h = Harness::new().await;
    let app = app!(h);

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/posts/{}/like", Uuid::new_v4()))
        .insert_header(h.bearer(&h.user))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_malformed_path_id() {
    let h = Harness::new().await;
    let app = app!(h);

    let req = test::TestRequest::get()
        .uri("/api/v1/posts/not-a-uuid")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_create_post() {
    let h = Harness::new().await;
    let app = app!(h);

    let missing = test::TestRequest::post()
        .uri("/api/v1/posts")
        .insert_header(h.bearer(&h.user))
        .set_json(json!({ "title": "Only a title" }))
        .to_request();
    let resp = test::call_service(&app, missing).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let ok = test::TestRequest::post()
        .uri("/api/v1/posts")
        .insert_header(h.bearer(&h.user))
        .set_json(json!({
            "title": "First",
            "content": "Hello",
            "category": h.category.id,
            "tags": ["intro"],
        }))
        .to_request();
    let resp = test::call_service(&app, ok).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let json = body(resp).await;
    assert_eq!(json["data"]["status"], "published");
    assert_eq!(json["data"]["author"]["name"], "Ada");
}

#[actix_web::test]
async fn test_malformed_json_body() {
    let h = Harness::new().await;
    let app = app!(h);

    let req = test::TestRequest::post()
        .uri("/api/v1/posts")
        .insert_header(h.bearer(&h.user))
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_category_writes() {
    let h = Harness::new().await;
    let app = app!(h);

    let as_user = test::TestRequest::post()
        .uri("/api/v1/categories")
        .insert_header(h.bearer(&h.user))
        .set_json(json!({ "name": "Travel" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, as_user).await.status(),
        StatusCode::UNAUTHORIZED
    );

    let duplicate = test::TestRequest::post()
        .uri("/api/v1/categories")
        .insert_header(h.bearer(&h.admin))
        .set_json(json!({ "name": "Programming" }))
        .to_request();
    let resp = test::call_service(&app, duplicate).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body(resp).await["detail"],
        "Category with this name already exists"
    );
}

#[actix_web::test]
async fn test_report_rejects_unknown_reason() {
    let h = Harness::new().await;
    let post = h.seed_posts(1).await.remove(0);
    let app = app!(h);

    let req = test::TestRequest::post()
        .uri("/api/v1/reports")
        .insert_header(h.bearer(&h.user))
        .set_json(json!({
            "contentType": "Post",
            "reportedContent": post.id,
            "reason": "boring",
            "description": "meh",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_report_filed_and_listed() {
    let h = Harness::new().await;
    let post = h.seed_posts(1).await.remove(0);
    let app = app!(h);

    let file = test::TestRequest::post()
        .uri("/api/v1/reports")
        .insert_header(h.bearer(&h.user))
        .set_json(json!({
            "contentType": "Post",
            "reportedContent": post.id,
            "reason": "hate_speech",
            "description": "not ok",
        }))
        .to_request();
    let resp = test::call_service(&app, file).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let list = test::TestRequest::get()
        .uri("/api/v1/reports?status=pending")
        .insert_header(h.bearer(&h.admin))
        .to_request();
    let json = body(test::call_service(&app, list).await).await;
    assert_eq!(json["count"], 1);
    assert_eq!(json["data"][0]["reason"], "hate_speech");
}
