//! `/api` 代理接口集成测试
//!
//! 上游（邮件、国家列表、GitHub）全部由 wiremock 替代。

use actix_web::App;
use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use portfolio::config::StaticConfig;
use portfolio::runtime::lifetime::startup::{StartupContext, build_context};
use portfolio::runtime::modes::server::configure_app;
use portfolio::storage::StorageFactory;

const EMAIL_KEY: &str = "re_test_key";
const GITHUB_TOKEN: &str = "ghp_test_token";

fn mock_config(server: &MockServer, dir: &TempDir) -> StaticConfig {
    let mut config = StaticConfig::default();
    config.database.database_url =
        format!("sqlite://{}?mode=rwc", dir.path().join("api.db").display());
    config.contact.api_url = format!("{}/emails", server.uri());
    config.contact.api_key = EMAIL_KEY.to_string();
    config.contact.to = "owner@example.com".to_string();
    config.contact.burst_size = 10;
    config.countries.api_url = format!("{}/countries", server.uri());
    config.github.api_url = format!("{}/graphql", server.uri());
    config.github.token = GITHUB_TOKEN.to_string();
    config.github.username = "octocat".to_string();
    config.upstream.timeout_secs = 5;
    config.upstream.cache_ttl_secs = 60;
    config
}

async fn context(config: &StaticConfig) -> StartupContext {
    let storage = StorageFactory::create_with(&config.database)
        .await
        .expect("创建存储失败");
    build_context(config, storage).expect("构建上下文失败")
}

fn contact_request(body: Value) -> TestRequest {
    TestRequest::post()
        .uri("/api/contact")
        .peer_addr("203.0.113.7:40000".parse().unwrap())
        .set_json(body)
}

fn valid_contact() -> Value {
    json!({
        "name": "Jane Doe",
        "email": "jane@example.com",
        "message": "Hi! <b>Let's</b> work together.",
    })
}

// =============================================================================
// POST /api/contact
// =============================================================================

#[actix_rt::test]
async fn test_contact_success_returns_upstream_id() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let ctx = context(&mock_config(&server, &dir)).await;

    Mock::given(method("POST"))
        .and(path("/emails"))
        .and(header("authorization", format!("Bearer {}", EMAIL_KEY).as_str()))
        .and(body_partial_json(json!({
            "to": ["owner@example.com"],
            "reply_to": "jane@example.com",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "msg_123"})))
        .expect(1)
        .mount(&server)
        .await;

    let app = test::init_service(App::new().configure(|cfg| configure_app(cfg, &ctx))).await;
    let resp = test::call_service(&app, contact_request(valid_contact()).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let json: Value = test::read_body_json(resp).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["id"], "msg_123");
}

#[actix_rt::test]
async fn test_contact_unverified_domain_is_403() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let ctx = context(&mock_config(&server, &dir)).await;

    Mock::given(method("POST"))
        .and(path("/emails"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "statusCode": 403,
            "message": "The example.org domain is not verified. Please verify your domain.",
        })))
        .mount(&server)
        .await;

    let app = test::init_service(App::new().configure(|cfg| configure_app(cfg, &ctx))).await;
    let resp = test::call_service(&app, contact_request(valid_contact()).to_request()).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let json: Value = test::read_body_json(resp).await;
    assert_eq!(json["success"], false);
}

#[actix_rt::test]
async fn test_contact_upstream_failure_is_500() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let ctx = context(&mock_config(&server, &dir)).await;

    Mock::given(method("POST"))
        .and(path("/emails"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let app = test::init_service(App::new().configure(|cfg| configure_app(cfg, &ctx))).await;
    let resp = test::call_service(&app, contact_request(valid_contact()).to_request()).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json: Value = test::read_body_json(resp).await;
    assert_eq!(json["success"], false);
    assert!(!json["message"].as_str().unwrap().contains("bad gateway"));
}

#[actix_rt::test]
async fn test_contact_validation_never_reaches_upstream() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let ctx = context(&mock_config(&server, &dir)).await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let app = test::init_service(App::new().configure(|cfg| configure_app(cfg, &ctx))).await;

    let resp = test::call_service(
        &app,
        contact_request(json!({"name": "Jane", "email": "not-an-email", "message": "hi"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp =
        test::call_service(&app, contact_request(json!({"name": "Jane"})).to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json: Value = test::read_body_json(resp).await;
    assert_eq!(json["success"], false);

    let req = TestRequest::post()
        .uri("/api/contact")
        .peer_addr("203.0.113.7:40000".parse().unwrap())
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{oops")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json: Value = test::read_body_json(resp).await;
    assert_eq!(json["success"], false);
}

#[actix_rt::test]
async fn test_contact_is_rate_limited_per_client() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let mut config = mock_config(&server, &dir);
    config.contact.burst_size = 1;
    config.contact.seconds_per_request = 60;
    let ctx = context(&config).await;

    Mock::given(method("POST"))
        .and(path("/emails"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "msg_1"})))
        .expect(1)
        .mount(&server)
        .await;

    let app = test::init_service(App::new().configure(|cfg| configure_app(cfg, &ctx))).await;

    let resp = test::call_service(&app, contact_request(valid_contact()).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(&app, contact_request(valid_contact()).to_request()).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    let json: Value = test::read_body_json(resp).await;
    assert_eq!(json["success"], false);
    assert!(json["message"].as_str().unwrap().starts_with("Too many requests"));
}

#[actix_rt::test]
async fn test_contact_body_over_limit_is_rejected() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let mut config = mock_config(&server, &dir);
    config.server.json_limit_kb = 1;
    let ctx = context(&config).await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let app = test::init_service(App::new().configure(|cfg| configure_app(cfg, &ctx))).await;

    // 消息本身合法，只是超过了请求体上限
    let body = json!({
        "name": "Jane Doe",
        "email": "jane@example.com",
        "message": "x".repeat(4000),
    });
    let resp = test::call_service(&app, contact_request(body).to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json: Value = test::read_body_json(resp).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Invalid request body");
}

// =============================================================================
// GET /api/countries
// =============================================================================

#[actix_rt::test]
async fn test_countries_are_transformed_sorted_and_cached() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let ctx = context(&mock_config(&server, &dir)).await;

    Mock::given(method("GET"))
        .and(path("/countries"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "name": {"common": "Norway", "official": "Kingdom of Norway"},
                "cca2": "NO", "cca3": "NOR",
                "flags": {"svg": "https://flags/no.svg", "png": "https://flags/no.png"},
                "idd": {"root": "+4", "suffixes": ["7"]},
                "region": "Europe", "capital": ["Oslo"], "population": 5379475
            },
            {
                "name": {"common": "albania", "official": "Republic of Albania"},
                "cca2": "AL", "cca3": "ALB",
                "flags": {"png": "https://flags/al.png"},
                "idd": {},
                "region": "Europe", "capital": [], "population": 2837743
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let app = test::init_service(App::new().configure(|cfg| configure_app(cfg, &ctx))).await;

    let req = TestRequest::get().uri("/api/countries").to_request();
    let json: Value = test::call_and_read_body_json(&app, req).await;
    let list = json.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["name"], "albania");
    assert_eq!(list[0]["flag"], "https://flags/al.png");
    assert!(list[0]["dialCode"].is_null());
    assert!(list[0]["capital"].is_null());
    assert_eq!(list[1]["code"], "NO");
    assert_eq!(list[1]["dialCode"], "+47");
    assert_eq!(list[1]["officialName"], "Kingdom of Norway");

    // 第二次命中缓存，上游只被调用一次
    let req = TestRequest::get().uri("/api/countries").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn test_countries_non_array_is_500_and_not_cached() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let ctx = context(&mock_config(&server, &dir)).await;

    Mock::given(method("GET"))
        .and(path("/countries"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": 404})))
        .expect(2)
        .mount(&server)
        .await;

    let app = test::init_service(App::new().configure(|cfg| configure_app(cfg, &ctx))).await;

    for _ in 0..2 {
        let req = TestRequest::get().uri("/api/countries").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json: Value = test::read_body_json(resp).await;
        assert!(json["error"].is_string());
    }
}

#[actix_rt::test]
async fn test_countries_upstream_status_error_is_500() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let ctx = context(&mock_config(&server, &dir)).await;

    Mock::given(method("GET"))
        .and(path("/countries"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .expect(2)
        .mount(&server)
        .await;

    let app = test::init_service(App::new().configure(|cfg| configure_app(cfg, &ctx))).await;

    for _ in 0..2 {
        let req = TestRequest::get().uri("/api/countries").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json: Value = test::read_body_json(resp).await;
        assert!(json["error"].is_string());
    }
}

#[actix_rt::test]
async fn test_countries_unreachable_upstream_is_500() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let mut config = mock_config(&server, &dir);
    config.countries.api_url = "http://127.0.0.1:1/countries".to_string();
    let ctx = context(&config).await;

    let app = test::init_service(App::new().configure(|cfg| configure_app(cfg, &ctx))).await;
    let req = TestRequest::get().uri("/api/countries").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json: Value = test::read_body_json(resp).await;
    assert!(json["error"].is_string());
}

// =============================================================================
// GET /api/github-projects
// =============================================================================

#[actix_rt::test]
async fn test_github_projects_passthrough() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let ctx = context(&mock_config(&server, &dir)).await;

    let upstream = json!({
        "data": {"user": {"pinnedItems": {"nodes": [
            {"name": "portfolio", "stargazerCount": 12}
        ]}}}
    });
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(header("authorization", format!("Bearer {}", GITHUB_TOKEN).as_str()))
        .and(body_partial_json(json!({"variables": {"login": "octocat"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(upstream.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let app = test::init_service(App::new().configure(|cfg| configure_app(cfg, &ctx))).await;
    let req = TestRequest::get().uri("/api/github-projects").to_request();
    let json: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(json, upstream);
}

#[actix_rt::test]
async fn test_github_without_token_is_500() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let mut config = mock_config(&server, &dir);
    config.github.token = String::new();
    let ctx = context(&config).await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let app = test::init_service(App::new().configure(|cfg| configure_app(cfg, &ctx))).await;
    let req = TestRequest::get().uri("/api/github-projects").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json: Value = test::read_body_json(resp).await;
    assert!(json["error"].is_string());
}

#[actix_rt::test]
async fn test_github_upstream_error_is_500() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let ctx = context(&mock_config(&server, &dir)).await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Bad credentials"})),
        )
        .mount(&server)
        .await;

    let app = test::init_service(App::new().configure(|cfg| configure_app(cfg, &ctx))).await;
    let req = TestRequest::get().uri("/api/github-projects").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[actix_rt::test]
async fn test_github_graphql_errors_are_500_and_not_cached() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let ctx = context(&mock_config(&server, &dir)).await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [{"type": "NOT_FOUND", "message": "Could not resolve to a User"}]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let app = test::init_service(App::new().configure(|cfg| configure_app(cfg, &ctx))).await;

    for _ in 0..2 {
        let req = TestRequest::get().uri("/api/github-projects").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json: Value = test::read_body_json(resp).await;
        assert!(json["error"].is_string());
    }
}
