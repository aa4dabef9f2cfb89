//! Auth API integration tests
//!
//! Registration, login, the current-user endpoint and bearer-token checks.

#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use serde_json::{Value, json};

use common::{PASSWORD, authed_get, test_env};

#[actix_rt::test]
async fn test_register_returns_token_and_user() {
    let env = test_env().await;
    let app = finance_app!(env);

    let req = TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "name": "Ada",
            "email": "Ada@Example.com",
            "password": PASSWORD,
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert!(!body["token"].as_str().unwrap().is_empty());
    assert_eq!(body["user"]["name"], "Ada");
    assert_eq!(body["user"]["email"], "ada@example.com");
    assert!(body["user"]["id"].is_string());
    assert!(body["user"].get("password").is_none());
    assert!(body["user"].get("passwordHash").is_none());
}

#[actix_rt::test]
async fn test_register_duplicate_email_conflicts() {
    let env = test_env().await;
    let app = finance_app!(env);
    register_user!(app, "dup@example.com");

    let req = TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "name": "Again",
            "email": "DUP@example.com",
            "password": PASSWORD,
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 2005);
    assert_eq!(body["message"], "User already exists");
}

#[actix_rt::test]
async fn test_register_validation_errors() {
    let env = test_env().await;
    let app = finance_app!(env);

    for payload in [
        json!({"name": "", "email": "a@example.com", "password": PASSWORD}),
        json!({"name": "A", "email": "not-an-email", "password": PASSWORD}),
        json!({"name": "A", "email": "a@example.com", "password": "123"}),
    ] {
        let req = TestRequest::post()
            .uri("/api/auth/register")
            .set_json(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], 1000);
    }
}

#[actix_rt::test]
async fn test_register_malformed_json() {
    let env = test_env().await;
    let app = finance_app!(env);

    let req = TestRequest::post()
        .uri("/api/auth/register")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 1000);
}

#[actix_rt::test]
async fn test_login_success_and_failures() {
    let env = test_env().await;
    let app = finance_app!(env);
    register_user!(app, "login@example.com");

    let req = TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({"email": "login@example.com", "password": PASSWORD}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["token"].is_string());
    assert_eq!(body["user"]["email"], "login@example.com");

    // 错误密码与未知邮箱返回相同信息
    for payload in [
        json!({"email": "login@example.com", "password": "wrong-password"}),
        json!({"email": "nobody@example.com", "password": PASSWORD}),
    ] {
        let req = TestRequest::post()
            .uri("/api/auth/login")
            .set_json(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], 2000);
        assert_eq!(body["message"], "Invalid credentials");
    }
}

#[actix_rt::test]
async fn test_me_returns_current_user() {
    let env = test_env().await;
    let app = finance_app!(env);
    let token = register_user!(app, "me@example.com");

    let resp = test::call_service(&app, authed_get("/api/auth/me", &token).to_request()).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["email"], "me@example.com");
    assert_eq!(body["user"]["name"], "Test User");
}

#[actix_rt::test]
async fn test_protected_routes_require_token() {
    let env = test_env().await;
    let app = finance_app!(env);

    for uri in ["/api/auth/me", "/api/transactions", "/api/budgets"] {
        let resp = test::call_service(&app, TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "uri: {}", uri);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], 2003);
        assert_eq!(body["message"], "No token provided");
    }
}

#[actix_rt::test]
async fn test_invalid_token_rejected() {
    let env = test_env().await;
    let app = finance_app!(env);

    let resp = test::call_service(
        &app,
        authed_get("/api/transactions", "not.a.jwt").to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 2002);
    assert_eq!(body["message"], "Invalid token");
}

#[actix_rt::test]
async fn test_token_for_deleted_user_is_not_found() {
    let env = test_env().await;
    let app = finance_app!(env);

    // 签名有效但用户不存在
    let token = fintrack::api::jwt::get_jwt_service()
        .generate_token("ghost-user")
        .unwrap();
    let resp = test::call_service(&app, authed_get("/api/auth/me", &token).to_request()).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 2006);
    assert_eq!(body["message"], "User not found");
}

#[actix_rt::test]
async fn test_login_rate_limit_returns_429_after_burst() {
    use fintrack::api::services::finance::{auth_routes_with, json_config};
    use fintrack::config::AuthConfig;

    let env = test_env().await;
    let auth = AuthConfig {
        login_burst: 2,
        login_seconds_per_request: 60,
        ..AuthConfig::default()
    };
    let app = test::init_service(
        actix_web::App::new()
            .app_data(actix_web::web::Data::new(env.storage.clone()))
            .service(
                actix_web::web::scope("/api")
                    .app_data(json_config())
                    .service(auth_routes_with(&auth)),
            ),
    )
    .await;

    let login_from = |ip: &str| {
        TestRequest::post()
            .uri("/api/auth/login")
            .peer_addr(format!("{}:4000", ip).parse().unwrap())
            .set_json(json!({ "email": "nobody@example.com", "password": PASSWORD }))
            .to_request()
    };

    for _ in 0..2 {
        let resp = test::call_service(&app, login_from("10.0.0.1")).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    let resp = test::call_service(&app, login_from("10.0.0.1")).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);

    // 其他 IP 有独立的令牌桶
    let resp = test::call_service(&app, login_from("10.0.0.2")).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
