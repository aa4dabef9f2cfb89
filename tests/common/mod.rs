//! Shared setup for the HTTP integration tests
//!
//! Each test gets its own SQLite file so tests can run in parallel.

#![allow(dead_code, unused_macros)]

use std::sync::{Arc, Once};

use actix_web::test::TestRequest;
use serde_json::Value;
use tempfile::TempDir;

use fintrack::config::{DatabaseConfig, StaticConfig, set_config};
use fintrack::storage::{SeaOrmStorage, StorageFactory};

pub const TEST_JWT_SECRET: &str = "integration_test_secret_key_32b!";
pub const PASSWORD: &str = "secret123";

static INIT: Once = Once::new();

/// 安装确定性配置（高限流额度，固定 JWT 密钥）
pub fn init_test_config() {
    INIT.call_once(|| {
        let mut config = StaticConfig::default();
        config.auth.jwt_secret = TEST_JWT_SECRET.to_string();
        config.auth.login_burst = 1000;
        config.auth.login_seconds_per_request = 1;
        set_config(config);
    });
}

pub struct TestEnv {
    _dir: TempDir,
    pub storage: Arc<SeaOrmStorage>,
}

pub async fn test_env() -> TestEnv {
    init_test_config();

    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("fintrack_test.db");
    let db_config = DatabaseConfig {
        database_url: format!("sqlite://{}?mode=rwc", db_path.display()),
        ..DatabaseConfig::default()
    };

    let storage = StorageFactory::create_with(&db_config)
        .await
        .expect("Failed to create storage");

    TestEnv { _dir: dir, storage }
}

/// 构建与生产一致的 App（含 RequestId 中间件）

macro_rules! finance_app {
    ($env:expr) => {{
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(fintrack::api::middleware::RequestIdMiddleware)
                .configure(fintrack::runtime::modes::configure_app(
                    $env.storage.clone(),
                    fintrack::api::services::AppStartTime::now(),
                )),
        )
        .await
    }};
}

/// 注册用户并返回 token

macro_rules! register_user {
    ($app:expr, $email:expr) => {{
        let req = actix_web::test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(serde_json::json!({
                "name": "Test User",
                "email": $email,
                "password": $crate::common::PASSWORD,
            }))
            .to_request();
        let resp = actix_web::test::call_service(&$app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED);
        let body: serde_json::Value = actix_web::test::read_body_json(resp).await;
        body["token"]
            .as_str()
            .expect("token missing from register response")
            .to_string()
    }};
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

pub fn authed_get(uri: &str, token: &str) -> TestRequest {
    TestRequest::get().uri(uri).insert_header(bearer(token))
}

pub fn authed_post(uri: &str, token: &str, body: Value) -> TestRequest {
    TestRequest::post()
        .uri(uri)
        .insert_header(bearer(token))
        .set_json(body)
}

pub fn authed_put(uri: &str, token: &str, body: Value) -> TestRequest {
    TestRequest::put()
        .uri(uri)
        .insert_header(bearer(token))
        .set_json(body)
}

pub fn authed_delete(uri: &str, token: &str) -> TestRequest {
    TestRequest::delete().uri(uri).insert_header(bearer(token))
}
