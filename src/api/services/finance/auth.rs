//! 账户认证端点

use actix_governor::{Governor, GovernorConfigBuilder, KeyExtractor, SimpleKeyExtractionError};
use actix_web::dev::ServiceRequest;
use actix_web::{HttpResponse, Responder, Result as ActixResult, web};
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tracing::debug;

use crate::api::middleware::AuthenticatedUser;
use crate::config::{AuthConfig, try_get_config};
use crate::services::{AuthResult, AuthService, LoginRequest, RegisterRequest};
use crate::storage::SeaOrmStorage;

use super::error_code::ErrorScope;
use super::helpers::{api_result, created_response, success_response};
use super::types::{AuthResponse, UserResponse};

impl From<AuthResult> for AuthResponse {
    fn from(result: AuthResult) -> Self {
        Self {
            token: result.token,
            user: result.user.into(),
        }
    }
}

/// 基于连接 IP 的限流 key 提取器
///
/// 拿不到 peer 地址时（如 Unix socket）所有请求共用一个桶。
#[derive(Clone, Copy)]
pub struct LoginKeyExtractor;

impl KeyExtractor for LoginKeyExtractor {
    type Key = String;
    type KeyExtractionError = SimpleKeyExtractionError<&'static str>;

    fn extract(&self, req: &ServiceRequest) -> Result<Self::Key, Self::KeyExtractionError> {
        let key = req
            .peer_addr()
            .map(|addr| addr.ip().to_string())
            .unwrap_or_else(|| "unknown".to_string());
        Ok(key)
    }
}

/// 读取当前认证配置，未加载时使用默认值
pub fn current_auth_config() -> AuthConfig {
    try_get_config()
        .map(|c| c.auth.clone())
        .unwrap_or_else(AuthConfig::default)
}

/// 创建登录/注册限流器
///
/// 每 `login_seconds_per_request` 秒补充一个令牌，突发最多 `login_burst` 次请求，
/// 超限返回 HTTP 429 Too Many Requests
pub fn login_rate_limiter(auth: &AuthConfig) -> Governor<LoginKeyExtractor, NoOpMiddleware> {
    let seconds_per_request = auth.login_seconds_per_request.max(1);
    let burst = auth.login_burst.max(1);

    // 两个参数都已 clamp 到 >= 1，finish() 只会在其为 0 时返回 None
    let config = GovernorConfigBuilder::default()
        .seconds_per_request(seconds_per_request)
        .burst_size(burst)
        .key_extractor(LoginKeyExtractor)
        .finish()
        .expect("Invalid rate limit config");

    debug!(
        "Login rate limiter created: 1 req/{}s, burst {}",
        seconds_per_request, burst
    );
    Governor::new(&config)
}

/// POST /auth/register
pub async fn register(
    body: web::Json<RegisterRequest>,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    let service = AuthService::new(storage.get_ref().clone());
    let result = service.register(body.into_inner()).await;

    Ok(api_result(result, ErrorScope::Auth, |r| {
        created_response(AuthResponse::from(r))
    }))
}

/// POST /auth/login
pub async fn login(
    body: web::Json<LoginRequest>,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    let service = AuthService::new(storage.get_ref().clone());
    let result = service.login(body.into_inner()).await;

    Ok(api_result(result, ErrorScope::Auth, |r| {
        success_response(AuthResponse::from(r))
    }))
}

/// GET /auth/me
pub async fn me(
    user: AuthenticatedUser,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<HttpResponse> {
    let service = AuthService::new(storage.get_ref().clone());
    let result = service.current_user(&user.user_id).await;

    Ok(api_result(result, ErrorScope::Auth, |u| {
        success_response(UserResponse { user: u.into() })
    }))
}
