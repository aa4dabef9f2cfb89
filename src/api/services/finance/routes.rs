//! Finance API 路由配置
//!
//! 固定路径（stats/summary、alerts/check 等）必须注册在 `{id}` 之前。

use actix_web::body::{BoxBody, EitherBody};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::web;

use crate::api::middleware::UserAuth;
use crate::config::AuthConfig;

use super::auth::{current_auth_config, login, login_rate_limiter, me, register};
use super::budgets::{
    check_alerts, create_budget, delete_budget, get_budget, list_budgets, update_budget,
};
use super::transactions::{
    create_transaction, delete_transaction, get_category_breakdown, get_summary, get_transaction,
    get_trends, list_transactions, update_transaction,
};

/// 认证路由 `/auth`
///
/// 包含：
/// - POST /auth/register - 注册（带限流）
/// - POST /auth/login - 登录（带限流）
/// - GET /auth/me - 当前用户
pub fn auth_routes() -> actix_web::Scope {
    auth_routes_with(&current_auth_config())
}

/// 使用给定限流配置构建 `/auth` 路由
pub fn auth_routes_with(auth: &AuthConfig) -> actix_web::Scope {
    web::scope("/auth")
        .route(
            "/register",
            web::post().to(register).wrap(login_rate_limiter(auth)),
        )
        .route(
            "/login",
            web::post().to(login).wrap(login_rate_limiter(auth)),
        )
        .route("/me", web::get().to(me).wrap(UserAuth))
}

/// 流水路由 `/transactions`
pub fn transactions_routes() -> actix_web::Scope<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<EitherBody<BoxBody>>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    web::scope("/transactions")
        .wrap(UserAuth)
        .route("", web::get().to(list_transactions))
        .route("", web::post().to(create_transaction))
        .route("/stats/summary", web::get().to(get_summary))
        .route("/stats/categories", web::get().to(get_category_breakdown))
        .route("/trends", web::get().to(get_trends))
        .route("/{id}", web::get().to(get_transaction))
        .route("/{id}", web::put().to(update_transaction))
        .route("/{id}", web::delete().to(delete_transaction))
}

/// 预算路由 `/budgets`
pub fn budgets_routes() -> actix_web::Scope<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<EitherBody<BoxBody>>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    web::scope("/budgets")
        .wrap(UserAuth)
        .route("", web::get().to(list_budgets))
        .route("", web::post().to(create_budget))
        .route("/alerts/check", web::get().to(check_alerts))
        .route("/{id}", web::get().to(get_budget))
        .route("/{id}", web::put().to(update_budget))
        .route("/{id}", web::delete().to(delete_budget))
}
