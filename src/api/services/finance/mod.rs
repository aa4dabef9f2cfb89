//! Finance API 服务模块
//!
//! 该模块包含 `/api` 下的所有业务端点：
//! - 认证（注册、登录、当前用户）
//! - 流水 CRUD 与统计
//! - 预算 CRUD 与提醒

pub mod auth;
mod budgets;
pub mod error_code;
mod helpers;
pub mod routes;
mod transactions;
mod types;

// 重新导出类型
pub use types::*;

// 重新导出帮助函数
pub use helpers::{
    SERVER_ERROR_MESSAGE, api_result, error_from_fintrack, error_response, json_config,
    query_config, success_response,
};

// 重新导出错误码
pub use error_code::{ErrorCode, ErrorScope};

pub use routes::{auth_routes, auth_routes_with, budgets_routes, transactions_routes};

use actix_web::web;

/// `/api` 下的业务路由
pub fn api_routes() -> actix_web::Scope {
    web::scope("/api")
        .app_data(json_config())
        .app_data(query_config())
        .service(auth_routes())
        .service(transactions_routes())
        .service(budgets_routes())
        .service(super::health::health_routes())
}
