//! Finance API 帮助函数

use actix_web::error::{InternalError, JsonPayloadError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Serialize;
use tracing::{error, warn};

use crate::errors::FintrackError;

use super::error_code::{ErrorCode, ErrorScope};
use super::types::{ErrorResponse, MessageResponse};

/// 对外暴露的 500 文案，细节只写日志
pub const SERVER_ERROR_MESSAGE: &str = "Server error";

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(body)
}

/// 构建成功响应
pub fn success_response<T: Serialize>(body: T) -> HttpResponse {
    json_response(StatusCode::OK, &body)
}

/// 构建 201 Created 响应
pub fn created_response<T: Serialize>(body: T) -> HttpResponse {
    json_response(StatusCode::CREATED, &body)
}

pub fn message_response(message: &str) -> HttpResponse {
    success_response(MessageResponse {
        message: message.to_string(),
    })
}

/// 构建错误响应
pub fn error_response(status: StatusCode, code: ErrorCode, message: &str) -> HttpResponse {
    json_response(
        status,
        &ErrorResponse {
            code,
            message: message.to_string(),
        },
    )
}

/// 从 FintrackError 构建错误响应（自动映射 HTTP 状态码和 ErrorCode）
///
/// 服务端错误只返回通用文案。
pub fn error_from_fintrack(err: &FintrackError, scope: ErrorScope) -> HttpResponse {
    let status = err.http_status();
    let code = ErrorCode::from_error(err, scope);

    if err.is_internal() {
        error!("{} [{}]: {}", err.error_type(), err.code(), err.message());
        error_response(status, code, SERVER_ERROR_MESSAGE)
    } else {
        warn!("Request rejected ({}): {}", status.as_u16(), err.message());
        error_response(status, code, err.message())
    }
}

/// 统一 Result → HttpResponse 转换
///
/// 成功时由 `ok` 构建响应，失败时自动映射 FintrackError。
pub fn api_result<T, F>(result: Result<T, FintrackError>, scope: ErrorScope, ok: F) -> HttpResponse
where
    F: FnOnce(T) -> HttpResponse,
{
    match result {
        Ok(data) => ok(data),
        Err(e) => error_from_fintrack(&e, scope),
    }
}

/// 请求体 JSON 解析失败 → 400 + 统一错误体
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = format!("Invalid request body: {}", err);
    warn!("{}", message);
    let response = error_response(StatusCode::BAD_REQUEST, ErrorCode::BadRequest, &message);
    InternalError::from_response(err, response).into()
}

/// Query string 解析失败 → 400 + 统一错误体
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = format!("Invalid query parameters: {}", err);
    warn!("{}", message);
    let response = error_response(StatusCode::BAD_REQUEST, ErrorCode::BadRequest, &message);
    InternalError::from_response(err, response).into()
}

pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error_handler)
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(query_error_handler)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body_json(resp: HttpResponse) -> serde_json::Value {
        let bytes = to_bytes(resp.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[actix_rt::test]
    async fn test_internal_error_is_sanitized() {
        let err = FintrackError::database_operation("UNIQUE constraint failed: secret detail");
        let resp = error_from_fintrack(&err, ErrorScope::Transaction);
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(resp).await;
        assert_eq!(json["message"], SERVER_ERROR_MESSAGE);
        assert_eq!(json["code"], ErrorCode::InternalServerError as i32);
    }

    #[actix_rt::test]
    async fn test_validation_error_keeps_message() {
        let err = FintrackError::validation("Description is required");
        let resp = error_from_fintrack(&err, ErrorScope::Transaction);
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let json = body_json(resp).await;
        assert_eq!(json["message"], "Description is required");
        assert_eq!(json["code"], ErrorCode::TransactionInvalid as i32);
    }

    #[actix_rt::test]
    async fn test_not_found_status() {
        let resp = error_from_fintrack(
            &FintrackError::not_found("Budget not found"),
            ErrorScope::Budget,
        );
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_rt::test]
    async fn test_api_result_ok_branch() {
        let resp = api_result(Ok::<_, FintrackError>(5), ErrorScope::General, |n| {
            created_response(MessageResponse {
                message: n.to_string(),
            })
        });
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(body_json(resp).await["message"], "5");
    }

    #[actix_rt::test]
    async fn test_message_response() {
        let resp = message_response("Budget deleted successfully");
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            body_json(resp).await["message"],
            "Budget deleted successfully"
        );
    }
}
