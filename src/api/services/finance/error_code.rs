//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};
use ts_rs::TS;

use crate::errors::FintrackError;

use super::types::TS_EXPORT_PATH;

/// API 错误码枚举
///
/// 使用 serde_repr 序列化为数字，ts-rs 自动生成 TypeScript 类型。
/// 按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 2000-2099: 认证错误
/// - 3000-3099: 流水错误
/// - 4000-4099: 预算错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[ts(rename = "ErrorCode")]
#[ts(repr(enum))]
#[repr(i32)]
pub enum ErrorCode {
    // 成功
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    Unauthorized = 1001,
    NotFound = 1004,
    InternalServerError = 1005,
    InvalidDateFormat = 1012,
    Conflict = 1013,
    ServiceUnavailable = 1030,

    // 认证错误 2000-2099
    AuthFailed = 2000,
    TokenInvalid = 2002,
    TokenMissing = 2003,
    RateLimitExceeded = 2004,
    UserAlreadyExists = 2005,
    UserNotFound = 2006,

    // 流水错误 3000-3099
    TransactionNotFound = 3000,
    TransactionInvalid = 3001,

    // 预算错误 4000-4099
    BudgetNotFound = 4000,
    BudgetInvalid = 4001,
}

/// 错误所属的接口域，决定 NotFound / Validation 等错误落到哪个错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorScope {
    General,
    Auth,
    Transaction,
    Budget,
}

impl ErrorCode {
    pub fn from_error(err: &FintrackError, scope: ErrorScope) -> Self {
        match (err, scope) {
            (FintrackError::DateParse(_), _) => ErrorCode::InvalidDateFormat,

            (FintrackError::Validation(_), ErrorScope::Transaction) => {
                ErrorCode::TransactionInvalid
            }
            (FintrackError::Validation(_), ErrorScope::Budget) => ErrorCode::BudgetInvalid,
            (FintrackError::Validation(_), _) => ErrorCode::BadRequest,

            (FintrackError::NotFound(_), ErrorScope::Transaction) => {
                ErrorCode::TransactionNotFound
            }
            (FintrackError::NotFound(_), ErrorScope::Budget) => ErrorCode::BudgetNotFound,
            (FintrackError::NotFound(_), ErrorScope::Auth) => ErrorCode::UserNotFound,
            (FintrackError::NotFound(_), ErrorScope::General) => ErrorCode::NotFound,

            (FintrackError::Conflict(_), ErrorScope::Auth) => ErrorCode::UserAlreadyExists,
            (FintrackError::Conflict(_), _) => ErrorCode::Conflict,

            (FintrackError::Unauthorized(_), ErrorScope::Auth) => ErrorCode::AuthFailed,
            (FintrackError::Unauthorized(_), _) => ErrorCode::Unauthorized,
            (FintrackError::Token(_), _) => ErrorCode::TokenInvalid,

            (FintrackError::Config(_), _)
            | (FintrackError::DatabaseConnection(_), _)
            | (FintrackError::DatabaseOperation(_), _)
            | (FintrackError::FileOperation(_), _)
            | (FintrackError::Serialization(_), _)
            | (FintrackError::PasswordHash(_), _) => ErrorCode::InternalServerError,
        }
    }
}
