use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone)]
pub enum FintrackError {
    Config(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    FileOperation(String),
    Validation(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
    Serialization(String),
    DateParse(String),
    PasswordHash(String),
    Token(String),
}

impl FintrackError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            FintrackError::Config(_) => "E001",
            FintrackError::DatabaseConnection(_) => "E002",
            FintrackError::DatabaseOperation(_) => "E003",
            FintrackError::FileOperation(_) => "E004",
            FintrackError::Validation(_) => "E005",
            FintrackError::NotFound(_) => "E006",
            FintrackError::Conflict(_) => "E007",
            FintrackError::Unauthorized(_) => "E008",
            FintrackError::Serialization(_) => "E009",
            FintrackError::DateParse(_) => "E010",
            FintrackError::PasswordHash(_) => "E011",
            FintrackError::Token(_) => "E012",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            FintrackError::Config(_) => "Configuration Error",
            FintrackError::DatabaseConnection(_) => "Database Connection Error",
            FintrackError::DatabaseOperation(_) => "Database Operation Error",
            FintrackError::FileOperation(_) => "File Operation Error",
            FintrackError::Validation(_) => "Validation Error",
            FintrackError::NotFound(_) => "Resource Not Found",
            FintrackError::Conflict(_) => "Conflict",
            FintrackError::Unauthorized(_) => "Unauthorized",
            FintrackError::Serialization(_) => "Serialization Error",
            FintrackError::DateParse(_) => "Date Parse Error",
            FintrackError::PasswordHash(_) => "Password Hash Error",
            FintrackError::Token(_) => "Token Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            FintrackError::Config(msg)
            | FintrackError::DatabaseConnection(msg)
            | FintrackError::DatabaseOperation(msg)
            | FintrackError::FileOperation(msg)
            | FintrackError::Validation(msg)
            | FintrackError::NotFound(msg)
            | FintrackError::Conflict(msg)
            | FintrackError::Unauthorized(msg)
            | FintrackError::Serialization(msg)
            | FintrackError::DateParse(msg)
            | FintrackError::PasswordHash(msg)
            | FintrackError::Token(msg) => msg,
        }
    }

    /// HTTP 状态码映射
    pub fn http_status(&self) -> StatusCode {
        match self {
            FintrackError::Validation(_) | FintrackError::DateParse(_) => StatusCode::BAD_REQUEST,
            FintrackError::NotFound(_) => StatusCode::NOT_FOUND,
            FintrackError::Conflict(_) => StatusCode::CONFLICT,
            FintrackError::Unauthorized(_) | FintrackError::Token(_) => StatusCode::UNAUTHORIZED,
            FintrackError::Config(_)
            | FintrackError::DatabaseConnection(_)
            | FintrackError::DatabaseOperation(_)
            | FintrackError::FileOperation(_)
            | FintrackError::Serialization(_)
            | FintrackError::PasswordHash(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 是否属于服务端内部错误（对外只返回通用消息）
    pub fn is_internal(&self) -> bool {
        self.http_status().is_server_error()
    }

    /// 格式化为彩色输出（用于启动失败时的终端输出）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for FintrackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for FintrackError {}

// 便捷的构造函数
impl FintrackError {
    pub fn config<T: Into<String>>(msg: T) -> Self {
        FintrackError::Config(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        FintrackError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        FintrackError::DatabaseOperation(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        FintrackError::FileOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        FintrackError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        FintrackError::NotFound(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        FintrackError::Conflict(msg.into())
    }

    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        FintrackError::Unauthorized(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        FintrackError::Serialization(msg.into())
    }

    pub fn date_parse<T: Into<String>>(msg: T) -> Self {
        FintrackError::DateParse(msg.into())
    }

    pub fn password_hash<T: Into<String>>(msg: T) -> Self {
        FintrackError::PasswordHash(msg.into())
    }

    pub fn token<T: Into<String>>(msg: T) -> Self {
        FintrackError::Token(msg.into())
    }
}

impl From<sea_orm::DbErr> for FintrackError {
    fn from(err: sea_orm::DbErr) -> Self {
        FintrackError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for FintrackError {
    fn from(err: std::io::Error) -> Self {
        FintrackError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for FintrackError {
    fn from(err: serde_json::Error) -> Self {
        FintrackError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for FintrackError {
    fn from(err: chrono::ParseError) -> Self {
        FintrackError::DateParse(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for FintrackError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        FintrackError::Token(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FintrackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(
            FintrackError::validation("bad").http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            FintrackError::not_found("missing").http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            FintrackError::conflict("dup").http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            FintrackError::token("expired").http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            FintrackError::database_operation("boom").http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_is_internal() {
        assert!(FintrackError::database_connection("down").is_internal());
        assert!(FintrackError::password_hash("argon").is_internal());
        assert!(!FintrackError::validation("bad").is_internal());
        assert!(!FintrackError::unauthorized("no").is_internal());
    }

    #[test]
    fn test_display_uses_simple_format() {
        let err = FintrackError::not_found("Budget not found");
        assert_eq!(err.to_string(), "Resource Not Found: Budget not found");
        assert_eq!(err.message(), "Budget not found");
        assert_eq!(err.code(), "E006");
    }

    #[test]
    fn test_from_db_err() {
        let err: FintrackError = sea_orm::DbErr::Custom("oops".to_string()).into();
        assert!(matches!(err, FintrackError::DatabaseOperation(_)));
        assert!(err.message().contains("oops"));
    }

    #[test]
    fn test_from_serde_json_error() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: FintrackError = parse_err.into();
        assert!(matches!(err, FintrackError::Serialization(_)));
    }
}
