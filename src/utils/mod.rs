pub mod date_parser;
pub mod password;

use base64::Engine;
use rand::RngExt;

pub use date_parser::{DayBound, parse_date, parse_optional_date};

/// 生成安全随机串（32 bytes = 256 bits，Base64 编码）
pub fn generate_secure_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// 生成新的记录 ID
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
