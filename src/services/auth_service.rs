//! User registration and login

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tracing::{error, info, warn};
use ts_rs::TS;

use crate::api::jwt::{JwtService, get_jwt_service};
use crate::api::services::finance::TS_EXPORT_PATH;
use crate::errors::{FintrackError, Result};
use crate::storage::{SeaOrmStorage, User};
use crate::utils::new_id;
use crate::utils::password::{hash_password, verify_password};

const MIN_PASSWORD_LEN: usize = 6;
const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// 认证成功结果
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub user: User,
    pub token: String,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_registration(req: &RegisterRequest) -> Result<()> {
    if req.name.trim().is_empty() {
        return Err(FintrackError::validation("Name is required"));
    }
    let email = req.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(FintrackError::validation("A valid email is required"));
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(FintrackError::validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

/// Service for account operations
pub struct AuthService {
    storage: Arc<SeaOrmStorage>,
    jwt: &'static JwtService,
}

impl AuthService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self::with_jwt(storage, get_jwt_service())
    }

    pub fn with_jwt(storage: Arc<SeaOrmStorage>, jwt: &'static JwtService) -> Self {
        Self { storage, jwt }
    }

    fn issue_token(&self, user_id: &str) -> Result<String> {
        self.jwt.generate_token(user_id).map_err(|e| {
            error!("Failed to sign token: {}", e);
            FintrackError::serialization(format!("Failed to sign token: {}", e))
        })
    }

    pub async fn register(&self, req: RegisterRequest) -> Result<AuthResult> {
        validate_registration(&req)?;

        let email = normalize_email(&req.email);
        if self.storage.find_user_by_email(&email).await?.is_some() {
            return Err(FintrackError::conflict("User already exists"));
        }

        let user = User {
            id: new_id(),
            name: req.name.trim().to_string(),
            email,
            password_hash: hash_password(&req.password)?,
            created_at: Utc::now(),
        };

        // 并发注册同一邮箱时由唯一索引兜底，返回 Conflict
        self.storage.insert_user(&user).await?;

        let token = self.issue_token(&user.id)?;
        info!("AuthService: registered user '{}'", user.id);
        Ok(AuthResult { user, token })
    }

    pub async fn login(&self, req: LoginRequest) -> Result<AuthResult> {
        let email = normalize_email(&req.email);

        let Some(user) = self.storage.find_user_by_email(&email).await? else {
            warn!("Login failed: unknown email");
            return Err(FintrackError::unauthorized(INVALID_CREDENTIALS));
        };

        if !verify_password(&req.password, &user.password_hash)? {
            warn!("Login failed: wrong password for user '{}'", user.id);
            return Err(FintrackError::unauthorized(INVALID_CREDENTIALS));
        }

        let token = self.issue_token(&user.id)?;
        info!("AuthService: user '{}' logged in", user.id);
        Ok(AuthResult { user, token })
    }

    pub async fn current_user(&self, user_id: &str) -> Result<User> {
        self.storage
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| FintrackError::not_found("User not found"))
    }
}
