//! User account persistence

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, SqlErr};
use tracing::{error, info};

use super::SeaOrmStorage;
use super::converters::{model_to_user, user_to_active_model};
use super::retry;
use crate::errors::{FintrackError, Result};
use crate::storage::models::User;

use migration::entities::user;

impl SeaOrmStorage {
    pub async fn insert_user(&self, new_user: &User) -> Result<()> {
        let db = &self.db;
        let active = user_to_active_model(new_user);

        let result = retry::with_retry("insert_user", self.retry_config, || {
            let active = active.clone();
            async move {
                user::Entity::insert(active)
                    .exec_without_returning(db)
                    .await
            }
        })
        .await;

        match result {
            Ok(_) => {
                info!("User registered: {}", new_user.id);
                Ok(())
            }
            Err(e) => {
                if let Some(SqlErr::UniqueConstraintViolation(_)) = e.sql_err() {
                    return Err(FintrackError::conflict("User already exists"));
                }
                error!("Failed to insert user: {}", e);
                Err(FintrackError::database_operation(format!(
                    "Failed to insert user: {}",
                    e
                )))
            }
        }
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let db = &self.db;
        let email_owned = email.to_string();

        retry::with_retry("find_user_by_email", self.retry_config, || async {
            user::Entity::find()
                .filter(user::Column::Email.eq(email_owned.as_str()))
                .one(db)
                .await
        })
        .await
        .map(|m| m.map(model_to_user))
        .map_err(|e| FintrackError::database_operation(format!("Failed to query user: {}", e)))
    }

    pub async fn find_user_by_id(&self, id: &str) -> Result<Option<User>> {
        let db = &self.db;
        let id_owned = id.to_string();

        retry::with_retry("find_user_by_id", self.retry_config, || async {
            user::Entity::find_by_id(id_owned.clone()).one(db).await
        })
        .await
        .map(|m| m.map(model_to_user))
        .map_err(|e| FintrackError::database_operation(format!("Failed to query user: {}", e)))
    }
}
