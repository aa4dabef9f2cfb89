//! Budget persistence for SeaOrmStorage
//!
//! `spent` is never stored; callers fill it from the transaction aggregates.

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use tracing::{error, info};

use super::converters::{budget_to_active_model, model_to_budget};
use super::{SeaOrmStorage, retry};
use crate::errors::{FintrackError, Result};
use crate::storage::models::Budget;

use migration::entities::budget;

impl SeaOrmStorage {
    pub async fn insert_budget(&self, b: &Budget) -> Result<()> {
        let db = &self.db;
        let active = budget_to_active_model(b);

        retry::with_retry("insert_budget", self.retry_config, || {
            let active = active.clone();
            async move { budget::Entity::insert(active).exec_without_returning(db).await }
        })
        .await
        .map_err(|e| {
            error!("Failed to insert budget: {}", e);
            FintrackError::database_operation(format!("Failed to insert budget: {}", e))
        })?;

        info!("Budget created: {} (user {})", b.id, b.user_id);
        Ok(())
    }

    pub async fn find_budget(&self, user_id: &str, id: &str) -> Result<Option<Budget>> {
        let db = &self.db;
        let id_owned = id.to_string();

        let model = retry::with_retry("find_budget", self.retry_config, || async {
            budget::Entity::find_by_id(id_owned.clone())
                .filter(budget::Column::UserId.eq(user_id))
                .one(db)
                .await
        })
        .await
        .map_err(|e| FintrackError::database_operation(format!("Failed to query budget: {}", e)))?;

        model.map(model_to_budget).transpose()
    }

    /// 整行覆盖更新，返回是否命中记录
    pub async fn update_budget(&self, b: &Budget) -> Result<bool> {
        let db = &self.db;
        let active = budget_to_active_model(b);

        let result = retry::with_retry("update_budget", self.retry_config, || {
            let active = active.clone();
            async move {
                budget::Entity::update_many()
                    .set(active)
                    .filter(budget::Column::Id.eq(b.id.as_str()))
                    .filter(budget::Column::UserId.eq(b.user_id.as_str()))
                    .exec(db)
                    .await
            }
        })
        .await
        .map_err(|e| {
            error!("Failed to update budget {}: {}", b.id, e);
            FintrackError::database_operation(format!("Failed to update budget: {}", e))
        })?;

        if result.rows_affected > 0 {
            info!("Budget updated: {}", b.id);
        }
        Ok(result.rows_affected > 0)
    }

    pub async fn delete_budget(&self, user_id: &str, id: &str) -> Result<bool> {
        let db = &self.db;

        let result = retry::with_retry("delete_budget", self.retry_config, || async {
            budget::Entity::delete_many()
                .filter(budget::Column::Id.eq(id))
                .filter(budget::Column::UserId.eq(user_id))
                .exec(db)
                .await
        })
        .await
        .map_err(|e| {
            FintrackError::database_operation(format!("Failed to delete budget: {}", e))
        })?;

        if result.rows_affected > 0 {
            info!("Budget deleted: {}", id);
        }
        Ok(result.rows_affected > 0)
    }

    /// 列出用户全部预算（创建时间倒序）
    ///
    /// `alerts_only` 为 true 时只返回开启了提醒的预算。
    pub async fn list_budgets(&self, user_id: &str, alerts_only: bool) -> Result<Vec<Budget>> {
        let db = &self.db;

        let models = retry::with_retry("list_budgets", self.retry_config, || async {
            let mut query = budget::Entity::find().filter(budget::Column::UserId.eq(user_id));
            if alerts_only {
                query = query.filter(budget::Column::AlertsEnabled.eq(true));
            }
            query
                .order_by_desc(budget::Column::CreatedAt)
                .all(db)
                .await
        })
        .await
        .map_err(|e| FintrackError::database_operation(format!("Failed to list budgets: {}", e)))?;

        models.into_iter().map(model_to_budget).collect()
    }
}
