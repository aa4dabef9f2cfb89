//! Transaction persistence for SeaOrmStorage
//!
//! Every query is scoped by `user_id`; a record owned by someone else
//! behaves exactly like a missing one.

use sea_orm::{
    ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use tracing::{debug, error, info};

use super::converters::{model_to_transaction, transaction_to_active_model};
use super::{SeaOrmStorage, retry};
use crate::errors::{FintrackError, Result};
use crate::storage::models::{Transaction, TransactionFilter};

use migration::entities::transaction;

/// 将过滤条件转换为 SeaORM Condition
pub(super) fn build_condition(user_id: &str, filter: &TransactionFilter) -> Condition {
    let mut condition = Condition::all().add(transaction::Column::UserId.eq(user_id));

    if let Some(category) = filter.category {
        condition = condition.add(transaction::Column::Category.eq(category.as_ref()));
    }
    if let Some(kind) = filter.kind {
        condition = condition.add(transaction::Column::TxType.eq(kind.as_ref()));
    }
    if let Some(start) = filter.start {
        condition = condition.add(transaction::Column::Date.gte(start));
    }
    if let Some(end) = filter.end {
        condition = condition.add(transaction::Column::Date.lte(end));
    }

    condition
}

impl SeaOrmStorage {
    pub async fn insert_transaction(&self, tx: &Transaction) -> Result<()> {
        let db = &self.db;
        let active = transaction_to_active_model(tx)?;

        retry::with_retry("insert_transaction", self.retry_config, || {
            let active = active.clone();
            async move {
                transaction::Entity::insert(active)
                    .exec_without_returning(db)
                    .await
            }
        })
        .await
        .map_err(|e| {
            error!("Failed to insert transaction: {}", e);
            FintrackError::database_operation(format!("Failed to insert transaction: {}", e))
        })?;

        info!("Transaction created: {} (user {})", tx.id, tx.user_id);
        Ok(())
    }

    pub async fn find_transaction(&self, user_id: &str, id: &str) -> Result<Option<Transaction>> {
        let db = &self.db;
        let id_owned = id.to_string();
        let user_owned = user_id.to_string();

        let model = retry::with_retry("find_transaction", self.retry_config, || async {
            transaction::Entity::find_by_id(id_owned.clone())
                .filter(transaction::Column::UserId.eq(user_owned.as_str()))
                .one(db)
                .await
        })
        .await
        .map_err(|e| {
            FintrackError::database_operation(format!("Failed to query transaction: {}", e))
        })?;

        model.map(model_to_transaction).transpose()
    }

    /// 整行覆盖更新，返回是否命中记录
    pub async fn update_transaction(&self, tx: &Transaction) -> Result<bool> {
        let db = &self.db;
        let active = transaction_to_active_model(tx)?;

        let result = retry::with_retry("update_transaction", self.retry_config, || {
            let active = active.clone();
            async move {
                transaction::Entity::update_many()
                    .set(active)
                    .filter(transaction::Column::Id.eq(tx.id.as_str()))
                    .filter(transaction::Column::UserId.eq(tx.user_id.as_str()))
                    .exec(db)
                    .await
            }
        })
        .await
        .map_err(|e| {
            error!("Failed to update transaction {}: {}", tx.id, e);
            FintrackError::database_operation(format!("Failed to update transaction: {}", e))
        })?;

        if result.rows_affected > 0 {
            info!("Transaction updated: {}", tx.id);
        }
        Ok(result.rows_affected > 0)
    }

    /// 删除流水，返回是否命中记录
    pub async fn delete_transaction(&self, user_id: &str, id: &str) -> Result<bool> {
        let db = &self.db;

        let result = retry::with_retry("delete_transaction", self.retry_config, || async {
            transaction::Entity::delete_many()
                .filter(transaction::Column::Id.eq(id))
                .filter(transaction::Column::UserId.eq(user_id))
                .exec(db)
                .await
        })
        .await
        .map_err(|e| {
            FintrackError::database_operation(format!("Failed to delete transaction: {}", e))
        })?;

        if result.rows_affected > 0 {
            info!("Transaction deleted: {}", id);
        }
        Ok(result.rows_affected > 0)
    }

    /// 分页查询流水（按日期倒序），返回 (当前页, 总数)
    ///
    /// `page` 从 1 开始。
    pub async fn list_transactions(
        &self,
        user_id: &str,
        filter: &TransactionFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<Transaction>, u64)> {
        let condition = build_condition(user_id, filter);
        let db = &self.db;

        let total = retry::with_retry("list_transactions(count)", self.retry_config, || async {
            transaction::Entity::find()
                .filter(condition.clone())
                .count(db)
                .await
        })
        .await
        .map_err(|e| {
            FintrackError::database_operation(format!("Failed to count transactions: {}", e))
        })?;

        let page_offset = page.saturating_sub(1);
        let models = retry::with_retry("list_transactions(data)", self.retry_config, || async {
            transaction::Entity::find()
                .filter(condition.clone())
                .order_by_desc(transaction::Column::Date)
                .order_by_desc(transaction::Column::CreatedAt)
                .paginate(db, limit.max(1))
                .fetch_page(page_offset)
                .await
        })
        .await
        .map_err(|e| {
            error!("分页查询失败（重试后仍失败）: {}", e);
            FintrackError::database_operation(format!("Failed to list transactions: {}", e))
        })?;

        debug!(
            "list_transactions: user={}, page={}, limit={}, total={}",
            user_id, page, limit, total
        );

        let transactions = models
            .into_iter()
            .map(model_to_transaction)
            .collect::<Result<Vec<_>>>()?;
        Ok((transactions, total))
    }
}
