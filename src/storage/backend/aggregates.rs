//! Aggregate queries over transactions (SeaORM DSL)

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Utc};
use sea_orm::{
    ColumnTrait, EntityTrait, ExprTrait, FromQueryResult, QueryFilter, QueryOrder, QuerySelect,
    sea_query::Expr,
};
use tracing::{debug, warn};

use super::{SeaOrmStorage, retry};
use crate::errors::{FintrackError, Result};
use crate::storage::models::{Category, CategoryTotal, MonthlyTotal, Summary, TransactionType};

use migration::entities::transaction;

#[derive(Debug, FromQueryResult)]
struct SumResult {
    total: Option<f64>,
}

#[derive(Debug, FromQueryResult)]
struct SummaryResult {
    total_income: Option<f64>,
    total_expenses: Option<f64>,
    transaction_count: i64,
}

#[derive(Debug, FromQueryResult)]
struct CategoryResult {
    category: String,
    total: Option<f64>,
    count: i64,
}

fn db_error(op: &str, e: sea_orm::DbErr) -> FintrackError {
    FintrackError::database_operation(format!("Failed to {}: {}", op, e))
}

/// 按 (年, 月) 分桶累加
fn bucket_by_month(rows: Vec<(DateTime<Utc>, String, f64)>) -> Vec<MonthlyTotal> {
    let mut buckets: BTreeMap<(i32, u32), MonthlyTotal> = BTreeMap::new();

    for (date, tx_type, amount) in rows {
        let key = (date.year(), date.month());
        let entry = buckets.entry(key).or_insert_with(|| MonthlyTotal {
            year: key.0,
            month: key.1,
            ..MonthlyTotal::default()
        });
        match TransactionType::from_str(&tx_type) {
            Ok(TransactionType::Income) => entry.income += amount,
            Ok(TransactionType::Expense) => entry.expenses += amount,
            Err(_) => warn!("Skipping row with unknown tx_type '{}'", tx_type),
        }
    }

    buckets.into_values().collect()
}

impl SeaOrmStorage {
    /// 分类在 [start, end] 内的支出总额（预算 spent）
    pub async fn sum_expenses(
        &self,
        user_id: &str,
        category: Category,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<f64> {
        let db = &self.db;

        let result = retry::with_retry("sum_expenses", self.retry_config, || async {
            transaction::Entity::find()
                .select_only()
                .column_as(transaction::Column::Amount.sum(), "total")
                .filter(transaction::Column::UserId.eq(user_id))
                .filter(transaction::Column::TxType.eq(TransactionType::Expense.as_ref()))
                .filter(transaction::Column::Category.eq(category.as_ref()))
                .filter(transaction::Column::Date.gte(start))
                .filter(transaction::Column::Date.lte(end))
                .into_model::<SumResult>()
                .one(db)
                .await
        })
        .await
        .map_err(|e| db_error("sum expenses", e))?;

        Ok(result.and_then(|r| r.total).unwrap_or(0.0))
    }

    /// 单条条件求和查询得到收支汇总
    pub async fn summarize(&self, user_id: &str, since: DateTime<Utc>) -> Result<Summary> {
        let db = &self.db;

        let result = retry::with_retry("summarize", self.retry_config, || async {
            transaction::Entity::find()
                .select_only()
                // SUM(CASE WHEN tx_type = 'income' THEN amount ELSE 0 END)
                .column_as(
                    Expr::case(
                        transaction::Column::TxType.eq(TransactionType::Income.as_ref()),
                        Expr::col(transaction::Column::Amount),
                    )
                    .finally(0.0)
                    .sum(),
                    "total_income",
                )
                // SUM(CASE WHEN tx_type = 'expense' THEN amount ELSE 0 END)
                .column_as(
                    Expr::case(
                        transaction::Column::TxType.eq(TransactionType::Expense.as_ref()),
                        Expr::col(transaction::Column::Amount),
                    )
                    .finally(0.0)
                    .sum(),
                    "total_expenses",
                )
                .column_as(transaction::Column::Id.count(), "transaction_count")
                .filter(transaction::Column::UserId.eq(user_id))
                .filter(transaction::Column::Date.gte(since))
                .into_model::<SummaryResult>()
                .one(db)
                .await
        })
        .await
        .map_err(|e| db_error("summarize transactions", e))?;

        Ok(match result {
            Some(r) => Summary {
                total_income: r.total_income.unwrap_or(0.0),
                total_expenses: r.total_expenses.unwrap_or(0.0),
                transaction_count: std::cmp::Ord::max(r.transaction_count, 0) as u64,
            },
            None => Summary::default(),
        })
    }

    /// 按分类聚合（总额倒序）
    pub async fn category_totals(
        &self,
        user_id: &str,
        kind: TransactionType,
        since: DateTime<Utc>,
    ) -> Result<Vec<CategoryTotal>> {
        let db = &self.db;

        let rows = retry::with_retry("category_totals", self.retry_config, || async {
            transaction::Entity::find()
                .select_only()
                .column(transaction::Column::Category)
                .column_as(transaction::Column::Amount.sum(), "total")
                .column_as(transaction::Column::Id.count(), "count")
                .filter(transaction::Column::UserId.eq(user_id))
                .filter(transaction::Column::TxType.eq(kind.as_ref()))
                .filter(transaction::Column::Date.gte(since))
                .group_by(transaction::Column::Category)
                .into_model::<CategoryResult>()
                .all(db)
                .await
        })
        .await
        .map_err(|e| db_error("aggregate categories", e))?;

        let mut totals: Vec<CategoryTotal> = rows
            .into_iter()
            .filter_map(|r| match Category::from_str(&r.category) {
                Ok(category) => Some(CategoryTotal {
                    category,
                    total: r.total.unwrap_or(0.0),
                    count: std::cmp::Ord::max(r.count, 0) as u64,
                }),
                Err(_) => {
                    warn!("Skipping unknown category '{}'", r.category);
                    None
                }
            })
            .collect();

        totals.sort_by(|a, b| b.total.total_cmp(&a.total));
        Ok(totals)
    }

    /// 自 `since` 起按自然月汇总收支，只返回有数据的月份（升序）
    pub async fn monthly_totals(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<MonthlyTotal>> {
        let db = &self.db;

        // 月份截断在各数据库方言不同，取出 (date, type, amount) 后在内存分桶
        let rows = retry::with_retry("monthly_totals", self.retry_config, || async {
            transaction::Entity::find()
                .select_only()
                .column(transaction::Column::Date)
                .column(transaction::Column::TxType)
                .column(transaction::Column::Amount)
                .filter(transaction::Column::UserId.eq(user_id))
                .filter(transaction::Column::Date.gte(since))
                .order_by_asc(transaction::Column::Date)
                .into_tuple::<(DateTime<Utc>, String, f64)>()
                .all(db)
                .await
        })
        .await
        .map_err(|e| db_error("aggregate monthly totals", e))?;

        debug!("monthly_totals: user={}, rows={}", user_id, rows.len());
        Ok(bucket_by_month(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_bucket_by_month_splits_income_and_expenses() {
        let rows = vec![
            (at(2025, 1, 3), "income".to_string(), 1000.0),
            (at(2025, 1, 9), "expense".to_string(), 40.0),
            (at(2025, 1, 20), "expense".to_string(), 10.0),
            (at(2025, 3, 1), "expense".to_string(), 5.5),
        ];

        let buckets = bucket_by_month(rows);
        assert_eq!(buckets.len(), 2);
        assert_eq!((buckets[0].year, buckets[0].month), (2025, 1));
        assert_eq!(buckets[0].income, 1000.0);
        assert_eq!(buckets[0].expenses, 50.0);
        assert_eq!((buckets[1].year, buckets[1].month), (2025, 3));
        assert_eq!(buckets[1].income, 0.0);
    }

    #[test]
    fn test_bucket_by_month_orders_across_years() {
        let rows = vec![
            (at(2025, 1, 1), "income".to_string(), 1.0),
            (at(2024, 12, 31), "income".to_string(), 2.0),
        ];
        let buckets = bucket_by_month(rows);
        assert_eq!((buckets[0].year, buckets[0].month), (2024, 12));
        assert_eq!((buckets[1].year, buckets[1].month), (2025, 1));
    }

    #[test]
    fn test_bucket_by_month_ignores_unknown_type() {
        let rows = vec![(at(2025, 5, 1), "transfer".to_string(), 99.0)];
        let buckets = bucket_by_month(rows);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].income, 0.0);
        assert_eq!(buckets[0].expenses, 0.0);
    }
}
