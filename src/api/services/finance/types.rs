//! Finance API 类型定义
//!
//! 线上字段统一使用 camelCase。

use chrono::{DateTime, Utc};
use serde::Serialize;
use ts_rs::TS;

use crate::services::{BudgetAlert, Pagination};
use crate::storage::{
    Budget, BudgetAlerts, BudgetPeriod, Category, Transaction, TransactionType, User,
};

use super::error_code::ErrorCode;

/// 输出目录常量
pub const TS_EXPORT_PATH: &str = "../frontend/src/services/types.generated.ts";

/// 错误响应体
#[derive(Serialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct ErrorResponse {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Serialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize, Clone, Debug, PartialEq, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

#[derive(Serialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserDto,
}

#[derive(Serialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct UserResponse {
    pub user: UserDto,
}

#[derive(Serialize, Clone, Debug, PartialEq, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDto {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: f64,
    pub category: Category,
    pub description: String,
    pub date: DateTime<Utc>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Transaction> for TransactionDto {
    fn from(tx: Transaction) -> Self {
        Self {
            id: tx.id,
            kind: tx.kind,
            amount: tx.amount,
            category: tx.category,
            description: tx.description,
            date: tx.date,
            tags: tx.tags,
            created_at: tx.created_at,
        }
    }
}

#[derive(Serialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct TransactionResponse {
    pub transaction: TransactionDto,
}

#[derive(Serialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct TransactionListResponse {
    pub transactions: Vec<TransactionDto>,
    pub pagination: Pagination,
}

#[derive(Serialize, Clone, Debug, PartialEq, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "camelCase")]
pub struct BudgetDto {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub amount: f64,
    pub spent: f64,
    pub remaining: f64,
    pub percentage_used: f64,
    pub period: BudgetPeriod,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub alerts: BudgetAlerts,
    pub created_at: DateTime<Utc>,
}

impl From<Budget> for BudgetDto {
    fn from(b: Budget) -> Self {
        Self {
            remaining: b.remaining(),
            percentage_used: b.percentage_used(),
            id: b.id,
            name: b.name,
            category: b.category,
            amount: b.amount,
            spent: b.spent,
            period: b.period,
            start_date: b.start_date,
            end_date: b.end_date,
            alerts: b.alerts,
            created_at: b.created_at,
        }
    }
}

#[derive(Serialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct BudgetResponse {
    pub budget: BudgetDto,
}

#[derive(Serialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct BudgetListResponse {
    pub budgets: Vec<BudgetDto>,
}

#[derive(Serialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct AlertsResponse {
    pub alerts: Vec<BudgetAlert>,
}

/// 统计接口 `?period=` / `?range=` 查询参数
#[derive(serde::Deserialize, Clone, Debug, Default, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct StatsQuery {
    #[ts(optional)]
    pub period: Option<String>,
    #[ts(optional)]
    pub range: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_dto_uses_type_key() {
        let now = Utc::now();
        let dto = TransactionDto::from(Transaction {
            id: "t1".to_string(),
            user_id: "u1".to_string(),
            kind: TransactionType::Income,
            amount: 100.0,
            category: Category::Salary,
            description: "Pay".to_string(),
            date: now,
            tags: vec![],
            created_at: now,
        });
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["type"], "income");
        assert_eq!(json["category"], "Salary");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("userId").is_none());
    }

    #[test]
    fn test_budget_dto_derived_fields() {
        let now = Utc::now();
        let dto = BudgetDto::from(Budget {
            id: "b1".to_string(),
            user_id: "u1".to_string(),
            name: "Food".to_string(),
            category: Category::Food,
            amount: 200.0,
            spent: 50.0,
            period: BudgetPeriod::Monthly,
            start_date: now,
            end_date: now,
            alerts: BudgetAlerts::default(),
            created_at: now,
        });
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["remaining"], 150.0);
        assert_eq!(json["percentageUsed"], 25.0);
        assert_eq!(json["period"], "monthly");
        assert_eq!(json["alerts"]["threshold"], 80);
        assert!(json.get("startDate").is_some());
    }

    #[test]
    fn test_user_dto_has_no_password() {
        let dto = UserDto::from(User {
            id: "u1".to_string(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "$argon2id$x".to_string(),
            created_at: Utc::now(),
        });
        let json = serde_json::to_string(&dto).unwrap();
        assert!(!json.contains("argon2"));
        assert!(!json.contains("password"));
    }
}
