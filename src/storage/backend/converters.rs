use std::str::FromStr;

use sea_orm::ActiveValue::Set;

use crate::errors::{FintrackError, Result};
use crate::storage::models::{
    Budget, BudgetAlerts, BudgetPeriod, Category, Transaction, TransactionType, User,
};
use migration::entities::{budget, transaction, user};

fn parse_column<T: FromStr>(value: &str, column: &str) -> Result<T> {
    T::from_str(value).map_err(|_| {
        FintrackError::database_operation(format!(
            "Unexpected value '{}' in column '{}'",
            value, column
        ))
    })
}

pub fn model_to_user(model: user::Model) -> User {
    User {
        id: model.id,
        name: model.name,
        email: model.email,
        password_hash: model.password_hash,
        created_at: model.created_at,
    }
}

pub fn user_to_active_model(user: &User) -> user::ActiveModel {
    user::ActiveModel {
        id: Set(user.id.clone()),
        name: Set(user.name.clone()),
        email: Set(user.email.clone()),
        password_hash: Set(user.password_hash.clone()),
        created_at: Set(user.created_at),
    }
}

/// 将 Sea-ORM Model 转换为 Transaction
pub fn model_to_transaction(model: transaction::Model) -> Result<Transaction> {
    // 坏的 tags JSON 不应让整条记录不可读
    let tags: Vec<String> = serde_json::from_str(&model.tags).unwrap_or_default();

    Ok(Transaction {
        kind: parse_column::<TransactionType>(&model.tx_type, "tx_type")?,
        category: parse_column::<Category>(&model.category, "category")?,
        id: model.id,
        user_id: model.user_id,
        amount: model.amount,
        description: model.description,
        date: model.date,
        tags,
        created_at: model.created_at,
    })
}

/// 将 Transaction 转换为 ActiveModel（插入与整行更新共用）
pub fn transaction_to_active_model(tx: &Transaction) -> Result<transaction::ActiveModel> {
    Ok(transaction::ActiveModel {
        id: Set(tx.id.clone()),
        user_id: Set(tx.user_id.clone()),
        tx_type: Set(tx.kind.as_ref().to_string()),
        amount: Set(tx.amount),
        category: Set(tx.category.as_ref().to_string()),
        description: Set(tx.description.clone()),
        date: Set(tx.date),
        tags: Set(serde_json::to_string(&tx.tags)?),
        created_at: Set(tx.created_at),
    })
}

pub fn model_to_budget(model: budget::Model) -> Result<Budget> {
    Ok(Budget {
        category: parse_column::<Category>(&model.category, "category")?,
        period: parse_column::<BudgetPeriod>(&model.period, "period")?,
        alerts: BudgetAlerts {
            enabled: model.alerts_enabled,
            threshold: model.alert_threshold.clamp(0, 100) as u8,
        },
        id: model.id,
        user_id: model.user_id,
        name: model.name,
        amount: model.amount,
        spent: 0.0,
        start_date: model.start_date,
        end_date: model.end_date,
        created_at: model.created_at,
    })
}

pub fn budget_to_active_model(b: &Budget) -> budget::ActiveModel {
    budget::ActiveModel {
        id: Set(b.id.clone()),
        user_id: Set(b.user_id.clone()),
        name: Set(b.name.clone()),
        category: Set(b.category.as_ref().to_string()),
        amount: Set(b.amount),
        period: Set(b.period.as_ref().to_string()),
        start_date: Set(b.start_date),
        end_date: Set(b.end_date),
        alerts_enabled: Set(b.alerts.enabled),
        alert_threshold: Set(i32::from(b.alerts.threshold)),
        created_at: Set(b.created_at),
    }
}
