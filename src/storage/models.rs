use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};
use ts_rs::TS;

use crate::api::services::finance::TS_EXPORT_PATH;

/// 流水类型
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    TS,
    EnumIter,
    EnumString,
    AsRefStr,
    Display,
)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

/// 收支分类
///
/// 前 9 个与 `Other` 为支出分类，可用于预算；其余为收入分类。
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    TS,
    EnumIter,
    EnumString,
    AsRefStr,
    Display,
)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub enum Category {
    Food,
    Transportation,
    Entertainment,
    Bills,
    Shopping,
    Healthcare,
    Education,
    Travel,
    Personal,
    Salary,
    Freelance,
    Investment,
    Gift,
    Business,
    Other,
}

impl Category {
    /// 是否可作为支出分类（预算只允许支出分类）
    pub fn is_expense(&self) -> bool {
        !matches!(
            self,
            Category::Salary
                | Category::Freelance
                | Category::Investment
                | Category::Gift
                | Category::Business
        )
    }

    /// 所有可用于预算的分类
    pub fn expense_categories() -> Vec<Category> {
        Category::iter().filter(Category::is_expense).collect()
    }
}

/// 预算周期
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    TS,
    EnumIter,
    EnumString,
    AsRefStr,
    Display,
)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BudgetPeriod {
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    pub kind: TransactionType,
    pub amount: f64,
    pub category: Category,
    pub description: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// 预算提醒设置
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct BudgetAlerts {
    pub enabled: bool,
    /// 百分比阈值 0-100
    pub threshold: u8,
}

impl Default for BudgetAlerts {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: 80,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub category: Category,
    pub amount: f64,
    /// 窗口内已花费金额，读取时由流水聚合填充
    #[serde(default)]
    pub spent: f64,
    pub period: BudgetPeriod,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub alerts: BudgetAlerts,
    pub created_at: DateTime<Utc>,
}

impl Budget {
    pub fn remaining(&self) -> f64 {
        self.amount - self.spent
    }

    pub fn percentage_used(&self) -> f64 {
        if self.amount > 0.0 {
            self.spent / self.amount * 100.0
        } else {
            0.0
        }
    }

    /// 使用比例是否已达到提醒阈值
    pub fn alert_triggered(&self) -> bool {
        self.alerts.enabled && self.percentage_used() >= f64::from(self.alerts.threshold)
    }
}

/// 交易列表过滤条件
#[derive(Default, Clone, Debug)]
pub struct TransactionFilter {
    pub category: Option<Category>,
    pub kind: Option<TransactionType>,
    /// date >= start
    pub start: Option<DateTime<Utc>>,
    /// date <= end
    pub end: Option<DateTime<Utc>>,
}

/// 收支汇总
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Summary {
    pub total_income: f64,
    pub total_expenses: f64,
    pub transaction_count: u64,
}

impl Summary {
    pub fn net_income(&self) -> f64 {
        self.total_income - self.total_expenses
    }
}

/// 按分类聚合结果
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: f64,
    pub count: u64,
}

/// 按月聚合结果（收入、支出）
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MonthlyTotal {
    pub year: i32,
    pub month: u32,
    pub income: f64,
    pub expenses: f64,
}
