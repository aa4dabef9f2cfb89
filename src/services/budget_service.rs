//! Budget management service
//!
//! `spent` is derived on read from the expense transactions that fall inside
//! the budget window.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use ts_rs::TS;

use crate::api::services::finance::TS_EXPORT_PATH;
use crate::errors::{FintrackError, Result};
use crate::storage::{Budget, BudgetAlerts, BudgetPeriod, Category, SeaOrmStorage};
use crate::utils::{DayBound, new_id, parse_date, parse_optional_date};

// ============ Request/Response DTOs ============

#[derive(Debug, Clone, Copy, Default, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "camelCase")]
pub struct BudgetAlertsInput {
    #[ts(optional)]
    pub enabled: Option<bool>,
    #[ts(optional)]
    pub threshold: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "camelCase")]
pub struct CreateBudgetRequest {
    pub name: String,
    pub category: Category,
    pub amount: f64,
    #[ts(optional)]
    pub period: Option<BudgetPeriod>,
    /// defaults to now
    #[ts(optional)]
    pub start_date: Option<String>,
    pub end_date: String,
    #[ts(optional)]
    pub alerts: Option<BudgetAlertsInput>,
}

/// Partial update, absent fields keep their current value
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBudgetRequest {
    #[ts(optional)]
    pub name: Option<String>,
    #[ts(optional)]
    pub category: Option<Category>,
    #[ts(optional)]
    pub amount: Option<f64>,
    #[ts(optional)]
    pub period: Option<BudgetPeriod>,
    #[ts(optional)]
    pub start_date: Option<String>,
    #[ts(optional)]
    pub end_date: Option<String>,
    #[ts(optional)]
    pub alerts: Option<BudgetAlertsInput>,
}

/// 超过阈值的预算提醒
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "camelCase")]
pub struct BudgetAlert {
    pub budget_id: String,
    pub name: String,
    pub category: Category,
    pub spent: f64,
    pub budget: f64,
    /// rounded to the nearest integer
    pub percentage_used: u32,
    pub threshold: u8,
}

impl BudgetAlert {
    fn from_budget(b: &Budget) -> Self {
        Self {
            budget_id: b.id.clone(),
            name: b.name.clone(),
            category: b.category,
            spent: b.spent,
            budget: b.amount,
            percentage_used: b.percentage_used().round() as u32,
            threshold: b.alerts.threshold,
        }
    }
}

// ============ Validation ============

fn validate_category(category: Category) -> Result<()> {
    if !category.is_expense() {
        return Err(FintrackError::validation(format!(
            "Budgets can only track expense categories, got '{}'",
            category
        )));
    }
    Ok(())
}

fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(FintrackError::validation(
            "Amount must be a non-negative number",
        ));
    }
    Ok(())
}

fn normalize_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(FintrackError::validation("Name is required"));
    }
    Ok(trimmed.to_string())
}

fn validate_window(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<()> {
    if end < start {
        return Err(FintrackError::validation(
            "End date must not be before start date",
        ));
    }
    Ok(())
}

fn merge_alerts(current: BudgetAlerts, input: Option<BudgetAlertsInput>) -> Result<BudgetAlerts> {
    let Some(input) = input else {
        return Ok(current);
    };

    let threshold = match input.threshold {
        Some(t) if (0..=100).contains(&t) => t as u8,
        Some(t) => {
            return Err(FintrackError::validation(format!(
                "Alert threshold must be between 0 and 100, got {}",
                t
            )));
        }
        None => current.threshold,
    };

    Ok(BudgetAlerts {
        enabled: input.enabled.unwrap_or(current.enabled),
        threshold,
    })
}

// ============ BudgetService Implementation ============

/// Service for budget operations
pub struct BudgetService {
    storage: Arc<SeaOrmStorage>,
}

impl BudgetService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    async fn fill_spent(&self, mut budget: Budget) -> Result<Budget> {
        budget.spent = self
            .storage
            .sum_expenses(
                &budget.user_id,
                budget.category,
                budget.start_date,
                budget.end_date,
            )
            .await?;
        Ok(budget)
    }

    pub async fn create(&self, user_id: &str, req: CreateBudgetRequest) -> Result<Budget> {
        let name = normalize_name(&req.name)?;
        validate_category(req.category)?;
        validate_amount(req.amount)?;

        let now = Utc::now();
        let start_date =
            parse_optional_date(req.start_date.as_deref(), DayBound::Start)?.unwrap_or(now);
        let end_date = parse_date(&req.end_date, DayBound::End)?;
        validate_window(start_date, end_date)?;

        let budget = Budget {
            id: new_id(),
            user_id: user_id.to_string(),
            name,
            category: req.category,
            amount: req.amount,
            spent: 0.0,
            period: req.period.unwrap_or_default(),
            start_date,
            end_date,
            alerts: merge_alerts(BudgetAlerts::default(), req.alerts)?,
            created_at: now,
        };

        self.storage.insert_budget(&budget).await?;
        info!(
            "BudgetService: created '{}' ({} {:.2}/{})",
            budget.id, budget.category, budget.amount, budget.period
        );
        self.fill_spent(budget).await
    }

    pub async fn get(&self, user_id: &str, id: &str) -> Result<Budget> {
        let budget = self
            .storage
            .find_budget(user_id, id)
            .await?
            .ok_or_else(|| FintrackError::not_found("Budget not found"))?;
        self.fill_spent(budget).await
    }

    /// 合并部分字段后重新校验并保存
    pub async fn update(
        &self,
        user_id: &str,
        id: &str,
        patch: UpdateBudgetRequest,
    ) -> Result<Budget> {
        let mut budget = self
            .storage
            .find_budget(user_id, id)
            .await?
            .ok_or_else(|| FintrackError::not_found("Budget not found"))?;

        if let Some(name) = patch.name {
            budget.name = normalize_name(&name)?;
        }
        if let Some(category) = patch.category {
            validate_category(category)?;
            budget.category = category;
        }
        if let Some(amount) = patch.amount {
            validate_amount(amount)?;
            budget.amount = amount;
        }
        if let Some(period) = patch.period {
            budget.period = period;
        }
        if let Some(start) = patch.start_date {
            budget.start_date = parse_date(&start, DayBound::Start)?;
        }
        if let Some(end) = patch.end_date {
            budget.end_date = parse_date(&end, DayBound::End)?;
        }
        validate_window(budget.start_date, budget.end_date)?;
        budget.alerts = merge_alerts(budget.alerts, patch.alerts)?;

        if !self.storage.update_budget(&budget).await? {
            return Err(FintrackError::not_found("Budget not found"));
        }
        self.fill_spent(budget).await
    }

    pub async fn delete(&self, user_id: &str, id: &str) -> Result<()> {
        if self.storage.delete_budget(user_id, id).await? {
            Ok(())
        } else {
            Err(FintrackError::not_found("Budget not found"))
        }
    }

    pub async fn list(&self, user_id: &str) -> Result<Vec<Budget>> {
        let budgets = self.storage.list_budgets(user_id, false).await?;
        let mut filled = Vec::with_capacity(budgets.len());
        for budget in budgets {
            filled.push(self.fill_spent(budget).await?);
        }
        Ok(filled)
    }

    /// 检查开启提醒的预算，返回使用比例达到阈值的项
    pub async fn check_alerts(&self, user_id: &str) -> Result<Vec<BudgetAlert>> {
        let budgets = self.storage.list_budgets(user_id, true).await?;
        let mut alerts = Vec::new();

        for budget in budgets {
            let budget = self.fill_spent(budget).await?;
            if budget.alert_triggered() {
                alerts.push(BudgetAlert::from_budget(&budget));
            }
        }

        debug!(
            "BudgetService::check_alerts user={} alerts={}",
            user_id,
            alerts.len()
        );
        Ok(alerts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_validate_category_rejects_income() {
        assert!(validate_category(Category::Food).is_ok());
        assert!(validate_category(Category::Other).is_ok());
        assert!(validate_category(Category::Salary).is_err());
    }

    #[test]
    fn test_validate_window() {
        let now = Utc::now();
        assert!(validate_window(now, now).is_ok());
        assert!(validate_window(now, now + Duration::days(1)).is_ok());
        assert!(validate_window(now, now - Duration::seconds(1)).is_err());
    }

    #[test]
    fn test_merge_alerts() {
        let current = BudgetAlerts::default();
        assert_eq!(merge_alerts(current, None).unwrap(), current);

        let merged = merge_alerts(
            current,
            Some(BudgetAlertsInput {
                enabled: Some(false),
                threshold: None,
            }),
        )
        .unwrap();
        assert!(!merged.enabled);
        assert_eq!(merged.threshold, 80);

        let merged = merge_alerts(
            current,
            Some(BudgetAlertsInput {
                enabled: None,
                threshold: Some(100),
            }),
        )
        .unwrap();
        assert_eq!(merged.threshold, 100);

        assert!(
            merge_alerts(
                current,
                Some(BudgetAlertsInput {
                    enabled: None,
                    threshold: Some(101),
                })
            )
            .is_err()
        );
    }

    #[test]
    fn test_alert_rounds_percentage() {
        let now = Utc::now();
        let budget = Budget {
            id: "b1".to_string(),
            user_id: "u1".to_string(),
            name: "Food".to_string(),
            category: Category::Food,
            amount: 300.0,
            spent: 256.0,
            period: BudgetPeriod::Monthly,
            start_date: now,
            end_date: now,
            alerts: BudgetAlerts::default(),
            created_at: now,
        };
        let alert = BudgetAlert::from_budget(&budget);
        assert_eq!(alert.percentage_used, 85);
        assert_eq!(alert.budget, 300.0);

        let json = serde_json::to_value(&alert).unwrap();
        assert_eq!(json["budgetId"], "b1");
        assert_eq!(json["percentageUsed"], 85);
    }
}
