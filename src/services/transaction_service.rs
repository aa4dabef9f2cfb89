//! Transaction management service
//!
//! CRUD, filtered listing and the statistics endpoints (summary, category
//! breakdown, monthly trends).

use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use ts_rs::TS;

use crate::api::services::finance::TS_EXPORT_PATH;
use crate::errors::{FintrackError, Result};
use crate::storage::{
    Category, SeaOrmStorage, Transaction, TransactionFilter, TransactionType,
};
use crate::utils::{DayBound, new_id, parse_date, parse_optional_date};

pub const DEFAULT_PAGE_LIMIT: u64 = 10;
pub const MAX_PAGE_LIMIT: u64 = 100;

// ============ Request/Response DTOs ============

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: f64,
    pub category: Category,
    pub description: String,
    /// RFC3339 or YYYY-MM-DD, defaults to now
    #[ts(optional)]
    pub date: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Partial update, absent fields keep their current value
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTransactionRequest {
    #[serde(rename = "type")]
    #[ts(optional)]
    pub kind: Option<TransactionType>,
    #[ts(optional)]
    pub amount: Option<f64>,
    #[ts(optional)]
    pub category: Option<Category>,
    #[ts(optional)]
    pub description: Option<String>,
    #[ts(optional)]
    pub date: Option<String>,
    #[ts(optional)]
    pub tags: Option<Vec<String>>,
}

/// 列表查询参数（query string）
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "camelCase")]
pub struct TransactionQuery {
    #[ts(optional)]
    pub page: Option<u64>,
    #[ts(optional)]
    pub limit: Option<u64>,
    #[ts(optional)]
    pub category: Option<String>,
    #[serde(rename = "type")]
    #[ts(optional)]
    pub kind: Option<String>,
    #[ts(optional)]
    pub start_date: Option<String>,
    #[ts(optional)]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub pages: u64,
}

impl Pagination {
    pub fn new(page: u64, limit: u64, total: u64) -> Self {
        Self {
            page,
            limit,
            total,
            pages: total.div_ceil(limit.max(1)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransactionPage {
    pub transactions: Vec<Transaction>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "camelCase")]
pub struct SummaryReport {
    pub period: String,
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_income: f64,
    pub transaction_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct CategoryStat {
    pub category: Category,
    pub total: f64,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct CategoryBreakdown {
    pub period: String,
    pub categories: Vec<CategoryStat>,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct TrendPoint {
    /// YYYY-MM
    pub month: String,
    pub income: f64,
    pub expenses: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct TrendsReport {
    pub range: String,
    pub trends: Vec<TrendPoint>,
}

// ============ Periods ============

/// 统计周期，未知值按 `Month` 处理
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatsPeriod {
    Week,
    #[default]
    Month,
    Year,
}

impl StatsPeriod {
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("week") => StatsPeriod::Week,
            Some("year") => StatsPeriod::Year,
            _ => StatsPeriod::Month,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatsPeriod::Week => "week",
            StatsPeriod::Month => "month",
            StatsPeriod::Year => "year",
        }
    }

    /// 周期起点：week = now - 7d；month = 当月 1 日 00:00 UTC；year = 1 月 1 日 00:00 UTC
    pub fn start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            StatsPeriod::Week => now - Duration::days(7),
            StatsPeriod::Month => month_start(now.year(), now.month()).unwrap_or(now),
            StatsPeriod::Year => month_start(now.year(), 1).unwrap_or(now),
        }
    }

    /// trends 覆盖的自然月数（含当月）
    pub fn trend_months(&self) -> u32 {
        match self {
            StatsPeriod::Week => 1,
            StatsPeriod::Month => 6,
            StatsPeriod::Year => 12,
        }
    }
}

fn month_start(year: i32, month: u32) -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// 以 `now` 所在月份为终点，向前 `count` 个自然月（升序）
fn trailing_months(now: DateTime<Utc>, count: u32) -> Vec<(i32, u32)> {
    let current = now.year() * 12 + now.month0() as i32;
    (0..count as i32)
        .rev()
        .map(|back| {
            let index = current - back;
            (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
        })
        .collect()
}

// ============ Validation ============

fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(FintrackError::validation(
            "Amount must be a non-negative number",
        ));
    }
    Ok(())
}

fn normalize_description(description: &str) -> Result<String> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return Err(FintrackError::validation("Description is required"));
    }
    Ok(trimmed.to_string())
}

fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// 分页偏移 `(page - 1) * limit` 必须能作为 SQL BIGINT 绑定
fn validate_page_offset(page: u64, limit: u64) -> Result<()> {
    let offset = (page - 1).checked_mul(limit);
    if offset.is_none_or(|o| o > i64::MAX as u64) {
        return Err(FintrackError::validation(format!(
            "Page {} is out of range",
            page
        )));
    }
    Ok(())
}

fn parse_filter_enum<T: FromStr>(value: Option<&str>, field: &str) -> Result<Option<T>> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => T::from_str(v)
            .map(Some)
            .map_err(|_| FintrackError::validation(format!("Invalid {}: '{}'", field, v))),
        _ => Ok(None),
    }
}

// ============ TransactionService Implementation ============

/// Service for transaction operations
pub struct TransactionService {
    storage: Arc<SeaOrmStorage>,
}

impl TransactionService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    pub async fn create(&self, user_id: &str, req: CreateTransactionRequest) -> Result<Transaction> {
        validate_amount(req.amount)?;
        let description = normalize_description(&req.description)?;
        let now = Utc::now();
        let date = parse_optional_date(req.date.as_deref(), DayBound::Start)?.unwrap_or(now);

        let tx = Transaction {
            id: new_id(),
            user_id: user_id.to_string(),
            kind: req.kind,
            amount: req.amount,
            category: req.category,
            description,
            date,
            tags: normalize_tags(req.tags),
            created_at: now,
        };

        self.storage.insert_transaction(&tx).await?;
        info!(
            "TransactionService: created {} {} {:.2} ({})",
            tx.id, tx.kind, tx.amount, tx.category
        );
        Ok(tx)
    }

    pub async fn get(&self, user_id: &str, id: &str) -> Result<Transaction> {
        self.storage
            .find_transaction(user_id, id)
            .await?
            .ok_or_else(|| FintrackError::not_found("Transaction not found"))
    }

    /// 合并部分字段后重新校验并保存
    pub async fn update(
        &self,
        user_id: &str,
        id: &str,
        patch: UpdateTransactionRequest,
    ) -> Result<Transaction> {
        let mut tx = self.get(user_id, id).await?;

        if let Some(kind) = patch.kind {
            tx.kind = kind;
        }
        if let Some(amount) = patch.amount {
            validate_amount(amount)?;
            tx.amount = amount;
        }
        if let Some(category) = patch.category {
            tx.category = category;
        }
        if let Some(description) = patch.description {
            tx.description = normalize_description(&description)?;
        }
        if let Some(date) = patch.date {
            tx.date = parse_date(&date, DayBound::Start)?;
        }
        if let Some(tags) = patch.tags {
            tx.tags = normalize_tags(tags);
        }

        if !self.storage.update_transaction(&tx).await? {
            // 读取后被并发删除
            return Err(FintrackError::not_found("Transaction not found"));
        }
        Ok(tx)
    }

    pub async fn delete(&self, user_id: &str, id: &str) -> Result<()> {
        if self.storage.delete_transaction(user_id, id).await? {
            Ok(())
        } else {
            Err(FintrackError::not_found("Transaction not found"))
        }
    }

    pub async fn list(&self, user_id: &str, query: TransactionQuery) -> Result<TransactionPage> {
        let page = query.page.unwrap_or(1).max(1);
        let limit = query
            .limit
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .clamp(1, MAX_PAGE_LIMIT);
        validate_page_offset(page, limit)?;

        let filter = TransactionFilter {
            category: parse_filter_enum::<Category>(query.category.as_deref(), "category")?,
            kind: parse_filter_enum::<TransactionType>(query.kind.as_deref(), "type")?,
            start: parse_optional_date(query.start_date.as_deref(), DayBound::Start)?,
            end: parse_optional_date(query.end_date.as_deref(), DayBound::End)?,
        };
        debug!("TransactionService::list filter={:?}", filter);

        let (transactions, total) = self
            .storage
            .list_transactions(user_id, &filter, page, limit)
            .await?;

        Ok(TransactionPage {
            transactions,
            pagination: Pagination::new(page, limit, total),
        })
    }

    pub async fn summary(
        &self,
        user_id: &str,
        period: StatsPeriod,
        now: DateTime<Utc>,
    ) -> Result<SummaryReport> {
        let summary = self.storage.summarize(user_id, period.start(now)).await?;

        Ok(SummaryReport {
            period: period.as_str().to_string(),
            total_income: summary.total_income,
            total_expenses: summary.total_expenses,
            net_income: summary.net_income(),
            transaction_count: summary.transaction_count,
        })
    }

    /// 周期内按分类的支出汇总（总额倒序）
    pub async fn category_breakdown(
        &self,
        user_id: &str,
        period: StatsPeriod,
        now: DateTime<Utc>,
    ) -> Result<CategoryBreakdown> {
        let totals = self
            .storage
            .category_totals(user_id, TransactionType::Expense, period.start(now))
            .await?;

        Ok(CategoryBreakdown {
            period: period.as_str().to_string(),
            categories: totals
                .into_iter()
                .map(|t| CategoryStat {
                    category: t.category,
                    total: t.total,
                    count: t.count,
                })
                .collect(),
        })
    }

    /// 按自然月的收支趋势，缺失月份补 0
    pub async fn trends(
        &self,
        user_id: &str,
        range: StatsPeriod,
        now: DateTime<Utc>,
    ) -> Result<TrendsReport> {
        let months = trailing_months(now, range.trend_months());
        let since = months
            .first()
            .and_then(|&(y, m)| month_start(y, m))
            .unwrap_or(now);

        let totals = self.storage.monthly_totals(user_id, since).await?;

        let trends = months
            .into_iter()
            .map(|(year, month)| {
                let found = totals.iter().find(|t| t.year == year && t.month == month);
                TrendPoint {
                    month: format!("{:04}-{:02}", year, month),
                    income: found.map_or(0.0, |t| t.income),
                    expenses: found.map_or(0.0, |t| t.expenses),
                }
            })
            .collect();

        Ok(TrendsReport {
            range: range.as_str().to_string(),
            trends,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 15, 10, 30, 0).unwrap()
    }

    #[test]
    fn test_period_parse_falls_back_to_month() {
        assert_eq!(StatsPeriod::parse(Some("week")), StatsPeriod::Week);
        assert_eq!(StatsPeriod::parse(Some("YEAR")), StatsPeriod::Year);
        assert_eq!(StatsPeriod::parse(Some("decade")), StatsPeriod::Month);
        assert_eq!(StatsPeriod::parse(None), StatsPeriod::Month);
    }

    #[test]
    fn test_period_start() {
        assert_eq!(
            StatsPeriod::Week.start(now()),
            Utc.with_ymd_and_hms(2025, 3, 8, 10, 30, 0).unwrap()
        );
        assert_eq!(
            StatsPeriod::Month.start(now()),
            Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(
            StatsPeriod::Year.start(now()),
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_trailing_months_wraps_year() {
        let months = trailing_months(now(), 6);
        assert_eq!(
            months,
            vec![(2024, 10), (2024, 11), (2024, 12), (2025, 1), (2025, 2), (2025, 3)]
        );
        assert_eq!(trailing_months(now(), 1), vec![(2025, 3)]);
        assert_eq!(trailing_months(now(), 12).first(), Some(&(2024, 4)));
    }

    #[test]
    fn test_pagination_pages() {
        assert_eq!(Pagination::new(1, 10, 0).pages, 0);
        assert_eq!(Pagination::new(1, 10, 10).pages, 1);
        assert_eq!(Pagination::new(2, 10, 11).pages, 2);
        assert_eq!(Pagination::new(1, 3, 7).pages, 3);
    }

    #[test]
    fn test_validate_page_offset() {
        assert!(validate_page_offset(1, 10).is_ok());
        assert!(validate_page_offset(1, MAX_PAGE_LIMIT).is_ok());
        assert!(validate_page_offset(i64::MAX as u64 / 100 + 1, 100).is_ok());
        assert!(validate_page_offset(i64::MAX as u64 / 100 + 2, 100).is_err());
        assert!(validate_page_offset(1 << 60, 100).is_err());
        assert!(validate_page_offset(u64::MAX, 10).is_err());
        // limit = 1 时任意 page 都不会溢出，但偏移仍受 BIGINT 限制
        assert!(validate_page_offset(u64::MAX, 1).is_err());
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount(0.0).is_ok());
        assert!(validate_amount(12.34).is_ok());
        assert!(validate_amount(-1.0).is_err());
        assert!(validate_amount(f64::NAN).is_err());
        assert!(validate_amount(f64::INFINITY).is_err());
    }

    #[test]
    fn test_normalize_description_and_tags() {
        assert_eq!(normalize_description("  Coffee ").unwrap(), "Coffee");
        assert!(normalize_description("   ").is_err());
        assert_eq!(
            normalize_tags(vec![" work ".into(), "".into(), "  ".into(), "team".into()]),
            vec!["work".to_string(), "team".to_string()]
        );
    }

    #[test]
    fn test_parse_filter_enum() {
        assert_eq!(
            parse_filter_enum::<Category>(Some("Food"), "category").unwrap(),
            Some(Category::Food)
        );
        assert_eq!(parse_filter_enum::<Category>(Some(""), "category").unwrap(), None);
        assert_eq!(parse_filter_enum::<TransactionType>(None, "type").unwrap(), None);
        assert!(parse_filter_enum::<TransactionType>(Some("transfer"), "type").is_err());
    }

    #[test]
    fn test_create_request_wire_format() {
        let req: CreateTransactionRequest = serde_json::from_str(
            r#"{"type":"expense","amount":9.5,"category":"Food","description":"Lunch","tags":["x"]}"#,
        )
        .unwrap();
        assert_eq!(req.kind, TransactionType::Expense);
        assert_eq!(req.date, None);
        assert_eq!(req.tags, vec!["x".to_string()]);
    }
}
