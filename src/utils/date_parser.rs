use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::errors::{FintrackError, Result};

/// 日期边界：date-only 输入取当天起点还是终点
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayBound {
    Start,
    End,
}

/// 解析查询 / 请求体中的日期
///
/// 支持的格式：
/// - RFC3339：`2025-03-01T12:00:00Z`、`2025-03-01T12:00:00+08:00`
/// - 纯日期：`2025-03-01`，按 UTC 解释，`DayBound::End` 时取 23:59:59.999
pub fn parse_date(input: &str, bound: DayBound) -> Result<DateTime<Utc>> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| FintrackError::date_parse(format!("Invalid date: '{}'", input)))?;

    let time = match bound {
        DayBound::Start => NaiveTime::MIN,
        DayBound::End => NaiveTime::from_hms_milli_opt(23, 59, 59, 999)
            .ok_or_else(|| FintrackError::date_parse("Invalid end-of-day time"))?,
    };

    Ok(Utc.from_utc_datetime(&date.and_time(time)))
}

/// 解析可选日期；空字符串视为未提供
pub fn parse_optional_date(
    input: Option<&str>,
    bound: DayBound,
) -> Result<Option<DateTime<Utc>>> {
    match input.map(str::trim) {
        Some(s) if !s.is_empty() => parse_date(s, bound).map(Some),
        _ => Ok(None),
    }
}
