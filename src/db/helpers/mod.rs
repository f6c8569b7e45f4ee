use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};

use crate::db::models::Priority;

/// Current time at the precision timestamps are stored with.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Fixed-width RFC 3339 so text comparison in SQL matches time order.
pub fn format_datetime(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn format_optional_datetime(value: Option<&DateTime<Utc>>) -> Option<String> {
    value.map(format_datetime)
}

pub fn parse_datetime(value: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("failed to parse {field}"))
}

pub fn parse_optional_datetime(
    value: Option<String>,
    field: &str,
) -> Result<Option<DateTime<Utc>>> {
    match value {
        Some(raw) => parse_datetime(&raw, field).map(Some),
        None => Ok(None),
    }
}

pub fn parse_priority(value: &str) -> Result<Priority> {
    Priority::from_name(value).ok_or_else(|| anyhow!("unknown task priority {value}"))
}

/// SQL expression ranking the `priority` column, URGENT highest.
pub const PRIORITY_RANK_SQL: &str = "CASE priority
        WHEN 'URGENT' THEN 3
        WHEN 'HIGH' THEN 2
        WHEN 'MEDIUM' THEN 1
        WHEN 'LOW' THEN 0
        ELSE -1
    END";
