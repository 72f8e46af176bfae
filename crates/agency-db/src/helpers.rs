//! Row-to-entity parsing helpers.
//!
//! Every repo needs to convert `libsql::Row` (column-indexed) into typed entity
//! structs. These helpers isolate the parsing logic: the dual datetime format
//! (`SQLite`'s `datetime('now')` vs Rust's `to_rfc3339()`), decimals stored as
//! TEXT, and ISO calendar dates.

use std::str::FromStr;

use agency_core::enums::EntityType;
use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};

use crate::error::DatabaseError;

/// Parse a required TEXT column as `DateTime<Utc>`.
///
/// Handles both RFC 3339 (`"2026-02-09T14:30:00+00:00"`) and `SQLite`'s default
/// format (`"2026-02-09 14:30:00"`).
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string cannot be parsed as either format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| DatabaseError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Parse a TEXT column into a serde-deserializable enum.
///
/// Works with all agency-core enums that use `#[serde(rename_all = "snake_case")]`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string does not match any enum variant.
pub fn parse_enum<T: serde::de::DeserializeOwned>(s: &str) -> Result<T, DatabaseError> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|e| DatabaseError::Query(format!("Failed to parse enum from '{s}': {e}")))
}

/// Read a nullable TEXT column. Returns `None` for both SQL NULL and empty string.
///
/// `row.get::<String>(idx)` on a NULL column returns an error, not `""`.
/// You must use `get::<Option<String>>()` for nullable columns.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    match row.get::<Option<String>>(idx)? {
        Some(s) if s.is_empty() => Ok(None),
        other => Ok(other),
    }
}

/// Extract an optional JSON value from a TEXT column.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty string contains invalid JSON.
pub fn parse_optional_json(s: Option<&str>) -> Result<Option<serde_json::Value>, DatabaseError> {
    match s {
        Some(s) if !s.is_empty() => {
            let val = serde_json::from_str(s)
                .map_err(|e| DatabaseError::Query(format!("Invalid JSON in column: {e}")))?;
            Ok(Some(val))
        }
        _ => Ok(None),
    }
}

/// Parse a decimal stored as TEXT.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the text is not a decimal number.
pub fn parse_decimal(s: &str) -> Result<BigDecimal, DatabaseError> {
    BigDecimal::from_str(s)
        .map_err(|e| DatabaseError::Query(format!("Failed to parse decimal '{s}': {e}")))
}

/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty string is not a decimal number.
pub fn parse_optional_decimal(s: Option<&str>) -> Result<Option<BigDecimal>, DatabaseError> {
    s.filter(|s| !s.is_empty()).map(parse_decimal).transpose()
}

/// Parse an ISO `YYYY-MM-DD` date column.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the text is not a calendar date.
pub fn parse_date(s: &str) -> Result<NaiveDate, DatabaseError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| DatabaseError::Query(format!("Failed to parse date '{s}': {e}")))
}

/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty string is not a calendar date.
pub fn parse_optional_date(s: Option<&str>) -> Result<Option<NaiveDate>, DatabaseError> {
    s.filter(|s| !s.is_empty()).map(parse_date).transpose()
}

/// Bind value for an optional decimal column.
#[must_use]
pub fn decimal_value(d: Option<&BigDecimal>) -> libsql::Value {
    d.map_or(libsql::Value::Null, |d| libsql::Value::Text(d.to_string()))
}

/// Bind value for an optional date column.
#[must_use]
pub fn date_value(d: Option<NaiveDate>) -> libsql::Value {
    d.map_or(libsql::Value::Null, |d| libsql::Value::Text(d.to_string()))
}

/// Bind value for an optional text column.
#[must_use]
pub fn text_value(s: Option<&str>) -> libsql::Value {
    s.map_or(libsql::Value::Null, |s| libsql::Value::Text(s.to_string()))
}

/// Map `EntityType` to the corresponding SQL table name.
///
/// Uses exhaustive match: adding a new `EntityType` variant forces updating this.
#[must_use]
pub const fn entity_type_to_table(entity: &EntityType) -> &'static str {
    match entity {
        EntityType::Organization => "organizations",
        EntityType::User => "users",
        EntityType::Project => "projects",
        EntityType::Task => "tasks",
        EntityType::TaskDependency => "task_dependencies",
        EntityType::Expense => "expenses",
        EntityType::TimeEntry => "time_entries",
    }
}
