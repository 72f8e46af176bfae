use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;

/// Parse a snake_case enum value using serde-deserialization.
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let normalized = raw.replace('-', "_");
    let json = format!("\"{normalized}\"");
    serde_json::from_str(&json).map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

/// Parse a decimal amount such as `1250.50`.
pub fn parse_decimal(raw: &str, field: &str) -> anyhow::Result<BigDecimal> {
    BigDecimal::from_str(raw.trim())
        .map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(raw: &str, field: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|error| anyhow::anyhow!("invalid {field} '{raw}' (expected YYYY-MM-DD): {error}"))
}

/// `none` (or an empty string) clears a nullable field on update.
#[must_use]
pub fn nullable(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(trimmed)
    }
}

pub fn parse_nullable_date(raw: &str, field: &str) -> anyhow::Result<Option<NaiveDate>> {
    nullable(raw).map(|value| parse_date(value, field)).transpose()
}

pub fn parse_nullable_decimal(raw: &str, field: &str) -> anyhow::Result<Option<BigDecimal>> {
    nullable(raw)
        .map(|value| parse_decimal(value, field))
        .transpose()
}

/// Today's date in local time, or the parsed override.
pub fn date_or_today(raw: Option<&str>, field: &str) -> anyhow::Result<NaiveDate> {
    raw.map_or_else(
        || Ok(chrono::Local::now().date_naive()),
        |value| parse_date(value, field),
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use agency_core::enums::{ProjectStatus, TaskStatus};
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn parses_snake_case_enum() {
        let status: TaskStatus = parse_enum("in_review", "status").expect("status should parse");
        assert_eq!(status, TaskStatus::InReview);
    }

    #[test]
    fn parses_hyphenated_alias() {
        let status: ProjectStatus = parse_enum("on-hold", "status").expect("status should parse");
        assert_eq!(status, ProjectStatus::OnHold);
    }

    #[test]
    fn errors_on_invalid_enum() {
        let err = parse_enum::<TaskStatus>("finished", "status").expect_err("should fail");
        assert!(err.to_string().contains("invalid status 'finished'"));
    }

    #[test]
    fn decimals_keep_their_scale() {
        let amount = parse_decimal(" 1250.50 ", "amount").expect("amount should parse");
        assert_eq!(amount.to_string(), "1250.50");
        assert!(parse_decimal("12,5", "amount").is_err());
    }

    #[test]
    fn dates_require_iso_format() {
        assert_eq!(
            parse_date("2026-03-01", "start").expect("date should parse"),
            NaiveDate::from_ymd_opt(2026, 3, 1).expect("valid date")
        );
        let err = parse_date("01/03/2026", "start").expect_err("should fail");
        assert!(err.to_string().contains("expected YYYY-MM-DD"));
    }

    #[test]
    fn none_clears_nullable_fields() {
        assert_eq!(parse_nullable_date("none", "due").expect("should parse"), None);
        assert_eq!(parse_nullable_decimal("", "budget").expect("should parse"), None);
        assert!(parse_nullable_decimal("4.5", "estimate").expect("should parse").is_some());
    }

    #[test]
    fn explicit_date_overrides_today() {
        let date = date_or_today(Some("2026-01-31"), "date").expect("date should parse");
        assert_eq!(date, NaiveDate::from_ymd_opt(2026, 1, 31).expect("valid date"));
    }
}
