//! Per-project financial rollups derived at read time.

use bigdecimal::{BigDecimal, Zero};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Expense, TimeEntry};

/// Derived, never persisted project totals.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ProjectFinancials {
    pub budget: BigDecimal,
    pub total_expenses: BigDecimal,
    /// Σ `hours * hourly_rate`, missing rates count as zero.
    pub total_billable_time: BigDecimal,
    pub total_hours: BigDecimal,
    /// `budget - total_expenses + total_billable_time`
    pub profitability: BigDecimal,
}

impl ProjectFinancials {
    /// Reduce already-fetched expenses and time entries of one project.
    ///
    /// A missing budget counts as zero.
    #[must_use]
    pub fn compute(
        budget: Option<&BigDecimal>,
        expenses: &[Expense],
        time_entries: &[TimeEntry],
    ) -> Self {
        let budget = budget.cloned().unwrap_or_else(BigDecimal::zero);
        let total_expenses = total_expenses(expenses);
        let total_billable_time = total_billable_time(time_entries);
        let total_hours: BigDecimal = time_entries.iter().map(|t| &t.hours).sum();
        let profitability = &budget - &total_expenses + &total_billable_time;

        Self {
            budget,
            total_expenses,
            total_billable_time,
            total_hours,
            profitability,
        }
    }
}

#[must_use]
pub fn total_expenses(expenses: &[Expense]) -> BigDecimal {
    expenses.iter().map(|e| &e.amount).sum()
}

#[must_use]
pub fn total_billable_time(time_entries: &[TimeEntry]) -> BigDecimal {
    time_entries
        .iter()
        .filter_map(|t| t.hourly_rate.as_ref().map(|rate| &t.hours * rate))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    fn expense(amount: &str) -> Expense {
        Expense {
            id: format!("exp-{amount}"),
            org_id: "org-1".into(),
            project_id: "prj-1".into(),
            amount: dec(amount),
            date: day(),
            description: "stock photos".into(),
            created_at: Utc::now(),
        }
    }

    fn entry(hours: &str, rate: Option<&str>) -> TimeEntry {
        TimeEntry {
            id: format!("tim-{hours}"),
            org_id: "org-1".into(),
            project_id: "prj-1".into(),
            task_id: None,
            user_id: "usr-1".into(),
            hours: dec(hours),
            hourly_rate: rate.map(dec),
            date: day(),
            description: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn expenses_reduce_profitability() {
        let f = ProjectFinancials::compute(
            Some(&dec("1000")),
            &[expense("100"), expense("50")],
            &[],
        );
        assert_eq!(f.total_expenses, dec("150"));
        assert_eq!(f.total_billable_time, dec("0"));
        assert_eq!(f.profitability, dec("850"));
    }

    #[test]
    fn billable_time_is_hours_times_rate() {
        let f = ProjectFinancials::compute(None, &[], &[entry("5", Some("20"))]);
        assert_eq!(f.total_billable_time, dec("100"));
        assert_eq!(f.profitability, dec("100"));
    }

    #[test]
    fn missing_rate_bills_nothing_but_counts_hours() {
        let f = ProjectFinancials::compute(
            Some(&dec("10")),
            &[],
            &[entry("2.5", None), entry("1.5", Some("40.00"))],
        );
        assert_eq!(f.total_billable_time, dec("60"));
        assert_eq!(f.total_hours, dec("4"));
        assert_eq!(f.profitability, dec("70"));
    }

    #[test]
    fn empty_project_is_all_zero() {
        let f = ProjectFinancials::compute(None, &[], &[]);
        assert_eq!(f.budget, dec("0"));
        assert_eq!(f.profitability, dec("0"));
    }

    #[test]
    fn decimal_amounts_do_not_drift() {
        let expenses: Vec<Expense> = (0..10).map(|_| expense("0.1")).collect();
        assert_eq!(total_expenses(&expenses), dec("1"));
    }
}
