//! Capacity planning: upcoming estimated workload against daily availability.
//!
//! The horizon is a fixed number of days (default 30) multiplied by the user's
//! daily capacity. It is not calendar aware: weekends and holidays count.

use bigdecimal::{BigDecimal, Zero};
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Task, User};

pub const DEFAULT_HORIZON_DAYS: u32 = 30;

/// Read-time workload report for one user.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CapacityReport {
    pub user_id: String,
    pub user_name: String,
    pub daily_capacity_hours: BigDecimal,
    pub horizon_days: u32,
    pub total_capacity: BigDecimal,
    pub total_workload: BigDecimal,
    pub remaining_capacity: BigDecimal,
    pub is_overloaded: bool,
    pub task_count: usize,
}

/// Whether `task` counts toward `user_id`'s upcoming workload.
///
/// It must be assigned to the user, start today or later, and carry an estimate.
#[must_use]
pub fn counts_toward_workload(task: &Task, user_id: &str, today: NaiveDate) -> bool {
    task.assignee_id.as_deref() == Some(user_id)
        && task.start_date.is_some_and(|start| start >= today)
        && task.estimated_hours.is_some()
}

/// Build one report for `user` from the organization's tasks.
#[must_use]
pub fn plan_user(user: &User, tasks: &[Task], today: NaiveDate, horizon_days: u32) -> CapacityReport {
    let upcoming: Vec<&Task> = tasks
        .iter()
        .filter(|t| counts_toward_workload(t, &user.id, today))
        .collect();

    let total_workload: BigDecimal = upcoming
        .iter()
        .filter_map(|t| t.estimated_hours.as_ref())
        .sum();

    let daily = user
        .daily_capacity_hours
        .clone()
        .unwrap_or_else(BigDecimal::zero);
    let total_capacity = &daily * BigDecimal::from(horizon_days);
    let remaining_capacity = &total_capacity - &total_workload;
    let is_overloaded = total_capacity > BigDecimal::zero() && total_workload > total_capacity;

    CapacityReport {
        user_id: user.id.clone(),
        user_name: user.name.clone(),
        daily_capacity_hours: daily,
        horizon_days,
        total_capacity,
        total_workload,
        remaining_capacity,
        is_overloaded,
        task_count: upcoming.len(),
    }
}

/// One report per user, in the order of `users`.
#[must_use]
pub fn plan_capacity(
    users: &[User],
    tasks: &[Task],
    today: NaiveDate,
    horizon_days: u32,
) -> Vec<CapacityReport> {
    users
        .iter()
        .map(|user| plan_user(user, tasks, today, horizon_days))
        .collect()
}
