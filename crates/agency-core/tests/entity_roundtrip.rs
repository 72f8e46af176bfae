//! Serde roundtrip and JsonSchema validation tests for all entity types.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, Utc};
use schemars::schema_for;
use agency_core::audit_detail::{CapacityChangedDetail, DependencyDetail, StatusChangedDetail};
use agency_core::capacity::CapacityReport;
use agency_core::entities::*;
use agency_core::enums::*;
use agency_core::identity::AuthContext;
use agency_core::responses::*;
use agency_core::rollup::ProjectFinancials;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

fn dec(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            // Serde roundtrip
            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            // Schema validation
            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

fn sample_project() -> Project {
    Project {
        id: "prj-1a2b3c4d".into(),
        org_id: "org-0f0f0f0f".into(),
        name: "Spring campaign".into(),
        description: Some("Landing pages and paid social".into()),
        client_name: Some("Northwind".into()),
        status: ProjectStatus::Active,
        budget: Some(dec("12500.00")),
        currency: "EUR".into(),
        start_date: Some(date(2026, 3, 1)),
        end_date: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn sample_task() -> Task {
    Task {
        id: "tsk-9e8d7c6b".into(),
        org_id: "org-0f0f0f0f".into(),
        project_id: "prj-1a2b3c4d".into(),
        title: "Hero banner copy".into(),
        description: None,
        status: TaskStatus::InReview,
        priority: TaskPriority::High,
        start_date: Some(date(2026, 3, 3)),
        due_date: Some(date(2026, 3, 6)),
        estimated_hours: Some(dec("6.5")),
        actual_hours: Some(dec("7")),
        assignee_id: Some("usr-5a5a5a5a".into()),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

roundtrip_and_validate!(
    organization_roundtrip,
    Organization,
    Organization {
        id: "org-0f0f0f0f".into(),
        name: "Brightline Studio".into(),
        created_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    user_roundtrip,
    User,
    User {
        id: "usr-5a5a5a5a".into(),
        org_id: "org-0f0f0f0f".into(),
        name: "Ana Ruiz".into(),
        email: "ana@brightline.test".into(),
        role: Role::Manager,
        daily_capacity_hours: Some(dec("6")),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
);

roundtrip_and_validate!(project_roundtrip, Project, sample_project());

roundtrip_and_validate!(task_roundtrip, Task, sample_task());

roundtrip_and_validate!(
    dependency_roundtrip,
    TaskDependency,
    TaskDependency {
        dependent_id: "tsk-9e8d7c6b".into(),
        depends_on_id: "tsk-11112222".into(),
        created_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    expense_roundtrip,
    Expense,
    Expense {
        id: "exp-abcdef01".into(),
        org_id: "org-0f0f0f0f".into(),
        project_id: "prj-1a2b3c4d".into(),
        amount: dec("249.99"),
        date: date(2026, 3, 4),
        description: "Stock imagery licence".into(),
        created_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    time_entry_roundtrip,
    TimeEntry,
    TimeEntry {
        id: "tim-01020304".into(),
        org_id: "org-0f0f0f0f".into(),
        project_id: "prj-1a2b3c4d".into(),
        task_id: Some("tsk-9e8d7c6b".into()),
        user_id: "usr-5a5a5a5a".into(),
        hours: dec("3.25"),
        hourly_rate: Some(dec("95")),
        date: date(2026, 3, 4),
        description: Some("First draft".into()),
        created_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    audit_entry_roundtrip,
    AuditEntry,
    AuditEntry {
        id: "aud-77778888".into(),
        org_id: "org-0f0f0f0f".into(),
        actor_id: Some("usr-5a5a5a5a".into()),
        entity_type: EntityType::TaskDependency,
        entity_id: "tsk-9e8d7c6b".into(),
        action: AuditAction::Linked,
        detail: Some(serde_json::json!({"depends_on_id": "tsk-11112222"})),
        created_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    auth_context_roundtrip,
    AuthContext,
    AuthContext::new("usr-5a5a5a5a", "org-0f0f0f0f", Role::Admin)
);

roundtrip_and_validate!(
    project_summary_roundtrip,
    ProjectSummary,
    ProjectSummary {
        project: sample_project(),
        financials: ProjectFinancials::compute(Some(&dec("1000")), &[], &[]),
    }
);

roundtrip_and_validate!(
    blocked_task_roundtrip,
    BlockedTask,
    BlockedTask {
        task: sample_task(),
        blocked_by: vec!["tsk-11112222".into()],
    }
);

roundtrip_and_validate!(
    capacity_report_roundtrip,
    CapacityReport,
    CapacityReport {
        user_id: "usr-5a5a5a5a".into(),
        user_name: "Ana Ruiz".into(),
        daily_capacity_hours: dec("4"),
        horizon_days: 30,
        total_capacity: dec("120"),
        total_workload: dec("200"),
        remaining_capacity: dec("-80"),
        is_overloaded: true,
        task_count: 1,
    }
);

roundtrip_and_validate!(
    dependency_removed_roundtrip,
    DependencyRemoved,
    DependencyRemoved {
        dependent_id: "tsk-9e8d7c6b".into(),
        depends_on_id: "tsk-11112222".into(),
        removed: false,
    }
);

// --- Audit detail types ---

roundtrip_and_validate!(
    status_changed_detail_roundtrip,
    StatusChangedDetail,
    StatusChangedDetail {
        from: "to_do".into(),
        to: "done".into(),
    }
);

roundtrip_and_validate!(
    dependency_detail_roundtrip,
    DependencyDetail,
    DependencyDetail {
        project_id: "prj-1a2b3c4d".into(),
        dependent_id: "tsk-9e8d7c6b".into(),
        depends_on_id: "tsk-11112222".into(),
    }
);

roundtrip_and_validate!(
    capacity_changed_detail_roundtrip,
    CapacityChangedDetail,
    CapacityChangedDetail {
        from: None,
        to: Some("6".into()),
    }
);

// --- Schema rejection tests ---

#[test]
fn schema_rejects_task_without_project() {
    let schema = serde_json::to_value(schema_for!(Task)).unwrap();
    let mut invalid = serde_json::to_value(sample_task()).unwrap();
    invalid.as_object_mut().unwrap().remove("project_id");
    let errors = validate_against_schema(&schema, &invalid);
    assert!(!errors.is_empty(), "Should reject task without 'project_id'");
}

#[test]
fn schema_rejects_invalid_status_value() {
    let schema = serde_json::to_value(schema_for!(Task)).unwrap();
    let mut invalid = serde_json::to_value(sample_task()).unwrap();
    invalid["status"] = serde_json::json!("TO_DO");
    let errors = validate_against_schema(&schema, &invalid);
    assert!(!errors.is_empty(), "Should reject non snake_case status");
}

#[test]
fn decimals_serialize_as_strings() {
    let json = serde_json::to_value(sample_project()).unwrap();
    assert!(json["budget"].is_string(), "budget should be a JSON string: {json}");
}
