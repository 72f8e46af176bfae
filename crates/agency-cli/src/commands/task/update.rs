use agency_core::enums::{TaskPriority, TaskStatus};
use agency_db::updates::task::{TaskUpdate, TaskUpdateBuilder};

use crate::cli::GlobalFlags;
use crate::commands::shared::parse::{
    nullable, parse_enum, parse_nullable_date, parse_nullable_decimal,
};
use crate::context::AppContext;
use crate::output::output;

pub struct Params {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub start: Option<String>,
    pub due: Option<String>,
    pub estimate: Option<String>,
    pub actual: Option<String>,
    pub assignee: Option<String>,
    pub unassign: bool,
}

pub async fn run(params: Params, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    validate_update_params(&params)?;
    let update = build_update(&params)?;

    let task = ctx
        .service
        .update_task(&ctx.actor, &params.id, update)
        .await?;
    output(&task, flags.format)
}

fn build_update(params: &Params) -> anyhow::Result<TaskUpdate> {
    let mut builder = TaskUpdateBuilder::new();
    if let Some(title) = params.title.as_deref() {
        builder = builder.title(title);
    }
    if let Some(description) = params.description.as_deref() {
        builder = builder.description(nullable(description).map(str::to_string));
    }
    if let Some(status) = params.status.as_deref() {
        builder = builder.status(parse_enum::<TaskStatus>(status, "status")?);
    }
    if let Some(priority) = params.priority.as_deref() {
        builder = builder.priority(parse_enum::<TaskPriority>(priority, "priority")?);
    }
    if let Some(start) = params.start.as_deref() {
        builder = builder.start_date(parse_nullable_date(start, "start")?);
    }
    if let Some(due) = params.due.as_deref() {
        builder = builder.due_date(parse_nullable_date(due, "due")?);
    }
    if let Some(estimate) = params.estimate.as_deref() {
        builder = builder.estimated_hours(parse_nullable_decimal(estimate, "estimate")?);
    }
    if let Some(actual) = params.actual.as_deref() {
        builder = builder.actual_hours(parse_nullable_decimal(actual, "actual")?);
    }
    if let Some(assignee) = params.assignee.as_deref() {
        builder = builder.assignee_id(Some(assignee.to_string()));
    } else if params.unassign {
        builder = builder.assignee_id(None);
    }
    Ok(builder.build())
}

fn validate_update_params(params: &Params) -> anyhow::Result<()> {
    if params.title.is_none()
        && params.description.is_none()
        && params.status.is_none()
        && params.priority.is_none()
        && params.start.is_none()
        && params.due.is_none()
        && params.estimate.is_none()
        && params.actual.is_none()
        && params.assignee.is_none()
        && !params.unassign
    {
        anyhow::bail!(
            "At least one of --title, --description, --status, --priority, --start, --due, --estimate, --actual, --assignee, or --unassign must be provided"
        );
    }
    Ok(())
}
