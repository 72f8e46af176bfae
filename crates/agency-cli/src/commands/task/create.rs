use agency_core::enums::{TaskPriority, TaskStatus};
use agency_db::repos::task::NewTask;

use crate::cli::GlobalFlags;
use crate::commands::shared::parse::{parse_date, parse_decimal, parse_enum};
use crate::context::AppContext;
use crate::output::output;

pub struct Params {
    pub project: String,
    pub title: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub start: Option<String>,
    pub due: Option<String>,
    pub estimate: Option<String>,
    pub assignee: Option<String>,
}

pub async fn run(params: Params, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let input = NewTask {
        title: params.title,
        description: params.description,
        status: params
            .status
            .as_deref()
            .map(|value| parse_enum::<TaskStatus>(value, "status"))
            .transpose()?,
        priority: params
            .priority
            .as_deref()
            .map(|value| parse_enum::<TaskPriority>(value, "priority"))
            .transpose()?,
        start_date: params
            .start
            .as_deref()
            .map(|value| parse_date(value, "start"))
            .transpose()?,
        due_date: params
            .due
            .as_deref()
            .map(|value| parse_date(value, "due"))
            .transpose()?,
        estimated_hours: params
            .estimate
            .as_deref()
            .map(|value| parse_decimal(value, "estimate"))
            .transpose()?,
        assignee_id: params.assignee,
    };

    let task = ctx
        .service
        .create_task(&ctx.actor, &params.project, input)
        .await?;
    output(&task, flags.format)
}
