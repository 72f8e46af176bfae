mod create;
mod update;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::TaskCommands;
use crate::commands::shared::Deleted;
use crate::context::AppContext;
use crate::output::output;

/// Handle `agency task`.
pub async fn handle(
    action: &TaskCommands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        TaskCommands::Create {
            project,
            title,
            description,
            status,
            priority,
            start,
            due,
            estimate,
            assignee,
        } => {
            create::run(
                create::Params {
                    project: project.clone(),
                    title: title.clone(),
                    description: description.clone(),
                    status: status.clone(),
                    priority: priority.clone(),
                    start: start.clone(),
                    due: due.clone(),
                    estimate: estimate.clone(),
                    assignee: assignee.clone(),
                },
                ctx,
                flags,
            )
            .await
        }
        TaskCommands::Update {
            id,
            title,
            description,
            status,
            priority,
            start,
            due,
            estimate,
            actual,
            assignee,
            unassign,
        } => {
            update::run(
                update::Params {
                    id: id.clone(),
                    title: title.clone(),
                    description: description.clone(),
                    status: status.clone(),
                    priority: priority.clone(),
                    start: start.clone(),
                    due: due.clone(),
                    estimate: estimate.clone(),
                    actual: actual.clone(),
                    assignee: assignee.clone(),
                    unassign: *unassign,
                },
                ctx,
                flags,
            )
            .await
        }
        TaskCommands::List { project } => {
            let tasks = ctx.service.list_project_tasks(&ctx.actor, project).await?;
            output(&tasks, flags.format)
        }
        TaskCommands::Get { id } => {
            let task = ctx.service.get_task(&ctx.actor, id).await?;
            output(&task, flags.format)
        }
        TaskCommands::Delete { id } => {
            ctx.service.delete_task(&ctx.actor, id).await?;
            output(&Deleted::new(id), flags.format)
        }
    }
}
