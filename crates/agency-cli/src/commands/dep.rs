use crate::cli::GlobalFlags;
use crate::cli::subcommands::DepCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `agency dep`.
pub async fn handle(
    action: &DepCommands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        DepCommands::Add {
            dependent,
            depends_on,
        } => {
            let edge = ctx
                .service
                .add_task_dependency(&ctx.actor, dependent, depends_on)
                .await?;
            output(&edge, flags.format)
        }
        DepCommands::Remove {
            dependent,
            depends_on,
        } => {
            let removed = ctx
                .service
                .remove_task_dependency(&ctx.actor, dependent, depends_on)
                .await?;
            output(&removed, flags.format)
        }
        DepCommands::List { project, task } => match (project.as_deref(), task.as_deref()) {
            (_, Some(task_id)) => {
                let neighbours = ctx.service.task_dependencies(&ctx.actor, task_id).await?;
                output(&neighbours, flags.format)
            }
            (Some(project_id), None) => {
                let edges = ctx
                    .service
                    .list_project_dependencies(&ctx.actor, project_id)
                    .await?;
                output(&edges, flags.format)
            }
            (None, None) => anyhow::bail!("one of --project or --task must be provided"),
        },
        DepCommands::Schedule { project } => {
            let tasks = ctx.service.project_schedule(&ctx.actor, project).await?;
            output(&tasks, flags.format)
        }
        DepCommands::Blocked { project } => {
            let blocked = ctx.service.blocked_tasks(&ctx.actor, project).await?;
            output(&blocked, flags.format)
        }
        DepCommands::Ready { project } => {
            let ready = ctx.service.ready_tasks(&ctx.actor, project).await?;
            output(&ready, flags.format)
        }
    }
}
