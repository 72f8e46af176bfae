use agency_db::repos::time_entry::NewTimeEntry;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::TimeCommands;
use crate::commands::shared::Deleted;
use crate::commands::shared::parse::{date_or_today, parse_decimal};
use crate::context::AppContext;
use crate::output::output;

/// Handle `agency time`.
pub async fn handle(
    action: &TimeCommands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        TimeCommands::Log {
            project,
            task,
            user,
            hours,
            rate,
            date,
            description,
        } => {
            let mut input = NewTimeEntry::new(
                project.as_str(),
                parse_decimal(hours, "hours")?,
                date_or_today(date.as_deref(), "date")?,
            );
            input.task_id.clone_from(task);
            input.user_id.clone_from(user);
            input.hourly_rate = rate
                .as_deref()
                .map(|value| parse_decimal(value, "rate"))
                .transpose()?;
            input.description.clone_from(description);

            let entry = ctx.service.log_time(&ctx.actor, input).await?;
            output(&entry, flags.format)
        }
        TimeCommands::List { project } => {
            let entries = ctx
                .service
                .list_project_time_entries(&ctx.actor, project)
                .await?;
            output(&entries, flags.format)
        }
        TimeCommands::Delete { id } => {
            ctx.service.delete_time_entry(&ctx.actor, id).await?;
            output(&Deleted::new(id), flags.format)
        }
    }
}
