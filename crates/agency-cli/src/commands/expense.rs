use crate::cli::GlobalFlags;
use crate::cli::subcommands::ExpenseCommands;
use crate::commands::shared::Deleted;
use crate::commands::shared::parse::{date_or_today, parse_decimal};
use crate::context::AppContext;
use crate::output::output;

/// Handle `agency expense`.
pub async fn handle(
    action: &ExpenseCommands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        ExpenseCommands::Add {
            project,
            amount,
            date,
            description,
        } => {
            let amount = parse_decimal(amount, "amount")?;
            let date = date_or_today(date.as_deref(), "date")?;
            let expense = ctx
                .service
                .create_expense(&ctx.actor, project, &amount, date, description)
                .await?;
            output(&expense, flags.format)
        }
        ExpenseCommands::List { project } => {
            let expenses = ctx
                .service
                .list_project_expenses(&ctx.actor, project)
                .await?;
            output(&expenses, flags.format)
        }
        ExpenseCommands::Delete { id } => {
            ctx.service.delete_expense(&ctx.actor, id).await?;
            output(&Deleted::new(id), flags.format)
        }
    }
}
