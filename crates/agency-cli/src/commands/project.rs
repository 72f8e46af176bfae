use agency_core::enums::ProjectStatus;
use agency_db::repos::project::NewProject;
use agency_db::updates::project::{ProjectUpdate, ProjectUpdateBuilder};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ProjectCommands;
use crate::commands::shared::Deleted;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::{
    nullable, parse_date, parse_decimal, parse_enum, parse_nullable_date, parse_nullable_decimal,
};
use crate::context::AppContext;
use crate::output::output;

/// Handle `agency project`.
pub async fn handle(
    action: &ProjectCommands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        ProjectCommands::Create {
            name,
            description,
            client,
            status,
            budget,
            currency,
            start,
            end,
        } => {
            let input = NewProject {
                name: name.clone(),
                description: description.clone(),
                client_name: client.clone(),
                status: status
                    .as_deref()
                    .map(|value| parse_enum::<ProjectStatus>(value, "status"))
                    .transpose()?,
                budget: budget
                    .as_deref()
                    .map(|value| parse_decimal(value, "budget"))
                    .transpose()?,
                currency: currency.clone(),
                start_date: start
                    .as_deref()
                    .map(|value| parse_date(value, "start"))
                    .transpose()?,
                end_date: end
                    .as_deref()
                    .map(|value| parse_date(value, "end"))
                    .transpose()?,
            };
            let project = ctx.service.create_project(&ctx.actor, input).await?;
            output(&project, flags.format)
        }
        ProjectCommands::List { financials } => {
            let limit = effective_limit(flags.limit, ctx.config.general.default_limit);
            if *financials {
                let summaries = ctx.service.list_project_summaries(&ctx.actor, limit).await?;
                output(&summaries, flags.format)
            } else {
                let projects = ctx.service.list_projects(&ctx.actor, limit).await?;
                output(&projects, flags.format)
            }
        }
        ProjectCommands::Get { id } => {
            let project = ctx.service.get_project(&ctx.actor, id).await?;
            output(&project, flags.format)
        }
        ProjectCommands::Update {
            id,
            name,
            description,
            client,
            status,
            budget,
            currency,
            start,
            end,
        } => {
            let update = build_update(
                name.as_deref(),
                description.as_deref(),
                client.as_deref(),
                status.as_deref(),
                budget.as_deref(),
                currency.as_deref(),
                start.as_deref(),
                end.as_deref(),
            )?;
            let project = ctx.service.update_project(&ctx.actor, id, update).await?;
            output(&project, flags.format)
        }
        ProjectCommands::Delete { id } => {
            ctx.service.delete_project(&ctx.actor, id).await?;
            output(&Deleted::new(id), flags.format)
        }
        ProjectCommands::Financials { id } => {
            let financials = ctx.service.project_financials(&ctx.actor, id).await?;
            output(&financials, flags.format)
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn build_update(
    name: Option<&str>,
    description: Option<&str>,
    client: Option<&str>,
    status: Option<&str>,
    budget: Option<&str>,
    currency: Option<&str>,
    start: Option<&str>,
    end: Option<&str>,
) -> anyhow::Result<ProjectUpdate> {
    let mut builder = ProjectUpdateBuilder::new();
    if let Some(name) = name {
        builder = builder.name(name);
    }
    if let Some(description) = description {
        builder = builder.description(nullable(description).map(str::to_string));
    }
    if let Some(client) = client {
        builder = builder.client_name(nullable(client).map(str::to_string));
    }
    if let Some(status) = status {
        builder = builder.status(parse_enum::<ProjectStatus>(status, "status")?);
    }
    if let Some(budget) = budget {
        builder = builder.budget(parse_nullable_decimal(budget, "budget")?);
    }
    if let Some(currency) = currency {
        builder = builder.currency(currency);
    }
    if let Some(start) = start {
        builder = builder.start_date(parse_nullable_date(start, "start")?);
    }
    if let Some(end) = end {
        builder = builder.end_date(parse_nullable_date(end, "end")?);
    }

    let update = builder.build();
    if update.is_empty() {
        anyhow::bail!(
            "At least one of --name, --description, --client, --status, --budget, --currency, --start, or --end must be provided"
        );
    }
    Ok(update)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::build_update;

    #[test]
    fn rejects_noop_update() {
        let err = build_update(None, None, None, None, None, None, None, None)
            .expect_err("should fail");
        assert!(err.to_string().contains("At least one of"));
    }

    #[test]
    fn none_clears_budget() {
        let update = build_update(None, None, None, None, Some("none"), None, None, None)
            .expect("update should build");
        assert_eq!(update.budget, Some(None));
    }

    #[test]
    fn status_is_parsed() {
        let update = build_update(None, None, None, Some("on-hold"), None, None, None, None)
            .expect("update should build");
        assert_eq!(
            update.status,
            Some(agency_core::enums::ProjectStatus::OnHold)
        );
    }
}
