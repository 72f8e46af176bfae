use crate::cli::GlobalFlags;
use crate::cli::root_commands::CapacityArgs;
use crate::commands::shared::parse::date_or_today;
use crate::context::AppContext;
use crate::output::output;

/// Handle `agency capacity`.
///
/// Without `--user` this is the team report and needs a manager-level actor.
pub async fn handle(
    args: &CapacityArgs,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let today = date_or_today(args.today.as_deref(), "today")?;

    if let Some(user_id) = args.user.as_deref() {
        let report = ctx.service.user_capacity(&ctx.actor, user_id, today).await?;
        return output(&report, flags.format);
    }

    let reports = ctx.service.capacity_report(&ctx.actor, today).await?;
    output(&reports, flags.format)
}
