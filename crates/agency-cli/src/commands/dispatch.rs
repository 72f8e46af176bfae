use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    tracing::debug!(
        project_root = %ctx.project_root.display(),
        actor = %ctx.actor.user_id,
        "dispatching command"
    );
    match command {
        Commands::User { action } => commands::user::handle(&action, ctx, flags).await,
        Commands::Project { action } => commands::project::handle(&action, ctx, flags).await,
        Commands::Task { action } => commands::task::handle(&action, ctx, flags).await,
        Commands::Dep { action } => commands::dep::handle(&action, ctx, flags).await,
        Commands::Expense { action } => commands::expense::handle(&action, ctx, flags).await,
        Commands::Time { action } => commands::time::handle(&action, ctx, flags).await,
        Commands::Capacity(args) => commands::capacity::handle(&args, ctx, flags).await,
        Commands::Audit(args) => commands::audit::handle(&args, ctx, flags).await,
        Commands::Init(_) => unreachable!("init is pre-dispatched in main"),
    }
}
