use agency_core::enums::Role;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::UserCommands;
use crate::commands::shared::parse::{parse_decimal, parse_enum};
use crate::context::AppContext;
use crate::output::output;

/// Handle `agency user`.
pub async fn handle(
    action: &UserCommands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        UserCommands::Create {
            name,
            email,
            role,
            capacity,
        } => {
            let role = parse_enum::<Role>(role, "role")?;
            let capacity = capacity
                .as_deref()
                .map(|value| parse_decimal(value, "capacity"))
                .transpose()?;
            let user = ctx
                .service
                .create_user(&ctx.actor, name, email, role, capacity.as_ref())
                .await?;
            output(&user, flags.format)
        }
        UserCommands::List => {
            let users = ctx.service.list_users(&ctx.actor).await?;
            output(&users, flags.format)
        }
        UserCommands::Get { id } => {
            let user = ctx.service.get_user(&ctx.actor, id).await?;
            output(&user, flags.format)
        }
        UserCommands::Capacity { id, hours, clear } => {
            let hours = if *clear {
                None
            } else {
                hours
                    .as_deref()
                    .map(|value| parse_decimal(value, "hours"))
                    .transpose()?
            };
            let user = ctx
                .service
                .set_user_capacity(&ctx.actor, id, hours.as_ref())
                .await?;
            output(&user, flags.format)
        }
    }
}
