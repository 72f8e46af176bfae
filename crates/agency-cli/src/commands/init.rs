use std::path::Path;

use agency_config::{AgencyConfig, PROJECT_DIR};
use agency_core::responses::InitResponse;
use anyhow::Context;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::InitArgs;
use crate::context::open_service;
use crate::output::output;

/// Handle `agency init`.
///
/// Runs before an acting user exists, so it needs no `AuthContext`.
pub async fn handle(
    args: &InitArgs,
    project_root: &Path,
    config: AgencyConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let agency_dir = project_root.join(PROJECT_DIR);
    std::fs::create_dir_all(&agency_dir)
        .with_context(|| format!("failed to create {}", agency_dir.display()))?;

    let service = open_service(project_root, &config).await?;
    let (organization, admin) = service
        .create_organization(&args.org, &args.admin_name, &args.admin_email)
        .await?;
    tracing::info!(org_id = %organization.id, admin_id = %admin.id, "organization initialized");

    if !flags.quiet {
        eprintln!(
            "Act as the admin with --as {id} or set AGENCY_ACTOR__USER_ID={id}",
            id = admin.id
        );
    }

    output(
        &InitResponse {
            organization,
            admin,
        },
        flags.format,
    )
}
