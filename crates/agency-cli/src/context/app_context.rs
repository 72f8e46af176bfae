use std::path::PathBuf;

use agency_config::{AgencyConfig, PROJECT_DIR};
use agency_core::identity::AuthContext;
use agency_db::service::AgencyService;
use anyhow::Context;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: AgencyService,
    pub config: AgencyConfig,
    pub project_root: PathBuf,
    /// The user every command in this invocation acts as.
    pub actor: AuthContext,
}

impl AppContext {
    /// Open the project database and resolve the acting user.
    pub async fn init(
        project_root: PathBuf,
        config: AgencyConfig,
        actor_override: Option<&str>,
    ) -> anyhow::Result<Self> {
        if !config.database.is_in_memory() && !project_root.join(PROJECT_DIR).is_dir() {
            anyhow::bail!(
                "not an agency project (no {PROJECT_DIR} directory in {}). Run 'agency init' first.",
                project_root.display()
            );
        }

        let service = open_service(&project_root, &config).await?;

        let user_id = resolve_actor_id(actor_override, &config)?;
        let actor = service
            .auth_context(&user_id)
            .await
            .with_context(|| format!("failed to resolve acting user '{user_id}'"))?;
        tracing::debug!(user_id = %actor.user_id, org_id = %actor.org_id, role = %actor.role, "acting user resolved");

        Ok(Self {
            service,
            config,
            project_root,
            actor,
        })
    }
}

/// Open the service on the configured database, creating parent directories.
pub async fn open_service(
    project_root: &std::path::Path,
    config: &AgencyConfig,
) -> anyhow::Result<AgencyService> {
    let db_path = config.database.resolve(project_root);
    if !config.database.is_in_memory()
        && let Some(parent) = db_path.parent()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    AgencyService::new_local(&db_path.to_string_lossy(), config.planning.clone())
        .await
        .with_context(|| format!("failed to open agency database at {}", db_path.display()))
}

fn resolve_actor_id(actor_override: Option<&str>, config: &AgencyConfig) -> anyhow::Result<String> {
    if let Some(user_id) = actor_override.map(str::trim).filter(|id| !id.is_empty()) {
        return Ok(user_id.to_string());
    }

    config
        .actor
        .require_user_id()
        .map(str::to_string)
        .context("no acting user: pass --as USER_ID or set actor.user_id (AGENCY_ACTOR__USER_ID)")
}
