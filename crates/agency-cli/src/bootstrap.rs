use std::path::Path;

use agency_config::AgencyConfig;
use anyhow::Context;

/// Load `.env` and the layered configuration for `project_root`.
pub fn load_config(project_root: &Path) -> anyhow::Result<AgencyConfig> {
    AgencyConfig::load_with_dotenv(project_root).with_context(|| {
        format!(
            "failed to load configuration for {}",
            project_root.display()
        )
    })
}
