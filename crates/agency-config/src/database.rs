//! Local libSQL database location.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

fn default_path() -> String {
    ".agency/agency.db".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Database file. Relative paths resolve against the project directory;
    /// `:memory:` opens a throwaway in-memory database.
    #[serde(default = "default_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
        }
    }
}

impl DatabaseConfig {
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.path == ":memory:"
    }

    /// Resolve the database path against `project_root`.
    #[must_use]
    pub fn resolve(&self, project_root: &Path) -> PathBuf {
        let path = PathBuf::from(&self.path);
        if self.is_in_memory() || path.is_absolute() {
            path
        } else {
            project_root.join(path)
        }
    }
}
