//! Local libSQL store configuration.

use serde::{Deserialize, Serialize};

/// Path accepted by `sima-db` for a throwaway in-memory store.
pub const IN_MEMORY: &str = ":memory:";

fn default_path() -> String {
    ".sima/sima.db".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Database file path, or `:memory:`.
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
    pub fn is_in_memory(&self) -> bool {
        self.path == IN_MEMORY
    }
}
