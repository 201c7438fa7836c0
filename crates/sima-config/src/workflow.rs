//! Review workflow configuration.

use serde::{Deserialize, Serialize};
use sima_core::workflow::StagePlan;

fn default_stages() -> Vec<String> {
    StagePlan::standard().stages().to_vec()
}

/// Default attempts for `advance_latest` under version contention.
const fn default_max_attempts() -> u32 {
    3
}

/// Default attempts for a store operation hitting a busy database.
const fn default_busy_retry_attempts() -> u32 {
    4
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkflowConfig {
    /// Ordered review stages. The last one forks to approved/rejected.
    #[serde(default = "default_stages")]
    pub stages: Vec<String>,

    /// Attempts for advance-with-retry before surfacing a stale version.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_busy_retry_attempts")]
    pub busy_retry_attempts: u32,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            stages: default_stages(),
            max_attempts: default_max_attempts(),
            busy_retry_attempts: default_busy_retry_attempts(),
        }
    }
}

impl WorkflowConfig {
    /// The validated stage plan.
    ///
    /// # Errors
    ///
    /// Returns the validation message when the stage list is unusable.
    pub fn plan(&self) -> Result<StagePlan, String> {
        StagePlan::new(self.stages.iter().cloned()).map_err(|e| e.to_string())
    }
}
