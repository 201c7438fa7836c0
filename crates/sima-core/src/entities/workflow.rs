use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Decision, Stage};

/// One recorded stage transition.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct HistoryEntry {
    pub seq: i64,
    /// `None` for the entry that records project creation.
    pub from_stage: Option<Stage>,
    pub to_stage: Stage,
    pub actor: String,
    pub comment: String,
    pub decision: Option<Decision>,
    /// Project version after this transition.
    pub version: i64,
    pub at: DateTime<Utc>,
}

/// Current workflow position plus its append-only history.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct WorkflowState {
    pub project_id: String,
    pub stage: Stage,
    pub version: i64,
    pub history: Vec<HistoryEntry>,
}
