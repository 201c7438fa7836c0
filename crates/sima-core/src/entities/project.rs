use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::ProjectSnapshot;
use crate::enums::Stage;

/// A submitted architecture project moving through review.
///
/// `version` is the optimistic-concurrency token: it increments by exactly
/// one on every stage transition and on nothing else. `snapshot_rev` counts
/// uploads; `score_version` points at the current `ScoreReport` (0 = none).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Project {
    pub id: String,
    pub tracking_no: String,
    pub title: Option<String>,
    pub region: Option<String>,
    pub city: Option<String>,
    pub function: Option<String>,
    pub stage: Stage,
    pub version: i64,
    pub snapshot_rev: i64,
    pub score_version: i64,
    pub latest_snapshot: Option<ProjectSnapshot>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Descriptive fields for registering a project ahead of its first upload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewProject {
    pub title: String,
    pub region: Option<String>,
    pub city: Option<String>,
    pub function: Option<String>,
}
