//! Response shapes shared by the REST surface and the `sima` CLI.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Project, ScoreReport, TimelineEvent};
use crate::enums::{Dimension, ScoreStatus, Stage};
use crate::errors::DimensionFailure;

/// `GET /v1/project/{id}/score`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ScoreResponse {
    pub identity: f64,
    pub climate: f64,
    pub context: f64,
    pub function: f64,
    pub human: f64,
    pub total: f64,
    pub status: ScoreStatus,
}

impl From<&ScoreReport> for ScoreResponse {
    fn from(report: &ScoreReport) -> Self {
        Self {
            identity: report.scores.identity,
            climate: report.scores.climate,
            context: report.scores.context,
            function: report.scores.function,
            human: report.scores.human,
            total: report.total,
            status: report.status,
        }
    }
}

/// `GET /v1/project/{id}/timeline`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TimelineResponse {
    pub events: Vec<TimelineEvent>,
}

/// `POST /v1/workflow/{id}/advance` and `/reopen`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AdvanceResponse {
    pub stage: Stage,
    pub version: i64,
}

/// Result of an upload: the project after intake plus the analysis outcome.
///
/// `report` is `None` when any dimension failed (`failed` names them) or when
/// a newer upload replaced the snapshot while it was being scored
/// (`superseded`). In both cases the previous report, if any, stays current.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct UploadOutcome {
    pub project: Project,
    pub report: Option<ScoreReport>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<DimensionFailure>,
    #[serde(default)]
    pub superseded: bool,
}

/// `GET /v1/project/{id}/analysis`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct AnalysisResponse {
    pub project: Project,
    pub report: Option<ScoreReport>,
}

/// One ranked improvement opportunity.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Suggestion {
    pub dimension: Dimension,
    pub current: f64,
    pub weight: f64,
    /// Increase of the total if this dimension reached 100.
    pub projected_gain: f64,
}

/// `POST /v1/project/{id}/improve`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ImprovementResponse {
    pub project_id: String,
    pub total: f64,
    pub status: ScoreStatus,
    pub suggestions: Vec<Suggestion>,
}
