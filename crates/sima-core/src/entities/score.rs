use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Dimension, ScoreStatus};

/// The five bounded sub-scores of a report, each in [0,100].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SubScores {
    pub identity: f64,
    pub climate: f64,
    pub context: f64,
    pub function: f64,
    pub human: f64,
}

impl SubScores {
    #[must_use]
    pub const fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Identity => self.identity,
            Dimension::Climate => self.climate,
            Dimension::Context => self.context,
            Dimension::Function => self.function,
            Dimension::Human => self.human,
        }
    }

    pub const fn set(&mut self, dimension: Dimension, value: f64) {
        match dimension {
            Dimension::Identity => self.identity = value,
            Dimension::Climate => self.climate = value,
            Dimension::Context => self.context = value,
            Dimension::Function => self.function = value,
            Dimension::Human => self.human = value,
        }
    }
}

/// Immutable result of scoring one snapshot revision.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ScoreReport {
    pub project_id: String,
    pub score_version: i64,
    pub snapshot_rev: i64,
    #[serde(flatten)]
    pub scores: SubScores,
    pub total: f64,
    pub status: ScoreStatus,
    pub computed_at: DateTime<Utc>,
}
