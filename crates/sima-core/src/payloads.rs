//! Typed timeline payloads.
//!
//! Each `EventKind` carries one of these structs serialized into the event's
//! `payload` column.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Decision, ScoreStatus, Stage};
use crate::errors::DimensionFailure;

/// Payload for `EventKind::Upload`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct UploadPayload {
    pub actor: String,
    pub files: Vec<String>,
    pub snapshot_rev: i64,
    /// True when this upload created the project.
    pub created: bool,
}

/// Payload for `EventKind::Analysis`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct AnalysisPayload {
    pub snapshot_rev: i64,
    pub complete: bool,
    pub score_version: Option<i64>,
    pub total: Option<f64>,
    pub status: Option<ScoreStatus>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<DimensionFailure>,
}

/// Payload for `EventKind::Advance`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AdvancePayload {
    pub actor: String,
    pub from: Stage,
    pub to: Stage,
    pub decision: Option<Decision>,
    pub comment: String,
    pub version: i64,
}

/// Payload for `EventKind::Reopen`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ReopenPayload {
    pub actor: String,
    pub from: Stage,
    pub to: Stage,
    pub comment: String,
    pub version: i64,
}

/// Payload for `EventKind::CertificateIssued`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CertificateIssuedPayload {
    pub certificate_id: String,
    pub score_version: i64,
    pub verification_token: String,
    pub actor: String,
}
