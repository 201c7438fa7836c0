//! Domain error taxonomy for the compliance engine.
//!
//! Storage-specific errors (`DatabaseError`) live in `sima-db` and wrap
//! `CoreError`. Every variant is a concrete, distinguishable kind; callers
//! branch on [`CoreError::is_retryable`] to decide between re-reading and
//! giving up.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::enums::Dimension;

/// A single failed scoring dimension.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DimensionFailure {
    pub dimension: Dimension,
    pub reason: String,
}

/// Errors shared by every SIMA crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// One or more scoring dimensions could not be computed.
    #[error("Partial score for project {project_id}: failed dimensions [{}]", list_dimensions(.failed))]
    PartialScore {
        project_id: String,
        failed: Vec<DimensionFailure>,
    },

    /// The caller's version token no longer matches the project.
    #[error("Stale version for project {project_id}: expected {expected}, current {actual}")]
    StaleVersion {
        project_id: String,
        expected: i64,
        actual: i64,
    },

    /// A workflow transition was attempted that is not allowed.
    #[error("Invalid transition for project {project_id} from {from}: {reason}")]
    InvalidTransition {
        project_id: String,
        from: String,
        reason: String,
    },

    /// Request data failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A certificate was requested for a project that is not approved.
    #[error("Project {project_id} is not approved (stage: {stage})")]
    NotApproved { project_id: String, stage: String },

    /// The timeline ledger could not record an event; the paired state
    /// change was rolled back.
    #[error("Timeline ledger unavailable: {0}")]
    LedgerUnavailable(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CoreError {
    /// Whether the caller may retry the same request after re-reading state.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::StaleVersion { .. } | Self::LedgerUnavailable(_))
    }

    /// Stable machine-readable code for API payloads.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::PartialScore { .. } => "partial_score",
            Self::StaleVersion { .. } => "stale_version",
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::Validation(_) => "validation",
            Self::NotApproved { .. } => "not_approved",
            Self::LedgerUnavailable(_) => "ledger_unavailable",
            Self::Other(_) => "internal",
        }
    }

    pub fn not_found(entity_type: &str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.to_string(),
            id: id.into(),
        }
    }
}

fn list_dimensions(failed: &[DimensionFailure]) -> String {
    failed
        .iter()
        .map(|f| f.dimension.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
