//! Inputs to the workflow mutators.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Decision;
use crate::errors::CoreError;

/// Request to move a project one step forward (or to `rejected`).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AdvanceRequest {
    /// The project version the caller last read.
    pub expected_version: i64,
    pub actor: String,
    pub comment: String,
    #[serde(default)]
    pub decision: Option<Decision>,
}

/// Request to send a project back to the initial review stage.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ReopenRequest {
    pub expected_version: i64,
    pub actor: String,
    pub comment: String,
}

/// Reject blank actor and comment fields.
///
/// # Errors
///
/// Returns `CoreError::Validation` naming the first blank field.
pub fn require_attribution(actor: &str, comment: &str) -> Result<(), CoreError> {
    if actor.trim().is_empty() {
        return Err(CoreError::Validation(
            "actor must not be empty".into(),
        ));
    }
    if comment.trim().is_empty() {
        return Err(CoreError::Validation(
            "comment must not be empty".into(),
        ));
    }
    Ok(())
}
