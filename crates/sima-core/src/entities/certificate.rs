use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::ScoreReport;

/// Certification artifact bound to the score report current at issuance.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Certificate {
    pub id: String,
    pub project_id: String,
    pub score_version: i64,
    pub report: ScoreReport,
    pub issued_by: String,
    pub issued_at: DateTime<Utc>,
    /// Hex SHA-256 over the certificate identity and embedded report.
    pub verification_token: String,
}
