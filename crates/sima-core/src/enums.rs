//! Closed enums for scoring dimensions, score status, workflow stages,
//! reviewer decisions and timeline event kinds.
//!
//! Every enum round-trips through a stable string form via `as_str()`, which
//! is what lands in SQL columns. `Stage` is the one enum whose review variants
//! carry a configured name; terminal outcomes are fixed variants.

use std::borrow::Cow;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Dimension
// ---------------------------------------------------------------------------

/// One of the five scoring dimensions of a compliance report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Identity,
    Climate,
    Context,
    Function,
    Human,
}

impl Dimension {
    /// All dimensions in canonical report order.
    pub const ALL: [Self; 5] = [
        Self::Identity,
        Self::Climate,
        Self::Context,
        Self::Function,
        Self::Human,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Climate => "climate",
            Self::Context => "context",
            Self::Function => "function",
            Self::Human => "human",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ScoreStatus
// ---------------------------------------------------------------------------

/// Tri-state compliance status derived from an aggregated total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScoreStatus {
    Pass,
    Conditional,
    Fail,
}

impl ScoreStatus {
    /// Inclusive lower bound for `Pass`.
    pub const PASS_THRESHOLD: f64 = 80.0;
    /// Inclusive lower bound for `Conditional`.
    pub const CONDITIONAL_THRESHOLD: f64 = 50.0;

    /// Classify an already-rounded total.
    #[must_use]
    pub fn from_total(total: f64) -> Self {
        if total >= Self::PASS_THRESHOLD {
            Self::Pass
        } else if total >= Self::CONDITIONAL_THRESHOLD {
            Self::Conditional
        } else {
            Self::Fail
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Conditional => "CONDITIONAL",
            Self::Fail => "FAIL",
        }
    }
}

impl fmt::Display for ScoreStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

/// Workflow stage of a project.
///
/// ```text
/// review(0) → review(1) → … → review(n-1) ─┬→ approved
///     ↑___________ reopen ___________|      └→ rejected
/// (reject is available from any review stage)
/// ```
///
/// Review stage names are configuration; `approved` and `rejected` are
/// absorbing terminal states.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Stage {
    Review(String),
    Approved,
    Rejected,
}

impl Stage {
    pub const APPROVED: &'static str = "approved";
    pub const REJECTED: &'static str = "rejected";

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Review(name) => name,
            Self::Approved => Self::APPROVED,
            Self::Rejected => Self::REJECTED,
        }
    }

    /// Parse a stored stage string.
    ///
    /// # Errors
    ///
    /// Returns a message when the name is empty.
    pub fn parse(name: &str) -> Result<Self, String> {
        match name.trim() {
            "" => Err("stage name must not be empty".to_string()),
            Self::APPROVED => Ok(Self::Approved),
            Self::REJECTED => Ok(Self::Rejected),
            other => Ok(Self::Review(other.to_string())),
        }
    }
}

impl From<Stage> for String {
    fn from(stage: Stage) -> Self {
        match stage {
            Stage::Review(name) => name,
            Stage::Approved => Stage::APPROVED.to_string(),
            Stage::Rejected => Stage::REJECTED.to_string(),
        }
    }
}

impl TryFrom<String> for Stage {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl JsonSchema for Stage {
    fn schema_name() -> Cow<'static, str> {
        "Stage".into()
    }

    fn json_schema(_generator: &mut schemars::SchemaGenerator) -> schemars::Schema {
        schemars::json_schema!({
            "type": "string",
            "minLength": 1
        })
    }
}

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

/// Explicit reviewer decision attached to an advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EventKind
// ---------------------------------------------------------------------------

/// Kind tag of a timeline event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    Upload,
    Analysis,
    Advance,
    Reopen,
    CertificateIssued,
}

impl EventKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Upload => "UPLOAD",
            Self::Analysis => "ANALYSIS",
            Self::Advance => "ADVANCE",
            Self::Reopen => "REOPEN",
            Self::CertificateIssued => "CERTIFICATE_ISSUED",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
