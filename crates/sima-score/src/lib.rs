//! # sima-score
//!
//! Criteria scoring and aggregation for the SIMA compliance engine.
//!
//! - [`criteria`]: the five pluggable dimension scorers and the
//!   [`CriteriaScorer`] that runs them independently
//! - [`aggregate`]: weighted total, half-up rounding, PASS/CONDITIONAL/FAIL
//! - [`improve`]: ranked improvement suggestions by weighted headroom

pub mod aggregate;
pub mod criteria;
pub mod dimensions;
pub mod improve;

pub use aggregate::{Aggregate, Weights, aggregate, round_half_up};
pub use criteria::{CriteriaScorer, CriterionScorer, DimensionFault, ScoreOutcome};
pub use improve::suggest_improvements;
