//! Criteria Scorer.
//!
//! Each dimension is computed by its own [`CriterionScorer`]. The
//! [`CriteriaScorer`] runs all five against one snapshot and keeps their
//! results apart: a dimension that faults is reported by name and never
//! affects the values of the others.

use std::collections::BTreeMap;

use sima_core::entities::{ProjectSnapshot, SubScores};
use sima_core::enums::Dimension;
use sima_core::errors::{CoreError, DimensionFailure};
use thiserror::Error;

use crate::aggregate::round_half_up;
use crate::dimensions;

/// Why a single dimension could not be scored.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DimensionFault {
    #[error("missing {0} input")]
    MissingInput(&'static str),

    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },

    #[error("{0} is empty")]
    Empty(&'static str),

    #[error("scorer produced a non-finite value")]
    NonFinite,

    #[error("no scorer registered")]
    Unregistered,
}

/// A deterministic scoring function for one dimension.
pub trait CriterionScorer: Send + Sync {
    fn dimension(&self) -> Dimension;

    /// Raw score for `snapshot`. The caller clamps the result to [0,100]
    /// and rounds it to one decimal.
    ///
    /// # Errors
    ///
    /// Returns a `DimensionFault` when this dimension's input is missing or
    /// malformed.
    fn score(&self, snapshot: &ProjectSnapshot) -> Result<f64, DimensionFault>;
}

/// Per-dimension results of one evaluation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreOutcome {
    pub scores: BTreeMap<Dimension, f64>,
    pub failed: Vec<DimensionFailure>,
}

impl ScoreOutcome {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && self.scores.len() == Dimension::ALL.len()
    }

    /// Convert to a full set of sub-scores.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::PartialScore` naming every failed dimension.
    pub fn into_sub_scores(self, project_id: &str) -> Result<SubScores, CoreError> {
        if !self.is_complete() {
            return Err(CoreError::PartialScore {
                project_id: project_id.to_string(),
                failed: self.failed,
            });
        }
        let mut sub = SubScores::default();
        for (dimension, value) in self.scores {
            sub.set(dimension, value);
        }
        Ok(sub)
    }
}

/// Runs one scorer per dimension.
pub struct CriteriaScorer {
    scorers: BTreeMap<Dimension, Box<dyn CriterionScorer>>,
}

impl CriteriaScorer {
    /// Scorer set with the built-in dimension models.
    #[must_use]
    pub fn standard() -> Self {
        Self::empty()
            .with_scorer(Box::new(dimensions::IdentityScorer))
            .with_scorer(Box::new(dimensions::ClimateScorer))
            .with_scorer(Box::new(dimensions::ContextScorer))
            .with_scorer(Box::new(dimensions::FunctionScorer))
            .with_scorer(Box::new(dimensions::HumanScorer))
    }

    #[must_use]
    pub fn empty() -> Self {
        Self {
            scorers: BTreeMap::new(),
        }
    }

    /// Register `scorer`, replacing any scorer for the same dimension.
    #[must_use]
    pub fn with_scorer(mut self, scorer: Box<dyn CriterionScorer>) -> Self {
        self.scorers.insert(scorer.dimension(), scorer);
        self
    }

    /// Score every dimension of `snapshot` independently.
    #[must_use]
    pub fn evaluate(&self, snapshot: &ProjectSnapshot) -> ScoreOutcome {
        let mut outcome = ScoreOutcome::default();
        for dimension in Dimension::ALL {
            let result = self
                .scorers
                .get(&dimension)
                .map_or(Err(DimensionFault::Unregistered), |scorer| {
                    scorer.score(snapshot)
                })
                .and_then(bounded);
            match result {
                Ok(value) => {
                    outcome.scores.insert(dimension, value);
                }
                Err(fault) => {
                    tracing::debug!(%dimension, %fault, "dimension failed");
                    outcome.failed.push(DimensionFailure {
                        dimension,
                        reason: fault.to_string(),
                    });
                }
            }
        }
        outcome
    }
}

impl Default for CriteriaScorer {
    fn default() -> Self {
        Self::standard()
    }
}

fn bounded(value: f64) -> Result<f64, DimensionFault> {
    if value.is_finite() {
        Ok(round_half_up(value.clamp(0.0, 100.0)))
    } else {
        Err(DimensionFault::NonFinite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Fixed(Dimension, f64);

    impl CriterionScorer for Fixed {
        fn dimension(&self) -> Dimension {
            self.0
        }

        fn score(&self, _snapshot: &ProjectSnapshot) -> Result<f64, DimensionFault> {
            Ok(self.1)
        }
    }

    struct Broken(Dimension);

    impl CriterionScorer for Broken {
        fn dimension(&self) -> Dimension {
            self.0
        }

        fn score(&self, _snapshot: &ProjectSnapshot) -> Result<f64, DimensionFault> {
            Err(DimensionFault::MissingInput("test"))
        }
    }

    fn fixed_all(value: f64) -> CriteriaScorer {
        Dimension::ALL
            .into_iter()
            .fold(CriteriaScorer::empty(), |acc, d| {
                acc.with_scorer(Box::new(Fixed(d, value)))
            })
    }

    #[test]
    fn values_are_clamped() {
        let high = fixed_all(250.0).evaluate(&ProjectSnapshot::default());
        assert!(high.scores.values().all(|v| (*v - 100.0).abs() < f64::EPSILON));

        let low = fixed_all(-3.0).evaluate(&ProjectSnapshot::default());
        assert!(low.scores.values().all(|v| *v == 0.0));
    }

    #[test]
    fn values_are_rounded_to_one_decimal() {
        let outcome = fixed_all(86.799_999_999_7).evaluate(&ProjectSnapshot::default());
        assert_eq!(outcome.scores[&Dimension::Climate], 86.8);
        let outcome = fixed_all(70.25).evaluate(&ProjectSnapshot::default());
        assert_eq!(outcome.scores[&Dimension::Human], 70.3);
    }

    #[test]
    fn non_finite_is_a_fault() {
        let scorer = fixed_all(50.0).with_scorer(Box::new(Fixed(Dimension::Context, f64::NAN)));
        let outcome = scorer.evaluate(&ProjectSnapshot::default());
        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(outcome.failed[0].dimension, Dimension::Context);
    }

    #[test]
    fn failure_is_isolated_to_its_dimension() {
        let scorer = fixed_all(70.0).with_scorer(Box::new(Broken(Dimension::Climate)));
        let outcome = scorer.evaluate(&ProjectSnapshot::default());

        assert!(!outcome.is_complete());
        assert_eq!(outcome.scores.len(), 4);
        assert!(!outcome.scores.contains_key(&Dimension::Climate));
        assert_eq!(outcome.scores[&Dimension::Identity], 70.0);

        let err = outcome.into_sub_scores("prj-x").unwrap_err();
        match err {
            CoreError::PartialScore { failed, .. } => {
                assert_eq!(failed.len(), 1);
                assert_eq!(failed[0].dimension, Dimension::Climate);
            }
            other => panic!("expected PartialScore, got {other:?}"),
        }
    }

    #[test]
    fn unregistered_dimension_fails_alone() {
        let scorer = CriteriaScorer::empty().with_scorer(Box::new(Fixed(Dimension::Human, 60.0)));
        let outcome = scorer.evaluate(&ProjectSnapshot::default());
        assert_eq!(outcome.scores.len(), 1);
        assert_eq!(outcome.failed.len(), 4);
        assert!(
            outcome
                .failed
                .iter()
                .all(|f| f.reason == DimensionFault::Unregistered.to_string())
        );
    }

    #[test]
    fn complete_outcome_converts() {
        let sub = fixed_all(42.0)
            .evaluate(&ProjectSnapshot::default())
            .into_sub_scores("prj-x")
            .unwrap();
        assert_eq!(sub.identity, 42.0);
        assert_eq!(sub.human, 42.0);
    }
}
