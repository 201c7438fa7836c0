//! Score Aggregator.
//!
//! Weighted sum of the five sub-scores, rounded half-up to one decimal, then
//! classified against the fixed PASS/CONDITIONAL thresholds.

use sima_core::entities::SubScores;
use sima_core::enums::{Dimension, ScoreStatus};
use sima_core::errors::CoreError;

/// Weight sums within this distance of 1.0 are accepted.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Scaled values within this distance of an integer are snapped onto it
/// before rounding, so binary noise such as `82.59999999` rounds as `82.6`.
const ROUNDING_SNAP: f64 = 1e-9;

/// Per-dimension weights. Non-negative, summing to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    identity: f64,
    climate: f64,
    context: f64,
    function: f64,
    human: f64,
}

impl Weights {
    /// # Errors
    ///
    /// Returns `CoreError::Validation` when a weight is negative or
    /// non-finite, or the weights do not sum to 1.
    pub fn new(
        identity: f64,
        climate: f64,
        context: f64,
        function: f64,
        human: f64,
    ) -> Result<Self, CoreError> {
        let weights = Self {
            identity,
            climate,
            context,
            function,
            human,
        };
        for dimension in Dimension::ALL {
            let w = weights.get(dimension);
            if !w.is_finite() || w < 0.0 {
                return Err(CoreError::Validation(format!(
                    "weight for {dimension} must be a non-negative number, got {w}"
                )));
            }
        }
        let sum: f64 = Dimension::ALL.iter().map(|d| weights.get(*d)).sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(CoreError::Validation(format!(
                "scoring weights must sum to 1, got {sum}"
            )));
        }
        Ok(weights)
    }

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
}

impl Default for Weights {
    /// Identity 0.25, climate 0.20, context 0.15, function 0.20, human 0.20.
    fn default() -> Self {
        Self {
            identity: 0.25,
            climate: 0.20,
            context: 0.15,
            function: 0.20,
            human: 0.20,
        }
    }
}

/// Aggregated total and its status.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aggregate {
    pub total: f64,
    pub status: ScoreStatus,
}

/// Round half-up to one decimal place.
#[must_use]
pub fn round_half_up(value: f64) -> f64 {
    let scaled = value * 10.0;
    let nearest = scaled.round();
    let snapped = if (scaled - nearest).abs() < ROUNDING_SNAP {
        nearest
    } else {
        let half = scaled.floor() + 0.5;
        if (scaled - half).abs() < ROUNDING_SNAP {
            half
        } else {
            scaled
        }
    };
    (snapped + 0.5).floor() / 10.0
}

/// Weighted total of `scores`, rounded and classified.
///
/// Summation runs in canonical dimension order, so the result depends only
/// on the values, never on the order the dimensions were computed in.
#[must_use]
pub fn aggregate(scores: &SubScores, weights: &Weights) -> Aggregate {
    let raw: f64 = Dimension::ALL
        .iter()
        .map(|d| weights.get(*d) * scores.get(*d))
        .sum();
    let total = round_half_up(raw.clamp(0.0, 100.0));
    Aggregate {
        total,
        status: ScoreStatus::from_total(total),
    }
}
