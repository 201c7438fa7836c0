//! Dimension weights for the score aggregator.

use serde::{Deserialize, Serialize};

/// Accepted distance of the weight sum from 1.0.
const SUM_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
pub struct ScoringConfig {
    pub identity: f64,
    pub climate: f64,
    pub context: f64,
    pub function: f64,
    pub human: f64,
}

impl Default for ScoringConfig {
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

impl ScoringConfig {
    fn named(&self) -> [(&'static str, f64); 5] {
        [
            ("identity", self.identity),
            ("climate", self.climate),
            ("context", self.context),
            ("function", self.function),
            ("human", self.human),
        ]
    }

    /// Weights must be non-negative and sum to 1.
    pub(crate) fn check(&self) -> Result<(), (String, String)> {
        for (name, w) in self.named() {
            if !w.is_finite() || w < 0.0 {
                return Err((format!("scoring.{name}"), format!("must be >= 0, got {w}")));
            }
        }
        let sum: f64 = self.named().iter().map(|(_, w)| w).sum();
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            return Err(("scoring".into(), format!("weights must sum to 1, got {sum}")));
        }
        Ok(())
    }
}
