use sima_core::entities::ProjectSnapshot;
use sima_core::enums::Dimension;

use super::{fraction, positive};
use crate::criteria::{CriterionScorer, DimensionFault};

const SETBACK_WEIGHT: f64 = 0.4;
const HEIGHT_WEIGHT: f64 = 0.35;
const FRONTAGE_WEIGHT: f64 = 0.25;

/// Urban context fit: setbacks, height relative to the neighbourhood and
/// active street frontage.
pub struct ContextScorer;

impl CriterionScorer for ContextScorer {
    fn dimension(&self) -> Dimension {
        Dimension::Context
    }

    fn score(&self, snapshot: &ProjectSnapshot) -> Result<f64, DimensionFault> {
        let c = snapshot
            .context
            .as_ref()
            .ok_or(DimensionFault::MissingInput("context"))?;
        let setback = fraction("setback_compliance", c.setback_compliance)?;
        let frontage = fraction("active_frontage_ratio", c.active_frontage_ratio)?;
        let height = positive("height_m", c.height_m)?;
        let neighbourhood = positive("neighbourhood_height_m", c.neighbourhood_height_m)?;

        let height_fit = 1.0 - (height / neighbourhood - 1.0).abs().min(1.0);
        Ok(100.0
            * (SETBACK_WEIGHT * setback + HEIGHT_WEIGHT * height_fit + FRONTAGE_WEIGHT * frontage))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sima_core::entities::ContextInput;

    fn snapshot(height: f64) -> ProjectSnapshot {
        ProjectSnapshot {
            context: Some(ContextInput {
                setback_compliance: 1.0,
                height_m: height,
                neighbourhood_height_m: 10.0,
                active_frontage_ratio: 0.5,
            }),
            ..ProjectSnapshot::default()
        }
    }

    #[test]
    fn matching_height_scores_full_height_fit() {
        let score = ContextScorer.score(&snapshot(10.0)).unwrap();
        assert!((score - 87.5).abs() < 1e-9, "{score}");
    }

    #[test]
    fn towering_over_neighbours_loses_height_fit() {
        let score = ContextScorer.score(&snapshot(40.0)).unwrap();
        assert!((score - 52.5).abs() < 1e-9, "{score}");
    }

    #[test]
    fn zero_neighbourhood_height_faults() {
        let mut s = snapshot(10.0);
        if let Some(c) = s.context.as_mut() {
            c.neighbourhood_height_m = 0.0;
        }
        assert!(ContextScorer.score(&s).is_err());
    }
}
