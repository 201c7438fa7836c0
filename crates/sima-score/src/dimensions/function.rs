use sima_core::entities::ProjectSnapshot;
use sima_core::enums::Dimension;

use super::{non_negative, positive};
use crate::criteria::{CriterionScorer, DimensionFault};

const COVERAGE_WEIGHT: f64 = 0.75;
const EFFICIENCY_WEIGHT: f64 = 0.25;
/// Net-to-gross ratio at or above which efficiency scores full marks.
const TARGET_EFFICIENCY: f64 = 0.8;

/// Functional programme: how much of each required space is provided, and
/// how efficiently gross area turns into usable area.
pub struct FunctionScorer;

impl CriterionScorer for FunctionScorer {
    fn dimension(&self) -> Dimension {
        Dimension::Function
    }

    fn score(&self, snapshot: &ProjectSnapshot) -> Result<f64, DimensionFault> {
        let p = snapshot
            .program
            .as_ref()
            .ok_or(DimensionFault::MissingInput("program"))?;
        if p.spaces.is_empty() {
            return Err(DimensionFault::Empty("program.spaces"));
        }

        let mut coverage = 0.0;
        for space in &p.spaces {
            let required = positive("required_m2", space.required_m2)?;
            let provided = non_negative("provided_m2", space.provided_m2)?;
            coverage += (provided / required).min(1.0);
        }
        #[allow(clippy::cast_precision_loss)]
        let coverage = coverage / p.spaces.len() as f64;

        let gross = positive("gross_area_m2", p.gross_area_m2)?;
        let net = non_negative("net_area_m2", p.net_area_m2)?;
        if net > gross {
            return Err(DimensionFault::OutOfRange {
                field: "net_area_m2",
                value: net,
            });
        }
        let efficiency = (net / gross / TARGET_EFFICIENCY).min(1.0);

        Ok(100.0 * COVERAGE_WEIGHT.mul_add(coverage, EFFICIENCY_WEIGHT * efficiency))
    }
}
