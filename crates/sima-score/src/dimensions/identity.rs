use sima_core::entities::ProjectSnapshot;
use sima_core::enums::Dimension;

use super::fraction;
use crate::criteria::{CriterionScorer, DimensionFault};

/// Largest deduction for missing the regional window-to-wall target.
const WWR_PENALTY: f64 = 20.0;
/// Deviation from the target at which the full penalty applies.
const WWR_TOLERANCE: f64 = 0.25;

/// Architectural identity: heritage vocabulary, palette and local materials,
/// less a penalty for straying from the regional glazing target.
pub struct IdentityScorer;

impl CriterionScorer for IdentityScorer {
    fn dimension(&self) -> Dimension {
        Dimension::Identity
    }

    fn score(&self, snapshot: &ProjectSnapshot) -> Result<f64, DimensionFault> {
        let g = snapshot
            .geometry
            .as_ref()
            .ok_or(DimensionFault::MissingInput("geometry"))?;
        let heritage = fraction("heritage_ratio", g.heritage_ratio)?;
        let palette = fraction("palette_compliance", g.palette_compliance)?;
        let material = fraction("local_material_ratio", g.local_material_ratio)?;
        let wwr = fraction("window_to_wall_ratio", g.window_to_wall_ratio)?;
        let target = fraction("target_wwr", g.target_wwr)?;

        let base = (heritage + palette + material) / 3.0 * 100.0;
        let deviation = ((wwr - target).abs() / WWR_TOLERANCE).min(1.0);
        Ok(deviation.mul_add(-WWR_PENALTY, base))
    }
}
