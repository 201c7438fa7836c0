use sima_core::entities::ProjectSnapshot;
use sima_core::enums::Dimension;

use crate::criteria::{CriterionScorer, DimensionFault};

const LIKERT_MIN: u8 = 1;
const LIKERT_MAX: u8 = 5;

/// Human factors: mean Likert survey answer rescaled to 0–100.
pub struct HumanScorer;

impl CriterionScorer for HumanScorer {
    fn dimension(&self) -> Dimension {
        Dimension::Human
    }

    fn score(&self, snapshot: &ProjectSnapshot) -> Result<f64, DimensionFault> {
        let survey = snapshot
            .survey
            .as_ref()
            .ok_or(DimensionFault::MissingInput("survey"))?;
        if survey.responses.is_empty() {
            return Err(DimensionFault::Empty("survey.responses"));
        }
        if let Some(bad) = survey
            .responses
            .iter()
            .find(|r| !(LIKERT_MIN..=LIKERT_MAX).contains(*r))
        {
            return Err(DimensionFault::OutOfRange {
                field: "survey.responses",
                value: f64::from(*bad),
            });
        }

        let sum: f64 = survey.responses.iter().map(|r| f64::from(*r)).sum();
        #[allow(clippy::cast_precision_loss)]
        let mean = sum / survey.responses.len() as f64;
        let span = f64::from(LIKERT_MAX - LIKERT_MIN);
        Ok((mean - f64::from(LIKERT_MIN)) / span * 100.0)
    }
}
