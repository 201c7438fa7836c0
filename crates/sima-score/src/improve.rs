//! Improvement suggestions.
//!
//! Ranks dimensions by how many total points closing their gap to 100 would
//! add under the configured weights.

use sima_core::entities::SubScores;
use sima_core::enums::Dimension;
use sima_core::responses::Suggestion;

use crate::aggregate::{Weights, round_half_up};

/// Up to `limit` suggestions, largest projected gain first. Dimensions that
/// are already at 100 or carry zero weight are skipped.
#[must_use]
pub fn suggest_improvements(scores: &SubScores, weights: &Weights, limit: usize) -> Vec<Suggestion> {
    let mut suggestions: Vec<Suggestion> = Dimension::ALL
        .iter()
        .filter_map(|d| {
            let current = scores.get(*d);
            let weight = weights.get(*d);
            let gain = round_half_up(weight * (100.0 - current));
            (gain > 0.0).then_some(Suggestion {
                dimension: *d,
                current,
                weight,
                projected_gain: gain,
            })
        })
        .collect();
    // Stable sort keeps canonical order among equal gains.
    suggestions.sort_by(|a, b| b.projected_gain.total_cmp(&a.projected_gain));
    suggestions.truncate(limit);
    suggestions
}
