use sima_core::entities::{ClimateInput, ProjectSnapshot};
use sima_core::enums::Dimension;

use super::{fraction, non_negative, positive};
use crate::criteria::{CriterionScorer, DimensionFault};

/// Points deducted per kWh/m² of annual cooling energy.
const INTENSITY_PENALTY: f64 = 25.0;
/// Glazing share above which an extra deduction applies.
const WWR_CEILING: f64 = 0.3;
const WWR_EXCESS_PENALTY: f64 = 100.0;

/// Cooling degree hours for the known cities.
fn cooling_degree_hours(city: &str) -> f64 {
    match city.trim().to_lowercase().as_str() {
        "الرياض" | "riyadh" => 2200.0,
        "جدة" | "jeddah" => 2600.0,
        "أبها" | "abha" => 1200.0,
        _ => 2000.0,
    }
}

/// Annual cooling energy of one envelope, in MWh.
///
/// # Errors
///
/// Returns `DimensionFault::OutOfRange` for a non-positive floor area or COP,
/// a negative U-value, or a glazing ratio outside [0,1].
pub fn cooling_mwh_per_year(input: &ClimateInput) -> Result<f64, DimensionFault> {
    let area = positive("floor_area_m2", input.floor_area_m2)?;
    let cop = positive("hvac_cop", input.hvac_cop)?;
    let u_wall = non_negative("u_wall", input.u_wall)?;
    let u_glass = non_negative("u_glass", input.u_glass)?;
    let wwr = fraction("window_to_wall_ratio", input.window_to_wall_ratio)?;

    let glass_factor = wwr.mul_add(0.8, 1.0);
    let envelope = u_wall.mul_add(0.6, u_glass * 0.4);
    Ok(cooling_degree_hours(&input.city) * area * envelope * glass_factor / (1e6 * cop))
}

/// Climate responsiveness: `100 - 25 * cooling kWh/m² - 100 * (wwr - 0.3)⁺`.
pub struct ClimateScorer;

impl CriterionScorer for ClimateScorer {
    fn dimension(&self) -> Dimension {
        Dimension::Climate
    }

    fn score(&self, snapshot: &ProjectSnapshot) -> Result<f64, DimensionFault> {
        let input = snapshot
            .climate
            .as_ref()
            .ok_or(DimensionFault::MissingInput("climate"))?;
        let intensity_kwh_m2 = cooling_mwh_per_year(input)? * 1000.0 / input.floor_area_m2;
        let excess = (input.window_to_wall_ratio - WWR_CEILING).max(0.0);
        Ok(100.0 - intensity_kwh_m2 * INTENSITY_PENALTY - excess * WWR_EXCESS_PENALTY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(city: &str, wwr: f64) -> ClimateInput {
        ClimateInput {
            city: city.into(),
            floor_area_m2: 1000.0,
            window_to_wall_ratio: wwr,
            u_wall: 0.5,
            u_glass: 2.0,
            hvac_cop: 3.0,
        }
    }

    #[test]
    fn riyadh_cooling_estimate() {
        // 2200 * 1000 * (0.3 + 0.8) * 1.2 / 3e6
        let cooling = cooling_mwh_per_year(&input("الرياض", 0.25)).unwrap();
        assert!((cooling - 0.968).abs() < 1e-9);
    }

    #[test]
    fn riyadh_score_follows_cooling_intensity() {
        // 0.968 kWh/m² * 25 = 24.2 points, glazing under the ceiling
        let snapshot = ProjectSnapshot {
            climate: Some(input("riyadh", 0.25)),
            ..ProjectSnapshot::default()
        };
        let score = ClimateScorer.score(&snapshot).unwrap();
        assert!((score - 75.8).abs() < 1e-9, "{score}");
    }

    #[test]
    fn latin_city_names_resolve() {
        let arabic = cooling_mwh_per_year(&input("جدة", 0.25)).unwrap();
        let latin = cooling_mwh_per_year(&input("Jeddah", 0.25)).unwrap();
        assert!((arabic - latin).abs() < f64::EPSILON);
    }

    #[test]
    fn hotter_city_scores_lower() {
        let snapshot = |city: &str| ProjectSnapshot {
            climate: Some(input(city, 0.25)),
            ..ProjectSnapshot::default()
        };
        let abha = ClimateScorer.score(&snapshot("abha")).unwrap();
        let jeddah = ClimateScorer.score(&snapshot("jeddah")).unwrap();
        assert!(abha > jeddah);
        assert!((abha - 86.8).abs() < 1e-9, "{abha}");
    }

    #[test]
    fn excess_glazing_is_penalised() {
        let snapshot = |wwr: f64| ProjectSnapshot {
            climate: Some(input("riyadh", wwr)),
            ..ProjectSnapshot::default()
        };
        let modest = ClimateScorer.score(&snapshot(0.3)).unwrap();
        let glassy = ClimateScorer.score(&snapshot(0.5)).unwrap();
        assert!(modest - glassy > 20.0);
    }

    #[test]
    fn zero_cop_faults() {
        let mut bad = input("riyadh", 0.25);
        bad.hvac_cop = 0.0;
        assert!(matches!(
            cooling_mwh_per_year(&bad),
            Err(DimensionFault::OutOfRange {
                field: "hvac_cop",
                ..
            })
        ));
    }
}
