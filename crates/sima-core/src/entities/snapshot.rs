use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Scoring input for one project, supplied by the upload subsystem.
///
/// Every input block is optional: a missing block fails only the dimension
/// that reads it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ProjectSnapshot {
    #[serde(default)]
    pub meta: SnapshotMeta,
    /// Names of the uploaded source files this snapshot was extracted from.
    #[serde(default)]
    pub files: Vec<String>,
    pub geometry: Option<GeometryInput>,
    pub climate: Option<ClimateInput>,
    pub context: Option<ContextInput>,
    pub program: Option<ProgramInput>,
    pub survey: Option<SurveyInput>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SnapshotMeta {
    pub title: Option<String>,
    pub region: Option<String>,
    pub city: Option<String>,
    pub function: Option<String>,
}

/// Facade and massing descriptors feeding the identity dimension.
/// Ratios are fractions in [0,1].
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct GeometryInput {
    pub heritage_ratio: f64,
    pub palette_compliance: f64,
    pub local_material_ratio: f64,
    pub window_to_wall_ratio: f64,
    /// Regional guideline target for the window-to-wall ratio.
    #[serde(default = "default_target_wwr")]
    pub target_wwr: f64,
}

const fn default_target_wwr() -> f64 {
    0.25
}

/// Envelope and systems parameters for the cooling-energy model.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ClimateInput {
    pub city: String,
    pub floor_area_m2: f64,
    pub window_to_wall_ratio: f64,
    pub u_wall: f64,
    pub u_glass: f64,
    pub hvac_cop: f64,
}

/// Urban context parameters. Ratios are fractions in [0,1].
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ContextInput {
    pub setback_compliance: f64,
    pub height_m: f64,
    pub neighbourhood_height_m: f64,
    pub active_frontage_ratio: f64,
}

/// Functional programme: required versus provided spaces.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ProgramInput {
    pub spaces: Vec<ProgramSpace>,
    pub gross_area_m2: f64,
    pub net_area_m2: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ProgramSpace {
    pub name: String,
    pub required_m2: f64,
    pub provided_m2: f64,
}

/// Human-factors survey: Likert answers on a 1..=5 scale.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SurveyInput {
    pub responses: Vec<u8>,
}
