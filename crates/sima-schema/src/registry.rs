//! Central schema registry for all SIMA types.
//!
//! The `SchemaRegistry` builds JSON Schemas from sima-core types at construction
//! time using [`schemars::schema_for!`] and provides validation via `jsonschema`.

use std::collections::HashMap;

use schemars::schema_for;

use crate::error::SchemaError;

/// Central store of all JSON Schemas in SIMA.
///
/// Built from sima-core types via [`schemars::schema_for!`]. Provides lookup
/// by name and validation of arbitrary JSON values against registered schemas.
pub struct SchemaRegistry {
    schemas: HashMap<&'static str, serde_json::Value>,
}

/// Insert a schema into the map, converting the `schemars` output to a
/// `serde_json::Value`.
macro_rules! register {
    ($map:expr, $name:expr, $ty:ty) => {
        $map.insert(
            $name,
            serde_json::to_value(schema_for!($ty)).expect("schemars output is valid JSON"),
        );
    };
}

impl SchemaRegistry {
    /// Build a new registry containing all entity, timeline payload, request
    /// and response schemas from sima-core.
    ///
    /// # Panics
    ///
    /// Panics if `serde_json::to_value` fails on any `schemars`-generated
    /// schema. This is not expected in practice because `schemars` always
    /// produces valid JSON-serialisable output.
    #[must_use]
    pub fn new() -> Self {
        let mut schemas = HashMap::new();

        // --- Entities (6) ---
        register!(schemas, "project", sima_core::entities::Project);
        register!(schemas, "project_snapshot", sima_core::entities::ProjectSnapshot);
        register!(schemas, "new_project", sima_core::entities::NewProject);
        register!(schemas, "score_report", sima_core::entities::ScoreReport);
        register!(schemas, "workflow_state", sima_core::entities::WorkflowState);
        register!(schemas, "certificate", sima_core::entities::Certificate);

        // --- Timeline (1 envelope + 5 payloads) ---
        register!(schemas, "timeline_event", sima_core::entities::TimelineEvent);
        register!(schemas, "upload_payload", sima_core::payloads::UploadPayload);
        register!(schemas, "analysis_payload", sima_core::payloads::AnalysisPayload);
        register!(schemas, "advance_payload", sima_core::payloads::AdvancePayload);
        register!(schemas, "reopen_payload", sima_core::payloads::ReopenPayload);
        register!(
            schemas,
            "certificate_issued_payload",
            sima_core::payloads::CertificateIssuedPayload
        );

        // --- Requests (2) ---
        register!(schemas, "advance_request", sima_core::requests::AdvanceRequest);
        register!(schemas, "reopen_request", sima_core::requests::ReopenRequest);

        // --- Responses (6) ---
        register!(schemas, "score_response", sima_core::responses::ScoreResponse);
        register!(schemas, "timeline_response", sima_core::responses::TimelineResponse);
        register!(schemas, "advance_response", sima_core::responses::AdvanceResponse);
        register!(schemas, "upload_outcome", sima_core::responses::UploadOutcome);
        register!(schemas, "analysis_response", sima_core::responses::AnalysisResponse);
        register!(
            schemas,
            "improvement_response",
            sima_core::responses::ImprovementResponse
        );

        Self { schemas }
    }

    /// Get a schema by name. Returns `None` if not found.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.schemas.get(name)
    }

    /// Validate a JSON value against a named schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::NotFound` if the schema name is unknown, or
    /// `SchemaError::ValidationFailed` if validation produces errors.
    pub fn validate(&self, name: &str, instance: &serde_json::Value) -> Result<(), SchemaError> {
        let schema = self
            .get(name)
            .ok_or_else(|| SchemaError::NotFound(name.to_string()))?;

        let validator = jsonschema::validator_for(schema)
            .map_err(|e| SchemaError::Generation(format!("{e}")))?;

        let errors: Vec<String> = validator
            .iter_errors(instance)
            .map(|e| format!("{e}"))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::ValidationFailed { errors })
        }
    }

    /// Validate `instance` against `name`, then deserialize it.
    ///
    /// # Errors
    ///
    /// Returns the validation errors, or `SchemaError::Deserialize` when the
    /// value passes the schema but serde still rejects it.
    pub fn parse<T: serde::de::DeserializeOwned>(
        &self,
        name: &str,
        instance: serde_json::Value,
    ) -> Result<T, SchemaError> {
        self.validate(name, &instance)?;
        serde_json::from_value(instance).map_err(|e| SchemaError::Deserialize(e.to_string()))
    }

    /// List all registered schema names.
    #[must_use]
    pub fn list(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.schemas.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Number of registered schemas.
    #[must_use]
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}
