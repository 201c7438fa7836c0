//! # sima-schema
//!
//! JSON Schema generation, validation, and registry for SIMA.
//!
//! - `SchemaRegistry`: central store of the JSON Schemas of every entity,
//!   timeline payload, request and response type
//! - Validation of untrusted JSON (uploaded snapshots, request bodies) with
//!   per-field error messages before deserialization
//! - Schema export for external tooling (`sima schema`)
//!
//! Types are defined in `sima-core` with `#[derive(JsonSchema)]`; this crate
//! is the lookup and validation layer on top.

mod error;
mod registry;

pub use error::SchemaError;
pub use registry::SchemaRegistry;
