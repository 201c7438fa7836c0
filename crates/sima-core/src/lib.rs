//! # sima-core
//!
//! Core types, workflow transitions, and error types for the SIMA compliance
//! engine.
//!
//! This crate provides the foundational types shared across all SIMA crates:
//! - Entity structs (projects, snapshots, score reports, workflow history,
//!   timeline events, certificates)
//! - Closed enums for dimensions, score status, stages and event kinds
//! - The pure stage transition function (`workflow::StagePlan`)
//! - The domain error taxonomy
//! - Timeline payloads and API response shapes

pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod payloads;
pub mod requests;
pub mod responses;
pub mod workflow;
