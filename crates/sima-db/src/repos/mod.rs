//! Repository modules, one per table family. Each adds methods to
//! `SimaService` plus crate-private row helpers that run on an already
//! acquired connection or transaction.

pub mod certificate;
pub mod project;
pub mod score;
pub mod timeline;
pub mod workflow;
