//! Built-in dimension models.
//!
//! Each model reads exactly one input block of the snapshot. A missing or
//! malformed block produces a [`DimensionFault`] for that dimension only.

mod climate;
mod context;
mod function;
mod human;
mod identity;

pub use climate::{ClimateScorer, cooling_mwh_per_year};
pub use context::ContextScorer;
pub use function::FunctionScorer;
pub use human::HumanScorer;
pub use identity::IdentityScorer;

use crate::criteria::DimensionFault;

/// Require `value` to be a finite fraction in [0,1].
fn fraction(field: &'static str, value: f64) -> Result<f64, DimensionFault> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(DimensionFault::OutOfRange { field, value })
    }
}

/// Require `value` to be finite and strictly positive.
fn positive(field: &'static str, value: f64) -> Result<f64, DimensionFault> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(DimensionFault::OutOfRange { field, value })
    }
}

/// Require `value` to be finite and not negative.
fn non_negative(field: &'static str, value: f64) -> Result<f64, DimensionFault> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(DimensionFault::OutOfRange { field, value })
    }
}
