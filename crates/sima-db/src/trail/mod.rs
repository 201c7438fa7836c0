//! Portable audit trail.
//!
//! A project's timeline exported as JSON Lines, one event per line in `seq`
//! order. The database stays the source of truth; the trail is a copy for
//! archiving and outside review.

pub mod export;

pub use export::read_trail;
