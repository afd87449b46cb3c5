//! Sweep engine - the per-sweep particle update
//!
//! One sweep visits every particle once, in a fresh random order, and for
//! each one attempts a move along its orientation (blocked by hard-core
//! exclusion) followed by an independent tumble.
//!
//! See `engine.rs` for the update rule and `permutation.rs` for the
//! visitation order.

pub mod engine;
pub mod permutation;

pub use engine::{sweep, SweepEngine, SweepParams, SweepStats};
pub use permutation::{shuffle, ShuffleMode};
