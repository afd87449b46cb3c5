//! Orchestrator - Rust-side simulation driver
//!
//! Owns a lattice, its particles and a random stream, and steps them through
//! the sweep engine. See `engine.rs` for the driver and `digest.rs` for the
//! reproducibility fingerprints.

pub mod digest;
pub mod engine;

// Re-export main types for convenience
pub use digest::{compute_config_hash, compute_state_digest};
pub use engine::{Simulation, SimulationConfig};
