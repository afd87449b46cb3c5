//! Particle state models for the lattice kernel

pub mod state;

// Re-exports
pub use state::{particle_count_from_signed, validate_state, ParticleBuffers, ParticleState};
