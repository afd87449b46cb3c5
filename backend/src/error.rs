//! Kernel error taxonomy
//!
//! Every failure is a caller-input validation failure, detected eagerly at
//! entry and reported synchronously. Nothing here is fatal to the host.

use thiserror::Error;

/// Errors reported by the lattice kernel
#[derive(Debug, Error, Clone, PartialEq)]
pub enum KernelError {
    #[error("Invalid lattice geometry: {nx} x {ny}")]
    InvalidGeometry { nx: i64, ny: i64 },

    #[error("Invalid particle count: {requested} particles for {available} sites")]
    InvalidParticleCount { requested: i64, available: usize },

    #[error("Tumble probability {0} outside [0, 1]")]
    InvalidProbability(f64),

    #[error("Corrupt state: {0}")]
    CorruptState(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl KernelError {
    pub(crate) fn geometry(nx: usize, ny: usize) -> Self {
        KernelError::InvalidGeometry {
            nx: i64::try_from(nx).unwrap_or(i64::MAX),
            ny: i64::try_from(ny).unwrap_or(i64::MAX),
        }
    }

    pub(crate) fn particle_count(requested: usize, available: usize) -> Self {
        KernelError::InvalidParticleCount {
            requested: i64::try_from(requested).unwrap_or(i64::MAX),
            available,
        }
    }
}
