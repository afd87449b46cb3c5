//! Active Lattice Core - Rust Engine
//!
//! Run-and-tumble particles on a periodic square lattice with hard-core
//! exclusion, stepped by deterministic Monte-Carlo sweeps.
//!
//! # Architecture
//!
//! - **rng**: Deterministic PCG32 random streams (owned, never global)
//! - **lattice**: Geometry, directions and the periodic neighbor table
//! - **models**: Particle buffers and their exclusion invariants
//! - **sweep**: Visitation-order shuffle and the move-and-tumble engine
//! - **orchestrator**: Rust-side simulation driver and fingerprints
//!
//! # Critical Invariants
//!
//! 1. At most one particle per site, before and after every move
//! 2. All randomness is deterministic (seeded stream passed explicitly)
//! 3. Table construction consumes no randomness
//! 4. FFI boundary is minimal and validates every buffer

// Module declarations
pub mod error;
pub mod lattice;
pub mod models;
pub mod orchestrator;
pub mod rng;
pub mod sweep;

// Re-exports for convenience
pub use error::KernelError;
pub use lattice::{build_neighbor_table, Direction, LatticeShape, NeighborTable, COORDINATION};
pub use models::{validate_state, ParticleBuffers, ParticleState};
pub use orchestrator::{Simulation, SimulationConfig};
pub use rng::RandomStream;
pub use sweep::{shuffle, sweep, ShuffleMode, SweepEngine, SweepParams, SweepStats};

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn active_lattice_core_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::kernel::PyRandomStream>()?;
    m.add_class::<ffi::lattice::PyLattice>()?;
    m.add_function(wrap_pyfunction!(ffi::kernel::build_neighbor_table, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::kernel::shuffle, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::kernel::sweep, m)?)?;
    Ok(())
}
