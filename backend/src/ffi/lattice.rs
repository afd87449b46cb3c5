//! PyO3 wrapper for the simulation driver
//!
//! This module provides the Python `Lattice` class: a self-contained run
//! whose buffers live on the Rust side and are copied out on request.

use pyo3::exceptions::PyIndexError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use super::types::{parse_simulation_config, sweep_stats_to_py};
use crate::orchestrator::Simulation;

/// Python wrapper for Rust Simulation
///
/// # Example (from Python)
///
/// ```python
/// from active_lattice_core_rs import Lattice
///
/// config = {
///     "n_x": 128,
///     "n_y": 128,
///     "density": 0.3,
///     "tumble_probability": 0.05,
///     "rng_seed": 42,
///     "rng_stream": 54,
/// }
///
/// lat = Lattice.new(config)
/// for _ in range(500):          # warm-up
///     lat.step(10)
/// stats = lat.step(10)
/// print(f"acceptance {stats['acceptance_rate']:.3f}")
/// frame = lat.image()           # n_x rows of n_y ints
/// ```
#[pyclass(name = "Lattice", unsendable)]
pub struct PyLattice {
    inner: Simulation,
}

#[pymethods]
impl PyLattice {
    /// Create a new lattice from a configuration dict
    ///
    /// # Errors
    ///
    /// Raises ValueError if:
    /// - Required configuration fields are missing
    /// - Dimensions, particle count or probabilities are out of range
    #[staticmethod]
    fn new(config: &Bound<'_, PyDict>) -> PyResult<Self> {
        let rust_config = parse_simulation_config(config)?;
        let inner = Simulation::new(rust_config)?;
        Ok(PyLattice { inner })
    }

    /// Advance by `repeat` sweeps
    ///
    /// # Returns
    ///
    /// Dictionary of counters for this call: `sweeps`, `attempts`,
    /// `accepted`, `blocked`, `tumbles`, `acceptance_rate`
    fn step(&mut self, py: Python<'_>, repeat: usize) -> PyResult<Py<PyDict>> {
        let stats = self.inner.step(repeat)?;
        sweep_stats_to_py(py, &stats)
    }

    /// Move-and-tumble one particle chosen at random
    fn update_random_particle(&mut self, py: Python<'_>) -> PyResult<Py<PyDict>> {
        let stats = self.inner.update_random_particle()?;
        sweep_stats_to_py(py, &stats)
    }

    /// Scatter the particles over fresh random sites
    fn reset_random_occupancy(&mut self) -> PyResult<()> {
        Ok(self.inner.reset_random_occupancy()?)
    }

    /// Redraw every orientation uniformly
    fn reset_orientations(&mut self) -> PyResult<()> {
        Ok(self.inner.reset_orientations()?)
    }

    /// Neighbors of `site` in Up, Right, Down, Left order
    ///
    /// Raises IndexError for a site outside the lattice
    fn neighbors(&self, site: usize) -> PyResult<Vec<usize>> {
        self.inner
            .neighbors(site)
            .map(|n| n.to_vec())
            .ok_or_else(|| PyIndexError::new_err(format!("site {} outside lattice", site)))
    }

    /// Particle coordinates as `(rows, cols)`, in particle order
    fn positions(&self) -> (Vec<usize>, Vec<usize>) {
        self.inner.positions().into_iter().unzip()
    }

    /// `n_x` rows of `n_y` ints: orientation + 1 on occupied sites, 0 elsewhere
    fn image(&self) -> Vec<Vec<u32>> {
        let ny = self.inner.shape().ny();
        self.inner
            .image()
            .chunks(ny)
            .map(|row| row.iter().map(|&v| u32::from(v)).collect())
            .collect()
    }

    /// SHA256 of the canonical configuration
    fn config_hash(&self) -> PyResult<String> {
        Ok(self.inner.config_hash()?)
    }

    /// SHA256 fingerprint of the particle buffers
    fn state_digest(&self) -> String {
        self.inner.state_digest()
    }

    // ========================================================================
    // Buffer Copies
    // ========================================================================

    #[getter]
    fn orientation(&self) -> Vec<usize> {
        self.inner.state().orientation().to_vec()
    }

    #[getter]
    fn location(&self) -> Vec<usize> {
        self.inner.state().location().to_vec()
    }

    #[getter]
    fn occupancy(&self) -> Vec<u32> {
        self.inner
            .state()
            .occupancy()
            .iter()
            .map(|&c| u32::from(c))
            .collect()
    }

    #[getter]
    fn neighbor_table(&self) -> Vec<usize> {
        self.inner.table().as_slice().to_vec()
    }

    #[getter]
    fn n_x(&self) -> usize {
        self.inner.shape().nx()
    }

    #[getter]
    fn n_y(&self) -> usize {
        self.inner.shape().ny()
    }

    #[getter]
    fn n_sites(&self) -> usize {
        self.inner.shape().num_sites()
    }

    #[getter]
    fn n_particles(&self) -> usize {
        self.inner.state().num_particles()
    }

    #[getter]
    fn tumble_probability(&self) -> f64 {
        self.inner.config().tumble_probability
    }

    #[getter]
    fn sweeps_completed(&self) -> usize {
        self.inner.sweeps_completed()
    }
}
