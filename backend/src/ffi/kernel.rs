//! PyO3 wrappers for the raw kernel entry points
//!
//! These mirror the call interface of the historical shared library: the
//! host owns every buffer (plain Python lists) and the kernel mutates them in
//! place. The one deliberate difference is the random stream, which is an
//! explicit `RandomStream` object instead of hidden global state.
//!
//! # Example (from Python)
//!
//! ```python
//! from active_lattice_core_rs import RandomStream, build_neighbor_table, sweep
//!
//! table = build_neighbor_table(2, 2)
//! rng = RandomStream(42, 54)
//! orientation, occupancy, location = [1], [1, 0, 0, 0], [0]
//! sweep(4, 1, table, orientation, occupancy, location, 0.0, 1, rng)
//! assert location == [1] and occupancy == [0, 1, 0, 0]
//! ```

use pyo3::prelude::*;
use pyo3::types::PyList;

use super::types::{
    list_to_indices, list_to_occupancy, shuffle_mode_for, write_back, write_back_indices,
};
use crate::error::KernelError;
use crate::lattice::{LatticeShape, NeighborTable};
use crate::models::state::{particle_count_from_signed, ParticleBuffers};
use crate::rng::{RandomStream, DEFAULT_SEED_SEQUENCE, DEFAULT_SEED_STATE};
use crate::sweep::{SweepEngine, SweepParams};

/// Python wrapper for an owned random stream
#[pyclass(name = "RandomStream", unsendable)]
pub struct PyRandomStream {
    inner: RandomStream,
}

#[pymethods]
impl PyRandomStream {
    #[new]
    #[pyo3(signature = (initstate = DEFAULT_SEED_STATE, initseq = DEFAULT_SEED_SEQUENCE))]
    fn new(initstate: u64, initseq: u64) -> Self {
        PyRandomStream {
            inner: RandomStream::new(initstate, initseq),
        }
    }

    /// Deterministically re-initialize the stream
    fn seed(&mut self, initstate: u64, initseq: u64) {
        self.inner.seed(initstate, initseq);
    }

    /// Unbiased integer in `[0, bound)`
    ///
    /// Raises ValueError if `bound` is zero
    fn next_bounded(&mut self, bound: u32) -> PyResult<u32> {
        if bound == 0 {
            return Err(pyo3::exceptions::PyValueError::new_err(
                "bound must be positive",
            ));
        }
        Ok(self.inner.next_bounded(bound))
    }

    /// Uniform float in `[0, 1)`
    fn next_uniform(&mut self) -> f64 {
        self.inner.next_uniform01()
    }
}

/// Build the periodic neighbor table of an `n_x × n_y` lattice
///
/// Returns a flat list of `n_x * n_y * 4` site ids, row-major by site then
/// direction (Up, Right, Down, Left).
#[pyfunction]
pub fn build_neighbor_table(n_x: i64, n_y: i64) -> PyResult<Vec<usize>> {
    let shape = LatticeShape::from_signed(n_x, n_y)?;
    let table = crate::lattice::build_neighbor_table(shape.nx(), shape.ny())?;
    Ok(table.into_vec())
}

/// Shuffle a list in place
///
/// `legacy=True` reproduces the historical full-range swap variant.
#[pyfunction]
#[pyo3(signature = (buffer, rng, legacy = false))]
pub fn shuffle(
    buffer: &Bound<'_, PyList>,
    mut rng: PyRefMut<'_, PyRandomStream>,
    legacy: bool,
) -> PyResult<()> {
    let mut items: Vec<Bound<'_, PyAny>> = buffer.iter().collect();
    crate::sweep::shuffle(&mut items, &mut rng.inner, shuffle_mode_for(legacy));

    for (i, item) in items.iter().enumerate() {
        buffer.set_item(i, item)?;
    }
    Ok(())
}

/// Advance the particles by `repeat` sweeps, mutating the lists in place
///
/// # Errors
///
/// - ValueError for invalid particle counts or probabilities
/// - RuntimeError if the buffers are inconsistent with the table
///
/// The lists are left untouched when an error is raised.
#[pyfunction]
#[pyo3(signature = (
    coordination,
    nparticles,
    table,
    orientation,
    occupancy,
    location,
    tumble_probability,
    repeat,
    rng,
    legacy = false
))]
#[allow(clippy::too_many_arguments)]
pub fn sweep(
    coordination: i64,
    nparticles: i64,
    table: &Bound<'_, PyList>,
    orientation: &Bound<'_, PyList>,
    occupancy: &Bound<'_, PyList>,
    location: &Bound<'_, PyList>,
    tumble_probability: f64,
    repeat: usize,
    mut rng: PyRefMut<'_, PyRandomStream>,
    legacy: bool,
) -> PyResult<()> {
    let coordination = usize::try_from(coordination).map_err(|_| {
        KernelError::CorruptState(format!("coordination {} is negative", coordination))
    })?;
    let table = NeighborTable::from_flat(list_to_indices(table, "table")?, coordination)?;

    let nparticles = particle_count_from_signed(nparticles, table.num_sites())?;
    if orientation.len() != nparticles || location.len() != nparticles {
        return Err(KernelError::CorruptState(format!(
            "nparticles is {} but orientation has {} and location {} entries",
            nparticles,
            orientation.len(),
            location.len()
        ))
        .into());
    }

    let mut orientation_buf = list_to_indices(orientation, "orientation")?;
    let mut occupancy_buf = list_to_occupancy(occupancy)?;
    let mut location_buf = list_to_indices(location, "location")?;

    let params = SweepParams::new(tumble_probability, repeat).with_shuffle(shuffle_mode_for(legacy));
    SweepEngine::new().sweep(
        &table,
        &mut rng.inner,
        ParticleBuffers::new(&mut orientation_buf, &mut occupancy_buf, &mut location_buf),
        &params,
    )?;

    write_back_indices(orientation, &orientation_buf)?;
    write_back(occupancy, &occupancy_buf)?;
    write_back_indices(location, &location_buf)?;
    Ok(())
}
