//! Type conversion utilities for FFI boundary
//!
//! Converts between Rust kernel types and PyO3-compatible types (PyDict,
//! PyList, plain ints).

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use crate::error::KernelError;
use crate::orchestrator::SimulationConfig;
use crate::rng::{DEFAULT_SEED_SEQUENCE, DEFAULT_SEED_STATE};
use crate::sweep::{ShuffleMode, SweepStats};

// ========================================================================
// Error Conversion
// ========================================================================

impl From<KernelError> for PyErr {
    fn from(err: KernelError) -> Self {
        match err {
            KernelError::CorruptState(_) => PyRuntimeError::new_err(err.to_string()),
            _ => PyValueError::new_err(err.to_string()),
        }
    }
}

// ========================================================================
// PyDict Extraction Helpers
// ========================================================================

/// Extract a required field from a Python dict with clear error messages.
///
/// # Errors
/// Returns PyValueError if the field is missing, or the conversion error if
/// the value has the wrong type
fn extract_required<'py, T>(dict: &Bound<'py, PyDict>, key: &str) -> PyResult<T>
where
    T: FromPyObject<'py>,
{
    dict.get_item(key)?
        .ok_or_else(|| PyValueError::new_err(format!("Missing required field '{}'", key)))?
        .extract()
}

/// Extract an optional field from a Python dict.
///
/// `None` values count as missing.
fn extract_optional<'py, T>(dict: &Bound<'py, PyDict>, key: &str) -> PyResult<Option<T>>
where
    T: FromPyObject<'py>,
{
    match dict.get_item(key)? {
        Some(value) if !value.is_none() => Ok(Some(value.extract()?)),
        _ => Ok(None),
    }
}

/// Extract a field with a default value if missing.
fn extract_with_default<'py, T>(dict: &Bound<'py, PyDict>, key: &str, default: T) -> PyResult<T>
where
    T: FromPyObject<'py>,
{
    Ok(extract_optional(dict, key)?.unwrap_or(default))
}

// ========================================================================
// Configuration Parsers
// ========================================================================

/// Convert Python dict to SimulationConfig
///
/// Required keys: `n_x`, `n_y`, `tumble_probability`, and exactly one of
/// `n_particles` / `density`. Optional: `rng_seed`, `rng_stream`,
/// `shuffle` (`"uniform"` or `"legacy"`).
///
/// Range checks are left to [`SimulationConfig::validate`].
pub fn parse_simulation_config(py_config: &Bound<'_, PyDict>) -> PyResult<SimulationConfig> {
    let nx: usize = extract_required(py_config, "n_x")?;
    let ny: usize = extract_required(py_config, "n_y")?;
    let tumble_probability: f64 = extract_required(py_config, "tumble_probability")?;

    let n_particles: Option<usize> = extract_optional(py_config, "n_particles")?;
    let density: Option<f64> = extract_optional(py_config, "density")?;

    let config = match (n_particles, density) {
        (Some(n), None) => SimulationConfig::new(nx, ny, n, tumble_probability),
        (None, Some(density)) => {
            SimulationConfig::from_density(nx, ny, density, tumble_probability)?
        }
        (Some(_), Some(_)) => {
            return Err(PyValueError::new_err(
                "Specify only one of 'n_particles' and 'density'",
            ))
        }
        (None, None) => {
            return Err(PyValueError::new_err(
                "Missing required field 'n_particles' (or 'density')",
            ))
        }
    };

    let rng_seed: u64 = extract_with_default(py_config, "rng_seed", DEFAULT_SEED_STATE)?;
    let rng_stream: u64 = extract_with_default(py_config, "rng_stream", DEFAULT_SEED_SEQUENCE)?;
    let shuffle: String = extract_with_default(py_config, "shuffle", "uniform".to_string())?;

    Ok(config
        .with_seed(rng_seed, rng_stream)
        .with_shuffle(parse_shuffle_mode(&shuffle)?))
}

pub fn parse_shuffle_mode(name: &str) -> PyResult<ShuffleMode> {
    match name.to_ascii_lowercase().as_str() {
        "uniform" => Ok(ShuffleMode::Uniform),
        "legacy" => Ok(ShuffleMode::Legacy),
        other => Err(PyValueError::new_err(format!(
            "Unknown shuffle mode '{}' (expected 'uniform' or 'legacy')",
            other
        ))),
    }
}

pub fn shuffle_mode_for(legacy: bool) -> ShuffleMode {
    if legacy {
        ShuffleMode::Legacy
    } else {
        ShuffleMode::Uniform
    }
}

// ========================================================================
// Buffer Conversion
// ========================================================================

/// Read a list of non-negative ints (site ids, orientations, occupancy)
pub fn list_to_indices(list: &Bound<'_, PyList>, name: &str) -> PyResult<Vec<usize>> {
    let raw: Vec<i64> = list.extract()?;
    raw.into_iter()
        .enumerate()
        .map(|(i, value)| {
            usize::try_from(value).map_err(|_| {
                PyErr::from(KernelError::CorruptState(format!(
                    "{}[{}] is negative ({})",
                    name, i, value
                )))
            })
        })
        .collect()
}

/// Read an occupancy list; values must fit a byte
pub fn list_to_occupancy(list: &Bound<'_, PyList>) -> PyResult<Vec<u8>> {
    let raw: Vec<i64> = list.extract()?;
    raw.into_iter()
        .enumerate()
        .map(|(i, value)| {
            u8::try_from(value).map_err(|_| {
                PyErr::from(KernelError::CorruptState(format!(
                    "occupancy[{}] is {}",
                    i, value
                )))
            })
        })
        .collect()
}

/// Overwrite a host list in place with new values
pub fn write_back<T>(list: &Bound<'_, PyList>, values: &[T]) -> PyResult<()>
where
    T: Copy + Into<i64>,
{
    for (i, &value) in values.iter().enumerate() {
        let value: i64 = value.into();
        list.set_item(i, value)?;
    }
    Ok(())
}

/// Overwrite a host list of indices in place
pub fn write_back_indices(list: &Bound<'_, PyList>, values: &[usize]) -> PyResult<()> {
    for (i, &value) in values.iter().enumerate() {
        list.set_item(i, value)?;
    }
    Ok(())
}

// ========================================================================
// Result Conversion
// ========================================================================

/// Convert SweepStats to Python dict
pub fn sweep_stats_to_py(py: Python<'_>, stats: &SweepStats) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new(py);

    dict.set_item("sweeps", stats.sweeps)?;
    dict.set_item("attempts", stats.attempts)?;
    dict.set_item("accepted", stats.accepted)?;
    dict.set_item("blocked", stats.blocked)?;
    dict.set_item("tumbles", stats.tumbles)?;
    dict.set_item("acceptance_rate", stats.acceptance_rate())?;

    Ok(dict.unbind())
}
