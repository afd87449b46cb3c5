//! Fingerprints - Config Hash and State Digest
//!
//! Cheap identity checks for reproducibility: two runs with the same config
//! hash and the same seed must end with the same state digest.
//!
//! Neither fingerprint can be inverted back into a state; the kernel never
//! serializes particle buffers.

use crate::error::KernelError;
use crate::models::state::ParticleState;
use serde::Serialize;
use sha2::{Digest, Sha256};

// ============================================================================
// Config Hashing
// ============================================================================

/// Compute deterministic SHA256 hash of a config
///
/// Uses canonical JSON serialization with sorted keys, so the hash does not
/// depend on field declaration order.
pub fn compute_config_hash<T: Serialize>(config: &T) -> Result<String, KernelError> {
    use serde_json::Value;
    use std::collections::BTreeMap;

    let value = serde_json::to_value(config).map_err(|e| {
        KernelError::InvalidConfig(format!("Config serialization failed: {}", e))
    })?;

    // Recursively sort all object keys for canonical representation
    fn canonicalize(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
            other => other,
        }
    }

    let json = serde_json::to_string(&canonicalize(value)).map_err(|e| {
        KernelError::InvalidConfig(format!("Config serialization failed: {}", e))
    })?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

// ============================================================================
// State Digest
// ============================================================================

/// SHA256 fingerprint of the particle buffers
///
/// Each buffer is length-prefixed and tagged, with every entry written as a
/// little-endian `u64`, so the digest is identical across platforms.
pub fn compute_state_digest(state: &ParticleState) -> String {
    let mut hasher = Sha256::new();

    hash_section(&mut hasher, b"orientation", state.orientation().iter().map(|&o| o as u64));
    hash_section(&mut hasher, b"location", state.location().iter().map(|&s| s as u64));
    hash_section(&mut hasher, b"occupancy", state.occupancy().iter().map(|&c| u64::from(c)));

    format!("{:x}", hasher.finalize())
}

fn hash_section<I>(hasher: &mut Sha256, tag: &[u8], values: I)
where
    I: ExactSizeIterator<Item = u64>,
{
    hasher.update(tag);
    hasher.update((values.len() as u64).to_le_bytes());
    for value in values {
        hasher.update(value.to_le_bytes());
    }
}
