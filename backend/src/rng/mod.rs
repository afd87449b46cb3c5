//! Deterministic random number generation
//!
//! Uses the PCG32 (XSH-RR) generator, seeded from a `(state, stream)` pair.
//! CRITICAL: All randomness in the kernel MUST go through this module, and
//! every stream is an explicitly owned value. There is no global generator.

mod pcg32;

pub use pcg32::{RandomStream, DEFAULT_SEED_SEQUENCE, DEFAULT_SEED_STATE, LEGACY_RAND_MAX};
