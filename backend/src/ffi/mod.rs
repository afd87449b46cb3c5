//! FFI (Foreign Function Interface) module
//!
//! PyO3 bindings exposing the lattice kernel to a Python host.
//!
//! # Design Principles
//!
//! 1. **Minimal boundary**: table builder, stream, shuffle, sweep, lattice driver
//! 2. **Simple types**: Python ints, lists and dicts at the boundary
//! 3. **Validate inputs**: every buffer is checked before the kernel mutates it
//! 4. **Safe errors**: kernel errors become `ValueError` / `RuntimeError`
//! 5. **All-or-nothing writes**: host lists are only written after a
//!    successful call

pub mod kernel;
pub mod lattice;
pub mod types;
