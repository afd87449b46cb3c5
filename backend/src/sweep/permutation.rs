//! Visitation order for a sweep
//!
//! In-place Fisher–Yates over a buffer of particle indices (or any other
//! items), one bounded draw per position.

use crate::rng::RandomStream;
use serde::{Deserialize, Serialize};

/// Swap-partner rule of the shuffle
///
/// The sweep engine also keys its tumble roll on this mode, see
/// [`ShuffleMode::Legacy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShuffleMode {
    /// Partner drawn from `[i, n)`; every permutation equally likely
    #[default]
    Uniform,

    /// Partner drawn from the full range `[0, n)`
    ///
    /// The resulting permutations are NOT uniformly distributed. Sweeps in
    /// this mode also roll tumbles with
    /// [`RandomStream::next_uniform_legacy`], which together replays the
    /// historical kernel draw for draw.
    Legacy,
}

/// Shuffle `items` in place
///
/// Consumes exactly `items.len()` bounded draws from `rng` in both modes.
///
/// # Panics
///
/// Panics if the buffer holds more than `u32::MAX` entries
///
/// # Example
///
/// ```rust
/// use active_lattice_core_rs::{shuffle, RandomStream, ShuffleMode};
///
/// let mut rng = RandomStream::new(42, 54);
/// let mut order: Vec<usize> = (0..10).collect();
/// shuffle(&mut order, &mut rng, ShuffleMode::Uniform);
///
/// let mut sorted = order.clone();
/// sorted.sort_unstable();
/// assert_eq!(sorted, (0..10).collect::<Vec<_>>());
/// ```
pub fn shuffle<T>(items: &mut [T], rng: &mut RandomStream, mode: ShuffleMode) {
    let n = items.len();
    assert!(n <= u32::MAX as usize, "shuffle buffer exceeds u32 range");

    for i in 0..n {
        let j = match mode {
            ShuffleMode::Uniform => i + rng.next_bounded((n - i) as u32) as usize,
            ShuffleMode::Legacy => rng.next_bounded(n as u32) as usize,
        };
        items.swap(i, j);
    }
}
