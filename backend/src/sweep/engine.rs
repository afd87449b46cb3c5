//! Sweep Engine
//!
//! Advances the run-and-tumble dynamics by whole Monte-Carlo sweeps.
//!
//! # Update Rule
//!
//! For every repeat, the visitation order is reshuffled, then each particle
//! `p` in that order:
//! 1. Looks up `dest = table[location[p] * coordination + orientation[p]]`
//! 2. Moves there if `occupancy[dest] == 0`, otherwise stays (exclusion)
//! 3. Draws `r` uniform in `[0, 1)`; if `r < tumble_probability`, redraws its
//!    orientation uniformly (possibly the same one)
//!
//! In [`ShuffleMode::Legacy`] step 3 uses the historical `RAND_MAX` roll, so
//! the whole sweep replays the historical kernel draw for draw.
//!
//! Moves are applied immediately, so particles later in the order see the
//! moves of earlier ones within the same sweep.
//!
//! # Critical Invariants
//!
//! - **Exclusion**: every single move keeps the occupancy mask consistent
//! - **Determinism**: same stream state + same buffers → same result
//! - **Validation first**: buffers are checked before any mutation, so a
//!   rejected call leaves them untouched

use crate::error::KernelError;
use crate::lattice::NeighborTable;
use crate::models::state::{check_state_with, ParticleBuffers};
use crate::rng::RandomStream;
use crate::sweep::permutation::{shuffle, ShuffleMode};
use tracing::{debug, trace};

/// Parameters of one sweep call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepParams {
    /// Probability of redrawing the orientation after each move attempt
    pub tumble_probability: f64,

    /// Number of sweeps to run
    pub repeat: usize,

    /// Visitation-order shuffle and tumble roll
    pub shuffle: ShuffleMode,
}

impl SweepParams {
    pub fn new(tumble_probability: f64, repeat: usize) -> Self {
        Self {
            tumble_probability,
            repeat,
            shuffle: ShuffleMode::default(),
        }
    }

    pub fn with_shuffle(mut self, shuffle: ShuffleMode) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// # Errors
    ///
    /// `InvalidProbability` unless `0 <= tumble_probability <= 1`
    pub fn validate(&self) -> Result<(), KernelError> {
        validate_probability(self.tumble_probability)
    }
}

pub(crate) fn validate_probability(p: f64) -> Result<(), KernelError> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(KernelError::InvalidProbability(p))
    }
}

/// Counters accumulated over a sweep call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    /// Completed sweeps
    pub sweeps: usize,

    /// Move attempts (one per particle per sweep)
    pub attempts: usize,

    /// Attempts that moved the particle
    pub accepted: usize,

    /// Attempts blocked by an occupied destination
    pub blocked: usize,

    /// Orientation redraws
    pub tumbles: usize,
}

impl SweepStats {
    /// Fraction of move attempts that succeeded (0 when nothing was attempted)
    pub fn acceptance_rate(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            self.accepted as f64 / self.attempts as f64
        }
    }

    pub fn merge(&mut self, other: &SweepStats) {
        self.sweeps += other.sweeps;
        self.attempts += other.attempts;
        self.accepted += other.accepted;
        self.blocked += other.blocked;
        self.tumbles += other.tumbles;
    }
}

/// Reusable sweep driver
///
/// Owns the visitation-order buffer and the validation scratch space so that
/// repeated calls do not allocate once the buffers have grown to size.
///
/// # Example
///
/// ```rust
/// use active_lattice_core_rs::{
///     build_neighbor_table, ParticleState, RandomStream, SweepEngine, SweepParams,
/// };
///
/// let table = build_neighbor_table(2, 2).unwrap();
/// let mut state = ParticleState::from_locations(4, vec![0], vec![1]).unwrap();
/// let mut rng = RandomStream::new(42, 54);
/// let mut engine = SweepEngine::new();
///
/// let stats = engine
///     .sweep(&table, &mut rng, state.buffers_mut(), &SweepParams::new(0.0, 1))
///     .unwrap();
///
/// assert_eq!(stats.accepted, 1);
/// assert_eq!(state.location(), &[1]);
/// assert_eq!(state.occupancy(), &[0, 1, 0, 0]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SweepEngine {
    order: Vec<usize>,
    seen: Vec<bool>,
}

impl SweepEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `params.repeat` sweeps over the buffers
    ///
    /// # Errors
    ///
    /// - `InvalidProbability` if the tumble probability is outside `[0, 1]`
    /// - `InvalidParticleCount` if there are no particles or more particles
    ///   than sites
    /// - `CorruptState` if the buffers are inconsistent with each other or
    ///   with the table
    pub fn sweep(
        &mut self,
        table: &NeighborTable,
        rng: &mut RandomStream,
        mut buffers: ParticleBuffers<'_>,
        params: &SweepParams,
    ) -> Result<SweepStats, KernelError> {
        params.validate()?;
        let draw_bound = self.check_entry(table, &buffers)?;

        let n = buffers.num_particles();
        self.order.clear();
        self.order.extend(0..n);

        let mut stats = SweepStats::default();
        for k in 0..params.repeat {
            shuffle(&mut self.order, rng, params.shuffle);

            for &p in &self.order {
                update_particle(
                    table,
                    rng,
                    &mut buffers,
                    p,
                    params.tumble_probability,
                    params.shuffle,
                    draw_bound,
                    &mut stats,
                )?;
            }
            stats.sweeps += 1;
            trace!(sweep = k, accepted = stats.accepted, "sweep complete");
        }

        debug!(
            particles = n,
            sweeps = stats.sweeps,
            accepted = stats.accepted,
            blocked = stats.blocked,
            tumbles = stats.tumbles,
            "sweep call finished"
        );
        Ok(stats)
    }

    /// Update a single particle chosen uniformly at random, with replacement
    ///
    /// This is the random-sequential variant of the dynamics: no visitation
    /// order, one particle per call. Tumbles use the corrected roll.
    pub fn update_random_particle(
        &mut self,
        table: &NeighborTable,
        rng: &mut RandomStream,
        mut buffers: ParticleBuffers<'_>,
        tumble_probability: f64,
    ) -> Result<SweepStats, KernelError> {
        validate_probability(tumble_probability)?;
        let draw_bound = self.check_entry(table, &buffers)?;

        let n = u32::try_from(buffers.num_particles()).map_err(|_| {
            KernelError::CorruptState(format!(
                "{} particles exceed the random stream range",
                buffers.num_particles()
            ))
        })?;
        let p = rng.next_bounded(n) as usize;

        let mut stats = SweepStats::default();
        update_particle(
            table,
            rng,
            &mut buffers,
            p,
            tumble_probability,
            ShuffleMode::Uniform,
            draw_bound,
            &mut stats,
        )?;
        Ok(stats)
    }

    /// Validate the buffers and return the orientation draw bound
    fn check_entry(
        &mut self,
        table: &NeighborTable,
        buffers: &ParticleBuffers<'_>,
    ) -> Result<u32, KernelError> {
        check_state_with(
            &mut self.seen,
            table.num_sites(),
            table.coordination(),
            &buffers.orientation[..],
            &buffers.occupancy[..],
            &buffers.location[..],
        )?;

        if buffers.num_particles() > u32::MAX as usize {
            return Err(KernelError::particle_count(
                buffers.num_particles(),
                u32::MAX as usize,
            ));
        }

        u32::try_from(table.coordination()).map_err(|_| {
            KernelError::CorruptState(format!(
                "coordination {} exceeds the random stream range",
                table.coordination()
            ))
        })
    }
}

/// Run sweeps with a throwaway engine
///
/// Convenience for one-off calls; hosts stepping repeatedly should keep a
/// [`SweepEngine`] to reuse its buffers.
pub fn sweep(
    table: &NeighborTable,
    rng: &mut RandomStream,
    buffers: ParticleBuffers<'_>,
    params: &SweepParams,
) -> Result<SweepStats, KernelError> {
    SweepEngine::new().sweep(table, rng, buffers, params)
}

/// Move-then-tumble for particle `p`
#[allow(clippy::too_many_arguments)]
fn update_particle(
    table: &NeighborTable,
    rng: &mut RandomStream,
    buffers: &mut ParticleBuffers<'_>,
    p: usize,
    tumble_probability: f64,
    mode: ShuffleMode,
    draw_bound: u32,
    stats: &mut SweepStats,
) -> Result<(), KernelError> {
    let site = buffers.location[p];
    let orientation = buffers.orientation[p];

    let dest = table.get(site, orientation).ok_or_else(|| {
        KernelError::CorruptState(format!(
            "particle {} at site {} with orientation {} is off the table",
            p, site, orientation
        ))
    })?;
    let dest_cell = *buffers.occupancy.get(dest).ok_or_else(|| {
        KernelError::CorruptState(format!("destination {} outside occupancy", dest))
    })?;

    stats.attempts += 1;
    if dest_cell == 0 {
        buffers.occupancy[site] = 0;
        buffers.occupancy[dest] = 1;
        buffers.location[p] = dest;
        stats.accepted += 1;
    } else {
        stats.blocked += 1;
    }

    let tumble = match mode {
        ShuffleMode::Uniform => rng.chance(tumble_probability),
        ShuffleMode::Legacy => rng.next_uniform_legacy() < tumble_probability,
    };
    if tumble {
        buffers.orientation[p] = rng.next_bounded(draw_bound) as usize;
        stats.tumbles += 1;
    }

    Ok(())
}
