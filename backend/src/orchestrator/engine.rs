//! Simulation - Rust-side lattice driver
//!
//! Bundles everything one run needs: the lattice geometry and its neighbor
//! table, the particle buffers, an owned random stream and a reusable sweep
//! engine. Hosts that manage their own buffers call the kernel functions
//! directly instead.
//!
//! # Lifecycle
//!
//! ```text
//! SimulationConfig → validate → build table → seed stream
//!                  → place particles → draw orientations
//!                  → step(repeat) … step(repeat)
//! ```
//!
//! # Example
//!
//! ```rust
//! use active_lattice_core_rs::{Simulation, SimulationConfig};
//!
//! let config = SimulationConfig::from_density(16, 16, 0.25, 0.1).unwrap();
//! let mut sim = Simulation::new(config).unwrap();
//!
//! for _ in 0..10 {
//!     let stats = sim.step(5).unwrap();
//!     println!("accepted {} of {} moves", stats.accepted, stats.attempts);
//! }
//! assert_eq!(sim.sweeps_completed(), 50);
//! ```

use crate::error::KernelError;
use crate::lattice::{neighbors::build_for_shape, LatticeShape, NeighborTable, COORDINATION};
use crate::models::state::ParticleState;
use crate::orchestrator::digest::{compute_config_hash, compute_state_digest};
use crate::rng::{RandomStream, DEFAULT_SEED_SEQUENCE, DEFAULT_SEED_STATE};
use crate::sweep::engine::validate_probability;
use crate::sweep::{ShuffleMode, SweepEngine, SweepParams, SweepStats};
use serde::{Deserialize, Serialize};
use tracing::debug;

// ============================================================================
// Configuration Types
// ============================================================================

/// Complete simulation configuration
///
/// # Fields
///
/// * `nx`, `ny` - Lattice rows and columns
/// * `n_particles` - Number of particles (at most `nx * ny`)
/// * `tumble_probability` - Per-attempt orientation redraw probability
/// * `rng_seed`, `rng_stream` - Seed pair of the random stream
/// * `shuffle` - Visitation-order shuffle variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of lattice rows
    pub nx: usize,

    /// Number of lattice columns
    pub ny: usize,

    /// Number of particles
    pub n_particles: usize,

    /// Probability of a tumble after each move attempt
    pub tumble_probability: f64,

    /// Initial state of the random stream
    #[serde(default = "default_rng_seed")]
    pub rng_seed: u64,

    /// Stream selector of the random stream
    #[serde(default = "default_rng_stream")]
    pub rng_stream: u64,

    /// Visitation-order shuffle
    #[serde(default)]
    pub shuffle: ShuffleMode,
}

fn default_rng_seed() -> u64 {
    DEFAULT_SEED_STATE
}

fn default_rng_stream() -> u64 {
    DEFAULT_SEED_SEQUENCE
}

impl SimulationConfig {
    /// Config with the historical default seed pair and uniform shuffling
    pub fn new(nx: usize, ny: usize, n_particles: usize, tumble_probability: f64) -> Self {
        Self {
            nx,
            ny,
            n_particles,
            tumble_probability,
            rng_seed: DEFAULT_SEED_STATE,
            rng_stream: DEFAULT_SEED_SEQUENCE,
            shuffle: ShuffleMode::default(),
        }
    }

    /// Config whose particle count is `floor(density * nx * ny)`
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if `density` is outside `[0, 1]`
    pub fn from_density(
        nx: usize,
        ny: usize,
        density: f64,
        tumble_probability: f64,
    ) -> Result<Self, KernelError> {
        if !(0.0..=1.0).contains(&density) {
            return Err(KernelError::InvalidConfig(format!(
                "density {} outside [0, 1]",
                density
            )));
        }
        let shape = LatticeShape::new(nx, ny)?;
        let n_particles = (density * shape.num_sites() as f64).floor() as usize;
        Ok(Self::new(nx, ny, n_particles, tumble_probability))
    }

    pub fn with_seed(mut self, rng_seed: u64, rng_stream: u64) -> Self {
        self.rng_seed = rng_seed;
        self.rng_stream = rng_stream;
        self
    }

    pub fn with_shuffle(mut self, shuffle: ShuffleMode) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// - `InvalidGeometry` for an empty or oversized lattice
    /// - `InvalidParticleCount` for zero particles or more particles than sites
    /// - `InvalidProbability` for a tumble probability outside `[0, 1]`
    /// - `InvalidConfig` if the lattice has more sites than the random stream
    ///   can index
    pub fn validate(&self) -> Result<LatticeShape, KernelError> {
        let shape = LatticeShape::new(self.nx, self.ny)?;

        if self.n_particles == 0 || self.n_particles > shape.num_sites() {
            return Err(KernelError::particle_count(
                self.n_particles,
                shape.num_sites(),
            ));
        }

        validate_probability(self.tumble_probability)?;

        if shape.num_sites() > u32::MAX as usize {
            return Err(KernelError::InvalidConfig(format!(
                "{} sites exceed the random stream range",
                shape.num_sites()
            )));
        }

        Ok(shape)
    }

    /// Particle density `n_particles / (nx * ny)`
    pub fn density(&self) -> f64 {
        self.n_particles as f64 / (self.nx * self.ny) as f64
    }
}

// ============================================================================
// Simulation
// ============================================================================

/// A complete run-and-tumble lattice run
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimulationConfig,
    shape: LatticeShape,
    table: NeighborTable,
    state: ParticleState,
    rng: RandomStream,
    engine: SweepEngine,
    totals: SweepStats,
}

impl Simulation {
    /// Create a simulation with random placement and orientations
    ///
    /// Particles land on `n_particles` distinct sites chosen uniformly; the
    /// location buffer lists them in increasing site order. Orientations are
    /// then drawn uniformly. Both use the configured stream.
    ///
    /// # Errors
    ///
    /// Any error of [`SimulationConfig::validate`]
    pub fn new(config: SimulationConfig) -> Result<Self, KernelError> {
        let shape = config.validate()?;
        let table = build_for_shape(&shape);
        let mut rng = RandomStream::new(config.rng_seed, config.rng_stream);

        let location = random_sites(&mut rng, shape.num_sites(), config.n_particles);
        let orientation = random_orientations(&mut rng, config.n_particles);
        let state = ParticleState::from_locations(shape.num_sites(), location, orientation)?;

        debug!(
            nx = shape.nx(),
            ny = shape.ny(),
            particles = config.n_particles,
            tumble_probability = config.tumble_probability,
            "simulation created"
        );

        Ok(Self {
            config,
            shape,
            table,
            state,
            rng,
            engine: SweepEngine::new(),
            totals: SweepStats::default(),
        })
    }

    /// Create a simulation from explicit particle buffers
    ///
    /// The config's particle count must match the buffers.
    pub fn with_state(config: SimulationConfig, state: ParticleState) -> Result<Self, KernelError> {
        let shape = config.validate()?;
        if state.num_particles() != config.n_particles {
            return Err(KernelError::InvalidConfig(format!(
                "config expects {} particles, state has {}",
                config.n_particles,
                state.num_particles()
            )));
        }
        if state.num_sites() != shape.num_sites() {
            return Err(KernelError::CorruptState(format!(
                "state covers {} sites, lattice has {}",
                state.num_sites(),
                shape.num_sites()
            )));
        }
        state.validate(COORDINATION)?;

        Ok(Self {
            table: build_for_shape(&shape),
            rng: RandomStream::new(config.rng_seed, config.rng_stream),
            config,
            shape,
            state,
            engine: SweepEngine::new(),
            totals: SweepStats::default(),
        })
    }

    // ========================================================================
    // Dynamics
    // ========================================================================

    /// Advance by `repeat` sweeps
    pub fn step(&mut self, repeat: usize) -> Result<SweepStats, KernelError> {
        let params = SweepParams::new(self.config.tumble_probability, repeat)
            .with_shuffle(self.config.shuffle);
        let stats = self
            .engine
            .sweep(&self.table, &mut self.rng, self.state.buffers_mut(), &params)?;
        self.totals.merge(&stats);
        Ok(stats)
    }

    /// Random-sequential update of a single particle
    ///
    /// Does not count as a sweep.
    pub fn update_random_particle(&mut self) -> Result<SweepStats, KernelError> {
        let stats = self.engine.update_random_particle(
            &self.table,
            &mut self.rng,
            self.state.buffers_mut(),
            self.config.tumble_probability,
        )?;
        self.totals.merge(&stats);
        Ok(stats)
    }

    /// Scatter the particles over fresh random sites
    ///
    /// Orientations stay attached to particle indices.
    pub fn reset_random_occupancy(&mut self) -> Result<(), KernelError> {
        let location = random_sites(&mut self.rng, self.shape.num_sites(), self.config.n_particles);
        let orientation = self.state.orientation().to_vec();
        self.state = ParticleState::from_locations(self.shape.num_sites(), location, orientation)?;
        Ok(())
    }

    /// Redraw every orientation uniformly
    pub fn reset_orientations(&mut self) -> Result<(), KernelError> {
        let orientation = random_orientations(&mut self.rng, self.config.n_particles);
        let location = self.state.location().to_vec();
        self.state = ParticleState::from_locations(self.shape.num_sites(), location, orientation)?;
        Ok(())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn shape(&self) -> LatticeShape {
        self.shape
    }

    pub fn table(&self) -> &NeighborTable {
        &self.table
    }

    pub fn state(&self) -> &ParticleState {
        &self.state
    }

    pub fn rng(&self) -> &RandomStream {
        &self.rng
    }

    /// Counters accumulated since creation
    pub fn totals(&self) -> SweepStats {
        self.totals
    }

    pub fn sweeps_completed(&self) -> usize {
        self.totals.sweeps
    }

    /// Neighbors of `site` in Up, Right, Down, Left order
    pub fn neighbors(&self, site: usize) -> Option<&[usize]> {
        if site < self.shape.num_sites() {
            Some(self.table.neighbors(site))
        } else {
            None
        }
    }

    /// (row, col) of every particle, in particle order
    pub fn positions(&self) -> Vec<(usize, usize)> {
        self.state
            .location()
            .iter()
            .map(|&site| self.shape.coordinates(site))
            .collect()
    }

    /// Row-major `nx × ny` grid: `orientation + 1` where a particle sits,
    /// `0` on empty sites
    pub fn image(&self) -> Vec<u8> {
        let mut grid = vec![0u8; self.shape.num_sites()];
        for (&site, &orientation) in self.state.location().iter().zip(self.state.orientation()) {
            grid[site] = orientation as u8 + 1;
        }
        grid
    }

    /// SHA256 of the canonical JSON config
    pub fn config_hash(&self) -> Result<String, KernelError> {
        compute_config_hash(&self.config)
    }

    /// SHA256 fingerprint of the current particle buffers
    pub fn state_digest(&self) -> String {
        compute_state_digest(&self.state)
    }
}

/// `count` distinct sites out of `num_sites`, in increasing order
///
/// Partial Fisher–Yates over the site ids; callers guarantee
/// `count <= num_sites <= u32::MAX`.
fn random_sites(rng: &mut RandomStream, num_sites: usize, count: usize) -> Vec<usize> {
    let mut sites: Vec<usize> = (0..num_sites).collect();
    for i in 0..count {
        let j = i + rng.next_bounded((num_sites - i) as u32) as usize;
        sites.swap(i, j);
    }
    sites.truncate(count);
    sites.sort_unstable();
    sites
}

fn random_orientations(rng: &mut RandomStream, count: usize) -> Vec<usize> {
    (0..count)
        .map(|_| rng.next_bounded(COORDINATION as u32) as usize)
        .collect()
}
