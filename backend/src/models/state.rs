//! Particle State
//!
//! The three per-run buffers: particle orientation, particle location and
//! site occupancy. The host normally owns them and lends them to the kernel
//! as [`ParticleBuffers`]; [`ParticleState`] is the owned variant used by the
//! Rust-side driver.
//!
//! # Critical Invariants
//!
//! 1. **Exclusion**: at most one particle per site
//! 2. **Consistency**: `occupancy[location[p]] == 1` for every particle `p`
//! 3. **Conservation**: exactly `num_particles` sites are occupied

use crate::error::KernelError;

/// Mutable borrowed view of the caller-owned buffers
///
/// `orientation` and `location` are indexed by particle, `occupancy` by site.
#[derive(Debug)]
pub struct ParticleBuffers<'a> {
    pub orientation: &'a mut [usize],
    pub occupancy: &'a mut [u8],
    pub location: &'a mut [usize],
}

impl<'a> ParticleBuffers<'a> {
    pub fn new(
        orientation: &'a mut [usize],
        occupancy: &'a mut [u8],
        location: &'a mut [usize],
    ) -> Self {
        Self {
            orientation,
            occupancy,
            location,
        }
    }

    pub fn num_particles(&self) -> usize {
        self.location.len()
    }
}

/// Owned particle buffers
///
/// # Example
///
/// ```rust
/// use active_lattice_core_rs::ParticleState;
///
/// let state = ParticleState::from_locations(4, vec![0, 3], vec![1, 2]).unwrap();
/// assert_eq!(state.occupancy(), &[1, 0, 0, 1]);
/// assert_eq!(state.num_particles(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticleState {
    orientation: Vec<usize>,
    occupancy: Vec<u8>,
    location: Vec<usize>,
}

impl ParticleState {
    /// Build a state from particle locations, deriving the occupancy mask
    ///
    /// # Errors
    ///
    /// - `InvalidParticleCount` if there are no particles or more particles
    ///   than sites
    /// - `CorruptState` if the buffers disagree in length, a location is off
    ///   the lattice, or two particles share a site
    pub fn from_locations(
        num_sites: usize,
        location: Vec<usize>,
        orientation: Vec<usize>,
    ) -> Result<Self, KernelError> {
        check_counts(num_sites, orientation.len(), location.len())?;

        let mut occupancy = vec![0u8; num_sites];
        for (p, &site) in location.iter().enumerate() {
            match occupancy.get_mut(site) {
                Some(cell) if *cell == 0 => *cell = 1,
                Some(_) => {
                    return Err(KernelError::CorruptState(format!(
                        "particle {} shares site {} with another particle",
                        p, site
                    )))
                }
                None => {
                    return Err(KernelError::CorruptState(format!(
                        "particle {} located at site {} of {}",
                        p, site, num_sites
                    )))
                }
            }
        }

        Ok(Self {
            orientation,
            occupancy,
            location,
        })
    }

    /// Wrap existing buffers without checking them
    ///
    /// Use [`ParticleState::validate`] before handing the result to a sweep.
    pub fn from_parts(orientation: Vec<usize>, occupancy: Vec<u8>, location: Vec<usize>) -> Self {
        Self {
            orientation,
            occupancy,
            location,
        }
    }

    pub fn num_particles(&self) -> usize {
        self.location.len()
    }

    pub fn num_sites(&self) -> usize {
        self.occupancy.len()
    }

    pub fn orientation(&self) -> &[usize] {
        &self.orientation
    }

    pub fn occupancy(&self) -> &[u8] {
        &self.occupancy
    }

    pub fn location(&self) -> &[usize] {
        &self.location
    }

    /// Lend the buffers to the kernel
    pub fn buffers_mut(&mut self) -> ParticleBuffers<'_> {
        ParticleBuffers::new(&mut self.orientation, &mut self.occupancy, &mut self.location)
    }

    /// Check the exclusion invariants against a lattice
    pub fn validate(&self, coordination: usize) -> Result<(), KernelError> {
        validate_state(
            self.num_sites(),
            coordination,
            &self.orientation,
            &self.occupancy,
            &self.location,
        )
    }

    pub fn into_parts(self) -> (Vec<usize>, Vec<u8>, Vec<usize>) {
        (self.orientation, self.occupancy, self.location)
    }
}

/// Check the exclusion invariants of a set of buffers
///
/// # Errors
///
/// - `InvalidParticleCount` if there are no particles or more particles than
///   sites
/// - `CorruptState` for any inconsistency between the buffers
pub fn validate_state(
    num_sites: usize,
    coordination: usize,
    orientation: &[usize],
    occupancy: &[u8],
    location: &[usize],
) -> Result<(), KernelError> {
    let mut seen = Vec::new();
    check_state_with(
        &mut seen,
        num_sites,
        coordination,
        orientation,
        occupancy,
        location,
    )
}

/// Particle count from a host-side signed integer
///
/// # Errors
///
/// `InvalidParticleCount`, carrying the value as passed, unless
/// `0 < requested <= num_sites`
pub fn particle_count_from_signed(
    requested: i64,
    num_sites: usize,
) -> Result<usize, KernelError> {
    match usize::try_from(requested) {
        Ok(n) if n > 0 && n <= num_sites => Ok(n),
        _ => Err(KernelError::InvalidParticleCount {
            requested,
            available: num_sites,
        }),
    }
}

fn check_counts(num_sites: usize, orientations: usize, particles: usize) -> Result<(), KernelError> {
    if orientations != particles {
        return Err(KernelError::CorruptState(format!(
            "{} orientations for {} particles",
            orientations, particles
        )));
    }
    if particles == 0 || particles > num_sites {
        return Err(KernelError::particle_count(particles, num_sites));
    }
    Ok(())
}

/// Invariant check reusing a caller-provided scratch buffer
pub(crate) fn check_state_with(
    seen: &mut Vec<bool>,
    num_sites: usize,
    coordination: usize,
    orientation: &[usize],
    occupancy: &[u8],
    location: &[usize],
) -> Result<(), KernelError> {
    check_counts(num_sites, orientation.len(), location.len())?;

    if occupancy.len() != num_sites {
        return Err(KernelError::CorruptState(format!(
            "occupancy covers {} sites, lattice has {}",
            occupancy.len(),
            num_sites
        )));
    }

    if let Some(p) = orientation.iter().position(|&o| o >= coordination) {
        return Err(KernelError::CorruptState(format!(
            "particle {} has orientation {} (coordination {})",
            p, orientation[p], coordination
        )));
    }

    let mut occupied = 0usize;
    for (site, &cell) in occupancy.iter().enumerate() {
        match cell {
            0 => {}
            1 => occupied += 1,
            other => {
                return Err(KernelError::CorruptState(format!(
                    "site {} has occupancy {}",
                    site, other
                )))
            }
        }
    }
    if occupied != location.len() {
        return Err(KernelError::CorruptState(format!(
            "{} occupied sites for {} particles",
            occupied,
            location.len()
        )));
    }

    seen.clear();
    seen.resize(num_sites, false);
    for (p, &site) in location.iter().enumerate() {
        if site >= num_sites {
            return Err(KernelError::CorruptState(format!(
                "particle {} located at site {} of {}",
                p, site, num_sites
            )));
        }
        if occupancy[site] != 1 {
            return Err(KernelError::CorruptState(format!(
                "particle {} sits on unoccupied site {}",
                p, site
            )));
        }
        if seen[site] {
            return Err(KernelError::CorruptState(format!(
                "particle {} shares site {} with another particle",
                p, site
            )));
        }
        seen[site] = true;
    }

    Ok(())
}
