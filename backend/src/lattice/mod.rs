//! Periodic square lattice topology
//!
//! The lattice is never materialized: a [`LatticeShape`] converts between
//! site ids and (row, column) coordinates, and a [`NeighborTable`] stores the
//! derived adjacency.
//!
//! # Critical Invariants
//!
//! 1. Site id is `row * ny + col` (row-major)
//! 2. Both axes wrap around (periodic boundaries)
//! 3. Direction order is fixed: Up, Right, Down, Left

pub mod neighbors;

pub use neighbors::{build_neighbor_table, NeighborTable};

use crate::error::KernelError;

/// Number of neighbor directions per site on the square lattice
pub const COORDINATION: usize = 4;

/// Lattice direction, in table order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl Direction {
    /// All directions in table order
    pub const ALL: [Direction; COORDINATION] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Column offset of this direction inside a table row
    pub fn index(self) -> usize {
        self as usize
    }

    /// Convert a table column back into a direction
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Direction that undoes a step in this direction
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
        }
    }
}

/// Dimensions of an `nx × ny` periodic lattice
///
/// # Example
///
/// ```rust
/// use active_lattice_core_rs::LatticeShape;
///
/// let shape = LatticeShape::new(3, 4).unwrap();
/// assert_eq!(shape.num_sites(), 12);
/// assert_eq!(shape.site(1, 2), 6);
/// assert_eq!(shape.coordinates(6), (1, 2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatticeShape {
    nx: usize,
    ny: usize,
}

impl LatticeShape {
    /// Validate and create a lattice shape
    ///
    /// # Errors
    ///
    /// `InvalidGeometry` if either dimension is zero or the table size
    /// `nx * ny * COORDINATION` does not fit in a `usize`.
    pub fn new(nx: usize, ny: usize) -> Result<Self, KernelError> {
        if nx == 0 || ny == 0 {
            return Err(KernelError::geometry(nx, ny));
        }

        nx.checked_mul(ny)
            .and_then(|sites| sites.checked_mul(COORDINATION))
            .ok_or_else(|| KernelError::geometry(nx, ny))?;

        Ok(Self { nx, ny })
    }

    /// Create a shape from host-side signed dimensions
    pub fn from_signed(nx: i64, ny: i64) -> Result<Self, KernelError> {
        match (usize::try_from(nx), usize::try_from(ny)) {
            (Ok(nx), Ok(ny)) => Self::new(nx, ny),
            _ => Err(KernelError::InvalidGeometry { nx, ny }),
        }
    }

    /// Number of rows
    pub fn nx(&self) -> usize {
        self.nx
    }

    /// Number of columns
    pub fn ny(&self) -> usize {
        self.ny
    }

    pub fn num_sites(&self) -> usize {
        self.nx * self.ny
    }

    /// Site id of (row, col)
    pub fn site(&self, row: usize, col: usize) -> usize {
        row * self.ny + col
    }

    /// (row, col) of a site id
    pub fn coordinates(&self, site: usize) -> (usize, usize) {
        (site / self.ny, site % self.ny)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_dimensions_rejected() {
        assert_eq!(
            LatticeShape::new(0, 5),
            Err(KernelError::InvalidGeometry { nx: 0, ny: 5 })
        );
        assert_eq!(
            LatticeShape::new(5, 0),
            Err(KernelError::InvalidGeometry { nx: 5, ny: 0 })
        );
    }

    #[test]
    fn test_negative_dimensions_rejected() {
        assert_eq!(
            LatticeShape::from_signed(-2, 3),
            Err(KernelError::InvalidGeometry { nx: -2, ny: 3 })
        );
    }

    #[test]
    fn test_overflowing_dimensions_rejected() {
        assert!(matches!(
            LatticeShape::new(usize::MAX, 2),
            Err(KernelError::InvalidGeometry { .. })
        ));
    }

    #[test]
    fn test_site_coordinate_roundtrip() {
        let shape = LatticeShape::new(3, 5).unwrap();
        for site in 0..shape.num_sites() {
            let (row, col) = shape.coordinates(site);
            assert!(row < 3 && col < 5);
            assert_eq!(shape.site(row, col), site);
        }
    }

    #[test]
    fn test_direction_order_and_opposites() {
        for (i, dir) in Direction::ALL.iter().enumerate() {
            assert_eq!(dir.index(), i);
            assert_eq!(Direction::from_index(i), Some(*dir));
            assert_eq!(dir.opposite().opposite(), *dir);
        }
        assert_eq!(Direction::from_index(COORDINATION), None);
    }
}
