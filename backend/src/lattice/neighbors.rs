//! Neighbor table construction
//!
//! Builds the flat `(site, direction) → site` adjacency of a periodic square
//! lattice. Construction is pure: it consumes no randomness and is identical
//! for every seed.

use super::{Direction, LatticeShape, COORDINATION};
use crate::error::KernelError;
use tracing::debug;

/// Flat adjacency table
///
/// Entry `site * coordination + direction` holds the neighbor reached by one
/// step from `site` in `direction`. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborTable {
    coordination: usize,
    entries: Vec<usize>,
}

impl NeighborTable {
    /// Rebuild a table from a flat host-supplied sequence
    ///
    /// # Errors
    ///
    /// `CorruptState` if the sequence is empty, `coordination` is zero, the
    /// length is not a multiple of `coordination`, or an entry is not a valid
    /// site id.
    pub fn from_flat(entries: Vec<usize>, coordination: usize) -> Result<Self, KernelError> {
        if coordination == 0 || entries.is_empty() {
            return Err(KernelError::CorruptState(format!(
                "empty table ({} entries, coordination {})",
                entries.len(),
                coordination
            )));
        }
        if entries.len() % coordination != 0 {
            return Err(KernelError::CorruptState(format!(
                "table length {} is not a multiple of coordination {}",
                entries.len(),
                coordination
            )));
        }

        let num_sites = entries.len() / coordination;
        if let Some(pos) = entries.iter().position(|&site| site >= num_sites) {
            return Err(KernelError::CorruptState(format!(
                "table entry {} points at site {} of {}",
                pos, entries[pos], num_sites
            )));
        }

        Ok(Self {
            coordination,
            entries,
        })
    }

    /// Number of directions per site
    pub fn coordination(&self) -> usize {
        self.coordination
    }

    pub fn num_sites(&self) -> usize {
        self.entries.len() / self.coordination
    }

    /// Neighbor of `site` along table column `direction`, if both are in range
    pub fn get(&self, site: usize, direction: usize) -> Option<usize> {
        if direction >= self.coordination {
            return None;
        }
        site.checked_mul(self.coordination)
            .and_then(|row| self.entries.get(row + direction))
            .copied()
    }

    /// Neighbor of `site` in `direction`
    ///
    /// # Panics
    ///
    /// Panics if `site` is not on the lattice
    pub fn neighbor(&self, site: usize, direction: Direction) -> usize {
        self.entries[site * self.coordination + direction.index()]
    }

    /// All neighbors of `site`, in table order
    pub fn neighbors(&self, site: usize) -> &[usize] {
        let start = site * self.coordination;
        &self.entries[start..start + self.coordination]
    }

    /// Flat view, row-major by site then direction
    pub fn as_slice(&self) -> &[usize] {
        &self.entries
    }

    pub fn into_vec(self) -> Vec<usize> {
        self.entries
    }
}

/// Build the periodic neighbor table of an `nx × ny` square lattice
///
/// For site `s = i * ny + j`:
/// - Up: `(nx - 1) * ny + j` on the first row, else `s - ny`
/// - Right: `s - ny + 1` on the last column, else `s + 1`
/// - Down: `j` on the last row, else `s + ny`
/// - Left: `s + ny - 1` on the first column, else `s - 1`
///
/// A single row or column wraps onto itself.
///
/// # Errors
///
/// `InvalidGeometry` if either dimension is zero or the table would not fit
/// in memory addressing.
///
/// # Example
///
/// ```rust
/// use active_lattice_core_rs::{build_neighbor_table, Direction};
///
/// let table = build_neighbor_table(2, 2).unwrap();
/// assert_eq!(table.as_slice().len(), 16);
/// assert_eq!(table.neighbor(0, Direction::Right), 1);
/// assert_eq!(table.neighbor(0, Direction::Up), 2);
/// ```
pub fn build_neighbor_table(nx: usize, ny: usize) -> Result<NeighborTable, KernelError> {
    let shape = LatticeShape::new(nx, ny)?;
    let table = build_for_shape(&shape);

    debug!(nx, ny, sites = table.num_sites(), "built neighbor table");
    Ok(table)
}

pub(crate) fn build_for_shape(shape: &LatticeShape) -> NeighborTable {
    let (nx, ny) = (shape.nx(), shape.ny());
    let mut entries = vec![0usize; shape.num_sites() * COORDINATION];

    for i in 0..nx {
        for j in 0..ny {
            let s = shape.site(i, j);
            let row = &mut entries[s * COORDINATION..(s + 1) * COORDINATION];

            row[Direction::Up.index()] = if i == 0 { (nx - 1) * ny + j } else { s - ny };
            row[Direction::Right.index()] = if j == ny - 1 { s + 1 - ny } else { s + 1 };
            row[Direction::Down.index()] = if i == nx - 1 { j } else { s + ny };
            row[Direction::Left.index()] = if j == 0 { s + ny - 1 } else { s - 1 };
        }
    }

    NeighborTable {
        coordination: COORDINATION,
        entries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_3x3_centre_site() {
        let table = build_neighbor_table(3, 3).unwrap();
        assert_eq!(table.neighbors(4), &[1, 5, 7, 3]);
    }

    #[test]
    fn test_3x3_corner_wraps() {
        let table = build_neighbor_table(3, 3).unwrap();
        assert_eq!(table.neighbors(0), &[6, 1, 3, 2]);
        assert_eq!(table.neighbors(8), &[5, 6, 2, 7]);
    }

    #[test]
    fn test_rectangular_up_uses_row_stride() {
        // 2 rows x 5 columns: stepping up from row 1 lands in row 0 of the same column
        let table = build_neighbor_table(2, 5).unwrap();
        assert_eq!(table.neighbor(7, Direction::Up), 2);
        assert_eq!(table.neighbor(2, Direction::Down), 7);
    }

    #[test]
    fn test_single_site_points_at_itself() {
        let table = build_neighbor_table(1, 1).unwrap();
        assert_eq!(table.as_slice(), &[0, 0, 0, 0]);
    }

    #[test]
    fn test_from_flat_roundtrip() {
        let table = build_neighbor_table(4, 3).unwrap();
        let rebuilt = NeighborTable::from_flat(table.as_slice().to_vec(), COORDINATION).unwrap();
        assert_eq!(rebuilt, table);
    }

    #[test]
    fn test_from_flat_rejects_out_of_range_entry() {
        let mut entries = build_neighbor_table(2, 2).unwrap().into_vec();
        entries[5] = 4;
        assert!(matches!(
            NeighborTable::from_flat(entries, COORDINATION),
            Err(KernelError::CorruptState(_))
        ));
    }

    #[test]
    fn test_from_flat_rejects_ragged_length() {
        assert!(matches!(
            NeighborTable::from_flat(vec![0, 0, 0, 0, 0], COORDINATION),
            Err(KernelError::CorruptState(_))
        ));
    }

    #[test]
    fn test_get_out_of_range() {
        let table = build_neighbor_table(2, 2).unwrap();
        assert_eq!(table.get(3, 3), Some(2));
        assert_eq!(table.get(4, 0), None);
        assert_eq!(table.get(0, 4), None);
        assert_eq!(table.get(usize::MAX, 0), None);
    }
}
