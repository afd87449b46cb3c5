//! Tests for the periodic neighbor table
//!
//! Covers the wraparound rules, the degenerate single-row / single-column
//! lattices and the rejection of empty geometries.

use active_lattice_core_rs::{build_neighbor_table, Direction, KernelError, LatticeShape};
use std::collections::HashSet;

// ============================================================================
// Test Helpers
// ============================================================================

const SHAPES: [(usize, usize); 10] = [
    (1, 1),
    (1, 5),
    (5, 1),
    (2, 2),
    (2, 7),
    (3, 3),
    (3, 8),
    (8, 3),
    (10, 10),
    (16, 9),
];

fn distinct_neighbors(table: &active_lattice_core_rs::NeighborTable, site: usize) -> usize {
    table.neighbors(site).iter().collect::<HashSet<_>>().len()
}

// ============================================================================
// Shape and Layout
// ============================================================================

#[test]
fn test_table_length() {
    for (nx, ny) in SHAPES {
        let table = build_neighbor_table(nx, ny).unwrap();
        assert_eq!(table.as_slice().len(), nx * ny * 4, "{}x{}", nx, ny);
        assert_eq!(table.num_sites(), nx * ny);
        assert_eq!(table.coordination(), 4);
    }
}

#[test]
fn test_entries_are_sites() {
    for (nx, ny) in SHAPES {
        let table = build_neighbor_table(nx, ny).unwrap();
        assert!(table.as_slice().iter().all(|&s| s < nx * ny));
    }
}

#[test]
fn test_interior_site_of_4x5() {
    // site 7 = row 1, col 2
    let table = build_neighbor_table(4, 5).unwrap();
    assert_eq!(table.neighbor(7, Direction::Up), 2);
    assert_eq!(table.neighbor(7, Direction::Right), 8);
    assert_eq!(table.neighbor(7, Direction::Down), 12);
    assert_eq!(table.neighbor(7, Direction::Left), 6);
}

#[test]
fn test_edges_of_4x5_wrap() {
    let table = build_neighbor_table(4, 5).unwrap();
    let shape = LatticeShape::new(4, 5).unwrap();

    // top row wraps to bottom row, same column
    assert_eq!(table.neighbor(shape.site(0, 3), Direction::Up), shape.site(3, 3));
    // bottom row wraps to top row
    assert_eq!(table.neighbor(shape.site(3, 1), Direction::Down), shape.site(0, 1));
    // last column wraps to first column, same row
    assert_eq!(table.neighbor(shape.site(2, 4), Direction::Right), shape.site(2, 0));
    // first column wraps to last column
    assert_eq!(table.neighbor(shape.site(2, 0), Direction::Left), shape.site(2, 4));
}

// ============================================================================
// Periodicity
// ============================================================================

#[test]
fn test_step_and_back_returns_to_origin() {
    for (nx, ny) in SHAPES {
        let table = build_neighbor_table(nx, ny).unwrap();
        for site in 0..nx * ny {
            for dir in Direction::ALL {
                let there = table.neighbor(site, dir);
                assert_eq!(
                    table.neighbor(there, dir.opposite()),
                    site,
                    "{}x{} site {} {:?}",
                    nx,
                    ny,
                    site,
                    dir
                );
            }
        }
    }
}

#[test]
fn test_each_direction_is_a_bijection() {
    for (nx, ny) in SHAPES {
        let table = build_neighbor_table(nx, ny).unwrap();
        for dir in Direction::ALL {
            let targets: HashSet<usize> =
                (0..nx * ny).map(|s| table.neighbor(s, dir)).collect();
            assert_eq!(targets.len(), nx * ny, "{}x{} {:?}", nx, ny, dir);
        }
    }
}

#[test]
fn test_walking_a_full_row_returns_home() {
    let table = build_neighbor_table(3, 7).unwrap();
    let mut site = 9;
    for _ in 0..7 {
        site = table.neighbor(site, Direction::Right);
    }
    assert_eq!(site, 9);

    for _ in 0..3 {
        site = table.neighbor(site, Direction::Down);
    }
    assert_eq!(site, 9);
}

// ============================================================================
// Distinctness and Degenerate Lattices
// ============================================================================

#[test]
fn test_four_distinct_neighbors_when_both_sides_at_least_three() {
    for (nx, ny) in [(3, 3), (3, 8), (8, 3), (10, 10), (16, 9)] {
        let table = build_neighbor_table(nx, ny).unwrap();
        for site in 0..nx * ny {
            assert_eq!(distinct_neighbors(&table, site), 4, "{}x{} site {}", nx, ny, site);
            assert!(!table.neighbors(site).contains(&site));
        }
    }
}

#[test]
fn test_single_row_is_a_ring() {
    // 1 x 5: Up and Down point back at the site itself
    let table = build_neighbor_table(1, 5).unwrap();
    for site in 0..5 {
        assert_eq!(table.neighbor(site, Direction::Up), site);
        assert_eq!(table.neighbor(site, Direction::Down), site);
        assert_eq!(table.neighbor(site, Direction::Right), (site + 1) % 5);
        assert_eq!(table.neighbor(site, Direction::Left), (site + 4) % 5);
    }
}

#[test]
fn test_single_column_is_a_ring() {
    // 5 x 1: Left and Right point back at the site itself
    let table = build_neighbor_table(5, 1).unwrap();
    for site in 0..5 {
        assert_eq!(table.neighbor(site, Direction::Left), site);
        assert_eq!(table.neighbor(site, Direction::Right), site);
        assert_eq!(table.neighbor(site, Direction::Down), (site + 1) % 5);
        assert_eq!(table.neighbor(site, Direction::Up), (site + 4) % 5);
    }
}

#[test]
fn test_two_wide_axis_collapses_opposite_directions() {
    // with two rows, Up and Down reach the same site
    let table = build_neighbor_table(2, 7).unwrap();
    for site in 0..14 {
        assert_eq!(
            table.neighbor(site, Direction::Up),
            table.neighbor(site, Direction::Down)
        );
        assert_eq!(distinct_neighbors(&table, site), 3);
    }

    let square = build_neighbor_table(2, 2).unwrap();
    for site in 0..4 {
        assert_eq!(distinct_neighbors(&square, site), 2);
    }
}

#[test]
fn test_two_by_two_layout() {
    let table = build_neighbor_table(2, 2).unwrap();
    assert_eq!(
        table.as_slice(),
        &[
            2, 1, 2, 1, // site 0
            3, 0, 3, 0, // site 1
            0, 3, 0, 3, // site 2
            1, 2, 1, 2, // site 3
        ]
    );
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_empty_geometry_rejected() {
    assert_eq!(
        build_neighbor_table(0, 0).unwrap_err(),
        KernelError::InvalidGeometry { nx: 0, ny: 0 }
    );
    assert_eq!(
        build_neighbor_table(4, 0).unwrap_err(),
        KernelError::InvalidGeometry { nx: 4, ny: 0 }
    );
}
