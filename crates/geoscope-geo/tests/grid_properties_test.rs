//! Property tests for grid geometry
//!
//! - every coordinate falls inside the bounding box of its cell
//! - identifiers round-trip to the same cell
//! - coarse cells partition the cells of a finer grid

use geoscope_core::models::Coordinate;
use geoscope_geo::grid::{CellId, Grid};
use proptest::prelude::*;

const EPSILON: f64 = 1e-9;

/// Grid sizes used by cascades: powers-of-two fractions of 180 plus a few odd sizes
fn grid_size() -> impl Strategy<Value = f64> {
    prop_oneof![
        prop::sample::select(vec![
            180.0, 90.0, 45.0, 22.5, 11.25, 5.625, 2.8125, 1.40625, 0.703125, 0.3515625,
        ]),
        0.1f64..180.0,
    ]
}

fn coordinate() -> impl Strategy<Value = Coordinate> {
    (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lng)| Coordinate::new(lat, lng).unwrap())
}

proptest! {
    #[test]
    fn prop_cell_contains_coordinate(size in grid_size(), c in coordinate()) {
        let grid = Grid::new(size).unwrap();
        let cell = grid.cell_for_coordinate(&c);

        prop_assert!(cell.x() < grid.num_cells_x());
        prop_assert!(cell.y() < grid.num_cells_y());

        // Clamped edges at +90° / +180° sit on the upper boundary of the last cell
        prop_assert!(c.lat() >= cell.lat1() - EPSILON && c.lat() <= cell.lat2() + EPSILON);
        prop_assert!(c.lng() >= cell.lng1() - EPSILON && c.lng() <= cell.lng2() + EPSILON);
        prop_assert_eq!(cell.lat2(), cell.lat1() + size);
        prop_assert_eq!(cell.lng2(), cell.lng1() + size);
    }

    #[test]
    fn prop_identifier_roundtrip(size in grid_size(), c in coordinate()) {
        let grid = Grid::new(size).unwrap();
        let cell = grid.cell_for_coordinate(&c);
        let parsed = grid.cell_for_identifier(&cell.identifier()).unwrap();
        prop_assert_eq!(parsed, cell);
    }

    #[test]
    fn prop_indices_roundtrip(size in grid_size(), x in any::<u32>(), y in any::<u32>()) {
        let grid = Grid::new(size).unwrap();
        let id = CellId::new(x % grid.num_cells_x(), y % grid.num_cells_y());
        let cell = grid.cell(id).unwrap();
        prop_assert_eq!(grid.cell_for_identifier(&cell.identifier()).unwrap(), cell);
        prop_assert_eq!(grid.cell_for_coordinate(&cell.center()).id(), id);
    }

    #[test]
    fn prop_fine_cell_in_its_coarse_cell(
        level in 0usize..6,
        factor in prop::sample::select(vec![2.0, 4.0, 8.0]),
        c in coordinate(),
    ) {
        let coarse_size = 90.0 / 2f64.powi(level as i32);
        let coarse = Grid::new(coarse_size).unwrap();
        let fine = Grid::new(coarse_size / factor).unwrap();

        let fine_cell = fine.cell_for_coordinate(&c);
        let coarse_cell = coarse.cell_for_coordinate(&fine_cell.center());
        let contained = fine.cells_contained_in(&coarse_cell);

        prop_assert_eq!(contained.len() as f64, factor * factor);
        prop_assert!(contained.iter().any(|cell| cell.id() == fine_cell.id()));
    }
}
