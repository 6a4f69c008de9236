//! Property-based invariant tests for pixel-to-cell mapping.
//!
//! These tests verify structural invariants that must hold for any surface
//! size and pointer position:
//!
//! 1. Every in-bounds point maps to some cell.
//! 2. Out-of-bounds points never map to a cell.
//! 3. A point lies inside the rectangle of the cell it maps to.
//! 4. Cell rectangles tile the surface (widths and heights sum up).
//! 5. Column and row edges are monotonic.
//! 6. Mapping is monotonic in x and y.
//! 7. No panics on extreme coordinates.

use bitpaint_core::geometry::SurfaceSize;
use bitpaint_core::picture::{COLS, CellPos, ROWS};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn surface_strategy() -> impl Strategy<Value = SurfaceSize> {
    (1u32..=4096, 1u32..=4096).prop_map(|(w, h)| SurfaceSize::new(w, h))
}

fn point_in(surface: SurfaceSize) -> impl Strategy<Value = (i32, i32)> {
    (0..surface.width() as i32, 0..surface.height() as i32)
}

fn surface_and_point() -> impl Strategy<Value = (SurfaceSize, (i32, i32))> {
    surface_strategy().prop_flat_map(|s| (Just(s), point_in(s)))
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Every in-bounds point maps to some cell
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn in_bounds_points_map_to_a_cell((surface, (x, y)) in surface_and_point()) {
        prop_assert!(
            surface.cell_at(x, y).is_some(),
            "no cell for ({}, {}) on {:?}", x, y, surface
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Out-of-bounds points never map to a cell
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn out_of_bounds_points_are_rejected(
        surface in surface_strategy(),
        dx in 0i32..1000,
        y in any::<i32>(),
    ) {
        let right = surface.width() as i32 + dx;
        prop_assert_eq!(surface.cell_at(right, y), None);
        prop_assert_eq!(surface.cell_at(-1 - dx, y), None);
        let below = surface.height() as i32 + dx;
        prop_assert_eq!(surface.cell_at(0, below), None);
        prop_assert_eq!(surface.cell_at(0, -1 - dx), None);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. A point lies inside the rectangle of its cell
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn point_inside_its_cell_rect((surface, (x, y)) in surface_and_point()) {
        let pos = surface.cell_at(x, y).unwrap();
        let rect = surface.cell_rect(pos);
        prop_assert!(
            rect.contains(x as u32, y as u32),
            "({}, {}) -> {:?} but rect is {:?}", x, y, pos, rect
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Cell rectangles tile the surface
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn cell_rects_tile_surface(surface in surface_strategy()) {
        let row_width: u32 = (0..COLS)
            .map(|col| surface.cell_rect(CellPos::new(0, col)).width)
            .sum();
        let col_height: u32 = (0..ROWS)
            .map(|row| surface.cell_rect(CellPos::new(row, 0)).height)
            .sum();
        prop_assert_eq!(row_width, surface.width());
        prop_assert_eq!(col_height, surface.height());

        let area: u64 = CellPos::all()
            .map(|pos| {
                let r = surface.cell_rect(pos);
                u64::from(r.width) * u64::from(r.height)
            })
            .sum();
        prop_assert_eq!(area, u64::from(surface.width()) * u64::from(surface.height()));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Edges are monotonic
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn edges_monotonic(surface in surface_strategy()) {
        prop_assert_eq!(surface.column_edge(0), 0);
        prop_assert_eq!(surface.column_edge(u32::from(COLS)), surface.width());
        prop_assert_eq!(surface.row_edge(u32::from(ROWS)), surface.height());
        for i in 0..u32::from(COLS) {
            prop_assert!(surface.column_edge(i) <= surface.column_edge(i + 1));
        }
        for i in 0..u32::from(ROWS) {
            prop_assert!(surface.row_edge(i) <= surface.row_edge(i + 1));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Mapping is monotonic
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn mapping_monotonic((surface, (x, y)) in surface_and_point(), step in 0i32..64) {
        let a = surface.cell_at(x, y).unwrap();
        let x2 = (x + step).min(surface.width() as i32 - 1);
        let y2 = (y + step).min(surface.height() as i32 - 1);
        let b = surface.cell_at(x2, y2).unwrap();
        prop_assert!(b.col() >= a.col());
        prop_assert!(b.row() >= a.row());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. No panics on extreme values
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn no_panic_on_extremes(w in any::<u32>(), h in any::<u32>(), x in any::<i32>(), y in any::<i32>()) {
        let surface = SurfaceSize::new(w, h);
        let _ = surface.cell_at(x, y);
        for pos in CellPos::all() {
            let _ = surface.cell_rect(pos);
        }
    }
}

#[test]
fn empty_surface_maps_nothing() {
    let surface = SurfaceSize::new(0, 100);
    assert_eq!(surface.cell_at(0, 0), None);
    assert_eq!(SurfaceSize::new(100, 0).cell_at(0, 0), None);
}
