#![forbid(unsafe_code)]

//! Mapping between surface pixels and grid cells.
//!
//! A pointer at `(x, y)` lands in column `floor(x * COLS / width)` and row
//! `floor(y * ROWS / height)`. [`SurfaceSize::cell_rect`] uses ceiling
//! division for cell edges so that the pixels inside a cell's rectangle are
//! exactly the pixels [`SurfaceSize::cell_at`] maps to that cell, even when
//! the surface size is not a multiple of the grid size.

use crate::picture::{COLS, CellPos, ROWS};

/// A pixel rectangle (origin top-left, exclusive right/bottom edges).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelRect {
    /// Left edge (inclusive).
    pub x: u32,
    /// Top edge (inclusive).
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    #[inline]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub const fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// Size of the drawing surface the grid is painted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceSize {
    width: u32,
    height: u32,
}

impl SurfaceSize {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Cell under surface-local point `(x, y)`.
    ///
    /// Returns `None` for points outside the surface and for empty surfaces.
    #[must_use]
    pub fn cell_at(&self, x: i32, y: i32) -> Option<CellPos> {
        let x = u32::try_from(x).ok().filter(|&x| x < self.width)?;
        let y = u32::try_from(y).ok().filter(|&y| y < self.height)?;
        let col = u64::from(x) * u64::from(COLS) / u64::from(self.width);
        let row = u64::from(y) * u64::from(ROWS) / u64::from(self.height);
        CellPos::try_new(row as u8, col as u8)
    }

    /// Pixel rectangle covered by `pos`.
    #[must_use]
    pub fn cell_rect(&self, pos: CellPos) -> PixelRect {
        let x0 = self.column_edge(u32::from(pos.col()));
        let x1 = self.column_edge(u32::from(pos.col()) + 1);
        let y0 = self.row_edge(u32::from(pos.row()));
        let y1 = self.row_edge(u32::from(pos.row()) + 1);
        PixelRect::new(x0, y0, x1 - x0, y1 - y0)
    }

    /// X coordinate of the boundary before column `col` (`0..=COLS`).
    #[must_use]
    pub fn column_edge(&self, col: u32) -> u32 {
        ceil_div(u64::from(col) * u64::from(self.width), u64::from(COLS))
    }

    /// Y coordinate of the boundary before row `row` (`0..=ROWS`).
    #[must_use]
    pub fn row_edge(&self, row: u32) -> u32 {
        ceil_div(u64::from(row) * u64::from(self.height), u64::from(ROWS))
    }
}

#[inline]
fn ceil_div(numer: u64, denom: u64) -> u32 {
    numer.div_ceil(denom) as u32
}
