#![forbid(unsafe_code)]

//! Picture renderers.
//!
//! [`GridRenderer`] paints a [`Picture`] onto a [`Surface`]: every cell is
//! filled with the on or off color, then (optionally) one-pixel gridlines are
//! drawn on each internal cell boundary. Cell boundaries come from
//! [`SurfaceSize::cell_rect`], the same edges the pointer mapping uses, so a
//! click always lands in the cell drawn under it.
//!
//! [`render_text`] is the terminal counterpart: one line per row, two
//! columns per cell.

use bitpaint_core::geometry::{PixelRect, SurfaceSize};
use bitpaint_core::picture::{COLS, CellPos, Picture, ROWS};

use crate::color::Rgba;
use crate::surface::Surface;

/// Text for a set cell.
pub const SET_CELL: &str = "██";
/// Text for a clear cell with gridlines shown.
pub const CLEAR_CELL_GRID: &str = "··";
/// Text for a clear cell with gridlines hidden.
pub const CLEAR_CELL: &str = "  ";

/// Colors used to paint a picture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridRenderer {
    /// Fill for set cells.
    pub on: Rgba,
    /// Fill for clear cells.
    pub off: Rgba,
    /// Gridline color.
    pub grid: Rgba,
}

impl Default for GridRenderer {
    fn default() -> Self {
        Self {
            on: Rgba::BLACK,
            off: Rgba::WHITE,
            grid: Rgba::BLACK,
        }
    }
}

impl GridRenderer {
    #[must_use]
    pub const fn with_on(mut self, on: Rgba) -> Self {
        self.on = on;
        self
    }

    #[must_use]
    pub const fn with_off(mut self, off: Rgba) -> Self {
        self.off = off;
        self
    }

    #[must_use]
    pub const fn with_grid(mut self, grid: Rgba) -> Self {
        self.grid = grid;
        self
    }

    /// Pixel span of `pos` on `surface`.
    #[must_use]
    pub fn cell_rect(&self, surface: &Surface, pos: CellPos) -> PixelRect {
        surface.size().cell_rect(pos)
    }

    /// Repaint the whole surface.
    pub fn render(&self, picture: Picture, show_grid: bool, surface: &mut Surface) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "grid_render",
            picture = picture.bits(),
            show_grid,
            width = surface.width(),
            height = surface.height()
        )
        .entered();

        let size = surface.size();
        surface.fill(self.off);
        for pos in picture.set_cells() {
            surface.fill_rect(size.cell_rect(pos), self.on);
        }
        if show_grid {
            self.draw_gridlines(size, surface);
        }
    }

    fn draw_gridlines(&self, size: SurfaceSize, surface: &mut Surface) {
        for col in 1..u32::from(COLS) {
            surface.vline(size.column_edge(col), 0, size.height(), self.grid);
        }
        for row in 1..u32::from(ROWS) {
            surface.hline(0, size.row_edge(row), size.width(), self.grid);
        }
    }
}

/// Text art for `picture`: eight lines of eight two-column cells.
#[must_use]
pub fn render_text(picture: Picture, show_grid: bool) -> String {
    render_lines(picture, show_grid).join("\n")
}

/// Like [`render_text`], one string per row.
#[must_use]
pub fn render_lines(picture: Picture, show_grid: bool) -> Vec<String> {
    let clear = if show_grid { CLEAR_CELL_GRID } else { CLEAR_CELL };
    (0..ROWS)
        .map(|row| {
            (0..COLS)
                .map(|col| {
                    if picture.cell(CellPos::new(row, col)) {
                        SET_CELL
                    } else {
                        clear
                    }
                })
                .collect()
        })
        .collect()
}
