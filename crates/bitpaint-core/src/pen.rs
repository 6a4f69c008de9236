#![forbid(unsafe_code)]

//! Pen stroke state machine.
//!
//! A stroke runs from pointer-down to pointer-up. The first cell it touches
//! decides what the whole stroke does: pressing on a clear cell starts a
//! [`PenMode::Marking`] stroke, pressing on a set cell starts a
//! [`PenMode::Erasing`] stroke. From then on the stroke only ever sets clear
//! cells (marking) or clears set cells (erasing), so dragging across a mix of
//! both never makes cells flicker.
//!
//! # Invariants
//!
//! 1. Each stroke changes each cell at most once. A cell the stroke already
//!    changed no longer matches the stroke's mode, so re-entering it is a
//!    no-op.
//! 2. Moves that stay inside the last visited cell are ignored.
//! 3. Cells the pointer skips over between two samples are left alone; there
//!    is no interpolation.
//! 4. The mode is fixed for the stroke's lifetime and reset on release.
//!
//! # Transitions
//!
//! | Mode      | Entered cell | Effect                    | Next mode |
//! |-----------|--------------|---------------------------|-----------|
//! | `Idle`    | clear        | set it                    | `Marking` |
//! | `Idle`    | set          | clear it                  | `Erasing` |
//! | `Marking` | clear        | set it                    | `Marking` |
//! | `Marking` | set          | none                      | `Marking` |
//! | `Erasing` | set          | clear it                  | `Erasing` |
//! | `Erasing` | clear        | none                      | `Erasing` |

use crate::picture::{CellPos, Picture};
use crate::trace;

/// What the current stroke does to the cells it enters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PenMode {
    /// No committed intent yet.
    #[default]
    Idle,
    /// The stroke sets clear cells.
    Marking,
    /// The stroke clears set cells.
    Erasing,
}

impl PenMode {
    /// Whether a cell whose bit is `bit_is_set` may be toggled in this mode.
    #[inline]
    #[must_use]
    pub const fn accepts(self, bit_is_set: bool) -> bool {
        match self {
            Self::Idle => true,
            Self::Marking => !bit_is_set,
            Self::Erasing => bit_is_set,
        }
    }

    /// Mode committed by a stroke whose first cell was `bit_is_set`.
    #[inline]
    #[must_use]
    pub const fn committed_by(bit_is_set: bool) -> Self {
        if bit_is_set {
            Self::Erasing
        } else {
            Self::Marking
        }
    }
}

/// Stroke state: the committed mode plus the last cell visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pen {
    mode: PenMode,
    last_cell: Option<CellPos>,
}

impl Pen {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mode: PenMode::Idle,
            last_cell: None,
        }
    }

    #[must_use]
    pub const fn mode(&self) -> PenMode {
        self.mode
    }

    #[must_use]
    pub const fn last_cell(&self) -> Option<CellPos> {
        self.last_cell
    }

    /// Whether a stroke is in progress.
    #[must_use]
    pub const fn is_stroking(&self) -> bool {
        self.last_cell.is_some()
    }

    /// Start a stroke at `pos`.
    ///
    /// Any stroke still open is discarded first. Always toggles `pos` and
    /// returns the new picture.
    pub fn press(&mut self, picture: Picture, pos: CellPos) -> Option<Picture> {
        self.release();
        self.enter(picture, pos)
    }

    /// Continue the current stroke into `pos`.
    ///
    /// Returns the new picture when the cell was toggled, `None` when there is
    /// no stroke, the pointer is still in the last cell, or the cell does not
    /// match the stroke's mode.
    pub fn drag(&mut self, picture: Picture, pos: CellPos) -> Option<Picture> {
        if !self.is_stroking() || self.last_cell == Some(pos) {
            return None;
        }
        self.enter(picture, pos)
    }

    /// End the current stroke.
    pub fn release(&mut self) {
        if self.is_stroking() {
            trace!(mode = ?self.mode, "stroke ended");
        }
        *self = Self::new();
    }

    fn enter(&mut self, picture: Picture, pos: CellPos) -> Option<Picture> {
        let bit_is_set = picture.cell(pos);
        if !self.mode.accepts(bit_is_set) {
            return None;
        }
        self.last_cell = Some(pos);
        if self.mode == PenMode::Idle {
            self.mode = PenMode::committed_by(bit_is_set);
            trace!(
                mode = ?self.mode,
                row = pos.row(),
                col = pos.col(),
                "stroke committed"
            );
        }
        Some(picture.toggled(pos))
    }
}
