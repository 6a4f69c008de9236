#![forbid(unsafe_code)]

//! Canonical input events.
//!
//! Hosts translate their native input (DOM events, terminal mouse reports)
//! into these types and hand them to [`Session::handle`](crate::session::Session::handle).
//!
//! # Design Notes
//!
//! - Pointer coordinates are surface-local pixels (or terminal columns/rows
//!   for the terminal host) and may be negative once the pointer has left
//!   the surface.
//! - Move events carry the held buttons so that a release the host never
//!   saw (for example, outside the window) still ends the stroke.

use bitflags::bitflags;

bitflags! {
    /// Buttons held during a pointer event.
    ///
    /// Bit values match the DOM `MouseEvent.buttons` mask.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PointerButtons: u8 {
        const PRIMARY   = 0b0001;
        const SECONDARY = 0b0010;
        const MIDDLE    = 0b0100;
    }
}

/// The button that changed state in a down event.
///
/// Numbering matches the DOM `MouseEvent.button` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
    Other(u8),
}

impl PointerButton {
    #[must_use]
    pub const fn to_u8(self) -> u8 {
        match self {
            Self::Primary => 0,
            Self::Middle => 1,
            Self::Secondary => 2,
            Self::Other(n) => n,
        }
    }

    #[must_use]
    pub const fn from_u8(n: u8) -> Self {
        match n {
            0 => Self::Primary,
            1 => Self::Middle,
            2 => Self::Secondary,
            other => Self::Other(other),
        }
    }
}

/// A pointer event in surface-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEvent {
    /// A button was pressed.
    Down { x: i32, y: i32, button: PointerButton },
    /// The pointer moved.
    Move { x: i32, y: i32, buttons: PointerButtons },
    /// The pressed button was released.
    Up,
    /// The pointer left the tracked surface.
    Leave,
}

impl PointerEvent {
    /// Primary-button press at `(x, y)`.
    #[must_use]
    pub const fn down(x: i32, y: i32) -> Self {
        Self::Down {
            x,
            y,
            button: PointerButton::Primary,
        }
    }

    /// Move to `(x, y)` with the primary button held.
    #[must_use]
    pub const fn drag(x: i32, y: i32) -> Self {
        Self::Move {
            x,
            y,
            buttons: PointerButtons::PRIMARY,
        }
    }

    /// Move to `(x, y)` with no button held.
    #[must_use]
    pub const fn hover(x: i32, y: i32) -> Self {
        Self::Move {
            x,
            y,
            buttons: PointerButtons::empty(),
        }
    }

    /// Surface position carried by the event, if any.
    #[must_use]
    pub const fn position(&self) -> Option<(i32, i32)> {
        match *self {
            Self::Down { x, y, .. } | Self::Move { x, y, .. } => Some((x, y)),
            Self::Up | Self::Leave => None,
        }
    }
}

/// Everything a session reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Event {
    /// Pointer activity over the drawing surface.
    Pointer(PointerEvent),
    /// The text field now holds this text.
    TextEdited(String),
    /// The "toggle grid" button was pressed.
    ToggleGrid,
    /// The "clear" button was pressed.
    Clear,
    /// Focus gained (`true`) or lost (`false`).
    Focus(bool),
}

impl From<PointerEvent> for Event {
    fn from(event: PointerEvent) -> Self {
        Self::Pointer(event)
    }
}
