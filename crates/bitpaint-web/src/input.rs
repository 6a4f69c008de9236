#![forbid(unsafe_code)]

//! Deterministic, JSON-friendly input schema for `bitpaint-web`.
//!
//! The web host (JS/TS) translates DOM events into [`HostEvent`]s:
//! - pointer coordinates are canvas-local pixels (`offsetX`/`offsetY`),
//! - `button` uses DOM `MouseEvent.button` numbering,
//! - `buttons` uses the DOM `MouseEvent.buttons` mask.
//!
//! The same JSON lines are used for record/replay.

use bitpaint_core::event::{Event, PointerButton, PointerButtons, PointerEvent};
use serde::{Deserialize, Serialize};

/// One host input event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HostEvent {
    PointerDown {
        x: i32,
        y: i32,
        #[serde(default)]
        button: u8,
    },
    PointerMove {
        x: i32,
        y: i32,
        #[serde(default)]
        buttons: u8,
    },
    PointerUp,
    PointerLeave,
    /// The text field's full contents after an edit.
    TextEdit {
        text: String,
    },
    ToggleGrid,
    Clear,
    Focus {
        focused: bool,
    },
}

impl HostEvent {
    /// Encode this event as a stable JSON string.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode a previously encoded event JSON string.
    ///
    /// Errors occur if the JSON does not match the expected schema.
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Primary-button press.
    #[must_use]
    pub const fn down(x: i32, y: i32) -> Self {
        Self::PointerDown { x, y, button: 0 }
    }

    /// Move with the primary button held.
    #[must_use]
    pub const fn drag(x: i32, y: i32) -> Self {
        Self::PointerMove {
            x,
            y,
            buttons: PointerButtons::PRIMARY.bits(),
        }
    }
}

impl From<HostEvent> for Event {
    fn from(value: HostEvent) -> Self {
        match value {
            HostEvent::PointerDown { x, y, button } => Event::Pointer(PointerEvent::Down {
                x,
                y,
                button: PointerButton::from_u8(button),
            }),
            HostEvent::PointerMove { x, y, buttons } => Event::Pointer(PointerEvent::Move {
                x,
                y,
                buttons: PointerButtons::from_bits_truncate(buttons),
            }),
            HostEvent::PointerUp => Event::Pointer(PointerEvent::Up),
            HostEvent::PointerLeave => Event::Pointer(PointerEvent::Leave),
            HostEvent::TextEdit { text } => Event::TextEdited(text),
            HostEvent::ToggleGrid => Event::ToggleGrid,
            HostEvent::Clear => Event::Clear,
            HostEvent::Focus { focused } => Event::Focus(focused),
        }
    }
}

impl From<&Event> for HostEvent {
    fn from(value: &Event) -> Self {
        match value {
            Event::Pointer(PointerEvent::Down { x, y, button }) => Self::PointerDown {
                x: *x,
                y: *y,
                button: button.to_u8(),
            },
            Event::Pointer(PointerEvent::Move { x, y, buttons }) => Self::PointerMove {
                x: *x,
                y: *y,
                buttons: buttons.bits(),
            },
            Event::Pointer(PointerEvent::Up) => Self::PointerUp,
            Event::Pointer(PointerEvent::Leave) => Self::PointerLeave,
            Event::TextEdited(text) => Self::TextEdit { text: text.clone() },
            Event::ToggleGrid => Self::ToggleGrid,
            Event::Clear => Self::Clear,
            Event::Focus(focused) => Self::Focus { focused: *focused },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn json_shape_is_stable() {
        assert_eq!(
            HostEvent::down(3, 4).to_json_string().unwrap(),
            r#"{"kind":"pointer_down","x":3,"y":4,"button":0}"#
        );
        assert_eq!(
            HostEvent::TextEdit { text: "12".into() }.to_json_string().unwrap(),
            r#"{"kind":"text_edit","text":"12"}"#
        );
        assert_eq!(
            HostEvent::ToggleGrid.to_json_string().unwrap(),
            r#"{"kind":"toggle_grid"}"#
        );
    }

    #[test]
    fn json_round_trip() {
        let events = [
            HostEvent::down(1, 2),
            HostEvent::drag(5, 6),
            HostEvent::PointerUp,
            HostEvent::PointerLeave,
            HostEvent::TextEdit { text: "0x1f".into() },
            HostEvent::Clear,
            HostEvent::Focus { focused: false },
        ];
        for ev in events {
            let json = ev.to_json_string().unwrap();
            assert_eq!(HostEvent::from_json_str(&json).unwrap(), ev);
        }
    }

    #[test]
    fn button_fields_default() {
        let ev = HostEvent::from_json_str(r#"{"kind":"pointer_move","x":1,"y":1}"#).unwrap();
        assert_eq!(
            Event::from(ev),
            Event::Pointer(PointerEvent::hover(1, 1))
        );
        let ev = HostEvent::from_json_str(r#"{"kind":"pointer_down","x":1,"y":1}"#).unwrap();
        assert_eq!(Event::from(ev), Event::Pointer(PointerEvent::down(1, 1)));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!(HostEvent::from_json_str(r#"{"kind":"wheel","dx":1}"#).is_err());
    }

    #[test]
    fn core_event_conversion_round_trips() {
        let event = Event::Pointer(PointerEvent::Down {
            x: 7,
            y: 8,
            button: PointerButton::Secondary,
        });
        assert_eq!(Event::from(HostEvent::from(&event)), event);
        let event = Event::TextEdited("abc".into());
        assert_eq!(Event::from(HostEvent::from(&event)), event);
    }
}
