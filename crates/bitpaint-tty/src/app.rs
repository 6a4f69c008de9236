#![forbid(unsafe_code)]

//! Terminal input mapping and the event loop.
//!
//! [`map_event`] is pure: it turns one crossterm event into a [`Command`]
//! given the current focus and text field. [`App`] applies commands to the
//! session and the presenter.
//!
//! | Focus  | Key              | Command                       |
//! |--------|------------------|-------------------------------|
//! | any    | Ctrl+C           | quit                          |
//! | Grid   | Tab              | focus the text field          |
//! | Grid   | `g`              | toggle gridlines              |
//! | Grid   | `c`              | clear                         |
//! | Grid   | `q`, Esc         | quit                          |
//! | Text   | printable char   | edit (append)                 |
//! | Text   | Backspace        | edit (delete last char)       |
//! | Text   | Tab, Enter, Esc  | focus the grid                |

use std::io::Write;

use bitpaint_core::config::SessionConfig;
use bitpaint_core::event::{Event, PointerButton, PointerButtons, PointerEvent};
use bitpaint_core::session::Session;
use crossterm::event::{
    Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use tracing::debug;

use crate::TtyError;
use crate::presenter::{Layout, TtyPresenter};

/// Which widget receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Grid,
    Text,
}

impl Focus {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Grid => Self::Text,
            Self::Text => Self::Grid,
        }
    }
}

/// What the loop should do with one terminal event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Forward to the session.
    Dispatch(Event),
    /// Move keyboard focus.
    Focus(Focus),
    /// Terminal resized; redraw everything.
    Redraw,
    Quit,
    Ignore,
}

/// Map a terminal event given the current focus and text field contents.
#[must_use]
pub fn map_event(event: &TermEvent, focus: Focus, layout: Layout, text: &str) -> Command {
    match event {
        TermEvent::Key(key) => map_key(key, focus, text),
        TermEvent::Mouse(mouse) => map_mouse(mouse, layout),
        TermEvent::FocusLost => Command::Dispatch(Event::Focus(false)),
        TermEvent::FocusGained => Command::Dispatch(Event::Focus(true)),
        TermEvent::Resize(..) => Command::Redraw,
        TermEvent::Paste(pasted) if focus == Focus::Text => {
            Command::Dispatch(Event::TextEdited(format!("{text}{pasted}")))
        }
        TermEvent::Paste(_) => Command::Ignore,
    }
}

fn map_key(key: &KeyEvent, focus: Focus, text: &str) -> Command {
    if key.kind != KeyEventKind::Press {
        return Command::Ignore;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Command::Quit,
            _ => Command::Ignore,
        };
    }
    match (focus, key.code) {
        (_, KeyCode::Tab | KeyCode::BackTab) => Command::Focus(focus.toggled()),
        (Focus::Grid, KeyCode::Char('g')) => Command::Dispatch(Event::ToggleGrid),
        (Focus::Grid, KeyCode::Char('c')) => Command::Dispatch(Event::Clear),
        (Focus::Grid, KeyCode::Char('q') | KeyCode::Esc) => Command::Quit,
        (Focus::Text, KeyCode::Esc | KeyCode::Enter) => Command::Focus(Focus::Grid),
        (Focus::Text, KeyCode::Char(c)) => {
            let mut edited = text.to_owned();
            edited.push(c);
            Command::Dispatch(Event::TextEdited(edited))
        }
        (Focus::Text, KeyCode::Backspace) => {
            let mut edited = text.to_owned();
            edited.pop();
            Command::Dispatch(Event::TextEdited(edited))
        }
        _ => Command::Ignore,
    }
}

fn map_mouse(mouse: &MouseEvent, layout: Layout) -> Command {
    let (x, y) = layout.to_grid(mouse.column, mouse.row);
    let pointer = match mouse.kind {
        MouseEventKind::Down(button) => PointerEvent::Down {
            x,
            y,
            button: pointer_button(button),
        },
        MouseEventKind::Drag(button) => PointerEvent::Move {
            x,
            y,
            buttons: pointer_buttons(button),
        },
        MouseEventKind::Moved => PointerEvent::hover(x, y),
        MouseEventKind::Up(_) => PointerEvent::Up,
        _ => return Command::Ignore,
    };
    Command::Dispatch(Event::Pointer(pointer))
}

const fn pointer_button(button: MouseButton) -> PointerButton {
    match button {
        MouseButton::Left => PointerButton::Primary,
        MouseButton::Middle => PointerButton::Middle,
        MouseButton::Right => PointerButton::Secondary,
    }
}

const fn pointer_buttons(button: MouseButton) -> PointerButtons {
    match button {
        MouseButton::Left => PointerButtons::PRIMARY,
        MouseButton::Middle => PointerButtons::MIDDLE,
        MouseButton::Right => PointerButtons::SECONDARY,
    }
}

/// A painter session bound to a terminal presenter.
#[derive(Debug)]
pub struct App<W: Write> {
    session: Session<TtyPresenter<W>>,
}

impl<W: Write> App<W> {
    #[must_use]
    pub fn new(out: W, layout: Layout, config: SessionConfig) -> Self {
        Self {
            session: Session::new(TtyPresenter::new(out, layout), Layout::grid_size(), config),
        }
    }

    /// Draw the whole screen, then apply the startup query.
    pub fn start(&mut self, query: &str) -> Result<(), TtyError> {
        let (picture, show_grid) = (self.session.picture(), self.session.show_grid());
        self.session.presenter_mut().redraw_all(picture, show_grid)?;
        let outcome = self.session.startup(query)?;
        debug!(?outcome, "terminal session started");
        Ok(())
    }

    /// Apply one terminal event. Returns `false` once the user quits.
    pub fn handle(&mut self, event: &TermEvent) -> Result<bool, TtyError> {
        let presenter = self.session.presenter();
        let command = map_event(event, presenter.focus(), presenter.layout(), presenter.text());
        match command {
            Command::Dispatch(event) => self.session.handle(event)?,
            Command::Focus(focus) => self.session.presenter_mut().set_focus(focus)?,
            Command::Redraw => {
                let (picture, show_grid) = (self.session.picture(), self.session.show_grid());
                self.session.presenter_mut().redraw_all(picture, show_grid)?;
            }
            Command::Quit => return Ok(false),
            Command::Ignore => {}
        }
        Ok(true)
    }

    #[must_use]
    pub const fn session(&self) -> &Session<TtyPresenter<W>> {
        &self.session
    }
}
