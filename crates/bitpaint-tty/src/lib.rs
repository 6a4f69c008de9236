#![forbid(unsafe_code)]

//! Terminal frontend for bitpaint.
//!
//! - [`terminal_session`]: RAII guard for raw mode, alternate screen, and
//!   mouse capture.
//! - [`presenter`]: draws the grid, the number field, and the link.
//! - [`app`]: maps crossterm events to session events.
//! - [`cli`] and [`logging`]: binary plumbing.

pub mod app;
pub mod cli;
pub mod logging;
pub mod presenter;
pub mod terminal_session;

use std::io;

pub use app::{App, Command, Focus, map_event};
pub use presenter::{Layout, TtyPresenter};
pub use terminal_session::{GuardOptions, TerminalGuard};

/// Terminal frontend error type.
#[derive(Debug)]
pub enum TtyError {
    /// Terminal I/O failed.
    Io(io::Error),
    /// The log subscriber could not be installed.
    Logging(String),
}

impl core::fmt::Display for TtyError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "terminal i/o: {err}"),
            Self::Logging(msg) => write!(f, "logging: {msg}"),
        }
    }
}

impl std::error::Error for TtyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Logging(_) => None,
        }
    }
}

impl From<io::Error> for TtyError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

/// Run the painter on the real terminal until the user quits.
pub fn run(opts: cli::Opts) -> Result<(), TtyError> {
    let guard = TerminalGuard::new(GuardOptions::default())?;
    let mut app = App::new(io::stdout(), Layout::new(2, 1), opts.config);
    app.start(&opts.query)?;
    while app.handle(&guard.read_event()?)? {}
    Ok(())
}
