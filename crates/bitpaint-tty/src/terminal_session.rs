#![forbid(unsafe_code)]

//! Terminal lifecycle guard.
//!
//! [`TerminalGuard`] enters raw mode and the modes the painter needs, and
//! restores the terminal when dropped, including during panic unwinding.
//!
//! # Escape Sequences Reference
//!
//! | Feature | Enable | Disable |
//! |---------|--------|---------|
//! | Alternate screen | `CSI ? 1049 h` | `CSI ? 1049 l` |
//! | Mouse (SGR) | `CSI ? 1000;1002;1006 h` | `CSI ? 1000;1002;1006 l` |
//! | Bracketed paste | `CSI ? 2004 h` | `CSI ? 2004 l` |
//! | Focus events | `CSI ? 1004 h` | `CSI ? 1004 l` |
//! | Show cursor | `CSI ? 25 h` | `CSI ? 25 l` |
//!
//! # Cleanup Order
//!
//! On drop, modes are disabled in reverse order of enabling:
//! 1. Disable focus events (if enabled)
//! 2. Disable bracketed paste (if enabled)
//! 3. Disable mouse capture (if enabled)
//! 4. Show cursor (always)
//! 5. Leave alternate screen (if enabled)
//! 6. Exit raw mode (always)
//! 7. Flush stdout

use std::io::{self, Write};
use std::sync::OnceLock;

use tracing::info;

/// Which terminal modes a [`TerminalGuard`] enables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardOptions {
    /// Switch to the alternate screen buffer.
    pub alternate_screen: bool,
    /// Report mouse presses, drags and releases.
    pub mouse_capture: bool,
    /// Deliver pasted text as one event.
    pub bracketed_paste: bool,
    /// Report terminal focus gain and loss.
    pub focus_events: bool,
}

impl Default for GuardOptions {
    fn default() -> Self {
        Self {
            alternate_screen: true,
            mouse_capture: true,
            bracketed_paste: true,
            focus_events: true,
        }
    }
}

/// RAII guard owning the terminal's raw mode.
#[derive(Debug)]
pub struct TerminalGuard {
    options: GuardOptions,
    alternate_screen_enabled: bool,
    mouse_enabled: bool,
    bracketed_paste_enabled: bool,
    focus_events_enabled: bool,
}

impl TerminalGuard {
    /// Enter raw mode and enable the requested modes.
    ///
    /// If a later step fails, the modes already enabled are restored before
    /// the error is returned.
    pub fn new(options: GuardOptions) -> io::Result<Self> {
        install_panic_hook();

        crossterm::terminal::enable_raw_mode()?;
        info!("terminal raw mode enabled");

        let mut guard = Self {
            options,
            alternate_screen_enabled: false,
            mouse_enabled: false,
            bracketed_paste_enabled: false,
            focus_events_enabled: false,
        };

        let mut stdout = io::stdout();

        if options.alternate_screen {
            crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
            guard.alternate_screen_enabled = true;
            info!("alternate screen enabled");
        }

        crossterm::execute!(stdout, crossterm::cursor::Hide)?;

        if options.mouse_capture {
            crossterm::execute!(stdout, crossterm::event::EnableMouseCapture)?;
            guard.mouse_enabled = true;
            info!("mouse capture enabled");
        }

        if options.bracketed_paste {
            crossterm::execute!(stdout, crossterm::event::EnableBracketedPaste)?;
            guard.bracketed_paste_enabled = true;
            info!("bracketed paste enabled");
        }

        if options.focus_events {
            crossterm::execute!(stdout, crossterm::event::EnableFocusChange)?;
            guard.focus_events_enabled = true;
            info!("focus events enabled");
        }

        Ok(guard)
    }

    /// Current terminal size (columns, rows).
    pub fn size(&self) -> io::Result<(u16, u16)> {
        crossterm::terminal::size()
    }

    /// Block until the next terminal event.
    pub fn read_event(&self) -> io::Result<crossterm::event::Event> {
        crossterm::event::read()
    }

    #[must_use]
    pub const fn options(&self) -> GuardOptions {
        self.options
    }

    fn cleanup(&mut self) {
        let mut stdout = io::stdout();

        if self.focus_events_enabled {
            let _ = crossterm::execute!(stdout, crossterm::event::DisableFocusChange);
            self.focus_events_enabled = false;
            info!("focus events disabled");
        }

        if self.bracketed_paste_enabled {
            let _ = crossterm::execute!(stdout, crossterm::event::DisableBracketedPaste);
            self.bracketed_paste_enabled = false;
            info!("bracketed paste disabled");
        }

        if self.mouse_enabled {
            let _ = crossterm::execute!(stdout, crossterm::event::DisableMouseCapture);
            self.mouse_enabled = false;
            info!("mouse capture disabled");
        }

        let _ = crossterm::execute!(stdout, crossterm::cursor::Show);

        if self.alternate_screen_enabled {
            let _ = crossterm::execute!(stdout, crossterm::terminal::LeaveAlternateScreen);
            self.alternate_screen_enabled = false;
            info!("alternate screen disabled");
        }

        let _ = crossterm::terminal::disable_raw_mode();
        info!("terminal raw mode disabled");

        let _ = stdout.flush();
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        self.cleanup();
    }
}

fn install_panic_hook() {
    static HOOK: OnceLock<()> = OnceLock::new();
    HOOK.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            best_effort_cleanup();
            previous(info);
        }));
    });
}

// Restores everything unconditionally; the panic message must land on a
// usable terminal even if the guard never got to drop.
fn best_effort_cleanup() {
    let mut stdout = io::stdout();

    let _ = crossterm::execute!(stdout, crossterm::event::DisableFocusChange);
    let _ = crossterm::execute!(stdout, crossterm::event::DisableBracketedPaste);
    let _ = crossterm::execute!(stdout, crossterm::event::DisableMouseCapture);
    let _ = crossterm::execute!(stdout, crossterm::cursor::Show);
    let _ = crossterm::execute!(stdout, crossterm::terminal::LeaveAlternateScreen);
    let _ = crossterm::terminal::disable_raw_mode();
    let _ = stdout.flush();
}
