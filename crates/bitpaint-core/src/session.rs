#![forbid(unsafe_code)]

//! View synchronization.
//!
//! A [`Session`] owns the picture, the pen, and the gridline flag, and keeps
//! the three views of the picture (text field, shareable link, drawing) in
//! step through a host-supplied [`Presenter`].
//!
//! # Sync contract
//!
//! Every handler that assigns the picture runs the full sync before it
//! returns: text, then link, then repaint. Hosts dispatch one event at a
//! time, so no partially synced state is ever observable. The only handlers
//! that skip part of the sync are:
//!
//! - [`Session::toggle_grid`], which only repaints (the picture is unchanged);
//! - [`Session::startup`], which fills the text field and repaints but leaves
//!   the page link as the host loaded it.
//!
//! # Failure Modes
//!
//! | Failure                         | Fallback                          |
//! |---------------------------------|-----------------------------------|
//! | Unparsable text field           | picture becomes 0, views resynced |
//! | Startup parameter absent        | picture stays 0                   |
//! | Startup parameter malformed     | picture stays 0                   |
//! | Presenter error                 | returned to the caller unchanged  |

use crate::config::SessionConfig;
use crate::event::{Event, PointerButton, PointerButtons, PointerEvent};
use crate::geometry::SurfaceSize;
use crate::link::{build_link, query_param};
use crate::pen::Pen;
use crate::picture::{Picture, UrlPicture, decode_from_url, format_text, parse_text};
use crate::{debug, trace_span};

/// Output seam implemented by each host.
///
/// Calls arrive in the order text, link, repaint; implementations must not
/// assume any other ordering.
pub trait Presenter {
    /// Host-specific failure.
    type Error;

    /// Replace the text field's contents.
    fn show_text(&mut self, text: &str) -> Result<(), Self::Error>;

    /// Publish the shareable link (address bar, status line, ...).
    fn publish_link(&mut self, link: &str) -> Result<(), Self::Error>;

    /// Redraw the grid.
    fn repaint(&mut self, picture: Picture, show_grid: bool) -> Result<(), Self::Error>;
}

/// One painting session.
#[derive(Debug)]
pub struct Session<P> {
    config: SessionConfig,
    surface: SurfaceSize,
    picture: Picture,
    pen: Pen,
    show_grid: bool,
    presenter: P,
}

impl<P: Presenter> Session<P> {
    /// Create a session with an empty picture.
    ///
    /// Nothing is presented until [`startup`](Self::startup) runs.
    #[must_use]
    pub fn new(presenter: P, surface: SurfaceSize, config: SessionConfig) -> Self {
        Self {
            show_grid: config.show_grid,
            config,
            surface,
            picture: Picture::EMPTY,
            pen: Pen::new(),
            presenter,
        }
    }

    #[must_use]
    pub const fn picture(&self) -> Picture {
        self.picture
    }

    #[must_use]
    pub const fn pen(&self) -> &Pen {
        &self.pen
    }

    #[must_use]
    pub const fn show_grid(&self) -> bool {
        self.show_grid
    }

    #[must_use]
    pub const fn surface(&self) -> SurfaceSize {
        self.surface
    }

    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub const fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// Consume the session, returning its presenter.
    pub fn into_presenter(self) -> P {
        self.presenter
    }

    /// Text form of the current picture.
    #[must_use]
    pub fn text(&self) -> String {
        format_text(self.picture)
    }

    /// Shareable link for the current picture.
    #[must_use]
    pub fn link(&self) -> String {
        build_link(&self.config.link_base, &self.config.param_key, self.picture)
    }

    /// Read the picture parameter from the page's query string and draw the
    /// first frame.
    ///
    /// A present, well-formed parameter replaces the picture. An absent or
    /// malformed one leaves it untouched. Either way the text field is filled
    /// and the grid repainted; the link is left alone.
    pub fn startup(&mut self, query: &str) -> Result<UrlPicture, P::Error> {
        let raw = query_param(query, &self.config.param_key);
        let outcome = decode_from_url(raw.as_deref());
        match outcome {
            UrlPicture::Present(picture) => {
                debug!(picture = picture.bits(), "startup picture from link");
                self.picture = picture;
            }
            UrlPicture::Malformed(err) => {
                debug!(error = %err, "ignoring malformed startup picture");
                let _ = err;
            }
            UrlPicture::Absent => {}
        }
        self.presenter.show_text(&format_text(self.picture))?;
        self.presenter.repaint(self.picture, self.show_grid)?;
        Ok(outcome)
    }

    /// Dispatch one event.
    pub fn handle(&mut self, event: Event) -> Result<(), P::Error> {
        match event {
            Event::Pointer(pointer) => self.pointer(pointer).map(|_| ()),
            Event::TextEdited(text) => self.text_edited(&text),
            Event::ToggleGrid => self.toggle_grid(),
            Event::Clear => self.clear(),
            Event::Focus(false) => {
                self.pen.release();
                Ok(())
            }
            Event::Focus(true) => Ok(()),
        }
    }

    /// Feed a pointer event through the pen.
    ///
    /// Returns `true` when a cell changed (and the views were resynced).
    pub fn pointer(&mut self, event: PointerEvent) -> Result<bool, P::Error> {
        let picture = self.picture;
        let next = match event {
            PointerEvent::Down {
                x,
                y,
                button: PointerButton::Primary,
            } => match self.surface.cell_at(x, y) {
                Some(pos) => self.pen.press(picture, pos),
                None => {
                    self.pen.release();
                    None
                }
            },
            PointerEvent::Down { .. } => None,
            PointerEvent::Move { x, y, buttons } => {
                if !self.pen.is_stroking() {
                    None
                } else if !buttons.contains(PointerButtons::PRIMARY) {
                    self.pen.release();
                    None
                } else {
                    self.surface
                        .cell_at(x, y)
                        .and_then(|pos| self.pen.drag(picture, pos))
                }
            }
            PointerEvent::Up | PointerEvent::Leave => {
                self.pen.release();
                None
            }
        };

        match next {
            Some(next) => {
                self.picture = next;
                self.picture_changed()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// The user edited the text field; anything unparsable becomes 0.
    pub fn text_edited(&mut self, text: &str) -> Result<(), P::Error> {
        self.picture = match parse_text(text) {
            Ok(picture) => picture,
            Err(err) => {
                debug!(error = %err, text, "unparsable picture text, using 0");
                let _ = err;
                Picture::EMPTY
            }
        };
        self.picture_changed()
    }

    /// Replace the picture directly and resync.
    pub fn assign(&mut self, picture: Picture) -> Result<(), P::Error> {
        self.picture = picture;
        self.picture_changed()
    }

    /// Reset to an empty picture.
    pub fn clear(&mut self) -> Result<(), P::Error> {
        self.pen.release();
        self.assign(Picture::EMPTY)
    }

    /// Flip gridline visibility and repaint.
    pub fn toggle_grid(&mut self) -> Result<(), P::Error> {
        self.show_grid = !self.show_grid;
        self.presenter.repaint(self.picture, self.show_grid)
    }

    /// The drawing surface changed size. Ends any stroke and repaints.
    pub fn resize(&mut self, surface: SurfaceSize) -> Result<(), P::Error> {
        self.surface = surface;
        self.pen.release();
        self.presenter.repaint(self.picture, self.show_grid)
    }

    fn picture_changed(&mut self) -> Result<(), P::Error> {
        let span = trace_span!("picture_changed", picture = self.picture.bits());
        let _guard = span.enter();
        let link = self.link();
        self.presenter.show_text(&format_text(self.picture))?;
        self.presenter.publish_link(&link)?;
        self.presenter.repaint(self.picture, self.show_grid)
    }
}
