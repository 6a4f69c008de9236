#![forbid(unsafe_code)]

//! Terminal presenter.
//!
//! Screen layout, relative to [`Layout::origin`]:
//!
//! | Row    | Content                                   |
//! |--------|-------------------------------------------|
//! | 0..8   | the grid, two columns per cell            |
//! | 9      | the text field (`picture: N`)             |
//! | 10     | the shareable link (`link: ?picture=N`)   |
//! | 12     | key help for the focused widget           |
//!
//! Every [`Presenter`] call redraws only its own rows and flushes, so each
//! session handler leaves the screen consistent.

use std::io::Write;

use bitpaint_core::geometry::SurfaceSize;
use bitpaint_core::picture::{COLS, Picture, ROWS};
use bitpaint_core::session::Presenter;
use bitpaint_render::render_lines;
use crossterm::cursor::MoveTo;
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::terminal::{Clear, ClearType};
use crossterm::queue;

use crate::TtyError;
use crate::app::Focus;

/// Terminal columns per grid cell.
pub const CELL_COLUMNS: u16 = 2;

const TEXT_ROW: u16 = ROWS as u16 + 1;
const LINK_ROW: u16 = ROWS as u16 + 2;
const HELP_ROW: u16 = ROWS as u16 + 4;

const GRID_HELP: &str = "drag: paint  tab: edit number  g: grid  c: clear  q: quit";
const TEXT_HELP: &str = "type digits  backspace: delete  tab/esc: back to grid";

/// Where the painter sits on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Layout {
    /// Top-left corner of the grid (column, row).
    pub origin: (u16, u16),
}

impl Layout {
    #[must_use]
    pub const fn new(column: u16, row: u16) -> Self {
        Self {
            origin: (column, row),
        }
    }

    /// Grid size in terminal cells, as seen by the pointer mapping.
    #[must_use]
    pub const fn grid_size() -> SurfaceSize {
        SurfaceSize::new(COLS as u32 * CELL_COLUMNS as u32, ROWS as u32)
    }

    /// Translate a terminal position into grid-local coordinates.
    #[must_use]
    pub fn to_grid(&self, column: u16, row: u16) -> (i32, i32) {
        (
            i32::from(column) - i32::from(self.origin.0),
            i32::from(row) - i32::from(self.origin.1),
        )
    }

    fn row(&self, offset: u16) -> u16 {
        self.origin.1.saturating_add(offset)
    }
}

/// [`Presenter`] drawing with crossterm commands to any writer.
#[derive(Debug)]
pub struct TtyPresenter<W: Write> {
    out: W,
    layout: Layout,
    focus: Focus,
    text: String,
    link: String,
}

impl<W: Write> TtyPresenter<W> {
    #[must_use]
    pub fn new(out: W, layout: Layout) -> Self {
        Self {
            out,
            layout,
            focus: Focus::Grid,
            text: String::new(),
            link: String::new(),
        }
    }

    #[must_use]
    pub const fn layout(&self) -> Layout {
        self.layout
    }

    #[must_use]
    pub const fn focus(&self) -> Focus {
        self.focus
    }

    /// The text field as last shown.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The link as last published; empty until the picture first changes.
    #[must_use]
    pub fn link(&self) -> &str {
        &self.link
    }

    #[must_use]
    pub const fn writer(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Move keyboard focus, redrawing the text field and help rows.
    pub fn set_focus(&mut self, focus: Focus) -> Result<(), TtyError> {
        self.focus = focus;
        self.draw_text_row()?;
        self.draw_help_row()?;
        self.out.flush()?;
        Ok(())
    }

    /// Clear the screen and draw everything.
    pub fn redraw_all(&mut self, picture: Picture, show_grid: bool) -> Result<(), TtyError> {
        queue!(self.out, Clear(ClearType::All))?;
        self.draw_grid(picture, show_grid)?;
        self.draw_text_row()?;
        self.draw_link_row()?;
        self.draw_help_row()?;
        self.out.flush()?;
        Ok(())
    }

    fn draw_grid(&mut self, picture: Picture, show_grid: bool) -> Result<(), TtyError> {
        let column = self.layout.origin.0;
        for (row, line) in (0u16..).zip(render_lines(picture, show_grid)) {
            queue!(self.out, MoveTo(column, self.layout.row(row)), Print(line))?;
        }
        Ok(())
    }

    fn draw_text_row(&mut self) -> Result<(), TtyError> {
        let (column, row) = (self.layout.origin.0, self.layout.row(TEXT_ROW));
        queue!(
            self.out,
            MoveTo(column, row),
            Clear(ClearType::UntilNewLine),
            Print("picture: ")
        )?;
        if self.focus == Focus::Text {
            queue!(
                self.out,
                SetAttribute(Attribute::Reverse),
                Print(&self.text),
                Print(' '),
                SetAttribute(Attribute::Reset)
            )?;
        } else {
            queue!(self.out, Print(&self.text))?;
        }
        Ok(())
    }

    fn draw_link_row(&mut self) -> Result<(), TtyError> {
        let (column, row) = (self.layout.origin.0, self.layout.row(LINK_ROW));
        queue!(
            self.out,
            MoveTo(column, row),
            Clear(ClearType::UntilNewLine),
            Print("link: "),
            Print(&self.link)
        )?;
        Ok(())
    }

    fn draw_help_row(&mut self) -> Result<(), TtyError> {
        let help = match self.focus {
            Focus::Grid => GRID_HELP,
            Focus::Text => TEXT_HELP,
        };
        let (column, row) = (self.layout.origin.0, self.layout.row(HELP_ROW));
        queue!(
            self.out,
            MoveTo(column, row),
            Clear(ClearType::UntilNewLine),
            SetAttribute(Attribute::Dim),
            Print(help),
            SetAttribute(Attribute::Reset)
        )?;
        Ok(())
    }
}

impl<W: Write> Presenter for TtyPresenter<W> {
    type Error = TtyError;

    fn show_text(&mut self, text: &str) -> Result<(), Self::Error> {
        text.clone_into(&mut self.text);
        self.draw_text_row()?;
        self.out.flush()?;
        Ok(())
    }

    fn publish_link(&mut self, link: &str) -> Result<(), Self::Error> {
        link.clone_into(&mut self.link);
        self.draw_link_row()?;
        self.out.flush()?;
        Ok(())
    }

    fn repaint(&mut self, picture: Picture, show_grid: bool) -> Result<(), Self::Error> {
        self.draw_grid(picture, show_grid)?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn presenter() -> TtyPresenter<Vec<u8>> {
        TtyPresenter::new(Vec::new(), Layout::new(2, 1))
    }

    fn output(p: &TtyPresenter<Vec<u8>>) -> String {
        String::from_utf8_lossy(p.writer()).into_owned()
    }

    #[test]
    fn grid_size_is_two_columns_per_cell() {
        assert_eq!(Layout::grid_size(), SurfaceSize::new(16, 8));
    }

    #[test]
    fn to_grid_subtracts_origin() {
        let layout = Layout::new(2, 1);
        assert_eq!(layout.to_grid(2, 1), (0, 0));
        assert_eq!(layout.to_grid(5, 3), (3, 2));
        assert_eq!(layout.to_grid(0, 0), (-2, -1));
    }

    #[test]
    fn repaint_draws_every_row() {
        let mut p = presenter();
        p.repaint(Picture::new(0b11), true).unwrap();
        let out = output(&p);
        assert!(out.contains("████············"));
        assert_eq!(out.matches("················").count(), 7);
    }

    #[test]
    fn show_text_and_link_are_remembered() {
        let mut p = presenter();
        p.show_text("42").unwrap();
        p.publish_link("?picture=42").unwrap();
        assert_eq!(p.text(), "42");
        assert_eq!(p.link(), "?picture=42");
        let out = output(&p);
        assert!(out.contains("picture: 42"));
        assert!(out.contains("link: ?picture=42"));
    }

    #[test]
    fn focus_switches_help() {
        let mut p = presenter();
        p.set_focus(Focus::Text).unwrap();
        assert_eq!(p.focus(), Focus::Text);
        assert!(output(&p).contains(TEXT_HELP));
        p.set_focus(Focus::Grid).unwrap();
        assert!(output(&p).contains(GRID_HELP));
    }

    #[test]
    fn redraw_all_draws_every_section() {
        let mut p = presenter();
        p.show_text("0").unwrap();
        p.redraw_all(Picture::EMPTY, false).unwrap();
        let out = output(&p);
        assert!(out.contains("picture: 0"));
        assert!(out.contains("link: "));
        assert!(out.contains(GRID_HELP));
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn write_failures_surface_as_tty_errors() {
        let mut p = TtyPresenter::new(Broken, Layout::default());
        let err = p.repaint(Picture::EMPTY, true).unwrap_err();
        assert!(matches!(err, TtyError::Io(ref e) if e.kind() == io::ErrorKind::BrokenPipe));
    }
}
