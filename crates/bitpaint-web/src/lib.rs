#![forbid(unsafe_code)]

//! `bitpaint-web` hosts a bitpaint session in a browser or headless harness.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding environment (JS, or a test) pushes
//!   [`HostEvent`]s and calls [`WebHost::step`].
//! - **Deterministic output**: every repaint lands in a software
//!   [`Surface`] whose checksum identifies the frame, so sessions can be
//!   recorded and replayed ([`session_record`]).
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!
//! On `wasm32` targets the `BitPaintWeb` class draws to a real canvas through
//! `wasm-bindgen`; see the `wasm` module.

pub mod input;
pub mod session_record;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::BitPaintWeb;

use std::collections::VecDeque;

use bitpaint_core::config::SessionConfig;
use bitpaint_core::event::Event;
use bitpaint_core::geometry::SurfaceSize;
use bitpaint_core::picture::{Picture, UrlPicture};
use bitpaint_core::session::{Presenter, Session};
use bitpaint_render::{GridRenderer, Surface};
use tracing::debug;

pub use input::HostEvent;

/// Web backend error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebBackendError {
    /// [`WebHost::step`] before [`WebHost::init`].
    NotInitialized,
    /// [`WebHost::init`] called twice.
    AlreadyInitialized,
    /// A browser API call failed.
    Dom(String),
}

impl core::fmt::Display for WebBackendError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotInitialized => write!(f, "host stepped before init"),
            Self::AlreadyInitialized => write!(f, "host initialized twice"),
            Self::Dom(msg) => write!(f, "dom: {msg}"),
        }
    }
}

impl std::error::Error for WebBackendError {}

/// Captured presentation outputs for host consumption.
#[derive(Debug, Default, Clone)]
pub struct WebOutputs {
    /// Current text field contents.
    pub text: String,
    /// Last published link; `None` until the picture first changes.
    pub link: Option<String>,
    /// Last fully-rendered surface.
    pub last_surface: Option<Surface>,
    /// Checksum of `last_surface`.
    pub last_checksum: Option<u64>,
    /// Gridline flag of the last repaint.
    pub show_grid: bool,
    /// Repaints since creation.
    pub repaint_count: u64,
}

/// Presenter that renders into a software surface and captures the rest.
#[derive(Debug, Clone)]
pub struct WebPresenter {
    size: SurfaceSize,
    renderer: GridRenderer,
    outputs: WebOutputs,
}

impl WebPresenter {
    /// Create a presenter for a `width × height` canvas.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: SurfaceSize::new(width, height),
            renderer: GridRenderer::default(),
            outputs: WebOutputs::default(),
        }
    }

    /// Use custom colors.
    #[must_use]
    pub fn with_renderer(mut self, renderer: GridRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Get captured outputs.
    #[must_use]
    pub const fn outputs(&self) -> &WebOutputs {
        &self.outputs
    }

    /// Take captured outputs, leaving empty defaults.
    pub fn take_outputs(&mut self) -> WebOutputs {
        std::mem::take(&mut self.outputs)
    }

    fn set_size(&mut self, size: SurfaceSize) {
        self.size = size;
    }
}

impl Presenter for WebPresenter {
    type Error = WebBackendError;

    fn show_text(&mut self, text: &str) -> Result<(), Self::Error> {
        text.clone_into(&mut self.outputs.text);
        Ok(())
    }

    fn publish_link(&mut self, link: &str) -> Result<(), Self::Error> {
        self.outputs.link = Some(link.to_owned());
        Ok(())
    }

    fn repaint(&mut self, picture: Picture, show_grid: bool) -> Result<(), Self::Error> {
        // Reuse the previous surface when the size is unchanged.
        let mut surface = match self.outputs.last_surface.take() {
            Some(s) if s.size() == self.size => s,
            _ => Surface::new(self.size.width(), self.size.height()),
        };
        self.renderer.render(picture, show_grid, &mut surface);
        self.outputs.last_checksum = Some(surface.checksum());
        self.outputs.last_surface = Some(surface);
        self.outputs.show_grid = show_grid;
        self.outputs.repaint_count += 1;
        Ok(())
    }
}

/// Result of a single [`WebHost::step`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepResult {
    /// Number of events processed during this step.
    pub events_processed: u32,
    /// Whether anything was repainted during this step.
    pub repainted: bool,
    /// Current frame index (monotonically increasing; startup is frame 0).
    pub frame_idx: u64,
}

/// Host-driven, non-blocking session runner.
///
/// # Lifecycle
///
/// 1. [`WebHost::new`]: create with a canvas size and configuration.
/// 2. [`WebHost::init`]: call once with the page's query string; paints frame 0.
/// 3. [`WebHost::push_event`] as input arrives, then [`WebHost::step`]
///    (e.g. from `requestAnimationFrame`).
/// 4. Read outputs after each step via [`WebHost::outputs`].
#[derive(Debug)]
pub struct WebHost {
    session: Session<WebPresenter>,
    queue: VecDeque<Event>,
    initialized: bool,
    frame_idx: u64,
}

impl WebHost {
    #[must_use]
    pub fn new(width: u32, height: u32, config: SessionConfig) -> Self {
        Self::with_presenter(WebPresenter::new(width, height), config)
    }

    #[must_use]
    pub fn with_presenter(presenter: WebPresenter, config: SessionConfig) -> Self {
        let size = presenter.size;
        Self {
            session: Session::new(presenter, size, config),
            queue: VecDeque::new(),
            initialized: false,
            frame_idx: 0,
        }
    }

    /// Read the startup picture from `query` and paint the first frame.
    pub fn init(&mut self, query: &str) -> Result<UrlPicture, WebBackendError> {
        if self.initialized {
            return Err(WebBackendError::AlreadyInitialized);
        }
        self.initialized = true;
        let outcome = self.session.startup(query)?;
        debug!(?outcome, "web host initialized");
        Ok(outcome)
    }

    /// Queue an event for the next [`step`](Self::step).
    pub fn push_event(&mut self, event: impl Into<Event>) {
        self.queue.push_back(event.into());
    }

    /// Queue a host (JSON schema) event.
    pub fn push_host_event(&mut self, event: HostEvent) {
        self.push_event(event);
    }

    /// Resize the canvas. Takes effect immediately and repaints.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), WebBackendError> {
        let size = SurfaceSize::new(width, height);
        self.session.presenter_mut().set_size(size);
        self.session.resize(size)
    }

    /// Process all pending events.
    pub fn step(&mut self) -> Result<StepResult, WebBackendError> {
        if !self.initialized {
            return Err(WebBackendError::NotInitialized);
        }

        let before = self.outputs().repaint_count;
        let mut events_processed: u32 = 0;
        while let Some(event) = self.queue.pop_front() {
            events_processed += 1;
            self.session.handle(event)?;
        }

        let repainted = self.outputs().repaint_count != before;
        if repainted {
            self.frame_idx += 1;
        }
        Ok(StepResult {
            events_processed,
            repainted,
            frame_idx: self.frame_idx,
        })
    }

    /// Number of queued events.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub const fn frame_idx(&self) -> u64 {
        self.frame_idx
    }

    #[must_use]
    pub fn outputs(&self) -> &WebOutputs {
        self.session.presenter().outputs()
    }

    #[must_use]
    pub const fn session(&self) -> &Session<WebPresenter> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session<WebPresenter> {
        &mut self.session
    }
}
