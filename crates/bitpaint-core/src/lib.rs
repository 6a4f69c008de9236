#![forbid(unsafe_code)]

//! Core: bit-grid codec, pen strokes, links, and view sync.
//!
//! An 8×8 monochrome picture is stored as a single `u64`
//! ([`Picture`](picture::Picture)), bit `row * 8 + col`. A
//! [`Session`](session::Session) keeps that number, its decimal text form,
//! its shareable link, and the drawing in step, talking to the host only
//! through the [`Presenter`](session::Presenter) trait.
//!
//! # Feature Flags
//!
//! | Feature   | Effect                                   |
//! |-----------|------------------------------------------|
//! | `tracing` | Structured logging through `tracing`     |

pub mod config;
pub mod event;
pub mod geometry;
pub mod link;
pub mod logging;
pub mod pen;
pub mod picture;
pub mod session;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, trace, trace_span, warn};

pub use config::SessionConfig;
pub use event::{Event, PointerButton, PointerButtons, PointerEvent};
pub use geometry::{PixelRect, SurfaceSize};
pub use pen::{Pen, PenMode};
pub use picture::{CellPos, ParseError, Picture, UrlPicture};
pub use session::{Presenter, Session};
