//! Property-based invariant tests for pen strokes.
//!
//! 1. A stroke only ever sets bits (marking) or only ever clears them
//!    (erasing), decided by the first cell.
//! 2. Each stroke changes each cell at most once.
//! 3. Cells the stroke never visited are untouched.
//! 4. Consecutive samples in the same cell toggle nothing.
//! 5. Release always returns the pen to idle.
//! 6. The session's views always match its picture after every event.

use std::collections::HashSet;

use bitpaint_core::config::SessionConfig;
use bitpaint_core::event::PointerEvent;
use bitpaint_core::geometry::SurfaceSize;
use bitpaint_core::pen::{Pen, PenMode};
use bitpaint_core::picture::{CellPos, Picture, format_text};
use bitpaint_core::session::{Presenter, Session};
use proptest::prelude::*;

fn cell_strategy() -> impl Strategy<Value = CellPos> {
    (0u8..8, 0u8..8).prop_map(|(r, c)| CellPos::new(r, c))
}

fn path_strategy() -> impl Strategy<Value = Vec<CellPos>> {
    proptest::collection::vec(cell_strategy(), 1..40)
}

/// Run one stroke and return every intermediate picture.
fn run_stroke(start: Picture, path: &[CellPos]) -> (Pen, Vec<Picture>) {
    let mut pen = Pen::new();
    let mut picture = start;
    let mut history = vec![start];
    for (i, &pos) in path.iter().enumerate() {
        let next = if i == 0 {
            pen.press(picture, pos)
        } else {
            pen.drag(picture, pos)
        };
        if let Some(next) = next {
            picture = next;
            history.push(picture);
        }
    }
    (pen, history)
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Monotonic strokes
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn stroke_is_monotonic(bits in any::<u64>(), path in path_strategy()) {
        let start = Picture::new(bits);
        let (pen, history) = run_stroke(start, &path);
        let marking = !start.cell(path[0]);
        prop_assert_eq!(
            pen.mode(),
            if marking { PenMode::Marking } else { PenMode::Erasing }
        );
        for pair in history.windows(2) {
            let (a, b) = (pair[0].bits(), pair[1].bits());
            if marking {
                prop_assert_eq!(a & b, a, "marking stroke cleared a bit");
            } else {
                prop_assert_eq!(a & b, b, "erasing stroke set a bit");
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. At most one change per cell
// 3. Unvisited cells untouched
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn each_cell_changes_once(bits in any::<u64>(), path in path_strategy()) {
        let start = Picture::new(bits);
        let (_, history) = run_stroke(start, &path);
        let mut changed = HashSet::new();
        for pair in history.windows(2) {
            let diff = pair[0].bits() ^ pair[1].bits();
            prop_assert_eq!(diff.count_ones(), 1);
            prop_assert!(changed.insert(diff), "cell toggled twice in one stroke");
        }

        let visited: u64 = path.iter().fold(0, |acc, pos| acc | (1 << pos.index()));
        let end = history.last().copied().unwrap_or(start);
        prop_assert_eq!((start.bits() ^ end.bits()) & !visited, 0);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Same-cell samples are ignored
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn repeated_samples_ignored(bits in any::<u64>(), pos in cell_strategy(), repeats in 1usize..20) {
        let mut pen = Pen::new();
        let picture = pen.press(Picture::new(bits), pos).unwrap();
        for _ in 0..repeats {
            prop_assert_eq!(pen.drag(picture, pos), None);
        }
        prop_assert_eq!(pen.last_cell(), Some(pos));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Release resets
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn release_resets(bits in any::<u64>(), path in path_strategy()) {
        let (mut pen, _) = run_stroke(Picture::new(bits), &path);
        pen.release();
        prop_assert_eq!(pen.mode(), PenMode::Idle);
        prop_assert_eq!(pen.last_cell(), None);
        prop_assert_eq!(pen.drag(Picture::new(bits), path[0]), None);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Views stay consistent through arbitrary pointer traffic
// ═════════════════════════════════════════════════════════════════════════

#[derive(Default)]
struct Views {
    text: String,
    link: String,
    drawn: Option<Picture>,
}

impl Presenter for Views {
    type Error = std::convert::Infallible;

    fn show_text(&mut self, text: &str) -> Result<(), Self::Error> {
        self.text = text.to_string();
        Ok(())
    }

    fn publish_link(&mut self, link: &str) -> Result<(), Self::Error> {
        self.link = link.to_string();
        Ok(())
    }

    fn repaint(&mut self, picture: Picture, _show_grid: bool) -> Result<(), Self::Error> {
        self.drawn = Some(picture);
        Ok(())
    }
}

fn pointer_strategy() -> impl Strategy<Value = PointerEvent> {
    prop_oneof![
        (-20i32..180, -20i32..180).prop_map(|(x, y)| PointerEvent::down(x, y)),
        (-20i32..180, -20i32..180).prop_map(|(x, y)| PointerEvent::drag(x, y)),
        (-20i32..180, -20i32..180).prop_map(|(x, y)| PointerEvent::hover(x, y)),
        Just(PointerEvent::Up),
        Just(PointerEvent::Leave),
    ]
}

proptest! {
    #[test]
    fn views_track_picture(events in proptest::collection::vec(pointer_strategy(), 0..60)) {
        let mut session = Session::new(
            Views::default(),
            SurfaceSize::new(160, 160),
            SessionConfig::default(),
        );
        session.startup("").unwrap();
        for event in events {
            let changed = session.pointer(event).unwrap();
            let views = session.presenter();
            prop_assert_eq!(views.drawn, Some(session.picture()));
            prop_assert_eq!(&views.text, &format_text(session.picture()));
            if changed {
                prop_assert_eq!(&views.link, &session.link());
            }
        }
    }
}
