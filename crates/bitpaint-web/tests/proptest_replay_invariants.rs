//! Property-based invariant tests for the web host.
//!
//! 1. Any recorded session replays with identical checksums.
//! 2. Traces survive a JSONL round trip.
//! 3. The published link always decodes to the current picture.
//! 4. The captured surface always matches the current picture.

use bitpaint_core::config::SessionConfig;
use bitpaint_core::link::query_param;
use bitpaint_core::picture::{UrlPicture, decode_from_url};
use bitpaint_render::{GridRenderer, Surface};
use bitpaint_web::session_record::{SessionRecorder, SessionTrace, replay};
use bitpaint_web::{HostEvent, WebHost};
use proptest::prelude::*;

fn host_event_strategy() -> impl Strategy<Value = HostEvent> {
    prop_oneof![
        4 => (-10i32..100, -10i32..100, 0u8..3)
            .prop_map(|(x, y, button)| HostEvent::PointerDown { x, y, button }),
        6 => (-10i32..100, -10i32..100, 0u8..2)
            .prop_map(|(x, y, buttons)| HostEvent::PointerMove { x, y, buttons }),
        2 => Just(HostEvent::PointerUp),
        1 => Just(HostEvent::PointerLeave),
        1 => "[0-9a-z ]{0,8}".prop_map(|text| HostEvent::TextEdit { text }),
        1 => Just(HostEvent::ToggleGrid),
        1 => Just(HostEvent::Clear),
        1 => any::<bool>().prop_map(|focused| HostEvent::Focus { focused }),
    ]
}

fn batches() -> impl Strategy<Value = Vec<Vec<HostEvent>>> {
    proptest::collection::vec(proptest::collection::vec(host_event_strategy(), 0..6), 0..8)
}

fn record(query: &str, batches: &[Vec<HostEvent>]) -> SessionTrace {
    let mut rec = SessionRecorder::new(96, 96, true);
    rec.init(query).unwrap();
    for batch in batches {
        for event in batch {
            rec.push_event(event.clone());
        }
        rec.step().unwrap();
    }
    rec.finish()
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Replay is exact
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn replay_is_exact(bits in any::<u64>(), batches in batches()) {
        let trace = record(&format!("picture={bits}"), &batches);
        let result = replay(&trace).unwrap();
        prop_assert!(result.ok(), "{:?}", result.first_mismatch);
        prop_assert_eq!(result.total_frames, trace.frame_count());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. JSONL round trip
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn jsonl_round_trip(batches in batches()) {
        let trace = record("", &batches);
        let jsonl = trace.to_jsonl().unwrap();
        let parsed = SessionTrace::from_jsonl_validated(&jsonl).unwrap();
        prop_assert_eq!(parsed, trace);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3 & 4. Views agree with the picture after every step
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn views_agree(batches in batches()) {
        let mut host = WebHost::new(96, 96, SessionConfig::default());
        host.init("").unwrap();
        for batch in batches {
            for event in batch {
                host.push_host_event(event);
            }
            host.step().unwrap();

            let picture = host.session().picture();
            let out = host.outputs();
            prop_assert_eq!(&out.text, &picture.bits().to_string());
            if let Some(link) = &out.link {
                let value = query_param(link, "picture");
                prop_assert_eq!(decode_from_url(value.as_deref()), UrlPicture::Present(picture));
            }

            let mut expected = Surface::new(96, 96);
            GridRenderer::default().render(picture, out.show_grid, &mut expected);
            prop_assert_eq!(out.last_checksum, Some(expected.checksum()));
        }
    }
}
