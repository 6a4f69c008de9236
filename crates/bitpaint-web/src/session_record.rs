#![forbid(unsafe_code)]

//! Deterministic session recording and replay.
//!
//! Provides [`SessionRecorder`] for recording the startup query, input events,
//! and resizes of a [`WebHost`] session, and [`replay`] for running them
//! through a fresh host to verify that frame checksums match exactly.
//!
//! # Trace format
//!
//! One JSON object per line, tagged by `event`:
//!
//! - **trace_header**: schema version, canvas size, gridline flag, startup query.
//! - **input**: a [`HostEvent`].
//! - **resize**: canvas resize.
//! - **frame**: frame checkpoint with FNV-1a surface checksum and chaining.
//! - **trace_summary**: total frames and final checksum chain.
//!
//! # Determinism contract
//!
//! Given identical recorded inputs, replay **must** produce identical frame
//! checksums. The host never polls or reads a clock, and the renderer is a
//! pure function of picture, gridline flag, and surface size.
//!
//! # Example
//!
//! ```
//! use bitpaint_web::HostEvent;
//! use bitpaint_web::session_record::{SessionRecorder, replay};
//!
//! let mut recorder = SessionRecorder::new(64, 64, true);
//! recorder.init("picture=5").unwrap();
//! recorder.push_event(HostEvent::down(1, 1));
//! recorder.step().unwrap();
//!
//! let trace = recorder.finish();
//! assert!(replay(&trace).unwrap().ok());
//! ```

use bitpaint_core::config::SessionConfig;
use serde::{Deserialize, Serialize};

use crate::input::HostEvent;
use crate::{StepResult, WebBackendError, WebHost};

/// Schema version for session traces.
pub const SCHEMA_VERSION: &str = "bitpaint-trace-v1";

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

fn fnv1a64_bytes(mut hash: u64, bytes: &[u8]) -> u64 {
    for &b in bytes {
        hash ^= b as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

fn fnv1a64_pair(prev: u64, next: u64) -> u64 {
    let hash = fnv1a64_bytes(FNV_OFFSET_BASIS, &prev.to_le_bytes());
    fnv1a64_bytes(hash, &next.to_le_bytes())
}

/// A single record in a session trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceRecord {
    /// Session header (must be first).
    #[serde(rename = "trace_header")]
    Header {
        schema_version: String,
        width: u32,
        height: u32,
        show_grid: bool,
        query: String,
    },
    /// A host input event.
    Input { data: HostEvent },
    /// Canvas resize.
    Resize { width: u32, height: u32 },
    /// Frame checkpoint.
    Frame {
        frame_idx: u64,
        picture: u64,
        checksum: u64,
        checksum_chain: u64,
    },
    /// Trace summary (must be last).
    #[serde(rename = "trace_summary")]
    Summary {
        total_frames: u64,
        final_checksum_chain: u64,
    },
}

impl TraceRecord {
    /// Serialize this record as one JSONL line (without newline).
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// A complete recorded session trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTrace {
    pub records: Vec<TraceRecord>,
}

impl SessionTrace {
    /// Number of frame checkpoints in the trace.
    pub fn frame_count(&self) -> u64 {
        self.records
            .iter()
            .filter(|r| matches!(r, TraceRecord::Frame { .. }))
            .count() as u64
    }

    /// Extract the final checksum chain from the summary record.
    pub fn final_checksum_chain(&self) -> Option<u64> {
        self.records.iter().rev().find_map(|r| match r {
            TraceRecord::Summary {
                final_checksum_chain,
                ..
            } => Some(*final_checksum_chain),
            _ => None,
        })
    }

    /// Validate structural invariants:
    /// - exactly one header, first
    /// - exactly one summary, last
    /// - frame indices contiguous from zero
    /// - summary totals/chains match frame records
    pub fn validate(&self) -> Result<(), TraceValidationError> {
        let (first, last) = match (self.records.first(), self.records.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(TraceValidationError::EmptyTrace),
        };
        match first {
            TraceRecord::Header { schema_version, .. } if schema_version != SCHEMA_VERSION => {
                return Err(TraceValidationError::UnsupportedSchema(
                    schema_version.clone(),
                ));
            }
            TraceRecord::Header { .. } => {}
            _ => return Err(TraceValidationError::HeaderNotFirst),
        }
        let TraceRecord::Summary {
            total_frames,
            final_checksum_chain,
        } = *last
        else {
            return Err(TraceValidationError::MissingSummary);
        };

        let mut expected_frame_idx: u64 = 0;
        let mut last_chain: u64 = 0;
        for (idx, record) in self.records.iter().enumerate() {
            match record {
                TraceRecord::Header { .. } if idx != 0 => {
                    return Err(TraceValidationError::MultipleHeaders);
                }
                TraceRecord::Summary { .. } if idx != self.records.len() - 1 => {
                    return Err(TraceValidationError::SummaryNotLast { summary_index: idx });
                }
                TraceRecord::Frame {
                    frame_idx,
                    checksum_chain,
                    ..
                } => {
                    if *frame_idx != expected_frame_idx {
                        return Err(TraceValidationError::FrameIndexMismatch {
                            expected: expected_frame_idx,
                            actual: *frame_idx,
                        });
                    }
                    expected_frame_idx += 1;
                    last_chain = *checksum_chain;
                }
                _ => {}
            }
        }

        if total_frames != expected_frame_idx {
            return Err(TraceValidationError::SummaryFrameCountMismatch {
                expected: expected_frame_idx,
                actual: total_frames,
            });
        }
        if final_checksum_chain != last_chain {
            return Err(TraceValidationError::SummaryChecksumChainMismatch {
                expected: last_chain,
                actual: final_checksum_chain,
            });
        }
        Ok(())
    }

    /// Serialize the entire trace as JSONL.
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        let mut out = String::new();
        for record in &self.records {
            out.push_str(&record.to_jsonl()?);
            out.push('\n');
        }
        Ok(out)
    }

    /// Parse a JSONL string into a `SessionTrace`.
    ///
    /// Returns a parse error with the line number on failure.
    pub fn from_jsonl(input: &str) -> Result<Self, TraceParseError> {
        let mut records = Vec::new();
        for (line_num, line) in input.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let record = serde_json::from_str(line).map_err(|e| TraceParseError {
                line: line_num + 1,
                message: e.to_string(),
            })?;
            records.push(record);
        }
        Ok(Self { records })
    }

    /// Parse and validate a JSONL payload.
    pub fn from_jsonl_validated(input: &str) -> Result<Self, TraceLoadError> {
        let trace = Self::from_jsonl(input)?;
        trace.validate()?;
        Ok(trace)
    }
}

/// Error parsing a JSONL trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceParseError {
    pub line: usize,
    pub message: String,
}

impl core::fmt::Display for TraceParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for TraceParseError {}

/// Typed validation failures for `SessionTrace`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceValidationError {
    EmptyTrace,
    HeaderNotFirst,
    MultipleHeaders,
    UnsupportedSchema(String),
    MissingSummary,
    SummaryNotLast { summary_index: usize },
    FrameIndexMismatch { expected: u64, actual: u64 },
    SummaryFrameCountMismatch { expected: u64, actual: u64 },
    SummaryChecksumChainMismatch { expected: u64, actual: u64 },
}

impl core::fmt::Display for TraceValidationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::EmptyTrace => write!(f, "trace is empty"),
            Self::HeaderNotFirst => write!(f, "trace header is not the first record"),
            Self::MultipleHeaders => write!(f, "trace contains multiple headers"),
            Self::UnsupportedSchema(v) => write!(f, "unsupported trace schema {v:?}"),
            Self::MissingSummary => write!(f, "trace is missing summary"),
            Self::SummaryNotLast { summary_index } => write!(
                f,
                "trace summary at index {summary_index} is not the final record"
            ),
            Self::FrameIndexMismatch { expected, actual } => {
                write!(f, "frame index mismatch: expected {expected}, got {actual}")
            }
            Self::SummaryFrameCountMismatch { expected, actual } => write!(
                f,
                "summary frame-count mismatch: expected {expected}, got {actual}"
            ),
            Self::SummaryChecksumChainMismatch { expected, actual } => write!(
                f,
                "summary checksum-chain mismatch: expected {expected:016x}, got {actual:016x}"
            ),
        }
    }
}

impl std::error::Error for TraceValidationError {}

/// Combined load error for parse + validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceLoadError {
    Parse(TraceParseError),
    Validation(TraceValidationError),
}

impl core::fmt::Display for TraceLoadError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "{e}"),
            Self::Validation(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for TraceLoadError {}

impl From<TraceParseError> for TraceLoadError {
    fn from(e: TraceParseError) -> Self {
        Self::Parse(e)
    }
}

impl From<TraceValidationError> for TraceLoadError {
    fn from(e: TraceValidationError) -> Self {
        Self::Validation(e)
    }
}

/// Records a [`WebHost`] session for deterministic replay.
///
/// Frame checkpoints are taken after init and after every step that
/// repainted.
#[derive(Debug)]
pub struct SessionRecorder {
    host: WebHost,
    records: Vec<TraceRecord>,
    width: u32,
    height: u32,
    show_grid: bool,
    frame_idx: u64,
    checksum_chain: u64,
}

impl SessionRecorder {
    #[must_use]
    pub fn new(width: u32, height: u32, show_grid: bool) -> Self {
        let config = SessionConfig::default().with_show_grid(show_grid);
        Self {
            host: WebHost::new(width, height, config),
            records: Vec::new(),
            width,
            height,
            show_grid,
            frame_idx: 0,
            checksum_chain: 0,
        }
    }

    /// Initialize the host and record the header and frame 0.
    pub fn init(&mut self, query: &str) -> Result<(), WebBackendError> {
        self.host.init(query)?;
        self.records.push(TraceRecord::Header {
            schema_version: SCHEMA_VERSION.to_owned(),
            width: self.width,
            height: self.height,
            show_grid: self.show_grid,
            query: query.to_owned(),
        });
        self.record_frame();
        Ok(())
    }

    /// Record and queue an input event.
    pub fn push_event(&mut self, event: HostEvent) {
        self.records.push(TraceRecord::Input {
            data: event.clone(),
        });
        self.host.push_host_event(event);
    }

    /// Record and apply a canvas resize. Records a frame for the repaint.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), WebBackendError> {
        self.records.push(TraceRecord::Resize { width, height });
        self.host.resize(width, height)?;
        self.record_frame();
        Ok(())
    }

    /// Step the host, recording a frame checkpoint if it repainted.
    pub fn step(&mut self) -> Result<StepResult, WebBackendError> {
        let result = self.host.step()?;
        if result.repainted {
            self.record_frame();
        }
        Ok(result)
    }

    /// Finish recording and return the trace.
    pub fn finish(mut self) -> SessionTrace {
        self.records.push(TraceRecord::Summary {
            total_frames: self.frame_idx,
            final_checksum_chain: self.checksum_chain,
        });
        SessionTrace {
            records: self.records,
        }
    }

    /// Access the recorded host.
    pub fn host(&self) -> &WebHost {
        &self.host
    }

    fn record_frame(&mut self) {
        if let Some(checksum) = self.host.outputs().last_checksum {
            let chain = fnv1a64_pair(self.checksum_chain, checksum);
            self.records.push(TraceRecord::Frame {
                frame_idx: self.frame_idx,
                picture: self.host.session().picture().bits(),
                checksum,
                checksum_chain: chain,
            });
            self.checksum_chain = chain;
            self.frame_idx += 1;
        }
    }
}

/// Result of replaying a session trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayResult {
    /// Total frames replayed.
    pub total_frames: u64,
    /// Final checksum chain from replay.
    pub final_checksum_chain: u64,
    /// First frame where a checksum mismatch was detected, if any.
    pub first_mismatch: Option<ReplayMismatch>,
}

impl ReplayResult {
    /// Whether the replay produced identical checksums.
    #[must_use]
    pub fn ok(&self) -> bool {
        self.first_mismatch.is_none()
    }
}

/// Description of a checksum mismatch during replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayMismatch {
    /// Frame index where the mismatch occurred.
    pub frame_idx: u64,
    /// Expected checksum from the trace.
    pub expected: u64,
    /// Actual checksum from replay.
    pub actual: u64,
}

/// Errors that can occur during replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayError {
    /// The trace violates structural invariants.
    InvalidTrace(TraceValidationError),
    /// A backend error occurred during replay.
    Backend(WebBackendError),
}

impl core::fmt::Display for ReplayError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidTrace(e) => write!(f, "invalid trace: {e}"),
            Self::Backend(e) => write!(f, "backend error: {e}"),
        }
    }
}

impl std::error::Error for ReplayError {}

impl From<WebBackendError> for ReplayError {
    fn from(e: WebBackendError) -> Self {
        Self::Backend(e)
    }
}

/// Replay a recorded session trace through a fresh host.
///
/// Input records are queued; each frame record after the first triggers a
/// step (resize records repaint on their own) and a checksum comparison.
pub fn replay(trace: &SessionTrace) -> Result<ReplayResult, ReplayError> {
    trace.validate().map_err(ReplayError::InvalidTrace)?;
    let Some(TraceRecord::Header {
        width,
        height,
        show_grid,
        query,
        ..
    }) = trace.records.first()
    else {
        return Err(ReplayError::InvalidTrace(
            TraceValidationError::HeaderNotFirst,
        ));
    };

    let config = SessionConfig::default().with_show_grid(*show_grid);
    let mut host = WebHost::new(*width, *height, config);
    host.init(query)?;

    let mut frames: u64 = 0;
    let mut checksum_chain: u64 = 0;
    let mut first_mismatch: Option<ReplayMismatch> = None;
    let mut resized = false;

    for record in &trace.records {
        match record {
            TraceRecord::Input { data } => host.push_host_event(data.clone()),
            TraceRecord::Resize { width, height } => {
                host.resize(*width, *height)?;
                resized = true;
            }
            TraceRecord::Frame {
                frame_idx,
                checksum: expected,
                ..
            } => {
                // Frame 0 was painted by init; resize frames by resize.
                if frames > 0 && !resized {
                    host.step()?;
                }
                resized = false;

                let actual = host.outputs().last_checksum.unwrap_or_default();
                checksum_chain = fnv1a64_pair(checksum_chain, actual);
                if actual != *expected && first_mismatch.is_none() {
                    first_mismatch = Some(ReplayMismatch {
                        frame_idx: *frame_idx,
                        expected: *expected,
                        actual,
                    });
                }
                frames += 1;
            }
            TraceRecord::Header { .. } | TraceRecord::Summary { .. } => {}
        }
    }

    Ok(ReplayResult {
        total_frames: frames,
        final_checksum_chain: checksum_chain,
        first_mismatch,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn recorded() -> SessionTrace {
        let mut rec = SessionRecorder::new(80, 80, true);
        rec.init("?picture=5").unwrap();
        rec.push_event(HostEvent::down(1, 1));
        rec.push_event(HostEvent::drag(15, 1));
        rec.push_event(HostEvent::PointerUp);
        rec.step().unwrap();
        rec.push_event(HostEvent::ToggleGrid);
        rec.step().unwrap();
        rec.push_event(HostEvent::TextEdit { text: "abc".into() });
        rec.step().unwrap();
        rec.finish()
    }

    #[test]
    fn fnv1a64_pair_is_deterministic() {
        assert_eq!(fnv1a64_pair(0, 1234), fnv1a64_pair(0, 1234));
        assert_ne!(fnv1a64_pair(0, 1), fnv1a64_pair(0, 2));
        assert_ne!(fnv1a64_pair(1, 0), fnv1a64_pair(2, 0));
    }

    #[test]
    fn recorder_produces_header_frames_and_summary() {
        let trace = recorded();
        assert!(matches!(trace.records[0], TraceRecord::Header { .. }));
        assert!(matches!(
            trace.records.last(),
            Some(TraceRecord::Summary { total_frames: 4, .. })
        ));
        assert_eq!(trace.frame_count(), 4);
        trace.validate().unwrap();
    }

    #[test]
    fn idle_step_records_no_frame() {
        let mut rec = SessionRecorder::new(80, 80, true);
        rec.init("").unwrap();
        rec.push_event(HostEvent::PointerMove {
            x: 3,
            y: 3,
            buttons: 0,
        });
        rec.step().unwrap();
        assert_eq!(rec.finish().frame_count(), 1);
    }

    #[test]
    fn replay_matches_recording() {
        let trace = recorded();
        let result = replay(&trace).unwrap();
        assert!(result.ok(), "{result:?}");
        assert_eq!(result.total_frames, 4);
        assert_eq!(Some(result.final_checksum_chain), trace.final_checksum_chain());
    }

    #[test]
    fn replay_with_resize() {
        let mut rec = SessionRecorder::new(80, 80, false);
        rec.init("").unwrap();
        rec.push_event(HostEvent::down(79, 79));
        rec.step().unwrap();
        rec.resize(40, 24).unwrap();
        rec.push_event(HostEvent::down(0, 0));
        rec.step().unwrap();
        let trace = rec.finish();
        assert_eq!(trace.frame_count(), 4);
        assert!(replay(&trace).unwrap().ok());
    }

    #[test]
    fn replay_detects_tampered_checksum() {
        let mut trace = recorded();
        if let TraceRecord::Frame { checksum, .. } = &mut trace.records[1] {
            *checksum ^= 1;
        }
        let result = replay(&trace).unwrap();
        assert!(!result.ok());
        assert_eq!(result.first_mismatch.unwrap().frame_idx, 0);
    }

    #[test]
    fn jsonl_round_trip() {
        let trace = recorded();
        let jsonl = trace.to_jsonl().unwrap();
        assert!(jsonl.starts_with(r#"{"event":"trace_header","schema_version":"bitpaint-trace-v1""#));
        assert_eq!(jsonl.lines().count(), trace.records.len());
        let parsed = SessionTrace::from_jsonl_validated(&jsonl).unwrap();
        assert_eq!(parsed, trace);
    }

    #[test]
    fn jsonl_parse_error_reports_line() {
        let err = SessionTrace::from_jsonl("\n{\"event\":\"bogus\"}\n").unwrap_err();
        assert_eq!(err.line, 2);
    }

    #[test]
    fn validation_failures() {
        assert_eq!(
            SessionTrace { records: vec![] }.validate(),
            Err(TraceValidationError::EmptyTrace)
        );

        let mut trace = recorded();
        trace.records.pop();
        assert_eq!(trace.validate(), Err(TraceValidationError::MissingSummary));

        let mut trace = recorded();
        trace.records.remove(0);
        assert_eq!(trace.validate(), Err(TraceValidationError::HeaderNotFirst));

        let mut trace = recorded();
        if let TraceRecord::Header { schema_version, .. } = &mut trace.records[0] {
            *schema_version = "other".into();
        }
        assert_eq!(
            trace.validate(),
            Err(TraceValidationError::UnsupportedSchema("other".into()))
        );

        let mut trace = recorded();
        if let Some(TraceRecord::Summary { total_frames, .. }) = trace.records.last_mut() {
            *total_frames = 9;
        }
        assert_eq!(
            trace.validate(),
            Err(TraceValidationError::SummaryFrameCountMismatch {
                expected: 4,
                actual: 9
            })
        );
    }
}
