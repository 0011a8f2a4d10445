#![forbid(unsafe_code)]

//! Deterministic session recording and replay.
//!
//! [`SessionRecorder`] wraps a [`PageModel`], records every dispatched
//! event and a checksum of the page state after it, and [`replay`] runs a
//! recorded trace through a fresh model to check that the same events
//! reproduce the same states.
//!
//! # Trace layout
//!
//! - **Header**: the field names and table rows the page started with.
//! - **Event**: one dispatched [`PageEvent`].
//! - **Step**: state checksum after that event, chained with the previous
//!   step, and whether the event was accepted.
//! - **Summary**: total steps and the final chain value.
//!
//! The checksum covers the field names as rendered, the registry indices,
//! the modal source, and row visibility. Patches are not hashed; they are a
//! function of those states.

use serde::{Deserialize, Serialize};

use crate::page::{PageConfig, PageError, PageEvent, PageModel, PageOutcome};
use tform_core::FieldError;

/// Schema version for session traces.
pub const SCHEMA_VERSION: &str = "tform-trace-v1";

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

fn fnv1a64_bytes(mut hash: u64, bytes: &[u8]) -> u64 {
    for &b in bytes {
        hash ^= b as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

fn fnv1a64_u64(hash: u64, v: u64) -> u64 {
    fnv1a64_bytes(hash, &v.to_le_bytes())
}

fn fnv1a64_pair(prev: u64, next: u64) -> u64 {
    let hash = FNV_OFFSET_BASIS;
    let hash = fnv1a64_u64(hash, prev);
    fnv1a64_u64(hash, next)
}

fn fnv1a64_str(hash: u64, s: &str) -> u64 {
    // Length prefix keeps ["ab", "c"] and ["a", "bc"] apart.
    let hash = fnv1a64_u64(hash, s.len() as u64);
    fnv1a64_bytes(hash, s.as_bytes())
}

/// Checksum of the observable page state.
#[must_use]
pub fn checksum_page(page: &PageModel) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    hash = fnv1a64_u64(hash, page.field_names().len() as u64);
    for name in page.field_names() {
        hash = fnv1a64_str(hash, name);
    }
    for &index in page.registry().indices() {
        hash = fnv1a64_u64(hash, u64::from(index));
    }
    match page.modal().source() {
        Some(src) => hash = fnv1a64_str(fnv1a64_u64(hash, 1), src),
        None => hash = fnv1a64_u64(hash, 0),
    }
    for &visible in page.row_visibility() {
        hash = fnv1a64_bytes(hash, &[u8::from(visible)]);
    }
    hash
}

/// A single record in a session trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "record", rename_all = "snake_case")]
pub enum TraceRecord {
    /// Session header (must be first).
    Header {
        schema: String,
        field_names: Vec<String>,
        rows: Vec<String>,
    },
    /// A dispatched event.
    Event { seq: u64, event: PageEvent },
    /// State checkpoint after the event with the same `seq`.
    Step {
        seq: u64,
        accepted: bool,
        checksum: u64,
        checksum_chain: u64,
    },
    /// Trace summary (must be last).
    Summary {
        total_steps: u64,
        final_checksum_chain: u64,
    },
}

/// A complete recorded session trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTrace {
    pub records: Vec<TraceRecord>,
}

impl SessionTrace {
    /// Number of step checkpoints in the trace.
    #[must_use]
    pub fn step_count(&self) -> u64 {
        self.records
            .iter()
            .filter(|r| matches!(r, TraceRecord::Step { .. }))
            .count() as u64
    }

    /// Final checksum chain from the summary record.
    #[must_use]
    pub fn final_checksum_chain(&self) -> Option<u64> {
        self.records.iter().rev().find_map(|r| match r {
            TraceRecord::Summary {
                final_checksum_chain,
                ..
            } => Some(*final_checksum_chain),
            _ => None,
        })
    }

    /// Serialize as JSON Lines, one record per line.
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        let mut out = String::new();
        for record in &self.records {
            out.push_str(&serde_json::to_string(record)?);
            out.push('\n');
        }
        Ok(out)
    }

    /// Parse JSON Lines produced by [`to_jsonl`](Self::to_jsonl). Blank lines
    /// are skipped.
    pub fn from_jsonl(text: &str) -> Result<Self, serde_json::Error> {
        let records = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(serde_json::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { records })
    }
}

/// Records a page session for deterministic replay.
#[derive(Debug)]
pub struct SessionRecorder {
    page: PageModel,
    records: Vec<TraceRecord>,
    seq: u64,
    checksum_chain: u64,
}

impl SessionRecorder {
    /// Start recording a page built from `field_names` and `rows`.
    pub fn new(
        config: PageConfig,
        field_names: Vec<String>,
        rows: Vec<String>,
    ) -> Result<Self, FieldError> {
        let page = PageModel::new(config, field_names.iter().cloned(), rows.clone())?;
        Ok(Self {
            page,
            records: vec![TraceRecord::Header {
                schema: SCHEMA_VERSION.to_owned(),
                field_names,
                rows,
            }],
            seq: 0,
            checksum_chain: 0,
        })
    }

    /// The recorded page.
    #[must_use]
    pub fn page(&self) -> &PageModel {
        &self.page
    }

    /// Mutable access to the page, for draining patches.
    pub fn page_mut(&mut self) -> &mut PageModel {
        &mut self.page
    }

    /// Dispatch `event`, record it and the resulting checkpoint.
    ///
    /// Rejected events are recorded too; they must be rejected again on
    /// replay.
    pub fn dispatch(&mut self, event: PageEvent) -> Result<PageOutcome, PageError> {
        self.records.push(TraceRecord::Event {
            seq: self.seq,
            event: event.clone(),
        });
        let result = self.page.dispatch(event);
        let checksum = checksum_page(&self.page);
        self.checksum_chain = fnv1a64_pair(self.checksum_chain, checksum);
        self.records.push(TraceRecord::Step {
            seq: self.seq,
            accepted: result.is_ok(),
            checksum,
            checksum_chain: self.checksum_chain,
        });
        self.seq += 1;
        result
    }

    /// Finish recording and return the trace.
    #[must_use]
    pub fn finish(mut self) -> SessionTrace {
        self.records.push(TraceRecord::Summary {
            total_steps: self.seq,
            final_checksum_chain: self.checksum_chain,
        });
        tracing::debug!(
            message = "session.finish",
            total_steps = self.seq,
            records = self.records.len()
        );
        SessionTrace {
            records: self.records,
        }
    }
}

/// A checkpoint that did not reproduce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayMismatch {
    pub seq: u64,
    pub expected_checksum: u64,
    pub actual_checksum: u64,
    pub expected_accepted: bool,
    pub actual_accepted: bool,
}

/// Result of replaying a trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayResult {
    pub total_steps: u64,
    pub final_checksum_chain: u64,
    pub expected_checksum_chain: Option<u64>,
    pub mismatches: Vec<ReplayMismatch>,
}

impl ReplayResult {
    /// Whether every checkpoint and the final chain matched.
    #[must_use]
    pub fn ok(&self) -> bool {
        self.mismatches.is_empty()
            && self.expected_checksum_chain == Some(self.final_checksum_chain)
    }
}

/// Errors that prevent a replay from running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayError {
    /// The first record is not a header.
    MissingHeader,
    /// The header names a schema this build does not understand.
    UnsupportedSchema(String),
    /// A step record has no preceding event with the same `seq`.
    OrphanStep { seq: u64 },
    /// The header's field names do not initialize.
    Init(FieldError),
}

impl core::fmt::Display for ReplayError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingHeader => write!(f, "trace does not start with a header"),
            Self::UnsupportedSchema(schema) => write!(f, "unsupported trace schema {schema:?}"),
            Self::OrphanStep { seq } => write!(f, "step {seq} has no matching event"),
            Self::Init(err) => write!(f, "header fields do not initialize: {err}"),
        }
    }
}

impl std::error::Error for ReplayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Init(err) => Some(err),
            _ => None,
        }
    }
}

/// Replay `trace` through a fresh page built with `config`.
pub fn replay(config: PageConfig, trace: &SessionTrace) -> Result<ReplayResult, ReplayError> {
    let mut records = trace.records.iter();
    let Some(TraceRecord::Header {
        schema,
        field_names,
        rows,
    }) = records.next()
    else {
        return Err(ReplayError::MissingHeader);
    };
    if schema != SCHEMA_VERSION {
        return Err(ReplayError::UnsupportedSchema(schema.clone()));
    }

    let mut page = PageModel::new(config, field_names.iter().cloned(), rows.clone())
        .map_err(ReplayError::Init)?;
    let mut chain = 0u64;
    let mut total_steps = 0u64;
    let mut pending: Option<(u64, bool)> = None;
    let mut mismatches = Vec::new();

    for record in records {
        match record {
            TraceRecord::Event { seq, event } => {
                let accepted = page.dispatch(event.clone()).is_ok();
                pending = Some((*seq, accepted));
            }
            TraceRecord::Step {
                seq,
                accepted,
                checksum,
                ..
            } => {
                let Some((event_seq, actual_accepted)) = pending.take() else {
                    return Err(ReplayError::OrphanStep { seq: *seq });
                };
                if event_seq != *seq {
                    return Err(ReplayError::OrphanStep { seq: *seq });
                }
                let actual = checksum_page(&page);
                chain = fnv1a64_pair(chain, actual);
                total_steps += 1;
                if actual != *checksum || actual_accepted != *accepted {
                    tracing::warn!(
                        message = "session.replay.mismatch",
                        seq,
                        expected = checksum,
                        actual
                    );
                    mismatches.push(ReplayMismatch {
                        seq: *seq,
                        expected_checksum: *checksum,
                        actual_checksum: actual,
                        expected_accepted: *accepted,
                        actual_accepted,
                    });
                }
            }
            TraceRecord::Header { .. } | TraceRecord::Summary { .. } => {}
        }
    }

    Ok(ReplayResult {
        total_steps,
        final_checksum_chain: chain,
        expected_checksum_chain: trace.final_checksum_chain(),
        mismatches,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn recorder() -> SessionRecorder {
        SessionRecorder::new(
            PageConfig::default(),
            vec!["track_image_0".into(), "track_image_1".into()],
            vec!["alice".into(), "bob".into()],
        )
        .unwrap()
    }

    fn script(rec: &mut SessionRecorder) {
        let _ = rec.dispatch(PageEvent::AddField);
        let _ = rec.dispatch(PageEvent::RemoveField { position: 0 });
        let _ = rec.dispatch(PageEvent::RemoveField { position: 9 });
        let _ = rec.dispatch(PageEvent::ImageClicked {
            src: "/media/a.png".into(),
        });
        let _ = rec.dispatch(PageEvent::FilterInput { value: "b".into() });
        let _ = rec.dispatch(PageEvent::EscapePressed);
    }

    #[test]
    fn record_and_replay_match() {
        let mut rec = recorder();
        script(&mut rec);
        let trace = rec.finish();
        assert_eq!(trace.step_count(), 6);

        let result = replay(PageConfig::default(), &trace).unwrap();
        assert!(result.ok(), "{result:?}");
        assert_eq!(result.total_steps, 6);
    }

    #[test]
    fn rejected_event_is_recorded() {
        let mut rec = recorder();
        assert!(rec.dispatch(PageEvent::RemoveField { position: 5 }).is_err());
        let trace = rec.finish();
        assert!(trace.records.iter().any(|r| matches!(
            r,
            TraceRecord::Step {
                accepted: false,
                ..
            }
        )));
    }

    #[test]
    fn tampered_checksum_is_reported() {
        let mut rec = recorder();
        script(&mut rec);
        let mut trace = rec.finish();
        for record in &mut trace.records {
            if let TraceRecord::Step { seq: 1, checksum, .. } = record {
                *checksum ^= 1;
            }
        }
        let result = replay(PageConfig::default(), &trace).unwrap();
        assert!(!result.ok());
        assert_eq!(result.mismatches.len(), 1);
        assert_eq!(result.mismatches[0].seq, 1);
    }

    #[test]
    fn different_config_diverges() {
        let mut rec = recorder();
        let _ = rec.dispatch(PageEvent::ImageClicked {
            src: "/media/photo.png".into(),
        });
        let trace = rec.finish();
        let strict = PageConfig::default().modal(
            tform_widgets::ImageModalConfig::default().exclude("photo"),
        );
        let result = replay(strict, &trace).unwrap();
        assert!(!result.ok());
    }

    #[test]
    fn jsonl_round_trip_replays() {
        let mut rec = recorder();
        script(&mut rec);
        let trace = rec.finish();
        let text = trace.to_jsonl().unwrap();
        assert_eq!(text.lines().count(), trace.records.len());
        let parsed = SessionTrace::from_jsonl(&text).unwrap();
        assert!(replay(PageConfig::default(), &parsed).unwrap().ok());
    }

    #[test]
    fn recorded_events_replay_through_host_encoding() {
        let mut rec = recorder();
        script(&mut rec);
        let expected = checksum_page(rec.page());
        let trace = rec.finish();

        let mut page = PageModel::new(
            PageConfig::default(),
            ["track_image_0", "track_image_1"],
            vec!["alice".into(), "bob".into()],
        )
        .unwrap();
        for record in &trace.records {
            if let TraceRecord::Event { event, .. } = record {
                let json = serde_json::to_string(event).unwrap();
                let _ = page.dispatch_encoded(&json);
            }
        }
        assert_eq!(page.field_names(), &["track_image_1", "track_image_2"]);
        assert_eq!(checksum_page(&page), expected);
    }

    #[test]
    fn missing_header() {
        let trace = SessionTrace {
            records: vec![TraceRecord::Summary {
                total_steps: 0,
                final_checksum_chain: 0,
            }],
        };
        assert_eq!(
            replay(PageConfig::default(), &trace),
            Err(ReplayError::MissingHeader)
        );
    }

    #[test]
    fn unsupported_schema() {
        let trace = SessionTrace {
            records: vec![TraceRecord::Header {
                schema: "v0".into(),
                field_names: Vec::new(),
                rows: Vec::new(),
            }],
        };
        assert_eq!(
            replay(PageConfig::default(), &trace),
            Err(ReplayError::UnsupportedSchema("v0".into()))
        );
    }

    #[test]
    fn orphan_step() {
        let trace = SessionTrace {
            records: vec![
                TraceRecord::Header {
                    schema: SCHEMA_VERSION.into(),
                    field_names: Vec::new(),
                    rows: Vec::new(),
                },
                TraceRecord::Step {
                    seq: 0,
                    accepted: true,
                    checksum: 0,
                    checksum_chain: 0,
                },
            ],
        };
        assert_eq!(
            replay(PageConfig::default(), &trace),
            Err(ReplayError::OrphanStep { seq: 0 })
        );
    }

    #[test]
    fn checksum_tracks_field_names() {
        let a = PageModel::new(PageConfig::default(), ["track_image_0"], Vec::new()).unwrap();
        let b = PageModel::new(PageConfig::default(), ["track_image_1"], Vec::new()).unwrap();
        assert_ne!(checksum_page(&a), checksum_page(&b));
        assert_eq!(checksum_page(&a), checksum_page(&a.clone()));
    }
}
