#![forbid(unsafe_code)]

//! `tform-web` is the browser-facing layer of tform.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding page (JS) pushes encoded events in
//!   and drains DOM patches out. The registry lives here, never in JS.
//! - **One event at a time**: every event runs to completion; no timers,
//!   no threads, suitable for `wasm32-unknown-unknown`.
//! - **Replayable**: sessions can be recorded and replayed to check that the
//!   same events always produce the same page state.
//!
//! The `wasm` module (wasm32 only) wraps [`PageModel`] in a `wasm-bindgen`
//! class; everything else builds and tests natively.

pub mod input_parser;
pub mod page;
pub mod session_record;
pub mod surface;
#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use input_parser::{EventParseError, parse_encoded_event};
pub use page::{PageConfig, PageError, PageEvent, PageModel, PageOutcome};
pub use session_record::{
    ReplayError, ReplayResult, SessionRecorder, SessionTrace, TraceRecord, replay,
};
pub use surface::{DomPatch, HostSurface};
