#![forbid(unsafe_code)]

//! JSON input parser for host-encoded page events.
//!
//! The host serializes each DOM interaction as a small JSON object with a
//! `kind` discriminator:
//!
//! | kind          | fields        | event                         |
//! |---------------|---------------|-------------------------------|
//! | `add`         |               | [`PageEvent::AddField`]       |
//! | `remove`      | `position`    | [`PageEvent::RemoveField`]    |
//! | `image_click` | `src`         | [`PageEvent::ImageClicked`]   |
//! | `modal_click` |               | [`PageEvent::ModalClicked`]   |
//! | `key`         | `code`        | [`PageEvent::EscapePressed`]  |
//! | `escape`      |               | [`PageEvent::EscapePressed`]  |
//! | `filter`      | `value`       | [`PageEvent::FilterInput`]    |
//!
//! These are also the names [`PageEvent`] serializes with, so events taken
//! from a session trace parse back to themselves. Kinds without a page
//! meaning, and keys other than Escape, parse to `Ok(None)`.

use serde::Deserialize;

use crate::page::PageEvent;

/// Errors from parsing encoded event JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventParseError {
    /// Malformed JSON.
    Json(String),
    /// Missing required field.
    MissingField(&'static str),
    /// Field present but out of range.
    InvalidField(&'static str),
}

impl core::fmt::Display for EventParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Json(msg) => write!(f, "JSON parse error: {msg}"),
            Self::MissingField(field) => write!(f, "missing required field: {field}"),
            Self::InvalidField(field) => write!(f, "invalid value for field: {field}"),
        }
    }
}

impl std::error::Error for EventParseError {}

#[derive(Debug, Deserialize)]
struct RawInput {
    kind: String,
    #[serde(default)]
    position: Option<i64>,
    #[serde(default)]
    src: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    value: Option<String>,
}

/// Parse one host-encoded event.
pub fn parse_encoded_event(json: &str) -> Result<Option<PageEvent>, EventParseError> {
    let raw: RawInput =
        serde_json::from_str(json).map_err(|e| EventParseError::Json(e.to_string()))?;

    match raw.kind.as_str() {
        "add" => Ok(Some(PageEvent::AddField)),
        "remove" => parse_remove(&raw).map(Some),
        "image_click" => {
            let src = raw.src.ok_or(EventParseError::MissingField("src"))?;
            Ok(Some(PageEvent::ImageClicked { src }))
        }
        "modal_click" => Ok(Some(PageEvent::ModalClicked)),
        "escape" => Ok(Some(PageEvent::EscapePressed)),
        "key" => parse_key(&raw),
        "filter" => {
            let value = raw.value.ok_or(EventParseError::MissingField("value"))?;
            Ok(Some(PageEvent::FilterInput { value }))
        }
        _ => Ok(None),
    }
}

fn parse_remove(raw: &RawInput) -> Result<PageEvent, EventParseError> {
    let position = raw
        .position
        .ok_or(EventParseError::MissingField("position"))?;
    let position =
        usize::try_from(position).map_err(|_| EventParseError::InvalidField("position"))?;
    Ok(PageEvent::RemoveField { position })
}

fn parse_key(raw: &RawInput) -> Result<Option<PageEvent>, EventParseError> {
    let code = raw
        .code
        .as_deref()
        .ok_or(EventParseError::MissingField("code"))?;
    match code {
        "Escape" | "Esc" => Ok(Some(PageEvent::EscapePressed)),
        _ => Ok(None),
    }
}
