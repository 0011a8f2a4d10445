#![forbid(unsafe_code)]

//! Page model: every stateful piece of the upload page behind one
//! `dispatch` entry point.
//!
//! The host pushes [`PageEvent`]s (or their JSON encoding), reads back a
//! [`PageOutcome`] per event, and drains [`DomPatch`]es to apply. Each event
//! runs to completion before the next one is accepted.

use core::fmt;

use serde::{Deserialize, Serialize};
use tform_core::{FieldError, FieldGroupConfig, FieldIndexManager, FieldRegistry};
use tform_widgets::{
    ImageModalAction, ImageModalConfig, ImageModalEvent, ImageModalState, RowFilter,
};

use crate::input_parser::{EventParseError, parse_encoded_event};
use crate::surface::{DomPatch, HostSurface};

/// A user interaction delivered by the host.
///
/// Serializes with the same `kind` names [`parse_encoded_event`] reads, so a
/// recorded event can be pushed back through the host interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum PageEvent {
    /// "Add field" button.
    #[serde(rename = "add")]
    AddField,
    /// Remove button of the field row at `position`.
    #[serde(rename = "remove")]
    RemoveField { position: usize },
    /// A page image was clicked.
    #[serde(rename = "image_click")]
    ImageClicked { src: String },
    /// The zoom overlay was clicked.
    #[serde(rename = "modal_click")]
    ModalClicked,
    /// Escape key.
    #[serde(rename = "escape")]
    EscapePressed,
    /// The users filter input changed.
    #[serde(rename = "filter")]
    FilterInput { value: String },
}

/// What a dispatched event did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PageOutcome {
    FieldAdded { index: u32, name: String },
    FieldRemoved { position: usize, index: u32 },
    ModalOpened { src: String },
    ModalClosed,
    ModalExcluded,
    Filtered { visible_rows: usize },
    /// The event was valid but changed nothing.
    Unchanged,
}

/// Errors surfaced by [`PageModel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageError {
    /// The field group rejected the operation.
    Field(FieldError),
    /// The host sent an event that could not be parsed.
    Parse(EventParseError),
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(err) => write!(f, "field operation rejected: {err}"),
            Self::Parse(err) => write!(f, "bad host event: {err}"),
        }
    }
}

impl std::error::Error for PageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Field(err) => Some(err),
            Self::Parse(err) => Some(err),
        }
    }
}

impl From<FieldError> for PageError {
    fn from(err: FieldError) -> Self {
        Self::Field(err)
    }
}

impl From<EventParseError> for PageError {
    fn from(err: EventParseError) -> Self {
        Self::Parse(err)
    }
}

/// Page configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageConfig {
    pub fields: FieldGroupConfig,
    pub modal: ImageModalConfig,
}

impl PageConfig {
    #[must_use]
    pub fn fields(mut self, fields: FieldGroupConfig) -> Self {
        self.fields = fields;
        self
    }

    #[must_use]
    pub fn modal(mut self, modal: ImageModalConfig) -> Self {
        self.modal = modal;
        self
    }
}

/// State of one upload page.
#[derive(Debug, Clone)]
pub struct PageModel {
    fields: FieldIndexManager<HostSurface>,
    modal: ImageModalState,
    modal_config: ImageModalConfig,
    filter: RowFilter,
    rows: Vec<String>,
    row_visible: Vec<bool>,
}

impl PageModel {
    /// Build the model from the field names and table nicknames the host
    /// found in the document.
    pub fn new<I, S>(
        config: PageConfig,
        field_names: I,
        rows: Vec<String>,
    ) -> Result<Self, FieldError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields = FieldIndexManager::initialize(config.fields, HostSurface::new(field_names))?;
        let row_visible = vec![true; rows.len()];
        Ok(Self {
            fields,
            modal: ImageModalState::default(),
            modal_config: config.modal,
            filter: RowFilter::default(),
            rows,
            row_visible,
        })
    }

    /// Field registry.
    #[must_use]
    pub fn registry(&self) -> &FieldRegistry {
        self.fields.registry()
    }

    /// Field names as the host renders them.
    #[must_use]
    pub fn field_names(&self) -> &[String] {
        self.fields.surface().names()
    }

    /// Zoom overlay state.
    #[must_use]
    pub fn modal(&self) -> &ImageModalState {
        &self.modal
    }

    /// Users table filter.
    #[must_use]
    pub fn filter(&self) -> &RowFilter {
        &self.filter
    }

    /// Current visibility of each table row.
    #[must_use]
    pub fn row_visibility(&self) -> &[bool] {
        &self.row_visible
    }

    /// Take every DOM patch queued since the last drain.
    pub fn drain_patches(&mut self) -> Vec<DomPatch> {
        self.fields.surface_mut().drain_patches()
    }

    /// Parse and dispatch one host-encoded event.
    pub fn dispatch_encoded(&mut self, json: &str) -> Result<PageOutcome, PageError> {
        match parse_encoded_event(json)? {
            Some(event) => self.dispatch(event),
            None => Ok(PageOutcome::Unchanged),
        }
    }

    /// Apply one event.
    pub fn dispatch(&mut self, event: PageEvent) -> Result<PageOutcome, PageError> {
        match event {
            PageEvent::AddField => {
                let index = self.fields.add()?;
                let name = self.fields.registry().config().field_name(index);
                Ok(PageOutcome::FieldAdded { index, name })
            }
            PageEvent::RemoveField { position } => {
                let index = self.fields.remove(position)?;
                Ok(PageOutcome::FieldRemoved { position, index })
            }
            PageEvent::ImageClicked { src } => {
                Ok(self.modal_event(&ImageModalEvent::ImageClicked { src }))
            }
            PageEvent::ModalClicked => Ok(self.modal_event(&ImageModalEvent::ModalClicked)),
            PageEvent::EscapePressed => Ok(self.modal_event(&ImageModalEvent::EscapePressed)),
            PageEvent::FilterInput { value } => Ok(self.apply_filter(value)),
        }
    }

    fn modal_event(&mut self, event: &ImageModalEvent) -> PageOutcome {
        let action = self.modal.handle_event(event, &self.modal_config);
        let surface = self.fields.surface_mut();
        match action {
            Some(ImageModalAction::Opened { src }) => {
                surface.push(DomPatch::ShowModal { src: src.clone() });
                PageOutcome::ModalOpened { src }
            }
            Some(ImageModalAction::Closed) => {
                surface.push(DomPatch::HideModal);
                PageOutcome::ModalClosed
            }
            Some(ImageModalAction::Excluded) => PageOutcome::ModalExcluded,
            None => PageOutcome::Unchanged,
        }
    }

    fn apply_filter(&mut self, value: String) -> PageOutcome {
        self.filter.set_query(value);
        let next = self.filter.visibility(&self.rows);
        let surface = self.fields.surface_mut();
        for (row, (&before, &after)) in self.row_visible.iter().zip(&next).enumerate() {
            if before != after {
                surface.push(DomPatch::SetRowVisible {
                    row,
                    visible: after,
                });
            }
        }
        let visible_rows = next.iter().filter(|&&v| v).count();
        self.row_visible = next;
        PageOutcome::Filtered { visible_rows }
    }
}
