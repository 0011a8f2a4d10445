#![forbid(unsafe_code)]

//! Host-mirrored surface and the DOM patch stream.

use serde::{Deserialize, Serialize};
use tform_core::FieldSurface;

/// One DOM mutation the host must apply, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DomPatch {
    /// Append a field row named `name` to the fields container.
    InsertField { name: String },
    /// Detach the field row at `position`.
    RemoveField { position: usize },
    /// Set the `name` attribute of the field at `position`.
    RenameField { position: usize, name: String },
    /// Show the zoom overlay with image `src`.
    ShowModal { src: String },
    /// Remove the zoom overlay.
    HideModal,
    /// Toggle the display of table row `row`.
    SetRowVisible { row: usize, visible: bool },
}

/// Field surface mirroring the host container.
///
/// Keeps the field names the host renders and queues a [`DomPatch`] for
/// every change, so the host never has to diff the DOM itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostSurface {
    names: Vec<String>,
    patches: Vec<DomPatch>,
}

impl HostSurface {
    /// Mirror a container already rendering `names`.
    #[must_use]
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            patches: Vec::new(),
        }
    }

    /// Names as the host currently renders them (after pending patches).
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of patches waiting for the host.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.patches.len()
    }

    /// Queue a non-field patch.
    pub fn push(&mut self, patch: DomPatch) {
        self.patches.push(patch);
    }

    /// Take every queued patch.
    pub fn drain_patches(&mut self) -> Vec<DomPatch> {
        std::mem::take(&mut self.patches)
    }
}

impl FieldSurface for HostSurface {
    fn insert_field(&mut self, name: &str) {
        self.names.push(name.to_owned());
        self.patches.push(DomPatch::InsertField {
            name: name.to_owned(),
        });
    }

    fn remove_field(&mut self, position: usize) {
        if position >= self.names.len() {
            return;
        }
        self.names.remove(position);
        self.patches.push(DomPatch::RemoveField { position });
    }

    fn field_names(&self) -> Vec<String> {
        self.names.clone()
    }

    fn rename_field(&mut self, position: usize, name: &str) {
        let Some(slot) = self.names.get_mut(position) else {
            return;
        };
        name.clone_into(slot);
        self.patches.push(DomPatch::RenameField {
            position,
            name: name.to_owned(),
        });
    }
}
