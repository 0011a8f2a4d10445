#![forbid(unsafe_code)]

//! Field index manager.
//!
//! Couples a [`FieldRegistry`] with the [`FieldSurface`] that renders it.
//! The manager is the only writer of the registry; the surface only
//! creates, destroys and renames rows on request.
//!
//! Failure modes:
//! - bounds and sync checks run before anything is mutated, so a rejected
//!   `add` or `remove` leaves both registry and surface as they were;
//! - if the surface does not drop the row it was asked to remove, the
//!   registry entry is restored and `remove` fails;
//! - `renumber` refuses to rename anything when the surface and registry
//!   disagree on the field count.

use crate::config::FieldGroupConfig;
use crate::error::FieldError;
use crate::registry::FieldRegistry;
use crate::surface::FieldSurface;

/// Owns the registry of one field group and keeps its surface in step.
#[derive(Debug, Clone)]
pub struct FieldIndexManager<S> {
    registry: FieldRegistry,
    surface: S,
}

impl<S: FieldSurface> FieldIndexManager<S> {
    /// Scan the fields already rendered on `surface` and build the registry.
    pub fn initialize(config: FieldGroupConfig, surface: S) -> Result<Self, FieldError> {
        let registry = FieldRegistry::from_names(config, surface.field_names())?;
        Ok(Self { registry, surface })
    }

    /// Current registry.
    #[must_use]
    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    /// Borrow the surface.
    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutably borrow the surface.
    ///
    /// Rows added or removed through this handle bypass the registry; the
    /// next `add`, `remove`, or `renumber` reports the mismatch.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Split into registry and surface.
    pub fn into_parts(self) -> (FieldRegistry, S) {
        (self.registry, self.surface)
    }

    /// Register a new field, render it, and return its index.
    pub fn add(&mut self) -> Result<u32, FieldError> {
        self.check_rendered(self.registry.len())?;
        let index = self.registry.add()?;
        let name = self.registry.config().field_name(index);
        self.surface.insert_field(&name);
        Ok(index)
    }

    /// Remove the field at `position` from registry and surface, then
    /// renumber the rest. Returns the removed index.
    pub fn remove(&mut self, position: usize) -> Result<u32, FieldError> {
        self.registry.check_position(position)?;
        self.check_rendered(self.registry.len())?;
        let index = self.registry.remove(position)?;
        self.surface.remove_field(position);
        if let Err(err) = self.check_rendered(self.registry.len()) {
            // The surface did not drop exactly one row; put the entry back.
            self.registry.restore(position, index);
            return Err(err);
        }
        self.renumber()?;
        Ok(index)
    }

    /// Record that the surface already detached the row at `position`
    /// (its own remove button fired), then renumber. Returns the removed
    /// index.
    pub fn field_detached(&mut self, position: usize) -> Result<u32, FieldError> {
        self.registry.check_position(position)?;
        self.check_rendered(self.registry.len() - 1)?;
        let index = self.registry.remove(position)?;
        self.renumber()?;
        Ok(index)
    }

    /// Re-assign every rendered field's name from the registry.
    ///
    /// The field at position `i` is named `<prefix><registry[i]>`. Stored
    /// values are not compacted. Returns how many fields were renamed, so a
    /// second consecutive call returns `0`.
    pub fn renumber(&mut self) -> Result<usize, FieldError> {
        self.check_rendered(self.registry.len())?;
        let rendered = self.surface.field_names();
        let mut renamed = 0;
        for (position, (current, expected)) in
            rendered.iter().zip(self.registry.names()).enumerate()
        {
            if *current != expected {
                self.surface.rename_field(position, &expected);
                renamed += 1;
            }
        }
        tracing::debug!(
            message = "fields.renumber",
            len = self.registry.len(),
            renamed
        );
        Ok(renamed)
    }

    fn check_rendered(&self, expected: usize) -> Result<(), FieldError> {
        let rendered = self.surface.field_names().len();
        if rendered == expected {
            return Ok(());
        }
        let err = FieldError::SurfaceOutOfSync {
            registry: expected,
            rendered,
        };
        tracing::warn!(message = "fields.sync.rejected", %err);
        Err(err)
    }
}
