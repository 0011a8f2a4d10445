#![forbid(unsafe_code)]

//! Rendering surface seam.

/// The part of the page that actually holds the field rows.
///
/// The surface creates and destroys rows when the manager asks, reports the
/// names it currently renders, and never touches the registry itself.
/// Positions are 0-based document order.
pub trait FieldSurface {
    /// Append a field row with the given name.
    fn insert_field(&mut self, name: &str);

    /// Detach the field row at `position`.
    fn remove_field(&mut self, position: usize);

    /// Names of every rendered field, in document order.
    fn field_names(&self) -> Vec<String>;

    /// Set the exposed name of the field at `position`.
    fn rename_field(&mut self, position: usize, name: &str);
}

impl<S: FieldSurface + ?Sized> FieldSurface for &mut S {
    fn insert_field(&mut self, name: &str) {
        (**self).insert_field(name);
    }

    fn remove_field(&mut self, position: usize) {
        (**self).remove_field(position);
    }

    fn field_names(&self) -> Vec<String> {
        (**self).field_names()
    }

    fn rename_field(&mut self, position: usize, name: &str) {
        (**self).rename_field(position, name);
    }
}

/// In-memory surface holding only field names.
///
/// Out-of-range positions are ignored, matching a DOM query that finds no
/// element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySurface {
    names: Vec<String>,
}

impl MemorySurface {
    /// Create an empty surface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a surface already rendering `names`.
    #[must_use]
    pub fn with_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Borrow the rendered names.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

impl FieldSurface for MemorySurface {
    fn insert_field(&mut self, name: &str) {
        self.names.push(name.to_owned());
    }

    fn remove_field(&mut self, position: usize) {
        if position < self.names.len() {
            self.names.remove(position);
        }
    }

    fn field_names(&self) -> Vec<String> {
        self.names.clone()
    }

    fn rename_field(&mut self, position: usize, name: &str) {
        if let Some(slot) = self.names.get_mut(position) {
            name.clone_into(slot);
        }
    }
}
