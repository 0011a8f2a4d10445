#![forbid(unsafe_code)]

//! Field group configuration.

/// Name prefix used by the flight upload form.
pub const DEFAULT_FIELD_PREFIX: &str = "track_image_";

/// Configuration for one repeatable field group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldGroupConfig {
    /// Prefix preceding the numeric index in every field name.
    pub prefix: String,
}

impl Default for FieldGroupConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_FIELD_PREFIX.to_owned(),
        }
    }
}

impl FieldGroupConfig {
    /// Create a config with the default `track_image_` prefix.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Format the exposed name for `index`.
    #[must_use]
    pub fn field_name(&self, index: u32) -> String {
        crate::name::format_field_name(&self.prefix, index)
    }
}
