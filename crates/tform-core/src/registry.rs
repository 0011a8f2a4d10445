#![forbid(unsafe_code)]

//! Field registry.
//!
//! The registry is the ordered list of indices backing a repeatable field
//! group, one entry per rendered field, in document order. It never talks to
//! a surface; [`FieldIndexManager`](crate::FieldIndexManager) does that.
//!
//! # Invariants
//!
//! - Indices are unique.
//! - Removing an entry never rewrites the others. Exposed names are derived
//!   from the stored values, so an index issued once stays attached to its
//!   field for as long as the field exists.
//! - A failed operation leaves the registry untouched.

use std::collections::BTreeSet;

use crate::config::FieldGroupConfig;
use crate::error::FieldError;
use crate::name::parse_field_index;

/// Ordered, duplicate-free list of field indices.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldRegistry {
    config: FieldGroupConfig,
    indices: Vec<u32>,
}

impl FieldRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new(config: FieldGroupConfig) -> Self {
        Self {
            config,
            indices: Vec::new(),
        }
    }

    /// Build a registry from the names of the fields already rendered, in
    /// document order.
    ///
    /// Fails on the first malformed name or repeated index.
    pub fn from_names<I, S>(config: FieldGroupConfig, names: I) -> Result<Self, FieldError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = BTreeSet::new();
        let mut indices = Vec::new();
        for name in names {
            let name = name.as_ref();
            let index = parse_field_index(&config.prefix, name).inspect_err(|err| {
                tracing::warn!(message = "fields.init.rejected", %err);
            })?;
            if !seen.insert(index) {
                tracing::warn!(message = "fields.init.rejected", index, reason = "duplicate index");
                return Err(FieldError::DuplicateIndex { index });
            }
            indices.push(index);
        }
        tracing::debug!(message = "fields.init", count = indices.len());
        Ok(Self { config, indices })
    }

    /// Group configuration.
    #[must_use]
    pub fn config(&self) -> &FieldGroupConfig {
        &self.config
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether no field is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Indices in document order.
    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Index stored at `position`.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<u32> {
        self.indices.get(position).copied()
    }

    /// Whether `index` is currently in use.
    #[must_use]
    pub fn contains(&self, index: u32) -> bool {
        self.indices.contains(&index)
    }

    /// Document position of the field holding `index`.
    #[must_use]
    pub fn position_of(&self, index: u32) -> Option<usize> {
        self.indices.iter().position(|&i| i == index)
    }

    /// Exposed name of the field at `position`.
    #[must_use]
    pub fn name_at(&self, position: usize) -> Option<String> {
        self.get(position).map(|index| self.config.field_name(index))
    }

    /// Exposed names for every field, in document order.
    ///
    /// `names()[i]` is always `<prefix><indices()[i]>`.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.indices
            .iter()
            .map(|&index| self.config.field_name(index))
            .collect()
    }

    /// The index the next [`add`](Self::add) would return.
    pub fn peek_next(&self) -> Result<u32, FieldError> {
        let Some(&last) = self.indices.last() else {
            return Ok(0);
        };
        if let Some(next) = last.checked_add(1)
            && !self.contains(next)
        {
            return Ok(next);
        }
        // Document order was not increasing; step past the maximum instead.
        self.indices
            .iter()
            .copied()
            .max()
            .and_then(|max| max.checked_add(1))
            .ok_or(FieldError::IndexExhausted)
    }

    /// Append a new field and return its index.
    ///
    /// The index is one past the last registered value, or `0` for an empty
    /// registry.
    pub fn add(&mut self) -> Result<u32, FieldError> {
        let next = self.peek_next().inspect_err(|err| {
            tracing::warn!(message = "fields.add.rejected", %err);
        })?;
        self.indices.push(next);
        tracing::debug!(message = "fields.add", index = next, len = self.indices.len());
        Ok(next)
    }

    /// Remove the field at `position` and return its index.
    pub fn remove(&mut self, position: usize) -> Result<u32, FieldError> {
        self.check_position(position)?;
        let index = self.indices.remove(position);
        tracing::debug!(
            message = "fields.remove",
            position,
            index,
            len = self.indices.len()
        );
        Ok(index)
    }

    /// Undo a [`remove`](Self::remove) of `index` at `position`.
    pub(crate) fn restore(&mut self, position: usize, index: u32) {
        self.indices.insert(position, index);
        tracing::debug!(message = "fields.remove.restored", position, index);
    }

    pub(crate) fn check_position(&self, position: usize) -> Result<(), FieldError> {
        if position < self.indices.len() {
            return Ok(());
        }
        let err = FieldError::IndexOutOfRange {
            position,
            len: self.indices.len(),
        };
        tracing::warn!(message = "fields.remove.rejected", %err);
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn registry(names: &[&str]) -> FieldRegistry {
        FieldRegistry::from_names(FieldGroupConfig::default(), names).unwrap()
    }

    #[test]
    fn initialize_in_document_order() {
        let reg = registry(&["track_image_3", "track_image_0", "track_image_7"]);
        assert_eq!(reg.indices(), &[3, 0, 7]);
        assert_eq!(reg.len(), 3);
    }

    #[test]
    fn initialize_rejects_malformed_name() {
        let err = FieldRegistry::from_names(
            FieldGroupConfig::default(),
            ["track_image_0", "track_image_x"],
        )
        .unwrap_err();
        assert_eq!(
            err,
            FieldError::Parse {
                name: "track_image_x".into()
            }
        );
    }

    #[test]
    fn initialize_rejects_duplicates() {
        let err = FieldRegistry::from_names(
            FieldGroupConfig::default(),
            ["track_image_1", "track_image_1"],
        )
        .unwrap_err();
        assert_eq!(err, FieldError::DuplicateIndex { index: 1 });
    }

    #[test]
    fn add_from_empty_counts_up() {
        let mut reg = FieldRegistry::default();
        assert_eq!(reg.add(), Ok(0));
        assert_eq!(reg.add(), Ok(1));
        assert_eq!(reg.add(), Ok(2));
    }

    #[test]
    fn add_follows_last_value() {
        let mut reg = registry(&["track_image_5"]);
        assert_eq!(reg.add(), Ok(6));
    }

    #[test]
    fn add_skips_past_max_on_collision() {
        let mut reg = registry(&["track_image_1", "track_image_2", "track_image_0"]);
        assert_eq!(reg.peek_next(), Ok(3));
        assert_eq!(reg.add(), Ok(3));
        assert_eq!(reg.indices(), &[1, 2, 0, 3]);
    }

    #[test]
    fn add_exhausted_at_u32_max() {
        let mut reg = registry(&["track_image_4294967295"]);
        assert_eq!(reg.add(), Err(FieldError::IndexExhausted));
        assert_eq!(reg.indices(), &[u32::MAX]);
    }

    #[test]
    fn add_ignores_max_value_elsewhere() {
        let mut reg = registry(&["track_image_9", "track_image_4294967295", "track_image_3"]);
        assert_eq!(reg.add(), Ok(4));
    }

    #[test]
    fn remove_keeps_stable_values() {
        let mut reg = registry(&["track_image_0", "track_image_1", "track_image_2"]);
        assert_eq!(reg.remove(1), Ok(1));
        assert_eq!(reg.indices(), &[0, 2]);
        assert_eq!(reg.names(), vec!["track_image_0", "track_image_2"]);
    }

    #[test]
    fn remove_out_of_range_is_rejected() {
        let mut reg = registry(&["track_image_0"]);
        assert_eq!(
            reg.remove(1),
            Err(FieldError::IndexOutOfRange {
                position: 1,
                len: 1
            })
        );
        assert_eq!(reg.indices(), &[0]);
    }

    #[test]
    fn remove_last_then_add_reuses_next_value() {
        let mut reg = registry(&["track_image_0", "track_image_1", "track_image_2"]);
        reg.remove(2).unwrap();
        assert_eq!(reg.add(), Ok(2));
    }

    #[test]
    fn lookups() {
        let reg = registry(&["track_image_4", "track_image_9"]);
        assert_eq!(reg.get(1), Some(9));
        assert_eq!(reg.get(2), None);
        assert!(reg.contains(4));
        assert!(!reg.contains(5));
        assert_eq!(reg.position_of(9), Some(1));
        assert_eq!(reg.name_at(0).as_deref(), Some("track_image_4"));
        assert_eq!(reg.name_at(5), None);
    }

    #[test]
    fn custom_prefix_names() {
        let config = FieldGroupConfig::new().with_prefix("photo_");
        let mut reg = FieldRegistry::from_names(config, ["photo_2"]).unwrap();
        reg.add().unwrap();
        assert_eq!(reg.names(), vec!["photo_2", "photo_3"]);
    }
}
