#![forbid(unsafe_code)]

//! Live prefix filter for the users table.
//!
//! A row stays visible iff its nickname, lowercased, starts with the
//! lowercased query. The query is used as typed (no trimming), so a leading
//! space hides every row whose nickname does not start with one. An empty
//! query shows everything.

/// Case-insensitive nickname prefix filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowFilter {
    query: String,
    query_lower: String,
}

impl RowFilter {
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        let mut filter = Self::default();
        filter.set_query(query);
        filter
    }

    /// Query as typed.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Whether the filter shows every row.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.query.is_empty()
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.query_lower = self.query.to_lowercase();
    }

    /// Whether a row with this nickname is visible.
    #[must_use]
    pub fn matches(&self, nickname: &str) -> bool {
        self.query_lower.is_empty() || nickname.to_lowercase().starts_with(&self.query_lower)
    }

    /// Visibility flag for each row, in row order.
    #[must_use]
    pub fn visibility<S: AsRef<str>>(&self, rows: &[S]) -> Vec<bool> {
        let flags: Vec<bool> = rows.iter().map(|row| self.matches(row.as_ref())).collect();
        tracing::debug!(
            message = "filter.apply",
            total_rows = rows.len(),
            visible_rows = flags.iter().filter(|&&v| v).count(),
            query_len = self.query.len()
        );
        flags
    }

    /// Indices of the visible rows.
    #[must_use]
    pub fn visible_indices<S: AsRef<str>>(&self, rows: &[S]) -> Vec<usize> {
        rows.iter()
            .enumerate()
            .filter_map(|(idx, row)| self.matches(row.as_ref()).then_some(idx))
            .collect()
    }
}
