//! Recently used stroke colors, most recent first.

#[cfg(test)]
#[path = "color_test.rs"]
mod color_test;

/// Bounded most-recent-first color list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorHistory {
    entries: Vec<String>,
    limit: usize,
}

impl ColorHistory {
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self { entries: Vec::new(), limit: limit.max(1) }
    }

    /// Record `color` as most recent.
    ///
    /// Rejected (returns `false`) when it already is the most recent entry.
    /// An older occurrence moves to the front instead of duplicating.
    pub fn push(&mut self, color: &str) -> bool {
        if self.entries.first().is_some_and(|c| c.eq_ignore_ascii_case(color)) {
            return false;
        }
        self.entries.retain(|c| !c.eq_ignore_ascii_case(color));
        self.entries.insert(0, color.to_owned());
        self.entries.truncate(self.limit);
        true
    }

    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    #[must_use]
    pub fn most_recent(&self) -> Option<&str> {
        self.entries.first().map(String::as_str)
    }
}
