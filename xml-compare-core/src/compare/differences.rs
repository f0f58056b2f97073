use crate::compare::graph::ComparisonId;

/// Ordered list of changed comparison nodes with a navigation cursor.
///
/// Entries are in pre-order. The cursor starts before the first entry and
/// never wraps around.
#[derive(Debug, Clone, Default)]
pub struct DifferenceIndex {
    entries: Vec<ComparisonId>,
    cursor: Option<usize>,
}

impl DifferenceIndex {
    pub(crate) fn push(&mut self, id: ComparisonId) {
        self.entries.push(id);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn as_slice(&self) -> &[ComparisonId] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = ComparisonId> + '_ {
        self.entries.iter().copied()
    }

    pub fn contains(&self, id: ComparisonId) -> bool {
        self.entries.contains(&id)
    }

    /// Cursor position, `None` before the first move.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn current(&self) -> Option<ComparisonId> {
        self.cursor.map(|index| self.entries[index])
    }

    /// Advance by one, staying on the last entry at the end.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<ComparisonId> {
        let last = self.entries.len().checked_sub(1)?;
        let index = match self.cursor {
            None => 0,
            Some(index) => (index + 1).min(last),
        };
        self.cursor = Some(index);
        Some(self.entries[index])
    }

    /// Step back by one, staying on the first entry at the start. From
    /// before the first entry this lands on the first one.
    pub fn previous(&mut self) -> Option<ComparisonId> {
        if self.entries.is_empty() {
            return None;
        }
        let index = self.cursor.map_or(0, |index| index.saturating_sub(1));
        self.cursor = Some(index);
        Some(self.entries[index])
    }

    pub fn has_next(&self) -> bool {
        match self.cursor {
            None => !self.entries.is_empty(),
            Some(index) => index + 1 < self.entries.len(),
        }
    }

    pub fn has_previous(&self) -> bool {
        self.cursor.is_some_and(|index| index > 0)
    }

    /// Move the cursor onto `id`. Returns false, leaving the cursor alone,
    /// when `id` is not a difference.
    pub fn select(&mut self, id: ComparisonId) -> bool {
        match self.entries.iter().position(|&entry| entry == id) {
            Some(index) => {
                self.cursor = Some(index);
                true
            }
            None => false,
        }
    }

    pub fn reset(&mut self) {
        self.cursor = None;
    }
}
