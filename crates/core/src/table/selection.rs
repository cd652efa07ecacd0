//! Row selection keyed by record id.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::types::RecordId;

/// Header checkbox state of the visible page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageSelection {
    None,
    Partial,
    All,
}

/// Selected record ids. Membership is set-like, so selecting twice is a
/// no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SelectionSet(BTreeSet<RecordId>);

impl SelectionSet {
    pub fn contains(&self, id: RecordId) -> bool {
        self.0.contains(&id)
    }

    /// Returns `true` if the id was not selected before.
    pub fn insert(&mut self, id: RecordId) -> bool {
        self.0.insert(id)
    }

    /// Returns `true` if the id was selected before.
    pub fn remove(&mut self, id: RecordId) -> bool {
        self.0.remove(&id)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = RecordId> + '_ {
        self.0.iter().copied()
    }

    /// Drop every id for which `keep` is false.
    pub fn retain(&mut self, mut keep: impl FnMut(RecordId) -> bool) {
        self.0.retain(|id| keep(*id));
    }

    /// Selection state over one page of ids.
    pub fn page_state(&self, page_ids: &[RecordId]) -> PageSelection {
        let selected = page_ids.iter().filter(|id| self.contains(**id)).count();
        match selected {
            0 => PageSelection::None,
            n if n == page_ids.len() => PageSelection::All,
            _ => PageSelection::Partial,
        }
    }
}

impl FromIterator<RecordId> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = RecordId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_is_idempotent() {
        let mut set = SelectionSet::default();
        assert!(set.insert(4));
        assert!(!set.insert(4));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn page_state() {
        let set: SelectionSet = [1, 2].into_iter().collect();
        assert_eq!(set.page_state(&[1, 2]), PageSelection::All);
        assert_eq!(set.page_state(&[1, 2, 3]), PageSelection::Partial);
        assert_eq!(set.page_state(&[7, 8]), PageSelection::None);
        assert_eq!(set.page_state(&[]), PageSelection::None);
    }
}
