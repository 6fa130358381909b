//! The comparison selection set.

use serde::Serialize;

use crate::models::Indicator;

/// Indicator IDs chosen for comparison, in the order they were selected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SelectionSet {
    ids: Vec<i64>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from IDs, dropping duplicates but keeping first-seen order.
    pub fn from_ids(ids: impl IntoIterator<Item = i64>) -> Self {
        let mut set = Self::new();
        for id in ids {
            if !set.contains(id) {
                set.ids.push(id);
            }
        }
        set
    }

    /// Add `id` if absent, remove it if present. Returns whether it is now selected.
    pub fn toggle(&mut self, id: i64) -> bool {
        if let Some(pos) = self.ids.iter().position(|&i| i == id) {
            self.ids.remove(pos);
            false
        } else {
            self.ids.push(id);
            true
        }
    }

    pub fn remove(&mut self, id: i64) {
        self.ids.retain(|&i| i != id);
    }

    pub fn contains(&self, id: i64) -> bool {
        self.ids.contains(&id)
    }

    pub fn ids(&self) -> &[i64] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Drop IDs that do not resolve to an indicator in `active`.
    pub fn retain_known(&mut self, active: &[Indicator]) {
        self.ids.retain(|id| active.iter().any(|i| i.id == *id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fallback_indicators;

    #[test]
    fn toggle_twice_restores() {
        let mut s = SelectionSet::from_ids([47]);
        let before = s.clone();
        assert!(s.toggle(89));
        assert!(!s.toggle(89));
        assert_eq!(s, before);

        for _ in 0..4 {
            s.toggle(47);
        }
        assert_eq!(s, before);
    }

    #[test]
    fn keeps_selection_order() {
        let mut s = SelectionSet::new();
        s.toggle(89);
        s.toggle(12);
        s.toggle(47);
        s.toggle(12);
        assert_eq!(s.ids(), &[89, 47]);
    }

    #[test]
    fn from_ids_dedupes() {
        let s = SelectionSet::from_ids([12, 47, 12]);
        assert_eq!(s.ids(), &[12, 47]);
    }

    #[test]
    fn retain_known_drops_unresolvable() {
        let mut s = SelectionSet::from_ids([47, 999, 34]);
        s.retain_known(&fallback_indicators());
        assert_eq!(s.ids(), &[47, 34]);
    }
}
