//! Per-entity collapse/expand state.

use crate::store::EvolutionStore;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// What happens to collapsed entities when the root changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RootChangePolicy {
    /// Start every root with everything expanded.
    #[default]
    Reset,
    /// Carry the collapsed set over to the new root.
    Preserve,
}

/// Set of collapsed entity ids. Entities not in the set are expanded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollapseState {
    collapsed: HashSet<String>,
}

impl CollapseState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_collapsed(&self, id: &str) -> bool {
        self.collapsed.contains(id)
    }

    pub fn collapsed(&self) -> &HashSet<String> {
        &self.collapsed
    }

    pub fn is_empty(&self) -> bool {
        self.collapsed.is_empty()
    }

    /// Flip `id` between collapsed and expanded. Returns the new collapsed flag.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.collapsed.remove(id) {
            false
        } else {
            self.collapsed.insert(id.to_string());
            true
        }
    }

    /// Expand every direct child of `parent` that is currently collapsed.
    /// Returns how many children changed state.
    pub fn expand_children_of(&mut self, store: &EvolutionStore, parent: &str) -> usize {
        store
            .children(parent)
            .into_iter()
            .filter(|child| self.collapsed.remove(*child))
            .count()
    }

    pub fn clear(&mut self) {
        self.collapsed.clear();
    }

    /// Apply `policy` for a root change.
    pub fn on_root_change(&mut self, policy: RootChangePolicy) {
        if policy == RootChangePolicy::Reset {
            self.clear();
        }
    }

    /// For each expanded parent, how many of its direct children are collapsed.
    pub fn collapsed_child_counts(&self, store: &EvolutionStore) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for evo in store.evolutions() {
            if self.is_collapsed(&evo.to) && !self.is_collapsed(&evo.from) {
                *counts.entry(evo.from.clone()).or_insert(0) += 1;
            }
        }
        counts
    }
}

impl FromIterator<String> for CollapseState {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self {
            collapsed: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Stage;
    use crate::store::tests::store;

    fn sample() -> EvolutionStore {
        store(
            &[
                ("agumon", Stage::Rookie),
                ("greymon", Stage::Champion),
                ("meramon", Stage::Champion),
                ("metalgreymon", Stage::Ultimate),
            ],
            &[("agumon", "greymon"), ("agumon", "meramon"), ("greymon", "metalgreymon")],
        )
    }

    #[test]
    fn test_toggle() {
        let mut state = CollapseState::new();
        assert!(state.toggle("agumon"));
        assert!(state.is_collapsed("agumon"));
        assert!(!state.toggle("agumon"));
        assert!(state.is_empty());
    }

    #[test]
    fn test_expand_children_of() {
        let s = sample();
        let mut state: CollapseState = ["greymon", "meramon", "metalgreymon"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(state.expand_children_of(&s, "agumon"), 2);
        assert!(!state.is_collapsed("greymon"));
        assert!(!state.is_collapsed("meramon"));
        assert!(state.is_collapsed("metalgreymon"));
        assert_eq!(state.expand_children_of(&s, "agumon"), 0);
    }

    #[test]
    fn test_root_change_policy() {
        let mut state = CollapseState::new();
        state.toggle("greymon");
        state.on_root_change(RootChangePolicy::Preserve);
        assert!(state.is_collapsed("greymon"));
        state.on_root_change(RootChangePolicy::Reset);
        assert!(state.is_empty());
    }

    #[test]
    fn test_collapsed_child_counts() {
        let s = sample();
        let mut state = CollapseState::new();
        state.toggle("greymon");
        state.toggle("meramon");
        let counts = state.collapsed_child_counts(&s);
        assert_eq!(counts.get("agumon"), Some(&2));
        assert_eq!(counts.get("greymon"), None);

        state.toggle("agumon");
        assert!(state.collapsed_child_counts(&s).is_empty());
    }
}
