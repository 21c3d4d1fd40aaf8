//! Subgraph discovery around a root entity.

use crate::store::EvolutionStore;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// Which entities count as part of a root's evolution tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiscoveryMode {
    /// Everything connected to the root, treating evolutions as undirected.
    #[default]
    Connected,
    /// The root, its descendants, its ancestors, and every descendant of an
    /// ancestor. Other parents of a descendant are not pulled in.
    Lineage,
}

impl DiscoveryMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "connected" => Some(Self::Connected),
            "lineage" => Some(Self::Lineage),
            _ => None,
        }
    }
}

/// Result of one discovery pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Discovery {
    /// Reachable entity ids in discovery order
    pub visited: Vec<String>,
    /// Strict descendants of collapsed entities
    pub hidden: HashSet<String>,
    visited_set: HashSet<String>,
}

impl Discovery {
    pub fn is_empty(&self) -> bool {
        self.visited.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.visited_set.contains(id)
    }

    /// Reachable and not hidden.
    pub fn is_visible(&self, id: &str) -> bool {
        self.contains(id) && !self.hidden.contains(id)
    }

    /// Visible ids in discovery order.
    pub fn visible(&self) -> impl Iterator<Item = &str> {
        self.visited
            .iter()
            .map(String::as_str)
            .filter(|id| !self.hidden.contains(*id))
    }

    /// Indices of evolutions whose endpoints are both visible, in edge-list order.
    pub fn visible_edges(&self, store: &EvolutionStore) -> Vec<usize> {
        (0..store.evolutions().len())
            .filter(|&i| store.is_resolved(i))
            .filter(|&i| {
                let evo = store.evolution(i);
                self.is_visible(&evo.from) && self.is_visible(&evo.to)
            })
            .collect()
    }
}

/// Discover the subgraph around `root`, hiding descendants of `collapsed`.
///
/// An unknown root yields an empty result.
pub fn discover(
    store: &EvolutionStore,
    root: &str,
    collapsed: &HashSet<String>,
    mode: DiscoveryMode,
) -> Discovery {
    if !store.contains(root) {
        log::warn!("Root {} not found, nothing to discover", root);
        return Discovery::default();
    }

    let visited = match mode {
        DiscoveryMode::Connected => connected(store, root),
        DiscoveryMode::Lineage => lineage(store, root),
    };

    let mut hidden = HashSet::new();
    for id in collapsed {
        hidden.extend(strict_descendants(store, id).into_iter().map(str::to_string));
    }

    let visited_set: HashSet<String> = visited.iter().cloned().collect();
    log::debug!(
        "Discovered {} entities from {} ({} hidden)",
        visited.len(),
        root,
        hidden.iter().filter(|id| visited_set.contains(*id)).count()
    );

    Discovery {
        visited,
        hidden,
        visited_set,
    }
}

fn connected<'a>(store: &'a EvolutionStore, root: &'a str) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut order = Vec::new();
    let mut queue = VecDeque::from([root]);
    seen.insert(root);

    while let Some(current) = queue.pop_front() {
        order.push(current.to_string());
        let forward = store
            .edges_from(current)
            .iter()
            .map(|&i| store.evolution(i).to.as_str());
        let backward = store
            .edges_to(current)
            .iter()
            .map(|&i| store.evolution(i).from.as_str());
        for next in forward.chain(backward) {
            if seen.insert(next) {
                queue.push_back(next);
            }
        }
    }

    order
}

fn lineage<'a>(store: &'a EvolutionStore, root: &'a str) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut order: Vec<String> = Vec::new();
    seen.insert(root);
    order.push(root.to_string());

    walk_descendants(store, root, &mut seen, &mut order);

    let mut ancestors = VecDeque::from([root]);
    while let Some(current) = ancestors.pop_front() {
        for &i in store.edges_to(current) {
            let parent = store.evolution(i).from.as_str();
            if !seen.insert(parent) {
                continue;
            }
            order.push(parent.to_string());
            ancestors.push_back(parent);
            walk_descendants(store, parent, &mut seen, &mut order);
        }
    }

    order
}

fn walk_descendants<'a>(
    store: &'a EvolutionStore,
    start: &'a str,
    seen: &mut HashSet<&'a str>,
    order: &mut Vec<String>,
) {
    let mut queue = VecDeque::from([start]);
    while let Some(current) = queue.pop_front() {
        for &i in store.edges_from(current) {
            let child = store.evolution(i).to.as_str();
            if seen.insert(child) {
                order.push(child.to_string());
                queue.push_back(child);
            }
        }
    }
}

/// Every entity reachable from `id` along outgoing evolutions, excluding `id`.
pub fn strict_descendants<'a>(store: &'a EvolutionStore, id: &str) -> HashSet<&'a str> {
    let mut found: HashSet<&str> = HashSet::new();
    let mut stack: Vec<&str> = store
        .edges_from(id)
        .iter()
        .map(|&i| store.evolution(i).to.as_str())
        .collect();

    while let Some(current) = stack.pop() {
        if !found.insert(current) {
            continue;
        }
        stack.extend(
            store
                .edges_from(current)
                .iter()
                .map(|&i| store.evolution(i).to.as_str()),
        );
    }

    found.remove(id);
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Stage;
    use crate::store::tests::store;

    fn collapsed(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn sorted(d: &Discovery) -> Vec<&str> {
        let mut v: Vec<&str> = d.visible().collect();
        v.sort();
        v
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!(DiscoveryMode::from_str("lineage"), Some(DiscoveryMode::Lineage));
        assert_eq!(DiscoveryMode::from_str("connected"), Some(DiscoveryMode::Connected));
        assert_eq!(DiscoveryMode::from_str("tree"), None);
    }

    #[test]
    fn test_bidirectional_reachability() {
        let s = store(
            &[("a", Stage::Rookie), ("b", Stage::Champion), ("c", Stage::Ultimate), ("d", Stage::Champion)],
            &[("a", "b"), ("b", "c"), ("a", "d")],
        );
        let d = discover(&s, "b", &HashSet::new(), DiscoveryMode::Connected);
        assert_eq!(sorted(&d), vec!["a", "b", "c", "d"]);
        assert_eq!(d.visited[0], "b");
    }

    #[test]
    fn test_cycle_terminates() {
        let s = store(&[("x", Stage::Rookie), ("y", Stage::Champion)], &[("x", "y"), ("y", "x")]);
        let d = discover(&s, "x", &HashSet::new(), DiscoveryMode::Connected);
        assert_eq!(d.visited, vec!["x", "y"]);

        let d = discover(&s, "x", &collapsed(&["x"]), DiscoveryMode::Connected);
        assert_eq!(d.visible().collect::<Vec<_>>(), vec!["x"]);
    }

    #[test]
    fn test_collapse_hides_descendants_only() {
        let s = store(
            &[
                ("p", Stage::Rookie),
                ("q", Stage::Champion),
                ("r", Stage::Champion),
                ("s", Stage::Ultimate),
                ("o", Stage::Rookie),
                ("t", Stage::Champion),
                ("root", Stage::InTraining),
            ],
            &[("root", "p"), ("root", "o"), ("p", "q"), ("p", "r"), ("q", "s"), ("o", "t")],
        );
        let d = discover(&s, "root", &collapsed(&["p"]), DiscoveryMode::Connected);
        assert_eq!(sorted(&d), vec!["o", "p", "root", "t"]);
        for id in ["q", "r", "s"] {
            assert!(d.hidden.contains(id));
        }

        let edges: Vec<(&str, &str)> = d
            .visible_edges(&s)
            .into_iter()
            .map(|i| (s.evolution(i).from.as_str(), s.evolution(i).to.as_str()))
            .collect();
        assert_eq!(edges, vec![("root", "p"), ("root", "o"), ("o", "t")]);
    }

    #[test]
    fn test_unknown_root_is_empty() {
        let s = store(&[("a", Stage::Rookie)], &[]);
        let d = discover(&s, "nobody", &HashSet::new(), DiscoveryMode::Connected);
        assert!(d.is_empty());
        assert!(d.visible_edges(&s).is_empty());
    }

    #[test]
    fn test_dangling_edges_ignored() {
        let s = store(&[("a", Stage::Rookie)], &[("a", "ghost"), ("ghost", "a")]);
        let d = discover(&s, "a", &HashSet::new(), DiscoveryMode::Connected);
        assert_eq!(d.visited, vec!["a"]);
    }

    #[test]
    fn test_lineage_skips_foreign_parents() {
        // a -> b -> c, z -> c: from a, z is another parent of a descendant
        let s = store(
            &[("a", Stage::Rookie), ("b", Stage::Champion), ("c", Stage::Ultimate), ("z", Stage::Champion)],
            &[("a", "b"), ("b", "c"), ("z", "c")],
        );
        let d = discover(&s, "a", &HashSet::new(), DiscoveryMode::Lineage);
        assert_eq!(sorted(&d), vec!["a", "b", "c"]);

        let d = discover(&s, "a", &HashSet::new(), DiscoveryMode::Connected);
        assert_eq!(sorted(&d), vec!["a", "b", "c", "z"]);
    }

    #[test]
    fn test_lineage_includes_siblings_of_ancestors() {
        let s = store(
            &[("egg", Stage::InTraining), ("a", Stage::Rookie), ("b", Stage::Rookie), ("b2", Stage::Champion)],
            &[("egg", "a"), ("egg", "b"), ("b", "b2")],
        );
        let d = discover(&s, "a", &HashSet::new(), DiscoveryMode::Lineage);
        assert_eq!(sorted(&d), vec!["a", "b", "b2", "egg"]);
    }
}
