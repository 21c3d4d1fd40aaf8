//! Port assignment for edges sharing a node.

use crate::store::EvolutionStore;
use std::collections::HashMap;

/// Offset of port `index` out of `count`, spread evenly across `spread`
/// and centered on the anchor.
#[inline]
pub fn port_offset(index: usize, count: usize, spread: f64) -> f64 {
    if count <= 1 {
        0.0
    } else {
        (index as f64 / (count - 1) as f64 - 0.5) * spread
    }
}

/// Source and target port offsets for each edge, in the order given.
///
/// Indices follow edge order, so offsets on a node increase with the
/// position of the edge in the evolution list.
pub fn assign_ports(store: &EvolutionStore, edges: &[usize], spread: f64) -> Vec<(f64, f64)> {
    let mut from_count: HashMap<&str, usize> = HashMap::new();
    let mut to_count: HashMap<&str, usize> = HashMap::new();
    for &idx in edges {
        let evo = store.evolution(idx);
        *from_count.entry(evo.from.as_str()).or_insert(0) += 1;
        *to_count.entry(evo.to.as_str()).or_insert(0) += 1;
    }

    let mut from_index: HashMap<&str, usize> = HashMap::new();
    let mut to_index: HashMap<&str, usize> = HashMap::new();

    edges
        .iter()
        .map(|&idx| {
            let evo = store.evolution(idx);
            let fi = from_index.entry(evo.from.as_str()).or_insert(0);
            let from_offset = port_offset(*fi, from_count[evo.from.as_str()], spread);
            *fi += 1;
            let ti = to_index.entry(evo.to.as_str()).or_insert(0);
            let to_offset = port_offset(*ti, to_count[evo.to.as_str()], spread);
            *ti += 1;
            (from_offset, to_offset)
        })
        .collect()
}
