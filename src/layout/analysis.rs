//! Stage bucketing and parent lookups for layout computation.

use crate::discovery::Discovery;
use crate::model::Stage;
use crate::store::EvolutionStore;
use std::collections::{BTreeMap, HashMap};

/// Visible entities bucketed into compacted stage columns.
pub struct StageColumns<'a> {
    /// Column index -> stage
    pub stages: Vec<Stage>,
    /// Column index -> ids in discovery order
    pub columns: Vec<Vec<&'a str>>,
    /// Entity id -> column index
    pub column_of: HashMap<&'a str, usize>,
}

/// Bucket visible ids by stage. Stages sort ascending and absent stages
/// produce no column.
pub fn group_by_stage<'a>(
    store: &EvolutionStore,
    discovery: &'a Discovery,
) -> StageColumns<'a> {
    let mut buckets: BTreeMap<Stage, Vec<&'a str>> = BTreeMap::new();
    for id in discovery.visible() {
        if let Some(entity) = store.get(id) {
            buckets.entry(entity.stage).or_default().push(id);
        }
    }

    let mut stages = Vec::with_capacity(buckets.len());
    let mut columns = Vec::with_capacity(buckets.len());
    let mut column_of = HashMap::new();
    for (column, (stage, ids)) in buckets.into_iter().enumerate() {
        for id in &ids {
            column_of.insert(*id, column);
        }
        stages.push(stage);
        columns.push(ids);
    }

    StageColumns {
        stages,
        columns,
        column_of,
    }
}

/// First parent of `id`, in edge-list order, that sits in an earlier column.
///
/// Convergent evolutions keep only this parent for placement; it is an
/// order-dependent tie-break, not a true layered crossing minimizer.
pub fn anchor_parent<'a>(
    store: &'a EvolutionStore,
    id: &str,
    column_of: &HashMap<&str, usize>,
) -> Option<&'a str> {
    let column = *column_of.get(id)?;
    store
        .edges_to(id)
        .iter()
        .map(|&i| store.evolution(i).from.as_str())
        .find(|parent| column_of.get(parent).is_some_and(|&c| c < column))
}

/// Visible direct children of `parent`, deduplicated, in edge-list order.
pub fn visible_children<'a>(
    store: &'a EvolutionStore,
    parent: &str,
    discovery: &Discovery,
) -> Vec<&'a str> {
    store
        .children(parent)
        .into_iter()
        .filter(|child| discovery.is_visible(child))
        .collect()
}
