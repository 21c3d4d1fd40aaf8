//! Node placement: grid rows, parent-relative spread and normalization.

use crate::discovery::Discovery;
use crate::store::EvolutionStore;
use std::collections::HashMap;

use super::analysis::{StageColumns, anchor_parent, visible_children};

/// Axis-independent spacing, derived from the layout config and orientation.
#[derive(Debug, Clone, Copy)]
pub struct Spacing {
    /// Distance between consecutive stage columns
    pub stage_pitch: f64,
    /// Minimum distance between neighbours in a column
    pub row_pitch: f64,
    pub sibling_spacing: f64,
    pub padding: f64,
}

/// A node placed on the (stage, sibling) axes, before orientation is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Slot<'a> {
    pub id: &'a str,
    pub column: usize,
    pub row: usize,
    /// Coordinate along the stage axis
    pub main: f64,
    /// Coordinate along the sibling axis
    pub cross: f64,
}

/// Order each column by the grid row of its nodes' anchor parents.
///
/// One top-down pass keeps children near their parent's row; this
/// approximates crossing minimization and makes no optimality claim.
pub fn assign_grid_rows<'a>(
    store: &EvolutionStore,
    discovery: &Discovery,
    columns: &StageColumns<'a>,
) -> (Vec<Vec<&'a str>>, HashMap<&'a str, usize>) {
    let mut grid_row: HashMap<&'a str, usize> = HashMap::new();
    let mut ordered = Vec::with_capacity(columns.columns.len());

    for ids in &columns.columns {
        let mut keyed: Vec<((usize, usize), &'a str)> = ids
            .iter()
            .map(|&id| {
                let key = match anchor_parent(store, id, &columns.column_of) {
                    Some(parent) => {
                        let parent_row = grid_row.get(parent).copied().unwrap_or(0);
                        let sibling = visible_children(store, parent, discovery)
                            .iter()
                            .position(|c| *c == id)
                            .unwrap_or(0);
                        (parent_row, sibling)
                    }
                    None => (0, 0),
                };
                (key, id)
            })
            .collect();

        // Stable: ties keep discovery order
        keyed.sort_by_key(|(key, _)| *key);

        let sorted: Vec<&'a str> = keyed.into_iter().map(|(_, id)| id).collect();
        for (row, id) in sorted.iter().enumerate() {
            grid_row.insert(*id, row);
        }
        ordered.push(sorted);
    }

    (ordered, grid_row)
}

/// Compute slot coordinates for every visible node.
///
/// Columns start `padding` along the stage axis and advance by `stage_pitch`.
/// A node with an anchor parent is spread symmetrically around the parent:
/// `parent + (index - (count - 1) / 2) * sibling_spacing`. Nodes without one
/// start at `row * row_pitch`. Within a column every node sits at least
/// `row_pitch` past its predecessor, and the whole layout is finally shifted
/// so the smallest sibling-axis coordinate equals `padding`.
pub fn place_slots<'a>(
    store: &EvolutionStore,
    discovery: &Discovery,
    columns: &StageColumns<'a>,
    ordered: &[Vec<&'a str>],
    spacing: Spacing,
) -> Vec<Slot<'a>> {
    let mut cross_of: HashMap<&str, f64> = HashMap::new();
    let mut slots = Vec::new();

    for (column, ids) in ordered.iter().enumerate() {
        let main = spacing.padding + column as f64 * spacing.stage_pitch;
        let mut previous: Option<f64> = None;

        for (row, &id) in ids.iter().enumerate() {
            let relative = anchor_parent(store, id, &columns.column_of).and_then(|parent| {
                let parent_cross = *cross_of.get(parent)?;
                let siblings = visible_children(store, parent, discovery);
                let index = siblings.iter().position(|c| *c == id)?;
                Some(sibling_offset(index, siblings.len(), spacing.sibling_spacing) + parent_cross)
            });

            let mut cross = relative.unwrap_or(row as f64 * spacing.row_pitch);
            if let Some(prev) = previous {
                cross = cross.max(prev + spacing.row_pitch);
            }
            previous = Some(cross);
            cross_of.insert(id, cross);

            slots.push(Slot {
                id,
                column,
                row,
                main,
                cross,
            });
        }
    }

    normalize(&mut slots, spacing.padding);
    slots
}

/// Offset of sibling `index` out of `count`, centered on zero.
#[inline]
pub fn sibling_offset(index: usize, count: usize, spacing: f64) -> f64 {
    if count <= 1 {
        0.0
    } else {
        (index as f64 - (count - 1) as f64 / 2.0) * spacing
    }
}

/// Shift every slot so the minimum sibling-axis coordinate equals `padding`.
pub fn normalize(slots: &mut [Slot<'_>], padding: f64) {
    let Some(min) = slots.iter().map(|s| s.cross).reduce(f64::min) else {
        return;
    };
    let shift = padding - min;
    for slot in slots.iter_mut() {
        slot.cross += shift;
    }
}
