//! Layout engine core implementation.

use crate::collapse::CollapseState;
use crate::config::LayoutConfig;
use crate::discovery::Discovery;
use crate::store::EvolutionStore;

use super::analysis::group_by_stage;
use super::anchors::assign_ports;
use super::labels::place_label;
use super::placement::{Spacing, assign_grid_rows, place_slots};
use super::routing::{
    path_data, path_midpoint, route_curve, route_elbow, route_self_loop, source_anchor,
    target_anchor,
};
use super::types::{Connection, Layout, Orientation, PathStyle, PositionedNode};

/// Layout engine configuration and computation.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    pub(crate) config: LayoutConfig,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    fn spacing(&self) -> Spacing {
        let c = &self.config;
        let (main_extent, cross_extent) = match c.orientation {
            Orientation::Horizontal => (c.node_width, c.node_height),
            Orientation::Vertical => (c.node_height, c.node_width),
        };
        Spacing {
            stage_pitch: main_extent + c.stage_gap,
            row_pitch: cross_extent + c.row_gap,
            sibling_spacing: c.sibling_spacing,
            padding: c.padding,
        }
    }

    /// Length of the node side that ports spread along.
    fn port_side(&self) -> f64 {
        match self.config.orientation {
            Orientation::Horizontal => self.config.node_height,
            Orientation::Vertical => self.config.node_width,
        }
    }

    /// Compute the full layout for one discovery pass.
    pub fn layout(
        &self,
        store: &EvolutionStore,
        discovery: &Discovery,
        collapse: &CollapseState,
    ) -> Layout {
        // Phase 1: Node placement
        let mut nodes = self.place(store, discovery);
        if nodes.is_empty() {
            return Layout::default();
        }

        // Phase 2: Collapse markers
        let counts = collapse.collapsed_child_counts(store);
        for node in &mut nodes {
            node.collapsible = !store.edges_from(&node.id).is_empty();
            node.collapsed = collapse.is_collapsed(&node.id);
            node.collapsed_children = counts.get(&node.id).copied().unwrap_or(0);
        }

        // Phase 3: Edge routing
        let edges = discovery.visible_edges(store);
        let connections = self.route(store, &edges, &nodes);

        // Phase 4: Canvas extent
        let width = nodes.iter().map(|n| n.x + n.width).fold(0.0, f64::max) + self.config.padding;
        let height =
            nodes.iter().map(|n| n.y + n.height).fold(0.0, f64::max) + self.config.padding;
        let title_anchor = nodes
            .iter()
            .find(|n| n.column == 0 && n.row == 0)
            .map(|n| (n.x, n.y - self.config.padding));

        log::debug!(
            "Laid out {} nodes and {} connections ({}x{})",
            nodes.len(),
            connections.len(),
            width,
            height
        );

        Layout {
            nodes,
            connections,
            width,
            height,
            title_anchor,
        }
    }

    /// Position every visible node. Deterministic for a given store and
    /// discovery: output is ordered by column, then row.
    pub fn place(&self, store: &EvolutionStore, discovery: &Discovery) -> Vec<PositionedNode> {
        let columns = group_by_stage(store, discovery);
        let (ordered, _grid_rows) = assign_grid_rows(store, discovery, &columns);
        let slots = place_slots(store, discovery, &columns, &ordered, self.spacing());

        slots
            .into_iter()
            .filter_map(|slot| {
                let entity = store.get(slot.id)?;
                let (x, y) = match self.config.orientation {
                    Orientation::Horizontal => (slot.main, slot.cross),
                    Orientation::Vertical => (slot.cross, slot.main),
                };
                Some(PositionedNode {
                    id: slot.id.to_string(),
                    stage: entity.stage,
                    column: slot.column,
                    row: slot.row,
                    x,
                    y,
                    width: self.config.node_width,
                    height: self.config.node_height,
                    collapsible: false,
                    collapsed: false,
                    collapsed_children: 0,
                })
            })
            .collect()
    }

    /// Route `edges` (evolution indices) between positioned nodes. Indices
    /// outside the store and edges with an endpoint missing from `nodes` are
    /// skipped.
    pub fn route(
        &self,
        store: &EvolutionStore,
        edges: &[usize],
        nodes: &[PositionedNode],
    ) -> Vec<Connection> {
        let positions: std::collections::HashMap<&str, &PositionedNode> =
            nodes.iter().map(|n| (n.id.as_str(), n)).collect();

        let routable: Vec<usize> = edges
            .iter()
            .copied()
            .filter(|&idx| {
                if !store.is_resolved(idx) {
                    return false;
                }
                let evo = store.evolution(idx);
                positions.contains_key(evo.from.as_str()) && positions.contains_key(evo.to.as_str())
            })
            .collect();

        let orientation = self.config.orientation;
        let style = self.config.path_style();
        let spread = self.port_side() * self.config.port_spread;
        let ports = assign_ports(store, &routable, spread);

        routable
            .iter()
            .zip(ports)
            .map(|(&idx, (from_offset, to_offset))| {
                let evo = store.evolution(idx);
                let from_node = positions[evo.from.as_str()];
                let to_node = positions[evo.to.as_str()];

                let (style, waypoints) = if evo.from == evo.to {
                    (PathStyle::Elbow, route_self_loop(from_node, orientation))
                } else {
                    let start = source_anchor(from_node, orientation, from_offset);
                    let end = target_anchor(to_node, orientation, to_offset);
                    let points = match style {
                        PathStyle::Curve => route_curve(start, end, orientation),
                        PathStyle::Elbow => route_elbow(start, end, orientation),
                    };
                    (style, points)
                };

                let label = evo.requirements.as_deref().and_then(|text| {
                    place_label(&self.config.label, text, path_midpoint(&waypoints))
                });

                Connection {
                    from: evo.from.clone(),
                    to: evo.to.clone(),
                    requirements: evo.requirements.clone(),
                    from_offset,
                    to_offset,
                    style,
                    path: path_data(style, &waypoints),
                    waypoints,
                    label,
                    edge_index: idx,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::{DiscoveryMode, discover};
    use crate::model::{Evolution, Stage};
    use crate::store::tests::{entity, store};
    use std::collections::HashSet;

    fn scenario() -> EvolutionStore {
        EvolutionStore::new(
            vec![
                entity("InTraining1", Stage::InTraining),
                entity("Rookie1", Stage::Rookie),
                entity("Champion1", Stage::Champion),
                entity("Champion2", Stage::Champion),
            ],
            vec![
                Evolution::new("InTraining1", "Rookie1").with_requirements("Level 6"),
                Evolution::new("Rookie1", "Champion1").with_requirements("Attack 95+"),
                Evolution::new("Rookie1", "Champion2").with_requirements("Spirit 80+\nLevel 11"),
            ],
        )
        .unwrap()
    }

    fn run(s: &EvolutionStore, root: &str, engine: &LayoutEngine) -> Layout {
        let d = discover(s, root, &HashSet::new(), DiscoveryMode::Connected);
        engine.layout(s, &d, &CollapseState::new())
    }

    #[test]
    fn test_end_to_end_scenario() {
        let s = scenario();
        let layout = run(&s, "Rookie1", &LayoutEngine::default());

        assert_eq!(layout.nodes.len(), 4);
        assert_eq!(layout.connections.len(), 3);

        let rookie = layout.node("Rookie1").unwrap();
        let c1 = layout.node("Champion1").unwrap();
        let c2 = layout.node("Champion2").unwrap();
        assert_eq!(rookie.column, 1);
        assert_eq!(c1.column, 2);
        assert_eq!(c2.column, 2);
        assert_eq!(rookie.y - c1.y, c2.y - rookie.y);
        assert_eq!(c2.y - c1.y, 252.0);
        assert_eq!(rookie.x, 440.0);
        assert_eq!(c1.x, 840.0);
    }

    #[test]
    fn test_deterministic() {
        let s = scenario();
        let engine = LayoutEngine::default();
        assert_eq!(run(&s, "Rookie1", &engine), run(&s, "Rookie1", &engine));
    }

    #[test]
    fn test_branching_ports() {
        let s = scenario();
        let layout = run(&s, "Rookie1", &LayoutEngine::default());
        let from_rookie: Vec<f64> = layout
            .connections
            .iter()
            .filter(|c| c.from == "Rookie1")
            .map(|c| c.from_offset)
            .collect();
        // 60% of a 200px side
        assert_eq!(from_rookie, vec![-60.0, 60.0]);

        let single = layout.connections.iter().find(|c| c.from == "InTraining1").unwrap();
        assert_eq!(single.from_offset, 0.0);
        assert_eq!(single.to_offset, 0.0);
    }

    #[test]
    fn test_connection_geometry() {
        let s = scenario();
        let layout = run(&s, "Rookie1", &LayoutEngine::default());
        let conn = layout
            .connections
            .iter()
            .find(|c| c.to == "Champion2")
            .unwrap();
        let rookie = layout.node("Rookie1").unwrap();
        let c2 = layout.node("Champion2").unwrap();

        assert_eq!(conn.style, PathStyle::Curve);
        assert_eq!(conn.start(), (rookie.x + 160.0, rookie.y + 100.0 + 60.0));
        assert_eq!(conn.end(), (c2.x, c2.y + 100.0));
        assert!(conn.path.starts_with("M "));
        assert!(conn.path.contains(" C "));

        let label = conn.label.as_ref().unwrap();
        assert_eq!(label.lines, vec!["Spirit 80+", "Level 11"]);
        assert_eq!(label.center_x, (conn.start().0 + conn.end().0) / 2.0);
    }

    #[test]
    fn test_vertical_orientation() {
        let s = scenario();
        let engine = LayoutEngine::new(LayoutConfig::vertical());
        let layout = run(&s, "Rookie1", &engine);

        let rookie = layout.node("Rookie1").unwrap();
        let c1 = layout.node("Champion1").unwrap();
        let c2 = layout.node("Champion2").unwrap();
        assert_eq!(rookie.y, 480.0);
        assert_eq!(c1.y, c2.y);
        assert_eq!(rookie.x - c1.x, c2.x - rookie.x);

        // Ports spread along the 160px width: 60% of it, centered
        let from_rookie: Vec<&Connection> =
            layout.connections.iter().filter(|c| c.from == "Rookie1").collect();
        let offsets: Vec<f64> = from_rookie.iter().map(|c| c.from_offset).collect();
        assert_eq!(offsets, vec![-48.0, 48.0]);
        for conn in &from_rookie {
            assert_eq!(conn.start().0, rookie.x + 80.0 + conn.from_offset);
        }

        let conn = layout.connections.iter().find(|c| c.to == "Champion1").unwrap();
        assert_eq!(conn.style, PathStyle::Elbow);
        assert_eq!(conn.start().1, rookie.y + 200.0);
        assert_eq!(conn.end().1, c1.y);
        assert!(conn.path.contains(" L "));
    }

    #[test]
    fn test_collapse_markers() {
        let s = scenario();
        let mut collapse = CollapseState::new();
        collapse.toggle("Rookie1");
        let d = discover(&s, "Rookie1", collapse.collapsed(), DiscoveryMode::Connected);
        let layout = LayoutEngine::default().layout(&s, &d, &collapse);

        assert_eq!(layout.nodes.len(), 2);
        assert_eq!(layout.connections.len(), 1);
        let rookie = layout.node("Rookie1").unwrap();
        assert!(rookie.collapsible && rookie.collapsed);
        let egg = layout.node("InTraining1").unwrap();
        assert!(egg.collapsible && !egg.collapsed);
        assert_eq!(egg.collapsed_children, 1);
    }

    #[test]
    fn test_dangling_edge_not_routed() {
        let s = store(
            &[("a", Stage::Rookie), ("b", Stage::Champion)],
            &[("a", "b"), ("a", "ghost")],
        );
        let layout = run(&s, "a", &LayoutEngine::default());
        assert_eq!(layout.connections.len(), 1);
        assert_eq!(layout.connections[0].to, "b");

        // Routing directly over every index still skips the dangling one
        let routed = LayoutEngine::default().route(&s, &[0, 1], &layout.nodes);
        assert_eq!(routed.len(), 1);
    }

    #[test]
    fn test_route_ignores_out_of_range_indices() {
        let s = scenario();
        let layout = run(&s, "Rookie1", &LayoutEngine::default());
        assert!(LayoutEngine::default().route(&s, &[5], &[]).is_empty());
        let routed = LayoutEngine::default().route(&s, &[0, 7, 2], &layout.nodes);
        let indices: Vec<usize> = routed.iter().map(|c| c.edge_index).collect();
        assert_eq!(indices, vec![0, 2]);
    }

    #[test]
    fn test_coordinates_never_negative() {
        let s = scenario();
        for engine in [LayoutEngine::default(), LayoutEngine::new(LayoutConfig::vertical())] {
            let layout = run(&s, "InTraining1", &engine);
            assert!(!layout.is_empty());
            for node in &layout.nodes {
                assert!(node.x >= 0.0 && node.y >= 0.0, "{} at ({}, {})", node.id, node.x, node.y);
            }
            let (tx, ty) = layout.title_anchor.unwrap();
            assert!(tx >= 0.0 && ty >= 0.0);
            for conn in &layout.connections {
                assert!(conn.waypoints.iter().all(|&(x, y)| x >= 0.0 && y >= 0.0));
            }
        }
    }

    #[test]
    fn test_cycle_layout_terminates() {
        let s = store(&[("x", Stage::Rookie), ("y", Stage::Champion)], &[("x", "y"), ("y", "x")]);
        let layout = run(&s, "x", &LayoutEngine::default());
        assert_eq!(layout.nodes.len(), 2);
        assert_eq!(layout.connections.len(), 2);
    }

    #[test]
    fn test_empty_root() {
        let s = scenario();
        let layout = run(&s, "missing", &LayoutEngine::default());
        assert!(layout.is_empty());
        assert!(layout.connections.is_empty());
        assert_eq!(layout.width, 0.0);
    }

    #[test]
    fn test_title_anchor_above_first_node() {
        let s = scenario();
        let layout = run(&s, "Rookie1", &LayoutEngine::default());
        let first = layout.nodes.iter().find(|n| n.column == 0 && n.row == 0).unwrap();
        assert_eq!(layout.title_anchor, Some((first.x, first.y - 40.0)));
    }
}
