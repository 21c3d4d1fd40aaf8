//! Data structures for layout computation.

use crate::model::Stage;
use serde::{Deserialize, Serialize};

/// Axis along which stage columns advance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Orientation {
    /// Stages left to right, siblings spread vertically
    #[default]
    Horizontal,
    /// Stages top to bottom, siblings spread horizontally
    Vertical,
}

/// Shape of connection paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PathStyle {
    /// Cubic Bézier with control points at 25%/75% of the span
    Curve,
    /// Orthogonal path bending once at the midpoint between stages
    Elbow,
}

impl Orientation {
    /// Path style used when none is configured.
    pub fn default_path_style(&self) -> PathStyle {
        match self {
            Self::Horizontal => PathStyle::Curve,
            Self::Vertical => PathStyle::Elbow,
        }
    }
}

/// A positioned entity card.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedNode {
    pub id: String,
    pub stage: Stage,
    /// Compacted stage index
    pub column: usize,
    /// Slot within the column
    pub row: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Has at least one outgoing evolution
    pub collapsible: bool,
    pub collapsed: bool,
    /// Direct children currently collapsed
    pub collapsed_children: usize,
}

/// Requirement label box, centered on the path midpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub center_x: f64,
    pub center_y: f64,
    pub lines: Vec<String>,
    pub line_height: f64,
}

impl LabelBox {
    /// Vertical center of line `i`; lines stack centered on the box center.
    pub fn line_y(&self, i: usize) -> f64 {
        let n = self.lines.len() as f64;
        self.center_y - (n - 1.0) * self.line_height / 2.0 + i as f64 * self.line_height
    }
}

/// A routed evolution edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    /// Port offset along the source node's anchor side
    pub from_offset: f64,
    /// Port offset along the target node's anchor side
    pub to_offset: f64,
    pub style: PathStyle,
    /// Path points: anchors and turns for elbows, anchors and control
    /// points for curves
    pub waypoints: Vec<(f64, f64)>,
    /// SVG path data
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<LabelBox>,
    /// Index into the store's evolution list
    pub edge_index: usize,
}

impl Connection {
    pub fn start(&self) -> (f64, f64) {
        self.waypoints[0]
    }

    pub fn end(&self) -> (f64, f64) {
        self.waypoints[self.waypoints.len() - 1]
    }
}

/// The complete layout result.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    pub nodes: Vec<PositionedNode>,
    pub connections: Vec<Connection>,
    pub width: f64,
    pub height: f64,
    /// Where a title for the tree goes: above the node at column 0, row 0
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_anchor: Option<(f64, f64)>,
}

impl Layout {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&PositionedNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}
