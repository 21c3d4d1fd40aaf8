//! Evolution tree layout: node placement and connection routing.

mod analysis;
mod anchors;
mod engine;
mod labels;
mod placement;
mod routing;
mod types;

pub use anchors::port_offset;
pub use engine::LayoutEngine;
pub use placement::sibling_offset;
pub use types::{Connection, LabelBox, Layout, Orientation, PathStyle, PositionedNode};
