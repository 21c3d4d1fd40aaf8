//! Edge geometry: anchors, curves, elbows and SVG path data.

use std::fmt::Write;

use super::types::{Orientation, PathStyle, PositionedNode};

/// Where an edge leaves `node`: right-center (horizontal) or bottom-center
/// (vertical), shifted along that side by `offset`.
pub fn source_anchor(node: &PositionedNode, orientation: Orientation, offset: f64) -> (f64, f64) {
    match orientation {
        Orientation::Horizontal => (node.x + node.width, node.y + node.height / 2.0 + offset),
        Orientation::Vertical => (node.x + node.width / 2.0 + offset, node.y + node.height),
    }
}

/// Where an edge enters `node`: left-center or top-center.
pub fn target_anchor(node: &PositionedNode, orientation: Orientation, offset: f64) -> (f64, f64) {
    match orientation {
        Orientation::Horizontal => (node.x, node.y + node.height / 2.0 + offset),
        Orientation::Vertical => (node.x + node.width / 2.0 + offset, node.y),
    }
}

/// Cubic curve with control points at 25% of the span from each end,
/// leaving and entering along the stage axis.
pub fn route_curve(start: (f64, f64), end: (f64, f64), orientation: Orientation) -> Vec<(f64, f64)> {
    match orientation {
        Orientation::Horizontal => {
            let dx = end.0 - start.0;
            vec![
                start,
                (start.0 + dx * 0.25, start.1),
                (end.0 - dx * 0.25, end.1),
                end,
            ]
        }
        Orientation::Vertical => {
            let dy = end.1 - start.1;
            vec![
                start,
                (start.0, start.1 + dy * 0.25),
                (end.0, end.1 - dy * 0.25),
                end,
            ]
        }
    }
}

/// Orthogonal path bending halfway between the anchors. Aligned anchors
/// get a straight segment.
pub fn route_elbow(start: (f64, f64), end: (f64, f64), orientation: Orientation) -> Vec<(f64, f64)> {
    match orientation {
        Orientation::Horizontal => {
            if start.1 == end.1 {
                return vec![start, end];
            }
            let mid_x = (start.0 + end.0) / 2.0;
            vec![start, (mid_x, start.1), (mid_x, end.1), end]
        }
        Orientation::Vertical => {
            if start.0 == end.0 {
                return vec![start, end];
            }
            let mid_y = (start.1 + end.1) / 2.0;
            vec![start, (start.0, mid_y), (end.0, mid_y), end]
        }
    }
}

/// Loop for an entity evolving into itself, on the side edges leave from.
pub fn route_self_loop(node: &PositionedNode, orientation: Orientation) -> Vec<(f64, f64)> {
    let loop_offset = 25.0;
    match orientation {
        Orientation::Horizontal => {
            let x = node.x + node.width;
            let y_top = node.y + node.height * 0.3;
            let y_bottom = node.y + node.height * 0.7;
            vec![
                (x, y_top),
                (x + loop_offset, y_top),
                (x + loop_offset, y_bottom),
                (x, y_bottom),
            ]
        }
        Orientation::Vertical => {
            let y = node.y + node.height;
            let x_left = node.x + node.width * 0.3;
            let x_right = node.x + node.width * 0.7;
            vec![
                (x_left, y),
                (x_left, y + loop_offset),
                (x_right, y + loop_offset),
                (x_right, y),
            ]
        }
    }
}

/// SVG path data for the given points.
pub fn path_data(style: PathStyle, points: &[(f64, f64)]) -> String {
    let mut d = String::new();
    let Some(&(x, y)) = points.first() else {
        return d;
    };
    let _ = write!(d, "M {} {}", x, y);

    if style == PathStyle::Curve && points.len() == 4 {
        let _ = write!(
            d,
            " C {} {}, {} {}, {} {}",
            points[1].0, points[1].1, points[2].0, points[2].1, points[3].0, points[3].1
        );
    } else {
        for (x, y) in &points[1..] {
            let _ = write!(d, " L {} {}", x, y);
        }
    }
    d
}

/// Midpoint of the path. Both path styles are symmetric about the midpoint
/// of their anchors.
pub fn path_midpoint(points: &[(f64, f64)]) -> (f64, f64) {
    match (points.first(), points.last()) {
        (Some(a), Some(b)) => ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0),
        _ => (0.0, 0.0),
    }
}
