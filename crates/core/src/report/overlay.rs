//! Overlay annotations for connected pairs.
//!
//! Rendering is left to the caller; this only decides what to draw and
//! where.

use serde::{Deserialize, Serialize};

use crate::adjacency::AdjacencyMatrix;
use crate::distance::Distances;
use crate::geometry::Segment;
use crate::params::GraphParams;

/// Text label for a connection, anchored in pixel coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceLabel {
    pub x: i64,
    pub y: i64,
    pub text: String,
}

/// What to draw for one connected pair `i < j`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayAnnotation {
    pub i: usize,
    pub j: usize,
    pub distance: f64,
    /// The nearest-point segment, when lines are requested.
    pub line: Option<Segment>,
    /// The distance label, when labels are requested.
    pub label: Option<DistanceLabel>,
}

/// Annotations for every connected pair that has a recorded segment.
///
/// Labels sit a quarter of the way along the segment from item `i`.
pub fn overlay_annotations(
    distances: &Distances,
    adjacency: &AdjacencyMatrix,
    params: &GraphParams,
) -> Vec<OverlayAnnotation> {
    if !params.show_lines && !params.show_labels {
        return Vec::new();
    }
    adjacency
        .edges()
        .filter_map(|(i, j)| {
            let segment = distances.segments.get(i, j)?;
            let distance = distances.matrix.get(i, j)?;
            let label = params.show_labels.then(|| {
                let anchor = segment.lerp(0.25);
                DistanceLabel {
                    x: round_half_up(anchor.x),
                    y: round_half_up(anchor.y),
                    text: params.format_distance(distance),
                }
            });
            Some(OverlayAnnotation {
                i,
                j,
                distance,
                line: params.show_lines.then_some(*segment),
                label,
            })
        })
        .collect()
}

fn round_half_up(v: f64) -> i64 {
    (v + 0.5).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceBuilder;
    use crate::geometry::Point;
    use crate::item::{Item, Representation};

    fn setup(params: &GraphParams) -> Vec<OverlayAnnotation> {
        let items: Vec<Item> = [(0.0, 0.0), (4.0, 3.0), (100.0, 100.0)]
            .into_iter()
            .map(|c| Item::Point(Point::from(c)))
            .collect();
        let d = DistanceBuilder::default()
            .build(&items, Representation::Point)
            .unwrap();
        let adj = AdjacencyMatrix::from_distances(&d.matrix, params.neighbors).unwrap();
        overlay_annotations(&d, &adj, params)
    }

    #[test]
    fn nothing_requested_nothing_drawn() {
        assert!(setup(&GraphParams::default()).is_empty());
    }

    #[test]
    fn label_at_quarter_point() {
        let params = GraphParams {
            show_labels: true,
            ..GraphParams::default()
        };
        let ann = setup(&params);
        assert_eq!(ann.len(), 1);
        assert_eq!((ann[0].i, ann[0].j), (0, 1));
        assert!(ann[0].line.is_none());
        // quarter of (4, 3) is (1.0, 0.75)
        assert_eq!(
            ann[0].label,
            Some(DistanceLabel {
                x: 1,
                y: 1,
                text: " 5.0".to_string()
            })
        );
    }

    #[test]
    fn lines_carry_the_segment() {
        let params = GraphParams {
            show_lines: true,
            ..GraphParams::default()
        };
        let ann = setup(&params);
        assert_eq!(
            ann[0].line,
            Some(Segment::new(Point::new(0.0, 0.0), Point::new(4.0, 3.0)))
        );
        assert!(ann[0].label.is_none());
    }

    #[test]
    fn rounding_matches_half_up() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-2.6), -3);
    }
}
