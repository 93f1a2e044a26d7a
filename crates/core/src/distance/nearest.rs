//! Nearest boundary-point search between two outlines.
//!
//! Both strategies return the same minimum and, under ties, the same
//! realizing pair: the first pair met when scanning `a` in order and, for
//! each point of `a`, `b` in order.

use ordered_float::OrderedFloat;
use rstar::RTree;
use rstar::primitives::GeomWithData;
use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Search strategy for the closest pair of boundary points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NearestSearch {
    /// Exhaustive `a × b` scan.
    #[default]
    BruteForce,
    /// One R-tree per boundary, queried with the other boundary's points.
    Indexed,
}

/// Closest pair found between two point sets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestPair {
    /// Squared distance of the pair.
    pub dist_sq: f64,
    /// Index into the first point set.
    pub a: usize,
    /// Index into the second point set.
    pub b: usize,
}

impl NearestPair {
    pub fn distance(&self) -> f64 {
        self.dist_sq.sqrt()
    }
}

/// Exhaustive closest-pair scan. Returns `None` if either set is empty.
pub fn nearest_pair_brute(a: &[Point], b: &[Point]) -> Option<NearestPair> {
    if a.is_empty() || b.is_empty() {
        return None;
    }
    let mut best = NearestPair {
        dist_sq: f64::INFINITY,
        a: 0,
        b: 0,
    };
    for (ia, pa) in a.iter().enumerate() {
        for (ib, pb) in b.iter().enumerate() {
            let d = pa.distance_sq(pb);
            if d < best.dist_sq {
                best = NearestPair { dist_sq: d, a: ia, b: ib };
            }
        }
    }
    Some(best)
}

type IndexedPoint = GeomWithData<[f64; 2], usize>;

/// R-tree over one boundary's points, tagged with their positions.
pub struct PointIndex {
    tree: RTree<IndexedPoint>,
    points: Vec<Point>,
}

impl PointIndex {
    pub fn new(points: &[Point]) -> Self {
        let entries = points
            .iter()
            .enumerate()
            .map(|(i, p)| GeomWithData::new([p.x, p.y], i))
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
            points: points.to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Nearest indexed point to `query`, lowest position among equals.
    pub fn nearest(&self, query: &Point) -> Option<(usize, f64)> {
        let mut hits = self
            .tree
            .nearest_neighbor_iter_with_distance_2(&[query.x, query.y]);
        let (first, first_d2) = hits.next()?;
        let best = hits
            .take_while(|(_, d2)| *d2 == first_d2)
            .map(|(entry, _)| entry.data)
            .fold(first.data, usize::min);
        Some((best, query.distance_sq(&self.points[best])))
    }
}

/// Closest pair between `a` and an indexed point set.
pub fn nearest_pair_indexed(a: &[Point], b: &PointIndex) -> Option<NearestPair> {
    a.iter()
        .enumerate()
        .filter_map(|(ia, pa)| b.nearest(pa).map(|(ib, d)| (ia, ib, d)))
        .min_by_key(|&(ia, _, d)| (OrderedFloat(d), ia))
        .map(|(a, b, dist_sq)| NearestPair { dist_sq, a, b })
}
