//! Thresholded neighbor relation between items.
//!
//! Two distinct items are neighbors iff `0 < d < threshold`. Coincident
//! items (d == 0) are never connected, and a distance equal to the
//! threshold does not connect either.

use serde::{Deserialize, Serialize};

use crate::distance::DistanceMatrix;
use crate::error::{AdjacencyDefect, GraphError, Result};

/// Symmetric boolean N×N adjacency; the diagonal is always false.
///
/// Serialized in the 0 / (j+1) neighbor-id layout and validated through
/// [`AdjacencyMatrix::from_neighbor_ids`] when read back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<usize>>", into = "Vec<Vec<usize>>")]
pub struct AdjacencyMatrix {
    n: usize,
    edges: Vec<bool>,
}

/// Whether distance `d` connects two items under `threshold`.
#[inline]
pub fn connects(d: f64, threshold: f64) -> bool {
    d > 0.0 && d < threshold
}

impl TryFrom<Vec<Vec<usize>>> for AdjacencyMatrix {
    type Error = GraphError;

    fn try_from(rows: Vec<Vec<usize>>) -> Result<Self> {
        Self::from_neighbor_ids(&rows)
    }
}

impl From<AdjacencyMatrix> for Vec<Vec<usize>> {
    fn from(adj: AdjacencyMatrix) -> Self {
        adj.neighbor_ids()
    }
}

impl AdjacencyMatrix {
    /// Graph on `n` vertices with no edges.
    pub fn empty(n: usize) -> Self {
        Self {
            n,
            edges: vec![false; n * n],
        }
    }

    /// Threshold a distance matrix.
    ///
    /// Only the upper triangle is evaluated; each decision is written to
    /// both `(i, j)` and `(j, i)`.
    pub fn from_distances(distances: &DistanceMatrix, threshold: f64) -> Result<Self> {
        if threshold.is_nan() || threshold < 0.0 {
            return Err(GraphError::InvalidThreshold(threshold));
        }
        let mut adj = Self::empty(distances.len());
        for (i, j, d) in distances.pairs() {
            if connects(d, threshold) {
                adj.connect(i, j);
            }
        }
        tracing::debug!(
            items = adj.n,
            edges = adj.edge_count(),
            threshold,
            "adjacency built"
        );
        Ok(adj)
    }

    /// Validate and import a matrix where nonzero entries mark edges.
    ///
    /// This accepts the 0 / (j+1) neighbor-id layout as well as plain 0/1.
    pub fn from_neighbor_ids<R: AsRef<[usize]>>(rows: &[R]) -> Result<Self> {
        let n = rows.len();
        for (row, r) in rows.iter().enumerate() {
            let len = r.as_ref().len();
            if len != n {
                return Err(GraphError::MalformedAdjacency(AdjacencyDefect::NotSquare {
                    row,
                    len,
                    expected: n,
                }));
            }
        }
        let mut adj = Self::empty(n);
        for i in 0..n {
            if rows[i].as_ref()[i] != 0 {
                return Err(GraphError::MalformedAdjacency(AdjacencyDefect::SelfLoop {
                    index: i,
                }));
            }
            for j in (i + 1)..n {
                let forward = rows[i].as_ref()[j] != 0;
                let backward = rows[j].as_ref()[i] != 0;
                match (forward, backward) {
                    (true, true) => adj.connect(i, j),
                    (false, false) => {}
                    (true, false) => {
                        return Err(GraphError::MalformedAdjacency(AdjacencyDefect::Asymmetric {
                            i,
                            j,
                        }));
                    }
                    (false, true) => {
                        return Err(GraphError::MalformedAdjacency(AdjacencyDefect::Asymmetric {
                            i: j,
                            j: i,
                        }));
                    }
                }
            }
        }
        Ok(adj)
    }

    fn connect(&mut self, i: usize, j: usize) {
        self.edges[i * self.n + j] = true;
        self.edges[j * self.n + i] = true;
    }

    pub const fn len(&self) -> usize {
        self.n
    }

    pub const fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Whether `i` and `j` are neighbors. Out-of-range indices are not.
    pub fn is_adjacent(&self, i: usize, j: usize) -> bool {
        i < self.n && j < self.n && self.edges[i * self.n + j]
    }

    /// Neighbors of `v` in ascending index order.
    pub fn neighbors(&self, v: usize) -> impl Iterator<Item = usize> + '_ {
        let row: &[bool] = if v < self.n {
            &self.edges[v * self.n..(v + 1) * self.n]
        } else {
            &[]
        };
        row.iter()
            .enumerate()
            .filter_map(|(k, &e)| e.then_some(k))
    }

    pub fn degree(&self, v: usize) -> usize {
        self.neighbors(v).count()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.edges.iter().filter(|&&e| e).count() / 2
    }

    /// Undirected edges `(i, j)` with `i < j`, row-major.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.n).flat_map(move |i| self.neighbors(i).filter(move |&j| j > i).map(move |j| (i, j)))
    }

    /// Integer rendering: `adj[i][j] = j + 1` for neighbors, 0 otherwise.
    pub fn neighbor_ids(&self) -> Vec<Vec<usize>> {
        (0..self.n)
            .map(|i| {
                (0..self.n)
                    .map(|j| if self.edges[i * self.n + j] { j + 1 } else { 0 })
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceBuilder;
    use crate::geometry::Point;
    use crate::item::{Item, Representation};

    fn matrix(coords: &[(f64, f64)]) -> DistanceMatrix {
        let items: Vec<Item> = coords.iter().map(|&c| Item::Point(Point::from(c))).collect();
        DistanceBuilder::default()
            .build(&items, Representation::Point)
            .unwrap()
            .matrix
    }

    #[test]
    fn threshold_bounds_are_strict() {
        assert!(!connects(0.0, 10.0));
        assert!(!connects(10.0, 10.0));
        assert!(connects(9.999, 10.0));
        assert!(!connects(5.0, 0.0));
    }

    #[test]
    fn coincident_and_boundary_distances_do_not_connect() {
        // d(0,1) = 0, d(0,2) = 10, d(1,2) = 10, d(2,3) = 5
        let m = matrix(&[(0.0, 0.0), (0.0, 0.0), (10.0, 0.0), (15.0, 0.0)]);
        let adj = AdjacencyMatrix::from_distances(&m, 10.0).unwrap();
        assert!(!adj.is_adjacent(0, 1));
        assert!(!adj.is_adjacent(0, 2));
        assert!(!adj.is_adjacent(1, 2));
        assert!(adj.is_adjacent(2, 3));
        assert!(adj.is_adjacent(3, 2));
        assert_eq!(adj.edge_count(), 1);
    }

    #[test]
    fn zero_threshold_yields_no_edges() {
        let m = matrix(&[(0.0, 0.0), (1.0, 0.0)]);
        let adj = AdjacencyMatrix::from_distances(&m, 0.0).unwrap();
        assert_eq!(adj.edge_count(), 0);
    }

    #[test]
    fn negative_or_nan_threshold_is_rejected() {
        let m = matrix(&[(0.0, 0.0)]);
        assert!(matches!(
            AdjacencyMatrix::from_distances(&m, -1.0),
            Err(GraphError::InvalidThreshold(_))
        ));
        assert!(AdjacencyMatrix::from_distances(&m, f64::NAN).is_err());
    }

    #[test]
    fn neighbor_ids_are_one_based() {
        let m = matrix(&[(0.0, 0.0), (3.0, 4.0), (100.0, 100.0)]);
        let adj = AdjacencyMatrix::from_distances(&m, 10.0).unwrap();
        assert_eq!(adj.neighbor_ids(), vec![vec![0, 2, 0], vec![1, 0, 0], vec![0, 0, 0]]);
        assert_eq!(AdjacencyMatrix::from_neighbor_ids(&adj.neighbor_ids()).unwrap(), adj);
    }

    #[test]
    fn import_rejects_non_square() {
        let rows: Vec<Vec<usize>> = vec![vec![0, 1], vec![1]];
        let err = AdjacencyMatrix::from_neighbor_ids(&rows).unwrap_err();
        assert!(matches!(
            err,
            GraphError::MalformedAdjacency(AdjacencyDefect::NotSquare {
                row: 1,
                len: 1,
                expected: 2
            })
        ));
    }

    #[test]
    fn import_rejects_asymmetric_and_self_loops() {
        let rows: Vec<Vec<usize>> = vec![vec![0, 0, 0], vec![0, 0, 0], vec![1, 0, 0]];
        assert!(matches!(
            AdjacencyMatrix::from_neighbor_ids(&rows),
            Err(GraphError::MalformedAdjacency(AdjacencyDefect::Asymmetric { i: 2, j: 0 }))
        ));
        let rows: Vec<Vec<usize>> = vec![vec![1, 0], vec![0, 0]];
        assert!(matches!(
            AdjacencyMatrix::from_neighbor_ids(&rows),
            Err(GraphError::MalformedAdjacency(AdjacencyDefect::SelfLoop { index: 0 }))
        ));
    }

    #[test]
    fn neighbors_ascending() {
        let rows: Vec<Vec<usize>> = vec![
            vec![0, 1, 0, 1],
            vec![1, 0, 0, 0],
            vec![0, 0, 0, 0],
            vec![1, 0, 0, 0],
        ];
        let adj = AdjacencyMatrix::from_neighbor_ids(&rows).unwrap();
        assert_eq!(adj.neighbors(0).collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(adj.degree(2), 0);
        assert_eq!(adj.neighbors(9).count(), 0);
        assert_eq!(adj.edges().collect::<Vec<_>>(), vec![(0, 1), (0, 3)]);
    }

    #[test]
    fn json_uses_neighbor_id_layout() {
        let adj = AdjacencyMatrix::from_distances(&matrix(&[(0.0, 0.0), (3.0, 4.0)]), 10.0).unwrap();
        let json = serde_json::to_string(&adj).unwrap();
        assert_eq!(json, "[[0,2],[1,0]]");
        let back: AdjacencyMatrix = serde_json::from_str(&json).unwrap();
        assert_eq!(back, adj);
    }

    #[test]
    fn json_import_is_validated() {
        let err = serde_json::from_str::<AdjacencyMatrix>("[[0,2],[0,0]]").unwrap_err();
        assert!(err.to_string().contains("entry (0, 1) has no mirror at (1, 0)"));
        let err = serde_json::from_str::<AdjacencyMatrix>("[[0,0,0],[0]]").unwrap_err();
        assert!(err.to_string().contains("row 0 has 3 entries, expected 2"));
        let err = serde_json::from_str::<AdjacencyMatrix>("[[1]]").unwrap_err();
        assert!(err.to_string().contains("diagonal entry 0 is set"));
        assert!(matches!(
            AdjacencyMatrix::try_from(vec![vec![0, 2], vec![0, 0]]),
            Err(GraphError::MalformedAdjacency(AdjacencyDefect::Asymmetric { i: 0, j: 1 }))
        ));
    }
}
