//! Connected-component extraction over an adjacency matrix.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::adjacency::AdjacencyMatrix;

/// Partition of item indices into connected components.
///
/// Components are ordered by their smallest member; members are in
/// breadth-first discovery order starting from that member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Components {
    members: Vec<Vec<usize>>,
    labels: Vec<usize>,
}

impl Components {
    /// Number of components.
    pub fn count(&self) -> usize {
        self.members.len()
    }

    /// Number of partitioned items.
    pub fn item_count(&self) -> usize {
        self.labels.len()
    }

    /// Members of component `k` (0-based), as 0-based item indices.
    pub fn members(&self, k: usize) -> Option<&[usize]> {
        self.members.get(k).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = &[usize]> {
        self.members.iter().map(Vec::as_slice)
    }

    /// 0-based component index of item `i`.
    pub fn component_of(&self, i: usize) -> Option<usize> {
        self.labels.get(i).copied()
    }

    /// Per-item label, 1-based component ids, indexed by item.
    pub fn labels(&self) -> Vec<usize> {
        self.labels.iter().map(|k| k + 1).collect()
    }

    /// Membership as 1-based item identifiers, one row per component.
    pub fn ragged(&self) -> Vec<Vec<usize>> {
        self.members
            .iter()
            .map(|m| m.iter().map(|i| i + 1).collect())
            .collect()
    }

    /// Components with a single member.
    pub fn singletons(&self) -> impl Iterator<Item = usize> + '_ {
        self.members
            .iter()
            .filter(|m| m.len() == 1)
            .map(|m| m[0])
    }
}

/// Partition the vertices of `adj` into connected components.
///
/// Vertices are scanned in ascending order; each unvisited vertex roots a
/// breadth-first traversal that visits neighbors in ascending order.
pub fn extract_components(adj: &AdjacencyMatrix) -> Components {
    let n = adj.len();
    let mut visited = vec![false; n];
    let mut labels = vec![0usize; n];
    let mut members: Vec<Vec<usize>> = Vec::new();
    let mut queue: VecDeque<usize> = VecDeque::new();

    for start in 0..n {
        if visited[start] {
            continue;
        }
        let label = members.len();
        visited[start] = true;
        queue.clear();
        queue.push_back(start);
        let mut group = Vec::new();
        while let Some(v) = queue.pop_front() {
            group.push(v);
            labels[v] = label;
            for k in adj.neighbors(v) {
                if !visited[k] {
                    visited[k] = true;
                    queue.push_back(k);
                }
            }
        }
        members.push(group);
    }

    tracing::debug!(items = n, components = members.len(), "components extracted");
    Components { members, labels }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adjacency(n: usize, edges: &[(usize, usize)]) -> AdjacencyMatrix {
        let mut rows = vec![vec![0usize; n]; n];
        for &(i, j) in edges {
            rows[i][j] = j + 1;
            rows[j][i] = i + 1;
        }
        AdjacencyMatrix::from_neighbor_ids(&rows).unwrap()
    }

    #[test]
    fn empty_graph_is_all_singletons() {
        let c = extract_components(&adjacency(3, &[]));
        assert_eq!(c.count(), 3);
        assert_eq!(c.ragged(), vec![vec![1], vec![2], vec![3]]);
        assert_eq!(c.singletons().collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn members_follow_bfs_discovery_order() {
        // 0-3, 0-1, 3-2, 4 isolated, 5-6
        let c = extract_components(&adjacency(7, &[(0, 3), (0, 1), (3, 2), (5, 6)]));
        assert_eq!(c.count(), 3);
        assert_eq!(c.members(0), Some(&[0, 1, 3, 2][..]));
        assert_eq!(c.members(1), Some(&[4][..]));
        assert_eq!(c.members(2), Some(&[5, 6][..]));
        assert_eq!(c.labels(), vec![1, 1, 1, 1, 2, 3, 3]);
        assert_eq!(c.component_of(6), Some(2));
        assert_eq!(c.component_of(7), None);
    }

    #[test]
    fn components_are_ordered_by_smallest_member() {
        let c = extract_components(&adjacency(5, &[(3, 4), (1, 2)]));
        let roots: Vec<usize> = c.iter().map(|m| m[0]).collect();
        assert_eq!(roots, vec![0, 1, 3]);
    }

    #[test]
    fn cycle_visits_each_vertex_once() {
        let c = extract_components(&adjacency(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]));
        assert_eq!(c.count(), 1);
        assert_eq!(c.members(0), Some(&[0, 1, 3, 2][..]));
    }

    #[test]
    fn zero_items_yield_no_components() {
        let c = extract_components(&AdjacencyMatrix::empty(0));
        assert_eq!(c.count(), 0);
        assert_eq!(c.item_count(), 0);
    }
}
