//! Seeds for labeling particles by component in an image.

use serde::{Deserialize, Serialize};

use crate::components::Components;

/// Fill instruction: flood the particle containing `(x, y)` with `label`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSeed {
    /// 1-based item identifier.
    pub item: usize,
    /// 1-based component identifier.
    pub label: usize,
    pub x: i64,
    pub y: i64,
}

/// One seed per item, grouped by component in membership order.
///
/// Items without a seed pixel are skipped.
pub fn label_seeds(components: &Components, seeds: &[(i64, i64)]) -> Vec<LabelSeed> {
    components
        .iter()
        .enumerate()
        .flat_map(|(k, members)| {
            members.iter().filter_map(move |&i| {
                seeds.get(i).map(|&(x, y)| LabelSeed {
                    item: i + 1,
                    label: k + 1,
                    x,
                    y,
                })
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adjacency::AdjacencyMatrix;
    use crate::components::extract_components;

    #[test]
    fn seeds_follow_component_order() {
        let adj = AdjacencyMatrix::from_neighbor_ids::<Vec<usize>>(&[
            vec![0, 0, 3],
            vec![0, 0, 0],
            vec![1, 0, 0],
        ])
        .unwrap();
        let c = extract_components(&adj);
        let seeds = label_seeds(&c, &[(5, 5), (9, 1), (7, 2)]);
        let got: Vec<(usize, usize)> = seeds.iter().map(|s| (s.item, s.label)).collect();
        assert_eq!(got, vec![(1, 1), (3, 1), (2, 2)]);
        assert_eq!((seeds[1].x, seeds[1].y), (7, 2));
    }

    #[test]
    fn missing_seeds_are_skipped() {
        let c = extract_components(&AdjacencyMatrix::empty(2));
        assert_eq!(label_seeds(&c, &[(1, 1)]).len(), 1);
    }
}
