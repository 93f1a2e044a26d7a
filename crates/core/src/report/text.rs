//! Plain-text rendering of components.

use itertools::Itertools;

use crate::components::Components;
use crate::item::DistanceKind;

/// Default separator between member identifiers.
pub const MEMBER_DELIMITER: &str = " ";

/// One component as its 1-based member identifiers joined by `delimiter`.
pub fn component_string(members: &[usize], delimiter: &str) -> String {
    members.iter().map(|i| i + 1).join(delimiter)
}

/// Every component rendered with [`component_string`].
pub fn component_strings(components: &Components, delimiter: &str) -> Vec<String> {
    components
        .iter()
        .map(|m| component_string(m, delimiter))
        .collect()
}

/// The run summary: distance kind, component count, then one `CC-k:` line
/// per component.
pub fn log_lines(kind: DistanceKind, components: &Components) -> Vec<String> {
    let mut lines = Vec::with_capacity(components.count() + 2);
    lines.push(format!("Separation distances computed on {kind}"));
    lines.push(format!(
        "Number of connected components = {}",
        components.count()
    ));
    for (k, members) in components.iter().enumerate() {
        lines.push(format!(
            "CC-{}: {}",
            k + 1,
            component_string(members, MEMBER_DELIMITER)
        ));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adjacency::AdjacencyMatrix;
    use crate::components::extract_components;

    #[test]
    fn members_are_one_based() {
        assert_eq!(component_string(&[0, 2, 1], MEMBER_DELIMITER), "1 3 2");
        assert_eq!(component_string(&[4], ", "), "5");
        assert_eq!(component_string(&[], ", "), "");
    }

    #[test]
    fn log_lines_number_components() {
        let adj = AdjacencyMatrix::from_neighbor_ids::<Vec<usize>>(&[
            vec![0, 2, 0],
            vec![1, 0, 0],
            vec![0, 0, 0],
        ])
        .unwrap();
        let lines = log_lines(DistanceKind::Centroids, &extract_components(&adj));
        assert_eq!(
            lines,
            vec![
                "Separation distances computed on Centroids",
                "Number of connected components = 2",
                "CC-1: 1 2",
                "CC-2: 3",
            ]
        );
    }
}
