//! Result reporting.
//!
//! Everything a caller needs after a run, in the forms the original tool
//! offered:
//! - component strings and log lines
//! - ragged 1-based membership
//! - overlay annotations for connected pairs
//! - the distance matrix as CSV
//! - label seeds for flood-filling particles by component

mod labels;
mod matrix;
mod overlay;
mod text;

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::adjacency::AdjacencyMatrix;
use crate::components::Components;
use crate::distance::Distances;
use crate::error::Result;
use crate::params::GraphParams;

pub use labels::{LabelSeed, label_seeds};
pub use matrix::write_matrix_csv;
pub use overlay::{DistanceLabel, OverlayAnnotation, overlay_annotations};
pub use text::{MEMBER_DELIMITER, component_string, component_strings, log_lines};

/// Complete output of one clustering run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterReport {
    pub params: GraphParams,
    pub distances: Distances,
    pub adjacency: AdjacencyMatrix,
    pub components: Components,
    /// Seed pixel per item, when the items came from a measurement table.
    #[serde(default)]
    pub seeds: Vec<(i64, i64)>,
}

impl ClusterReport {
    pub fn component_count(&self) -> usize {
        self.components.count()
    }

    /// Membership as 1-based item identifiers.
    pub fn ragged(&self) -> Vec<Vec<usize>> {
        self.components.ragged()
    }

    pub fn component_strings(&self) -> Vec<String> {
        component_strings(&self.components, MEMBER_DELIMITER)
    }

    pub fn log_lines(&self) -> Vec<String> {
        log_lines(self.params.distance, &self.components)
    }

    /// Annotations according to `params.show_lines` / `params.show_labels`.
    pub fn overlay(&self) -> Vec<OverlayAnnotation> {
        overlay_annotations(&self.distances, &self.adjacency, &self.params)
    }

    pub fn label_seeds(&self) -> Vec<LabelSeed> {
        label_seeds(&self.components, &self.seeds)
    }

    pub fn write_matrix_csv<W: Write>(&self, out: &mut W) -> Result<()> {
        write_matrix_csv(&self.distances.matrix, out)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
