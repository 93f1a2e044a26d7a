//! blobgraph - proximity graphs and connected components for particle regions.
//!
//! Items (traced outlines or single points) are turned into a pairwise
//! distance matrix, thresholded into a symmetric adjacency, and partitioned
//! into connected components:
//!
//! ```
//! use blobgraph_core::{DistanceKind, GraphParams, Item, Point, RunContext};
//!
//! let items = vec![
//!     Item::Point(Point::new(0.0, 0.0)),
//!     Item::Point(Point::new(3.0, 4.0)),
//!     Item::Point(Point::new(100.0, 100.0)),
//! ];
//! let params = GraphParams {
//!     distance: DistanceKind::Centroids,
//!     neighbors: 10.0,
//!     ..GraphParams::default()
//! };
//! let report = RunContext::new(items, params).run()?;
//! assert_eq!(report.ragged(), vec![vec![1, 2], vec![3]]);
//! # Ok::<(), blobgraph_core::GraphError>(())
//! ```

pub mod adjacency;
pub mod components;
pub mod distance;
pub mod error;
pub mod geometry;
pub mod item;
pub mod params;
pub mod report;
pub mod session;
pub mod table;

pub use adjacency::AdjacencyMatrix;
pub use components::{Components, extract_components};
pub use distance::{DistanceBuilder, DistanceMatrix, Distances, NearestSearch, NearestSegments};
pub use error::{AdjacencyDefect, DistanceDefect, GraphError, Result};
pub use geometry::{Boundary, Calibration, Point, Segment};
pub use item::{DistanceKind, Item, Representation};
pub use params::GraphParams;
pub use report::ClusterReport;
pub use session::RunContext;
pub use table::MeasurementTable;
