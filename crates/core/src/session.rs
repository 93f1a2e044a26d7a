//! Run context: explicit inputs for one clustering run.

use std::sync::atomic::AtomicBool;

use crate::adjacency::AdjacencyMatrix;
use crate::components::extract_components;
use crate::distance::DistanceBuilder;
use crate::error::Result;
use crate::geometry::Calibration;
use crate::item::Item;
use crate::params::GraphParams;
use crate::report::ClusterReport;
use crate::table::MeasurementTable;

/// Items, calibration, parameters and an optional cancel flag.
///
/// The representation is fixed by `params.distance` for the whole run.
#[derive(Debug, Clone)]
pub struct RunContext<'a> {
    items: Vec<Item>,
    params: GraphParams,
    calibration: Calibration,
    seeds: Vec<(i64, i64)>,
    cancel: Option<&'a AtomicBool>,
}

impl<'a> RunContext<'a> {
    pub fn new(items: Vec<Item>, params: GraphParams) -> Self {
        Self {
            items,
            params,
            calibration: Calibration::IDENTITY,
            seeds: Vec::new(),
            cancel: None,
        }
    }

    /// Build a context from a measurement table for `params.distance`.
    pub fn from_table(table: &MeasurementTable, params: GraphParams) -> Result<Self> {
        let kind = params.distance;
        let items = table.items(kind)?;
        let seeds = table.seeds(kind)?;
        Ok(Self {
            items,
            calibration: table.calibration_for(kind),
            params,
            seeds,
            cancel: None,
        })
    }

    pub fn with_calibration(mut self, calibration: Calibration) -> Self {
        self.calibration = calibration;
        self
    }

    /// Per-item seed pixels used for label seeds.
    pub fn with_seeds(mut self, seeds: Vec<(i64, i64)>) -> Self {
        self.seeds = seeds;
        self
    }

    pub fn with_cancel(mut self, flag: &'a AtomicBool) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub const fn params(&self) -> &GraphParams {
        &self.params
    }

    pub const fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Distances, adjacency and components, each stage consuming the
    /// previous one in full.
    pub fn run(&self) -> Result<ClusterReport> {
        self.params.validate()?;
        self.calibration.validate()?;
        let mut builder = DistanceBuilder::new(self.calibration).with_search(self.params.search);
        if let Some(flag) = self.cancel {
            builder = builder.with_cancel(flag);
        }
        let distances = builder.build(&self.items, self.params.distance.representation())?;
        let adjacency = AdjacencyMatrix::from_distances(&distances.matrix, self.params.neighbors)?;
        let components = extract_components(&adjacency);

        let report = ClusterReport {
            params: self.params.clone(),
            distances,
            adjacency,
            components,
            seeds: self.seeds.clone(),
        };
        for line in report.log_lines() {
            tracing::info!("{line}");
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GraphError;
    use crate::geometry::{Boundary, Point};
    use crate::item::DistanceKind;

    #[test]
    fn wrong_representation_is_rejected() {
        let items = vec![Item::Point(Point::new(0.0, 0.0))];
        let err = RunContext::new(items, GraphParams::default())
            .run()
            .unwrap_err();
        assert!(matches!(err, GraphError::MixedRepresentation { index: 0, .. }));
    }

    #[test]
    fn invalid_threshold_is_rejected_before_work() {
        let params = GraphParams {
            distance: DistanceKind::Centroids,
            neighbors: -1.0,
            ..GraphParams::default()
        };
        let err = RunContext::new(vec![Item::Point(Point::default())], params)
            .run()
            .unwrap_err();
        assert!(matches!(err, GraphError::InvalidThreshold(_)));
    }

    #[test]
    fn cancel_flag_aborts_run() {
        let flag = AtomicBool::new(true);
        let items = vec![
            Item::Boundary(Boundary::new(vec![Point::new(0.0, 0.0)])),
            Item::Boundary(Boundary::new(vec![Point::new(1.0, 0.0)])),
        ];
        let err = RunContext::new(items, GraphParams::default())
            .with_cancel(&flag)
            .run()
            .unwrap_err();
        assert!(matches!(err, GraphError::Cancelled));
    }

    #[test]
    fn single_item_is_one_singleton() {
        let params = GraphParams {
            distance: DistanceKind::Centroids,
            ..GraphParams::default()
        };
        let report = RunContext::new(vec![Item::Point(Point::new(2.0, 2.0))], params)
            .run()
            .unwrap();
        assert_eq!(report.ragged(), vec![vec![1]]);
    }

    #[test]
    fn nan_pixel_width_fails_the_run() {
        let items = vec![
            Item::Boundary(Boundary::new(vec![Point::new(0.0, 0.0)])),
            Item::Boundary(Boundary::new(vec![Point::new(3.0, 0.0)])),
        ];
        let err = RunContext::new(items, GraphParams::default())
            .with_calibration(Calibration::scaled(f64::NAN, 1.0))
            .run()
            .unwrap_err();
        assert!(matches!(
            err,
            GraphError::InvalidCalibration { field: "pixel_width", .. }
        ));
    }
}
