//! Measurement table adapter.
//!
//! A particle-analysis results table: named numeric columns, one row per
//! particle, plus the outlines traced from each particle's start pixel.
//! The table turns into the item list for a given [`DistanceKind`].

use std::io::Read;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{GraphError, Result};
use crate::geometry::{Boundary, Calibration, Point};
use crate::item::{DistanceKind, Item};

/// Per-particle measurements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasurementTable {
    /// Columns in insertion order, e.g. `X`, `Y`, `XM`, `YM`, `XStart`, `YStart`.
    #[serde(default)]
    pub columns: IndexMap<String, Vec<f64>>,

    /// Traced outline of each row's particle, in raw pixel coordinates.
    #[serde(default)]
    pub boundaries: Vec<Boundary>,

    /// Pixel calibration of the image the table was measured on.
    #[serde(default)]
    pub calibration: Calibration,
}

impl MeasurementTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn with_column(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.columns.insert(name.into(), values);
        self
    }

    pub fn with_boundaries(mut self, boundaries: Vec<Boundary>) -> Self {
        self.boundaries = boundaries;
        self
    }

    pub fn with_calibration(mut self, calibration: Calibration) -> Self {
        self.calibration = calibration;
        self
    }

    /// Number of rows, taken from the first column (or the boundaries).
    pub fn row_count(&self) -> usize {
        self.columns
            .values()
            .next()
            .map_or(self.boundaries.len(), Vec::len)
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    fn required_column(&self, kind: DistanceKind, name: &str) -> Result<&[f64]> {
        let values = self.column(name).ok_or_else(|| GraphError::MissingColumn {
            kind: kind.label(),
            column: name.to_string(),
        })?;
        let expected = self.row_count();
        if values.len() != expected {
            return Err(GraphError::ColumnLengthMismatch {
                column: name.to_string(),
                len: values.len(),
                expected,
            });
        }
        Ok(values)
    }

    /// The coordinate column pair for `kind`, as points.
    pub fn points(&self, kind: DistanceKind) -> Result<Vec<Point>> {
        let (xc, yc) = kind.columns();
        let xs = self.required_column(kind, xc)?;
        let ys = self.required_column(kind, yc)?;
        Ok(xs
            .iter()
            .zip(ys)
            .map(|(&x, &y)| Point::new(x, y))
            .collect())
    }

    /// Items for a run computing `kind` distances.
    ///
    /// Point kinds read their column pair. `Edges` needs the start-pixel
    /// columns and exactly one traced boundary per row.
    pub fn items(&self, kind: DistanceKind) -> Result<Vec<Item>> {
        match kind {
            DistanceKind::Centroids | DistanceKind::CentersOfMass => {
                Ok(self.points(kind)?.into_iter().map(Item::Point).collect())
            }
            DistanceKind::Edges => {
                let rows = self.points(kind)?.len();
                if self.boundaries.len() != rows {
                    return Err(GraphError::BoundaryCountMismatch {
                        boundaries: self.boundaries.len(),
                        rows,
                    });
                }
                Ok(self.boundaries.iter().cloned().map(Item::Boundary).collect())
            }
        }
    }

    /// Calibration under which `kind` distances are computed.
    ///
    /// Point columns are already in calibrated units; boundaries are raw
    /// pixels and take the image calibration.
    pub fn calibration_for(&self, kind: DistanceKind) -> Calibration {
        match kind {
            DistanceKind::Edges => self.calibration,
            DistanceKind::Centroids | DistanceKind::CentersOfMass => Calibration::IDENTITY,
        }
    }

    /// Seed pixel of each row for `kind`, truncated toward zero.
    pub fn seeds(&self, kind: DistanceKind) -> Result<Vec<(i64, i64)>> {
        Ok(self
            .points(kind)?
            .into_iter()
            .map(|p| (p.x.trunc() as i64, p.y.trunc() as i64))
            .collect())
    }
}
