//! Pairwise distance matrix between items.
//!
//! Contains the N×N separation matrix, the nearest-segment map used by
//! overlays, and the builder that fills both from an item list:
//! - point items: straight-line distance between calibrated points
//! - boundary items: exact minimum over all boundary point pairs

mod nearest;

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::{DistanceDefect, GraphError, Result};
use crate::geometry::{Calibration, Point, Segment};
use crate::item::{Item, Representation, validate_items};

pub use nearest::{
    NearestPair, NearestSearch, PointIndex, nearest_pair_brute, nearest_pair_indexed,
};

/// Symmetric N×N matrix of separation distances in calibrated units.
///
/// The diagonal is never written and reads as `None`. Deserialized
/// matrices must be square, symmetric and hold finite non-negative values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDistanceMatrix")]
pub struct DistanceMatrix {
    n: usize,
    values: Vec<f64>,
}

#[derive(Deserialize)]
struct RawDistanceMatrix {
    n: usize,
    values: Vec<f64>,
}

impl TryFrom<RawDistanceMatrix> for DistanceMatrix {
    type Error = GraphError;

    fn try_from(raw: RawDistanceMatrix) -> Result<Self> {
        let RawDistanceMatrix { n, values } = raw;
        let expected = n.checked_mul(n).unwrap_or(usize::MAX);
        if values.len() != expected {
            return Err(GraphError::MalformedDistances(DistanceDefect::WrongLength {
                n,
                len: values.len(),
                expected,
            }));
        }
        for i in 0..n {
            for j in (i + 1)..n {
                let d = values[i * n + j];
                if !d.is_finite() || d < 0.0 {
                    return Err(GraphError::MalformedDistances(DistanceDefect::Invalid { i, j }));
                }
                if values[j * n + i] != d {
                    return Err(GraphError::MalformedDistances(DistanceDefect::Asymmetric {
                        i,
                        j,
                    }));
                }
            }
        }
        Ok(Self { n, values })
    }
}

impl DistanceMatrix {
    pub(crate) fn new(n: usize) -> Self {
        Self {
            n,
            values: vec![0.0; n * n],
        }
    }

    /// Number of items (rows and columns).
    pub const fn len(&self) -> usize {
        self.n
    }

    pub const fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Distance between `i` and `j`; `None` on the diagonal or out of range.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i == j || i >= self.n || j >= self.n {
            return None;
        }
        Some(self.values[i * self.n + j])
    }

    /// Write both `(i, j)` and `(j, i)`.
    pub(crate) fn set_pair(&mut self, i: usize, j: usize, d: f64) {
        self.values[i * self.n + j] = d;
        self.values[j * self.n + i] = d;
    }

    /// Row `i` with the diagonal cell as `None`.
    pub fn row(&self, i: usize) -> impl Iterator<Item = Option<f64>> + '_ {
        (0..self.n).map(move |j| self.get(i, j))
    }

    /// Upper-triangle entries `(i, j, d)` with `i < j`, row-major.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        (0..self.n).flat_map(move |i| {
            (i + 1..self.n).map(move |j| (i, j, self.values[i * self.n + j]))
        })
    }
}

/// Nearest-point segments for item pairs, keyed by the unordered pair.
///
/// Only pairs whose segment has nonzero length are present. Serialized as
/// a list of `{i, j, segment}` entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(into = "Vec<SegmentEntry>", from = "Vec<SegmentEntry>")]
pub struct NearestSegments {
    segments: BTreeMap<(usize, usize), Segment>,
}

impl NearestSegments {
    const fn key(i: usize, j: usize) -> (usize, usize) {
        if i <= j { (i, j) } else { (j, i) }
    }

    /// Segment between `i` and `j` in either order.
    pub fn get(&self, i: usize, j: usize) -> Option<&Segment> {
        self.segments.get(&Self::key(i, j))
    }

    /// Record `segment` unless it is degenerate. Returns whether it was kept.
    pub(crate) fn insert(&mut self, i: usize, j: usize, segment: Segment) -> bool {
        if segment.length() > 0.0 {
            self.segments.insert(Self::key(i, j), segment);
            true
        } else {
            false
        }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segments ordered by `(i, j)` with `i < j`.
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), &Segment)> {
        self.segments.iter().map(|(k, s)| (*k, s))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct SegmentEntry {
    i: usize,
    j: usize,
    segment: Segment,
}

impl From<NearestSegments> for Vec<SegmentEntry> {
    fn from(map: NearestSegments) -> Self {
        map.segments
            .into_iter()
            .map(|((i, j), segment)| SegmentEntry { i, j, segment })
            .collect()
    }
}

impl From<Vec<SegmentEntry>> for NearestSegments {
    fn from(entries: Vec<SegmentEntry>) -> Self {
        let mut map = Self::default();
        for e in entries {
            map.insert(e.i, e.j, e.segment);
        }
        map
    }
}

/// Output of the distance stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distances {
    pub matrix: DistanceMatrix,
    pub segments: NearestSegments,
}

/// Fills a [`DistanceMatrix`] and [`NearestSegments`] from an item list.
#[derive(Debug, Clone, Copy, Default)]
pub struct DistanceBuilder<'a> {
    calibration: Calibration,
    search: NearestSearch,
    cancel: Option<&'a AtomicBool>,
}

impl<'a> DistanceBuilder<'a> {
    pub fn new(calibration: Calibration) -> Self {
        Self {
            calibration,
            ..Self::default()
        }
    }

    pub const fn with_search(mut self, search: NearestSearch) -> Self {
        self.search = search;
        self
    }

    /// Abort with [`GraphError::Cancelled`] once `flag` is set.
    pub const fn with_cancel(mut self, flag: &'a AtomicBool) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn check_cancel(&self) -> Result<()> {
        match self.cancel {
            Some(flag) if flag.load(Ordering::Relaxed) => Err(GraphError::Cancelled),
            _ => Ok(()),
        }
    }

    /// Compute all pairwise distances for `items` under `representation`.
    ///
    /// Fails on an invalid calibration, on items whose calibrated
    /// coordinates are not finite, and on pairs whose distance overflows.
    pub fn build(&self, items: &[Item], representation: Representation) -> Result<Distances> {
        self.calibration.validate()?;
        validate_items(items, representation)?;
        let distances = match representation {
            Representation::Point => {
                let points: Vec<Point> =
                    items.iter().filter_map(Item::as_point).copied().collect();
                self.build_points(&points)?
            }
            Representation::Boundary => {
                let boundaries: Vec<&[Point]> = items
                    .iter()
                    .filter_map(Item::as_boundary)
                    .map(|b| b.points())
                    .collect();
                self.build_boundaries(&boundaries)?
            }
        };
        tracing::debug!(
            items = items.len(),
            %representation,
            search = ?self.search,
            segments = distances.segments.len(),
            "distance matrix built"
        );
        Ok(distances)
    }

    /// Calibrate a point of item `index`, rejecting non-finite results.
    fn calibrate(&self, index: usize, p: Point) -> Result<Point> {
        let c = self.calibration.calibrate(p);
        if c.is_finite() {
            Ok(c)
        } else {
            Err(GraphError::NonFiniteCoordinate { index })
        }
    }

    fn build_points(&self, points: &[Point]) -> Result<Distances> {
        let n = points.len();
        let calibrated: Vec<Point> = points
            .iter()
            .enumerate()
            .map(|(i, p)| self.calibrate(i, *p))
            .collect::<Result<_>>()?;
        let mut matrix = DistanceMatrix::new(n);
        let mut segments = NearestSegments::default();
        for i in 0..n {
            self.check_cancel()?;
            for j in (i + 1)..n {
                let d = calibrated[i].distance_to(&calibrated[j]);
                if !d.is_finite() {
                    return Err(GraphError::DistanceOverflow { i, j });
                }
                matrix.set_pair(i, j, d);
                segments.insert(i, j, Segment::new(points[i], points[j]));
            }
        }
        Ok(Distances { matrix, segments })
    }

    fn build_boundaries(&self, boundaries: &[&[Point]]) -> Result<Distances> {
        let n = boundaries.len();
        let calibrated: Vec<Vec<Point>> = boundaries
            .iter()
            .enumerate()
            .map(|(i, b)| {
                b.iter()
                    .map(|p| self.calibrate(i, *p))
                    .collect::<Result<Vec<Point>>>()
            })
            .collect::<Result<_>>()?;
        let indexes: Vec<PointIndex> = match self.search {
            NearestSearch::BruteForce => Vec::new(),
            NearestSearch::Indexed => calibrated.iter().map(|b| PointIndex::new(b)).collect(),
        };

        let mut matrix = DistanceMatrix::new(n);
        let mut segments = NearestSegments::default();
        for i in 0..n {
            self.check_cancel()?;
            for j in (i + 1)..n {
                let pair = match self.search {
                    NearestSearch::BruteForce => nearest_pair_brute(&calibrated[i], &calibrated[j]),
                    NearestSearch::Indexed => nearest_pair_indexed(&calibrated[i], &indexes[j]),
                };
                // validate_items guarantees non-empty boundaries
                let Some(pair) = pair else {
                    return Err(GraphError::DegenerateGeometry {
                        index: if calibrated[i].is_empty() { i } else { j },
                    });
                };
                // all squared separations overflowed; the chosen pair is meaningless
                if !pair.dist_sq.is_finite() {
                    return Err(GraphError::DistanceOverflow { i, j });
                }
                matrix.set_pair(i, j, pair.distance());
                segments.insert(
                    i,
                    j,
                    Segment::new(boundaries[i][pair.a], boundaries[j][pair.b]),
                );
            }
        }
        Ok(Distances { matrix, segments })
    }
}
