//! Geometry primitives: points, traced boundaries and spatial calibration.

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, Result};

/// A 2-D point. Serialized as an `[x, y]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared straight-line distance to `other`.
    #[inline(always)]
    pub fn distance_sq(&self, other: &Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    /// Straight-line distance to `other`.
    ///
    /// Finite for any finite pair of points, even where the squared
    /// distance overflows.
    #[inline]
    pub fn distance_to(&self, other: &Point) -> f64 {
        let d2 = self.distance_sq(other);
        if d2.is_finite() {
            d2.sqrt()
        } else {
            (other.x - self.x).hypot(other.y - self.y)
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Ordered outline of a region, as produced by a region tracer.
///
/// Closure and simplicity are not checked; the boundary is treated as a
/// bag of outline points.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Boundary {
    points: Vec<Point>,
}

impl Boundary {
    pub const fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Bounding box as (x0, y0, x1, y1), or `None` for an empty boundary.
    pub fn bbox(&self) -> Option<(f64, f64, f64, f64)> {
        let first = self.points.first()?;
        Some(self.points.iter().fold(
            (first.x, first.y, first.x, first.y),
            |(x0, y0, x1, y1), p| (x0.min(p.x), y0.min(p.y), x1.max(p.x), y1.max(p.y)),
        ))
    }
}

impl From<Vec<Point>> for Boundary {
    fn from(points: Vec<Point>) -> Self {
        Self { points }
    }
}

impl FromIterator<Point> for Boundary {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

/// Maps raw pixel coordinates to calibrated spatial units.
///
/// `calibrate(p) = ((p.x - x_origin) * pixel_width, (p.y - y_origin) * pixel_height)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Calibration {
    pub pixel_width: f64,
    pub pixel_height: f64,
    pub x_origin: f64,
    pub y_origin: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Calibration {
    pub const IDENTITY: Self = Self {
        pixel_width: 1.0,
        pixel_height: 1.0,
        x_origin: 0.0,
        y_origin: 0.0,
    };

    /// Uniform scale with the origin at (0, 0).
    pub const fn scaled(pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            pixel_width,
            pixel_height,
            x_origin: 0.0,
            y_origin: 0.0,
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Pixel sizes must be finite and nonzero, origins finite.
    pub fn validate(&self) -> Result<()> {
        let scales = [
            ("pixel_width", self.pixel_width),
            ("pixel_height", self.pixel_height),
        ];
        for (field, value) in scales {
            if !value.is_finite() || value == 0.0 {
                return Err(GraphError::InvalidCalibration { field, value });
            }
        }
        for (field, value) in [("x_origin", self.x_origin), ("y_origin", self.y_origin)] {
            if !value.is_finite() {
                return Err(GraphError::InvalidCalibration { field, value });
            }
        }
        Ok(())
    }

    #[inline]
    pub fn x(&self, x: f64) -> f64 {
        (x - self.x_origin) * self.pixel_width
    }

    #[inline]
    pub fn y(&self, y: f64) -> f64 {
        (y - self.y_origin) * self.pixel_height
    }

    #[inline]
    pub fn calibrate(&self, p: Point) -> Point {
        Point::new(self.x(p.x), self.y(p.y))
    }
}

/// The pair of points realizing a minimum distance, in raw coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    /// Point `t` of the way from `start` to `end`.
    pub fn lerp(&self, t: f64) -> Point {
        Point::new(
            (self.end.x - self.start.x).mul_add(t, self.start.x),
            (self.end.y - self.start.y).mul_add(t, self.start.y),
        )
    }
}
