//! Spatial items and the distance kinds that select their representation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, Result};
use crate::geometry::{Boundary, Point};

/// How items are represented for a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Representation {
    /// A single point per item (centroid or center of mass).
    Point,
    /// A traced outline per item.
    Boundary,
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Point => f.write_str("point"),
            Self::Boundary => f.write_str("boundary"),
        }
    }
}

/// Which separation distance to compute between particles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DistanceKind {
    /// Nearest points on the traced outlines.
    #[default]
    Edges,
    /// Distance between centroids.
    Centroids,
    /// Distance between centers of mass.
    CentersOfMass,
}

impl DistanceKind {
    pub const ALL: [Self; 3] = [Self::Edges, Self::Centroids, Self::CentersOfMass];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Edges => "Edges",
            Self::Centroids => "Centroids",
            Self::CentersOfMass => "Centers of Mass",
        }
    }

    pub const fn representation(self) -> Representation {
        match self {
            Self::Edges => Representation::Boundary,
            Self::Centroids | Self::CentersOfMass => Representation::Point,
        }
    }

    /// Measurement columns holding the per-item coordinate.
    ///
    /// For `Edges` these are the seed pixels the outline was traced from.
    pub const fn columns(self) -> (&'static str, &'static str) {
        match self {
            Self::Edges => ("XStart", "YStart"),
            Self::Centroids => ("X", "Y"),
            Self::CentersOfMass => ("XM", "YM"),
        }
    }
}

impl fmt::Display for DistanceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DistanceKind {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "edges" | "edge" => Ok(Self::Edges),
            "centroids" | "centroid" => Ok(Self::Centroids),
            "centersofmass" | "centerofmass" => Ok(Self::CentersOfMass),
            _ => Err(GraphError::UnknownDistanceKind(s.to_string())),
        }
    }
}

/// One spatial entity, identified by its position in the item list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Item {
    Point(Point),
    Boundary(Boundary),
}

impl Item {
    pub const fn representation(&self) -> Representation {
        match self {
            Self::Point(_) => Representation::Point,
            Self::Boundary(_) => Representation::Boundary,
        }
    }

    pub const fn as_point(&self) -> Option<&Point> {
        match self {
            Self::Point(p) => Some(p),
            Self::Boundary(_) => None,
        }
    }

    pub const fn as_boundary(&self) -> Option<&Boundary> {
        match self {
            Self::Boundary(b) => Some(b),
            Self::Point(_) => None,
        }
    }
}

impl From<Point> for Item {
    fn from(p: Point) -> Self {
        Self::Point(p)
    }
}

impl From<Boundary> for Item {
    fn from(b: Boundary) -> Self {
        Self::Boundary(b)
    }
}

/// Check the run preconditions on an item list.
///
/// Rejects an empty list, items whose representation differs from
/// `expected`, empty boundaries and non-finite coordinates, reporting the
/// first offending index.
pub fn validate_items(items: &[Item], expected: Representation) -> Result<()> {
    if items.is_empty() {
        return Err(GraphError::EmptyInput);
    }
    for (index, item) in items.iter().enumerate() {
        match item {
            Item::Point(p) if expected == Representation::Point => {
                if !p.is_finite() {
                    return Err(GraphError::NonFiniteCoordinate { index });
                }
            }
            Item::Boundary(b) if expected == Representation::Boundary => {
                if b.is_empty() {
                    return Err(GraphError::DegenerateGeometry { index });
                }
                if !b.points().iter().all(Point::is_finite) {
                    return Err(GraphError::NonFiniteCoordinate { index });
                }
            }
            _ => return Err(GraphError::MixedRepresentation { index, expected }),
        }
    }
    Ok(())
}
