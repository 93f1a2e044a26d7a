//! Run parameters.
//!
//! Contains GraphParams and the parser for the macro-style option string
//! (`distance=Edges neighbors=10 lines labels matrix`).

use serde::{Deserialize, Serialize};

use crate::distance::NearestSearch;
use crate::error::{GraphError, Result};
use crate::item::DistanceKind;

/// Parameters for a clustering run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphParams {
    /// Which separation distance to compute.
    pub distance: DistanceKind,

    /// Items closer than this (in calibrated units) are neighbors.
    pub neighbors: f64,

    /// Emit the nearest-point segment of each connected pair.
    pub show_lines: bool,

    /// Emit a distance label for each connected pair.
    pub show_labels: bool,

    /// Export the full distance matrix.
    pub show_matrix: bool,

    /// Nearest boundary-point search strategy.
    pub search: NearestSearch,

    /// Minimum width of distance labels.
    pub distance_width: usize,

    /// Decimal places of distance labels.
    pub distance_precision: usize,
}

impl Default for GraphParams {
    fn default() -> Self {
        Self {
            distance: DistanceKind::Edges,
            neighbors: 10.0,
            show_lines: false,
            show_labels: false,
            show_matrix: false,
            search: NearestSearch::BruteForce,
            distance_width: 4,
            distance_precision: 1,
        }
    }
}

impl GraphParams {
    /// Parse an option string on top of the defaults.
    pub fn from_options(options: &str) -> Result<Self> {
        let mut params = Self::default();
        params.apply_options(options)?;
        Ok(params)
    }

    /// Apply an option string to these parameters.
    ///
    /// Tokens are separated by whitespace; values containing spaces may be
    /// bracketed (`distance=[Centers of Mass]`). Keys are case-insensitive.
    /// Unrecognized tokens are logged and skipped.
    pub fn apply_options(&mut self, options: &str) -> Result<()> {
        for token in tokenize(options) {
            let (key, value) = match token.split_once('=') {
                Some((k, v)) => (k, Some(unbracket(v))),
                None => (token.as_str(), None),
            };
            match (key.to_ascii_lowercase().as_str(), value) {
                ("mask", Some(name)) => {
                    tracing::debug!(mask = name, "mask selection is left to the caller");
                }
                ("neighbors", Some(v)) => {
                    self.neighbors = v
                        .trim()
                        .parse()
                        .map_err(|_| GraphError::InvalidOption(token.clone()))?;
                }
                ("distance", Some(v)) => self.distance = v.parse()?,
                ("search", Some(v)) => {
                    self.search = match v.to_ascii_lowercase().as_str() {
                        "brute" | "brute-force" => NearestSearch::BruteForce,
                        "indexed" | "index" => NearestSearch::Indexed,
                        _ => return Err(GraphError::InvalidOption(token.clone())),
                    };
                }
                ("labels", None) => self.show_labels = true,
                ("lines", None) => self.show_lines = true,
                ("matrix", None) => self.show_matrix = true,
                _ => tracing::warn!(argument = %token, "unrecognized argument"),
            }
        }
        self.validate()
    }

    /// Check the connection threshold.
    pub fn validate(&self) -> Result<()> {
        if self.neighbors.is_nan() || self.neighbors < 0.0 {
            return Err(GraphError::InvalidThreshold(self.neighbors));
        }
        Ok(())
    }

    /// Render a distance the way overlay labels show it.
    pub fn format_distance(&self, d: f64) -> String {
        format!(
            "{:width$.prec$}",
            d,
            width = self.distance_width,
            prec = self.distance_precision
        )
    }
}

fn tokenize(options: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    for c in options.chars() {
        match c {
            '[' => {
                depth += 1;
                current.push(c);
            }
            ']' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            c if c.is_whitespace() && depth == 0 => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

fn unbracket(value: &str) -> &str {
    value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_plugin_defaults() {
        let p = GraphParams::default();
        assert_eq!(p.distance, DistanceKind::Edges);
        assert_eq!(p.neighbors, 10.0);
        assert!(!p.show_lines && !p.show_labels && !p.show_matrix);
    }

    #[test]
    fn parses_full_option_string() {
        let p = GraphParams::from_options(
            "mask=blobs.gif distance=Centroids neighbors=35.5 lines labels matrix",
        )
        .unwrap();
        assert_eq!(p.distance, DistanceKind::Centroids);
        assert_eq!(p.neighbors, 35.5);
        assert!(p.show_lines && p.show_labels && p.show_matrix);
    }

    #[test]
    fn bracketed_values_keep_spaces() {
        let p = GraphParams::from_options("distance=[Centers of Mass] NEIGHBORS=[12]").unwrap();
        assert_eq!(p.distance, DistanceKind::CentersOfMass);
        assert_eq!(p.neighbors, 12.0);
    }

    #[test]
    fn unknown_tokens_are_skipped() {
        let p = GraphParams::from_options("verbose lines").unwrap();
        assert!(p.show_lines);
    }

    #[test]
    fn bad_values_are_errors() {
        assert!(matches!(
            GraphParams::from_options("neighbors=abc"),
            Err(GraphError::InvalidOption(t)) if t == "neighbors=abc"
        ));
        assert!(matches!(
            GraphParams::from_options("distance=Perimeter"),
            Err(GraphError::UnknownDistanceKind(_))
        ));
        assert!(matches!(
            GraphParams::from_options("neighbors=-2"),
            Err(GraphError::InvalidThreshold(_))
        ));
    }

    #[test]
    fn search_option() {
        let p = GraphParams::from_options("search=indexed").unwrap();
        assert_eq!(p.search, NearestSearch::Indexed);
    }

    #[test]
    fn distance_labels_use_width_and_precision() {
        let p = GraphParams::default();
        assert_eq!(p.format_distance(5.0), " 5.0");
        assert_eq!(p.format_distance(141.42), "141.4");
        let p = GraphParams {
            distance_width: 7,
            distance_precision: 3,
            ..GraphParams::default()
        };
        assert_eq!(p.format_distance(2.5), "  2.500");
    }
}
