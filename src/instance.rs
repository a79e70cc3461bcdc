//! Module for parsing and representing Euclidean TSP instances.
//!
//! Two textual formats are accepted:
//! - the plain stream `N x0 y0 x1 y1 ...` (tokens separated by any whitespace),
//! - TSP-LIB files with a `NODE_COORD_SECTION`.
//!
//! Point `i` is the `i`-th coordinate pair read; every later component is
//! index-based, so the input order is preserved exactly.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::distance::DistanceMatrix;
use crate::error::{Error, Result};

/// Largest instance accepted by default. The distance matrix holds n² `f64`,
/// so this caps its footprint at roughly 200 MB.
pub const DEFAULT_MAX_POINTS: usize = 5000;

/// A point in the plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// A complete Euclidean TSP instance
#[derive(Debug, Clone)]
pub struct TspInstance {
    /// Name of the instance (file stem, TSP-LIB `NAME`, or "stdin")
    pub name: String,
    /// Points in input order
    pub points: Vec<Point>,
    /// Precomputed distance matrix
    pub matrix: DistanceMatrix,
}

impl TspInstance {
    /// Build an instance with the default capacity limit.
    pub fn new(name: impl Into<String>, points: Vec<Point>) -> Result<Self> {
        Self::with_limit(name, points, DEFAULT_MAX_POINTS)
    }

    /// Build an instance, rejecting more than `limit` points.
    pub fn with_limit(name: impl Into<String>, points: Vec<Point>, limit: usize) -> Result<Self> {
        if points.len() > limit {
            return Err(Error::TooManyPoints {
                count: points.len(),
                limit,
            });
        }

        let start = std::time::Instant::now();
        let matrix = DistanceMatrix::from_points(&points);
        log::debug!(
            "distance matrix built: n={} in {:.3}ms",
            points.len(),
            start.elapsed().as_secs_f64() * 1000.0
        );

        Ok(TspInstance {
            name: name.into(),
            points,
            matrix,
        })
    }

    /// Number of points
    pub fn dimension(&self) -> usize {
        self.points.len()
    }

    /// Get the distance between two points
    #[inline]
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        self.matrix.get(i, j)
    }

    /// Parse an instance from a file, detecting the format from its content.
    pub fn from_file<P: AsRef<Path>>(path: P, limit: usize) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "instance".to_string());
        Self::from_reader(BufReader::new(file), &name, limit)
    }

    /// Parse an instance from any reader, detecting the format from its content.
    pub fn from_reader<R: Read>(mut reader: R, name: &str, limit: usize) -> Result<Self> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;

        let first = content
            .split_whitespace()
            .next()
            .ok_or_else(|| Error::parse("empty input"))?;

        let (name, points) = if first.parse::<usize>().is_ok() {
            (name.to_string(), parse_plain(&content)?)
        } else {
            let (tsplib_name, points) = parse_tsplib(&content)?;
            (tsplib_name.unwrap_or_else(|| name.to_string()), points)
        };

        log::info!("loaded instance {}: n={}", name, points.len());
        Self::with_limit(name, points, limit)
    }

    /// Get statistics about the instance
    pub fn statistics(&self) -> InstanceStatistics {
        let n = self.dimension();

        let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
        for p in &self.points {
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
            min_y = min_y.min(p.y);
            max_y = max_y.max(p.y);
        }
        if n == 0 {
            (min_x, max_x, min_y, max_y) = (0.0, 0.0, 0.0, 0.0);
        }

        let mut total = 0.0;
        let mut max_distance: f64 = 0.0;
        for i in 0..n {
            for j in (i + 1)..n {
                let d = self.distance(i, j);
                total += d;
                max_distance = max_distance.max(d);
            }
        }
        let pairs = n * n.saturating_sub(1) / 2;
        let avg_distance = if pairs > 0 { total / pairs as f64 } else { 0.0 };

        InstanceStatistics {
            name: self.name.clone(),
            dimension: n,
            min_x,
            max_x,
            min_y,
            max_y,
            avg_distance,
            max_distance,
        }
    }
}

/// Parse the plain stream: a point count followed by that many `x y` pairs.
/// Tokens may be spread across lines in any way; trailing tokens are ignored.
pub fn parse_plain(content: &str) -> Result<Vec<Point>> {
    let mut tokens = content
        .lines()
        .enumerate()
        .flat_map(|(ln, line)| line.split_whitespace().map(move |t| (ln + 1, t)));

    let (ln, count) = tokens.next().ok_or_else(|| Error::parse("empty input"))?;
    let declared: usize = count
        .parse()
        .map_err(|_| Error::parse_at(ln, format!("invalid point count '{count}'")))?;

    let mut coord = |axis: &str, found: usize| -> Result<f64> {
        let (ln, tok) = tokens.next().ok_or(Error::MissingCoordinates { declared, found })?;
        tok.parse::<f64>()
            .map_err(|_| Error::parse_at(ln, format!("invalid {axis} coordinate '{tok}'")))
    };

    let mut points = Vec::with_capacity(declared.min(DEFAULT_MAX_POINTS));
    for found in 0..declared {
        let x = coord("x", found)?;
        let y = coord("y", found)?;
        points.push(Point::new(x, y));
    }

    Ok(points)
}

/// Parse a TSP-LIB file. Returns the `NAME` header when present and the
/// points of the `NODE_COORD_SECTION` in order of appearance.
pub fn parse_tsplib(content: &str) -> Result<(Option<String>, Vec<Point>)> {
    let mut name = None;
    let mut dimension: Option<usize> = None;
    let mut points = Vec::new();
    let mut in_coords = false;

    for (idx, line) in content.lines().enumerate() {
        let ln = idx + 1;
        let line = line.trim();

        if line.is_empty() {
            continue;
        }
        if line == "EOF" {
            break;
        }

        if in_coords {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 3 {
                // another section begins
                in_coords = false;
                continue;
            }
            let x: f64 = parts[1]
                .parse()
                .map_err(|_| Error::parse_at(ln, format!("invalid x coordinate '{}'", parts[1])))?;
            let y: f64 = parts[2]
                .parse()
                .map_err(|_| Error::parse_at(ln, format!("invalid y coordinate '{}'", parts[2])))?;
            points.push(Point::new(x, y));
            continue;
        }

        if line.starts_with("NODE_COORD_SECTION") {
            in_coords = true;
            continue;
        }

        if let Some((key, value)) = line.split_once(':') {
            let value = value.trim();
            match key.trim() {
                "NAME" => name = Some(value.to_string()),
                "DIMENSION" => {
                    dimension = Some(
                        value
                            .parse()
                            .map_err(|_| Error::parse_at(ln, format!("invalid dimension '{value}'")))?,
                    )
                }
                "EDGE_WEIGHT_TYPE" if value != "EUC_2D" => {
                    log::warn!("edge weight type {value} treated as EUC_2D");
                }
                _ => {}
            }
        }
    }

    if points.is_empty() {
        return Err(Error::parse("no NODE_COORD_SECTION entries found"));
    }
    if let Some(declared) = dimension {
        if points.len() < declared {
            return Err(Error::MissingCoordinates {
                declared,
                found: points.len(),
            });
        }
        points.truncate(declared);
    }

    Ok((name, points))
}

/// Statistics about a TSP instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceStatistics {
    pub name: String,
    pub dimension: usize,
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub avg_distance: f64,
    pub max_distance: f64,
}

impl std::fmt::Display for InstanceStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Instance: {}", self.name)?;
        writeln!(f, "  Points: {}", self.dimension)?;
        writeln!(
            f,
            "  Bounding box: [{:.2}, {:.2}] x [{:.2}, {:.2}]",
            self.min_x, self.max_x, self.min_y, self.max_y
        )?;
        writeln!(f, "  Avg distance: {:.2}", self.avg_distance)?;
        writeln!(f, "  Max distance: {:.2}", self.max_distance)
    }
}
