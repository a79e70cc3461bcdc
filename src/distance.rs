//! Euclidean distances and the dense distance cache.
//!
//! The matrix is built once after all points are known and is read-only
//! afterwards; every heuristic consults it instead of recomputing distances.

use crate::instance::Point;

/// Euclidean distance between two points.
#[inline]
pub fn euclidean_distance(a: &Point, b: &Point) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

/// A dense n×n symmetric distance matrix stored in row-major order.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Compute all pairwise distances. Only the upper triangle is evaluated,
    /// the lower one is mirrored and the diagonal stays zero.
    pub fn from_points(points: &[Point]) -> Self {
        let n = points.len();
        let mut data = vec![0.0; n * n];

        for i in 0..n {
            for j in (i + 1)..n {
                let d = euclidean_distance(&points[i], &points[j]);
                data[i * n + j] = d;
                data[j * n + i] = d;
            }
        }

        DistanceMatrix { data, size: n }
    }

    /// Distance between points `i` and `j`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.size + j]
    }

    /// Number of points covered by the matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Length of the closed tour `order`, summed edge by edge.
    pub fn tour_length(&self, order: &[usize]) -> f64 {
        if order.len() < 2 {
            return 0.0;
        }

        let mut length = 0.0;
        for w in order.windows(2) {
            length += self.get(w[0], w[1]);
        }
        length += self.get(order[order.len() - 1], order[0]);

        length
    }
}
