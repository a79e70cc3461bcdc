//! 2-opt local search.
//!
//! A pass scans every pair of non-adjacent tour edges `(i, i+1)` and
//! `(j, j+1)`, including the edge that closes the cycle, and applies each
//! improving exchange as soon as it is found (first improvement). The scan
//! then carries on from the same `(i, j)` position with the updated tour.

use crate::distance::DistanceMatrix;
use crate::solution::Tour;

/// Moves must shorten the tour by more than this to be applied, so that
/// rounding noise cannot keep a pass "improving" forever.
pub const IMPROVEMENT_EPSILON: f64 = 1e-9;

/// Trait for local search improvement methods
pub trait LocalSearch {
    /// Run one full pass over the neighbourhood, applying improving moves in
    /// place. Returns whether at least one move was applied.
    fn improve_pass(&self, matrix: &DistanceMatrix, tour: &mut Tour) -> bool;

    /// Repeat passes until one reports no improvement. Returns the number of
    /// passes that did improve.
    fn improve(&self, matrix: &DistanceMatrix, tour: &mut Tour) -> usize {
        let mut improving = 0;
        while self.improve_pass(matrix, tour) {
            improving += 1;
        }
        improving
    }

    fn name(&self) -> &str;
}

/// 2-Opt Local Search
///
/// Reverses segments of the tour to reduce total distance.
#[derive(Debug, Clone, Copy, Default)]
pub struct TwoOptSearch;

impl TwoOptSearch {
    pub fn new() -> Self {
        TwoOptSearch
    }

    /// Length change of replacing edges `(t[i], t[i+1])` and `(t[j], t[j+1])`
    /// by `(t[i], t[j])` and `(t[i+1], t[j+1])`, indices taken modulo n.
    #[inline]
    pub fn delta(matrix: &DistanceMatrix, order: &[usize], i: usize, j: usize) -> f64 {
        let n = order.len();
        let a = order[i];
        let b = order[(i + 1) % n];
        let c = order[j];
        let d = order[(j + 1) % n];
        matrix.get(a, c) + matrix.get(b, d) - matrix.get(a, b) - matrix.get(c, d)
    }
}

impl LocalSearch for TwoOptSearch {
    fn improve_pass(&self, matrix: &DistanceMatrix, tour: &mut Tour) -> bool {
        let n = tour.len();
        if n < 4 {
            return false;
        }

        let mut improved = false;
        for i in 0..n - 2 {
            for j in i + 2..n {
                if i == 0 && j == n - 1 {
                    continue; // both edges touch order[0]
                }

                let delta = Self::delta(matrix, &tour.order, i, j);
                if delta < -IMPROVEMENT_EPSILON {
                    tour.apply_two_opt(i, j, delta);
                    improved = true;
                }
            }
        }

        improved
    }

    fn name(&self) -> &str {
        "2-Opt-FI"
    }
}
