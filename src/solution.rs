//! Tour representation.
//!
//! A tour is a permutation of point indices read as a closed cycle, plus a
//! running length that moves update incrementally instead of re-summing.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::collections::HashSet;

use crate::distance::DistanceMatrix;

/// A closed tour and its maintained length
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tour {
    /// Visiting order; the edge from the last index back to the first closes the cycle
    pub order: Vec<usize>,
    /// Maintained total length
    pub length: f64,
}

impl Tour {
    /// Build a tour from an explicit order, computing its length from scratch.
    pub fn from_order(order: Vec<usize>, matrix: &DistanceMatrix) -> Self {
        let length = matrix.tour_length(&order);
        Tour { order, length }
    }

    /// The identity order `0, 1, ..., n-1`
    pub fn identity(matrix: &DistanceMatrix) -> Self {
        Self::from_order((0..matrix.size()).collect(), matrix)
    }

    /// A uniformly random permutation of all points
    pub fn random<R: Rng + ?Sized>(matrix: &DistanceMatrix, rng: &mut R) -> Self {
        let mut order: Vec<usize> = (0..matrix.size()).collect();
        order.shuffle(rng);
        Self::from_order(order, matrix)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Apply a 2-opt move (reverse segment between i+1 and j) whose length
    /// change has already been evaluated as `delta`.
    pub fn apply_two_opt(&mut self, i: usize, j: usize, delta: f64) {
        self.order[i + 1..=j].reverse();
        self.length += delta;
    }

    /// Re-sum the tour and replace the maintained length with the exact value.
    /// Returns the drift that had accumulated (maintained minus exact).
    pub fn recompute_length(&mut self, matrix: &DistanceMatrix) -> f64 {
        let exact = matrix.tour_length(&self.order);
        let drift = self.length - exact;
        self.length = exact;
        drift
    }

    /// Check that every index `0..len` appears exactly once
    pub fn is_permutation(&self) -> bool {
        let n = self.order.len();
        let unique: HashSet<usize> = self.order.iter().copied().filter(|&v| v < n).collect();
        unique.len() == n
    }
}

impl std::fmt::Display for Tour {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for node in &self.order {
            writeln!(f, "{}", node)?;
        }
        Ok(())
    }
}
