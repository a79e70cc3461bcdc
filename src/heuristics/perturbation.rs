//! Double-bridge perturbation.
//!
//! The tour is cut into four contiguous segments `A B C D` and reassembled
//! as `A D C B`. No single 2-opt move undoes this, which is what lets the
//! search leave a 2-opt local optimum while keeping most good sub-paths.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::distance::DistanceMatrix;
use crate::solution::Tour;

/// Trait for moves that kick a tour out of a local optimum
pub trait Perturbation {
    /// Produce a new tour from `tour` without modifying it.
    fn perturb(&self, matrix: &DistanceMatrix, tour: &Tour, rng: &mut ChaCha8Rng) -> Tour;

    fn name(&self) -> &str;
}

/// Randomised 4-opt double-bridge move
#[derive(Debug, Clone, Copy, Default)]
pub struct DoubleBridge;

impl DoubleBridge {
    pub fn new() -> Self {
        DoubleBridge
    }

    /// Draw three strictly increasing cut positions. Each offset is uniform
    /// in `[1, n/4]` and they are accumulated, so the last cut stays below
    /// `3n/4 + 1 <= n - 1` and all four segments are non-empty for n >= 4.
    pub fn cut_points<R: Rng + ?Sized>(n: usize, rng: &mut R) -> (usize, usize, usize) {
        let max_offset = (n / 4).max(1);
        let first = rng.gen_range(1..=max_offset);
        let second = first + rng.gen_range(1..=max_offset);
        let third = second + rng.gen_range(1..=max_offset);
        (first, second, third)
    }

    /// Reassemble `A D C B` for the cuts `(p1, p2, p3)` and update the length
    /// from the four removed and four added edges.
    pub fn apply(matrix: &DistanceMatrix, tour: &Tour, cuts: (usize, usize, usize)) -> Tour {
        let (p1, p2, p3) = cuts;
        let t = &tour.order;
        let n = t.len();
        debug_assert!(0 < p1 && p1 < p2 && p2 < p3 && p3 < n);

        let mut order = Vec::with_capacity(n);
        order.extend_from_slice(&t[..p1]);
        order.extend_from_slice(&t[p3..]);
        order.extend_from_slice(&t[p2..p3]);
        order.extend_from_slice(&t[p1..p2]);

        let d = |a: usize, b: usize| matrix.get(t[a], t[b]);
        let removed = d(p1 - 1, p1) + d(p2 - 1, p2) + d(p3 - 1, p3) + d(n - 1, 0);
        let added = d(p1 - 1, p3) + d(n - 1, p2) + d(p3 - 1, p1) + d(p2 - 1, 0);

        Tour {
            order,
            length: tour.length + added - removed,
        }
    }
}

impl Perturbation for DoubleBridge {
    fn perturb(&self, matrix: &DistanceMatrix, tour: &Tour, rng: &mut ChaCha8Rng) -> Tour {
        let cuts = Self::cut_points(tour.len(), rng);
        Self::apply(matrix, tour, cuts)
    }

    fn name(&self) -> &str {
        "DoubleBridge"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::Point;
    use rand::SeedableRng;

    fn random_matrix(n: usize, seed: u64) -> DistanceMatrix {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let points: Vec<Point> = (0..n)
            .map(|_| Point::new(rng.gen_range(0.0..50.0), rng.gen_range(0.0..50.0)))
            .collect();
        DistanceMatrix::from_points(&points)
    }

    #[test]
    fn test_segments_are_reordered() {
        let matrix = random_matrix(8, 1);
        let tour = Tour::identity(&matrix);
        let result = DoubleBridge::apply(&matrix, &tour, (2, 4, 6));
        assert_eq!(result.order, vec![0, 1, 6, 7, 4, 5, 2, 3]);
        assert!((result.length - matrix.tour_length(&result.order)).abs() < 1e-9);
    }

    #[test]
    fn test_cut_points_are_increasing_and_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        for n in [4, 5, 7, 8, 13, 100, 1000] {
            for _ in 0..200 {
                let (p1, p2, p3) = DoubleBridge::cut_points(n, &mut rng);
                assert!(0 < p1 && p1 < p2 && p2 < p3 && p3 < n, "n={n} cuts=({p1},{p2},{p3})");
            }
        }
    }

    #[test]
    fn test_perturb_preserves_points_and_length() {
        let matrix = random_matrix(57, 4);
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let tour = Tour::random(&matrix, &mut rng);
        let original = tour.clone();

        for _ in 0..100 {
            let result = DoubleBridge::new().perturb(&matrix, &tour, &mut rng);

            let mut sorted = result.order.clone();
            sorted.sort_unstable();
            assert_eq!(sorted, (0..57).collect::<Vec<_>>());

            let exact = matrix.tour_length(&result.order);
            assert!((result.length - exact).abs() < 1e-6);
        }

        // the input tour is left untouched
        assert_eq!(tour, original);
    }

    #[test]
    fn test_four_points_only_rotate() {
        let matrix = random_matrix(4, 2);
        let tour = Tour::identity(&matrix);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let result = DoubleBridge::new().perturb(&matrix, &tour, &mut rng);
        assert_eq!(result.order, vec![0, 3, 2, 1]);
        assert!((result.length - tour.length).abs() < 1e-9);
    }
}
