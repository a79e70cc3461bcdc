//! Anytime iterated local search.
//!
//! The loop alternates two phases until the wall-clock budget is spent:
//! - intensify: run 2-opt passes on the working tour until one finds nothing,
//! - diversify: record the converged tour if it beats the incumbent, then
//!   restart from a double-bridge of the incumbent.
//!
//! The deadline is only checked before a new pass, so a pass or perturbation
//! already in flight always completes.

use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::distance::DistanceMatrix;
use crate::heuristics::local_search::{LocalSearch, TwoOptSearch};
use crate::heuristics::perturbation::{DoubleBridge, Perturbation};
use crate::instance::TspInstance;
use crate::solution::Tour;

/// Search budget used when none is given; leaves a margin under two seconds
/// for writing the answer.
pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_millis(1980);

/// Relative drift between maintained and re-summed length worth reporting.
const DRIFT_TOLERANCE: f64 = 1e-6;

/// Search configuration
#[derive(Debug, Clone, Serialize)]
pub struct SearchConfig {
    /// Wall-clock budget for the whole loop
    pub time_limit: Duration,
    /// Random seed; drawn from OS entropy when absent
    pub seed: Option<u64>,
    /// Optional cap on double-bridge applications
    pub max_perturbations: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            time_limit: DEFAULT_TIME_LIMIT,
            seed: None,
            max_perturbations: None,
        }
    }
}

/// Incumbent length at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IncumbentRecord {
    pub elapsed_secs: f64,
    pub length: f64,
}

/// What happened during a search
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchStats {
    /// Seed of the random source (`None` when the search was bypassed)
    pub seed: Option<u64>,
    /// 2-opt passes started
    pub passes: usize,
    /// Passes that applied at least one move
    pub improving_passes: usize,
    /// Double-bridge applications
    pub perturbations: usize,
    /// Times the incumbent was replaced
    pub incumbent_updates: usize,
    pub initial_length: f64,
    pub best_length: f64,
    pub elapsed_secs: f64,
    /// Incumbent length after the initial tour and after every update
    pub history: Vec<IncumbentRecord>,
}

/// Best tour found plus statistics
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub tour: Tour,
    pub stats: SearchStats,
}

/// Time-bounded alternation of a local search and a perturbation
pub struct AnytimeSearch<'a, L = TwoOptSearch, P = DoubleBridge> {
    matrix: &'a DistanceMatrix,
    local_search: L,
    perturbation: P,
    config: SearchConfig,
}

impl<'a> AnytimeSearch<'a> {
    /// 2-opt with double-bridge kicks
    pub fn new(matrix: &'a DistanceMatrix, config: SearchConfig) -> Self {
        Self::with_operators(matrix, TwoOptSearch::new(), DoubleBridge::new(), config)
    }
}

impl<'a, L: LocalSearch, P: Perturbation> AnytimeSearch<'a, L, P> {
    pub fn with_operators(
        matrix: &'a DistanceMatrix,
        local_search: L,
        perturbation: P,
        config: SearchConfig,
    ) -> Self {
        AnytimeSearch {
            matrix,
            local_search,
            perturbation,
            config,
        }
    }

    /// Run until the deadline (or perturbation cap) and return the incumbent.
    /// With fewer than four points the identity order is returned unsearched.
    pub fn run(&self) -> SearchOutcome {
        if self.matrix.size() < 4 {
            return identity_outcome(self.matrix);
        }

        let start = Instant::now();
        let deadline = start + self.config.time_limit;
        let matrix = self.matrix;

        let seed = self.config.seed.unwrap_or_else(rand::random);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        log::info!(
            "search: n={} seed={} budget={}ms ({} + {})",
            matrix.size(),
            seed,
            self.config.time_limit.as_millis(),
            self.local_search.name(),
            self.perturbation.name()
        );

        let mut working = Tour::random(matrix, &mut rng);
        let mut best = working.clone();

        let mut stats = SearchStats {
            seed: Some(seed),
            initial_length: best.length,
            history: vec![IncumbentRecord {
                elapsed_secs: 0.0,
                length: best.length,
            }],
            ..Default::default()
        };

        while Instant::now() < deadline {
            stats.passes += 1;
            if self.local_search.improve_pass(matrix, &mut working) {
                stats.improving_passes += 1;
                continue;
            }

            let drift = working.recompute_length(matrix);
            if drift.abs() > DRIFT_TOLERANCE * working.length.max(1.0) {
                log::warn!("tour length drifted by {:e}, resynchronised", drift);
            }

            if working.length < best.length {
                let elapsed_secs = start.elapsed().as_secs_f64();
                log::debug!(
                    "incumbent improved {:.4} -> {:.4} at {:.3}s",
                    best.length,
                    working.length,
                    elapsed_secs
                );
                stats.incumbent_updates += 1;
                stats.history.push(IncumbentRecord {
                    elapsed_secs,
                    length: working.length,
                });
                best = working;
            }

            if let Some(max) = self.config.max_perturbations {
                if stats.perturbations >= max {
                    break;
                }
            }

            working = self.perturbation.perturb(matrix, &best, &mut rng);
            stats.perturbations += 1;
        }

        stats.best_length = best.length;
        stats.elapsed_secs = start.elapsed().as_secs_f64();
        log::info!(
            "search done: passes={} perturbations={} updates={} length {:.4} -> {:.4} in {:.3}s",
            stats.passes,
            stats.perturbations,
            stats.incumbent_updates,
            stats.initial_length,
            stats.best_length,
            stats.elapsed_secs
        );

        SearchOutcome { tour: best, stats }
    }
}

/// Solve an instance. Three points or fewer are returned in identity order,
/// which is already optimal; larger instances run the anytime search.
pub fn solve(instance: &TspInstance, config: &SearchConfig) -> SearchOutcome {
    let matrix = &instance.matrix;

    if instance.dimension() <= 3 {
        return identity_outcome(matrix);
    }

    AnytimeSearch::new(matrix, config.clone()).run()
}

fn identity_outcome(matrix: &DistanceMatrix) -> SearchOutcome {
    log::info!("n={} needs no search, emitting identity order", matrix.size());
    let tour = Tour::identity(matrix);
    let stats = SearchStats {
        initial_length: tour.length,
        best_length: tour.length,
        ..Default::default()
    };
    SearchOutcome { tour, stats }
}
