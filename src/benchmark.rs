//! Benchmarking module.
//!
//! Runs the anytime search several times on one instance with different
//! seeds and aggregates the results. Runs are independent and may execute
//! in parallel; each search stays single-threaded.

use std::fs::File;
use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, Distribution, Max, Min};

use crate::error::Result;
use crate::heuristics::anytime::{solve, SearchConfig};
use crate::instance::TspInstance;

/// Result of a single search run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub run: usize,
    pub seed: u64,
    pub instance: String,
    pub dimension: usize,
    /// Best tour length found
    pub length: f64,
    pub passes: usize,
    pub perturbations: usize,
    pub incumbent_updates: usize,
    /// Computation time in seconds
    pub time: f64,
}

/// Aggregated statistics over all runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkSummary {
    pub instance: String,
    pub runs: usize,
    pub best_length: f64,
    pub worst_length: f64,
    pub mean_length: f64,
    pub std_length: f64,
    pub mean_time: f64,
    pub mean_perturbations: f64,
}

/// Benchmark configuration
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Number of independent runs
    pub runs: usize,
    /// Search settings shared by every run; the seed is replaced per run
    pub search: SearchConfig,
    /// Run `r` uses seed `base_seed + r`, wrapping at `u64::MAX`
    pub base_seed: u64,
    /// Run in parallel
    pub parallel: bool,
    /// Draw a progress bar on stderr
    pub show_progress: bool,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        BenchmarkConfig {
            runs: 5,
            search: SearchConfig::default(),
            base_seed: 0,
            parallel: true,
            show_progress: false,
        }
    }
}

/// Benchmarking engine
pub struct Benchmark {
    config: BenchmarkConfig,
    results: Vec<RunResult>,
}

impl Benchmark {
    pub fn new(config: BenchmarkConfig) -> Self {
        Benchmark {
            config,
            results: Vec::new(),
        }
    }

    /// Run all configured searches on an instance and record their results
    pub fn run(&mut self, instance: &TspInstance) -> BenchmarkSummary {
        log::info!(
            "benchmark on {} (n={}): {} runs of {}ms",
            instance.name,
            instance.dimension(),
            self.config.runs,
            self.config.search.time_limit.as_millis()
        );

        let progress = if self.config.show_progress {
            let bar = ProgressBar::new(self.config.runs as u64);
            bar.set_style(
                ProgressStyle::with_template("{bar:40} {pos}/{len} runs [{elapsed_precise}]")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            bar
        } else {
            ProgressBar::hidden()
        };

        let single = |run: usize| {
            let seed = self.config.base_seed.wrapping_add(run as u64);
            let config = SearchConfig {
                seed: Some(seed),
                ..self.config.search.clone()
            };
            let outcome = solve(instance, &config);
            progress.inc(1);
            RunResult {
                run,
                seed,
                instance: instance.name.clone(),
                dimension: instance.dimension(),
                length: outcome.tour.length,
                passes: outcome.stats.passes,
                perturbations: outcome.stats.perturbations,
                incumbent_updates: outcome.stats.incumbent_updates,
                time: outcome.stats.elapsed_secs,
            }
        };

        let mut results: Vec<RunResult> = if self.config.parallel {
            (0..self.config.runs).into_par_iter().map(single).collect()
        } else {
            (0..self.config.runs).map(single).collect()
        };
        progress.finish_and_clear();

        let summary = summarize(&instance.name, &results);
        self.results.append(&mut results);
        summary
    }

    /// Summary of the recorded runs for one instance
    pub fn summary(&self, instance: &str) -> BenchmarkSummary {
        let runs: Vec<RunResult> = self
            .results
            .iter()
            .filter(|r| r.instance == instance)
            .cloned()
            .collect();
        summarize(instance, &runs)
    }

    /// Export results to CSV
    pub fn export_to_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        for result in &self.results {
            writer.serialize(result)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Generate summary report
    pub fn generate_report(&self, summary: &BenchmarkSummary) -> String {
        let mut report = String::new();

        report.push_str("========================================\n");
        report.push_str("        TSP Benchmark Report\n");
        report.push_str("========================================\n\n");
        report.push_str(&format!("Instance: {} ({} runs)\n", summary.instance, summary.runs));
        report.push_str("-".repeat(72).as_str());
        report.push('\n');
        report.push_str(&format!(
            "{:>6} {:>10} {:>14} {:>10} {:>14} {:>10}\n",
            "Run", "Seed", "Length", "Passes", "Perturbations", "Time"
        ));
        report.push_str("-".repeat(72).as_str());
        report.push('\n');

        for r in self.results.iter().filter(|r| r.instance == summary.instance) {
            report.push_str(&format!(
                "{:>6} {:>10} {:>14.2} {:>10} {:>14} {:>10.4}\n",
                r.run, r.seed, r.length, r.passes, r.perturbations, r.time
            ));
        }

        report.push_str("-".repeat(72).as_str());
        report.push('\n');
        report.push_str(&format!(
            "Best: {:.2}  Worst: {:.2}  Mean: {:.2}  Std: {:.2}\n",
            summary.best_length, summary.worst_length, summary.mean_length, summary.std_length
        ));
        report.push_str(&format!(
            "Mean time: {:.4}s  Mean perturbations: {:.1}\n",
            summary.mean_time, summary.mean_perturbations
        ));

        report
    }

    /// Get all results
    pub fn results(&self) -> &[RunResult] {
        &self.results
    }
}

fn summarize(instance: &str, runs: &[RunResult]) -> BenchmarkSummary {
    let lengths = Data::new(runs.iter().map(|r| r.length).collect::<Vec<f64>>());
    let times = Data::new(runs.iter().map(|r| r.time).collect::<Vec<f64>>());
    let perturbations = Data::new(runs.iter().map(|r| r.perturbations as f64).collect::<Vec<f64>>());

    let finite_or_zero = |v: Option<f64>| v.filter(|x| x.is_finite()).unwrap_or(0.0);

    BenchmarkSummary {
        instance: instance.to_string(),
        runs: runs.len(),
        best_length: if runs.is_empty() { 0.0 } else { lengths.min() },
        worst_length: if runs.is_empty() { 0.0 } else { lengths.max() },
        mean_length: finite_or_zero(lengths.mean()),
        std_length: finite_or_zero(lengths.std_dev()),
        mean_time: finite_or_zero(times.mean()),
        mean_perturbations: finite_or_zero(perturbations.mean()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::Point;
    use std::time::Duration;

    fn hexagon() -> TspInstance {
        let points = (0..6)
            .map(|k| {
                let a = k as f64 * std::f64::consts::PI / 3.0;
                Point::new(a.cos(), a.sin())
            })
            .collect();
        TspInstance::new("hexagon", points).unwrap()
    }

    fn quick_config(parallel: bool) -> BenchmarkConfig {
        BenchmarkConfig {
            runs: 3,
            search: SearchConfig {
                time_limit: Duration::from_millis(20),
                ..Default::default()
            },
            base_seed: 10,
            parallel,
            show_progress: false,
        }
    }

    #[test]
    fn test_benchmark_config() {
        let config = BenchmarkConfig::default();
        assert_eq!(config.runs, 5);
    }

    #[test]
    fn test_benchmark_runs_and_summarizes() {
        let instance = hexagon();
        for parallel in [false, true] {
            let mut bench = Benchmark::new(quick_config(parallel));
            let summary = bench.run(&instance);

            assert_eq!(bench.results().len(), 3);
            let seeds: Vec<u64> = bench.results().iter().map(|r| r.seed).collect();
            assert_eq!(seeds, vec![10, 11, 12]);

            // regular hexagon of unit radius: perimeter 6
            assert!((summary.best_length - 6.0).abs() < 1e-9);
            assert!(summary.best_length <= summary.mean_length + 1e-12);
            assert!(summary.mean_length <= summary.worst_length + 1e-12);
            assert_eq!(summary.runs, 3);
        }
    }

    #[test]
    fn test_seeds_wrap_near_max() {
        let mut config = quick_config(false);
        config.runs = 2;
        config.base_seed = u64::MAX;
        let mut bench = Benchmark::new(config);
        bench.run(&hexagon());

        let seeds: Vec<u64> = bench.results().iter().map(|r| r.seed).collect();
        assert_eq!(seeds, vec![u64::MAX, 0]);
    }

    #[test]
    fn test_export_and_report() {
        let instance = hexagon();
        let mut bench = Benchmark::new(quick_config(false));
        let summary = bench.run(&instance);

        let path = std::env::temp_dir().join(format!("anytime_tsp_bench_{}.csv", std::process::id()));
        bench.export_to_csv(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert!(content.starts_with("run,seed,instance,dimension,length"));
        assert_eq!(content.lines().count(), 4);

        let report = bench.generate_report(&summary);
        assert!(report.contains("hexagon"));
        assert_eq!(bench.summary("hexagon").runs, 3);
    }
}
