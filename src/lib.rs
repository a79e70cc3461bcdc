//! Anytime Euclidean TSP Solver Library
//!
//! Computes short closed tours over 2-D points within a fixed wall-clock
//! budget. Optimality is not pursued beyond trivial sizes.
//!
//! # Features
//!
//! - Dense distance matrix computed once per instance
//! - First-improvement 2-opt local search
//! - Double-bridge perturbation of the best tour found so far
//! - Time-bounded iterated local search with incumbent tracking
//! - Plain stream and TSP-LIB input, benchmarking over multiple seeds
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use anytime_tsp::instance::{TspInstance, DEFAULT_MAX_POINTS};
//! use anytime_tsp::heuristics::{solve, SearchConfig};
//!
//! let instance = TspInstance::from_file("berlin52.tsp", DEFAULT_MAX_POINTS).unwrap();
//! let config = SearchConfig {
//!     time_limit: Duration::from_millis(500),
//!     ..Default::default()
//! };
//! let outcome = solve(&instance, &config);
//!
//! println!("Tour length: {:.2}", outcome.tour.length);
//! ```

pub mod error;
pub mod distance;
pub mod instance;
pub mod solution;
pub mod heuristics;
pub mod benchmark;
pub mod logging;

pub use distance::DistanceMatrix;
pub use error::{Error, Result};
pub use instance::{Point, TspInstance};
pub use solution::Tour;
