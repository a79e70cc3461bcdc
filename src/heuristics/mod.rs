//! Heuristics module for the Euclidean TSP.
//!
//! This module exports the local search, the perturbation and the anytime
//! search loop that alternates between them.

pub mod local_search;
pub mod perturbation;
pub mod anytime;

pub use local_search::*;
pub use perturbation::*;
pub use anytime::*;
