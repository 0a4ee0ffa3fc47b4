//! Lectern Solver Engine
//!
//! This crate provides the search side of Lectern:
//! - [`Solver`], dispatching the configured strategy
//! - Phases: solution generation, genetic algorithm, simulated annealing
//! - Placement heuristics and the relocate move
//! - Termination conditions and run statistics
//!
//! All randomness flows from the seeded generator held by the
//! [`SolverScope`], so a run with a fixed `random_seed` is reproducible.

pub mod error;
pub mod heuristic;
pub mod phase;
pub mod scope;
pub mod solver;
pub mod stats;
pub mod termination;

pub use error::{SolverError, SolverResult};
pub use heuristic::{Occupancy, RelocateMove};
pub use phase::{AnnealingPhase, GeneticPhase, SolutionGenerator};
pub use scope::SolverScope;
pub use solver::{SolveResult, Solver};
pub use stats::SolverStats;
pub use termination::{BestScoreTermination, ExternalTermination, Termination, TimeTermination};
