//! Solver phases.
//!
//! - [`SolutionGenerator`] builds initial solutions
//! - [`GeneticPhase`] evolves a population
//! - [`AnnealingPhase`] improves a single solution

mod annealing;
mod construction;
mod genetic;

pub use annealing::AnnealingPhase;
pub use construction::SolutionGenerator;
pub use genetic::GeneticPhase;
