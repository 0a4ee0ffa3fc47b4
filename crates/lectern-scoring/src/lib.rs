//! Constraint evaluation for Lectern.
//!
//! A single [`Evaluator`] scores every candidate [`Solution`] of a run
//! against one weight table. Hard conflicts (double-booked rooms and
//! lecturers, broken blocks) always dominate the soft terms; see
//! [`Evaluator::score`] for the exact formula.
//!
//! [`Evaluator::explain`] returns the same total together with a
//! per-constraint breakdown.
//!
//! [`Solution`]: lectern_core::Solution

pub mod analysis;
pub mod evaluator;

pub use analysis::{ConstraintAnalysis, ConstraintKind, ScoreExplanation};
pub use evaluator::Evaluator;
