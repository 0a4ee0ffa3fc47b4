//! Solver-level scope.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::{Duration, Instant};

use lectern_core::{Penalty, Snapshot, Solution};
use lectern_scoring::Evaluator;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::debug;

use crate::error::{SolverError, SolverResult};
use crate::stats::SolverStats;
use crate::termination::{ExternalTermination, Termination, TimeTermination};

/// State shared by every phase of one run.
///
/// Owns the evaluator, the seeded random generator, the best solution seen
/// so far and the run statistics.
pub struct SolverScope<'a> {
    evaluator: Evaluator<'a>,
    rng: ChaCha8Rng,
    start_time: Option<Instant>,
    stats: SolverStats,
    best: Option<(Solution, Penalty)>,
    time_limit: Option<TimeTermination>,
    cancel: Option<ExternalTermination>,
}

impl<'a> SolverScope<'a> {
    /// Creates a scope seeded from the operating system.
    pub fn new(evaluator: Evaluator<'a>) -> Self {
        Self::with_rng(evaluator, ChaCha8Rng::from_os_rng())
    }

    /// Creates a reproducible scope.
    pub fn with_seed(evaluator: Evaluator<'a>, seed: u64) -> Self {
        Self::with_rng(evaluator, ChaCha8Rng::seed_from_u64(seed))
    }

    fn with_rng(evaluator: Evaluator<'a>, rng: ChaCha8Rng) -> Self {
        Self {
            evaluator,
            rng,
            start_time: None,
            stats: SolverStats::default(),
            best: None,
            time_limit: None,
            cancel: None,
        }
    }

    /// Ends the run normally once `limit` has elapsed.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(TimeTermination::new(limit));
        self
    }

    /// Aborts the run with [`SolverError::Cancelled`] once `flag` is set.
    pub fn with_terminate_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(ExternalTermination::new(flag));
        self
    }

    pub fn start_solving(&mut self) {
        self.start_time = Some(Instant::now());
        self.stats.start();
    }

    pub fn elapsed(&self) -> Option<Duration> {
        self.start_time.map(|t| t.elapsed())
    }

    pub fn evaluator(&self) -> &Evaluator<'a> {
        &self.evaluator
    }

    pub fn snapshot(&self) -> &'a Snapshot {
        self.evaluator.snapshot()
    }

    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    pub fn stats(&self) -> &SolverStats {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut SolverStats {
        &mut self.stats
    }

    pub fn calculate_score(&mut self, solution: &Solution) -> Penalty {
        self.stats.record_score_calculations(1);
        self.evaluator.score(solution)
    }

    /// Scores a population on the rayon pool.
    ///
    /// Scoring draws no random numbers, so the result does not depend on
    /// thread scheduling.
    pub fn calculate_scores(&mut self, population: &[Solution]) -> Vec<Penalty> {
        let evaluator = &self.evaluator;
        let scores: Vec<Penalty> = population
            .par_iter()
            .map(|solution| evaluator.score(solution))
            .collect();
        self.stats.record_score_calculations(scores.len() as u64);
        scores
    }

    pub fn best_score(&self) -> Option<Penalty> {
        self.best.as_ref().map(|(_, score)| *score)
    }

    pub fn best_solution(&self) -> Option<&Solution> {
        self.best.as_ref().map(|(solution, _)| solution)
    }

    /// Records `solution` as the best if it beats the current best.
    ///
    /// Ties keep the earlier solution. Returns true on improvement.
    pub fn update_best(&mut self, solution: &Solution, score: Penalty) -> bool {
        let improved = self.best_score().map_or(true, |best| score < best);
        if improved {
            if self.best.is_some() {
                self.stats.record_improvement();
                debug!(event = "improvement", score = %score);
            }
            self.best = Some((solution.clone(), score));
        }
        improved
    }

    /// Checks the termination conditions between generations or
    /// temperature steps.
    ///
    /// Returns `Ok(true)` if the time limit is reached and the run should
    /// end normally.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::Cancelled`] if the terminate flag is set.
    pub fn checkpoint(&self) -> SolverResult<bool> {
        if self.is_cancelled() {
            return Err(SolverError::Cancelled);
        }
        Ok(self
            .time_limit
            .as_ref()
            .is_some_and(|limit| limit.is_terminated(self)))
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|cancel| cancel.is_terminated(self))
    }

    /// Consumes the scope, returning the best solution, its score and the
    /// frozen statistics.
    ///
    /// A scope that never recorded a best yields an empty solution.
    pub fn into_result(mut self) -> (Solution, Penalty, SolverStats) {
        self.stats.finish();
        let (solution, score) = self.best.unwrap_or_default();
        (solution, score, self.stats)
    }
}

impl std::fmt::Debug for SolverScope<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolverScope")
            .field("best_score", &self.best_score())
            .field("stats", &self.stats)
            .field("time_limit", &self.time_limit)
            .finish()
    }
}

#[cfg(test)]
mod tests;
