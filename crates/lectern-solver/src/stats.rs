//! Solver statistics.
//!
//! Plain counters for tracking what a run did.

use std::time::{Duration, Instant};

/// Run-level statistics.
///
/// # Example
///
/// ```
/// use lectern_solver::stats::SolverStats;
///
/// let mut stats = SolverStats::default();
/// stats.start();
/// stats.record_generation();
/// stats.record_move(true);
/// stats.record_move(false);
///
/// assert_eq!(stats.generations, 1);
/// assert_eq!(stats.moves_evaluated, 2);
/// assert_eq!(stats.moves_accepted, 1);
/// assert_eq!(stats.acceptance_rate(), 0.5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SolverStats {
    start_time: Option<Instant>,
    finished: Option<Duration>,
    /// Genetic generations completed.
    pub generations: u64,
    /// Annealing temperature steps completed.
    pub temperature_steps: u64,
    /// Neighbours evaluated by simulated annealing.
    pub moves_evaluated: u64,
    /// Neighbours accepted by simulated annealing.
    pub moves_accepted: u64,
    /// Total score calculations performed.
    pub score_calculations: u64,
    /// Placements that fell back to a random room and start.
    pub fallback_placements: u64,
    /// Times the best-ever score improved.
    pub improvements: u64,
}

impl SolverStats {
    /// Marks the start of solving.
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
        self.finished = None;
    }

    /// Freezes the elapsed time.
    pub fn finish(&mut self) {
        self.finished = Some(self.elapsed());
    }

    /// Time since [`start`](Self::start), or the frozen duration once finished.
    pub fn elapsed(&self) -> Duration {
        self.finished
            .or_else(|| self.start_time.map(|t| t.elapsed()))
            .unwrap_or_default()
    }

    pub fn record_generation(&mut self) {
        self.generations += 1;
    }

    pub fn record_temperature_step(&mut self) {
        self.temperature_steps += 1;
    }

    /// Records a move evaluation and whether it was accepted.
    pub fn record_move(&mut self, accepted: bool) {
        self.moves_evaluated += 1;
        if accepted {
            self.moves_accepted += 1;
        }
    }

    pub fn record_score_calculations(&mut self, count: u64) {
        self.score_calculations += count;
    }

    pub fn record_fallbacks(&mut self, count: u64) {
        self.fallback_placements += count;
    }

    pub fn record_improvement(&mut self) {
        self.improvements += 1;
    }

    /// Adds the counters of another run. The elapsed time is the longer one.
    pub fn absorb(&mut self, other: &SolverStats) {
        self.generations += other.generations;
        self.temperature_steps += other.temperature_steps;
        self.moves_evaluated += other.moves_evaluated;
        self.moves_accepted += other.moves_accepted;
        self.score_calculations += other.score_calculations;
        self.fallback_placements += other.fallback_placements;
        self.improvements += other.improvements;
        if other.elapsed() > self.elapsed() {
            self.finished = Some(other.elapsed());
        }
    }

    /// Returns the acceptance rate (accepted / evaluated).
    pub fn acceptance_rate(&self) -> f64 {
        if self.moves_evaluated == 0 {
            0.0
        } else {
            self.moves_accepted as f64 / self.moves_evaluated as f64
        }
    }
}
