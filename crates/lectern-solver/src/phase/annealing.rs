//! Simulated annealing phase.

use std::time::Instant;

use lectern_config::AnnealingConfig;
use lectern_core::{Penalty, Solution};
use rand::Rng;
use tracing::{debug, info, trace};

use crate::error::SolverResult;
use crate::heuristic::random_relocation;
use crate::scope::SolverScope;
use crate::termination::{BestScoreTermination, Termination};

/// Single-trajectory search with Metropolis acceptance.
///
/// At each temperature `T` the phase tries `iterations_per_temp`
/// neighbours. A strictly lower score is always accepted; anything else is
/// accepted with probability `exp((current - neighbour) / T)`. `T` is
/// multiplied by `cooling_rate` after every step and the phase ends once
/// `T <= 1`, when the best-ever score reaches zero, or at the scope's time
/// limit.
#[derive(Debug, Clone)]
pub struct AnnealingPhase {
    config: AnnealingConfig,
    phase_index: usize,
}

impl AnnealingPhase {
    pub fn new(config: AnnealingConfig) -> Self {
        Self {
            config,
            phase_index: 0,
        }
    }

    pub fn with_phase_index(mut self, phase_index: usize) -> Self {
        self.phase_index = phase_index;
        self
    }

    pub fn config(&self) -> &AnnealingConfig {
        &self.config
    }

    /// Anneals from `initial`, leaving the best solution in `scope`.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::Cancelled`](crate::SolverError::Cancelled) if
    /// the terminate flag is raised.
    pub fn solve(&self, scope: &mut SolverScope<'_>, initial: Solution) -> SolverResult<()> {
        let started = Instant::now();
        info!(
            event = "phase_start",
            phase = "Simulated Annealing",
            phase_index = self.phase_index,
            initial_temperature = self.config.initial_temperature,
        );

        let snapshot = scope.snapshot();
        let mut current = initial;
        let mut current_score = scope.calculate_score(&current);
        scope.update_best(&current, current_score);

        let perfect = BestScoreTermination::perfect();
        let mut temperature = self.config.initial_temperature;
        let mut steps: u64 = 0;

        'cooling: while temperature > 1.0 {
            if scope.checkpoint()? || perfect.is_terminated(scope) {
                break;
            }

            for _ in 0..self.config.iterations_per_temp {
                let Some(relocation) = random_relocation(snapshot, &current, scope.rng()) else {
                    break 'cooling;
                };
                if relocation.assignment.fallback {
                    scope.stats_mut().record_fallbacks(1);
                }
                let Some(previous) = relocation.apply(&mut current) else {
                    break 'cooling;
                };

                let neighbour_score = scope.calculate_score(&current);
                let accepted = neighbour_score < current_score
                    || scope.rng().random::<f64>()
                        < acceptance_probability(current_score, neighbour_score, temperature);
                scope.stats_mut().record_move(accepted);
                trace!(
                    event = "step",
                    index = relocation.index,
                    score = %neighbour_score,
                    accepted = accepted,
                );

                if accepted {
                    current_score = neighbour_score;
                    if scope.update_best(&current, current_score) && perfect.is_terminated(scope) {
                        break 'cooling;
                    }
                } else {
                    current.set(relocation.index, previous);
                }
            }

            temperature *= self.config.cooling_rate;
            steps += 1;
            scope.stats_mut().record_temperature_step();
            debug!(
                event = "temperature",
                temperature = temperature,
                score = %current_score,
                best = %scope.best_score().unwrap_or(current_score),
            );
        }

        let best = scope
            .best_score()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "none".to_string());
        info!(
            event = "phase_end",
            phase = "Simulated Annealing",
            phase_index = self.phase_index,
            duration_ms = started.elapsed().as_millis() as u64,
            steps = steps,
            score = best,
        );
        Ok(())
    }
}

/// Metropolis criterion for minimisation.
fn acceptance_probability(current: Penalty, neighbour: Penalty, temperature: f64) -> f64 {
    let delta = current.value() as f64 - neighbour.value() as f64;
    (delta / temperature).exp()
}
