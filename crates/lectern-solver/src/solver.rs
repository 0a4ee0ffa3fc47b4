//! Strategy dispatch.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;

use lectern_config::{AnnealingConfig, GeneticConfig, HybridMode, ScheduleConfig, StrategyConfig};
use lectern_core::{Penalty, Snapshot, Solution};
use lectern_scoring::Evaluator;
use tracing::{debug, info};

use crate::error::{SolverError, SolverResult};
use crate::phase::{AnnealingPhase, GeneticPhase, SolutionGenerator};
use crate::scope::SolverScope;
use crate::stats::SolverStats;
use crate::termination::{BestScoreTermination, Termination};

/// The outcome of a run.
#[derive(Debug, Clone)]
pub struct SolveResult {
    pub solution: Solution,
    pub score: Penalty,
    pub stats: SolverStats,
    /// Name of the strategy that ran, as in [`StrategyConfig::name`].
    pub strategy: &'static str,
}

/// Runs the configured strategy over one snapshot.
///
/// # Examples
///
/// ```
/// use lectern_config::ScheduleConfig;
/// use lectern_core::{Catalog, Penalty, Snapshot};
/// use lectern_solver::Solver;
///
/// let (snapshot, _) = Snapshot::build(Catalog::default());
/// let result = Solver::new(&snapshot, ScheduleConfig::default().with_random_seed(1))
///     .solve()
///     .unwrap();
///
/// assert!(result.solution.is_empty());
/// assert_eq!(result.score, Penalty::ZERO);
/// ```
#[derive(Debug, Clone)]
pub struct Solver<'a> {
    snapshot: &'a Snapshot,
    config: ScheduleConfig,
    terminate: Option<Arc<AtomicBool>>,
}

impl<'a> Solver<'a> {
    pub fn new(snapshot: &'a Snapshot, config: ScheduleConfig) -> Self {
        Self {
            snapshot,
            config,
            terminate: None,
        }
    }

    /// Aborts the run with [`SolverError::Cancelled`] once `flag` is set.
    pub fn with_terminate_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.terminate = Some(flag);
        self
    }

    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    /// Validates the configuration and runs the strategy to completion.
    ///
    /// # Errors
    ///
    /// - [`SolverError::Config`] if the configuration does not validate
    /// - [`SolverError::EmptyDomain`] if sections exist but rooms or timeslots do not
    /// - [`SolverError::Cancelled`] if the terminate flag is raised
    pub fn solve(&self) -> SolverResult<SolveResult> {
        self.config.validate()?;
        let snapshot = self.snapshot;
        let sections = snapshot.sections().len();
        let rooms = snapshot.rooms().len();
        let timeslots = snapshot.timeslots().len();
        if sections > 0 && (rooms == 0 || timeslots == 0) {
            return Err(SolverError::EmptyDomain {
                sections,
                rooms,
                timeslots,
            });
        }

        let strategy = self.config.strategy.name();
        info!(
            event = "solve_start",
            strategy = strategy,
            section_count = sections,
            room_count = rooms,
            timeslot_count = timeslots,
            random_seed = ?self.config.random_seed,
        );

        // One deadline for the whole run, however many scopes it opens.
        let deadline = self.config.time_limit().map(|limit| Instant::now() + limit);
        let daily_load = matches!(self.config.strategy, StrategyConfig::Hybrid(_));
        let evaluator =
            Evaluator::new(snapshot, self.config.penalties.clone()).with_daily_load(daily_load);
        let soft_ceiling = evaluator.soft_ceiling();
        let run = evaluator.clone();
        let (solution, score, stats) = match &self.config.strategy {
            StrategyConfig::Genetic(genetic) => self.run_genetic(run, genetic, deadline)?,
            StrategyConfig::Annealing(annealing) => {
                self.run_annealing(run, annealing, deadline)?
            }
            StrategyConfig::Hybrid(hybrid) => match hybrid.mode {
                HybridMode::Genetic => self.run_genetic(run, &hybrid.genetic, deadline)?,
                HybridMode::Annealing => self.run_annealing(run, &hybrid.annealing, deadline)?,
                HybridMode::Pipeline => {
                    self.run_pipeline(run, &hybrid.genetic, &hybrid.annealing, deadline)?
                }
                HybridMode::BestOf => {
                    self.run_best_of(run, &hybrid.genetic, &hybrid.annealing, deadline)?
                }
            },
        };

        for analysis in evaluator.explain(&solution).violated_constraints() {
            debug!(
                event = "constraint_violated",
                constraint = analysis.kind.name(),
                violations = analysis.violations,
                penalty = %analysis.penalty,
            );
        }

        info!(
            event = "solve_end",
            strategy = strategy,
            score = %score,
            feasible = score <= soft_ceiling,
            steps = stats.generations + stats.temperature_steps,
            moves_evaluated = stats.moves_evaluated,
            acceptance_rate = stats.acceptance_rate(),
            fallback_placements = stats.fallback_placements,
            duration_ms = stats.elapsed().as_millis() as u64,
        );

        Ok(SolveResult {
            solution,
            score,
            stats,
            strategy,
        })
    }

    /// Opens a scope whose time limit is what is left until `deadline`.
    fn scope(&self, evaluator: Evaluator<'a>, deadline: Option<Instant>) -> SolverScope<'a> {
        let mut scope = match self.config.random_seed {
            Some(seed) => SolverScope::with_seed(evaluator, seed),
            None => SolverScope::new(evaluator),
        };
        if let Some(deadline) = deadline {
            scope = scope.with_time_limit(deadline.saturating_duration_since(Instant::now()));
        }
        if let Some(flag) = &self.terminate {
            scope = scope.with_terminate_flag(Arc::clone(flag));
        }
        scope.start_solving();
        scope
    }

    fn run_genetic(
        &self,
        evaluator: Evaluator<'a>,
        config: &GeneticConfig,
        deadline: Option<Instant>,
    ) -> SolverResult<(Solution, Penalty, SolverStats)> {
        let mut scope = self.scope(evaluator, deadline);
        scope.checkpoint()?;
        GeneticPhase::new(config.clone()).solve(&mut scope)?;
        Ok(scope.into_result())
    }

    fn run_annealing(
        &self,
        evaluator: Evaluator<'a>,
        config: &AnnealingConfig,
        deadline: Option<Instant>,
    ) -> SolverResult<(Solution, Penalty, SolverStats)> {
        let mut scope = self.scope(evaluator, deadline);
        scope.checkpoint()?;
        let initial = generate_initial(&mut scope);
        AnnealingPhase::new(config.clone()).solve(&mut scope, initial)?;
        Ok(scope.into_result())
    }

    /// Anneals from the genetic algorithm's best.
    fn run_pipeline(
        &self,
        evaluator: Evaluator<'a>,
        genetic: &GeneticConfig,
        annealing: &AnnealingConfig,
        deadline: Option<Instant>,
    ) -> SolverResult<(Solution, Penalty, SolverStats)> {
        let mut scope = self.scope(evaluator, deadline);
        scope.checkpoint()?;
        GeneticPhase::new(genetic.clone()).solve(&mut scope)?;

        if !BestScoreTermination::perfect().is_terminated(&scope) {
            let seed = match scope.best_solution().cloned() {
                Some(best) => best,
                None => generate_initial(&mut scope),
            };
            AnnealingPhase::new(annealing.clone())
                .with_phase_index(1)
                .solve(&mut scope, seed)?;
        }
        Ok(scope.into_result())
    }

    /// Runs both strategies from the same seed and keeps the lower score.
    /// Ties go to the genetic algorithm. Both share one deadline, so the
    /// annealing run gets whatever time the genetic run left.
    fn run_best_of(
        &self,
        evaluator: Evaluator<'a>,
        genetic: &GeneticConfig,
        annealing: &AnnealingConfig,
        deadline: Option<Instant>,
    ) -> SolverResult<(Solution, Penalty, SolverStats)> {
        let by_genetic = self.run_genetic(evaluator.clone(), genetic, deadline)?;
        let by_annealing = self.run_annealing(evaluator, annealing, deadline)?;

        let (winner, loser) = if by_annealing.1 < by_genetic.1 {
            (by_annealing, by_genetic)
        } else {
            (by_genetic, by_annealing)
        };
        let (solution, score, mut stats) = winner;
        stats.absorb(&loser.2);
        Ok((solution, score, stats))
    }
}

fn generate_initial(scope: &mut SolverScope<'_>) -> Solution {
    let generator = SolutionGenerator::new(scope.snapshot());
    let initial = generator.generate(scope.rng());
    scope
        .stats_mut()
        .record_fallbacks(initial.fallback_count() as u64);
    initial
}
