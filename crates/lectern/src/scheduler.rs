//! Trigger operations: run a strategy, clear a schedule, audit conflicts.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use lectern_config::{
    AnnealingConfig, GeneticConfig, HybridConfig, PenaltyWeights, ScheduleConfig, StrategyConfig,
};
use lectern_core::{Penalty, PeriodId, Snapshot, SnapshotReport};
use lectern_solver::{Solver, SolverStats};
use tracing::info;

use crate::audit::{find_conflicts, AuditReport};
use crate::error::{ScheduleError, ScheduleResult};
use crate::materialize::{MaterializeError, Materializer};
use crate::record::{AcademicPeriod, TimetableRecord};
use crate::store::TimetableStore;

/// What a run wrote, and how it got there.
#[derive(Debug, Clone)]
pub struct ScheduleOutcome {
    pub period: PeriodId,
    /// The stored records, ids assigned.
    pub records: Vec<TimetableRecord>,
    pub score: Penalty,
    pub stats: SolverStats,
    pub strategy: &'static str,
    /// Assignments left out because they could not be formatted.
    pub skipped: Vec<MaterializeError>,
    /// Catalog problems found while building the snapshot.
    pub snapshot_report: SnapshotReport,
}

/// Runs scheduling operations against a [`TimetableStore`].
///
/// Every run reads the catalog once, searches in memory, and replaces the
/// active period's schedule in one write. A failed or cancelled run
/// leaves the previous schedule untouched.
///
/// # Examples
///
/// ```
/// use lectern::{AcademicPeriod, InMemoryStore, Scheduler};
/// use lectern_config::{GeneticConfig, ScheduleConfig};
/// use lectern_core::Catalog;
///
/// let store = InMemoryStore::new(Catalog::default())
///     .with_period(AcademicPeriod::new(1, "2024/2025 Ganjil").with_active(true));
/// let scheduler = Scheduler::new(store)
///     .with_config(ScheduleConfig::default().with_random_seed(7));
///
/// let outcome = scheduler.run_genetic(GeneticConfig::default()).unwrap();
/// assert!(outcome.records.is_empty());
/// assert!(scheduler.audit_conflicts().unwrap().is_clean());
/// ```
#[derive(Debug)]
pub struct Scheduler<S> {
    store: S,
    config: ScheduleConfig,
    terminate: Option<Arc<AtomicBool>>,
}

impl<S: TimetableStore> Scheduler<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            config: ScheduleConfig::default(),
            terminate: None,
        }
    }

    /// Base configuration: seed, weights, termination, materializer.
    /// Each run overrides the strategy it names.
    pub fn with_config(mut self, config: ScheduleConfig) -> Self {
        self.config = config;
        self
    }

    /// Runs started after `flag` is raised fail with
    /// [`SolverError::Cancelled`](lectern_solver::SolverError::Cancelled).
    pub fn with_terminate_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.terminate = Some(flag);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    /// The single active academic period.
    pub fn active_period(&self) -> ScheduleResult<AcademicPeriod> {
        let mut active: Vec<AcademicPeriod> = self
            .store
            .periods()?
            .into_iter()
            .filter(|p| p.active)
            .collect();
        match active.len() {
            0 => Err(ScheduleError::NoActivePeriod),
            1 => Ok(active.remove(0)),
            n => Err(ScheduleError::AmbiguousActivePeriod(n)),
        }
    }

    /// Runs the genetic algorithm with the configured weights.
    pub fn run_genetic(&self, params: GeneticConfig) -> ScheduleResult<ScheduleOutcome> {
        self.run(self.config.clone().with_strategy(StrategyConfig::Genetic(params)))
    }

    /// Runs simulated annealing with the configured weights.
    pub fn run_annealing(&self, params: AnnealingConfig) -> ScheduleResult<ScheduleOutcome> {
        self.run(self.config.clone().with_strategy(StrategyConfig::Annealing(params)))
    }

    /// Runs the hybrid strategy. The weight table comes only from
    /// `penalties`, and the daily-load term is scored.
    pub fn run_hybrid(
        &self,
        params: HybridConfig,
        penalties: PenaltyWeights,
    ) -> ScheduleResult<ScheduleOutcome> {
        self.run(
            self.config
                .clone()
                .with_strategy(StrategyConfig::Hybrid(params))
                .with_penalties(penalties),
        )
    }

    /// Runs whatever strategy `config` selects and replaces the active
    /// period's schedule with the result.
    pub fn run(&self, config: ScheduleConfig) -> ScheduleResult<ScheduleOutcome> {
        #[cfg(feature = "console")]
        lectern_console::init();

        config.validate()?;
        let period = self.active_period()?;
        let (snapshot, snapshot_report) = Snapshot::build(self.store.catalog()?);

        let mut solver = Solver::new(&snapshot, config.clone());
        if let Some(flag) = &self.terminate {
            solver = solver.with_terminate_flag(Arc::clone(flag));
        }
        let result = solver.solve()?;

        let materialized =
            Materializer::new(&snapshot, &config.materializer).materialize(period.id, &result.solution);
        let records = self.store.replace_schedule(period.id, materialized.records)?;
        info!(
            event = "materialize_end",
            period = period.id.get(),
            records = records.len() as u64,
            skipped = materialized.skipped.len() as u64,
        );

        Ok(ScheduleOutcome {
            period: period.id,
            records,
            score: result.score,
            stats: result.stats,
            strategy: result.strategy,
            skipped: materialized.skipped,
            snapshot_report,
        })
    }

    /// Deletes the active period's schedule.
    pub fn clear_schedule(&self) -> ScheduleResult<usize> {
        let period = self.active_period()?;
        let removed = self.store.clear_schedule(period.id)?;
        info!(
            event = "schedule_cleared",
            period = period.id.get(),
            removed = removed as u64,
        );
        Ok(removed)
    }

    /// Audits the active period's schedule.
    pub fn audit_conflicts(&self) -> ScheduleResult<AuditReport> {
        let period = self.active_period()?;
        self.audit_period(period.id)
    }

    /// Re-derives every conflict flag of `period` from its records.
    pub fn audit_period(&self, period: PeriodId) -> ScheduleResult<AuditReport> {
        if !self.store.periods()?.iter().any(|p| p.id == period) {
            return Err(ScheduleError::UnknownPeriod(period));
        }
        let records = self.store.records(period)?;
        let report = find_conflicts(&records);
        self.store.set_conflict_flags(period, &report.flagged())?;
        info!(
            event = "audit_end",
            period = period.get(),
            records = records.len() as u64,
            room_conflicts = report.room_conflicts.len() as u64,
            lecturer_conflicts = report.lecturer_conflicts.len() as u64,
            flagged = report.flagged().len() as u64,
        );
        Ok(report)
    }
}
