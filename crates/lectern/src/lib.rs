//! Lectern - course timetabling.
//!
//! Assigns every offered section to a room and a contiguous block of
//! timeslots, searching with a genetic algorithm, simulated annealing or a
//! hybrid of both, then writes the result as timetable records.
//!
//! # Example
//!
//! ```rust
//! use lectern::prelude::*;
//!
//! let store = InMemoryStore::new(Catalog::default())
//!     .with_period(AcademicPeriod::new(1, "2024/2025 Genap").with_active(true));
//! let scheduler = Scheduler::new(store);
//!
//! let outcome = scheduler.run_annealing(AnnealingConfig::default()).unwrap();
//! assert_eq!(outcome.score, Penalty::ZERO);
//! assert_eq!(scheduler.clear_schedule().unwrap(), 0);
//! ```

pub mod audit;
pub mod error;
pub mod materialize;
pub mod record;
mod scheduler;
pub mod store;

pub use audit::{find_conflicts, AuditReport};
pub use error::{ScheduleError, ScheduleResult};
pub use materialize::{MaterializeError, Materialized, Materializer};
pub use record::{AcademicPeriod, TimetableRecord};
pub use scheduler::{ScheduleOutcome, Scheduler};
pub use store::{InMemoryStore, StoreError, TimetableStore};

pub use lectern_config::{
    AnnealingConfig, GeneticConfig, HybridConfig, HybridMode, PenaltyWeights, ScheduleConfig,
    SelectionType, StrategyConfig,
};
pub use lectern_core::{Catalog, Penalty, Snapshot, Solution};
pub use lectern_scoring::{Evaluator, ScoreExplanation};
pub use lectern_solver::{SolveResult, Solver, SolverError, SolverStats};

pub mod prelude {
    pub use super::{
        AcademicPeriod, AnnealingConfig, Catalog, GeneticConfig, HybridConfig, HybridMode,
        InMemoryStore, Penalty, PenaltyWeights, ScheduleConfig, ScheduleError, Scheduler,
        TimetableRecord, TimetableStore,
    };
}
