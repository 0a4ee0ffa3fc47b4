//! Errors of the scheduling operations.

use lectern_config::ConfigError;
use lectern_core::PeriodId;
use lectern_solver::SolverError;
use thiserror::Error;

use crate::store::StoreError;

/// Error returned by every [`Scheduler`](crate::Scheduler) operation.
///
/// Nothing is written to the store when a run fails.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("no active academic period")]
    NoActivePeriod,

    #[error("{0} academic periods are active, expected exactly one")]
    AmbiguousActivePeriod(usize),

    #[error("unknown academic period {0}")]
    UnknownPeriod(PeriodId),

    #[error("solver error: {0}")]
    Solver(#[from] SolverError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
