//! Solver errors.

use lectern_config::ConfigError;
use thiserror::Error;

/// Reasons a run can fail.
#[derive(Debug, Error)]
pub enum SolverError {
    /// The configuration did not validate.
    #[error("invalid solver configuration: {0}")]
    Config(#[from] ConfigError),

    /// Sections exist but there is nowhere or no time to place them.
    #[error("cannot place {sections} sections: {rooms} rooms, {timeslots} timeslots")]
    EmptyDomain {
        sections: usize,
        rooms: usize,
        timeslots: usize,
    },

    /// The cancellation flag was raised before the run finished.
    #[error("solve cancelled")]
    Cancelled,
}

/// Result alias for solver operations.
pub type SolverResult<T> = Result<T, SolverError>;
