//! Placement heuristics shared by the generator and the search strategies.
//!
//! - [`Occupancy`] - room and lecturer bookkeeping for conflict-free placement
//! - [`candidate_starts`] - valid block starts, preferred ones first
//! - [`RelocateMove`] - moves one assignment to a new room and block

mod occupancy;
mod placement;
mod relocate;

pub use occupancy::Occupancy;
pub use placement::{candidate_starts, fallback_assignment, first_free_placement};
pub use relocate::{random_relocation, repairing_relocation, RelocateMove};
