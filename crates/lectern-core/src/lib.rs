//! Lectern Core - domain model and snapshot types for course timetabling
//!
//! This crate provides the fundamental data for Lectern:
//! - Typed identifiers for sections, rooms, timeslots, lecturers and periods
//! - Catalog records as consumed from the storage collaborator
//! - The read-only [`Snapshot`] built once per scheduling run
//! - [`Solution`] and [`Assignment`], the candidate schedules searched over
//! - The [`Penalty`] score type (lower is better)

pub mod domain;
pub mod error;
pub mod ids;
pub mod score;
pub mod snapshot;
pub mod solution;

pub use domain::{
    Catalog, Course, CourseType, Lecturer, LecturerPreference, PriorityMeaning, Room, SectionRecord,
    TimeSlot,
};
pub use error::{DataIntegrityError, InfeasibleAssignment};
pub use ids::{LecturerId, PeriodId, RecordId, RoomId, SectionId, TimeslotId};
pub use score::Penalty;
pub use snapshot::{BlockExpansion, SectionInfo, Snapshot, SnapshotReport, RECESS_GAP_MINUTES};
pub use solution::{Assignment, Solution};
