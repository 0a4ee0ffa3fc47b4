//! Error types for Lectern core

use thiserror::Error;

use crate::ids::{LecturerId, SectionId, TimeslotId};

/// A broken reference found while building a [`Snapshot`].
///
/// Never fatal: the offending record is logged and skipped.
///
/// [`Snapshot`]: crate::snapshot::Snapshot
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataIntegrityError {
    /// Section references a course code that does not exist.
    #[error("section {section} references unknown course {course_code:?}")]
    UnknownCourse {
        section: SectionId,
        course_code: String,
    },

    /// Course has zero credit hours.
    #[error("section {section} has non-positive credit hours (course {course_code:?})")]
    NonPositiveCreditHours {
        section: SectionId,
        course_code: String,
    },

    /// Section lists a lecturer that does not exist. The id is kept so that
    /// lecturer conflicts are still detected.
    #[error("section {section} references unknown lecturer {lecturer}")]
    UnknownLecturer {
        section: SectionId,
        lecturer: LecturerId,
    },

    /// Section lists one lecturer more than once. The repeats are dropped.
    #[error("section {section} lists lecturer {lecturer} more than once")]
    DuplicateLecturer {
        section: SectionId,
        lecturer: LecturerId,
    },

    /// Course block is longer than the whole timetable.
    #[error(
        "section {section} needs a block of {block_len} slots but only {timeslots} exist (course {course_code:?})"
    )]
    BlockTooLong {
        section: SectionId,
        course_code: String,
        block_len: u64,
        timeslots: usize,
    },

    /// Section lists a companion that does not exist. The link is dropped.
    #[error("section {section} references unknown companion section {companion}")]
    UnknownCompanion {
        section: SectionId,
        companion: SectionId,
    },

    /// Two sections share one id. The later record is skipped.
    #[error("duplicate section id {0}")]
    DuplicateSection(SectionId),

    /// Preference references a section that was not loaded.
    #[error("preference of lecturer {lecturer} references unknown section {section}")]
    UnknownPreferenceSection {
        section: SectionId,
        lecturer: LecturerId,
    },

    /// Two timeslots share one id. The later record is skipped.
    #[error("duplicate timeslot id {0}")]
    DuplicateTimeslot(TimeslotId),
}

/// A section for which no valid block could be found.
///
/// Resolved by a random fallback placement that later search is expected
/// to repair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no conflict-free contiguous block for section {section} (block length {block_len})")]
pub struct InfeasibleAssignment {
    pub section: SectionId,
    pub block_len: u32,
}
