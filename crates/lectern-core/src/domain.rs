//! Catalog records consumed from the storage collaborator.
//!
//! These are plain data, joined and validated into a [`Snapshot`] at the
//! start of each run.
//!
//! [`Snapshot`]: crate::snapshot::Snapshot

use std::collections::BTreeSet;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::ids::{LecturerId, RoomId, SectionId, TimeslotId};

/// Kind of teaching a course requires, and kind of teaching a room supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseType {
    /// Lecture-style course held in a theory room.
    #[default]
    #[serde(alias = "T")]
    Theory,
    /// Lab course held in a practical room. Its block is twice its credit hours.
    #[serde(alias = "P")]
    Practical,
    /// Course with special room requirements.
    #[serde(alias = "S")]
    Special,
}

impl CourseType {
    /// Multiplier applied to credit hours to get the block length.
    #[inline]
    pub const fn block_factor(self) -> u32 {
        match self {
            CourseType::Practical => 2,
            CourseType::Theory | CourseType::Special => 1,
        }
    }
}

/// A course in the curriculum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Course code, e.g. `"IF2101"`.
    pub code: String,
    pub name: String,
    /// Credit hours (SKS). Must be positive.
    pub credit_hours: u32,
    pub course_type: CourseType,
}

/// An offered section of a course, as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRecord {
    pub id: SectionId,
    /// Code of the [`Course`] this section belongs to.
    pub course_code: String,
    /// Section label, e.g. `"A"`.
    pub label: String,
    pub capacity: u32,
    #[serde(default)]
    pub lecturers: Vec<LecturerId>,
    /// Sibling sections sharing one merged large lecture.
    #[serde(default)]
    pub companions: Vec<SectionId>,
}

/// A teaching room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub code: String,
    pub room_type: CourseType,
    pub capacity: u32,
    /// Accessibility group code; special-needs lecturers require a whitelisted group.
    #[serde(default)]
    pub group_code: String,
}

/// One teaching period on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: TimeslotId,
    /// Display name of the day, e.g. `"Senin"`.
    pub day: String,
    /// Day of week, `0` is Monday.
    pub day_index: u8,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// A lecturer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lecturer {
    pub id: LecturerId,
    #[serde(default)]
    pub name: String,
    /// Administrative-duty title (jabatan). Non-empty means the lecturer
    /// should not teach on Monday.
    #[serde(default)]
    pub admin_duty: Option<String>,
    #[serde(default)]
    pub accessibility_needs: bool,
}

impl Lecturer {
    /// Returns true if the lecturer holds an administrative duty.
    pub fn has_admin_duty(&self) -> bool {
        self.admin_duty
            .as_deref()
            .is_some_and(|duty| !duty.trim().is_empty())
    }
}

/// What the timeslots of a high-priority preference mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityMeaning {
    /// The listed slots are ones the lecturer cannot teach.
    #[default]
    Unavailable,
    /// The listed slots are the only ones the lecturer will teach.
    Required,
}

/// Timeslot preference of one lecturer for one section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LecturerPreference {
    pub section: SectionId,
    pub lecturer: LecturerId,
    #[serde(default)]
    pub timeslots: BTreeSet<TimeslotId>,
    #[serde(default)]
    pub high_priority: bool,
    /// Only consulted when `high_priority` is set.
    #[serde(default)]
    pub high_priority_meaning: PriorityMeaning,
    #[serde(default)]
    pub special_needs: bool,
    /// Whether a regular (non high-priority) preference is in effect.
    #[serde(default)]
    pub use_preference: bool,
}

impl LecturerPreference {
    /// Returns true if a block starting at `start` violates this preference.
    ///
    /// The first element reports a high-priority violation, the second a
    /// regular-preference violation. At most one is set.
    pub fn violation(&self, start: TimeslotId) -> (bool, bool) {
        let listed = self.timeslots.contains(&start);
        if self.high_priority {
            let violated = match self.high_priority_meaning {
                PriorityMeaning::Unavailable => listed,
                PriorityMeaning::Required => !listed,
            };
            (violated, false)
        } else if self.use_preference {
            (false, !listed)
        } else {
            (false, false)
        }
    }

    /// Returns true if every slot id in `block` is acceptable to the lecturer.
    pub fn accepts_block(&self, block: &[TimeslotId]) -> bool {
        match block.first() {
            Some(&start) => {
                let (high, general) = self.violation(start);
                if high || general {
                    return false;
                }
                if self.high_priority && self.high_priority_meaning == PriorityMeaning::Unavailable
                {
                    return block.iter().all(|slot| !self.timeslots.contains(slot));
                }
                true
            }
            None => true,
        }
    }
}

/// Everything the scheduler reads from storage for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    pub courses: Vec<Course>,
    pub sections: Vec<SectionRecord>,
    pub rooms: Vec<Room>,
    pub timeslots: Vec<TimeSlot>,
    pub lecturers: Vec<Lecturer>,
    pub preferences: Vec<LecturerPreference>,
}
