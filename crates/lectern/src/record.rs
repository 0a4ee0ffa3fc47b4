//! Persisted timetable records and academic periods.

use lectern_core::{LecturerId, PeriodId, RecordId, RoomId, SectionId, TimeslotId};
use serde::{Deserialize, Serialize};

/// An academic period. Exactly one must be active for a run to write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcademicPeriod {
    pub id: PeriodId,
    pub name: String,
    pub active: bool,
}

impl AcademicPeriod {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id: PeriodId(id),
            name: name.into(),
            active: false,
        }
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }
}

/// One scheduled section as written to storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableRecord {
    /// Assigned by the store on insert.
    pub id: RecordId,
    pub period: PeriodId,
    pub section_id: SectionId,
    pub room_id: RoomId,
    /// The whole block, in slot order.
    pub timeslot_ids: Vec<TimeslotId>,
    /// Maintained by the conflict audit.
    pub conflict: bool,
    pub class_label: String,
    pub capacity: u32,
    pub display_text: String,
    /// The placement came from the random fallback and may break block rules.
    pub fallback: bool,
    pub lecturer_ids: Vec<LecturerId>,
}

impl TimetableRecord {
    /// Returns true if the two records share at least one timeslot.
    pub fn overlaps(&self, other: &TimetableRecord) -> bool {
        self.timeslot_ids
            .iter()
            .any(|slot| other.timeslot_ids.contains(slot))
    }

    /// Timeslot ids sorted and deduplicated, for set comparison.
    pub fn slot_set(&self) -> Vec<TimeslotId> {
        let mut slots = self.timeslot_ids.clone();
        slots.sort_unstable();
        slots.dedup();
        slots
    }
}
