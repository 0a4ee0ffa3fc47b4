//! One-line constructors for catalog records.

use std::collections::BTreeSet;

use chrono::NaiveTime;
use lectern_core::{
    Course, CourseType, Lecturer, LecturerId, LecturerPreference, PriorityMeaning, Room, RoomId,
    SectionId, SectionRecord, TimeSlot, TimeslotId,
};

/// Day names, Monday first.
pub const DAYS: [&str; 6] = ["Senin", "Selasa", "Rabu", "Kamis", "Jumat", "Sabtu"];

/// Slots generated per day by [`week_slots`].
pub const SLOTS_PER_DAY: u32 = 10;

/// Panics on an invalid clock time.
pub fn time(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).expect("valid clock time")
}

pub fn slot(id: u32, day_index: u8, start: NaiveTime, end: NaiveTime) -> TimeSlot {
    TimeSlot {
        id: TimeslotId(id),
        day: DAYS[day_index as usize % DAYS.len()].to_string(),
        day_index,
        start,
        end,
    }
}

/// Builds [`SLOTS_PER_DAY`] fifty-minute slots per day for `days` days.
///
/// Ids start at 1. Each day runs six back-to-back slots from 07:00,
/// breaks for lunch, then four more from 13:00. The seventh slot of
/// every day is therefore a recess slot.
pub fn week_slots(days: u8) -> Vec<TimeSlot> {
    let mut slots = Vec::with_capacity(days as usize * SLOTS_PER_DAY as usize);
    let mut id = 1;
    for day_index in 0..days {
        let morning = (0..6).map(|i| 7 * 60 + i * 50);
        let afternoon = (0..4).map(|i| 13 * 60 + i * 50);
        for start in morning.chain(afternoon) {
            let end = start + 50;
            slots.push(slot(
                id,
                day_index,
                time(start / 60, start % 60),
                time(end / 60, end % 60),
            ));
            id += 1;
        }
    }
    slots
}

pub fn course(code: &str, credit_hours: u32, course_type: CourseType) -> Course {
    Course {
        code: code.to_string(),
        name: format!("Course {code}"),
        credit_hours,
        course_type,
    }
}

/// Section labelled "A" with capacity 40.
pub fn section(id: u32, course_code: &str, lecturers: &[u32]) -> SectionRecord {
    SectionRecord {
        id: SectionId(id),
        course_code: course_code.to_string(),
        label: "A".to_string(),
        capacity: 40,
        lecturers: lecturers.iter().copied().map(LecturerId).collect(),
        companions: Vec::new(),
    }
}

pub fn room(id: u32, code: &str, room_type: CourseType, group_code: &str) -> Room {
    Room {
        id: RoomId(id),
        code: code.to_string(),
        room_type,
        capacity: 40,
        group_code: group_code.to_string(),
    }
}

pub fn lecturer(id: u32, name: &str) -> Lecturer {
    Lecturer {
        id: LecturerId(id),
        name: name.to_string(),
        admin_duty: None,
        accessibility_needs: false,
    }
}

pub fn admin_lecturer(id: u32, name: &str, duty: &str) -> Lecturer {
    Lecturer {
        admin_duty: Some(duty.to_string()),
        ..lecturer(id, name)
    }
}

/// A regular preference: `timeslots` are the starts the lecturer wants.
pub fn preference(section: u32, lecturer: u32, timeslots: &[u32]) -> LecturerPreference {
    LecturerPreference {
        section: SectionId(section),
        lecturer: LecturerId(lecturer),
        timeslots: timeslots.iter().copied().map(TimeslotId).collect::<BTreeSet<_>>(),
        high_priority: false,
        high_priority_meaning: PriorityMeaning::Unavailable,
        special_needs: false,
        use_preference: true,
    }
}
