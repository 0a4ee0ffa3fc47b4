//! Tests for snapshot construction.

use chrono::NaiveTime;

use super::*;
use crate::domain::SectionRecord;

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn slot(id: u32, day_index: u8, start: NaiveTime, end: NaiveTime) -> TimeSlot {
    TimeSlot {
        id: TimeslotId(id),
        day: ["Senin", "Selasa"][day_index as usize].to_string(),
        day_index,
        start,
        end,
    }
}

// Monday: 1,2,3 back to back, 4 after a 30 minute break, 5 back to back.
// Tuesday: 6,7.
fn timeslots() -> Vec<TimeSlot> {
    vec![
        slot(1, 0, time(7, 0), time(7, 50)),
        slot(2, 0, time(7, 50), time(8, 40)),
        slot(3, 0, time(8, 40), time(9, 30)),
        slot(4, 0, time(10, 0), time(10, 50)),
        slot(5, 0, time(10, 50), time(11, 40)),
        slot(6, 1, time(7, 0), time(7, 50)),
        slot(7, 1, time(7, 50), time(8, 40)),
    ]
}

fn course(code: &str, credit_hours: u32, course_type: CourseType) -> Course {
    Course {
        code: code.to_string(),
        name: format!("Course {code}"),
        credit_hours,
        course_type,
    }
}

fn section(id: u32, course_code: &str, lecturers: &[u32]) -> SectionRecord {
    SectionRecord {
        id: SectionId(id),
        course_code: course_code.to_string(),
        label: "A".to_string(),
        capacity: 40,
        lecturers: lecturers.iter().copied().map(LecturerId).collect(),
        companions: Vec::new(),
    }
}

fn catalog() -> Catalog {
    Catalog {
        courses: vec![
            course("TH2", 2, CourseType::Theory),
            course("PR1", 1, CourseType::Practical),
            course("ZERO", 0, CourseType::Theory),
        ],
        sections: vec![section(2, "PR1", &[1]), section(1, "TH2", &[1])],
        rooms: vec![
            Room {
                id: RoomId(10),
                code: "T-101".to_string(),
                room_type: CourseType::Theory,
                capacity: 40,
                group_code: "KHD2".to_string(),
            },
            Room {
                id: RoomId(11),
                code: "LAB-1".to_string(),
                room_type: CourseType::Practical,
                capacity: 30,
                group_code: "LAB".to_string(),
            },
        ],
        timeslots: timeslots(),
        lecturers: vec![Lecturer {
            id: LecturerId(1),
            name: "Budi".to_string(),
            admin_duty: None,
            accessibility_needs: false,
        }],
        preferences: Vec::new(),
    }
}

#[test]
fn test_recess_detects_long_gap_within_day() {
    let (snapshot, _) = Snapshot::build(catalog());

    assert!(snapshot.is_recess(TimeslotId(4)));
    assert!(!snapshot.is_recess(TimeslotId(2)));
    // First slot of a new day is never a recess.
    assert!(!snapshot.is_recess(TimeslotId(6)));
    assert_eq!(snapshot.recess().len(), 1);
}

#[test]
fn test_valid_block_positions_skip_recess_and_day_change() {
    let (snapshot, _) = Snapshot::build(catalog());

    let starts: Vec<TimeslotId> = snapshot
        .valid_block_positions(2)
        .iter()
        .map(|&p| snapshot.timeslots()[p].id)
        .collect();

    // 3->4 crosses the recess, 5->6 crosses a day.
    assert_eq!(
        starts,
        vec![TimeslotId(1), TimeslotId(2), TimeslotId(4), TimeslotId(6)]
    );
}

#[test]
fn test_block_may_start_at_recess_slot() {
    let (snapshot, _) = Snapshot::build(catalog());

    assert!(snapshot.is_valid_block_start(TimeslotId(4), 2));
    assert!(!snapshot.is_valid_block_start(TimeslotId(3), 2));
    assert!(!snapshot.is_valid_block_start(TimeslotId(7), 2));
}

#[test]
fn test_sections_sorted_and_joined() {
    let (snapshot, report) = Snapshot::build(catalog());

    assert!(report.is_clean());
    let ids: Vec<SectionId> = snapshot.sections().iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![SectionId(1), SectionId(2)]);

    let practical = snapshot.section(SectionId(2)).unwrap();
    assert_eq!(practical.course_type, CourseType::Practical);
    assert_eq!(practical.block_len(), 2);
    assert_eq!(snapshot.section(SectionId(1)).unwrap().block_len(), 2);
}

#[test]
fn test_broken_references_are_skipped_not_fatal() {
    let mut catalog = catalog();
    catalog.sections.push(section(3, "MISSING", &[1]));
    catalog.sections.push(section(4, "ZERO", &[1]));
    catalog.sections.push(section(1, "TH2", &[1]));
    let mut with_companion = section(5, "TH2", &[99]);
    with_companion.companions = vec![SectionId(1), SectionId(42)];
    catalog.sections.push(with_companion);

    let (snapshot, report) = Snapshot::build(catalog);

    assert_eq!(snapshot.sections().len(), 3);
    assert_eq!(report.skipped_sections(), 3);
    assert!(report.issues.contains(&DataIntegrityError::UnknownLecturer {
        section: SectionId(5),
        lecturer: LecturerId(99),
    }));
    assert!(report.issues.contains(&DataIntegrityError::UnknownCompanion {
        section: SectionId(5),
        companion: SectionId(42),
    }));

    let kept = snapshot.section(SectionId(5)).unwrap();
    assert_eq!(kept.companions, vec![SectionId(1)]);
    assert_eq!(kept.lecturers.as_slice(), &[LecturerId(99)]);
}

#[test]
fn test_preference_for_unknown_section_dropped() {
    let mut catalog = catalog();
    catalog.preferences.push(LecturerPreference {
        section: SectionId(77),
        lecturer: LecturerId(1),
        timeslots: Default::default(),
        high_priority: false,
        high_priority_meaning: Default::default(),
        special_needs: true,
        use_preference: false,
    });

    let (snapshot, report) = Snapshot::build(catalog);

    assert!(snapshot.preference(SectionId(77), LecturerId(1)).is_none());
    assert_eq!(report.issues.len(), 1);
}

#[test]
fn test_expand_classifies_missing_and_cross_day() {
    let (snapshot, _) = Snapshot::build(catalog());

    let valid = snapshot.expand(TimeslotId(1), 3);
    assert!(valid.is_valid());
    assert_eq!(valid.slots, vec![TimeslotId(1), TimeslotId(2), TimeslotId(3)]);

    let cross = snapshot.expand(TimeslotId(5), 2);
    assert_eq!(cross.cross_day, 1);
    assert_eq!(cross.slots, vec![TimeslotId(5)]);

    let overflow = snapshot.expand(TimeslotId(7), 2);
    assert_eq!(overflow.missing, 1);

    let absent = snapshot.expand(TimeslotId(50), 3);
    assert_eq!(absent.missing, 3);
    assert!(absent.slots.is_empty());
}

#[test]
fn test_compatible_rooms_by_type() {
    let (snapshot, _) = Snapshot::build(catalog());

    assert_eq!(snapshot.compatible_rooms(CourseType::Theory), &[RoomId(10)]);
    assert_eq!(snapshot.compatible_rooms(CourseType::Practical), &[RoomId(11)]);
    assert!(snapshot.compatible_rooms(CourseType::Special).is_empty());
}

#[test]
fn test_repeated_lecturer_is_collapsed_and_reported() {
    let mut catalog = catalog();
    catalog.sections.push(section(3, "TH2", &[1, 1]));

    let (snapshot, report) = Snapshot::build(catalog);

    let info = snapshot.section(SectionId(3)).unwrap();
    assert_eq!(info.lecturers.as_slice(), &[LecturerId(1)]);
    assert_eq!(
        report.issues,
        vec![DataIntegrityError::DuplicateLecturer {
            section: SectionId(3),
            lecturer: LecturerId(1),
        }]
    );
    assert_eq!(report.skipped_sections(), 0);
}

#[test]
fn test_block_longer_than_timetable_is_skipped() {
    let mut catalog = catalog();
    catalog.courses.push(course("HUGE", u32::MAX, CourseType::Practical));
    catalog.courses.push(course("TH8", 8, CourseType::Theory));
    catalog.sections.push(section(3, "HUGE", &[1]));
    catalog.sections.push(section(4, "TH8", &[1]));

    let (snapshot, report) = Snapshot::build(catalog);

    assert!(snapshot.section(SectionId(3)).is_none());
    assert!(snapshot.section(SectionId(4)).is_none());
    assert!(report.issues.contains(&DataIntegrityError::BlockTooLong {
        section: SectionId(3),
        course_code: "HUGE".to_string(),
        block_len: 2 * u64::from(u32::MAX),
        timeslots: 7,
    }));
    assert_eq!(report.skipped_sections(), 2);
}

#[test]
fn test_timeslot_offsets_do_not_wrap() {
    assert_eq!(TimeslotId(3).offset(2), Some(TimeslotId(5)));
    assert_eq!(TimeslotId(u32::MAX).offset(1), None);
    assert!(!TimeslotId(u32::MAX).is_followed_by(TimeslotId(0)));

    let (snapshot, _) = Snapshot::build(catalog());
    assert!(snapshot.block_at(usize::MAX, 2).is_none());
}
