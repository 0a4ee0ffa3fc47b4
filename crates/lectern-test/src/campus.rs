//! Ready-made catalogs.

use lectern_core::{Catalog, CourseType, SectionId, Snapshot};

use crate::builders::{admin_lecturer, course, lecturer, preference, room, section, week_slots};

/// Builds a snapshot, discarding the integrity report.
pub fn snapshot_of(catalog: Catalog) -> Snapshot {
    Snapshot::build(catalog).0
}

/// Two days, two rooms, three sections.
///
/// | section | course | block | lecturers |
/// |---|---|---|---|
/// | 1 | TH2 (theory, 2 SKS) | 2 | 1 |
/// | 2 | PR1 (practical, 1 SKS) | 2 | 1 |
/// | 3 | TH2 | 2 | 2 (administrative duty) |
///
/// Room 1 is a theory room in accessible group `KHD2`, room 2 a
/// practical lab.
pub fn two_day_catalog() -> Catalog {
    Catalog {
        courses: vec![
            course("TH2", 2, CourseType::Theory),
            course("PR1", 1, CourseType::Practical),
        ],
        sections: vec![
            section(1, "TH2", &[1]),
            section(2, "PR1", &[1]),
            section(3, "TH2", &[2]),
        ],
        rooms: vec![
            room(1, "FIK-201", CourseType::Theory, "KHD2"),
            room(2, "LAB-1", CourseType::Practical, "LAB"),
        ],
        timeslots: week_slots(2),
        lecturers: vec![lecturer(1, "Ani"), admin_lecturer(2, "Budi", "Kaprodi")],
        preferences: Vec::new(),
    }
}

/// Three days, four rooms, six sections of every course type.
///
/// Sections 1 and 2 share a large lecture. Lecturer 2 holds an
/// administrative duty and lecturer 1 wants section 5 in the morning of
/// the first day.
pub fn small_campus() -> Catalog {
    let mut first = section(1, "IF101", &[1]);
    first.companions = vec![SectionId(2)];
    let mut second = section(2, "IF101", &[3]);
    second.label = "B".to_string();
    second.companions = vec![SectionId(1)];

    Catalog {
        courses: vec![
            course("IF101", 2, CourseType::Theory),
            course("IF102", 3, CourseType::Theory),
            course("IF201", 1, CourseType::Practical),
            course("IF202", 2, CourseType::Theory),
            course("DS301", 2, CourseType::Special),
        ],
        sections: vec![
            first,
            second,
            section(3, "IF102", &[2]),
            section(4, "IF201", &[3]),
            section(5, "IF202", &[1, 4]),
            section(6, "DS301", &[4]),
        ],
        rooms: vec![
            room(1, "FIK-201", CourseType::Theory, "KHD2"),
            room(2, "FIK-202", CourseType::Theory, "DS1"),
            room(3, "LAB-1", CourseType::Practical, "LAB"),
            room(4, "STUDIO-1", CourseType::Special, "DS2"),
        ],
        timeslots: week_slots(3),
        lecturers: vec![
            lecturer(1, "Ani"),
            admin_lecturer(2, "Budi", "Kaprodi"),
            lecturer(3, "Citra"),
            lecturer(4, "Dewi"),
        ],
        preferences: vec![preference(5, 1, &[1, 2, 3, 4, 5])],
    }
}
