use super::*;
use lectern_test::{small_campus, snapshot_of, two_day_catalog};

fn solution(assignments: &[(u32, u32, u32)]) -> Solution {
    assignments
        .iter()
        .map(|&(section, room, start)| {
            Assignment::new(SectionId(section), RoomId(room), TimeslotId(start))
        })
        .collect()
}

fn display(materialized: &Materialized, section: u32) -> &str {
    materialized
        .records
        .iter()
        .find(|r| r.section_id == SectionId(section))
        .map(|r| r.display_text.as_str())
        .unwrap_or("")
}

#[test]
fn test_record_fields() {
    let snapshot = snapshot_of(two_day_catalog());
    let materializer = Materializer::new(&snapshot, &MaterializerConfig::default());

    let out = materializer.materialize(PeriodId(7), &solution(&[(1, 1, 1), (2, 2, 13)]));
    assert!(out.skipped.is_empty());
    assert_eq!(out.records.len(), 2);

    let first = &out.records[0];
    assert_eq!(first.period, PeriodId(7));
    assert_eq!(first.room_id, RoomId(1));
    assert_eq!(first.timeslot_ids, vec![TimeslotId(1), TimeslotId(2)]);
    assert!(first.conflict);
    assert!(!first.fallback);
    assert_eq!(first.class_label, "A");
    assert_eq!(first.capacity, 40);
    assert_eq!(first.lecturer_ids, vec![lectern_core::LecturerId(1)]);
    assert_eq!(first.display_text, "1. FIK-201 - Senin (07:00 - 08:40)");

    assert_eq!(display(&out, 2), "1. LAB-1 - Selasa (08:40 - 10:20)");
}

#[test]
fn test_companion_line_uses_earliest_block() {
    let snapshot = snapshot_of(small_campus());
    let materializer = Materializer::new(&snapshot, &MaterializerConfig::default());

    let out = materializer.materialize(
        PeriodId(1),
        &solution(&[(1, 1, 11), (2, 2, 3), (3, 1, 21)]),
    );
    assert_eq!(
        display(&out, 1),
        "1. FIK-201 - Selasa (07:00 - 08:40)\n2. FIK-VCR-KB-1 - Senin (08:40 - 10:20)"
    );
    assert_eq!(
        display(&out, 2),
        "1. FIK-202 - Senin (08:40 - 10:20)\n2. FIK-VCR-KB-1 - Senin (08:40 - 10:20)"
    );
    assert!(!display(&out, 3).contains('\n'));
}

#[test]
fn test_companion_tie_goes_to_record_order() {
    let snapshot = snapshot_of(small_campus());
    let config = MaterializerConfig {
        companion_venue: "AULA".to_string(),
    };
    let materializer = Materializer::new(&snapshot, &config);

    let out = materializer.materialize(PeriodId(1), &solution(&[(1, 1, 1), (2, 2, 1)]));
    let expected = "\n2. AULA - Senin (07:00 - 08:40)";
    assert!(display(&out, 1).ends_with(expected));
    assert!(display(&out, 2).ends_with(expected));
}

#[test]
fn test_unformattable_entries_are_skipped() {
    let snapshot = snapshot_of(two_day_catalog());
    let materializer = Materializer::new(&snapshot, &MaterializerConfig::default());

    let out = materializer.materialize(
        PeriodId(1),
        &solution(&[(1, 1, 10), (2, 2, 20), (3, 99, 11), (9, 1, 1), (1, 1, 3)]),
    );

    assert_eq!(out.records.len(), 1);
    assert_eq!(out.records[0].timeslot_ids, vec![TimeslotId(3), TimeslotId(4)]);
    assert_eq!(
        out.skipped,
        vec![
            MaterializeError::CrossDay {
                section: SectionId(1),
                start: TimeslotId(10)
            },
            MaterializeError::MissingTimeslot {
                section: SectionId(2),
                start: TimeslotId(20)
            },
            MaterializeError::UnknownRoom {
                section: SectionId(3),
                room: RoomId(99)
            },
            MaterializeError::UnknownSection(SectionId(9)),
        ]
    );
}

#[test]
fn test_fallback_block_is_written_and_flagged() {
    let snapshot = snapshot_of(two_day_catalog());
    let materializer = Materializer::new(&snapshot, &MaterializerConfig::default());

    // Slot 7 opens the afternoon, so this block spans the lunch recess.
    let fallback = Assignment::fallback(SectionId(1), RoomId(1), TimeslotId(6));
    let out = materializer.materialize(PeriodId(1), &Solution::new(vec![fallback]));

    assert_eq!(out.records.len(), 1);
    assert!(out.records[0].fallback);
    assert_eq!(out.records[0].timeslot_ids, vec![TimeslotId(6), TimeslotId(7)]);
    assert!(!snapshot.is_valid_block_start(TimeslotId(6), 2));
}

#[test]
fn test_unknown_start_is_missing_timeslot() {
    let snapshot = snapshot_of(two_day_catalog());
    let materializer = Materializer::new(&snapshot, &MaterializerConfig::default());

    let out = materializer.materialize(PeriodId(1), &solution(&[(1, 1, 99)]));

    assert!(out.records.is_empty());
    let expected = MaterializeError::MissingTimeslot {
        section: SectionId(1),
        start: TimeslotId(99),
    };
    assert_eq!(out.skipped, vec![expected.clone()]);
    assert_eq!(
        expected.to_string(),
        "section 1 block starting at 99 uses an unknown timeslot"
    );
}
