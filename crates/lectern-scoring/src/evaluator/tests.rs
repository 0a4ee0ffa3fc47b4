//! Tests for the constraint evaluator.

use lectern_config::PenaltyWeights;
use lectern_core::{
    Assignment, Catalog, CourseType, LecturerId, Penalty, PriorityMeaning, RoomId, SectionId,
    Solution, TimeslotId,
};
use lectern_test::{
    course, lecturer, preference, room, section, snapshot_of, two_day_catalog, week_slots,
};

use super::*;
use crate::analysis::ConstraintKind;

fn solution(entries: &[(u32, u32, u32)]) -> Solution {
    entries
        .iter()
        .map(|&(section, room, start)| {
            Assignment::new(SectionId(section), RoomId(room), TimeslotId(start))
        })
        .collect()
}

// Tuesday placements that violate nothing.
fn clean() -> Solution {
    solution(&[(1, 1, 11), (2, 2, 13), (3, 1, 13)])
}

#[test]
fn test_clean_solution_scores_zero() {
    let snapshot = snapshot_of(two_day_catalog());
    let evaluator = Evaluator::new(&snapshot, PenaltyWeights::default());

    let explanation = evaluator.explain(&clean());
    assert_eq!(evaluator.score(&clean()), Penalty::ZERO);
    assert_eq!(explanation.total, Penalty::ZERO);
    assert!(!explanation.conflicted);
    assert_eq!(explanation.total_violations(), 0);
}

#[test]
fn test_shared_room_overlap_is_room_conflict() {
    let snapshot = snapshot_of(two_day_catalog());
    let evaluator = Evaluator::new(&snapshot, PenaltyWeights::default());

    // Sections 1 and 3 both hold room 1 at slot 12.
    let overlapping = solution(&[(1, 1, 11), (2, 2, 15), (3, 1, 12)]);
    let explanation = evaluator.explain(&overlapping);

    assert!(explanation.conflicted);
    assert_eq!(explanation.violations(ConstraintKind::RoomConflict), 1);
    assert_eq!(explanation.violations(ConstraintKind::LecturerConflict), 0);
    let violated: Vec<ConstraintKind> = explanation
        .violated_constraints()
        .iter()
        .filter(|a| a.is_hard())
        .map(|a| a.kind)
        .collect();
    assert_eq!(violated, vec![ConstraintKind::RoomConflict]);
    assert!(evaluator.score(&overlapping) >= Penalty::of(1000));
    assert_eq!(
        evaluator.score(&overlapping),
        Penalty::of(evaluator.soft_ceiling().value() + 1000)
    );
}

#[test]
fn test_shared_lecturer_overlap_is_lecturer_conflict() {
    let snapshot = snapshot_of(two_day_catalog());
    let evaluator = Evaluator::new(&snapshot, PenaltyWeights::default());

    // Lecturer 1 teaches sections 1 and 2, both covering slots 11 and 12.
    let overlapping = solution(&[(1, 1, 11), (2, 2, 11), (3, 1, 15)]);
    let explanation = evaluator.explain(&overlapping);

    assert_eq!(explanation.violations(ConstraintKind::LecturerConflict), 2);
    assert_eq!(explanation.violations(ConstraintKind::RoomConflict), 0);
    assert_eq!(explanation.total, evaluator.score(&overlapping));
}

#[test]
fn test_broken_blocks_are_weighted_separately() {
    let snapshot = snapshot_of(two_day_catalog());
    let weights = PenaltyWeights {
        invalid_timeslot: 3,
        cross_day: 5,
        ..PenaltyWeights::default()
    };
    let evaluator = Evaluator::new(&snapshot, weights);

    // Slot 10 is the last Monday slot, so 11 falls on Tuesday.
    let cross_day = solution(&[(1, 1, 10), (2, 2, 13), (3, 1, 13)]);
    let explanation = evaluator.explain(&cross_day);
    assert_eq!(explanation.violations(ConstraintKind::CrossDay), 1);
    assert_eq!(explanation.violations(ConstraintKind::InvalidTimeslot), 0);
    assert_eq!(explanation.total.value(), evaluator.soft_ceiling().value() + 5 * 1000);

    // Slot 20 is the last slot of the week.
    let missing = solution(&[(1, 1, 20), (2, 2, 13), (3, 1, 13)]);
    let explanation = evaluator.explain(&missing);
    assert_eq!(explanation.violations(ConstraintKind::InvalidTimeslot), 1);
    assert_eq!(explanation.total.value(), evaluator.soft_ceiling().value() + 3 * 1000);

    let unknown_start = solution(&[(1, 1, 99), (2, 2, 13), (3, 1, 13)]);
    assert_eq!(
        evaluator
            .explain(&unknown_start)
            .violations(ConstraintKind::InvalidTimeslot),
        2
    );
}

#[test]
fn test_practical_section_in_theory_room_adds_one_wrong_room() {
    let snapshot = snapshot_of(two_day_catalog());
    let evaluator = Evaluator::new(&snapshot, PenaltyWeights::default());

    let misplaced = solution(&[(1, 1, 11), (2, 1, 13), (3, 1, 15)]);
    let explanation = evaluator.explain(&misplaced);

    assert_eq!(explanation.violations(ConstraintKind::WrongRoom), 1);
    assert_eq!(evaluator.score(&misplaced), Penalty::of(1000));
}

#[test]
fn test_admin_duty_lecturer_on_monday_adds_one_jabatan() {
    let snapshot = snapshot_of(two_day_catalog());
    let evaluator = Evaluator::new(&snapshot, PenaltyWeights::default());

    // Section 3 is taught by the administrative-duty lecturer.
    let monday = solution(&[(1, 1, 11), (2, 2, 13), (3, 1, 1)]);
    let explanation = evaluator.explain(&monday);
    assert_eq!(explanation.violations(ConstraintKind::Jabatan), 1);
    assert_eq!(evaluator.score(&monday), Penalty::of(10_000));

    // Monday is fine for sections without administrative-duty lecturers.
    let other_on_monday = solution(&[(1, 1, 1), (2, 2, 13), (3, 1, 13)]);
    assert_eq!(evaluator.score(&other_on_monday), Penalty::ZERO);
}

#[test]
fn test_special_needs_requires_accessible_group() {
    let mut catalog = two_day_catalog();
    catalog.rooms.push(room(3, "FIK-305", CourseType::Theory, "DS1"));
    let mut needs = preference(1, 1, &[]);
    needs.use_preference = false;
    needs.special_needs = true;
    catalog.preferences.push(needs);
    let snapshot = snapshot_of(catalog);
    let evaluator = Evaluator::new(&snapshot, PenaltyWeights::default());

    assert_eq!(evaluator.score(&clean()), Penalty::ZERO);

    let inaccessible = solution(&[(1, 3, 11), (2, 2, 13), (3, 1, 13)]);
    let explanation = evaluator.explain(&inaccessible);
    assert_eq!(explanation.violations(ConstraintKind::SpecialNeeds), 1);
    assert_eq!(explanation.total, Penalty::of(1000));
}

#[test]
fn test_lecturer_accessibility_needs_flag() {
    let mut catalog = two_day_catalog();
    catalog.rooms.push(room(3, "FIK-305", CourseType::Theory, "DS1"));
    catalog.lecturers[0].accessibility_needs = true;
    let snapshot = snapshot_of(catalog);
    let evaluator = Evaluator::new(&snapshot, PenaltyWeights::default());

    // Lecturer 1 teaches section 2 in the lab, which is not accessible.
    let explanation = evaluator.explain(&solution(&[(1, 3, 11), (2, 2, 13), (3, 1, 13)]));
    assert_eq!(explanation.violations(ConstraintKind::SpecialNeeds), 2);
}

#[test]
fn test_preference_semantics() {
    let cases = [
        (true, PriorityMeaning::Unavailable, vec![11], 800),
        (true, PriorityMeaning::Unavailable, vec![12], 0),
        (true, PriorityMeaning::Required, vec![11], 0),
        (true, PriorityMeaning::Required, vec![1], 800),
        (false, PriorityMeaning::Unavailable, vec![11], 0),
        (false, PriorityMeaning::Unavailable, vec![1, 2], 200),
    ];

    for (high_priority, meaning, slots, expected) in cases {
        let mut catalog = two_day_catalog();
        let mut pref = preference(1, 1, &slots);
        pref.high_priority = high_priority;
        pref.high_priority_meaning = meaning;
        catalog.preferences.push(pref);
        let snapshot = snapshot_of(catalog);
        let evaluator = Evaluator::new(&snapshot, PenaltyWeights::default());

        assert_eq!(
            evaluator.score(&clean()),
            Penalty::of(expected),
            "high_priority={high_priority} meaning={meaning:?} slots={slots:?}"
        );
    }
}

fn overloaded_catalog() -> Catalog {
    Catalog {
        courses: vec![course("TH1", 1, CourseType::Theory)],
        sections: (1..=7).map(|id| section(id, "TH1", &[1])).collect(),
        rooms: vec![room(1, "FIK-201", CourseType::Theory, "KHD2")],
        timeslots: week_slots(2),
        lecturers: vec![lecturer(1, "Ani")],
        preferences: Vec::new(),
    }
}

#[test]
fn test_daily_load_only_when_enabled() {
    let snapshot = snapshot_of(overloaded_catalog());
    // Six sections on Monday and one on Tuesday: mean 3.5, both days deviate by 2.5.
    let lopsided = solution(&[
        (1, 1, 1),
        (2, 1, 2),
        (3, 1, 3),
        (4, 1, 4),
        (5, 1, 5),
        (6, 1, 6),
        (7, 1, 11),
    ]);

    let plain = Evaluator::new(&snapshot, PenaltyWeights::default());
    assert!(!plain.daily_load_enabled());
    assert_eq!(plain.score(&lopsided), Penalty::ZERO);

    let balanced = Evaluator::new(&snapshot, PenaltyWeights::default()).with_daily_load(true);
    let explanation = balanced.explain(&lopsided);
    assert_eq!(explanation.violations(ConstraintKind::DailyLoad), 2);
    assert_eq!(explanation.total, Penalty::of(2 * 1250));

    let tolerant = Evaluator::new(
        &snapshot,
        PenaltyWeights {
            daily_load_threshold: 4.0,
            ..PenaltyWeights::default()
        },
    )
    .with_daily_load(true);
    assert_eq!(tolerant.score(&lopsided), Penalty::ZERO);
}

#[test]
fn test_conflicts_dominate_every_soft_total() {
    let snapshot = snapshot_of(two_day_catalog());
    let weights = PenaltyWeights {
        conflict_multiplier: 1,
        ..PenaltyWeights::default()
    };
    let evaluator = Evaluator::new(&snapshot, weights).with_daily_load(true);

    // Every section in the wrong room and the jabatan section on Monday.
    let worst_clean = solution(&[(1, 2, 11), (2, 1, 13), (3, 2, 1)]);
    let conflicting = solution(&[(1, 1, 11), (2, 2, 13), (3, 1, 11)]);

    let worst = evaluator.score(&worst_clean);
    assert!(worst > Penalty::ZERO);
    assert!(worst <= evaluator.soft_ceiling());
    assert!(evaluator.score(&conflicting) > worst);
}

#[test]
fn test_explain_total_matches_score() {
    let snapshot = snapshot_of(two_day_catalog());
    let evaluator = Evaluator::new(&snapshot, PenaltyWeights::default()).with_daily_load(true);

    let candidates = [
        clean(),
        solution(&[(1, 2, 11), (2, 1, 13), (3, 2, 1)]),
        solution(&[(1, 1, 11), (2, 2, 11), (3, 1, 12)]),
        solution(&[(1, 1, 20), (2, 2, 10), (3, 1, 99)]),
    ];
    for candidate in &candidates {
        let explanation = evaluator.explain(candidate);
        assert_eq!(explanation.total, evaluator.score(candidate));
        assert_eq!(explanation.constraint_analyses.len(), ConstraintKind::ALL.len());
    }
}

#[test]
fn test_unknown_lecturer_still_conflicts() {
    let mut catalog = two_day_catalog();
    catalog.sections[0].lecturers.push(LecturerId(42));
    catalog.sections[2].lecturers.push(LecturerId(42));
    let snapshot = snapshot_of(catalog);
    let evaluator = Evaluator::new(&snapshot, PenaltyWeights::default());

    let shared = solution(&[(1, 1, 11), (2, 2, 13), (3, 2, 11)]);
    assert_eq!(
        evaluator
            .explain(&shared)
            .violations(ConstraintKind::LecturerConflict),
        2
    );
}

#[test]
fn test_repeated_lecturer_does_not_conflict_with_itself() {
    let mut catalog = two_day_catalog();
    catalog.sections[0].lecturers.push(LecturerId(1));
    let snapshot = snapshot_of(catalog);
    let evaluator = Evaluator::new(&snapshot, PenaltyWeights::default());

    assert_eq!(evaluator.score(&clean()), Penalty::ZERO);
}
