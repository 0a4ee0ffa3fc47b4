//! The constraint evaluator.

use std::collections::{BTreeMap, HashMap, HashSet};

use lectern_config::PenaltyWeights;
use lectern_core::{LecturerId, Penalty, RoomId, Snapshot, Solution, TimeslotId};

use crate::analysis::{ConstraintAnalysis, ConstraintKind, ScoreExplanation};

/// Scores solutions of one snapshot against one weight table.
///
/// The evaluator is a pure function of its inputs and is `Sync`, so a
/// population can be scored from several threads at once.
///
/// # Examples
///
/// ```
/// use lectern_config::PenaltyWeights;
/// use lectern_core::{Catalog, Penalty, Snapshot, Solution};
/// use lectern_scoring::Evaluator;
///
/// let (snapshot, _) = Snapshot::build(Catalog::default());
/// let evaluator = Evaluator::new(&snapshot, PenaltyWeights::default());
///
/// assert_eq!(evaluator.score(&Solution::default()), Penalty::ZERO);
/// ```
#[derive(Debug, Clone)]
pub struct Evaluator<'a> {
    snapshot: &'a Snapshot,
    weights: PenaltyWeights,
    daily_load: bool,
    soft_ceiling: i64,
}

#[derive(Debug, Default, Clone, Copy)]
struct HardTally {
    room: u32,
    lecturer: u32,
    invalid: u32,
    cross_day: u32,
}

impl HardTally {
    fn term(&self, weights: &PenaltyWeights) -> i64 {
        weighted(self.room, weights.room_conflict)
            .saturating_add(weighted(self.lecturer, weights.lecturer_conflict))
            .saturating_add(weighted(self.invalid, weights.invalid_timeslot))
            .saturating_add(weighted(self.cross_day, weights.cross_day))
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct SoftTally {
    wrong_room: u32,
    special_needs: u32,
    high_priority: u32,
    general: u32,
    jabatan: u32,
    daily_load: u32,
    daily_load_penalty: i64,
}

impl SoftTally {
    fn total(&self, weights: &PenaltyWeights) -> i64 {
        weighted(self.wrong_room, weights.wrong_room)
            .saturating_add(weighted(self.special_needs, weights.special_needs))
            .saturating_add(weighted(self.high_priority, weights.high_priority_preference))
            .saturating_add(weighted(self.general, weights.general_preference))
            .saturating_add(weighted(self.jabatan, weights.jabatan))
            .saturating_add(self.daily_load_penalty)
    }
}

fn weighted(count: u32, weight: i64) -> i64 {
    i64::from(count).saturating_mul(weight)
}

impl<'a> Evaluator<'a> {
    /// Creates an evaluator with the daily load term disabled.
    pub fn new(snapshot: &'a Snapshot, weights: PenaltyWeights) -> Self {
        let mut evaluator = Self {
            snapshot,
            weights,
            daily_load: false,
            soft_ceiling: 0,
        };
        evaluator.soft_ceiling = evaluator.compute_soft_ceiling();
        evaluator
    }

    /// Enables or disables the daily load balance term.
    pub fn with_daily_load(mut self, enabled: bool) -> Self {
        self.daily_load = enabled;
        self.soft_ceiling = self.compute_soft_ceiling();
        self
    }

    pub fn snapshot(&self) -> &'a Snapshot {
        self.snapshot
    }

    pub fn weights(&self) -> &PenaltyWeights {
        &self.weights
    }

    pub fn daily_load_enabled(&self) -> bool {
        self.daily_load
    }

    /// Upper bound of the soft total of any solution of this snapshot.
    pub fn soft_ceiling(&self) -> Penalty {
        Penalty::of(self.soft_ceiling)
    }

    /// Scores a solution. Lower is better, zero means nothing is violated.
    ///
    /// If any hard conflict term fires the soft terms are skipped and the
    /// result is `soft_ceiling + conflict_term * conflict_multiplier`, so
    /// every conflicting solution scores worse than every conflict-free one.
    pub fn score(&self, solution: &Solution) -> Penalty {
        let hard = self.hard_tally(solution);
        let term = hard.term(&self.weights);
        if term > 0 {
            return self.conflicted_total(term);
        }
        Penalty::of(self.soft_tally(solution).total(&self.weights))
    }

    /// Scores a solution and reports every constraint's contribution.
    ///
    /// `explain(s).total == score(s)` for every solution.
    pub fn explain(&self, solution: &Solution) -> ScoreExplanation {
        let hard = self.hard_tally(solution);
        let soft = self.soft_tally(solution);
        let term = hard.term(&self.weights);
        let conflicted = term > 0;
        let total = if conflicted {
            self.conflicted_total(term)
        } else {
            Penalty::of(soft.total(&self.weights))
        };

        let w = &self.weights;
        let hard_entry = |kind, weight: i64, violations: u32| ConstraintAnalysis {
            kind,
            weight,
            violations,
            penalty: Penalty::of(weighted(violations, weight).saturating_mul(w.conflict_multiplier)),
        };
        let soft_entry = |kind, weight: i64, violations: u32| ConstraintAnalysis {
            kind,
            weight,
            violations,
            penalty: Penalty::of(weighted(violations, weight)),
        };

        let constraint_analyses = vec![
            hard_entry(ConstraintKind::RoomConflict, w.room_conflict, hard.room),
            hard_entry(ConstraintKind::LecturerConflict, w.lecturer_conflict, hard.lecturer),
            hard_entry(ConstraintKind::InvalidTimeslot, w.invalid_timeslot, hard.invalid),
            hard_entry(ConstraintKind::CrossDay, w.cross_day, hard.cross_day),
            soft_entry(ConstraintKind::WrongRoom, w.wrong_room, soft.wrong_room),
            soft_entry(ConstraintKind::SpecialNeeds, w.special_needs, soft.special_needs),
            soft_entry(
                ConstraintKind::HighPriorityPreference,
                w.high_priority_preference,
                soft.high_priority,
            ),
            soft_entry(
                ConstraintKind::GeneralPreference,
                w.general_preference,
                soft.general,
            ),
            soft_entry(ConstraintKind::Jabatan, w.jabatan, soft.jabatan),
            ConstraintAnalysis {
                kind: ConstraintKind::DailyLoad,
                weight: w.daily_load,
                violations: soft.daily_load,
                penalty: Penalty::of(soft.daily_load_penalty),
            },
        ];

        ScoreExplanation {
            total,
            conflicted,
            soft_ceiling: self.soft_ceiling(),
            constraint_analyses,
        }
    }

    fn conflicted_total(&self, term: i64) -> Penalty {
        Penalty::of(
            self.soft_ceiling
                .saturating_add(term.saturating_mul(self.weights.conflict_multiplier)),
        )
    }

    fn hard_tally(&self, solution: &Solution) -> HardTally {
        let mut tally = HardTally::default();
        let mut rooms: HashSet<(RoomId, TimeslotId)> = HashSet::with_capacity(solution.len() * 2);
        let mut lecturers: HashSet<(LecturerId, TimeslotId)> =
            HashSet::with_capacity(solution.len() * 2);

        for assignment in solution {
            let Some(section) = self.snapshot.section(assignment.section) else {
                continue;
            };
            let block = self.snapshot.expand(assignment.start, section.block_len());
            tally.invalid += block.missing;
            tally.cross_day += block.cross_day;

            for &slot in &block.slots {
                if !rooms.insert((assignment.room, slot)) {
                    tally.room += 1;
                }
                for &lecturer in &section.lecturers {
                    if !lecturers.insert((lecturer, slot)) {
                        tally.lecturer += 1;
                    }
                }
            }
        }
        tally
    }

    fn soft_tally(&self, solution: &Solution) -> SoftTally {
        let snapshot = self.snapshot;
        let mut tally = SoftTally::default();
        let mut load: HashMap<LecturerId, BTreeMap<u8, u32>> = HashMap::new();

        for assignment in solution {
            let Some(section) = snapshot.section(assignment.section) else {
                continue;
            };
            let room = snapshot.room(assignment.room);
            if room.map(|r| r.room_type) != Some(section.course_type) {
                tally.wrong_room += 1;
            }
            let accessible = room.is_some_and(|r| self.weights.is_accessible_group(&r.group_code));

            for &lecturer in &section.lecturers {
                if !accessible && snapshot.needs_accessible_room(section, lecturer) {
                    tally.special_needs += 1;
                }
                if let Some(preference) = snapshot.preference(section.id, lecturer) {
                    let (high, general) = preference.violation(assignment.start);
                    tally.high_priority += u32::from(high);
                    tally.general += u32::from(general);
                }
            }

            let Some(start) = snapshot.timeslot(assignment.start) else {
                continue;
            };
            if start.day_index == 0 && snapshot.has_admin_duty_lecturer(section) {
                tally.jabatan += 1;
            }
            if self.daily_load {
                for &lecturer in &section.lecturers {
                    *load
                        .entry(lecturer)
                        .or_default()
                        .entry(start.day_index)
                        .or_insert(0) += 1;
                }
            }
        }

        for days in load.values() {
            let total: u32 = days.values().sum();
            let average = f64::from(total) / days.len() as f64;
            for &count in days.values() {
                let deviation = (f64::from(count) - average).abs();
                if deviation > self.weights.daily_load_threshold {
                    tally.daily_load += 1;
                    tally.daily_load_penalty = tally
                        .daily_load_penalty
                        .saturating_add((self.weights.daily_load as f64 * deviation).round() as i64);
                }
            }
        }
        tally
    }

    fn compute_soft_ceiling(&self) -> i64 {
        let w = &self.weights;
        let per_lecturer = w
            .special_needs
            .saturating_add(w.high_priority_preference.max(w.general_preference));
        let mut ceiling: i64 = 0;
        let mut lecturer_sections: i64 = 0;
        for section in self.snapshot.sections() {
            let lecturers = section.lecturers.len() as i64;
            lecturer_sections += lecturers;
            ceiling = ceiling
                .saturating_add(w.wrong_room)
                .saturating_add(w.jabatan)
                .saturating_add(per_lecturer.saturating_mul(lecturers));
        }
        if self.daily_load {
            // Per lecturer, the absolute deviations from the mean sum to at
            // most twice the section count; each day rounds up by at most one.
            ceiling = ceiling.saturating_add(
                w.daily_load
                    .saturating_mul(2)
                    .saturating_add(1)
                    .saturating_mul(lecturer_sections),
            );
        }
        ceiling
    }
}

#[cfg(test)]
mod tests;
