//! Score analysis types for per-constraint breakdowns.

use std::fmt;

use lectern_core::Penalty;

/// Every constraint the evaluator checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConstraintKind {
    RoomConflict,
    LecturerConflict,
    InvalidTimeslot,
    CrossDay,
    WrongRoom,
    SpecialNeeds,
    HighPriorityPreference,
    GeneralPreference,
    Jabatan,
    DailyLoad,
}

impl ConstraintKind {
    /// All kinds, hard constraints first.
    pub const ALL: [ConstraintKind; 10] = [
        ConstraintKind::RoomConflict,
        ConstraintKind::LecturerConflict,
        ConstraintKind::InvalidTimeslot,
        ConstraintKind::CrossDay,
        ConstraintKind::WrongRoom,
        ConstraintKind::SpecialNeeds,
        ConstraintKind::HighPriorityPreference,
        ConstraintKind::GeneralPreference,
        ConstraintKind::Jabatan,
        ConstraintKind::DailyLoad,
    ];

    /// Snake-case name, matching the weight table keys.
    pub const fn name(self) -> &'static str {
        match self {
            ConstraintKind::RoomConflict => "room_conflict",
            ConstraintKind::LecturerConflict => "lecturer_conflict",
            ConstraintKind::InvalidTimeslot => "invalid_timeslot",
            ConstraintKind::CrossDay => "cross_day",
            ConstraintKind::WrongRoom => "wrong_room",
            ConstraintKind::SpecialNeeds => "special_needs",
            ConstraintKind::HighPriorityPreference => "high_priority_preference",
            ConstraintKind::GeneralPreference => "general_preference",
            ConstraintKind::Jabatan => "jabatan",
            ConstraintKind::DailyLoad => "daily_load",
        }
    }

    /// Returns true for the conflict terms scaled by the conflict multiplier.
    pub const fn is_hard(self) -> bool {
        matches!(
            self,
            ConstraintKind::RoomConflict
                | ConstraintKind::LecturerConflict
                | ConstraintKind::InvalidTimeslot
                | ConstraintKind::CrossDay
        )
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-constraint breakdown in a score explanation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintAnalysis {
    pub kind: ConstraintKind,
    /// Configured weight per violation.
    pub weight: i64,
    /// Number of violations found.
    pub violations: u32,
    /// Penalty attributed to this constraint. Hard constraints include
    /// the conflict multiplier; daily load is the rounded deviation sum.
    pub penalty: Penalty,
}

impl ConstraintAnalysis {
    pub fn is_hard(&self) -> bool {
        self.kind.is_hard()
    }
}

/// Complete score explanation with per-constraint breakdown.
///
/// When `conflicted` is false, `total` is the sum of the soft penalties.
/// Otherwise it is `soft_ceiling` plus the sum of the hard penalties and
/// the soft penalties are informational only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreExplanation {
    /// The score [`Evaluator::score`](crate::Evaluator::score) returns.
    pub total: Penalty,
    /// True if any hard conflict term is non-zero.
    pub conflicted: bool,
    /// Upper bound of every soft total for this snapshot and weight table.
    pub soft_ceiling: Penalty,
    /// One entry per [`ConstraintKind`], in [`ConstraintKind::ALL`] order.
    pub constraint_analyses: Vec<ConstraintAnalysis>,
}

impl ScoreExplanation {
    /// Returns the analysis of one constraint.
    pub fn analysis(&self, kind: ConstraintKind) -> Option<&ConstraintAnalysis> {
        self.constraint_analyses.iter().find(|a| a.kind == kind)
    }

    /// Number of violations of one constraint, zero if absent.
    pub fn violations(&self, kind: ConstraintKind) -> u32 {
        self.analysis(kind).map_or(0, |a| a.violations)
    }

    /// Returns the total violation count across all constraints.
    pub fn total_violations(&self) -> u64 {
        self.constraint_analyses
            .iter()
            .map(|a| u64::from(a.violations))
            .sum()
    }

    /// Returns constraints with at least one violation.
    pub fn violated_constraints(&self) -> Vec<&ConstraintAnalysis> {
        self.constraint_analyses
            .iter()
            .filter(|a| a.violations > 0)
            .collect()
    }
}
