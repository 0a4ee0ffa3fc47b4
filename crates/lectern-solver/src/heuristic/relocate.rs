//! Relocate move: one assignment to a new room and block.

use lectern_core::{Assignment, Snapshot, Solution};
use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;

use super::placement::{candidate_starts, fallback_assignment, first_free_placement};
use super::Occupancy;

/// Replaces the assignment at `index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelocateMove {
    pub index: usize,
    pub assignment: Assignment,
}

impl RelocateMove {
    /// Applies the move, returning the replaced assignment for undo.
    pub fn apply(&self, solution: &mut Solution) -> Option<Assignment> {
        let previous = *solution.get(self.index)?;
        solution.set(self.index, self.assignment);
        Some(previous)
    }
}

/// Simulated annealing neighbour.
///
/// Picks one assignment uniformly and moves it to a random compatible room
/// and a random valid block. Conflicts are left to the evaluator. Falls back
/// to a random placement if the section has no compatible room or no valid
/// block.
pub fn random_relocation<R: Rng + ?Sized>(
    snapshot: &Snapshot,
    solution: &Solution,
    rng: &mut R,
) -> Option<RelocateMove> {
    if solution.is_empty() {
        return None;
    }
    let index = rng.random_range(0..solution.len());
    let section = snapshot.section(solution.get(index)?.section)?;
    let len = section.block_len();

    let room = snapshot.compatible_rooms(section.course_type).choose(rng).copied();
    let start = snapshot
        .valid_block_positions(len)
        .choose(rng)
        .and_then(|&position| snapshot.timeslots().get(position))
        .map(|slot| slot.id);

    let assignment = match (room, start) {
        (Some(room), Some(start)) => Assignment::new(section.id, room, start),
        _ => fallback_assignment(snapshot, section, rng)?,
    };
    Some(RelocateMove { index, assignment })
}

/// Genetic mutation.
///
/// Picks one assignment uniformly and moves it to the first free
/// (start, room) pair, trying preferred starts first. If every block is
/// taken, the first candidate start is used anyway with a random compatible
/// room; if there is no valid block at all, a random fallback placement.
pub fn repairing_relocation<R: Rng + ?Sized>(
    snapshot: &Snapshot,
    solution: &Solution,
    rng: &mut R,
) -> Option<RelocateMove> {
    if solution.is_empty() {
        return None;
    }
    let index = rng.random_range(0..solution.len());
    let section = snapshot.section(solution.get(index)?.section)?;

    let occupancy = Occupancy::from_solution(snapshot, solution, Some(index));
    let mut rooms = snapshot.compatible_rooms(section.course_type).to_vec();
    rooms.shuffle(rng);
    let skip_monday = snapshot.has_admin_duty_lecturer(section);
    let starts = candidate_starts(snapshot, section, skip_monday, rng);

    let assignment = match first_free_placement(section, &rooms, &starts, &occupancy) {
        Some(assignment) => assignment,
        None => match (rooms.first(), starts.first()) {
            (Some(&room), Some(&start)) => Assignment::new(section.id, room, start),
            _ => fallback_assignment(snapshot, section, rng)?,
        },
    };
    Some(RelocateMove { index, assignment })
}
