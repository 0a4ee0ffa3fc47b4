//! Candidate blocks and the random fallback.

use lectern_core::{Assignment, InfeasibleAssignment, RoomId, SectionInfo, Snapshot, TimeslotId};
use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use tracing::warn;

use super::Occupancy;

/// Valid block starts of `section`, each group shuffled: starts every
/// lecturer's preference accepts first, then the rest.
///
/// With `skip_monday` set, blocks on day index 0 are left out.
pub fn candidate_starts<R: Rng + ?Sized>(
    snapshot: &Snapshot,
    section: &SectionInfo,
    skip_monday: bool,
    rng: &mut R,
) -> Vec<TimeslotId> {
    let len = section.block_len();
    let mut preferred = Vec::new();
    let mut rest = Vec::new();
    let mut ids = Vec::with_capacity(len as usize);

    for &position in snapshot.valid_block_positions(len).iter() {
        let Some(block) = snapshot.block_at(position, len) else {
            continue;
        };
        let Some(first) = block.first() else {
            continue;
        };
        if skip_monday && first.day_index == 0 {
            continue;
        }
        ids.clear();
        ids.extend(block.iter().map(|slot| slot.id));
        if accepted_by_all(snapshot, section, &ids) {
            preferred.push(first.id);
        } else {
            rest.push(first.id);
        }
    }

    preferred.shuffle(rng);
    rest.shuffle(rng);
    preferred.extend(rest);
    preferred
}

fn accepted_by_all(snapshot: &Snapshot, section: &SectionInfo, block: &[TimeslotId]) -> bool {
    section.lecturers.iter().all(|&lecturer| {
        snapshot
            .preference(section.id, lecturer)
            .map_or(true, |preference| preference.accepts_block(block))
    })
}

/// First (start, room) pair, in the given orders, whose block is free.
///
/// `starts` must be valid block starts of `section`.
pub fn first_free_placement(
    section: &SectionInfo,
    rooms: &[RoomId],
    starts: &[TimeslotId],
    occupancy: &Occupancy,
) -> Option<Assignment> {
    let len = section.block_len();
    let mut slots = Vec::with_capacity(len as usize);
    for &start in starts {
        slots.clear();
        slots.extend((0..len).filter_map(|offset| start.offset(offset)));
        if let Some(&room) = rooms
            .iter()
            .find(|&&room| occupancy.is_free(room, &section.lecturers, &slots))
        {
            return Some(Assignment::new(section.id, room, start));
        }
    }
    None
}

/// Uniformly random room and start, ignoring contiguity, recess and
/// occupancy.
///
/// Prefers a compatible room when one exists. Returns `None` only when the
/// snapshot has no rooms or no timeslots.
pub fn fallback_assignment<R: Rng + ?Sized>(
    snapshot: &Snapshot,
    section: &SectionInfo,
    rng: &mut R,
) -> Option<Assignment> {
    let room = match snapshot.compatible_rooms(section.course_type).choose(rng) {
        Some(&room) => room,
        None => snapshot.rooms().choose(rng)?.id,
    };
    let start = snapshot.timeslots().choose(rng)?.id;

    let issue = InfeasibleAssignment {
        section: section.id,
        block_len: section.block_len(),
    };
    warn!(
        event = "infeasible_assignment",
        section = %section.id,
        room = %room,
        start = %start,
        issue = %issue,
    );
    Some(Assignment::fallback(section.id, room, start))
}
