//! Room and lecturer occupancy bookkeeping.

use std::collections::HashSet;

use lectern_core::{LecturerId, RoomId, Snapshot, Solution, TimeslotId};

/// Which (room, slot) and (lecturer, slot) pairs are already taken.
#[derive(Debug, Default, Clone)]
pub struct Occupancy {
    rooms: HashSet<(RoomId, TimeslotId)>,
    lecturers: HashSet<(LecturerId, TimeslotId)>,
}

impl Occupancy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Occupancy of every assignment in `solution` except the one at `skip`.
    pub fn from_solution(snapshot: &Snapshot, solution: &Solution, skip: Option<usize>) -> Self {
        let mut occupancy = Self::new();
        for (index, assignment) in solution.iter().enumerate() {
            if Some(index) == skip {
                continue;
            }
            let Some(section) = snapshot.section(assignment.section) else {
                continue;
            };
            let block = snapshot.expand(assignment.start, section.block_len());
            occupancy.occupy(assignment.room, &section.lecturers, &block.slots);
        }
        occupancy
    }

    /// Returns true if neither the room nor any lecturer is busy in `slots`.
    pub fn is_free(&self, room: RoomId, lecturers: &[LecturerId], slots: &[TimeslotId]) -> bool {
        slots.iter().all(|&slot| {
            !self.rooms.contains(&(room, slot))
                && lecturers
                    .iter()
                    .all(|&lecturer| !self.lecturers.contains(&(lecturer, slot)))
        })
    }

    pub fn occupy(&mut self, room: RoomId, lecturers: &[LecturerId], slots: &[TimeslotId]) {
        for &slot in slots {
            self.rooms.insert((room, slot));
            for &lecturer in lecturers {
                self.lecturers.insert((lecturer, slot));
            }
        }
    }
}
