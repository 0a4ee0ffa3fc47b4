//! Solution generator.

use std::cmp::Reverse;

use lectern_core::{Assignment, Snapshot, Solution};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::heuristic::{candidate_starts, fallback_assignment, first_free_placement, Occupancy};

/// Builds initial solutions by constrained-first greedy placement.
///
/// Sections are placed in order of descending block length, then
/// descending lecturer count. Each gets the first free (start, room) pair
/// over shuffled candidates, preferred starts first and Monday skipped for
/// administrative-duty lecturers. A section with no free pair gets a
/// random fallback placement, flagged on the assignment.
///
/// Generated solutions list assignments in snapshot section order.
#[derive(Debug, Clone)]
pub struct SolutionGenerator<'a> {
    snapshot: &'a Snapshot,
    order: Vec<usize>,
}

impl<'a> SolutionGenerator<'a> {
    pub fn new(snapshot: &'a Snapshot) -> Self {
        let sections = snapshot.sections();
        let mut order: Vec<usize> = (0..sections.len()).collect();
        order.sort_by_key(|&position| {
            let section = &sections[position];
            Reverse((section.block_len(), section.lecturers.len()))
        });
        Self { snapshot, order }
    }

    /// Section positions in placement order.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Solution {
        let snapshot = self.snapshot;
        let sections = snapshot.sections();
        let mut placed: Vec<Option<Assignment>> = vec![None; sections.len()];
        let mut occupancy = Occupancy::new();

        for &position in &self.order {
            let section = &sections[position];
            let mut rooms = snapshot.compatible_rooms(section.course_type).to_vec();
            rooms.shuffle(rng);
            let skip_monday = snapshot.has_admin_duty_lecturer(section);
            let starts = candidate_starts(snapshot, section, skip_monday, rng);

            let assignment = match first_free_placement(section, &rooms, &starts, &occupancy) {
                Some(assignment) => Some(assignment),
                None => fallback_assignment(snapshot, section, rng),
            };
            if let Some(assignment) = assignment {
                let block = snapshot.expand(assignment.start, section.block_len());
                occupancy.occupy(assignment.room, &section.lecturers, &block.slots);
                placed[position] = Some(assignment);
            }
        }

        placed.into_iter().flatten().collect()
    }

    pub fn population<R: Rng + ?Sized>(&self, size: usize, rng: &mut R) -> Vec<Solution> {
        (0..size).map(|_| self.generate(rng)).collect()
    }
}
