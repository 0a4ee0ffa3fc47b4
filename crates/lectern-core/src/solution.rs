//! Candidate schedules.

use serde::{Deserialize, Serialize};

use crate::ids::{RoomId, SectionId, TimeslotId};

/// Placement of one section: a room and the first slot of its block.
///
/// The remaining `block_len - 1` slots are implied consecutive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    pub section: SectionId,
    pub room: RoomId,
    pub start: TimeslotId,
    /// Set when the placement came from the random fallback path and may
    /// violate contiguity, recess or occupancy rules.
    #[serde(default)]
    pub fallback: bool,
}

impl Assignment {
    /// Creates a regular (non-fallback) assignment.
    pub const fn new(section: SectionId, room: RoomId, start: TimeslotId) -> Self {
        Self {
            section,
            room,
            start,
            fallback: false,
        }
    }

    /// Creates an assignment produced by the random fallback path.
    pub const fn fallback(section: SectionId, room: RoomId, start: TimeslotId) -> Self {
        Self {
            section,
            room,
            start,
            fallback: true,
        }
    }
}

/// A full schedule: one assignment per section.
///
/// Assignments are kept in snapshot section order so that two solutions
/// built from the same snapshot can be crossed over index by index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    assignments: Vec<Assignment>,
}

impl Solution {
    /// Creates a solution from assignments already in section order.
    pub fn new(assignments: Vec<Assignment>) -> Self {
        Self { assignments }
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Assignment> {
        self.assignments.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Assignment> {
        self.assignments.get(index)
    }

    /// Replaces the assignment at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn set(&mut self, index: usize, assignment: Assignment) {
        self.assignments[index] = assignment;
    }

    /// Returns the assignment of `section`, if any.
    pub fn find(&self, section: SectionId) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.section == section)
    }

    /// Number of assignments placed by the fallback path.
    pub fn fallback_count(&self) -> usize {
        self.assignments.iter().filter(|a| a.fallback).count()
    }

    /// Builds two children by swapping the tails of `self` and `other` at `cut`.
    ///
    /// Both parents must be aligned by section order.
    pub fn crossover(&self, other: &Solution, cut: usize) -> (Solution, Solution) {
        let cut = cut.min(self.len()).min(other.len());
        let mut first = Vec::with_capacity(other.len());
        first.extend_from_slice(&self.assignments[..cut]);
        first.extend_from_slice(&other.assignments[cut..]);

        let mut second = Vec::with_capacity(self.len());
        second.extend_from_slice(&other.assignments[..cut]);
        second.extend_from_slice(&self.assignments[cut..]);

        (Solution::new(first), Solution::new(second))
    }
}

impl FromIterator<Assignment> for Solution {
    fn from_iter<I: IntoIterator<Item = Assignment>>(iter: I) -> Self {
        Solution::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Solution {
    type Item = &'a Assignment;
    type IntoIter = std::slice::Iter<'a, Assignment>;

    fn into_iter(self) -> Self::IntoIter {
        self.assignments.iter()
    }
}
