//! Read-only view of everything one scheduling run needs.
//!
//! A [`Snapshot`] is built once from a [`Catalog`], shared by reference with
//! every component of the run and dropped after materialization. Broken
//! references are reported in a [`SnapshotReport`] and skipped, never fatal.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

use chrono::TimeDelta;
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::domain::{Catalog, Course, CourseType, Lecturer, LecturerPreference, Room, TimeSlot};
use crate::error::DataIntegrityError;
use crate::ids::{LecturerId, RoomId, SectionId, TimeslotId};

/// A slot starting more than this many minutes after the previous slot
/// of the same day ends is a recess slot.
pub const RECESS_GAP_MINUTES: i64 = 10;

/// A section joined with its course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionInfo {
    pub id: SectionId,
    pub course_code: String,
    pub course_name: String,
    pub label: String,
    pub capacity: u32,
    pub lecturers: SmallVec<[LecturerId; 2]>,
    pub credit_hours: u32,
    pub course_type: CourseType,
    /// Sibling sections sharing one merged large lecture.
    pub companions: Vec<SectionId>,
}

impl SectionInfo {
    /// Number of consecutive slots a block of this section occupies.
    ///
    /// Practical sections take twice their credit hours.
    #[inline]
    pub fn block_len(&self) -> u32 {
        self.credit_hours
            .saturating_mul(self.course_type.block_factor())
    }

    /// Returns true if the section shares a large lecture with siblings.
    #[inline]
    pub fn has_companions(&self) -> bool {
        !self.companions.is_empty()
    }
}

/// Result of expanding an assignment into its implied slot ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockExpansion {
    /// Slot ids that exist and share the first slot's day, in order.
    pub slots: Vec<TimeslotId>,
    /// Ids of the block missing from the snapshot.
    pub missing: u32,
    /// Ids of the block that fall on another day than the first slot.
    pub cross_day: u32,
}

impl BlockExpansion {
    /// Returns true if every id of the block exists on the same day.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.missing == 0 && self.cross_day == 0
    }
}

/// Issues found while building a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotReport {
    pub issues: Vec<DataIntegrityError>,
}

impl SnapshotReport {
    fn push(&mut self, issue: DataIntegrityError) {
        warn!(event = "data_integrity", issue = %issue);
        self.issues.push(issue);
    }

    /// Returns true if no issue was found.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Number of sections that were skipped entirely.
    pub fn skipped_sections(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| {
                matches!(
                    issue,
                    DataIntegrityError::UnknownCourse { .. }
                        | DataIntegrityError::NonPositiveCreditHours { .. }
                        | DataIntegrityError::BlockTooLong { .. }
                        | DataIntegrityError::DuplicateSection(_)
                )
            })
            .count()
    }
}

/// Immutable, indexed view of one run's input data.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    sections: Vec<SectionInfo>,
    section_index: HashMap<SectionId, usize>,
    rooms: Vec<Room>,
    room_index: HashMap<RoomId, usize>,
    rooms_by_type: HashMap<CourseType, Vec<RoomId>>,
    timeslots: Vec<TimeSlot>,
    timeslot_index: HashMap<TimeslotId, usize>,
    recess: HashSet<TimeslotId>,
    lecturers: HashMap<LecturerId, Lecturer>,
    preferences: HashMap<(SectionId, LecturerId), LecturerPreference>,
    valid_starts: HashMap<u32, Vec<usize>>,
}

impl Snapshot {
    /// Joins and indexes a catalog.
    ///
    /// Sections whose course cannot be resolved, whose course has no credit
    /// hours, or whose block is longer than the timetable are skipped.
    /// Repeated lecturer ids of a section are collapsed. Unknown companions and preferences for
    /// skipped sections are dropped. Unknown lecturer ids are kept so that
    /// lecturer conflicts are still detected, but reported.
    pub fn build(catalog: Catalog) -> (Snapshot, SnapshotReport) {
        let Catalog {
            courses,
            sections,
            rooms,
            timeslots,
            lecturers,
            preferences,
        } = catalog;

        let mut report = SnapshotReport::default();
        let mut snapshot = Snapshot::default();

        snapshot.index_timeslots(timeslots, &mut report);
        snapshot.index_rooms(rooms);
        snapshot.lecturers = lecturers.into_iter().map(|l| (l.id, l)).collect();

        let courses: HashMap<&str, &Course> =
            courses.iter().map(|c| (c.code.as_str(), c)).collect();

        let mut records = sections;
        records.sort_by_key(|r| r.id);
        for record in records {
            if snapshot.section_index.contains_key(&record.id) {
                report.push(DataIntegrityError::DuplicateSection(record.id));
                continue;
            }
            let Some(course) = courses.get(record.course_code.as_str()) else {
                report.push(DataIntegrityError::UnknownCourse {
                    section: record.id,
                    course_code: record.course_code,
                });
                continue;
            };
            if course.credit_hours == 0 {
                report.push(DataIntegrityError::NonPositiveCreditHours {
                    section: record.id,
                    course_code: record.course_code,
                });
                continue;
            }
            let block_len =
                u64::from(course.credit_hours) * u64::from(course.course_type.block_factor());
            let timeslot_count = snapshot.timeslots.len();
            if timeslot_count > 0 && block_len > timeslot_count as u64 {
                report.push(DataIntegrityError::BlockTooLong {
                    section: record.id,
                    course_code: record.course_code,
                    block_len,
                    timeslots: timeslot_count,
                });
                continue;
            }

            let mut section_lecturers: SmallVec<[LecturerId; 2]> = SmallVec::new();
            for lecturer in record.lecturers {
                if section_lecturers.contains(&lecturer) {
                    report.push(DataIntegrityError::DuplicateLecturer {
                        section: record.id,
                        lecturer,
                    });
                    continue;
                }
                if !snapshot.lecturers.contains_key(&lecturer) {
                    report.push(DataIntegrityError::UnknownLecturer {
                        section: record.id,
                        lecturer,
                    });
                }
                section_lecturers.push(lecturer);
            }

            snapshot
                .section_index
                .insert(record.id, snapshot.sections.len());
            snapshot.sections.push(SectionInfo {
                id: record.id,
                course_code: record.course_code,
                course_name: course.name.clone(),
                label: record.label,
                capacity: record.capacity,
                lecturers: section_lecturers,
                credit_hours: course.credit_hours,
                course_type: course.course_type,
                companions: record.companions,
            });
        }

        let known: HashSet<SectionId> = snapshot.section_index.keys().copied().collect();
        for section in &mut snapshot.sections {
            let id = section.id;
            section.companions.retain(|companion| {
                let keep = *companion != id && known.contains(companion);
                if !keep && *companion != id {
                    report.push(DataIntegrityError::UnknownCompanion {
                        section: id,
                        companion: *companion,
                    });
                }
                keep
            });
        }

        for preference in preferences {
            if !known.contains(&preference.section) {
                report.push(DataIntegrityError::UnknownPreferenceSection {
                    section: preference.section,
                    lecturer: preference.lecturer,
                });
                continue;
            }
            snapshot
                .preferences
                .insert((preference.section, preference.lecturer), preference);
        }

        let lengths: HashSet<u32> = snapshot.sections.iter().map(|s| s.block_len()).collect();
        for len in lengths {
            let starts = snapshot.compute_valid_starts(len);
            snapshot.valid_starts.insert(len, starts);
        }

        debug!(
            event = "snapshot_built",
            section_count = snapshot.sections.len() as u64,
            room_count = snapshot.rooms.len() as u64,
            timeslot_count = snapshot.timeslots.len() as u64,
            recess_count = snapshot.recess.len() as u64,
            issues = report.issues.len() as u64,
        );

        (snapshot, report)
    }

    fn index_timeslots(&mut self, timeslots: Vec<TimeSlot>, report: &mut SnapshotReport) {
        let mut seen = HashSet::new();
        let mut ordered = Vec::with_capacity(timeslots.len());
        for slot in timeslots {
            if seen.insert(slot.id) {
                ordered.push(slot);
            } else {
                report.push(DataIntegrityError::DuplicateTimeslot(slot.id));
            }
        }
        ordered.sort_by(|a, b| {
            (a.day_index, a.start, a.id).cmp(&(b.day_index, b.start, b.id))
        });

        let gap = TimeDelta::minutes(RECESS_GAP_MINUTES);
        for pair in ordered.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if prev.day_index == next.day_index && next.start - prev.end > gap {
                self.recess.insert(next.id);
            }
        }

        self.timeslot_index = ordered
            .iter()
            .enumerate()
            .map(|(position, slot)| (slot.id, position))
            .collect();
        self.timeslots = ordered;
    }

    fn index_rooms(&mut self, rooms: Vec<Room>) {
        for room in rooms {
            if self.room_index.contains_key(&room.id) {
                continue;
            }
            self.room_index.insert(room.id, self.rooms.len());
            self.rooms_by_type
                .entry(room.room_type)
                .or_default()
                .push(room.id);
            self.rooms.push(room);
        }
    }

    fn compute_valid_starts(&self, len: u32) -> Vec<usize> {
        let len = len as usize;
        if len == 0 || len > self.timeslots.len() {
            return Vec::new();
        }
        (0..=self.timeslots.len() - len)
            .filter(|&position| self.is_valid_block(&self.timeslots[position..position + len]))
            .collect()
    }

    fn is_valid_block(&self, slots: &[TimeSlot]) -> bool {
        let Some(first) = slots.first() else {
            return false;
        };
        slots.windows(2).all(|pair| {
            pair[1].day_index == first.day_index
                && pair[0].id.is_followed_by(pair[1].id)
                && !self.recess.contains(&pair[1].id)
        })
    }

    /// Sections in ascending id order.
    pub fn sections(&self) -> &[SectionInfo] {
        &self.sections
    }

    pub fn section(&self, id: SectionId) -> Option<&SectionInfo> {
        self.section_index.get(&id).map(|&i| &self.sections[i])
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.room_index.get(&id).map(|&i| &self.rooms[i])
    }

    /// Rooms whose type matches `course_type`.
    pub fn compatible_rooms(&self, course_type: CourseType) -> &[RoomId] {
        self.rooms_by_type
            .get(&course_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Timeslots ordered by day, then start time.
    pub fn timeslots(&self) -> &[TimeSlot] {
        &self.timeslots
    }

    pub fn timeslot(&self, id: TimeslotId) -> Option<&TimeSlot> {
        self.timeslot_index.get(&id).map(|&i| &self.timeslots[i])
    }

    /// Slots that follow a gap of more than [`RECESS_GAP_MINUTES`].
    pub fn recess(&self) -> &HashSet<TimeslotId> {
        &self.recess
    }

    pub fn is_recess(&self, id: TimeslotId) -> bool {
        self.recess.contains(&id)
    }

    pub fn lecturer(&self, id: LecturerId) -> Option<&Lecturer> {
        self.lecturers.get(&id)
    }

    pub fn preference(&self, section: SectionId, lecturer: LecturerId) -> Option<&LecturerPreference> {
        self.preferences.get(&(section, lecturer))
    }

    /// Returns true if any lecturer of the section has an administrative duty.
    pub fn has_admin_duty_lecturer(&self, section: &SectionInfo) -> bool {
        section
            .lecturers
            .iter()
            .filter_map(|id| self.lecturer(*id))
            .any(Lecturer::has_admin_duty)
    }

    /// Returns true if a lecturer of the section needs an accessible room.
    pub fn needs_accessible_room(&self, section: &SectionInfo, lecturer: LecturerId) -> bool {
        let flagged = self
            .preference(section.id, lecturer)
            .is_some_and(|p| p.special_needs);
        flagged || self.lecturer(lecturer).is_some_and(|l| l.accessibility_needs)
    }

    /// Ordered positions at which a valid block of `len` slots starts.
    ///
    /// A valid block stays on one day, has consecutive ids and contains no
    /// recess slot after its first.
    pub fn valid_block_positions(&self, len: u32) -> Cow<'_, [usize]> {
        match self.valid_starts.get(&len) {
            Some(starts) => Cow::Borrowed(starts),
            None => Cow::Owned(self.compute_valid_starts(len)),
        }
    }

    /// The `len` slots starting at ordered `position`.
    pub fn block_at(&self, position: usize, len: u32) -> Option<&[TimeSlot]> {
        let end = position.checked_add(len as usize)?;
        self.timeslots.get(position..end)
    }

    /// Expands a block by id arithmetic, classifying every id.
    ///
    /// A start id missing from the snapshot makes the whole block missing.
    pub fn expand(&self, start: TimeslotId, len: u32) -> BlockExpansion {
        let Some(first) = self.timeslot(start) else {
            return BlockExpansion {
                slots: Vec::new(),
                missing: len,
                cross_day: 0,
            };
        };
        let mut expansion = BlockExpansion {
            slots: Vec::with_capacity((len as usize).min(self.timeslots.len())),
            ..BlockExpansion::default()
        };
        for offset in 0..len {
            let found = start
                .offset(offset)
                .and_then(|id| Some((id, self.timeslot(id)?)));
            match found {
                None => expansion.missing += 1,
                Some((_, slot)) if slot.day_index != first.day_index => expansion.cross_day += 1,
                Some((id, _)) => expansion.slots.push(id),
            }
        }
        expansion
    }

    /// Returns true if the block starting at `start` is fully valid:
    /// same day, consecutive ids, no recess slot after the first.
    pub fn is_valid_block_start(&self, start: TimeslotId, len: u32) -> bool {
        self.timeslot_index
            .get(&start)
            .and_then(|&position| self.block_at(position, len))
            .is_some_and(|slots| slots.len() == len as usize && self.is_valid_block(slots))
    }
}

#[cfg(test)]
mod tests;
