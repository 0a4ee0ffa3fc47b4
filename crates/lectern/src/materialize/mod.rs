//! Result materializer.
//!
//! Turns the winning [`Solution`] into [`TimetableRecord`]s for one
//! period. Entries that cannot be formatted are logged and skipped; the
//! rest are written.

use lectern_config::MaterializerConfig;
use lectern_core::{
    Assignment, PeriodId, RecordId, RoomId, SectionId, SectionInfo, Snapshot, Solution, TimeSlot,
    TimeslotId,
};
use thiserror::Error;
use tracing::warn;

use crate::record::TimetableRecord;

/// Why one assignment could not be materialized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MaterializeError {
    #[error("assignment references unknown section {0}")]
    UnknownSection(SectionId),

    #[error("section {section} is assigned unknown room {room}")]
    UnknownRoom { section: SectionId, room: RoomId },

    #[error("section {section} block starting at {start} uses an unknown timeslot")]
    MissingTimeslot { section: SectionId, start: TimeslotId },

    #[error("section {section} block starting at {start} crosses into another day")]
    CrossDay { section: SectionId, start: TimeslotId },
}

impl MaterializeError {
    pub fn section(&self) -> SectionId {
        match *self {
            Self::UnknownSection(section)
            | Self::UnknownRoom { section, .. }
            | Self::MissingTimeslot { section, .. }
            | Self::CrossDay { section, .. } => section,
        }
    }
}

/// Output of [`Materializer::materialize`].
#[derive(Debug, Clone, Default)]
pub struct Materialized {
    pub records: Vec<TimetableRecord>,
    pub skipped: Vec<MaterializeError>,
}

/// Formats assignments against one snapshot.
#[derive(Debug, Clone)]
pub struct Materializer<'a> {
    snapshot: &'a Snapshot,
    companion_venue: String,
}

// A formatted entry plus the sort key of its block start.
struct Entry<'s> {
    record: TimetableRecord,
    section: &'s SectionInfo,
    first: &'s TimeSlot,
    last: &'s TimeSlot,
}

impl<'a> Materializer<'a> {
    pub fn new(snapshot: &'a Snapshot, config: &MaterializerConfig) -> Self {
        Self {
            snapshot,
            companion_venue: config.companion_venue.clone(),
        }
    }

    /// Builds one record per formattable assignment of `solution`.
    ///
    /// Every record starts with `conflict = true`; the conflict audit
    /// settles the real status.
    pub fn materialize(&self, period: PeriodId, solution: &Solution) -> Materialized {
        let mut entries = Vec::with_capacity(solution.len());
        let mut skipped = Vec::new();
        for assignment in solution {
            match self.entry(period, assignment) {
                Ok(entry) => entries.push(entry),
                Err(err) => {
                    warn!(
                        event = "materialize_skipped",
                        section = %err.section(),
                        reason = %err,
                    );
                    skipped.push(err);
                }
            }
        }

        let companion_lines: Vec<Option<String>> = entries
            .iter()
            .map(|entry| self.companion_line(entry, &entries))
            .collect();
        let records = entries
            .into_iter()
            .zip(companion_lines)
            .map(|(mut entry, line)| {
                if let Some(line) = line {
                    entry.record.display_text.push('\n');
                    entry.record.display_text.push_str(&line);
                }
                entry.record
            })
            .collect();

        Materialized { records, skipped }
    }

    fn entry(
        &self,
        period: PeriodId,
        assignment: &Assignment,
    ) -> Result<Entry<'a>, MaterializeError> {
        let snapshot = self.snapshot;
        let section = snapshot
            .section(assignment.section)
            .ok_or(MaterializeError::UnknownSection(assignment.section))?;
        let room = snapshot
            .room(assignment.room)
            .ok_or(MaterializeError::UnknownRoom {
                section: section.id,
                room: assignment.room,
            })?;

        let block = snapshot.expand(assignment.start, section.block_len());
        let start = assignment.start;
        if block.missing > 0 {
            return Err(MaterializeError::MissingTimeslot {
                section: section.id,
                start,
            });
        }
        if block.cross_day > 0 {
            return Err(MaterializeError::CrossDay {
                section: section.id,
                start,
            });
        }
        let (first, last) = match (block.slots.first(), block.slots.last()) {
            (Some(&first), Some(&last)) => (first, last),
            _ => {
                return Err(MaterializeError::MissingTimeslot {
                    section: section.id,
                    start,
                })
            }
        };
        let missing = || MaterializeError::MissingTimeslot {
            section: section.id,
            start,
        };
        let first = snapshot.timeslot(first).ok_or_else(missing)?;
        let last = snapshot.timeslot(last).ok_or_else(missing)?;

        let record = TimetableRecord {
            id: RecordId::default(),
            period,
            section_id: section.id,
            room_id: room.id,
            timeslot_ids: block.slots,
            conflict: true,
            class_label: section.label.clone(),
            capacity: section.capacity,
            display_text: format!("1. {} - {}", room.code, timing(first, last)),
            fallback: assignment.fallback,
            lecturer_ids: section.lecturers.to_vec(),
        };
        Ok(Entry {
            record,
            section,
            first,
            last,
        })
    }

    /// Shared venue line, timed by the earliest block among the section
    /// and its companions.
    fn companion_line(&self, entry: &Entry<'_>, entries: &[Entry<'_>]) -> Option<String> {
        if !entry.section.has_companions() {
            return None;
        }
        let group = |e: &&Entry<'_>| {
            e.section.id == entry.section.id || entry.section.companions.contains(&e.section.id)
        };
        // min_by_key keeps the first of equal keys, so ties go to record order.
        let earliest = entries
            .iter()
            .filter(group)
            .min_by_key(|e| (e.first.day_index, e.first.start))?;
        Some(format!(
            "2. {} - {}",
            self.companion_venue,
            timing(earliest.first, earliest.last)
        ))
    }
}

fn timing(first: &TimeSlot, last: &TimeSlot) -> String {
    format!(
        "{} ({} - {})",
        first.day,
        first.start.format("%H:%M"),
        last.end.format("%H:%M")
    )
}

#[cfg(test)]
mod tests;
