//! Conflict audit over persisted records.
//!
//! Three rules, each naming every record involved:
//!
//! - room: two records in one room with the same timeslot set
//! - lecturer: two records sharing a lecturer with the same timeslot set
//! - overlap: two records of one section sharing any timeslot
//!
//! The audit reads records only; it never consults the search. Running it
//! twice over unchanged records yields the same flags.

use std::collections::{BTreeSet, HashMap};
use std::hash::Hash;

use lectern_core::{RecordId, TimeslotId};
use serde::{Deserialize, Serialize};

use crate::record::TimetableRecord;

/// Record ids implicated by each rule, sorted and deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditReport {
    pub room_conflicts: Vec<RecordId>,
    pub lecturer_conflicts: Vec<RecordId>,
    pub overlapping_timeslots: Vec<RecordId>,
}

impl AuditReport {
    /// Union of all rules: the records whose conflict flag must be set.
    pub fn flagged(&self) -> BTreeSet<RecordId> {
        self.room_conflicts
            .iter()
            .chain(&self.lecturer_conflicts)
            .chain(&self.overlapping_timeslots)
            .copied()
            .collect()
    }

    pub fn is_clean(&self) -> bool {
        self.room_conflicts.is_empty()
            && self.lecturer_conflicts.is_empty()
            && self.overlapping_timeslots.is_empty()
    }
}

/// Applies the three rules to `records`.
///
/// # Examples
///
/// ```
/// use lectern::audit::find_conflicts;
///
/// let report = find_conflicts(&[]);
/// assert!(report.is_clean());
/// ```
pub fn find_conflicts(records: &[TimetableRecord]) -> AuditReport {
    let slot_sets: Vec<Vec<TimeslotId>> = records.iter().map(TimetableRecord::slot_set).collect();

    let room_conflicts = duplicated(records.iter().zip(&slot_sets).map(|(record, slots)| {
        (record.id, (record.room_id, slots.as_slice()))
    }));

    let lecturer_conflicts = duplicated(records.iter().zip(&slot_sets).flat_map(
        |(record, slots)| {
            record
                .lecturer_ids
                .iter()
                .map(move |&lecturer| (record.id, (lecturer, slots.as_slice())))
        },
    ));

    let mut overlapping = BTreeSet::new();
    let mut by_section: HashMap<_, Vec<&TimetableRecord>> = HashMap::new();
    for record in records {
        by_section.entry(record.section_id).or_default().push(record);
    }
    for group in by_section.values() {
        for (i, a) in group.iter().enumerate() {
            for b in &group[i + 1..] {
                if a.id != b.id && a.overlaps(b) {
                    overlapping.insert(a.id);
                    overlapping.insert(b.id);
                }
            }
        }
    }

    AuditReport {
        room_conflicts,
        lecturer_conflicts,
        overlapping_timeslots: overlapping.into_iter().collect(),
    }
}

// Ids of every distinct record whose key is shared with another record.
fn duplicated<K: Hash + Eq>(keyed: impl Iterator<Item = (RecordId, K)>) -> Vec<RecordId> {
    let mut groups: HashMap<K, BTreeSet<RecordId>> = HashMap::new();
    for (id, key) in keyed {
        groups.entry(key).or_default().insert(id);
    }
    let ids: BTreeSet<RecordId> = groups
        .into_values()
        .filter(|ids| ids.len() > 1)
        .flatten()
        .collect();
    ids.into_iter().collect()
}
