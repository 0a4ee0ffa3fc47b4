//! Storage collaborator.
//!
//! [`TimetableStore`] is the seam to whatever persists catalogs and
//! timetables. [`InMemoryStore`] keeps everything in process and serves
//! tests and embedded use.

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use lectern_core::{Catalog, PeriodId, RecordId};
use parking_lot::{Mutex, RwLock};
use thiserror::Error;

use crate::record::{AcademicPeriod, TimetableRecord};

/// Errors raised by a [`TimetableStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unknown academic period {0}")]
    UnknownPeriod(PeriodId),

    #[error("record {record} does not belong to period {period}")]
    UnknownRecord { period: PeriodId, record: RecordId },

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Reads the catalog and reads and writes timetables per period.
///
/// Implementations must serialise writes per period: a
/// [`replace_schedule`](Self::replace_schedule) is one atomic clear and
/// insert, and [`set_conflict_flags`](Self::set_conflict_flags) applies all
/// flags or none.
pub trait TimetableStore: Send + Sync {
    /// Current catalog: sections, rooms, timeslots, lecturers, preferences.
    fn catalog(&self) -> Result<Catalog, StoreError>;

    fn periods(&self) -> Result<Vec<AcademicPeriod>, StoreError>;

    /// Records of `period`, in insertion order.
    fn records(&self, period: PeriodId) -> Result<Vec<TimetableRecord>, StoreError>;

    /// Replaces the schedule of `period`, returning the stored records
    /// with their assigned ids.
    fn replace_schedule(
        &self,
        period: PeriodId,
        records: Vec<TimetableRecord>,
    ) -> Result<Vec<TimetableRecord>, StoreError>;

    /// Deletes the schedule of `period`, returning the number of records
    /// removed.
    fn clear_schedule(&self, period: PeriodId) -> Result<usize, StoreError>;

    /// Sets the conflict flag of every record in `flagged` and clears it
    /// on every other record of `period`.
    fn set_conflict_flags(
        &self,
        period: PeriodId,
        flagged: &BTreeSet<RecordId>,
    ) -> Result<(), StoreError>;
}

type Schedule = Arc<Mutex<Vec<TimetableRecord>>>;

/// A [`TimetableStore`] held in memory, with one lock per period.
///
/// # Examples
///
/// ```
/// use lectern::{AcademicPeriod, InMemoryStore, TimetableStore};
/// use lectern_core::{Catalog, PeriodId};
///
/// let store = InMemoryStore::new(Catalog::default())
///     .with_period(AcademicPeriod::new(1, "2024/2025 Ganjil").with_active(true));
///
/// assert_eq!(store.periods().unwrap().len(), 1);
/// assert!(store.records(PeriodId(1)).unwrap().is_empty());
/// assert!(store.records(PeriodId(2)).is_err());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    catalog: RwLock<Catalog>,
    periods: RwLock<Vec<AcademicPeriod>>,
    schedules: RwLock<HashMap<PeriodId, Schedule>>,
    next_id: AtomicU32,
}

impl InMemoryStore {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: RwLock::new(catalog),
            ..Self::default()
        }
    }

    pub fn with_period(self, period: AcademicPeriod) -> Self {
        self.add_period(period);
        self
    }

    /// Adds a period, replacing any period with the same id.
    pub fn add_period(&self, period: AcademicPeriod) {
        let mut periods = self.periods.write();
        periods.retain(|p| p.id != period.id);
        periods.push(period);
    }

    /// Sets the active flag of one period.
    pub fn set_active(&self, period: PeriodId, active: bool) -> Result<(), StoreError> {
        let mut periods = self.periods.write();
        let entry = periods
            .iter_mut()
            .find(|p| p.id == period)
            .ok_or(StoreError::UnknownPeriod(period))?;
        entry.active = active;
        Ok(())
    }

    pub fn set_catalog(&self, catalog: Catalog) {
        *self.catalog.write() = catalog;
    }

    fn schedule(&self, period: PeriodId) -> Result<Schedule, StoreError> {
        if !self.periods.read().iter().any(|p| p.id == period) {
            return Err(StoreError::UnknownPeriod(period));
        }
        if let Some(schedule) = self.schedules.read().get(&period) {
            return Ok(Arc::clone(schedule));
        }
        let mut schedules = self.schedules.write();
        Ok(Arc::clone(schedules.entry(period).or_default()))
    }
}

impl TimetableStore for InMemoryStore {
    fn catalog(&self) -> Result<Catalog, StoreError> {
        Ok(self.catalog.read().clone())
    }

    fn periods(&self) -> Result<Vec<AcademicPeriod>, StoreError> {
        Ok(self.periods.read().clone())
    }

    fn records(&self, period: PeriodId) -> Result<Vec<TimetableRecord>, StoreError> {
        let schedule = self.schedule(period)?;
        let records = schedule.lock().clone();
        Ok(records)
    }

    fn replace_schedule(
        &self,
        period: PeriodId,
        records: Vec<TimetableRecord>,
    ) -> Result<Vec<TimetableRecord>, StoreError> {
        let schedule = self.schedule(period)?;
        let mut guard = schedule.lock();
        guard.clear();
        for mut record in records {
            record.id = RecordId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
            record.period = period;
            guard.push(record);
        }
        Ok(guard.clone())
    }

    fn clear_schedule(&self, period: PeriodId) -> Result<usize, StoreError> {
        let schedule = self.schedule(period)?;
        let mut guard = schedule.lock();
        let removed = guard.len();
        guard.clear();
        Ok(removed)
    }

    fn set_conflict_flags(
        &self,
        period: PeriodId,
        flagged: &BTreeSet<RecordId>,
    ) -> Result<(), StoreError> {
        let schedule = self.schedule(period)?;
        let mut guard = schedule.lock();
        if let Some(&record) = flagged
            .iter()
            .find(|&&id| !guard.iter().any(|r| r.id == id))
        {
            return Err(StoreError::UnknownRecord { period, record });
        }
        for record in guard.iter_mut() {
            record.conflict = flagged.contains(&record.id);
        }
        Ok(())
    }
}
