//! Interfaces for persistent storage of visit records and exposure events, and in-memory implementations.
//! A production implementation would be a key-value store like LevelDb or Rocksdb, or the platform's
//! secure storage.

use crate::{
    scan::ExposureEvent,
    visit::{EncryptedVisit, VisitId},
};
use alloc::collections::{btree_map::Entry, BTreeMap};
use ark_std::vec::Vec;

/// Database interface for encrypted visit records. Records are grouped by the [`VisitId`] of the check-in
/// they were created for.
pub trait VisitStore {
    /// Add records. Records with an id already present are added to that id's records.
    fn add(&mut self, visits: Vec<EncryptedVisit>);

    /// Remove all records of a check-in. Returns false if there was none.
    fn remove(&mut self, id: &VisitId) -> bool;

    /// Check if there are records for the check-in
    fn has(&self, id: &VisitId) -> bool;

    /// All records filed under the given day
    fn visits_on_day(&self, day: u64) -> Vec<EncryptedVisit>;

    fn all_visits(&self) -> Vec<EncryptedVisit>;

    fn is_empty(&self) -> bool;

    /// Remove all records filed under a day before `day`
    fn remove_before_day(&mut self, day: u64);

    fn clear(&mut self);
}

/// Database interface for exposure events. At most one event is kept per visit id, an event for a visit
/// id already present is ignored.
pub trait ExposureStore {
    /// Add events, returns the ones that were new
    fn add(&mut self, events: Vec<ExposureEvent>) -> Vec<ExposureEvent>;

    fn events(&self) -> Vec<ExposureEvent>;

    /// Remove the event of a visit. Returns false if there was none.
    fn remove(&mut self, id: &VisitId) -> bool;

    /// Remove events of visits that ended at or before `timestamp`
    fn remove_departed_by(&mut self, timestamp: u64);

    fn clear(&mut self);
}

#[derive(Clone, Debug, Default)]
pub struct InMemoryVisitStore {
    pub db: BTreeMap<VisitId, Vec<EncryptedVisit>>,
}

impl InMemoryVisitStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl VisitStore for InMemoryVisitStore {
    fn add(&mut self, visits: Vec<EncryptedVisit>) {
        for v in visits {
            self.db.entry(v.id).or_default().push(v);
        }
    }

    fn remove(&mut self, id: &VisitId) -> bool {
        self.db.remove(id).is_some()
    }

    fn has(&self, id: &VisitId) -> bool {
        self.db.contains_key(id)
    }

    fn visits_on_day(&self, day: u64) -> Vec<EncryptedVisit> {
        self.db
            .values()
            .flatten()
            .filter(|v| v.day_bucket == day)
            .cloned()
            .collect()
    }

    fn all_visits(&self) -> Vec<EncryptedVisit> {
        self.db.values().flatten().cloned().collect()
    }

    fn is_empty(&self) -> bool {
        self.db.is_empty()
    }

    fn remove_before_day(&mut self, day: u64) {
        for visits in self.db.values_mut() {
            visits.retain(|v| v.day_bucket >= day);
        }
        self.db.retain(|_, visits| !visits.is_empty());
    }

    fn clear(&mut self) {
        self.db.clear();
    }
}

#[derive(Clone, Debug, Default)]
pub struct InMemoryExposureStore {
    pub db: BTreeMap<VisitId, ExposureEvent>,
}

impl InMemoryExposureStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ExposureStore for InMemoryExposureStore {
    fn add(&mut self, events: Vec<ExposureEvent>) -> Vec<ExposureEvent> {
        let mut new = Vec::new();
        for e in events {
            if let Entry::Vacant(slot) = self.db.entry(e.visit_id) {
                slot.insert(e.clone());
                new.push(e);
            }
        }
        new
    }

    fn events(&self) -> Vec<ExposureEvent> {
        self.db.values().cloned().collect()
    }

    fn remove(&mut self, id: &VisitId) -> bool {
        self.db.remove(id).is_some()
    }

    fn remove_departed_by(&mut self, timestamp: u64) {
        self.db.retain(|_, e| e.departure_time > timestamp);
    }

    fn clear(&mut self) {
        self.db.clear();
    }
}
