//! Matching released secrets against locally stored visit records.
//!
//! For every pair of released secret and visit record of the secret's day, the record is decrypted with the
//! released key. A record matches if decryption (including the re-encryption check) succeeds, the visit
//! overlaps the secret's time window and the venue's associated data opens with the notification key from
//! the record. Every pair is independent so with the `parallel` feature the secrets are processed in
//! parallel. Matches are deduplicated by visit id, the first match in (secret, visit) order is kept.

use crate::{
    authority::ReleasedSecret,
    payload::{AssociatedData, CheckinPayload},
    visit::{EncryptedVisit, VisitId},
};
use alloc::{collections::BTreeMap, string::String};
use ark_ec::pairing::Pairing;
use ark_std::{cfg_iter, end_timer, start_timer, vec::Vec};
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Minimum number of seconds a visit must share with a released secret's window. 0 only requires
    /// the two intervals to intersect.
    pub min_overlap: u64,
}

impl MatchConfig {
    pub fn new(min_overlap: u64) -> Self {
        Self { min_overlap }
    }

    /// Whether `[arrival, departure]` overlaps `[start, end]` enough. Both intervals are closed and
    /// an interval whose start is after its end overlaps nothing.
    pub fn overlaps(&self, arrival: u64, departure: u64, start: u64, end: u64) -> bool {
        if arrival > departure || start > end {
            return false;
        }
        if arrival > end || departure < start {
            return false;
        }
        if self.min_overlap == 0 {
            return true;
        }
        departure.min(end) - arrival.max(start) >= self.min_overlap
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ExposureEvent {
    pub visit_id: VisitId,
    pub arrival_time: u64,
    pub departure_time: u64,
    pub message: String,
    pub country_data: Vec<u8>,
}

impl ExposureEvent {
    fn new(visit_id: VisitId, payload: CheckinPayload, associated_data: AssociatedData) -> Self {
        Self {
            visit_id,
            arrival_time: payload.arrival_time,
            departure_time: payload.departure_time,
            message: associated_data.message,
            country_data: associated_data.country_data,
        }
    }
}

/// Tries a single released secret on a single visit record
pub fn try_match<E: Pairing>(
    secret: &ReleasedSecret<E>,
    visit: &EncryptedVisit,
    config: &MatchConfig,
) -> Option<ExposureEvent> {
    if visit.day_bucket != secret.day {
        return None;
    }
    let payload = visit
        .encrypted_data
        .decrypt(&secret.secret_key, &secret.identity)?;
    if !config.overlaps(
        payload.arrival_time,
        payload.departure_time,
        secret.start_timestamp,
        secret.end_timestamp,
    ) {
        return None;
    }
    let associated_data = AssociatedData::open(
        &payload.notification_key,
        &secret.associated_data_nonce,
        &secret.encrypted_associated_data,
    )?;
    Some(ExposureEvent::new(visit.id, payload, associated_data))
}

/// Returns the exposure events found, at most one per visit id and sorted by visit id
pub fn scan<E: Pairing>(
    released: &[ReleasedSecret<E>],
    visits: &[EncryptedVisit],
    config: &MatchConfig,
) -> Vec<ExposureEvent> {
    let scan_time = start_timer!(|| "Scan visits for released secrets");
    let matches = cfg_iter!(released)
        .flat_map(|secret| {
            visits
                .iter()
                .filter_map(|visit| try_match(secret, visit, config))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    let mut events = BTreeMap::new();
    for event in matches {
        events.entry(event.visit_id).or_insert(event);
    }
    end_timer!(scan_time);
    events.into_values().collect()
}
