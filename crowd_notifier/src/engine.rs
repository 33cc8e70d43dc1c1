//! Visitor side engine. Owns the stores and the matching configuration, created explicitly by the caller.

use crate::{
    authority::{generate_user_upload_info, ReleasedSecret, UserUploadInfo},
    error::CrowdNotifierError,
    scan::{scan, ExposureEvent, MatchConfig},
    store::{ExposureStore, VisitStore},
    time::{day_bucket, SECONDS_PER_DAY},
    venue::VenueToken,
    visit::{encode, VisitId},
};
use alloc::collections::BTreeSet;
use ark_ec::pairing::Pairing;
use ark_std::{
    marker::PhantomData,
    rand::{CryptoRng, RngCore},
    vec::Vec,
};

pub struct CrowdNotifier<E: Pairing, V: VisitStore, X: ExposureStore> {
    pub visits: V,
    pub exposures: X,
    pub config: MatchConfig,
    _phantom: PhantomData<E>,
}

impl<E: Pairing, V: VisitStore, X: ExposureStore> CrowdNotifier<E, V, X> {
    pub fn new(visits: V, exposures: X, config: MatchConfig) -> Self {
        Self {
            visits,
            exposures,
            config,
            _phantom: PhantomData,
        }
    }

    /// Stores the encrypted records of a new check-in and returns its id
    pub fn add_check_in<R: RngCore + CryptoRng>(
        &mut self,
        rng: &mut R,
        venue: &VenueToken<E>,
        arrival_time: u64,
        departure_time: u64,
    ) -> Result<VisitId, CrowdNotifierError> {
        let id = VisitId::new(rng);
        let visits = encode(rng, venue, id, arrival_time, departure_time)?;
        self.visits.add(visits);
        Ok(id)
    }

    /// Replaces the records of an existing check-in, for example after the visitor corrected the
    /// departure time. The id is kept.
    pub fn update_check_in<R: RngCore + CryptoRng>(
        &mut self,
        rng: &mut R,
        id: VisitId,
        venue: &VenueToken<E>,
        arrival_time: u64,
        departure_time: u64,
    ) -> Result<(), CrowdNotifierError> {
        if !self.visits.has(&id) {
            return Err(CrowdNotifierError::UnknownCheckIn);
        }
        // Encode first so that a failure leaves the old records in place
        let visits = encode(rng, venue, id, arrival_time, departure_time)?;
        self.visits.remove(&id);
        self.visits.add(visits);
        Ok(())
    }

    pub fn remove_check_in(&mut self, id: &VisitId) -> Result<(), CrowdNotifierError> {
        if !self.visits.remove(id) {
            return Err(CrowdNotifierError::UnknownCheckIn);
        }
        Ok(())
    }

    pub fn has_check_ins(&self) -> bool {
        !self.visits.is_empty()
    }

    /// Scans the stored records of the days of the released secrets. Newly found exposures are persisted,
    /// those already known are kept as they are. Returns all exposures found by this call.
    pub fn check_for_matches(&mut self, released: &[ReleasedSecret<E>]) -> Vec<ExposureEvent> {
        let days = released.iter().map(|s| s.day).collect::<BTreeSet<_>>();
        let candidates = days
            .into_iter()
            .flat_map(|day| self.visits.visits_on_day(day))
            .collect::<Vec<_>>();
        let events = scan(released, &candidates, &self.config);
        self.exposures.add(events.clone());
        events
    }

    pub fn exposure_events(&self) -> Vec<ExposureEvent> {
        self.exposures.events()
    }

    pub fn remove_exposure(&mut self, id: &VisitId) -> bool {
        self.exposures.remove(id)
    }

    pub fn generate_user_upload_info(
        &self,
        venue: &VenueToken<E>,
        arrival_time: u64,
        departure_time: u64,
    ) -> Result<Vec<UserUploadInfo>, CrowdNotifierError> {
        generate_user_upload_info(venue, arrival_time, departure_time)
    }

    /// Removes records filed under a day more than `max_days_to_keep` days before `now` and exposures
    /// that ended more than `max_days_to_keep` days ago. 0 removes everything.
    pub fn clean_up_old_data(&mut self, now: u64, max_days_to_keep: u64) {
        if max_days_to_keep == 0 {
            self.visits.clear();
            self.exposures.clear();
            return;
        }
        self.visits
            .remove_before_day(day_bucket(now).saturating_sub(max_days_to_keep));
        let max_age = max_days_to_keep.saturating_mul(SECONDS_PER_DAY);
        self.exposures
            .remove_departed_by(now.saturating_sub(max_age));
    }
}
