//! Encoding a check-in into encrypted visit records, one per hour bucket the visit touches.
//!
//! Every record of a check-in carries the same payload (arrival, departure and the venue's notification
//! key) and the same [`VisitId`]. Only the identity it is encrypted for differs. The records are grouped
//! by the day of arrival so that a scan only attempts records of the day a released secret is for.

use crate::{
    error::CrowdNotifierError,
    ibe::{encrypt_message, EncryptedData},
    identity::Identity,
    payload::CheckinPayload,
    time::{day_bucket, hours_spanned},
    venue::VenueToken,
};
use ark_ec::pairing::Pairing;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{
    end_timer,
    rand::{CryptoRng, RngCore},
    start_timer,
    vec::Vec,
};
use serde::{Deserialize, Serialize};

pub const VISIT_ID_SIZE: usize = 16;

/// Shared by all records of one check-in
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, CanonicalSerialize,
    CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct VisitId(pub [u8; VISIT_ID_SIZE]);

impl_as_bytes!(VisitId);

impl VisitId {
    pub fn new<R: RngCore>(rng: &mut R) -> Self {
        let mut id = [0u8; VISIT_ID_SIZE];
        rng.fill_bytes(&mut id);
        Self(id)
    }
}

#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct EncryptedVisit {
    pub id: VisitId,
    /// Day of the arrival
    pub day_bucket: u64,
    pub encrypted_data: EncryptedData,
}

/// Encrypts the check-in for every hour bucket of `[arrival_time, departure_time]`. A bucket whose
/// encryption fails is skipped and the others are still returned.
pub fn encode<E: Pairing, R: RngCore + CryptoRng>(
    rng: &mut R,
    venue: &VenueToken<E>,
    id: VisitId,
    arrival_time: u64,
    departure_time: u64,
) -> Result<Vec<EncryptedVisit>, CrowdNotifierError> {
    let keys = venue.derived_keys();
    let payload =
        CheckinPayload::new(arrival_time, departure_time, keys.notification_key)?.to_bytes()?;
    let day = day_bucket(arrival_time);

    let encode_time = start_timer!(|| "Encode check-in");
    let visits = hours_spanned(arrival_time, departure_time)
        .filter_map(|hour| {
            let identity = Identity::for_hour(&venue.payload, &keys, hour);
            encrypt_message(rng, &venue.master_public_key, &identity, &payload)
                .ok()
                .map(|encrypted_data| EncryptedVisit {
                    id,
                    day_bucket: day,
                    encrypted_data,
                })
        })
        .collect::<Vec<_>>();
    end_timer!(encode_time);
    Ok(visits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ibe::{IdentitySecretKey, MasterPublicKey, MasterSecretKey},
        time::{hour_bucket, SECONDS_PER_HOUR},
    };
    use ark_bls12_381::{Bls12_381, Fr};
    use ark_std::rand::{rngs::StdRng, SeedableRng};
    use test_utils::test_serialization;

    #[test]
    fn one_record_per_hour_bucket() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let msk = MasterSecretKey::<Fr>::new(&mut rng);
        let venue = VenueToken::generate(
            &mut rng,
            MasterPublicKey::<Bls12_381>::new(&msk),
            "Restaurant",
            "Main street",
            0,
            u64::MAX,
            vec![],
        )
        .unwrap();
        let id = VisitId::new(&mut rng);

        // 10:30 to 12:15
        let arrival = 1_609_495_200 + 30 * 60;
        let departure = 1_609_495_200 + 2 * SECONDS_PER_HOUR + 15 * 60;
        let visits = encode(&mut rng, &venue, id, arrival, departure).unwrap();
        assert_eq!(visits.len(), 3);
        test_serialization!(EncryptedVisit, visits[0]);

        let expected = CheckinPayload::new(arrival, departure, venue.derived_keys().notification_key)
            .unwrap();
        for (i, visit) in visits.iter().enumerate() {
            assert_eq!(visit.id, id);
            assert_eq!(visit.day_bucket, 18_628);

            let identity = venue.identity_for_hour(hour_bucket(arrival) + i as u64);
            let sk = IdentitySecretKey::<Bls12_381>::extract(&msk, &identity);
            assert_eq!(visit.encrypted_data.decrypt(&sk, &identity).unwrap(), expected);

            // Not decryptable with the key of any other hour
            for j in 0..visits.len() {
                if j != i {
                    assert!(visits[j].encrypted_data.decrypt(&sk, &identity).is_none());
                }
            }
        }

        assert_eq!(encode(&mut rng, &venue, id, arrival, arrival).unwrap().len(), 1);
        assert!(matches!(
            encode(&mut rng, &venue, id, departure, arrival),
            Err(CrowdNotifierError::InvalidTimeRange(..))
        ));
        assert_ne!(VisitId::new(&mut rng), id);
    }
}
