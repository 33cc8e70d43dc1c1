//! The health authority's side. After a positive case a visitor uploads a [`UserUploadInfo`] per hour
//! of a visit. From it the authority recomputes the identity, extracts its secret key and publishes it as
//! a [`ReleasedSecret`] together with the venue's message encrypted under the notification key.

use crate::{
    error::CrowdNotifierError,
    hashing_utils::HASH_SIZE,
    ibe::{IdentitySecretKey, MasterSecretKey},
    identity::{pre_id, time_key, Identity},
    kdf::NOTIFICATION_KEY_SIZE,
    payload::AssociatedData,
    secretbox::NONCE_SIZE,
    time::{day_bucket, hours_spanned, SECONDS_PER_HOUR},
    venue::VenueToken,
};
use ark_ec::pairing::Pairing;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{
    rand::{CryptoRng, RngCore},
    vec::Vec,
};
use serde::{Deserialize, Serialize};

/// Everything needed to recompute the identity of one hour of a visit without revealing the venue's
/// nonces. Interval bounds are seconds since the epoch.
#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct UserUploadInfo {
    pub pre_id: [u8; HASH_SIZE],
    pub time_key: [u8; HASH_SIZE],
    pub notification_key: [u8; NOTIFICATION_KEY_SIZE],
    pub interval_start: u64,
    pub interval_end: u64,
}

impl UserUploadInfo {
    pub fn identity(&self) -> Identity {
        Identity::from_pre_id_and_time_key(&self.pre_id, &self.time_key, self.interval_start)
    }
}

/// One [`UserUploadInfo`] per hour bucket of the visit
pub fn generate_user_upload_info<E: Pairing>(
    venue: &VenueToken<E>,
    arrival_time: u64,
    departure_time: u64,
) -> Result<Vec<UserUploadInfo>, CrowdNotifierError> {
    if arrival_time > departure_time {
        return Err(CrowdNotifierError::InvalidTimeRange(
            arrival_time,
            departure_time,
        ));
    }
    let keys = venue.derived_keys();
    let pre_id = pre_id(&venue.payload, &keys);
    Ok(hours_spanned(arrival_time, departure_time)
        .map(|hour| {
            let interval_start = hour * SECONDS_PER_HOUR;
            UserUploadInfo {
                pre_id,
                time_key: time_key(&keys, interval_start),
                notification_key: keys.notification_key,
                interval_start,
                interval_end: interval_start.saturating_add(SECONDS_PER_HOUR),
            }
        })
        .collect())
}

/// Published secret for one identity, i.e. one venue and hour. Visits overlapping
/// `[start_timestamp, end_timestamp]` are reported as exposures.
#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct ReleasedSecret<E: Pairing> {
    pub identity: Identity,
    pub secret_key: IdentitySecretKey<E>,
    pub start_timestamp: u64,
    pub end_timestamp: u64,
    /// Only visit records of this day are tried
    pub day: u64,
    pub encrypted_associated_data: Vec<u8>,
    pub associated_data_nonce: [u8; NONCE_SIZE],
}

impl<E: Pairing> ReleasedSecret<E> {
    pub fn new<R: RngCore + CryptoRng>(
        rng: &mut R,
        master_secret_key: &MasterSecretKey<E::ScalarField>,
        upload_info: &UserUploadInfo,
        start_timestamp: u64,
        end_timestamp: u64,
        associated_data: &AssociatedData,
    ) -> Result<Self, CrowdNotifierError> {
        if start_timestamp > end_timestamp {
            return Err(CrowdNotifierError::InvalidTimeRange(
                start_timestamp,
                end_timestamp,
            ));
        }
        let identity = upload_info.identity();
        let (encrypted_associated_data, associated_data_nonce) =
            associated_data.seal(rng, &upload_info.notification_key)?;
        Ok(Self {
            secret_key: IdentitySecretKey::extract(master_secret_key, &identity),
            identity,
            start_timestamp,
            end_timestamp,
            day: day_bucket(upload_info.interval_start),
            encrypted_associated_data,
            associated_data_nonce,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ibe::MasterPublicKey;
    use ark_bls12_381::{Bls12_381, Fr};
    use ark_std::rand::{rngs::StdRng, SeedableRng};
    use test_utils::test_serialization;

    #[test]
    fn upload_info_recomputes_visit_identities() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let msk = MasterSecretKey::<Fr>::new(&mut rng);
        let venue = VenueToken::generate(
            &mut rng,
            MasterPublicKey::<Bls12_381>::new(&msk),
            "Bar",
            "Station road",
            0,
            u64::MAX,
            vec![],
        )
        .unwrap();

        let arrival = 1_609_495_200 + 50 * 60;
        let departure = arrival + 20 * 60;
        let infos = generate_user_upload_info(&venue, arrival, departure).unwrap();
        assert_eq!(infos.len(), 2);
        let keys = venue.derived_keys();
        for (i, info) in infos.iter().enumerate() {
            let hour = 447_082 + i as u64;
            assert_eq!(info.identity(), venue.identity_for_hour(hour));
            assert_eq!(info.interval_start, hour * 3600);
            assert_eq!(info.interval_end, (hour + 1) * 3600);
            assert_eq!(info.notification_key, keys.notification_key);
            assert_eq!(info.pre_id, infos[0].pre_id);
        }
        assert_ne!(infos[0].time_key, infos[1].time_key);
        test_serialization!(UserUploadInfo, infos[0]);

        assert!(generate_user_upload_info(&venue, departure, arrival).is_err());

        // The last representable hour ends at the largest timestamp
        let last = generate_user_upload_info(&venue, u64::MAX - 10, u64::MAX).unwrap();
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].interval_start, (u64::MAX / 3600) * 3600);
        assert_eq!(last[0].interval_end, u64::MAX);
        assert_eq!(
            last[0].identity(),
            venue.identity_for_hour(u64::MAX / 3600)
        );

        let ad = AssociatedData::new("Visit on 01.01.", vec![]);
        let secret = ReleasedSecret::<Bls12_381>::new(
            &mut rng,
            &msk,
            &infos[1],
            arrival,
            departure,
            &ad,
        )
        .unwrap();
        assert_eq!(secret.identity, venue.identity_for_hour(447_083));
        assert_eq!(secret.day, 18_628);
        assert_eq!(
            secret.secret_key,
            IdentitySecretKey::extract(&msk, &secret.identity)
        );
        assert_eq!(
            AssociatedData::open(
                &keys.notification_key,
                &secret.associated_data_nonce,
                &secret.encrypted_associated_data
            )
            .unwrap(),
            ad
        );
        test_serialization!(ReleasedSecret<Bls12_381>, secret);

        assert!(matches!(
            ReleasedSecret::<Bls12_381>::new(&mut rng, &msk, &infos[0], departure, arrival, &ad),
            Err(CrowdNotifierError::InvalidTimeRange(..))
        ));
    }
}
