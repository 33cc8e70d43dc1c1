//! Plaintexts: the check-in sealed per hour bucket and the data a venue owner attaches to a released secret.

use crate::{
    error::CrowdNotifierError,
    kdf::NOTIFICATION_KEY_SIZE,
    secretbox::{self, NONCE_SIZE},
};
use alloc::string::String;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize, SerializationError};
use ark_std::{
    rand::{CryptoRng, RngCore},
    vec::Vec,
};
use serde::{Deserialize, Serialize};

/// What a visitor encrypts for every hour bucket of a visit. Times are seconds since the epoch.
#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct CheckinPayload {
    pub arrival_time: u64,
    pub departure_time: u64,
    pub notification_key: [u8; NOTIFICATION_KEY_SIZE],
}

impl CheckinPayload {
    pub fn new(
        arrival_time: u64,
        departure_time: u64,
        notification_key: [u8; NOTIFICATION_KEY_SIZE],
    ) -> Result<Self, CrowdNotifierError> {
        if arrival_time > departure_time {
            return Err(CrowdNotifierError::InvalidTimeRange(
                arrival_time,
                departure_time,
            ));
        }
        Ok(Self {
            arrival_time,
            departure_time,
            notification_key,
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CrowdNotifierError> {
        let mut bytes = Vec::with_capacity(self.compressed_size());
        self.serialize_compressed(&mut bytes)?;
        Ok(bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CrowdNotifierError> {
        Ok(Self::deserialize_compressed(bytes)?)
    }
}

/// Message and country specific data a venue owner attaches to a released secret. Only readable with
/// the notification key, i.e. by visitors and not by whoever publishes the secret.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct AssociatedData {
    pub message: String,
    pub country_data: Vec<u8>,
}

#[derive(CanonicalSerialize, CanonicalDeserialize)]
struct EncodedAssociatedData {
    message: Vec<u8>,
    country_data: Vec<u8>,
}

impl AssociatedData {
    pub fn new(message: impl Into<String>, country_data: Vec<u8>) -> Self {
        Self {
            message: message.into(),
            country_data,
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CrowdNotifierError> {
        let encoded = EncodedAssociatedData {
            message: self.message.as_bytes().to_vec(),
            country_data: self.country_data.clone(),
        };
        let mut bytes = Vec::with_capacity(encoded.compressed_size());
        encoded.serialize_compressed(&mut bytes)?;
        Ok(bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CrowdNotifierError> {
        let encoded = EncodedAssociatedData::deserialize_compressed(bytes)?;
        let message = String::from_utf8(encoded.message)
            .map_err(|_| SerializationError::InvalidData)?;
        Ok(Self {
            message,
            country_data: encoded.country_data,
        })
    }

    /// Encrypts under the venue's notification key. Returns the ciphertext and the fresh nonce.
    pub fn seal<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        notification_key: &[u8; NOTIFICATION_KEY_SIZE],
    ) -> Result<(Vec<u8>, [u8; NONCE_SIZE]), CrowdNotifierError> {
        let nonce = secretbox::random_nonce(rng);
        let ciphertext = secretbox::seal(notification_key, &nonce, &self.to_bytes()?)?;
        Ok((ciphertext, nonce))
    }

    pub fn open(
        notification_key: &[u8],
        nonce: &[u8; NONCE_SIZE],
        ciphertext: &[u8],
    ) -> Option<Self> {
        let bytes = secretbox::open(notification_key, nonce, ciphertext)?;
        Self::from_bytes(&bytes).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn checkin_payload_bytes() {
        let payload = CheckinPayload::new(1_609_495_200, 1_609_498_800, [7; 32]).unwrap();
        let bytes = payload.to_bytes().unwrap();
        assert_eq!(CheckinPayload::from_bytes(&bytes).unwrap(), payload);
        assert!(CheckinPayload::from_bytes(&bytes[1..]).is_err());

        assert!(matches!(
            CheckinPayload::new(10, 9, [0; 32]),
            Err(CrowdNotifierError::InvalidTimeRange(10, 9))
        ));
    }

    #[test]
    fn associated_data_only_opens_with_notification_key() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let key = [3u8; 32];
        let ad = AssociatedData::new("Please get tested", vec![1, 2, 3]);
        let (ct, nonce) = ad.seal(&mut rng, &key).unwrap();
        assert_eq!(AssociatedData::open(&key, &nonce, &ct).unwrap(), ad);
        assert!(AssociatedData::open(&[4u8; 32], &nonce, &ct).is_none());
        assert!(AssociatedData::open(&key[..16], &nonce, &ct).is_none());

        let empty = AssociatedData::default();
        assert_eq!(
            AssociatedData::from_bytes(&empty.to_bytes().unwrap()).unwrap(),
            empty
        );

        let invalid_utf8 = EncodedAssociatedData {
            message: vec![0xff, 0xfe],
            country_data: vec![],
        };
        let mut bytes = vec![];
        invalid_utf8.serialize_compressed(&mut bytes).unwrap();
        assert!(AssociatedData::from_bytes(&bytes).is_err());
    }
}
