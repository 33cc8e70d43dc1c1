//! Per-hour pseudonymous identities of a venue.
//!
//! ```text
//! preId    = H("CN-PREID"   || payload || nonce1)
//! timeKey  = H("CN-TIMEKEY" || duration || intervalStart || nonce2)
//! identity = H("CN-ID"      || preId || duration || intervalStart || timeKey)
//! ```
//!
//! `duration` is a 4 byte and `intervalStart` an 8 byte big-endian integer, both in seconds. `preId` and
//! `timeKey` are what a visitor uploads after a positive test so that the authority can recompute the
//! identity without learning the token's nonces.

use crate::{
    hashing_utils::{sha256, HASH_SIZE},
    impl_as_bytes,
    kdf::DerivedKeys,
    time::SECONDS_PER_HOUR,
};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use serde::{Deserialize, Serialize};

const PRE_ID_DOMAIN: &[u8] = b"CN-PREID";
const TIME_KEY_DOMAIN: &[u8] = b"CN-TIMEKEY";
const ID_DOMAIN: &[u8] = b"CN-ID";

/// Identities are for one hour intervals
pub const INTERVAL_DURATION: u32 = SECONDS_PER_HOUR as u32;

/// Identity of one (venue, time interval) pair
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, CanonicalSerialize,
    CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct Identity(pub [u8; HASH_SIZE]);

impl_as_bytes!(Identity);

pub fn pre_id(payload: &[u8], keys: &DerivedKeys) -> [u8; HASH_SIZE] {
    sha256(&[PRE_ID_DOMAIN, payload, &keys.nonce_pre_id])
}

pub fn time_key(keys: &DerivedKeys, interval_start: u64) -> [u8; HASH_SIZE] {
    sha256(&[
        TIME_KEY_DOMAIN,
        &INTERVAL_DURATION.to_be_bytes(),
        &interval_start.to_be_bytes(),
        &keys.nonce_time_key,
    ])
}

impl Identity {
    /// Identity for the interval starting at `interval_start` seconds
    pub fn new(payload: &[u8], keys: &DerivedKeys, interval_start: u64) -> Self {
        Self::from_pre_id_and_time_key(
            &pre_id(payload, keys),
            &time_key(keys, interval_start),
            interval_start,
        )
    }

    pub fn for_hour(payload: &[u8], keys: &DerivedKeys, hour: u64) -> Self {
        Self::new(payload, keys, hour * SECONDS_PER_HOUR)
    }

    pub fn from_pre_id_and_time_key(
        pre_id: &[u8; HASH_SIZE],
        time_key: &[u8; HASH_SIZE],
        interval_start: u64,
    ) -> Self {
        Self(sha256(&[
            ID_DOMAIN,
            pre_id,
            &INTERVAL_DURATION.to_be_bytes(),
            &interval_start.to_be_bytes(),
            time_key,
        ]))
    }
}
