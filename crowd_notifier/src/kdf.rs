//! Expansion of a venue token's payload into the nonces and notification key shared by everyone holding the token.
//!
//! HKDF-SHA256 with an empty salt, the payload as input keying material and a version specific domain
//! separation string as info. The output is split in order into `nonce_pre_id`, `nonce_time_key` and
//! `notification_key`. The info string and the split are wire format constants.

use crate::error::CrowdNotifierError;
use hkdf::Hkdf;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

pub const NONCE_SIZE: usize = 32;
pub const NOTIFICATION_KEY_SIZE: usize = 32;

/// Version of the protocol a venue token was issued for. Only version 3 is supported, older
/// versions used different constants and would be added as new variants.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum ProtocolVersion {
    V3,
}

impl ProtocolVersion {
    pub fn hkdf_info(&self) -> &'static [u8] {
        match self {
            Self::V3 => b"CrowdNotifier_v3",
        }
    }

    pub fn as_u8(&self) -> u8 {
        match self {
            Self::V3 => 3,
        }
    }
}

impl TryFrom<u8> for ProtocolVersion {
    type Error = CrowdNotifierError;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            3 => Ok(Self::V3),
            _ => Err(CrowdNotifierError::UnsupportedVersion(v)),
        }
    }
}

/// Keys derived from a venue token. Never transmitted, recomputed by every holder of the token.
#[derive(Clone, PartialEq, Eq, Debug, Zeroize, ZeroizeOnDrop)]
pub struct DerivedKeys {
    /// Called `nonce1` in the paper
    pub nonce_pre_id: [u8; NONCE_SIZE],
    /// Called `nonce2` in the paper
    pub nonce_time_key: [u8; NONCE_SIZE],
    pub notification_key: [u8; NOTIFICATION_KEY_SIZE],
}

impl DerivedKeys {
    pub fn derive(version: ProtocolVersion, payload: &[u8]) -> Self {
        match version {
            ProtocolVersion::V3 => Self::expand(payload, version.hkdf_info()),
        }
    }

    fn expand(payload: &[u8], info: &[u8]) -> Self {
        let hk = Hkdf::<Sha256>::new(None, payload);
        let mut okm = [0u8; 2 * NONCE_SIZE + NOTIFICATION_KEY_SIZE];
        // Can't fail since the output is far shorter than 255 hash lengths
        hk.expand(info, &mut okm)
            .expect("96 bytes is a valid HKDF-SHA256 output length");
        let mut keys = Self {
            nonce_pre_id: [0; NONCE_SIZE],
            nonce_time_key: [0; NONCE_SIZE],
            notification_key: [0; NOTIFICATION_KEY_SIZE],
        };
        keys.nonce_pre_id.copy_from_slice(&okm[..NONCE_SIZE]);
        keys.nonce_time_key
            .copy_from_slice(&okm[NONCE_SIZE..2 * NONCE_SIZE]);
        keys.notification_key
            .copy_from_slice(&okm[2 * NONCE_SIZE..]);
        okm.zeroize();
        keys
    }
}
