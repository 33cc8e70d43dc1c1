//! Venue token, i.e. the content of the QR code a venue displays.
//!
//! `payload` holds the exact bytes the token was built from. Every key and identity is derived from these
//! bytes, so they are kept as received and never re-encoded. A fresh random seed is part of the payload
//! so that two tokens with the same public fields still lead to unrelated identities.

pub use crate::kdf::ProtocolVersion;
use crate::{
    error::CrowdNotifierError,
    ibe::MasterPublicKey,
    identity::Identity,
    kdf::DerivedKeys,
};
use alloc::string::String;
use ark_ec::pairing::Pairing;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize, SerializationError};
use ark_std::{
    rand::{CryptoRng, RngCore},
    vec::Vec,
};
use serde::{Deserialize, Serialize};

pub const SEED_SIZE: usize = 32;

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct VenueToken<E: Pairing> {
    pub version: ProtocolVersion,
    pub master_public_key: MasterPublicKey<E>,
    pub description: String,
    pub address: String,
    /// Seconds since the epoch
    pub valid_from: u64,
    pub valid_to: u64,
    pub country_data: Vec<u8>,
    pub payload: Vec<u8>,
}

#[derive(CanonicalSerialize, CanonicalDeserialize)]
struct EncodedVenueToken<E: Pairing> {
    version: u8,
    master_public_key: E::G2Affine,
    description: Vec<u8>,
    address: Vec<u8>,
    valid_from: u64,
    valid_to: u64,
    country_data: Vec<u8>,
    seed: [u8; SEED_SIZE],
}

impl<E: Pairing> VenueToken<E> {
    /// Token for fields that were already decoded elsewhere. `payload` must be the bytes the fields were
    /// decoded from.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        version: ProtocolVersion,
        master_public_key: MasterPublicKey<E>,
        description: String,
        address: String,
        valid_from: u64,
        valid_to: u64,
        country_data: Vec<u8>,
        payload: Vec<u8>,
    ) -> Result<Self, CrowdNotifierError> {
        if valid_from > valid_to {
            return Err(CrowdNotifierError::InvalidTimeRange(valid_from, valid_to));
        }
        if !master_public_key.is_valid() {
            return Err(CrowdNotifierError::InvalidGroupElement);
        }
        Ok(Self {
            version,
            master_public_key,
            description,
            address,
            valid_from,
            valid_to,
            country_data,
            payload,
        })
    }

    /// Creates a new token with a fresh seed
    pub fn generate<R: RngCore + CryptoRng>(
        rng: &mut R,
        master_public_key: MasterPublicKey<E>,
        description: impl Into<String>,
        address: impl Into<String>,
        valid_from: u64,
        valid_to: u64,
        country_data: Vec<u8>,
    ) -> Result<Self, CrowdNotifierError> {
        let description = description.into();
        let address = address.into();
        let mut seed = [0u8; SEED_SIZE];
        rng.fill_bytes(&mut seed);
        let encoded = EncodedVenueToken::<E> {
            version: ProtocolVersion::V3.as_u8(),
            master_public_key: master_public_key.0,
            description: description.as_bytes().to_vec(),
            address: address.as_bytes().to_vec(),
            valid_from,
            valid_to,
            country_data: country_data.clone(),
            seed,
        };
        let mut payload = Vec::with_capacity(encoded.compressed_size());
        encoded.serialize_compressed(&mut payload)?;
        Self::new(
            ProtocolVersion::V3,
            master_public_key,
            description,
            address,
            valid_from,
            valid_to,
            country_data,
            payload,
        )
    }

    /// Decodes a token from its payload bytes as produced by [`Self::generate`]
    pub fn from_payload(payload: &[u8]) -> Result<Self, CrowdNotifierError> {
        let encoded = EncodedVenueToken::<E>::deserialize_compressed(payload)?;
        let version = ProtocolVersion::try_from(encoded.version)?;
        let description =
            String::from_utf8(encoded.description).map_err(|_| SerializationError::InvalidData)?;
        let address =
            String::from_utf8(encoded.address).map_err(|_| SerializationError::InvalidData)?;
        Self::new(
            version,
            MasterPublicKey(encoded.master_public_key),
            description,
            address,
            encoded.valid_from,
            encoded.valid_to,
            encoded.country_data,
            payload.to_vec(),
        )
    }

    /// Errors if `now` is outside the validity window of the token
    pub fn check_validity(&self, now: u64) -> Result<(), CrowdNotifierError> {
        if now < self.valid_from {
            return Err(CrowdNotifierError::TokenNotYetValid(self.valid_from));
        }
        if now > self.valid_to {
            return Err(CrowdNotifierError::TokenExpired(self.valid_to));
        }
        Ok(())
    }

    pub fn derived_keys(&self) -> DerivedKeys {
        DerivedKeys::derive(self.version, &self.payload)
    }

    pub fn identity_for_hour(&self, hour: u64) -> Identity {
        Identity::for_hour(&self.payload, &self.derived_keys(), hour)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ibe::MasterSecretKey;
    use ark_bls12_381::{Bls12_381, Fr};
    use ark_std::rand::{rngs::StdRng, SeedableRng};
    use test_utils::test_serde_serialization;

    fn mpk(rng: &mut StdRng) -> MasterPublicKey<Bls12_381> {
        MasterPublicKey::new(&MasterSecretKey::<Fr>::new(rng))
    }

    #[test]
    fn generate_and_parse() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let mpk = mpk(&mut rng);
        let token = VenueToken::generate(
            &mut rng,
            mpk.clone(),
            "Café Bern",
            "Bundesplatz 1",
            1_609_459_200,
            1_640_995_200,
            vec![9, 9],
        )
        .unwrap();
        assert_eq!(token.version, ProtocolVersion::V3);

        let parsed = VenueToken::<Bls12_381>::from_payload(&token.payload).unwrap();
        assert_eq!(parsed, token);
        assert_eq!(parsed.description, "Café Bern");
        assert_eq!(parsed.master_public_key, mpk);
        assert_eq!(parsed.derived_keys(), token.derived_keys());
        test_serde_serialization!(VenueToken<Bls12_381>, token);
        assert_eq!(
            parsed.identity_for_hour(447_082),
            token.identity_for_hour(447_082)
        );

        // Same fields, fresh seed
        let other = VenueToken::generate(
            &mut rng,
            mpk,
            "Café Bern",
            "Bundesplatz 1",
            1_609_459_200,
            1_640_995_200,
            vec![9, 9],
        )
        .unwrap();
        assert_ne!(other.payload, token.payload);
        assert_ne!(other.derived_keys(), token.derived_keys());
        assert_ne!(
            other.identity_for_hour(447_082),
            token.identity_for_hour(447_082)
        );

        assert!(VenueToken::<Bls12_381>::from_payload(&token.payload[1..]).is_err());
        let mut wrong_version = token.payload.clone();
        wrong_version[0] = 2;
        assert!(matches!(
            VenueToken::<Bls12_381>::from_payload(&wrong_version),
            Err(CrowdNotifierError::UnsupportedVersion(2))
        ));
    }

    #[test]
    fn validity() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let mpk = mpk(&mut rng);
        assert!(matches!(
            VenueToken::generate(&mut rng, mpk.clone(), "d", "a", 20, 10, vec![]),
            Err(CrowdNotifierError::InvalidTimeRange(20, 10))
        ));

        let token = VenueToken::generate(&mut rng, mpk, "d", "a", 10, 20, vec![]).unwrap();
        assert!(token.check_validity(10).is_ok());
        assert!(token.check_validity(15).is_ok());
        assert!(token.check_validity(20).is_ok());
        assert!(matches!(
            token.check_validity(9),
            Err(CrowdNotifierError::TokenNotYetValid(10))
        ));
        assert!(matches!(
            token.check_validity(21),
            Err(CrowdNotifierError::TokenExpired(20))
        ));
    }
}
