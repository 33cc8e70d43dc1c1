//! Boneh-Franklin style identity based encryption with a Fujisaki-Okamoto like re-encryption check.
//!
//! The master secret key `msk` is a scalar, the master public key is `g2*msk` and the secret key of an
//! identity `id` is `H1(id)*msk` in G1.
//!
//! Encryption of message `m` for identity `id`:
//! 1. Pick random `nonceX` and compute `r = H(nonceX || id || m)`.
//! 2. `c1 = g2*r`, `c2 = nonceX XOR H(e(H1(id), mpk)*r)`.
//! 3. `c3 = AEAD(H(nonceX), nonce, m)` with a random `nonce`.
//!
//! Decryption with `sk` recovers `nonceX = c2 XOR H(e(sk, c1))`, opens `c3` and then recomputes `r` and
//! `c1`. A ciphertext is only accepted if the recomputed `c1` is equal to the received one and the secret
//! key is a non-identity element of the prime order subgroup. This is what binds a released secret key to
//! the identity it claims to be for. Every failure is reported as `None` since almost all decryption
//! attempts while scanning are expected to fail.

use crate::{
    concat_slices,
    error::CrowdNotifierError,
    hashing_utils::{sha256, xor, HASH_SIZE},
    identity::Identity,
    pairing::{
        base_point_g2, g1_from_bytes_unchecked, g2_from_bytes, hash_to_g1, hash_to_scalar,
        is_valid_non_identity, pairing, pow_gt, scalar_mul_g2, to_compressed_bytes,
    },
    payload::CheckinPayload,
    secretbox::{self, NONCE_SIZE},
    serde_utils::ArkObjectBytes,
};
use ark_ec::{pairing::Pairing, AffineRepr};
use ark_ff::PrimeField;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{
    rand::{CryptoRng, RngCore},
    vec::Vec,
    UniformRand,
};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Held by the health authority (or venue owner). Never leaves it.
#[serde_as]
#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Zeroize, ZeroizeOnDrop,
    Serialize, Deserialize,
)]
pub struct MasterSecretKey<F: PrimeField>(
    #[serde_as(as = "ArkObjectBytes")] pub F,
);

/// Published in every venue token
#[serde_as]
#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct MasterPublicKey<E: Pairing>(
    #[serde_as(as = "ArkObjectBytes")] pub E::G2Affine,
);

/// Secret key for a single identity. This is what gets published for a problematic venue and hour.
#[serde_as]
#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct IdentitySecretKey<E: Pairing>(
    #[serde_as(as = "ArkObjectBytes")] pub E::G1Affine,
);

#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct EncryptedData {
    /// Compressed G2 element
    pub c1: Vec<u8>,
    pub c2: [u8; HASH_SIZE],
    pub c3: Vec<u8>,
    pub nonce: [u8; NONCE_SIZE],
}

impl<F: PrimeField> MasterSecretKey<F> {
    pub fn new<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self(F::rand(rng))
    }
}

impl<E: Pairing> MasterPublicKey<E> {
    pub fn new(secret_key: &MasterSecretKey<E::ScalarField>) -> Self {
        Self(scalar_mul_g2::<E>(&secret_key.0, &base_point_g2::<E>()))
    }

    pub fn is_valid(&self) -> bool {
        !self.0.is_zero()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CrowdNotifierError> {
        to_compressed_bytes(&self.0)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CrowdNotifierError> {
        let pk = Self(g2_from_bytes::<E>(bytes)?);
        if !pk.is_valid() {
            return Err(CrowdNotifierError::InvalidGroupElement);
        }
        Ok(pk)
    }
}

impl<E: Pairing> AsRef<E::G2Affine> for MasterPublicKey<E> {
    fn as_ref(&self) -> &E::G2Affine {
        &self.0
    }
}

impl<E: Pairing> IdentitySecretKey<E> {
    pub fn extract(
        master_secret_key: &MasterSecretKey<E::ScalarField>,
        identity: &Identity,
    ) -> Self {
        Self((hash_to_g1::<E>(identity.as_ref()) * master_secret_key.0).into())
    }

    pub fn is_valid(&self) -> bool {
        is_valid_non_identity::<E>(&self.0)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CrowdNotifierError> {
        to_compressed_bytes(&self.0)
    }

    /// Only checks that the bytes encode a point on the curve. Whether it is a usable key is decided
    /// when decrypting.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CrowdNotifierError> {
        Ok(Self(g1_from_bytes_unchecked::<E>(bytes)?))
    }
}

pub fn encrypt_message<E: Pairing, R: RngCore + CryptoRng>(
    rng: &mut R,
    master_public_key: &MasterPublicKey<E>,
    identity: &Identity,
    message: &[u8],
) -> Result<EncryptedData, CrowdNotifierError> {
    let mut nonce_x = [0u8; HASH_SIZE];
    rng.fill_bytes(&mut nonce_x);

    let r = hash_to_scalar::<E>(&concat_slices!(nonce_x, identity.0, message));
    let c1 = scalar_mul_g2::<E>(&r, &base_point_g2::<E>());

    let gt = pow_gt::<E>(
        &pairing::<E>(&hash_to_g1::<E>(identity.as_ref()), &master_public_key.0),
        &r,
    );
    let c2 = xor(&nonce_x, &sha256(&[&to_compressed_bytes(&gt)?]));

    let nonce = secretbox::random_nonce(rng);
    let c3 = secretbox::seal(&sha256(&[&nonce_x]), &nonce, message)?;
    nonce_x.zeroize();

    Ok(EncryptedData {
        c1: to_compressed_bytes(&c1)?,
        c2,
        c3,
        nonce,
    })
}

pub fn decrypt_message<E: Pairing>(
    secret_key: &IdentitySecretKey<E>,
    identity: &Identity,
    data: &EncryptedData,
) -> Option<Vec<u8>> {
    let c1 = g2_from_bytes::<E>(&data.c1).ok()?;
    let gt = pairing::<E>(&secret_key.0, &c1);
    let nonce_x = xor(&data.c2, &sha256(&[&to_compressed_bytes(&gt).ok()?]));
    let message = secretbox::open(&sha256(&[&nonce_x]), &data.nonce, &data.c3)?;

    let r = hash_to_scalar::<E>(&concat_slices!(nonce_x, identity.0, message));
    if scalar_mul_g2::<E>(&r, &base_point_g2::<E>()) != c1 {
        return None;
    }
    if !secret_key.is_valid() {
        return None;
    }
    Some(message)
}

impl EncryptedData {
    pub fn encrypt<E: Pairing, R: RngCore + CryptoRng>(
        rng: &mut R,
        master_public_key: &MasterPublicKey<E>,
        identity: &Identity,
        payload: &CheckinPayload,
    ) -> Result<Self, CrowdNotifierError> {
        encrypt_message(rng, master_public_key, identity, &payload.to_bytes()?)
    }

    pub fn decrypt<E: Pairing>(
        &self,
        secret_key: &IdentitySecretKey<E>,
        identity: &Identity,
    ) -> Option<CheckinPayload> {
        let message = decrypt_message(secret_key, identity, self)?;
        CheckinPayload::from_bytes(&message).ok()
    }
}
