//! Curve operations used by the IBE. Generic over the pairing though the protocol fixes BLS12-381.
//!
//! Group elements cross the wire in their compressed canonical encoding. Decoding checks the length
//! first, so a wrongly sized buffer is a [`CrowdNotifierError::InvalidByteLength`] and never a panic.

use crate::{
    error::CrowdNotifierError,
    hashing_utils::{affine_group_elem_from_try_and_incr, field_elem_from_masked_hash},
};
use ark_ec::{
    pairing::{Pairing, PairingOutput},
    AffineRepr, CurveGroup, Group,
};
use ark_ff::PrimeField;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{vec::Vec, Zero};
use sha2::Sha256;

/// The fixed G2 base point. This is the standard generator of the curve's G2.
pub fn base_point_g2<E: Pairing>() -> E::G2Affine {
    E::G2Affine::generator()
}

/// SHA-256 cut to the scalar field, compatible with mcl's `mclBnFr_setHashOf`
pub fn hash_to_scalar<E: Pairing>(bytes: &[u8]) -> E::ScalarField {
    field_elem_from_masked_hash::<E::ScalarField, Sha256>(bytes)
}

pub fn hash_to_g1<E: Pairing>(bytes: &[u8]) -> E::G1Affine {
    affine_group_elem_from_try_and_incr::<E::G1Affine, Sha256>(bytes)
}

pub fn scalar_mul_g2<E: Pairing>(scalar: &E::ScalarField, point: &E::G2Affine) -> E::G2Affine {
    (*point * scalar).into_affine()
}

pub fn pairing<E: Pairing>(p: &E::G1Affine, q: &E::G2Affine) -> PairingOutput<E> {
    E::pairing(*p, *q)
}

pub fn pow_gt<E: Pairing>(gt: &PairingOutput<E>, scalar: &E::ScalarField) -> PairingOutput<E> {
    *gt * scalar
}

/// Non-identity and in the prime order subgroup. Points decoded without the subgroup check (released
/// secret keys) must pass this before use.
pub fn is_valid_non_identity<E: Pairing>(p: &E::G1Affine) -> bool {
    !p.is_zero() && p.mul_bigint(E::ScalarField::MODULUS).is_zero()
}

pub fn to_compressed_bytes<T: CanonicalSerialize>(t: &T) -> Result<Vec<u8>, CrowdNotifierError> {
    let mut bytes = Vec::with_capacity(t.compressed_size());
    t.serialize_compressed(&mut bytes)?;
    Ok(bytes)
}

pub fn g1_size<E: Pairing>() -> usize {
    E::G1Affine::generator().compressed_size()
}

pub fn g2_size<E: Pairing>() -> usize {
    E::G2Affine::generator().compressed_size()
}

pub fn gt_size<E: Pairing>() -> usize {
    PairingOutput::<E>::generator().compressed_size()
}

fn check_length(expected: usize, bytes: &[u8]) -> Result<(), CrowdNotifierError> {
    if bytes.len() != expected {
        return Err(CrowdNotifierError::InvalidByteLength(expected, bytes.len()));
    }
    Ok(())
}

/// Decodes a G2 element checking that it is on the curve and in the prime order subgroup
pub fn g2_from_bytes<E: Pairing>(bytes: &[u8]) -> Result<E::G2Affine, CrowdNotifierError> {
    check_length(g2_size::<E>(), bytes)?;
    Ok(E::G2Affine::deserialize_compressed(bytes)?)
}

/// Decodes a G1 element without the subgroup check. Combine with [`is_valid_non_identity`].
pub fn g1_from_bytes_unchecked<E: Pairing>(
    bytes: &[u8],
) -> Result<E::G1Affine, CrowdNotifierError> {
    check_length(g1_size::<E>(), bytes)?;
    Ok(E::G1Affine::deserialize_compressed_unchecked(bytes)?)
}

pub fn g1_from_bytes<E: Pairing>(bytes: &[u8]) -> Result<E::G1Affine, CrowdNotifierError> {
    let p = g1_from_bytes_unchecked::<E>(bytes)?;
    if !is_valid_non_identity::<E>(&p) {
        return Err(CrowdNotifierError::InvalidGroupElement);
    }
    Ok(p)
}

pub fn gt_from_bytes<E: Pairing>(bytes: &[u8]) -> Result<PairingOutput<E>, CrowdNotifierError> {
    check_length(gt_size::<E>(), bytes)?;
    Ok(PairingOutput::<E>::deserialize_compressed(bytes)?)
}
