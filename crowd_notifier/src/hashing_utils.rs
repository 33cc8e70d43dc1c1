//! Hashing bytes to field elements and group elements, and SHA-256 helpers.

use crate::concat_slices;
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::PrimeField;
use digest::Digest;
use sha2::Sha256;

/// Output size of SHA-256, the hash used throughout the protocol
pub const HASH_SIZE: usize = 32;

/// SHA-256 over the concatenation of the given byte slices
pub fn sha256(parts: &[&[u8]]) -> [u8; HASH_SIZE] {
    let mut hasher = Sha256::new();
    for p in parts {
        hasher.update(p);
    }
    hasher.finalize().into()
}

/// XOR two hash outputs. Lengths are equal by construction.
pub fn xor(a: &[u8; HASH_SIZE], b: &[u8; HASH_SIZE]) -> [u8; HASH_SIZE] {
    let mut c = [0u8; HASH_SIZE];
    for i in 0..HASH_SIZE {
        c[i] = a[i] ^ b[i];
    }
    c
}

/// Hash bytes to a point on the curve. Returns as Projective coordinates. The point is multiplied by
/// the cofactor so it lies in the prime order subgroup. This is vulnerable to timing attack and is only
/// used when input is public anyway like identities.
pub fn projective_group_elem_from_try_and_incr<G: AffineRepr, D: Digest>(bytes: &[u8]) -> G::Group {
    let mut hash = D::digest(bytes);
    let mut j = 1u64;
    loop {
        if let Some(g) = G::from_random_bytes(&hash) {
            return g.mul_by_cofactor_to_group();
        }
        hash = D::digest(&concat_slices!(bytes, b"-attempt-", j.to_le_bytes()));
        j += 1;
    }
}

/// Same as [`projective_group_elem_from_try_and_incr`] but in affine coordinates
pub fn affine_group_elem_from_try_and_incr<G: AffineRepr, D: Digest>(bytes: &[u8]) -> G {
    projective_group_elem_from_try_and_incr::<G, D>(bytes).into_affine()
}

/// Hash bytes to a field element with a single digest. The digest is read as a little-endian integer
/// and cut to one bit less than the modulus, so it is always a canonical element and no reduction
/// happens. Same as mcl's `setHashOf`.
pub fn field_elem_from_masked_hash<F: PrimeField, D: Digest>(bytes: &[u8]) -> F {
    let mut hash = D::digest(bytes);
    let bits = F::MODULUS_BIT_SIZE as usize - 1;
    let len = (bits + 7) / 8;
    if hash.len() < len {
        return F::from_le_bytes_mod_order(&hash);
    }
    hash[len - 1] &= 0xff >> (len * 8 - bits);
    F::from_le_bytes_mod_order(&hash[..len])
}
