//! Authenticated symmetric encryption with a 32 byte key and a 24 byte random nonce. This is
//! XSalsa20-Poly1305 in libsodium's `crypto_secretbox_easy` layout, i.e. the 16 byte tag comes first
//! and the ciphertext after it.
//! Used for the visit payload under `H(nonceX)` and for a venue's associated data under the notification key.

use crate::error::CrowdNotifierError;
use aead::{generic_array::GenericArray, AeadInPlace, KeyInit};
use ark_std::{
    rand::{CryptoRng, RngCore},
    vec::Vec,
};
use xsalsa20poly1305::XSalsa20Poly1305;

pub const KEY_SIZE: usize = 32;
pub const NONCE_SIZE: usize = 24;
pub const TAG_SIZE: usize = 16;

pub fn random_nonce<R: RngCore + CryptoRng>(rng: &mut R) -> [u8; NONCE_SIZE] {
    let mut nonce = [0u8; NONCE_SIZE];
    rng.fill_bytes(&mut nonce);
    nonce
}

/// Returns `tag || ciphertext`
pub fn seal(
    key: &[u8; KEY_SIZE],
    nonce: &[u8; NONCE_SIZE],
    msg: &[u8],
) -> Result<Vec<u8>, CrowdNotifierError> {
    let cipher = XSalsa20Poly1305::new(GenericArray::from_slice(key));
    let mut buffer = msg.to_vec();
    let tag =
        cipher.encrypt_in_place_detached(GenericArray::from_slice(nonce), b"", &mut buffer)?;
    let mut sealed = Vec::with_capacity(TAG_SIZE + buffer.len());
    sealed.extend_from_slice(&tag);
    sealed.append(&mut buffer);
    Ok(sealed)
}

/// Opens `tag || ciphertext`. Returns None if the key has the wrong length, the input is shorter
/// than a tag or authentication fails
pub fn open(key: &[u8], nonce: &[u8; NONCE_SIZE], sealed: &[u8]) -> Option<Vec<u8>> {
    if key.len() != KEY_SIZE || sealed.len() < TAG_SIZE {
        return None;
    }
    let (tag, ciphertext) = sealed.split_at(TAG_SIZE);
    let cipher = XSalsa20Poly1305::new(GenericArray::from_slice(key));
    let mut buffer = ciphertext.to_vec();
    cipher
        .decrypt_in_place_detached(
            GenericArray::from_slice(nonce),
            b"",
            &mut buffer,
            GenericArray::from_slice(tag),
        )
        .ok()?;
    Some(buffer)
}
