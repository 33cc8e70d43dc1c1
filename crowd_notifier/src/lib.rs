#![cfg_attr(not(feature = "std"), no_std)]

//! # CrowdNotifier
//!
//! Decentralized presence tracing as described in [CrowdNotifier: Decentralized Privacy-Preserving Presence Tracing](https://eprint.iacr.org/2020/1423)
//! (version 3 of the protocol).
//!
//! A venue publishes a token containing a master public key. A visitor derives, from the token alone, one
//! pseudonymous identity per hour of the visit and stores locally one record per hour, encrypted with an
//! identity-based encryption (IBE) scheme under the master public key and that identity. When a venue and
//! time slot is flagged, the health authority publishes the IBE secret key of the affected identities. Every
//! visitor then tries these secret keys on its own records and learns of the exposure (and a message
//! attached by the venue) without revealing anything about its visits.
//!
//! 1. [`kdf`] expands the token payload into the nonces and notification key using HKDF.
//! 2. [`identity`] computes the per-hour identity from the token payload and derived keys.
//! 3. [`pairing`] wraps the curve operations needed by the IBE (hash to scalar/G1, pairing, (de)serialization).
//! 4. [`ibe`] is the Boneh-Franklin style IBE with a re-encryption proof binding a released key to its identity.
//! 5. [`visit`] encodes a check-in into one encrypted record per hour bucket.
//! 6. [`scan`] matches released secrets against stored records and produces exposure events.
//!
//! [`authority`] contains what the health authority and venue owner do (upload info, releasing secrets) and
//! [`engine`] ties everything to pluggable [`store`]s.

extern crate alloc;

#[macro_use]
pub mod macros;
pub mod authority;
pub mod engine;
pub mod error;
pub mod hashing_utils;
pub mod ibe;
pub mod identity;
pub mod kdf;
pub mod pairing;
pub mod payload;
pub mod scan;
pub mod secretbox;
pub mod serde_utils;
pub mod store;
pub mod time;
pub mod venue;
pub mod visit;

pub use error::CrowdNotifierError;
