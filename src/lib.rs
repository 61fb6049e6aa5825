//! Curve25519 in its three birationally equivalent forms — Montgomery
//! (Curve25519), twisted Edwards (Ed25519) and short Weierstrass
//! (Wei25519) — with ECDSA over the Weierstrass form.
//!
//! The crate is the mathematics only: constant-time field and scalar
//! arithmetic on 32-byte little-endian residues, the projective
//! Montgomery ladder with Okeya-Sakurai y-recovery, complete Edwards
//! group operations, the birational maps between the three forms, and an
//! ECDSA sign/verify pipeline composed from them. Hashing, randomness
//! and key derivation are the caller's: signing takes a 32-byte digest
//! and a 32-byte nonce, Diffie-Hellman takes a clamped scalar.
//!
//! # Example: X25519-style Diffie-Hellman
//!
//! ```
//! use wei25519::MontgomeryPoint;
//!
//! // RFC 7748 section 6.1 test secret.
//! let alice_secret = [
//!     0x77, 0x07, 0x6d, 0x0a, 0x73, 0x18, 0xa5, 0x7d, 0x3c, 0x16, 0xc1, 0x72, 0x51, 0xb2,
//!     0x66, 0x45, 0xdf, 0x4c, 0x2f, 0x87, 0xeb, 0xc0, 0x99, 0x2a, 0xb1, 0x77, 0xfb, 0xa5,
//!     0x1d, 0xb9, 0x2c, 0x2a,
//! ];
//! let alice_public = MontgomeryPoint::GENERATOR.mul_clamped(&alice_secret);
//! assert_eq!(
//!     alice_public.to_bytes(),
//!     [
//!         0x85, 0x20, 0xf0, 0x09, 0x89, 0x30, 0xa7, 0x54, 0x74, 0x8b, 0x7d, 0xdc, 0xb4, 0x3e,
//!         0xf7, 0x5a, 0x0d, 0xbf, 0x3a, 0x0d, 0x26, 0x38, 0x1a, 0xf4, 0xeb, 0xa4, 0xa9, 0x8e,
//!         0xaa, 0x9b, 0x4e, 0x6a,
//!     ]
//! );
//! ```
//!
//! # Timing discipline
//!
//! Every operation whose inputs include secret material (private key,
//! nonce, Diffie-Hellman scalar) runs with a fixed operation sequence:
//! no secret-dependent branches or memory addressing, with all selection
//! through `subtle`'s bitmask-based primitives. Verification and other
//! public-data paths make no such promise.

#![no_std]
#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_lifetimes, unused_qualifications)]

pub mod ecdsa;
pub mod edwards;
pub mod field;
pub mod montgomery;
pub mod morph;
pub mod scalar;
pub mod weierstrass;

pub use crate::ecdsa::{Signature, SignatureBytes, SigningKey, VerifyingKey};
pub use crate::edwards::{EdwardsAffine, EdwardsPoint};
pub use crate::field::FieldElement;
pub use crate::montgomery::{clamp_scalar, MontgomeryAffine, MontgomeryPoint};
pub use crate::scalar::Scalar;
pub use crate::weierstrass::WeierstrassPoint;

// Re-export the `signature` crate's error surface.
pub use signature::{self, Error, Result};
