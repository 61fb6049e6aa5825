//! ECDSA over Wei25519.
//!
//! The scheme signs 32-byte prehashed digests with a caller-supplied
//! ephemeral nonce; this crate contains no hashing and no randomness.
//! Keys live on the Weierstrass form, while the scalar multiplications
//! run on the Edwards form (a complete group with fast constant-time
//! multiplication) and map in and out through the birational morphisms.
//!
//! One scheme-defining detail: the digest is read as a big-endian
//! 256-bit integer and shifted right by three bits before reduction,
//! keeping its leftmost 253 bits -- the bit length of the group order,
//! per the FIPS 186-4 "leftmost bits" rule. This fold is part of the
//! signature scheme as defined here; signatures are not interoperable
//! with schemes that fold the digest differently.

use core::fmt::{self, Debug};

use signature::hazmat::PrehashVerifier;
use signature::{Error, Result, SignatureEncoding};
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::edwards::EdwardsPoint;
use crate::scalar::Scalar;
use crate::weierstrass::WeierstrassPoint;

/// Length of a serialized signature: r and s, 32 bytes each.
pub const SIGNATURE_LENGTH: usize = 64;

/// A serialized signature: r || s, both little-endian.
pub type SignatureBytes = [u8; SIGNATURE_LENGTH];

/// Folds a 32-byte digest into a scalar: the digest is read as a
/// big-endian 256-bit integer, shifted right by three bits to keep its
/// leftmost 253 bits, then reduced modulo the group order.
fn bits2scalar(digest: &[u8; 32]) -> Scalar {
    let mut le = [0u8; 32];
    for i in 0..32 {
        le[i] = digest[31 - i];
    }
    let mut z = [0u8; 32];
    for i in 0..31 {
        z[i] = (le[i] >> 3) | (le[i + 1] << 5);
    }
    z[31] = le[31] >> 3;
    Scalar::from_bytes_mod_order(&z)
}

/// An ECDSA/Wei25519 signature.
///
/// Both components are guaranteed in [1, n - 1] by construction.
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct Signature {
    r: Scalar,
    s: Scalar,
}

impl Signature {
    /// Assembles a signature from its component scalars, rejecting zero
    /// components.
    pub fn from_scalars(r: Scalar, s: Scalar) -> Result<Signature> {
        if bool::from(r.is_zero() | s.is_zero()) {
            return Err(Error::new());
        }
        Ok(Signature { r, s })
    }

    /// The r component.
    pub fn r(&self) -> &Scalar {
        &self.r
    }

    /// The s component.
    pub fn s(&self) -> &Scalar {
        &self.s
    }

    /// Serializes as r || s, 64 little-endian bytes.
    pub fn to_bytes(&self) -> SignatureBytes {
        let mut bytes = [0u8; SIGNATURE_LENGTH];
        bytes[..32].copy_from_slice(&self.r.to_bytes());
        bytes[32..].copy_from_slice(&self.s.to_bytes());
        bytes
    }
}

impl TryFrom<&[u8]> for Signature {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Signature> {
        if bytes.len() != SIGNATURE_LENGTH {
            return Err(Error::new());
        }

        let mut r_bytes = [0u8; 32];
        let mut s_bytes = [0u8; 32];
        r_bytes.copy_from_slice(&bytes[..32]);
        s_bytes.copy_from_slice(&bytes[32..]);

        let r = Option::from(Scalar::from_canonical_bytes(r_bytes)).ok_or_else(Error::new)?;
        let s = Option::from(Scalar::from_canonical_bytes(s_bytes)).ok_or_else(Error::new)?;
        Signature::from_scalars(r, s)
    }
}

impl From<Signature> for SignatureBytes {
    fn from(sig: Signature) -> SignatureBytes {
        sig.to_bytes()
    }
}

impl SignatureEncoding for Signature {
    type Repr = SignatureBytes;
}

impl Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ecdsa::Signature(")?;
        fmt::LowerHex::fmt(self, f)?;
        write!(f, ")")
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(self, f)
    }
}

impl fmt::LowerHex for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.to_bytes() {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl fmt::UpperHex for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.to_bytes() {
            write!(f, "{:02X}", byte)?;
        }
        Ok(())
    }
}

/// An ECDSA/Wei25519 signing key: a secret scalar d in [1, n - 1].
///
/// Zeroized on drop.
#[derive(Clone)]
pub struct SigningKey {
    d: Scalar,
}

impl SigningKey {
    /// Parses a signing key from its canonical little-endian encoding,
    /// rejecting zero and values at or above the group order.
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<SigningKey> {
        let d = Option::<Scalar>::from(Scalar::from_canonical_bytes(*bytes)).ok_or_else(Error::new)?;
        if bool::from(d.is_zero()) {
            return Err(Error::new());
        }
        Ok(SigningKey { d })
    }

    /// Returns the secret scalar's canonical encoding.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.d.to_bytes()
    }

    /// Derives the public key: the Weierstrass image of d * G.
    pub fn verifying_key(&self) -> VerifyingKey {
        let p = EdwardsPoint::generator().scalar_mul(self.d.as_bytes());
        VerifyingKey {
            point: p.to_affine().to_weierstrass(),
        }
    }

    /// Signs a prehashed 32-byte digest with the caller-supplied nonce.
    ///
    /// The nonce must be unique and uniformly random per signature;
    /// reuse or bias leaks the private key. An unusable nonce (zero, or
    /// one producing r = 0 or s = 0) yields an error and the caller
    /// retries with a fresh nonce.
    pub fn sign_prehashed(&self, digest: &[u8; 32], nonce: &[u8; 32]) -> Result<Signature> {
        let k = Scalar::from_bytes_mod_order(nonce);
        if bool::from(k.is_zero()) {
            return Err(Error::new());
        }

        // (x1, y1) = k * G, computed on the Edwards form.
        let kg = EdwardsPoint::generator().scalar_mul(k.as_bytes());
        let w = kg.to_affine().to_weierstrass();

        let r = Scalar::from_bytes_mod_order(&w.x.to_bytes());
        if bool::from(r.is_zero()) {
            return Err(Error::new());
        }

        let z = bits2scalar(digest);
        let s = &k.invert() * &(&z + &(&r * &self.d));
        if bool::from(s.is_zero()) {
            return Err(Error::new());
        }

        Ok(Signature { r, s })
    }
}

impl Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey").finish_non_exhaustive()
    }
}

impl Drop for SigningKey {
    fn drop(&mut self) {
        self.d.zeroize();
    }
}

impl TryFrom<&[u8]> for SigningKey {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<SigningKey> {
        let bytes: &[u8; 32] = bytes.try_into().map_err(|_| Error::new())?;
        SigningKey::from_bytes(bytes)
    }
}

/// An ECDSA/Wei25519 verifying key: an affine public point.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct VerifyingKey {
    point: WeierstrassPoint,
}

impl VerifyingKey {
    /// Wraps an affine public point.
    ///
    /// The point is taken as-is; callers holding untrusted encodings can
    /// screen them with [`WeierstrassPoint::is_on_curve`].
    pub fn new(point: WeierstrassPoint) -> VerifyingKey {
        VerifyingKey { point }
    }

    /// Parses from x || y, 64 little-endian bytes.
    pub fn from_bytes(bytes: &[u8; 64]) -> VerifyingKey {
        VerifyingKey {
            point: WeierstrassPoint::from_bytes(bytes),
        }
    }

    /// Serializes as x || y, 64 little-endian bytes.
    pub fn to_bytes(&self) -> [u8; 64] {
        self.point.to_bytes()
    }

    /// The public point.
    pub fn as_point(&self) -> &WeierstrassPoint {
        &self.point
    }

    /// Verifies a signature over a prehashed 32-byte digest.
    ///
    /// Total over all inputs; every failure mode reports the same opaque
    /// error. This path handles public data only and is not constant
    /// time.
    pub fn verify_prehashed(&self, digest: &[u8; 32], signature: &Signature) -> Result<()> {
        let z = bits2scalar(digest);
        let w = signature.s.invert();
        let u1 = &z * &w;
        let u2 = &signature.r * &w;

        let q = EdwardsPoint::from_affine(&self.point.to_edwards());
        let lhs = EdwardsPoint::generator().scalar_mul(u1.as_bytes());
        let rhs = q.scalar_mul(u2.as_bytes());
        let sum = (&lhs + &rhs).to_affine();

        // The morphism sends the identity (u1 = u2 = 0 or a forged
        // relation) to garbage coordinates, never to a valid r, so the
        // comparison below stays total.
        let wx = sum.to_weierstrass().x;
        let candidate = Scalar::from_bytes_mod_order(&wx.to_bytes());

        if bool::from(candidate.ct_eq(&signature.r)) {
            Ok(())
        } else {
            Err(Error::new())
        }
    }
}

impl PrehashVerifier<Signature> for VerifyingKey {
    fn verify_prehash(&self, prehash: &[u8], signature: &Signature) -> Result<()> {
        let digest: &[u8; 32] = prehash.try_into().map_err(|_| Error::new())?;
        self.verify_prehashed(digest, signature)
    }
}
