//! The short Weierstrass form of Curve25519 (Wei25519).
//!
//! Wei25519 is y^2 = x^3 + a x + b with the coefficients below; it is the
//! image of the Montgomery curve under the x-shift by delta = (p + A)/3.
//! This is the presentation the ECDSA layer signs over. Points here are
//! plain affine pairs; the point at infinity is not representable and by
//! library convention the Montgomery 2-torsion coordinate u = 0 maps to
//! x = 0 rather than delta.

use subtle::{Choice, ConstantTimeEq};
use zeroize::Zeroize;

use crate::field::FieldElement;

/// The coefficient a of Wei25519, little-endian.
pub(crate) const WEI_A: FieldElement = FieldElement([
    0x44, 0xa1, 0x14, 0x49, 0x98, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa,
    0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa,
    0xaa, 0x2a,
]);

/// The coefficient b of Wei25519, little-endian.
pub(crate) const WEI_B: FieldElement = FieldElement([
    0x64, 0xc8, 0x10, 0x77, 0x9c, 0x5e, 0x0b, 0x26, 0xb4, 0x97, 0xd0, 0x5e, 0x42, 0x7b, 0x09,
    0xed, 0x25, 0xb4, 0x97, 0xd0, 0x5e, 0x42, 0x7b, 0x09, 0xed, 0x25, 0xb4, 0x97, 0xd0, 0x5e,
    0x42, 0x7b,
]);

/// x-coordinate of the generator: 9 + delta.
const GENERATOR_X: [u8; 32] = [
    0x5a, 0x24, 0xad, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa,
    0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa,
    0xaa, 0x2a,
];

/// y-coordinate of the generator (equal to the Montgomery generator's v).
const GENERATOR_Y: [u8; 32] = [
    0xd9, 0xd3, 0xce, 0x7e, 0xa2, 0xc5, 0xe9, 0x29, 0xb2, 0x61, 0x7c, 0x6d, 0x7e, 0x4d, 0x3d,
    0x92, 0x4c, 0xd1, 0x48, 0x77, 0x2c, 0xdd, 0x1e, 0xe0, 0xb4, 0x86, 0xa0, 0xb8, 0xa1, 0x19,
    0xae, 0x20,
];

/// An affine point (x, y) on Wei25519.
#[derive(Copy, Clone, Debug)]
pub struct WeierstrassPoint {
    /// The x-coordinate.
    pub x: FieldElement,
    /// The y-coordinate.
    pub y: FieldElement,
}

impl WeierstrassPoint {
    /// The generator, the Weierstrass image of the Ed25519 base point.
    pub fn generator() -> WeierstrassPoint {
        WeierstrassPoint {
            x: FieldElement::from_bytes(&GENERATOR_X),
            y: FieldElement::from_bytes(&GENERATOR_Y),
        }
    }

    /// Checks y^2 = x^3 + a x + b.
    pub fn is_on_curve(&self) -> Choice {
        let lhs = self.y.square();
        let xxx = &self.x.square() * &self.x;
        let rhs = &(&xxx + &(&WEI_A * &self.x)) + &WEI_B;
        lhs.ct_eq(&rhs)
    }

    /// Encodes as x || y, 64 little-endian bytes.
    pub fn to_bytes(&self) -> [u8; 64] {
        let mut bytes = [0u8; 64];
        bytes[..32].copy_from_slice(&self.x.to_bytes());
        bytes[32..].copy_from_slice(&self.y.to_bytes());
        bytes
    }

    /// Decodes from x || y, 64 little-endian bytes.
    pub fn from_bytes(bytes: &[u8; 64]) -> WeierstrassPoint {
        let mut x = [0u8; 32];
        let mut y = [0u8; 32];
        x.copy_from_slice(&bytes[..32]);
        y.copy_from_slice(&bytes[32..]);
        WeierstrassPoint {
            x: FieldElement::from_bytes(&x),
            y: FieldElement::from_bytes(&y),
        }
    }
}

impl ConstantTimeEq for WeierstrassPoint {
    fn ct_eq(&self, other: &WeierstrassPoint) -> Choice {
        self.x.ct_eq(&other.x) & self.y.ct_eq(&other.y)
    }
}

impl PartialEq for WeierstrassPoint {
    fn eq(&self, other: &WeierstrassPoint) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for WeierstrassPoint {}

impl Zeroize for WeierstrassPoint {
    fn zeroize(&mut self) {
        self.x.0.zeroize();
        self.y.0.zeroize();
    }
}
