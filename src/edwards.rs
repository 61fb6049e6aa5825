//! Group operations on the twisted Edwards form of Curve25519 (Ed25519).
//!
//! The curve is -x^2 + y^2 = 1 + d x^2 y^2. Points are held in extended
//! projective coordinates (X, Y, Z, T) with x = X/Z, y = Y/Z and
//! T = X Y / Z, using the unified Hisil-Wong-Carter-Dawson formulas, so
//! a single addition routine covers doubling, the identity and inverses.
//!
//! Scalar multiplication is a 256-iteration double-and-add-always loop
//! with a branchless select, giving a fixed operation sequence for any
//! scalar. This is the full-point group used by the ECDSA layer; x-only
//! Diffie-Hellman lives in [`crate::montgomery`].

use core::ops::Add;

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};

use crate::field::FieldElement;
use crate::morph;

/// The Edwards curve coefficient d = -121665/121666, little-endian.
pub(crate) const EDWARDS_D: FieldElement = FieldElement([
    0xa3, 0x78, 0x59, 0x13, 0xca, 0x4d, 0xeb, 0x75, 0xab, 0xd8, 0x41, 0x41, 0x4d, 0x0a, 0x70,
    0x00, 0x98, 0xe8, 0x79, 0x77, 0x79, 0x40, 0xc7, 0x8c, 0x73, 0xfe, 0x6f, 0x2b, 0xee, 0x6c,
    0x03, 0x52,
]);

/// x-coordinate of the base point.
const BASE_X: FieldElement = FieldElement([
    0x1a, 0xd5, 0x25, 0x8f, 0x60, 0x2d, 0x56, 0xc9, 0xb2, 0xa7, 0x25, 0x95, 0x60, 0xc7, 0x2c,
    0x69, 0x5c, 0xdc, 0xd6, 0xfd, 0x31, 0xe2, 0xa4, 0xc0, 0xfe, 0x53, 0x6e, 0xcd, 0xd3, 0x36,
    0x69, 0x21,
]);

/// y-coordinate of the base point, y = 4/5.
const BASE_Y: FieldElement = FieldElement([
    0x58, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66,
    0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66,
    0x66, 0x66,
]);

/// A point on the Edwards curve in extended projective coordinates.
#[derive(Copy, Clone, Debug)]
pub struct EdwardsPoint {
    pub(crate) x: FieldElement,
    pub(crate) y: FieldElement,
    pub(crate) z: FieldElement,
    pub(crate) t: FieldElement,
}

/// An affine point (x, y) on the Edwards curve.
#[derive(Copy, Clone, Debug)]
pub struct EdwardsAffine {
    /// The x-coordinate.
    pub x: FieldElement,
    /// The y-coordinate.
    pub y: FieldElement,
}

impl EdwardsPoint {
    /// The neutral element (0, 1).
    pub const IDENTITY: EdwardsPoint = EdwardsPoint {
        x: FieldElement::ZERO,
        y: FieldElement::ONE,
        z: FieldElement::ONE,
        t: FieldElement::ZERO,
    };

    /// The Ed25519 base point.
    pub fn generator() -> EdwardsPoint {
        EdwardsPoint::from_affine(&EdwardsAffine::GENERATOR)
    }

    /// Lifts an affine point. The input must satisfy the curve equation.
    pub fn from_affine(p: &EdwardsAffine) -> EdwardsPoint {
        EdwardsPoint {
            x: p.x,
            y: p.y,
            z: FieldElement::ONE,
            t: &p.x * &p.y,
        }
    }

    /// Projects back to affine coordinates with a single inversion.
    pub fn to_affine(&self) -> EdwardsAffine {
        let z_inv = self.z.invert();
        EdwardsAffine {
            x: (&self.x * &z_inv).normalize(),
            y: (&self.y * &z_inv).normalize(),
        }
    }

    /// Doubles this point (dbl-2008-hwcd, a = -1).
    pub fn double(&self) -> EdwardsPoint {
        let a = self.x.square();
        let b = self.y.square();
        let c = self.z.square().mul_small(2);
        let d = -&a;
        let e = &(&(&self.x + &self.y).square() - &a) - &b;
        let g = &d + &b;
        let f = &g - &c;
        let h = &d - &b;

        EdwardsPoint {
            x: &e * &f,
            y: &g * &h,
            z: &f * &g,
            t: &e * &h,
        }
    }

    /// Constant-time scalar multiplication over all 256 bits of `e`.
    pub fn scalar_mul(&self, e: &[u8; 32]) -> EdwardsPoint {
        let mut r = EdwardsPoint::IDENTITY;
        for i in (0..256).rev() {
            let bit = Choice::from((e[i >> 3] >> (i & 7)) & 1);
            r = r.double();
            let s = &r + self;
            r = EdwardsPoint::conditional_select(&r, &s, bit);
        }
        r
    }

    /// Returns 1 if the two points are equal as projective points.
    fn ct_eq_projective(&self, other: &EdwardsPoint) -> Choice {
        let lhs_x = &self.x * &other.z;
        let rhs_x = &other.x * &self.z;
        let lhs_y = &self.y * &other.z;
        let rhs_y = &other.y * &self.z;
        lhs_x.ct_eq(&rhs_x) & lhs_y.ct_eq(&rhs_y)
    }
}

impl<'a, 'b> Add<&'b EdwardsPoint> for &'a EdwardsPoint {
    type Output = EdwardsPoint;

    /// Unified addition (add-2008-hwcd-3, a = -1, k = 2d).
    fn add(self, rhs: &'b EdwardsPoint) -> EdwardsPoint {
        let a = &(&self.y - &self.x) * &(&rhs.y - &rhs.x);
        let b = &(&self.y + &self.x) * &(&rhs.y + &rhs.x);
        let c = {
            let t1t2 = &self.t * &rhs.t;
            let dt = &t1t2 * &EDWARDS_D;
            &dt + &dt
        };
        let d = (&self.z * &rhs.z).mul_small(2);
        let e = &b - &a;
        let f = &d - &c;
        let g = &d + &c;
        let h = &b + &a;

        EdwardsPoint {
            x: &e * &f,
            y: &g * &h,
            z: &f * &g,
            t: &e * &h,
        }
    }
}

impl ConditionallySelectable for EdwardsPoint {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        EdwardsPoint {
            x: FieldElement::conditional_select(&a.x, &b.x, choice),
            y: FieldElement::conditional_select(&a.y, &b.y, choice),
            z: FieldElement::conditional_select(&a.z, &b.z, choice),
            t: FieldElement::conditional_select(&a.t, &b.t, choice),
        }
    }
}

impl ConstantTimeEq for EdwardsPoint {
    fn ct_eq(&self, other: &EdwardsPoint) -> Choice {
        self.ct_eq_projective(other)
    }
}

impl PartialEq for EdwardsPoint {
    fn eq(&self, other: &EdwardsPoint) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for EdwardsPoint {}

impl EdwardsAffine {
    /// The Ed25519 base point in affine form.
    pub const GENERATOR: EdwardsAffine = EdwardsAffine {
        x: BASE_X,
        y: BASE_Y,
    };

    /// Checks -x^2 + y^2 = 1 + d x^2 y^2.
    pub fn is_on_curve(&self) -> Choice {
        let xx = self.x.square();
        let yy = self.y.square();
        let lhs = &yy - &xx;
        let rhs = &FieldElement::ONE + &(&(&xx * &yy) * &EDWARDS_D);
        lhs.ct_eq(&rhs)
    }

    /// Encodes as 32 bytes: the y-coordinate with the parity of x stored
    /// in the top bit.
    pub fn compress(&self) -> [u8; 32] {
        let mut bytes = self.y.to_bytes();
        bytes[31] ^= (self.x.to_bytes()[0] & 1) << 7;
        bytes
    }

    /// Decodes a compressed point, recovering x from y and the parity
    /// bit. Fails on encodings whose y admits no x on the curve.
    pub fn decompress(bytes: &[u8; 32]) -> CtOption<EdwardsAffine> {
        let parity = bytes[31] >> 7;
        let mut y_bytes = *bytes;
        y_bytes[31] &= 127;
        let y = FieldElement::from_bytes(&y_bytes);

        let (x, ok) = morph::edwards_x_from_y(&y, parity);
        CtOption::new(EdwardsAffine { x, y: y.normalize() }, ok)
    }
}

impl PartialEq for EdwardsAffine {
    fn eq(&self, other: &EdwardsAffine) -> bool {
        (self.x.ct_eq(&other.x) & self.y.ct_eq(&other.y)).into()
    }
}

impl Eq for EdwardsAffine {}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar_bytes(x: u8) -> [u8; 32] {
        let mut b = [0u8; 32];
        b[0] = x;
        b
    }

    #[test]
    fn generator_is_on_curve() {
        assert!(bool::from(EdwardsAffine::GENERATOR.is_on_curve()));
    }

    #[test]
    fn identity_laws() {
        let g = EdwardsPoint::generator();
        let id = EdwardsPoint::IDENTITY;
        assert_eq!(&g + &id, g);
        assert_eq!(id.double(), id);
    }

    #[test]
    fn double_matches_add() {
        let g = EdwardsPoint::generator();
        assert_eq!(g.double(), &g + &g);
    }

    #[test]
    fn scalar_mul_group_laws() {
        let g = EdwardsPoint::generator();
        assert_eq!(g.scalar_mul(&scalar_bytes(1)), g);
        assert_eq!(g.scalar_mul(&scalar_bytes(2)), g.double());

        let two_g = g.double();
        let three_g = &two_g + &g;
        let five_g = g.scalar_mul(&scalar_bytes(5));
        assert_eq!(&two_g + &three_g, five_g);
    }

    #[test]
    fn affine_round_trip() {
        let p = EdwardsPoint::generator().scalar_mul(&scalar_bytes(7));
        let affine = p.to_affine();
        assert!(bool::from(affine.is_on_curve()));
        assert_eq!(EdwardsPoint::from_affine(&affine), p);
    }

    #[test]
    fn compress_round_trip() {
        for k in [1u8, 2, 3, 9, 200] {
            let p = EdwardsPoint::generator().scalar_mul(&scalar_bytes(k));
            let affine = p.to_affine();
            let restored = EdwardsAffine::decompress(&affine.compress()).unwrap();
            assert_eq!(restored, affine);
        }
    }

    #[test]
    fn decompress_rejects_off_curve() {
        // y = 2 gives x^2 = 3/(1 + 4d), which is not a square.
        let mut bytes = [0u8; 32];
        bytes[0] = 2;
        assert!(bool::from(EdwardsAffine::decompress(&bytes).is_none()));
    }
}
