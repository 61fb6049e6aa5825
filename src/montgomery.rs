//! Scalar multiplication on the Montgomery form of Curve25519.
//!
//! The curve is v^2 = u^3 + A u^2 + u with A = 486662. Multiplication
//! uses the classic projective (U : W) ladder: one differential doubling
//! and two differential additions per scalar bit, with a branchless
//! four-way select routing the next ladder pair. The ladder assumes bit
//! 254 of the scalar is set; [`clamp_scalar`] prepares raw bytes
//! accordingly.
//!
//! [`MontgomeryPoint`] carries only the affine u-coordinate, which is all
//! Diffie-Hellman needs. [`MontgomeryAffine`] carries (u, v) and can
//! multiply while recovering the full result via the Okeya-Sakurai
//! procedure, which reconstructs v from the ladder's terminal pair.

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroize;

use crate::field::FieldElement;

/// The Montgomery curve coefficient A = 486662.
pub(crate) const CURVE_A: u32 = 486662;

/// v-coordinate of the generator, little-endian.
const GENERATOR_V: [u8; 32] = [
    0xd9, 0xd3, 0xce, 0x7e, 0xa2, 0xc5, 0xe9, 0x29, 0xb2, 0x61, 0x7c, 0x6d, 0x7e, 0x4d, 0x3d,
    0x92, 0x4c, 0xd1, 0x48, 0x77, 0x2c, 0xdd, 0x1e, 0xe0, 0xb4, 0x86, 0xa0, 0xb8, 0xa1, 0x19,
    0xae, 0x20,
];

/// Applies the RFC 7748 clamp to a 32-byte scalar: clear the low three
/// bits, clear bit 255, set bit 254.
pub fn clamp_scalar(mut e: [u8; 32]) -> [u8; 32] {
    e[0] &= 248;
    e[31] &= 127;
    e[31] |= 64;
    e
}

/// The u-coordinate of a point on Curve25519, as 32 little-endian bytes.
///
/// Equality is defined modulo p.
#[derive(Copy, Clone, Debug)]
pub struct MontgomeryPoint(pub [u8; 32]);

/// A full affine point (u, v) on Curve25519.
#[derive(Copy, Clone, Debug)]
pub struct MontgomeryAffine {
    /// The u-coordinate.
    pub u: FieldElement,
    /// The v-coordinate.
    pub v: FieldElement,
}

/// A point on the Kummer line of the curve: affine u = U / W, with W = 0
/// encoding the point at infinity.
#[derive(Copy, Clone)]
pub(crate) struct ProjectivePoint {
    pub(crate) u: FieldElement,
    pub(crate) w: FieldElement,
}

impl ConditionallySelectable for ProjectivePoint {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        ProjectivePoint {
            u: FieldElement::conditional_select(&a.u, &b.u, choice),
            w: FieldElement::conditional_select(&a.w, &b.w, choice),
        }
    }
}

/// Doubles (U1 : W1):
///
/// ```text
/// U3 = (U1^2 - W1^2)^2
/// W3 = 4 U1 W1 (U1^2 + A U1 W1 + W1^2)
/// ```
fn xdbl(p: &ProjectivePoint) -> ProjectivePoint {
    let uu = p.u.square();
    let ww = p.w.square();
    let uw = &p.u * &p.w;

    let u3 = (&uu - &ww).square();
    let t = &(&uu + &uw.mul_small(CURVE_A)) + &ww;
    let w3 = (&uw * &t).mul_small(4);

    ProjectivePoint { u: u3, w: w3 }
}

/// Differential addition: given the difference's coordinate (U1 : W1)
/// and two points (U2 : W2), (U3 : W3), computes their sum:
///
/// ```text
/// A = U2 + W2    B = U2 - W2    C = U3 + W3    D = U3 - W3
/// U5 = W1 (DA + CB)^2
/// W5 = U1 (DA - CB)^2
/// ```
fn xadd(
    diff_u: &FieldElement,
    diff_w: &FieldElement,
    p2: &ProjectivePoint,
    p3: &ProjectivePoint,
) -> ProjectivePoint {
    let a = &p2.u + &p2.w;
    let b = &p2.u - &p2.w;
    let c = &p3.u + &p3.w;
    let d = &p3.u - &p3.w;
    let da = &d * &a;
    let cb = &c * &b;

    let u5 = diff_w * &(&da + &cb).square();
    let w5 = diff_u * &(&da - &cb).square();

    ProjectivePoint { u: u5, w: w5 }
}

/// Runs the ladder over bits 253..=0 of `e` (bit 254 must be set) and
/// returns the terminal pair (P_m, P_{m-1}) with m = e.
pub(crate) fn ladder(q: &FieldElement, e: &[u8; 32]) -> (ProjectivePoint, ProjectivePoint) {
    let q_proj = ProjectivePoint {
        u: *q,
        w: FieldElement::ONE,
    };

    // P_m = q, P_{m-1} = infinity: the pair for m = 1.
    let mut pm = q_proj;
    let mut pm1 = ProjectivePoint {
        u: FieldElement::ONE,
        w: FieldElement::ZERO,
    };

    for i in (0..=253).rev() {
        let bit = Choice::from((e[i >> 3] >> (i & 7)) & 1);

        // P_{2m-1} = P_m + P_{m-1}, difference q.
        let odd = xadd(q, &FieldElement::ONE, &pm, &pm1);
        // P_{2m} = 2 P_m.
        let even = xdbl(&pm);
        // P_{2m+1} = P_{2m} + q, difference P_{2m-1}.
        let next = xadd(&odd.u, &odd.w, &even, &q_proj);

        // bit = 0: (P_m, P_{m-1}) <- (P_{2m}, P_{2m-1})
        // bit = 1: (P_m, P_{m-1}) <- (P_{2m+1}, P_{2m})
        pm1 = ProjectivePoint::conditional_select(&odd, &even, bit);
        pm = ProjectivePoint::conditional_select(&even, &next, bit);
    }

    (pm, pm1)
}

/// Okeya-Sakurai recovery of the full projective point Q on the curve,
/// given the base point P = (u, v) in affine form, x(Q) = (U2 : W2) and
/// x(P + Q) = (U3 : W3).
///
/// Requires P not of order two and Q outside {P, -P, infinity}; the
/// output is meaningless otherwise.
fn recover_v(
    p: &MontgomeryAffine,
    q: &ProjectivePoint,
    pq: &ProjectivePoint,
) -> (FieldElement, FieldElement, FieldElement) {
    let v1 = &p.u * &q.w;
    let v2 = &q.u + &v1;
    let v3 = &(&q.u - &v1).square() * &pq.u;
    let v1 = q.w.mul_small(2 * CURVE_A);
    let v2 = &v2 + &v1;
    let v4 = &(&p.u * &q.u) + &q.w;
    let v2 = &v2 * &v4;
    let v1 = &v1 * &q.w;
    let v2 = &(&v2 - &v1) * &pq.w;
    let y = &v2 - &v3;
    let v1 = &(&p.v.mul_small(2) * &q.w) * &pq.w;
    let x = &v1 * &q.u;
    let z = &v1 * &q.w;
    (x, y, z)
}

impl MontgomeryPoint {
    /// The u-coordinate of the generator, u = 9.
    pub const GENERATOR: MontgomeryPoint = MontgomeryPoint([
        9, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0,
    ]);

    /// Multiplies by a prepared scalar (bit 254 set, as produced by
    /// [`clamp_scalar`]), returning the canonical u-coordinate of the
    /// result. Constant time in the scalar.
    pub fn mul_bits(&self, e: &[u8; 32]) -> MontgomeryPoint {
        let q = FieldElement::from_bytes(&self.0);
        let (pm, _) = ladder(&q, e);
        MontgomeryPoint((&pm.u * &pm.w.invert()).to_bytes())
    }

    /// Clamps `e` per RFC 7748 and multiplies.
    pub fn mul_clamped(&self, e: &[u8; 32]) -> MontgomeryPoint {
        self.mul_bits(&clamp_scalar(*e))
    }

    /// Returns the canonical byte encoding.
    pub fn to_bytes(&self) -> [u8; 32] {
        FieldElement::from_bytes(&self.0).to_bytes()
    }

    /// Borrows the raw byte encoding.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl ConstantTimeEq for MontgomeryPoint {
    fn ct_eq(&self, other: &MontgomeryPoint) -> Choice {
        FieldElement::from_bytes(&self.0).ct_eq(&FieldElement::from_bytes(&other.0))
    }
}

impl PartialEq for MontgomeryPoint {
    fn eq(&self, other: &MontgomeryPoint) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for MontgomeryPoint {}

impl Zeroize for MontgomeryPoint {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl MontgomeryAffine {
    /// The generator (u, v) matching [`MontgomeryPoint::GENERATOR`].
    pub fn generator() -> MontgomeryAffine {
        MontgomeryAffine {
            u: FieldElement::from_small(9),
            v: FieldElement::from_bytes(&GENERATOR_V),
        }
    }

    /// Multiplies by a prepared scalar (bit 254 set), producing the full
    /// affine result.
    ///
    /// Runs the same ladder as [`MontgomeryPoint::mul_bits`], then
    /// recovers the v-coordinate from the terminal pair. The ladder
    /// companion is x(Q - P), so the recovery runs against -P, whose sum
    /// with Q is exactly that companion.
    pub fn mul_bits(&self, e: &[u8; 32]) -> MontgomeryAffine {
        let (pm, pm1) = ladder(&self.u, e);

        let p_neg = MontgomeryAffine {
            u: self.u,
            v: -&self.v,
        };
        let (x, y, z) = recover_v(&p_neg, &pm, &pm1);

        let z_inv = z.invert();
        MontgomeryAffine {
            u: (&x * &z_inv).normalize(),
            v: (&y * &z_inv).normalize(),
        }
    }

    /// Drops the v-coordinate.
    pub fn to_point(&self) -> MontgomeryPoint {
        MontgomeryPoint(self.u.to_bytes())
    }

    /// Checks v^2 = u^3 + A u^2 + u.
    pub fn is_on_curve(&self) -> Choice {
        let lhs = self.v.square();
        let uu = self.u.square();
        let rhs = &(&(&uu * &self.u) + &uu.mul_small(CURVE_A)) + &self.u;
        lhs.ct_eq(&rhs)
    }
}

impl PartialEq for MontgomeryAffine {
    fn eq(&self, other: &MontgomeryAffine) -> bool {
        (self.u.ct_eq(&other.u) & self.v.ct_eq(&other.v)).into()
    }
}

impl Eq for MontgomeryAffine {}
