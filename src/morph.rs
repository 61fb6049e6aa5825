//! Birational maps between the three presentations of the curve.
//!
//! Curve25519 (Montgomery), Ed25519 (twisted Edwards) and Wei25519
//! (short Weierstrass) are the same group wearing three coordinate
//! systems. This module holds the maps between them: the coordinate-only
//! conversions, the recovery of a missing coordinate from a curve
//! equation, and the full affine point maps.
//!
//! The exceptional points (the Edwards neutral (0, 1) and 2-torsion
//! (0, -1), the Montgomery (0, 0), the Weierstrass (A/3, 0) and the
//! point at infinity) are not representable through these maps. Callers
//! must not pass them; no runtime detection is performed. The one
//! deliberate convention: the Montgomery coordinate u = 0 and the
//! Weierstrass coordinate x = 0 map to each other unshifted, keeping the
//! excluded 2-torsion/infinity pair aligned across the two forms.

use subtle::{Choice, ConditionallySelectable};

use crate::edwards::{EdwardsAffine, EDWARDS_D};
use crate::field::FieldElement;
use crate::montgomery::MontgomeryAffine;
use crate::weierstrass::{WeierstrassPoint, WEI_A, WEI_B};

/// delta = (p + A)/3, the x-shift between the Montgomery and Weierstrass
/// forms, little-endian.
pub(crate) const DELTA: FieldElement = FieldElement([
    0x51, 0x24, 0xad, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa,
    0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa,
    0xaa, 0x2a,
]);

/// c = sqrt(-(A + 2)), the scale factor between Edwards x and the
/// Montgomery/Weierstrass y-maps, little-endian.
pub(crate) const SQRT_MINUS_A_PLUS_2: FieldElement = FieldElement([
    0xe7, 0x81, 0xba, 0x00, 0x55, 0xfb, 0x91, 0x33, 0x7d, 0xe5, 0x82, 0xb4, 0x2e, 0x2c, 0x5e,
    0x3a, 0x81, 0xb0, 0x03, 0xfc, 0x23, 0xf7, 0x84, 0x2d, 0x44, 0xf9, 0x5f, 0x9f, 0x0b, 0x12,
    0xd9, 0x70,
]);

/// Maps an Edwards y-coordinate to the Montgomery u-coordinate:
/// u = (1 + y)/(1 - y). Undefined at y = 1.
pub fn montgomery_u_from_edwards_y(ey: &FieldElement) -> FieldElement {
    let num = &FieldElement::ONE + ey;
    let den = &FieldElement::ONE - ey;
    &num * &den.invert()
}

/// Maps a Montgomery u-coordinate to the Edwards y-coordinate:
/// y = (u - 1)/(u + 1). Undefined at u = -1.
pub fn edwards_y_from_montgomery_u(mu: &FieldElement) -> FieldElement {
    let num = mu - &FieldElement::ONE;
    let den = mu + &FieldElement::ONE;
    &num * &den.invert()
}

/// Maps a Montgomery u-coordinate to the Weierstrass x-coordinate:
/// x = u + delta, except that u = 0 maps to x = 0.
pub fn weierstrass_x_from_montgomery_u(mu: &FieldElement) -> FieldElement {
    let shifted = mu + &DELTA;
    FieldElement::conditional_select(&shifted, &FieldElement::ZERO, mu.is_zero())
}

/// Maps a Weierstrass x-coordinate to the Montgomery u-coordinate:
/// u = x - delta, except that x = 0 maps to u = 0.
pub fn montgomery_u_from_weierstrass_x(wx: &FieldElement) -> FieldElement {
    let shifted = wx - &DELTA;
    FieldElement::conditional_select(&shifted, &FieldElement::ZERO, wx.is_zero())
}

/// Recovers the Edwards x-coordinate from y and the desired parity of x,
/// solving x^2 = (y^2 - 1)/(1 + d y^2).
///
/// The sign is chosen branchlessly so the low bit of the canonical x
/// matches `parity`. The returned bit is the square-root verification:
/// when clear, no such x exists and the coordinate is meaningless.
pub fn edwards_x_from_y(ey: &FieldElement, parity: u8) -> (FieldElement, Choice) {
    let yy = ey.square();
    let num = &yy - &FieldElement::ONE;
    let den = &FieldElement::ONE + &(&EDWARDS_D * &yy);
    let t = &num * &den.invert();

    let (x, ok) = t.sqrt();
    let x = x.normalize();
    let flip = Choice::from((x.to_bytes()[0] ^ parity) & 1);
    let x = FieldElement::conditional_select(&x, &(-&x).normalize(), flip);
    (x, ok)
}

/// Recovers a Weierstrass y-coordinate from x and the desired parity of
/// y, solving y^2 = x^3 + a x + b.
///
/// `sign` is the low bit the caller wants the canonical y to carry; both
/// roots are valid curve points. The returned bit is the square-root
/// verification: when clear, x is not on the curve.
pub fn weierstrass_y_from_x(wx: &FieldElement, sign: u8) -> (FieldElement, Choice) {
    let xxx = &wx.square() * wx;
    let t = &(&xxx + &(&WEI_A * wx)) + &WEI_B;

    let (y, ok) = t.sqrt();
    let y = y.normalize();
    let flip = Choice::from((y.to_bytes()[0] ^ sign) & 1);
    let y = FieldElement::conditional_select(&y, &(-&y).normalize(), flip);
    (y, ok)
}

impl EdwardsAffine {
    /// Maps to the Montgomery form:
    /// u = (1 + y)/(1 - y), v = c (1 + y)/((1 - y) x).
    pub fn to_montgomery(&self) -> MontgomeryAffine {
        let num = &FieldElement::ONE + &self.y;
        let den = &FieldElement::ONE - &self.y;
        let u = &num * &den.invert();
        let v = &(&SQRT_MINUS_A_PLUS_2 * &num) * &(&den * &self.x).invert();
        MontgomeryAffine {
            u: u.normalize(),
            v: v.normalize(),
        }
    }

    /// Maps to the Weierstrass form: the Montgomery image shifted by
    /// delta.
    pub fn to_weierstrass(&self) -> WeierstrassPoint {
        let m = self.to_montgomery();
        WeierstrassPoint {
            x: weierstrass_x_from_montgomery_u(&m.u).normalize(),
            y: m.v,
        }
    }
}

impl MontgomeryAffine {
    /// Maps to the Edwards form: x = c u/v, y = (u - 1)/(u + 1).
    pub fn to_edwards(&self) -> EdwardsAffine {
        let x = &(&SQRT_MINUS_A_PLUS_2 * &self.u) * &self.v.invert();
        let y = edwards_y_from_montgomery_u(&self.u);
        EdwardsAffine {
            x: x.normalize(),
            y: y.normalize(),
        }
    }

    /// Maps to the Weierstrass form: the x-shift by delta; y carries
    /// over unchanged.
    pub fn to_weierstrass(&self) -> WeierstrassPoint {
        WeierstrassPoint {
            x: weierstrass_x_from_montgomery_u(&self.u).normalize(),
            y: self.v.normalize(),
        }
    }
}

impl WeierstrassPoint {
    /// Maps to the Edwards form. With pa = 3x - A:
    /// x_E = c pa/(3y), y_E = (pa - 3)/(pa + 3).
    pub fn to_edwards(&self) -> EdwardsAffine {
        let pa = &self.x.mul_small(3) - &FieldElement::from_small(crate::montgomery::CURVE_A);
        let x = &(&SQRT_MINUS_A_PLUS_2 * &pa) * &self.y.mul_small(3).invert();
        let num = &pa - &FieldElement::THREE;
        let den = &pa + &FieldElement::THREE;
        let y = &num * &den.invert();
        EdwardsAffine {
            x: x.normalize(),
            y: y.normalize(),
        }
    }

    /// Maps to the Montgomery form: the x-shift by delta; y carries over
    /// unchanged.
    pub fn to_montgomery(&self) -> MontgomeryAffine {
        MontgomeryAffine {
            u: montgomery_u_from_weierstrass_x(&self.x).normalize(),
            v: self.y.normalize(),
        }
    }
}
