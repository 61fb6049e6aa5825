//! Arithmetic in the prime field GF(2^255 - 19).
//!
//! Elements are 32-byte little-endian residues. Arithmetic works directly
//! on the byte limbs with 16/32-bit carry chains, folding overflow past
//! bit 255 back in via 2^255 = 19 (mod p). Operations tolerate
//! non-canonical inputs and may return values slightly above p;
//! [`FieldElement::normalize`] produces the unique canonical residue.
//!
//! Everything here runs in constant time with respect to the value bits:
//! no secret-dependent branches, no secret-dependent indexing. Selection
//! and equality go through `subtle`.

use core::ops::{Add, Mul, Neg, Sub};

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

/// An element of GF(2^255 - 19), as 32 little-endian bytes.
///
/// The representation is not required to be canonical; two elements that
/// differ by a multiple of p compare equal.
#[derive(Copy, Clone, Debug)]
pub struct FieldElement(pub(crate) [u8; 32]);

impl FieldElement {
    /// The additive identity.
    pub const ZERO: FieldElement = FieldElement::from_small(0);

    /// The multiplicative identity.
    pub const ONE: FieldElement = FieldElement::from_small(1);

    /// The constant 3, used by the Weierstrass maps.
    pub(crate) const THREE: FieldElement = FieldElement::from_small(3);

    /// sqrt(-1) = 2^((p-1)/4) mod p.
    pub(crate) const SQRT_M1: FieldElement = FieldElement([
        0xb0, 0xa0, 0x0e, 0x4a, 0x27, 0x1b, 0xee, 0xc4, 0x78, 0xe4, 0x2f, 0xad, 0x06, 0x18, 0x43,
        0x2f, 0xa7, 0xd7, 0xfb, 0x3d, 0x99, 0x00, 0x4d, 0x2b, 0x0b, 0xdf, 0xc1, 0x4f, 0x80, 0x24,
        0x83, 0x2b,
    ]);

    /// Builds a field element from a small constant.
    pub(crate) const fn from_small(x: u32) -> FieldElement {
        let mut b = [0u8; 32];
        b[0] = x as u8;
        b[1] = (x >> 8) as u8;
        b[2] = (x >> 16) as u8;
        b[3] = (x >> 24) as u8;
        FieldElement(b)
    }

    /// Interprets 32 little-endian bytes as a field element.
    ///
    /// Any 256-bit value is accepted; no masking is applied.
    pub const fn from_bytes(bytes: &[u8; 32]) -> FieldElement {
        FieldElement(*bytes)
    }

    /// Returns the canonical little-endian encoding of this element.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.normalize().0
    }

    /// Fully reduces this element to its canonical residue in [0, p).
    ///
    /// Total over all 256-bit inputs. The final subtraction of p is
    /// performed unconditionally and kept or discarded with a branchless
    /// select, so timing is independent of the value.
    pub fn normalize(&self) -> FieldElement {
        let mut x = self.0;

        // Fold bit 255 down using 2^255 = 19 (mod p). The result is
        // below 2^255 + 19, hence below 2p.
        let mut c: u16 = ((x[31] >> 7) as u16) * 19;
        x[31] &= 127;
        for b in x.iter_mut() {
            c += *b as u16;
            *b = c as u8;
            c >>= 8;
        }

        // Try x - p = x + 19 - 2^255; keep x on borrow.
        let mut minus_p = [0u8; 32];
        let mut c: i32 = 19;
        for i in 0..31 {
            c += x[i] as i32;
            minus_p[i] = c as u8;
            c >>= 8;
        }
        c += x[31] as i32 - 128;
        minus_p[31] = c as u8;

        let borrow = Choice::from(((c >> 31) & 1) as u8);
        let mut r = [0u8; 32];
        for i in 0..32 {
            r[i] = u8::conditional_select(&minus_p[i], &x[i], borrow);
        }
        FieldElement(r)
    }

    /// Returns `self * self`.
    pub fn square(&self) -> FieldElement {
        self * self
    }

    /// Multiplies by a small public constant (at most 24 bits).
    pub fn mul_small(&self, k: u32) -> FieldElement {
        let mut r = [0u8; 32];
        let mut c: u64 = 0;
        for i in 0..32 {
            c >>= 8;
            c += (k as u64) * (self.0[i] as u64);
            r[i] = c as u8;
        }

        r[31] &= 127;
        let mut c: u64 = (c >> 7) * 19;
        for b in r.iter_mut() {
            c += *b as u64;
            *b = c as u8;
            c >>= 8;
        }
        FieldElement(r)
    }

    /// Computes the multiplicative inverse by Fermat's little theorem,
    /// raising to p - 2 with a fixed addition chain. Returns zero for a
    /// zero input.
    pub fn invert(&self) -> FieldElement {
        // p - 2 = 2^255 - 21: 250 one bits followed by 01011.
        let mut r = self.square();
        r = &r * self;
        for _ in 0..248 {
            r = r.square();
            r = &r * self;
        }
        r = r.square();
        r = r.square();
        r = &r * self;
        r = r.square();
        r = r.square();
        r = &r * self;
        r = r.square();
        r = &r * self;
        r
    }

    /// Computes a square root candidate by raising to (p + 3)/8, fixing
    /// up with sqrt(-1) when the first candidate squares to -self.
    ///
    /// Returns the candidate together with the verification bit
    /// `candidate^2 == self`. A clear bit means `self` is a non-residue
    /// and the candidate bytes are meaningless.
    pub fn sqrt(&self) -> (FieldElement, Choice) {
        // (p + 3)/8 = 2^252 - 2: 251 one bits followed by a zero.
        let mut r = self.square();
        r = &r * self;
        for _ in 0..249 {
            r = r.square();
            r = &r * self;
        }
        r = r.square();

        let direct = r.square().ct_eq(self);
        let twisted = &r * &FieldElement::SQRT_M1;
        let r = FieldElement::conditional_select(&twisted, &r, direct);
        let ok = r.square().ct_eq(self);
        (r, ok)
    }

    /// Returns 1 if this element is congruent to zero.
    pub fn is_zero(&self) -> Choice {
        self.ct_eq(&FieldElement::ZERO)
    }
}

fn add_inner(a: &[u8; 32], b: &[u8; 32]) -> [u8; 32] {
    let mut r = [0u8; 32];
    let mut c: u16 = 0;
    for i in 0..32 {
        c >>= 8;
        c += a[i] as u16 + b[i] as u16;
        r[i] = c as u8;
    }

    r[31] &= 127;
    let mut c: u16 = (c >> 7) * 19;
    for b in r.iter_mut() {
        c += *b as u16;
        *b = c as u8;
        c >>= 8;
    }
    r
}

fn sub_inner(a: &[u8; 32], b: &[u8; 32]) -> [u8; 32] {
    // Fold b's top bit so the subtrahend stays below 2^255 + 19 and the
    // 2p offset below always dominates, whatever bytes the caller built.
    let mut bb = *b;
    let mut c: u16 = ((bb[31] >> 7) as u16) * 19;
    bb[31] &= 127;
    for byte in bb.iter_mut() {
        c += *byte as u16;
        *byte = c as u8;
        c >>= 8;
    }

    let mut r = [0u8; 32];

    // Compute a + 2p - b so no limb underflows. 2p = 2^256 - 38, whose
    // little-endian bytes are da ff .. ff.
    let mut c: i64 = 218;
    for i in 0..31 {
        c += 65280 + a[i] as i64 - bb[i] as i64;
        r[i] = c as u8;
        c >>= 8;
    }
    c += a[31] as i64 - bb[31] as i64;
    r[31] = (c & 127) as u8;

    let mut c: i64 = (c >> 7) * 19;
    for b in r.iter_mut() {
        c += *b as i64;
        *b = c as u8;
        c >>= 8;
    }
    r
}

fn mul_inner(a: &[u8; 32], b: &[u8; 32]) -> [u8; 32] {
    let mut r = [0u8; 32];
    let mut c: u32 = 0;
    for i in 0..32 {
        c >>= 8;
        for j in 0..=i {
            c += (a[j] as u32) * (b[i - j] as u32);
        }
        // Bytes past position i wrap around through 2^256 = 38 (mod p).
        for j in (i + 1)..32 {
            c += (a[j] as u32) * (b[i + 32 - j] as u32) * 38;
        }
        r[i] = c as u8;
    }

    r[31] &= 127;
    let mut c: u32 = (c >> 7) * 19;
    for b in r.iter_mut() {
        c += *b as u32;
        *b = c as u8;
        c >>= 8;
    }
    r
}

impl<'a, 'b> Add<&'b FieldElement> for &'a FieldElement {
    type Output = FieldElement;

    fn add(self, rhs: &'b FieldElement) -> FieldElement {
        FieldElement(add_inner(&self.0, &rhs.0))
    }
}

impl<'a, 'b> Sub<&'b FieldElement> for &'a FieldElement {
    type Output = FieldElement;

    fn sub(self, rhs: &'b FieldElement) -> FieldElement {
        FieldElement(sub_inner(&self.0, &rhs.0))
    }
}

impl<'a, 'b> Mul<&'b FieldElement> for &'a FieldElement {
    type Output = FieldElement;

    /// The product is written to a fresh output buffer, so the low-level
    /// multiply never aliases its inputs.
    fn mul(self, rhs: &'b FieldElement) -> FieldElement {
        FieldElement(mul_inner(&self.0, &rhs.0))
    }
}

impl<'a> Neg for &'a FieldElement {
    type Output = FieldElement;

    fn neg(self) -> FieldElement {
        &FieldElement::ZERO - self
    }
}

impl ConditionallySelectable for FieldElement {
    fn conditional_select(a: &FieldElement, b: &FieldElement, choice: Choice) -> FieldElement {
        let mask = choice.unwrap_u8().wrapping_neg();
        let mut r = [0u8; 32];
        for i in 0..32 {
            r[i] = (a.0[i] & !mask) | (b.0[i] & mask);
        }
        FieldElement(r)
    }
}

impl ConstantTimeEq for FieldElement {
    fn ct_eq(&self, other: &FieldElement) -> Choice {
        let a = self.normalize();
        let b = other.normalize();
        let mut x = 0u8;
        for i in 0..32 {
            x |= a.0[i] ^ b.0[i];
        }
        x.ct_eq(&0)
    }
}

impl PartialEq for FieldElement {
    fn eq(&self, other: &FieldElement) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for FieldElement {}

impl Default for FieldElement {
    fn default() -> FieldElement {
        FieldElement::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// p as little-endian bytes.
    const P: [u8; 32] = [
        0xed, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xff, 0x7f,
    ];

    #[test]
    fn normalize_is_idempotent() {
        let cases: [[u8; 32]; 4] = [[0xff; 32], P, [0; 32], {
            let mut p1 = P;
            p1[0] += 1;
            p1
        }];
        for bytes in cases {
            let x = FieldElement::from_bytes(&bytes);
            let once = x.normalize();
            let twice = once.normalize();
            assert_eq!(once.0, twice.0);
            // Canonical result is below p.
            let mut borrow: i16 = 0;
            for i in 0..32 {
                let d = once.0[i] as i16 - P[i] as i16 - borrow;
                borrow = (d >> 8) & 1;
            }
            assert_eq!(borrow, 1);
        }
    }

    #[test]
    fn p_normalizes_to_zero() {
        assert_eq!(FieldElement::from_bytes(&P).to_bytes(), [0u8; 32]);
        // 2^256 - 1 = 2p + 37.
        assert_eq!(
            FieldElement::from_bytes(&[0xff; 32]).to_bytes(),
            FieldElement::from_small(37).to_bytes()
        );
    }

    #[test]
    fn add_sub_round_trip() {
        let a = FieldElement::from_small(1000);
        let b = FieldElement::from_bytes(&P); // zero, non-canonical form
        let sum = &a + &b;
        assert_eq!(sum.to_bytes(), a.to_bytes());

        let pm1 = {
            let mut b = P;
            b[0] -= 1;
            FieldElement::from_bytes(&b)
        };
        // (p - 1) + 2 = 1.
        let r = &pm1 + &FieldElement::from_small(2);
        assert_eq!(r.to_bytes(), FieldElement::ONE.to_bytes());
        // 0 - 1 = p - 1.
        let r = &FieldElement::ZERO - &FieldElement::ONE;
        assert_eq!(r.to_bytes(), pm1.to_bytes());
    }

    #[test]
    fn sub_accepts_unreduced_subtrahend() {
        // 0 - (2^256 - 1) = -37 = p - 37.
        let r = &FieldElement::ZERO - &FieldElement::from_bytes(&[0xff; 32]);
        let expected = -&FieldElement::from_small(37);
        assert_eq!(r.to_bytes(), expected.to_bytes());
    }

    #[test]
    fn mul_matches_small_products() {
        let a = FieldElement::from_small(123456789);
        let b = FieldElement::from_small(987654321);
        let prod = &a * &b;
        // 123456789 * 987654321 = 121932631112635269.
        let expected: u64 = 121_932_631_112_635_269;
        let mut bytes = [0u8; 32];
        bytes[..8].copy_from_slice(&expected.to_le_bytes());
        assert_eq!(prod.to_bytes(), bytes);
    }

    #[test]
    fn mul_small_agrees_with_mul() {
        let a = FieldElement::from_bytes(&[0xab; 32]);
        for k in [2u32, 3, 4, 486662, 973324] {
            let lhs = a.mul_small(k);
            let rhs = &a * &FieldElement::from_small(k);
            assert_eq!(lhs.to_bytes(), rhs.to_bytes());
        }
    }

    #[test]
    fn invert_round_trip() {
        for bytes in [[9u8; 32], [0x42; 32], {
            let mut b = [0u8; 32];
            b[0] = 9;
            b
        }] {
            let a = FieldElement::from_bytes(&bytes);
            let r = &a * &a.invert();
            assert_eq!(r.to_bytes(), FieldElement::ONE.to_bytes());
        }
        assert_eq!(FieldElement::ZERO.invert().to_bytes(), [0u8; 32]);
    }

    #[test]
    fn sqrt_of_square_verifies() {
        let a = FieldElement::from_bytes(&[0x5a; 32]);
        let sq = a.square();
        let (root, ok) = sq.sqrt();
        assert!(bool::from(ok));
        let matches = root == a || root == -&a;
        assert!(matches);
    }

    #[test]
    fn sqrt_m1_squares_to_minus_one() {
        let m1 = -&FieldElement::ONE;
        assert_eq!(FieldElement::SQRT_M1.square().to_bytes(), m1.to_bytes());
    }

    #[test]
    fn nonresidue_is_rejected() {
        // 2 is a non-residue modulo p.
        let (_, ok) = FieldElement::from_small(2).sqrt();
        assert!(!bool::from(ok));
    }

    #[test]
    fn select_is_exact() {
        let a = FieldElement::from_bytes(&[0x11; 32]);
        let b = FieldElement::from_bytes(&[0xee; 32]);
        let r0 = FieldElement::conditional_select(&a, &b, Choice::from(0));
        let r1 = FieldElement::conditional_select(&a, &b, Choice::from(1));
        assert_eq!(r0.0, a.0);
        assert_eq!(r1.0, b.0);
    }

    #[test]
    fn eq_is_defined_mod_p() {
        let a = FieldElement::from_small(37);
        let b = FieldElement::from_bytes(&[0xff; 32]);
        assert_eq!(a, b);
        assert_ne!(a, FieldElement::from_small(36));
    }
}
