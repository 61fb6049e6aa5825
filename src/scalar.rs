//! Arithmetic modulo the group order of Curve25519/Ed25519.
//!
//! The order is n = 2^252 + 27742317777372353535851937790883648493, the
//! size of the prime-order subgroup shared by all three curve forms and
//! the modulus of the ECDSA scalar field.
//!
//! Scalars are canonical 32-byte little-endian residues below n. All
//! arithmetic is bitwise shift-and-add with branchless conditional
//! subtraction, so it runs in constant time in the operand values; the
//! private key and nonce flow through these routines.

use core::ops::{Add, Mul, Sub};

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};
use zeroize::Zeroize;

/// The group order n, little-endian.
const N: [u8; 32] = [
    0xed, 0xd3, 0xf5, 0x5c, 0x1a, 0x63, 0x12, 0x58, 0xd6, 0x9c, 0xf7, 0xa2, 0xde, 0xf9, 0xde,
    0x14, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x10,
];

/// n - 2, the Fermat inversion exponent.
const N_MINUS_2: [u8; 32] = [
    0xeb, 0xd3, 0xf5, 0x5c, 0x1a, 0x63, 0x12, 0x58, 0xd6, 0x9c, 0xf7, 0xa2, 0xde, 0xf9, 0xde,
    0x14, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x10,
];

/// An element of the scalar field, kept canonical (below n).
#[derive(Copy, Clone, Debug)]
pub struct Scalar(pub(crate) [u8; 32]);

/// Shifts `x` left by `k` bits (k < 8).
fn shift_bits(x: &mut [u8; 32], k: u32) {
    let mut c: u16 = 0;
    for b in x.iter_mut() {
        c |= (*b as u16) << k;
        *b = c as u8;
        c >>= 8;
    }
}

/// Computes `x - n` and keeps it unless the subtraction borrowed,
/// selecting the result branchlessly.
fn reduce_once(x: &mut [u8; 32]) {
    let mut minus_n = [0u8; 32];
    let mut borrow: i16 = 0;
    for i in 0..32 {
        let d = x[i] as i16 - N[i] as i16 - borrow;
        minus_n[i] = d as u8;
        borrow = (d >> 8) & 1;
    }

    let keep = Choice::from(borrow as u8);
    for i in 0..32 {
        x[i] = u8::conditional_select(&minus_n[i], &x[i], keep);
    }
}

impl Scalar {
    /// The scalar zero.
    pub const ZERO: Scalar = Scalar([0u8; 32]);

    /// The scalar one.
    pub const ONE: Scalar = Scalar([
        1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0,
    ]);

    /// Parses a canonical scalar, failing if the value is not below n.
    pub fn from_canonical_bytes(bytes: [u8; 32]) -> CtOption<Scalar> {
        let mut borrow: i16 = 0;
        for i in 0..32 {
            let d = bytes[i] as i16 - N[i] as i16 - borrow;
            borrow = (d >> 8) & 1;
        }
        CtOption::new(Scalar(bytes), Choice::from(borrow as u8))
    }

    /// Reduces an arbitrary-width little-endian integer modulo n.
    ///
    /// Used both for 32-byte inputs (folding a field element into the
    /// scalar field) and for the 33-byte intermediates produced while
    /// signing. The high 252 bits of the input are loaded directly (any
    /// 252-bit value is already below n); the remaining bits are shifted
    /// in one at a time with a conditional subtraction each.
    pub fn from_bytes_mod_order(input: &[u8]) -> Scalar {
        let total_bits = input.len() * 8;
        let preload_total = if total_bits < 252 { total_bits } else { 252 };
        let preload_bytes = preload_total >> 3;
        let preload_bits = (preload_total & 7) as u32;
        let rbits = total_bits - preload_total;

        let mut n = [0u8; 32];
        for i in 0..preload_bytes {
            n[i] = input[input.len() - preload_bytes + i];
        }
        if preload_bits > 0 {
            shift_bits(&mut n, preload_bits);
            n[0] |= input[input.len() - preload_bytes - 1] >> (8 - preload_bits);
        }

        for i in (0..rbits).rev() {
            let bit = (input[i >> 3] >> (i & 7)) & 1;
            shift_bits(&mut n, 1);
            n[0] |= bit;
            reduce_once(&mut n);
        }
        Scalar(n)
    }

    /// Returns the little-endian encoding.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// Borrows the little-endian encoding.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Computes the multiplicative inverse by raising to n - 2.
    ///
    /// The exponent is a public constant, so the branch pattern leaks
    /// nothing about the (possibly secret) base. Returns zero for zero.
    pub fn invert(&self) -> Scalar {
        let mut r = Scalar::ONE;
        for i in (0..=252).rev() {
            r = &r * &r;
            if (N_MINUS_2[i >> 3] >> (i & 7)) & 1 == 1 {
                r = &r * self;
            }
        }
        r
    }

    /// Returns 1 if this scalar is zero.
    pub fn is_zero(&self) -> Choice {
        let mut x = 0u8;
        for b in self.0 {
            x |= b;
        }
        x.ct_eq(&0)
    }
}

impl<'a, 'b> Add<&'b Scalar> for &'a Scalar {
    type Output = Scalar;

    fn add(self, rhs: &'b Scalar) -> Scalar {
        // Both operands are below n < 2^253, so the raw sum fits in
        // 32 bytes and a single conditional subtraction reduces it.
        let mut r = [0u8; 32];
        let mut c: u16 = 0;
        for i in 0..32 {
            c = (c >> 8) + self.0[i] as u16 + rhs.0[i] as u16;
            r[i] = c as u8;
        }
        reduce_once(&mut r);
        Scalar(r)
    }
}

impl<'a, 'b> Sub<&'b Scalar> for &'a Scalar {
    type Output = Scalar;

    fn sub(self, rhs: &'b Scalar) -> Scalar {
        // a + n - b: adding n first keeps every limb non-negative.
        let mut r = [0u8; 32];
        let mut c: u16 = 0;
        for i in 0..32 {
            c = (c >> 8) + self.0[i] as u16 + N[i] as u16;
            r[i] = c as u8;
        }
        let mut borrow: i16 = 0;
        for i in 0..32 {
            let d = r[i] as i16 - rhs.0[i] as i16 - borrow;
            r[i] = d as u8;
            borrow = (d >> 8) & 1;
        }
        reduce_once(&mut r);
        Scalar(r)
    }
}

impl<'a, 'b> Mul<&'b Scalar> for &'a Scalar {
    type Output = Scalar;

    fn mul(self, rhs: &'b Scalar) -> Scalar {
        let mut r = [0u8; 32];
        for i in (0..256).rev() {
            let bit = (rhs.0[i >> 3] >> (i & 7)) & 1;

            shift_bits(&mut r, 1);
            reduce_once(&mut r);

            let mut plus_a = r;
            let mut c: u16 = 0;
            for j in 0..32 {
                c = (c >> 8) + plus_a[j] as u16 + self.0[j] as u16;
                plus_a[j] = c as u8;
            }
            reduce_once(&mut plus_a);

            let take = Choice::from(bit);
            for j in 0..32 {
                r[j] = u8::conditional_select(&r[j], &plus_a[j], take);
            }
        }
        Scalar(r)
    }
}

impl ConditionallySelectable for Scalar {
    fn conditional_select(a: &Scalar, b: &Scalar, choice: Choice) -> Scalar {
        let mask = choice.unwrap_u8().wrapping_neg();
        let mut r = [0u8; 32];
        for i in 0..32 {
            r[i] = (a.0[i] & !mask) | (b.0[i] & mask);
        }
        Scalar(r)
    }
}

impl ConstantTimeEq for Scalar {
    fn ct_eq(&self, other: &Scalar) -> Choice {
        let mut x = 0u8;
        for i in 0..32 {
            x |= self.0[i] ^ other.0[i];
        }
        x.ct_eq(&0)
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Scalar) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for Scalar {}

impl Zeroize for Scalar {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}
