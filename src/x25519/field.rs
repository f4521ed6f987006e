//! Field arithmetic modulo 2^255 - 19.
//!
//! Elements are 16 signed 64-bit limbs in radix 2^16. Addition and
//! subtraction are lazy; limbs re-enter their nominal range through the
//! carry passes inside multiplication and through [`FieldElement::pack`].

use core::ops::{Add, Mul, Sub};

/// A field element modulo 2^255 - 19.
#[derive(Clone, Copy, Debug)]
pub(crate) struct FieldElement(pub(crate) [i64; 16]);

/// The ladder constant a24 = (486662 - 2) / 4 = 121665.
pub(crate) const A24: FieldElement = {
    let mut limbs = [0i64; 16];
    limbs[0] = 0xDB41;
    limbs[1] = 1;
    FieldElement(limbs)
};

impl FieldElement {
    pub const ZERO: FieldElement = FieldElement([0; 16]);

    pub const ONE: FieldElement = {
        let mut limbs = [0i64; 16];
        limbs[0] = 1;
        FieldElement(limbs)
    };

    /// Reads 32 little-endian bytes, clearing the top bit of byte 31.
    pub fn unpack(bytes: &[u8; 32]) -> FieldElement {
        let mut limbs = [0i64; 16];
        for i in 0..16 {
            limbs[i] = i64::from(bytes[2 * i]) | (i64::from(bytes[2 * i + 1]) << 8);
        }
        limbs[15] &= 0x7fff;
        FieldElement(limbs)
    }

    /// Canonicalizes to 32 little-endian bytes in [0, 2^255 - 19).
    ///
    /// Three carry passes bring every limb into range; two conditional
    /// subtractions of the prime, selected on the sign of the top limb,
    /// produce the unique representative.
    pub fn pack(&self) -> [u8; 32] {
        let mut t = *self;
        t.carry();
        t.carry();
        t.carry();

        let mut m = FieldElement::ZERO;
        for _ in 0..2 {
            m.0[0] = t.0[0] - 0xffed;
            for i in 1..15 {
                m.0[i] = t.0[i] - 0xffff - ((m.0[i - 1] >> 16) & 1);
                m.0[i - 1] &= 0xffff;
            }
            m.0[15] = t.0[15] - 0x7fff - ((m.0[14] >> 16) & 1);
            let underflow = (m.0[15] >> 16) & 1;
            m.0[14] &= 0xffff;
            FieldElement::cswap(&mut t, &mut m, 1 - underflow);
        }

        let mut out = [0u8; 32];
        for i in 0..16 {
            out[2 * i] = (t.0[i] & 0xff) as u8;
            out[2 * i + 1] = ((t.0[i] >> 8) & 0xff) as u8;
        }
        out
    }

    /// Propagates limb overflow upward, folding the carry out of limb 15
    /// back into limb 0 with weight 38 (2^256 = 38 mod p).
    fn carry(&mut self) {
        for i in 0..16 {
            self.0[i] += 1 << 16;
            let c = self.0[i] >> 16;
            if i < 15 {
                self.0[i + 1] += c - 1;
            } else {
                self.0[0] += 38 * (c - 1);
            }
            self.0[i] -= c << 16;
        }
    }

    pub fn square(&self) -> FieldElement {
        self * self
    }

    /// `self^-1` by Fermat: the fixed addition chain for 2^255 - 21
    /// (square throughout, multiply on every exponent bit except 2 and 4).
    pub fn invert(&self) -> FieldElement {
        let mut c = *self;
        for i in (0..=253).rev() {
            c = c.square();
            if i != 2 && i != 4 {
                c = &c * self;
            }
        }
        c
    }

    /// Swaps `a` and `b` when `bit` is 1; `bit` must be 0 or 1. The access
    /// pattern does not depend on `bit`.
    pub fn cswap(a: &mut FieldElement, b: &mut FieldElement, bit: i64) {
        let mask = !(bit - 1);
        for i in 0..16 {
            let t = mask & (a.0[i] ^ b.0[i]);
            a.0[i] ^= t;
            b.0[i] ^= t;
        }
    }
}

impl Add<&FieldElement> for &FieldElement {
    type Output = FieldElement;

    fn add(self, rhs: &FieldElement) -> FieldElement {
        let mut out = [0i64; 16];
        for i in 0..16 {
            out[i] = self.0[i] + rhs.0[i];
        }
        FieldElement(out)
    }
}

impl Sub<&FieldElement> for &FieldElement {
    type Output = FieldElement;

    fn sub(self, rhs: &FieldElement) -> FieldElement {
        let mut out = [0i64; 16];
        for i in 0..16 {
            out[i] = self.0[i] - rhs.0[i];
        }
        FieldElement(out)
    }
}

impl Mul<&FieldElement> for &FieldElement {
    type Output = FieldElement;

    fn mul(self, rhs: &FieldElement) -> FieldElement {
        let mut t = [0i64; 31];
        for i in 0..16 {
            for j in 0..16 {
                t[i + j] += self.0[i] * rhs.0[j];
            }
        }
        // 2^256 = 38 mod p folds the upper half back down
        for i in 0..15 {
            t[i] += 38 * t[i + 16];
        }
        let mut out = [0i64; 16];
        out.copy_from_slice(&t[..16]);
        let mut out = FieldElement(out);
        out.carry();
        out.carry();
        out
    }
}
