//! Arbitrary-precision unsigned integer arithmetic.
//!
//! [`BigUint`] carries exactly the operations the RSA layer needs: schoolbook
//! multiplication, Knuth long division, Montgomery exponentiation, the
//! extended Euclidean inverse and probabilistic primality testing. Values are
//! immutable once constructed; all operations produce new values.

mod montgomery;
mod prime;

use alloc::string::ToString;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::ops::{Add, Div, Mul, Rem, Shl, Shr, Sub};

use subtle::{Choice, ConditionallySelectable};
use zeroize::Zeroize;

use crate::errors::{Error, Result};

/// Non-negative integer of arbitrary magnitude.
///
/// Stored as base-2^64 limbs, least significant first, with no trailing zero
/// limbs; zero is the empty limb vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BigUint {
    limbs: Vec<u64>,
}

impl BigUint {
    pub fn zero() -> Self {
        BigUint { limbs: Vec::new() }
    }

    pub fn one() -> Self {
        BigUint { limbs: alloc::vec![1] }
    }

    pub fn from_u64(v: u64) -> Self {
        if v == 0 {
            Self::zero()
        } else {
            BigUint { limbs: alloc::vec![v] }
        }
    }

    pub(crate) fn from_limbs(limbs: Vec<u64>) -> Self {
        let mut n = BigUint { limbs };
        n.trim();
        n
    }

    fn trim(&mut self) {
        while self.limbs.last() == Some(&0) {
            self.limbs.pop();
        }
    }

    /// Interprets `bytes` as an unsigned big-endian integer.
    pub fn from_bytes_be(bytes: &[u8]) -> Self {
        let mut limbs = Vec::with_capacity((bytes.len() + 7) / 8);
        let mut i = bytes.len();
        while i > 0 {
            let start = i.saturating_sub(8);
            let mut limb = 0u64;
            for &b in &bytes[start..i] {
                limb = (limb << 8) | u64::from(b);
            }
            limbs.push(limb);
            i = start;
        }
        Self::from_limbs(limbs)
    }

    /// Serializes to the minimum number of big-endian bytes; zero is empty.
    pub fn to_bytes_be(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.limbs.len() * 8);
        let mut iter = self.limbs.iter().rev();
        if let Some(&hi) = iter.next() {
            let skip = (hi.leading_zeros() / 8) as usize;
            out.extend_from_slice(&hi.to_be_bytes()[skip..]);
            for &limb in iter {
                out.extend_from_slice(&limb.to_be_bytes());
            }
        }
        out
    }

    /// Parses an unsigned big-endian hexadecimal string of arbitrary length.
    pub fn from_hex(s: &str) -> Result<Self> {
        let digits = s.as_bytes();
        if digits.is_empty() {
            return Err(Error::ParseError {
                reason: "empty hex string".to_string(),
            });
        }
        let mut limbs = Vec::with_capacity((digits.len() + 15) / 16);
        let mut i = digits.len();
        while i > 0 {
            let start = i.saturating_sub(16);
            let mut limb = 0u64;
            for &c in &digits[start..i] {
                let d = match c {
                    b'0'..=b'9' => c - b'0',
                    b'a'..=b'f' => c - b'a' + 10,
                    b'A'..=b'F' => c - b'A' + 10,
                    _ => {
                        return Err(Error::ParseError {
                            reason: alloc::format!("invalid hex digit {:?}", c as char),
                        })
                    }
                };
                limb = (limb << 4) | u64::from(d);
            }
            limbs.push(limb);
            i = start;
        }
        Ok(Self::from_limbs(limbs))
    }

    pub fn is_zero(&self) -> bool {
        self.limbs.is_empty()
    }

    pub fn is_one(&self) -> bool {
        self.limbs.len() == 1 && self.limbs[0] == 1
    }

    pub fn is_odd(&self) -> bool {
        self.limbs.first().map_or(false, |l| l & 1 == 1)
    }

    pub fn is_even(&self) -> bool {
        !self.is_odd()
    }

    /// 0 for zero, +1 otherwise (the type carries no negative values).
    pub fn signum(&self) -> i8 {
        if self.is_zero() {
            0
        } else {
            1
        }
    }

    /// Position of the highest set bit plus one; zero for zero.
    pub fn bits(&self) -> usize {
        match self.limbs.last() {
            Some(&hi) => self.limbs.len() * 64 - hi.leading_zeros() as usize,
            None => 0,
        }
    }

    pub fn bit(&self, i: usize) -> bool {
        self.limbs
            .get(i / 64)
            .map_or(false, |l| (l >> (i % 64)) & 1 == 1)
    }

    pub fn set_bit(&mut self, i: usize) {
        let limb = i / 64;
        if limb >= self.limbs.len() {
            self.limbs.resize(limb + 1, 0);
        }
        self.limbs[limb] |= 1u64 << (i % 64);
    }

    pub fn trailing_zeros(&self) -> usize {
        for (i, &limb) in self.limbs.iter().enumerate() {
            if limb != 0 {
                return i * 64 + limb.trailing_zeros() as usize;
            }
        }
        0
    }

    /// Discards all bits at positions `bits` and above.
    pub(crate) fn truncate_bits(&mut self, bits: usize) {
        let full = bits / 64;
        let rem = bits % 64;
        if rem == 0 {
            self.limbs.truncate(full);
        } else if self.limbs.len() > full {
            self.limbs.truncate(full + 1);
            self.limbs[full] &= (1u64 << rem) - 1;
        }
        self.trim();
    }

    /// Quotient and remainder of `self / divisor` (Knuth's Algorithm D).
    ///
    /// Panics on a zero divisor.
    pub fn div_rem(&self, divisor: &BigUint) -> (BigUint, BigUint) {
        assert!(!divisor.is_zero(), "division by zero");
        if self < divisor {
            return (BigUint::zero(), self.clone());
        }
        if divisor.limbs.len() == 1 {
            let (q, r) = self.div_rem_limb(divisor.limbs[0]);
            return (q, BigUint::from_u64(r));
        }

        // Normalize so the divisor's top limb has its high bit set, which
        // bounds the per-digit quotient estimate to within two.
        let shift = divisor.limbs.last().unwrap().leading_zeros() as usize;
        let mut un = (self << shift).limbs;
        un.push(0);
        let vn = (divisor << shift).limbs;
        let n = vn.len();
        let m = un.len() - n - 1;
        let mut q = alloc::vec![0u64; m + 1];

        for j in (0..=m).rev() {
            let top = ((un[j + n] as u128) << 64) | un[j + n - 1] as u128;
            let mut qhat = top / vn[n - 1] as u128;
            let mut rhat = top % vn[n - 1] as u128;
            while qhat > u64::MAX as u128
                || qhat * vn[n - 2] as u128 > ((rhat << 64) | un[j + n - 2] as u128)
            {
                qhat -= 1;
                rhat += vn[n - 1] as u128;
                if rhat > u64::MAX as u128 {
                    break;
                }
            }

            // un[j..j+n+1] -= qhat * vn
            let mut k = 0u64;
            let mut borrow = 0u64;
            for i in 0..n {
                let p = qhat * vn[i] as u128 + k as u128;
                k = (p >> 64) as u64;
                let (d1, b1) = un[j + i].overflowing_sub(p as u64);
                let (d2, b2) = d1.overflowing_sub(borrow);
                un[j + i] = d2;
                borrow = b1 as u64 + b2 as u64;
            }
            let (d1, b1) = un[j + n].overflowing_sub(k);
            let (d2, b2) = d1.overflowing_sub(borrow);
            un[j + n] = d2;

            if b1 || b2 {
                // qhat was one too large; add the divisor back
                qhat -= 1;
                let mut carry = 0u64;
                for i in 0..n {
                    let s = un[j + i] as u128 + vn[i] as u128 + carry as u128;
                    un[j + i] = s as u64;
                    carry = (s >> 64) as u64;
                }
                un[j + n] = un[j + n].wrapping_add(carry);
            }
            q[j] = qhat as u64;
        }

        un.truncate(n);
        let rem = &BigUint::from_limbs(un) >> shift;
        (BigUint::from_limbs(q), rem)
    }

    fn div_rem_limb(&self, d: u64) -> (BigUint, u64) {
        let mut q = alloc::vec![0u64; self.limbs.len()];
        let mut rem = 0u128;
        for i in (0..self.limbs.len()).rev() {
            let cur = (rem << 64) | self.limbs[i] as u128;
            q[i] = (cur / d as u128) as u64;
            rem = cur % d as u128;
        }
        (BigUint::from_limbs(q), rem as u64)
    }

    /// Greatest common divisor by Euclid's algorithm.
    pub fn gcd(&self, other: &BigUint) -> BigUint {
        let mut a = self.clone();
        let mut b = other.clone();
        while !b.is_zero() {
            let r = &a % &b;
            a = b;
            b = r;
        }
        a
    }

    /// `self^-1 mod m` via the extended Euclidean algorithm, or `None` when
    /// the operands are not coprime.
    pub fn mod_inverse(&self, m: &BigUint) -> Option<BigUint> {
        let mut r0 = m.clone();
        let mut r1 = self % m;
        let mut x0 = Signed {
            mag: BigUint::zero(),
            neg: false,
        };
        let mut x1 = Signed {
            mag: BigUint::one(),
            neg: false,
        };
        while !r1.is_zero() {
            let (q, r) = r0.div_rem(&r1);
            let x2 = x0.sub_mul(&q, &x1);
            r0 = r1;
            r1 = r;
            x0 = x1;
            x1 = x2;
        }
        if !r0.is_one() {
            return None;
        }
        let mut inv = &x0.mag % m;
        if x0.neg && !inv.is_zero() {
            inv = m - &inv;
        }
        Some(inv)
    }

    /// `self^exp mod m`. Montgomery reduction for odd moduli, binary
    /// square-and-multiply otherwise. Panics on a zero modulus.
    pub fn modpow(&self, exp: &BigUint, m: &BigUint) -> BigUint {
        assert!(!m.is_zero(), "division by zero");
        if m.is_one() {
            return BigUint::zero();
        }
        if m.is_odd() {
            return montgomery::modpow_odd(self, exp, m);
        }

        let base = self % m;
        let mut result = BigUint::one();
        for i in (0..exp.bits()).rev() {
            result = &(&result * &result) % m;
            if exp.bit(i) {
                result = &(&result * &base) % m;
            }
        }
        result
    }

    /// `self^exp mod m` for a machine-word exponent.
    pub fn modpow_u64(&self, exp: u64, m: &BigUint) -> BigUint {
        self.modpow(&BigUint::from_u64(exp), m)
    }

    /// Constant-time `self < rhs`, evaluated over the wider operand's width.
    pub(crate) fn ct_lt(&self, rhs: &BigUint) -> Choice {
        let len = core::cmp::max(self.limbs.len(), rhs.limbs.len());
        let mut borrow = 0u8;
        for i in 0..len {
            let a = self.limbs.get(i).copied().unwrap_or(0);
            let b = rhs.limbs.get(i).copied().unwrap_or(0);
            let (d, b1) = a.overflowing_sub(b);
            let (_, b2) = d.overflowing_sub(borrow as u64);
            borrow = (b1 | b2) as u8;
        }
        Choice::from(borrow)
    }

    /// Adds `rhs` masked by `choice` without branching on the choice bit.
    pub(crate) fn conditional_add_assign(&mut self, rhs: &BigUint, choice: Choice) {
        let mask = u64::conditional_select(&0, &u64::MAX, choice);
        let len = core::cmp::max(self.limbs.len(), rhs.limbs.len());
        self.limbs.resize(len + 1, 0);
        let mut carry = 0u64;
        for i in 0..len {
            let b = rhs.limbs.get(i).copied().unwrap_or(0) & mask;
            let s = self.limbs[i] as u128 + b as u128 + carry as u128;
            self.limbs[i] = s as u64;
            carry = (s >> 64) as u64;
        }
        self.limbs[len] = carry;
        self.trim();
    }
}

/// Magnitude-and-sign pair for the extended-Euclid cofactor bookkeeping.
struct Signed {
    mag: BigUint,
    neg: bool,
}

impl Signed {
    /// `self - q * x`
    fn sub_mul(&self, q: &BigUint, x: &Signed) -> Signed {
        let mag = q * &x.mag;
        if self.neg == x.neg {
            if self.mag >= mag {
                Signed {
                    mag: &self.mag - &mag,
                    neg: self.neg,
                }
            } else {
                Signed {
                    mag: &mag - &self.mag,
                    neg: !self.neg,
                }
            }
        } else {
            Signed {
                mag: &self.mag + &mag,
                neg: self.neg,
            }
        }
    }
}

impl Ord for BigUint {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.limbs.len().cmp(&other.limbs.len()) {
            Ordering::Equal => {
                for i in (0..self.limbs.len()).rev() {
                    match self.limbs[i].cmp(&other.limbs[i]) {
                        Ordering::Equal => continue,
                        ord => return ord,
                    }
                }
                Ordering::Equal
            }
            ord => ord,
        }
    }
}

impl PartialOrd for BigUint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Add<&BigUint> for &BigUint {
    type Output = BigUint;

    fn add(self, rhs: &BigUint) -> BigUint {
        let len = core::cmp::max(self.limbs.len(), rhs.limbs.len());
        let mut out = Vec::with_capacity(len + 1);
        let mut carry = 0u64;
        for i in 0..len {
            let a = self.limbs.get(i).copied().unwrap_or(0);
            let b = rhs.limbs.get(i).copied().unwrap_or(0);
            let (s1, c1) = a.overflowing_add(b);
            let (s2, c2) = s1.overflowing_add(carry);
            out.push(s2);
            carry = c1 as u64 + c2 as u64;
        }
        if carry != 0 {
            out.push(carry);
        }
        BigUint::from_limbs(out)
    }
}

impl Sub<&BigUint> for &BigUint {
    type Output = BigUint;

    fn sub(self, rhs: &BigUint) -> BigUint {
        assert!(self >= rhs, "subtraction underflow");
        let mut out = self.limbs.clone();
        let mut borrow = 0u64;
        for i in 0..out.len() {
            let b = rhs.limbs.get(i).copied().unwrap_or(0);
            let (d1, b1) = out[i].overflowing_sub(b);
            let (d2, b2) = d1.overflowing_sub(borrow);
            out[i] = d2;
            borrow = b1 as u64 + b2 as u64;
        }
        BigUint::from_limbs(out)
    }
}

impl Mul<&BigUint> for &BigUint {
    type Output = BigUint;

    fn mul(self, rhs: &BigUint) -> BigUint {
        if self.is_zero() || rhs.is_zero() {
            return BigUint::zero();
        }
        let mut acc = alloc::vec![0u64; self.limbs.len() + rhs.limbs.len()];
        for (i, &a) in self.limbs.iter().enumerate() {
            let mut carry = 0u128;
            for (j, &b) in rhs.limbs.iter().enumerate() {
                let t = acc[i + j] as u128 + a as u128 * b as u128 + carry;
                acc[i + j] = t as u64;
                carry = t >> 64;
            }
            acc[i + rhs.limbs.len()] = carry as u64;
        }
        BigUint::from_limbs(acc)
    }
}

impl Div<&BigUint> for &BigUint {
    type Output = BigUint;

    fn div(self, rhs: &BigUint) -> BigUint {
        self.div_rem(rhs).0
    }
}

impl Rem<&BigUint> for &BigUint {
    type Output = BigUint;

    fn rem(self, rhs: &BigUint) -> BigUint {
        self.div_rem(rhs).1
    }
}

impl Shl<usize> for &BigUint {
    type Output = BigUint;

    fn shl(self, n: usize) -> BigUint {
        if self.is_zero() {
            return BigUint::zero();
        }
        let limb_shift = n / 64;
        let bit_shift = n % 64;
        let mut out = alloc::vec![0u64; self.limbs.len() + limb_shift + 1];
        if bit_shift == 0 {
            out[limb_shift..limb_shift + self.limbs.len()].copy_from_slice(&self.limbs);
        } else {
            let mut carry = 0u64;
            for (i, &limb) in self.limbs.iter().enumerate() {
                out[i + limb_shift] = (limb << bit_shift) | carry;
                carry = limb >> (64 - bit_shift);
            }
            out[self.limbs.len() + limb_shift] = carry;
        }
        BigUint::from_limbs(out)
    }
}

impl Shr<usize> for &BigUint {
    type Output = BigUint;

    fn shr(self, n: usize) -> BigUint {
        let limb_shift = n / 64;
        let bit_shift = n % 64;
        if limb_shift >= self.limbs.len() {
            return BigUint::zero();
        }
        let len = self.limbs.len() - limb_shift;
        let mut out = alloc::vec![0u64; len];
        if bit_shift == 0 {
            out.copy_from_slice(&self.limbs[limb_shift..]);
        } else {
            let mut carry = 0u64;
            for i in (0..len).rev() {
                let limb = self.limbs[i + limb_shift];
                out[i] = (limb >> bit_shift) | carry;
                carry = limb << (64 - bit_shift);
            }
        }
        BigUint::from_limbs(out)
    }
}

macro_rules! forward_owned_binop {
    ($($t:ident, $f:ident;)+) => {$(
        impl $t<BigUint> for BigUint {
            type Output = BigUint;

            fn $f(self, rhs: BigUint) -> BigUint {
                $t::$f(&self, &rhs)
            }
        }
    )+};
}

forward_owned_binop! {
    Add, add;
    Sub, sub;
    Mul, mul;
    Div, div;
    Rem, rem;
}

impl core::fmt::LowerHex for BigUint {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut iter = self.limbs.iter().rev();
        match iter.next() {
            Some(hi) => write!(f, "{:x}", hi)?,
            None => return write!(f, "0"),
        }
        for limb in iter {
            write!(f, "{:016x}", limb)?;
        }
        Ok(())
    }
}

impl core::fmt::UpperHex for BigUint {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut iter = self.limbs.iter().rev();
        match iter.next() {
            Some(hi) => write!(f, "{:X}", hi)?,
            None => return write!(f, "0"),
        }
        for limb in iter {
            write!(f, "{:016X}", limb)?;
        }
        Ok(())
    }
}

impl Zeroize for BigUint {
    fn zeroize(&mut self) {
        self.limbs.zeroize();
    }
}
