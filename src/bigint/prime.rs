//! Probabilistic primality testing.

use super::BigUint;

/// Small primes, used both for cheap trial division of candidates and as the
/// fixed Miller-Rabin witness bases. A composite below 97^2 always has a
/// factor in this table, so the Miller-Rabin rounds only ever see inputs the
/// table has already screened.
const SMALL_PRIMES: [u64; 25] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
];

impl BigUint {
    /// Whether the value passes `rounds` rounds of Miller-Rabin (at most one
    /// round per witness in the small-prime table), after trial division.
    ///
    /// The probability that a composite survives is at most 4^-rounds.
    pub fn is_probable_prime(&self, rounds: usize) -> bool {
        if self.is_zero() || self.is_one() {
            return false;
        }
        for &p in SMALL_PRIMES.iter() {
            let p = BigUint::from_u64(p);
            if *self == p {
                return true;
            }
            if (self % &p).is_zero() {
                return false;
            }
        }
        miller_rabin(self, rounds)
    }

    /// Forces the value into an exactly `bits`-wide odd candidate (bit
    /// `bits-1` and bit 0 set), then advances by two until it passes
    /// [`BigUint::is_probable_prime`] with `rounds` rounds.
    pub fn into_probable_prime(mut self, bits: usize, rounds: usize) -> BigUint {
        assert!(bits >= 2, "prime size must be at least 2 bits");
        self.truncate_bits(bits);
        self.set_bit(bits - 1);
        self.set_bit(0);
        let two = BigUint::from_u64(2);
        while !self.is_probable_prime(rounds) {
            self = &self + &two;
        }
        self
    }
}

fn miller_rabin(n: &BigUint, rounds: usize) -> bool {
    let one = BigUint::one();
    let nm1 = n - &one;
    let s = nm1.trailing_zeros();
    let d = &nm1 >> s;

    for &base in SMALL_PRIMES.iter().take(rounds.max(1)) {
        let mut x = BigUint::from_u64(base).modpow(&d, n);
        if x.is_one() || x == nm1 {
            continue;
        }
        let mut witnessed = true;
        for _ in 1..s {
            x = &(&x * &x) % n;
            if x == nm1 {
                witnessed = false;
                break;
            }
        }
        if witnessed {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(s: &str) -> BigUint {
        BigUint::from_hex(s).unwrap()
    }

    #[test]
    fn small_values() {
        assert!(!BigUint::zero().is_probable_prime(10));
        assert!(!BigUint::one().is_probable_prime(10));
        for p in [2u64, 3, 5, 7, 97, 101, 65537] {
            assert!(BigUint::from_u64(p).is_probable_prime(10), "{} is prime", p);
        }
        for c in [4u64, 9, 15, 91, 561, 41041, 825265] {
            // includes Carmichael numbers
            assert!(!BigUint::from_u64(c).is_probable_prime(10), "{} is composite", c);
        }
    }

    #[test]
    fn large_values() {
        // 2^127 - 1 (Mersenne prime) and 2^128 - 159
        assert!(h("7fffffffffffffffffffffffffffffff").is_probable_prime(10));
        assert!(h("ffffffffffffffffffffffffffffff61").is_probable_prime(10));
        assert!(!h("ffffffffffffffffffffffffffffff63").is_probable_prime(10));
        // a semiprime with two 64-bit factors
        let p = h("ffffffffffffffc5"); // 2^64 - 59
        let q = h("ffffffffffffffad"); // 2^64 - 83
        assert!(p.is_probable_prime(10));
        assert!(q.is_probable_prime(10));
        assert!(!(&p * &q).is_probable_prime(10));
    }

    #[test]
    fn prime_forcing() {
        let seed = h("8f3a6c1e9b47d205");
        let p = seed.into_probable_prime(64, 10);
        assert_eq!(p, h("8f3a6c1e9b47d20d"));
        assert_eq!(p.bits(), 64);
        assert!(p.is_odd());
        assert!(p.is_probable_prime(10));

        // already-prime candidates are returned as-is once masked
        let p2 = p.clone().into_probable_prime(64, 10);
        assert_eq!(p, p2);
    }
}
