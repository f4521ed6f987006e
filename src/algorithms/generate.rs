//! Generate prime components for the RSA Private Key

use rand_core::CryptoRngCore;

use crate::bigint::BigUint;

/// Material produced by key generation, prior to assembly into a key object.
pub(crate) struct RsaKeyComponents {
    pub n: BigUint,
    pub d: BigUint,
    pub p: BigUint,
    pub q: BigUint,
    pub dmp1: BigUint,
    pub dmq1: BigUint,
    pub iqmp: BigUint,
}

/// Draws `bits/8` rounded-up random bytes and forces them into a `bits`-wide
/// probable-prime candidate with a single Miller-Rabin round.
pub(crate) fn big_random<R: CryptoRngCore + ?Sized>(rng: &mut R, bits: usize) -> BigUint {
    let mut bytes = alloc::vec![0u8; (bits + 7) / 8];
    rng.fill_bytes(&mut bytes);
    BigUint::from_bytes_be(&bytes).into_probable_prime(bits, 1)
}

/// Samples candidates until one is a probable prime whose predecessor is
/// coprime to the public exponent.
fn gen_prime<R: CryptoRngCore + ?Sized>(rng: &mut R, bits: usize, e: &BigUint) -> BigUint {
    let one = BigUint::one();
    loop {
        let candidate = big_random(rng, bits);
        if (&candidate - &one).gcd(e).is_one() && candidate.is_probable_prime(10) {
            return candidate;
        }
    }
}

/// Generates the component set of a `bits`-wide two-prime RSA key for the
/// public exponent `e`.
///
/// `p` carries the upper half of the bits (rounded up) and is kept larger
/// than `q`; prime pairs whose totient shares a factor with `e` are
/// discarded and resampled.
pub(crate) fn generate_components<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    bits: usize,
    e: u32,
) -> RsaKeyComponents {
    assert!(bits >= 16, "modulus too small");

    let e = BigUint::from_u64(u64::from(e));
    let one = BigUint::one();
    let qs = bits / 2;

    loop {
        let mut p = gen_prime(rng, bits - qs, &e);
        let mut q = gen_prime(rng, qs, &e);
        if p == q {
            continue;
        }
        if p <= q {
            core::mem::swap(&mut p, &mut q);
        }

        let pm1 = &p - &one;
        let qm1 = &q - &one;
        let phi = &pm1 * &qm1;
        if !phi.gcd(&e).is_one() {
            continue;
        }

        let n = &p * &q;
        let d = e.mod_inverse(&phi).expect("e is invertible modulo phi");
        let dmp1 = &d % &pm1;
        let dmq1 = &d % &qm1;
        let iqmp = q.mod_inverse(&p).expect("q is invertible modulo p");

        return RsaKeyComponents {
            n,
            d,
            p,
            q,
            dmp1,
            dmq1,
            iqmp,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::ChaCha8Rng;
    use rand_core::SeedableRng;

    #[test]
    fn big_random_width() {
        let mut rng = ChaCha8Rng::from_seed([9; 32]);
        for bits in [32usize, 64, 100, 128] {
            let v = big_random(&mut rng, bits);
            assert_eq!(v.bits(), bits);
            assert!(v.is_odd());
        }
    }

    #[test]
    fn components_are_consistent() {
        let mut rng = ChaCha8Rng::from_seed([10; 32]);
        let c = generate_components(&mut rng, 128, 65537);
        let one = BigUint::one();

        assert!(c.p > c.q);
        assert_eq!(&c.p * &c.q, c.n);
        assert!(c.p.is_probable_prime(10));
        assert!(c.q.is_probable_prime(10));

        let phi = &(&c.p - &one) * &(&c.q - &one);
        let e = BigUint::from_u64(65537);
        assert_eq!(&(&e * &c.d) % &phi, one);
        assert_eq!(&(&c.q * &c.iqmp) % &c.p, BigUint::one());
    }
}
