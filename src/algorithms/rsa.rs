//! The raw RSA permutation, in both directions.

use crate::bigint::BigUint;
use crate::errors::{Error, Result};
use crate::key::{PrivateForm, PublicKeyParts, RsaPrivateKey};

/// Raw RSA encryption of m with the public key. No padding is performed.
#[inline]
pub(crate) fn rsa_encrypt<K: PublicKeyParts>(key: &K, m: &BigUint) -> BigUint {
    m.modpow_u64(u64::from(key.e()), key.n())
}

/// Performs raw RSA decryption with no padding, resulting in a plaintext
/// integer below the modulus.
///
/// With CRT material the two half-sized exponentiations are recombined by
/// Garner's formula; the lift of `x_p` above `x_q` is a masked add so that no
/// branch depends on the message. Without CRT material this is a single full
/// exponentiation by `d`.
#[inline]
pub(crate) fn rsa_decrypt(priv_key: &RsaPrivateKey, c: &BigUint) -> Result<BigUint> {
    if c >= priv_key.n() {
        return Err(Error::Decryption);
    }

    let m = match priv_key.form() {
        PrivateForm::Exponent => c.modpow(priv_key.d(), priv_key.n()),
        PrivateForm::Crt {
            p,
            q,
            dmp1,
            dmq1,
            iqmp,
        } => {
            let mut xp = (c % p).modpow(dmp1, p);
            let xq = (c % q).modpow(dmq1, q);

            // xp += p * [xp < xq]
            let lift = xp.ct_lt(&xq);
            xp.conditional_add_assign(p, lift);

            // m = ((xp - xq) * iqmp mod p) * q + xq
            let h = &(&(&xp - &xq) * iqmp) % p;
            &(&h * q) + &xq
        }
    };

    Ok(m)
}

/// Performs RSA decryption and re-encrypts the result to detect CRT faults;
/// a mismatch against the input is reported as [`Error::Internal`].
#[inline]
pub(crate) fn rsa_decrypt_and_check(priv_key: &RsaPrivateKey, c: &BigUint) -> Result<BigUint> {
    let m = rsa_decrypt(priv_key, c)?;

    // In order to defend against errors in the CRT computation, m^e is
    // calculated, which should match the original input.
    let check = rsa_encrypt(priv_key, &m);

    if c != &check {
        return Err(Error::Internal);
    }

    Ok(m)
}
