//! RSA key types and the four block-oriented key operations.

use alloc::vec::Vec;

use rand_core::CryptoRngCore;
use zeroize::Zeroize;

use crate::algorithms::generate::generate_components;
use crate::algorithms::oaep::{oaep_decrypt, oaep_encrypt};
use crate::algorithms::pad::{uint_to_be_pad, uint_to_zeroizing_be_pad};
use crate::algorithms::pkcs1v15::{
    pkcs1v15_encrypt_pad, pkcs1v15_encrypt_unpad, pkcs1v15_sign_pad, pkcs1v15_sign_unpad,
};
use crate::algorithms::pss::{pss_encode, pss_verify};
use crate::algorithms::rsa::{rsa_decrypt_and_check, rsa_encrypt};
use crate::bigint::BigUint;
use crate::errors::{Error, Result};
use crate::padding::PaddingScheme;

const MIN_PUB_EXPONENT: u32 = 2;
const MAX_PUB_EXPONENT: u32 = (1 << 31) - 1;

/// Generic trait for the public half of a key.
pub trait PublicKeyParts {
    /// Returns the modulus of the key.
    fn n(&self) -> &BigUint;

    /// Returns the public exponent of the key.
    fn e(&self) -> u32;

    /// Returns the modulus size in bytes. Raw signatures and ciphertexts for
    /// or by this public key will have the same size.
    fn size(&self) -> usize {
        (self.n().bits() + 7) / 8
    }
}

/// Represents the public part of an RSA key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    n: BigUint,
    e: u32,
}

/// Represents a whole RSA key, public and private parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPrivateKey {
    public: RsaPublicKey,
    /// Private exponent
    d: BigUint,
    form: PrivateForm,
}

/// The shape of the private material: a bare exponent, or the full
/// complement of CRT values for the two-exponentiation fast path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PrivateForm {
    Exponent,
    Crt {
        /// Larger prime factor of `n`
        p: BigUint,
        /// Smaller prime factor of `n`
        q: BigUint,
        /// `d mod (p-1)`
        dmp1: BigUint,
        /// `d mod (q-1)`
        dmq1: BigUint,
        /// `q^-1 mod p`
        iqmp: BigUint,
    },
}

impl Zeroize for RsaPrivateKey {
    fn zeroize(&mut self) {
        self.d.zeroize();
        if let PrivateForm::Crt {
            p,
            q,
            dmp1,
            dmq1,
            iqmp,
        } = &mut self.form
        {
            p.zeroize();
            q.zeroize();
            dmp1.zeroize();
            dmq1.zeroize();
            iqmp.zeroize();
        }
    }
}

impl Drop for RsaPrivateKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl PublicKeyParts for RsaPublicKey {
    fn n(&self) -> &BigUint {
        &self.n
    }

    fn e(&self) -> u32 {
        self.e
    }
}

impl PublicKeyParts for RsaPrivateKey {
    fn n(&self) -> &BigUint {
        &self.public.n
    }

    fn e(&self) -> u32 {
        self.public.e
    }
}

impl From<RsaPrivateKey> for RsaPublicKey {
    fn from(private_key: RsaPrivateKey) -> Self {
        private_key.to_public_key()
    }
}

impl RsaPublicKey {
    /// Create a new key from its components.
    pub fn new(n: BigUint, e: u32) -> Result<Self> {
        let k = RsaPublicKey { n, e };
        check_public(&k)?;
        Ok(k)
    }

    /// Parse a public key from unsigned big-endian hex strings.
    pub fn from_hex(n_hex: &str, e_hex: &str) -> Result<Self> {
        Self::new(BigUint::from_hex(n_hex)?, parse_exponent(e_hex)?)
    }

    /// Encrypt the given message.
    ///
    /// The message is processed in chunks of the padding scheme's capacity;
    /// each chunk becomes one modulus-sized ciphertext block. An empty
    /// message still produces a single block of pure padding.
    pub fn encrypt<R: CryptoRngCore + ?Sized>(
        &self,
        rng: &mut R,
        mut padding: PaddingScheme,
        msg: &[u8],
    ) -> Result<Vec<u8>> {
        check_public(self)?;
        let k = self.size();
        let max = match &padding {
            PaddingScheme::Pkcs1v15 => k.checked_sub(11),
            PaddingScheme::Oaep { digest } => k.checked_sub(2 * digest.output_size() + 2),
            PaddingScheme::Pss { .. } => return Err(Error::InvalidPaddingScheme),
        }
        .ok_or(Error::MessageTooLong)?;
        if max == 0 && !msg.is_empty() {
            return Err(Error::MessageTooLong);
        }

        let mut out = Vec::new();
        let mut offset = 0;
        loop {
            let take = core::cmp::min(max, msg.len() - offset);
            let chunk = &msg[offset..offset + take];
            let em = match &mut padding {
                PaddingScheme::Pkcs1v15 => pkcs1v15_encrypt_pad(rng, chunk, k)?,
                PaddingScheme::Oaep { digest } => oaep_encrypt(rng, chunk, digest.as_mut(), k)?,
                PaddingScheme::Pss { .. } => unreachable!(),
            };
            let m = BigUint::from_bytes_be(&em);
            out.extend_from_slice(&uint_to_be_pad(rsa_encrypt(self, &m), k)?);
            offset += take;
            if offset >= msg.len() {
                break;
            }
        }
        Ok(out)
    }

    /// Verify a signature, recovering the signed bytes.
    ///
    /// For PKCS#1 v1.5 the recovered message is returned. PSS requires the
    /// original message in `msg` and returns it when the signature checks
    /// out; a failure of any kind is [`Error::Verification`].
    pub fn verify(
        &self,
        mut padding: PaddingScheme,
        sig: &[u8],
        msg: Option<&[u8]>,
    ) -> Result<Vec<u8>> {
        check_public(self)?;
        let k = self.size();
        if sig.is_empty() || sig.len() % k != 0 {
            return Err(Error::InvalidInputLength);
        }

        match &mut padding {
            PaddingScheme::Pkcs1v15 => {
                let mut out = Vec::new();
                for block in sig.chunks(k) {
                    let s = BigUint::from_bytes_be(block);
                    if &s >= self.n() {
                        return Err(Error::Verification);
                    }
                    let em = uint_to_be_pad(rsa_encrypt(self, &s), k)?;
                    out.extend_from_slice(&pkcs1v15_sign_unpad(&em, k)?);
                }
                Ok(out)
            }
            PaddingScheme::Pss { digest, salt_len } => {
                let msg = msg.ok_or(Error::InvalidPaddingScheme)?;
                if sig.len() != k {
                    return Err(Error::InvalidInputLength);
                }
                let s_len = salt_len.unwrap_or_else(|| digest.output_size());
                digest.update(msg);
                let m_hash = digest.finalize_reset();

                let s = BigUint::from_bytes_be(sig);
                if &s >= self.n() {
                    return Err(Error::Verification);
                }
                let mut em = uint_to_be_pad(rsa_encrypt(self, &s), k)?;
                pss_verify(&m_hash, &mut em, s_len, digest.as_mut(), self.n().bits())?;
                Ok(msg.to_vec())
            }
            PaddingScheme::Oaep { .. } => Err(Error::InvalidPaddingScheme),
        }
    }
}

impl RsaPrivateKey {
    /// Generate a new key pair with a `bits`-wide modulus and the public
    /// exponent given in hex, using the passed in `rng`.
    pub fn generate<R: CryptoRngCore + ?Sized>(
        rng: &mut R,
        bits: usize,
        e_hex: &str,
    ) -> Result<RsaPrivateKey> {
        let e = parse_exponent(e_hex)?;
        if e < MIN_PUB_EXPONENT {
            return Err(Error::PublicExponentTooSmall);
        }
        if e & 1 == 0 {
            // an even exponent can never be coprime to the totient
            return Err(Error::InvalidExponent);
        }
        let c = generate_components(rng, bits, e);
        let key = RsaPrivateKey {
            public: RsaPublicKey { n: c.n, e },
            d: c.d,
            form: PrivateForm::Crt {
                p: c.p,
                q: c.q,
                dmp1: c.dmp1,
                dmq1: c.dmq1,
                iqmp: c.iqmp,
            },
        };
        check_public(&key)?;
        Ok(key)
    }

    /// Parse a private key without CRT acceleration from unsigned
    /// big-endian hex strings.
    pub fn from_hex(n_hex: &str, e_hex: &str, d_hex: &str) -> Result<Self> {
        let key = RsaPrivateKey {
            public: RsaPublicKey {
                n: BigUint::from_hex(n_hex)?,
                e: parse_exponent(e_hex)?,
            },
            d: BigUint::from_hex(d_hex)?,
            form: PrivateForm::Exponent,
        };
        check_public(&key)?;
        Ok(key)
    }

    /// Parse a private key with the full complement of CRT values from
    /// unsigned big-endian hex strings.
    #[allow(clippy::too_many_arguments)]
    pub fn from_hex_crt(
        n_hex: &str,
        e_hex: &str,
        d_hex: &str,
        p_hex: &str,
        q_hex: &str,
        dmp1_hex: &str,
        dmq1_hex: &str,
        iqmp_hex: &str,
    ) -> Result<Self> {
        let p = BigUint::from_hex(p_hex)?;
        let q = BigUint::from_hex(q_hex)?;
        if p <= q {
            return Err(Error::InvalidPrime);
        }
        let key = RsaPrivateKey {
            public: RsaPublicKey {
                n: BigUint::from_hex(n_hex)?,
                e: parse_exponent(e_hex)?,
            },
            d: BigUint::from_hex(d_hex)?,
            form: PrivateForm::Crt {
                p,
                q,
                dmp1: BigUint::from_hex(dmp1_hex)?,
                dmq1: BigUint::from_hex(dmq1_hex)?,
                iqmp: BigUint::from_hex(iqmp_hex)?,
            },
        };
        check_public(&key)?;
        Ok(key)
    }

    /// Get the public key from the private key, cloning `n` and `e`.
    pub fn to_public_key(&self) -> RsaPublicKey {
        self.public.clone()
    }

    /// Returns the private exponent of the key.
    pub fn d(&self) -> &BigUint {
        &self.d
    }

    /// Returns the prime factors `(p, q)` when the key carries CRT material.
    pub fn primes(&self) -> Option<(&BigUint, &BigUint)> {
        match &self.form {
            PrivateForm::Exponent => None,
            PrivateForm::Crt { p, q, .. } => Some((p, q)),
        }
    }

    pub(crate) fn form(&self) -> &PrivateForm {
        &self.form
    }

    /// Performs basic sanity checks on the key.
    /// Returns `Ok(())` if everything is good, otherwise an appropriate error.
    pub fn validate(&self) -> Result<()> {
        check_public(self)?;

        let one = BigUint::one();
        let de = &BigUint::from_u64(u64::from(self.e())) * &self.d;

        if let PrivateForm::Crt {
            p,
            q,
            dmp1,
            dmq1,
            iqmp,
        } = &self.form
        {
            if p <= q {
                return Err(Error::InvalidPrime);
            }
            if &(p * q) != self.n() {
                return Err(Error::InvalidModulus);
            }

            // de ≡ 1 mod p-1 and mod q-1 implies that e is coprime to the
            // group order and that d inverts it.
            let pm1 = p - &one;
            let qm1 = q - &one;
            if !(&de % &pm1).is_one() || !(&de % &qm1).is_one() {
                return Err(Error::InvalidExponent);
            }
            if &(&self.d % &pm1) != dmp1 || &(&self.d % &qm1) != dmq1 {
                return Err(Error::InvalidExponent);
            }
            if !(&(q * iqmp) % p).is_one() {
                return Err(Error::InvalidCoefficient);
            }
        }

        Ok(())
    }

    /// Encrypt the given message with the public half of this key.
    pub fn encrypt<R: CryptoRngCore + ?Sized>(
        &self,
        rng: &mut R,
        padding: PaddingScheme,
        msg: &[u8],
    ) -> Result<Vec<u8>> {
        self.public.encrypt(rng, padding, msg)
    }

    /// Verify a signature with the public half of this key.
    pub fn verify(
        &self,
        padding: PaddingScheme,
        sig: &[u8],
        msg: Option<&[u8]>,
    ) -> Result<Vec<u8>> {
        self.public.verify(padding, sig, msg)
    }

    /// Decrypt the given ciphertext, which must be a whole number of
    /// modulus-sized blocks.
    pub fn decrypt(&self, mut padding: PaddingScheme, ciphertext: &[u8]) -> Result<Vec<u8>> {
        let k = self.size();
        if ciphertext.is_empty() || ciphertext.len() % k != 0 {
            return Err(Error::InvalidInputLength);
        }

        let mut out = Vec::new();
        for block in ciphertext.chunks(k) {
            let c = BigUint::from_bytes_be(block);
            let m = rsa_decrypt_and_check(self, &c)?;
            let mut em = uint_to_zeroizing_be_pad(m, k)?;
            let msg = match &mut padding {
                PaddingScheme::Pkcs1v15 => pkcs1v15_encrypt_unpad(&em, k)?,
                PaddingScheme::Oaep { digest } => oaep_decrypt(&mut em, digest.as_mut(), k)?,
                PaddingScheme::Pss { .. } => return Err(Error::InvalidPaddingScheme),
            };
            out.extend_from_slice(&msg);
        }
        Ok(out)
    }

    /// Sign the given message.
    ///
    /// PKCS#1 v1.5 signs the raw bytes in type-1 blocks; PSS hashes the
    /// message and emits a single randomized block, drawing the salt
    /// from `rng`.
    pub fn sign<R: CryptoRngCore + ?Sized>(
        &self,
        rng: &mut R,
        mut padding: PaddingScheme,
        msg: &[u8],
    ) -> Result<Vec<u8>> {
        check_public(self)?;
        let k = self.size();

        match &mut padding {
            PaddingScheme::Pkcs1v15 => {
                let max = k.checked_sub(11).ok_or(Error::MessageTooLong)?;
                if max == 0 && !msg.is_empty() {
                    return Err(Error::MessageTooLong);
                }

                let mut out = Vec::new();
                let mut offset = 0;
                loop {
                    let take = core::cmp::min(max, msg.len() - offset);
                    let em = pkcs1v15_sign_pad(&msg[offset..offset + take], k)?;
                    let m = BigUint::from_bytes_be(&em);
                    out.extend_from_slice(&uint_to_be_pad(rsa_decrypt_and_check(self, &m)?, k)?);
                    offset += take;
                    if offset >= msg.len() {
                        break;
                    }
                }
                Ok(out)
            }
            PaddingScheme::Pss { digest, salt_len } => {
                let s_len = salt_len.unwrap_or_else(|| digest.output_size());
                digest.update(msg);
                let m_hash = digest.finalize_reset();

                let mut salt = alloc::vec![0u8; s_len];
                rng.fill_bytes(&mut salt);

                let em = pss_encode(&m_hash, self.n().bits() - 1, &salt, digest.as_mut())?;
                let m = BigUint::from_bytes_be(&em);
                uint_to_be_pad(rsa_decrypt_and_check(self, &m)?, k)
            }
            PaddingScheme::Oaep { .. } => Err(Error::InvalidPaddingScheme),
        }
    }
}

/// Check that the public key is well formed and has an exponent within
/// acceptable bounds.
#[inline]
pub fn check_public(public_key: &impl PublicKeyParts) -> Result<()> {
    if public_key.n().is_zero() {
        return Err(Error::InvalidModulus);
    }
    if public_key.e() < MIN_PUB_EXPONENT {
        return Err(Error::PublicExponentTooSmall);
    }
    if public_key.e() > MAX_PUB_EXPONENT {
        return Err(Error::PublicExponentTooLarge);
    }
    Ok(())
}

/// Parses the public exponent, which must fit a 31-bit unsigned value.
fn parse_exponent(e_hex: &str) -> Result<u32> {
    let e = BigUint::from_hex(e_hex)?;
    if e.bits() > 31 {
        return Err(Error::PublicExponentTooLarge);
    }
    let mut value = 0u32;
    for byte in e.to_bytes_be() {
        value = (value << 8) | u32::from(byte);
    }
    Ok(value)
}
