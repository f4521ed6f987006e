//! PKCS#1 v1.5 block formatting as described in [RFC8017 § 7.2 and § 9.2].
//!
//! [RFC8017 § 7.2 and § 9.2]: https://datatracker.ietf.org/doc/html/rfc8017

use alloc::vec::Vec;

use rand_core::CryptoRngCore;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, ConstantTimeLess};
use zeroize::Zeroizing;

use crate::errors::{Error, Result};

/// Shortest legal filler between the block header and the separator.
const MIN_FILLER: usize = 8;

/// Fills `out` with random bytes, redrawing any position that comes up zero
/// so the filler never contains a premature separator.
#[inline]
fn fill_nonzero<R: CryptoRngCore + ?Sized>(rng: &mut R, out: &mut [u8]) {
    rng.fill_bytes(out);

    for byte in out {
        while *byte == 0 {
            rng.fill_bytes(core::slice::from_mut(byte));
        }
    }
}

/// Applies the type-2 (encryption) padding scheme from PKCS#1 v1.5. The
/// message must be no longer than the block size minus 11 bytes.
pub(crate) fn pkcs1v15_encrypt_pad<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    msg: &[u8],
    k: usize,
) -> Result<Zeroizing<Vec<u8>>> {
    if msg.len() + MIN_FILLER + 3 > k {
        return Err(Error::MessageTooLong);
    }

    // EM = 0x00 || 0x02 || PS || 0x00 || M
    let mut em = Zeroizing::new(alloc::vec![0u8; k]);
    em[1] = 2;
    fill_nonzero(rng, &mut em[2..k - msg.len() - 1]);
    em[k - msg.len() - 1] = 0;
    em[k - msg.len()..].copy_from_slice(msg);
    Ok(em)
}

/// Removes the type-2 padding scheme from PKCS#1 v1.5.
///
/// The outcome of this call is itself secret: an attacker who can
/// distinguish failures from successes over many ciphertexts can mount a
/// padding-oracle attack. Callers that face such an attacker must substitute
/// a synthetic plaintext on failure rather than reporting the error.
#[inline]
pub(crate) fn pkcs1v15_encrypt_unpad(em: &[u8], k: usize) -> Result<Vec<u8>> {
    if k < MIN_FILLER + 3 {
        return Err(Error::Decryption);
    }

    let (valid, start) = parse_type2_block(em);
    if !bool::from(valid) {
        return Err(Error::Decryption);
    }

    Ok(em[start as usize..].to_vec())
}

/// Locates the message inside a type-2 block with a single fixed-shape pass.
///
/// Returns the validity flag and the offset of the first message byte; the
/// offset is forced to zero for invalid blocks. Nothing here branches or
/// indexes on the block's contents.
#[inline]
fn parse_type2_block(em: &[u8]) -> (Choice, u32) {
    let header_ok = em[0].ct_eq(&0) & em[1].ct_eq(&2);

    // Latch the position of the first zero byte of the body. `in_filler`
    // drops to 0 once the separator has been seen and keeps `separator`
    // frozen from then on.
    let mut in_filler = Choice::from(1u8);
    let mut separator = 0u32;
    for (pos, byte) in em.iter().enumerate().skip(2) {
        let is_zero = byte.ct_eq(&0);
        separator.conditional_assign(&(pos as u32), in_filler & is_zero);
        in_filler &= !is_zero;
    }
    let separator_found = !in_filler;

    // a separator before offset 10 means fewer than eight filler bytes
    let filler_ok = !separator.ct_lt(&(2 + MIN_FILLER as u32));

    let valid = header_ok & separator_found & filler_ok;
    let start = u32::conditional_select(&0, &(separator + 1), valid);
    (valid, start)
}

/// Applies the type-1 (signature) padding scheme from PKCS#1 v1.5: a block of
/// 0xFF filler between the header and the trailing message.
#[inline]
pub(crate) fn pkcs1v15_sign_pad(msg: &[u8], k: usize) -> Result<Vec<u8>> {
    if msg.len() + MIN_FILLER + 3 > k {
        return Err(Error::MessageTooLong);
    }

    // EM = 0x00 || 0x01 || PS || 0x00 || M
    let mut em = alloc::vec![0xff; k];
    em[0] = 0;
    em[1] = 1;
    em[k - msg.len() - 1] = 0;
    em[k - msg.len()..].copy_from_slice(msg);

    Ok(em)
}

/// Removes the type-1 padding and recovers the signed bytes. The block is
/// public data recovered with the public exponent, so a variable-time scan
/// leaks nothing useful.
#[inline]
pub(crate) fn pkcs1v15_sign_unpad(em: &[u8], k: usize) -> Result<Vec<u8>> {
    if k < MIN_FILLER + 3 || em.len() != k {
        return Err(Error::Verification);
    }
    if em[0] != 0 || em[1] != 1 {
        return Err(Error::Verification);
    }

    let mut i = 2;
    while i < em.len() && em[i] == 0xff {
        i += 1;
    }
    if i < 2 + MIN_FILLER || i == em.len() || em[i] != 0 {
        return Err(Error::Verification);
    }

    Ok(em[i + 1..].to_vec())
}
