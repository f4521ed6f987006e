//! Support for the [Probabilistic Signature Scheme] (PSS) a.k.a. RSASSA-PSS.
//!
//! Designed by Mihir Bellare and Phillip Rogaway. Specified in [RFC8017 § 8.1].
//!
//! [Probabilistic Signature Scheme]: https://en.wikipedia.org/wiki/Probabilistic_signature_scheme
//! [RFC8017 § 8.1]: https://datatracker.ietf.org/doc/html/rfc8017#section-8.1

use alloc::boxed::Box;
use alloc::vec::Vec;

use digest::DynDigest;
use subtle::ConstantTimeEq;

use super::mgf::mgf1_xor;
use crate::errors::{Error, Result};

/// Builds the PSS encoding `maskedDB || H || 0xBC` for a modulus of
/// `em_bits` significant bits.
///
/// `H` hashes `00 x8 || m_hash || salt`; the data block `00..00 || 0x01 ||
/// salt` is masked with MGF1(H), and the spare high bits of the leading
/// octet are cleared so the encoding stays below the modulus.
pub(crate) fn pss_encode(
    m_hash: &[u8],
    em_bits: usize,
    salt: &[u8],
    hash: &mut dyn DynDigest,
) -> Result<Vec<u8>> {
    let h_len = hash.output_size();
    let s_len = salt.len();
    let em_len = (em_bits + 7) / 8;

    // the data block must hold the salt plus its 0x01 marker
    let db_len = em_len
        .checked_sub(h_len + 1)
        .ok_or(Error::Internal)?;
    if db_len < s_len + 1 {
        return Err(Error::Internal);
    }

    let h = message_digest(m_hash, salt, hash);

    let mut em = alloc::vec![0u8; em_len];
    em[db_len - s_len - 1] = 0x01;
    em[db_len - s_len..db_len].copy_from_slice(salt);

    let (db, tail) = em.split_at_mut(db_len);
    mgf1_xor(db, hash, &h);
    db[0] &= spare_bit_mask(em_len, em_bits);
    tail[..h_len].copy_from_slice(&h);
    tail[h_len] = 0xBC;

    Ok(em)
}

/// Checks a PSS encoding against `m_hash` for a fixed salt length.
///
/// `em` is the full modulus-width block; any leading bytes beyond the
/// encoding width must be zero padding from the RSA layer. The trailer and
/// spare-bit checks gate early (they describe public layout, not message
/// data); the data-block filler and the final hash comparison are folded
/// into one verdict without early exit.
pub(crate) fn pss_verify(
    m_hash: &[u8],
    em: &mut [u8],
    s_len: usize,
    hash: &mut dyn DynDigest,
    key_bits: usize,
) -> Result<()> {
    let h_len = hash.output_size();
    let em_bits = key_bits - 1;
    let em_len = (em_bits + 7) / 8;
    let em_total_len = em.len();
    let em = &mut em[em_total_len - em_len..];

    let db_len = em_len
        .checked_sub(h_len + 1)
        .ok_or(Error::Verification)?;
    if db_len < s_len + 1 {
        return Err(Error::Verification);
    }
    if em[em_len - 1] != 0xBC {
        return Err(Error::Verification);
    }
    let mask = spare_bit_mask(em_len, em_bits);
    if em[0] & !mask != 0 {
        return Err(Error::Verification);
    }

    let (db, tail) = em.split_at_mut(db_len);
    let h = &tail[..h_len];
    mgf1_xor(db, hash, h);
    db[0] &= mask;

    // the unmasked block must read 00..00 || 0x01 || salt
    let marker = db_len - s_len - 1;
    let mut filler_ok = db[marker].ct_eq(&0x01);
    for byte in &db[..marker] {
        filler_ok &= byte.ct_eq(&0);
    }

    let expected = message_digest(m_hash, &db[marker + 1..], hash);

    if bool::from(filler_ok & expected.ct_eq(h)) {
        Ok(())
    } else {
        Err(Error::Verification)
    }
}

/// `H = Hash(00 x8 || m_hash || salt)`, the salted digest both sides agree
/// on. The eight zero octets are RFC 8017's fixed prefix.
fn message_digest(m_hash: &[u8], salt: &[u8], hash: &mut dyn DynDigest) -> Box<[u8]> {
    hash.update(&[0u8; 8]);
    hash.update(m_hash);
    hash.update(salt);
    hash.finalize_reset()
}

/// Keep-mask for the leading octet: the top `8 * em_len - em_bits` bits of
/// the encoding are outside the modulus width and must stay zero.
fn spare_bit_mask(em_len: usize, em_bits: usize) -> u8 {
    0xFF >> (8 * em_len - em_bits)
}
