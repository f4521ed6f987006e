//! Encryption and Decryption using [OAEP padding](https://datatracker.ietf.org/doc/html/rfc8017#section-7.1).

use alloc::vec::Vec;

use digest::DynDigest;
use rand_core::CryptoRngCore;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroizing;

use super::mgf::mgf1_xor;
use crate::errors::{Error, Result};

/// Encodes the given message with OAEP (empty label). The message must be no
/// longer than the block size minus `2 + 2 * hash_size`.
///
/// `digest` must be in its reset state; it hashes the label and drives both
/// MGF1 masks.
pub(crate) fn oaep_encrypt<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    msg: &[u8],
    digest: &mut dyn DynDigest,
    k: usize,
) -> Result<Zeroizing<Vec<u8>>> {
    let h_len = digest.output_size();
    let capacity = k
        .checked_sub(2 * h_len + 2)
        .ok_or(Error::MessageTooLong)?;
    if msg.len() > capacity {
        return Err(Error::MessageTooLong);
    }

    let label_hash = digest.finalize_reset();

    // EM = 0x00 || maskedSeed || maskedDB, DB = lHash || 00..00 || 0x01 || M
    let mut em = Zeroizing::new(alloc::vec![0u8; k]);
    let (seed, db) = em[1..].split_at_mut(h_len);
    rng.fill_bytes(seed);

    db[..h_len].copy_from_slice(&label_hash);
    let marker = db.len() - msg.len() - 1;
    db[marker] = 0x01;
    db[marker + 1..].copy_from_slice(msg);

    mgf1_xor(db, digest, seed);
    mgf1_xor(seed, digest, db);

    Ok(em)
}

/// Decodes an OAEP block in place.
///
/// As with PKCS#1 v1.5, whether this call succeeds is secret information:
/// exposing per-ciphertext failures to an attacker enables decryption
/// without the key. The unmasked block is therefore vetted with fixed-shape
/// arithmetic and a single combined verdict.
pub(crate) fn oaep_decrypt(em: &mut [u8], digest: &mut dyn DynDigest, k: usize) -> Result<Vec<u8>> {
    let h_len = digest.output_size();

    if k < 2 * h_len + 2 {
        return Err(Error::Decryption);
    }

    let label_hash = digest.finalize_reset();

    let leading_zero = em[0].ct_eq(&0);
    let (seed, db) = em[1..].split_at_mut(h_len);
    mgf1_xor(seed, digest, db);
    mgf1_xor(db, digest, seed);

    let label_ok = db[..h_len].ct_eq(&label_hash);

    // Past the label hash the block must read 00..00 || 0x01 || M. Walk that
    // region once: the first 0x01 latches `past_marker` and records where
    // the message starts, and any other non-zero byte seen while the latch
    // is still clear poisons `pad_clean`.
    let mut past_marker = Choice::from(0u8);
    let mut pad_clean = Choice::from(1u8);
    let mut msg_start = 0u32;
    for (pos, byte) in db[h_len..].iter().enumerate() {
        let is_one = byte.ct_eq(&1);
        msg_start.conditional_assign(&(pos as u32 + 1), is_one & !past_marker);
        past_marker |= is_one;
        pad_clean &= byte.ct_eq(&0) | past_marker;
    }

    let valid = leading_zero & label_ok & past_marker & pad_clean;
    if !bool::from(valid) {
        return Err(Error::Decryption);
    }

    Ok(db[h_len + msg_start as usize..].to_vec())
}
