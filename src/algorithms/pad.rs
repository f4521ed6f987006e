//! Conversion between integers and fixed-width big-endian blocks.

use alloc::vec::Vec;

use zeroize::Zeroizing;

use crate::bigint::BigUint;
use crate::errors::{Error, Result};

/// Returns a new vector of the given length, with 0s left padded.
#[inline]
fn left_pad(input: &[u8], padded_len: usize) -> Result<Vec<u8>> {
    if input.len() > padded_len {
        return Err(Error::Internal);
    }

    let mut out = alloc::vec![0u8; padded_len];
    out[padded_len - input.len()..].copy_from_slice(input);
    Ok(out)
}

/// Serializes `input` big-endian, left-padded with zeros to exactly
/// `padded_len` bytes.
#[inline]
pub(crate) fn uint_to_be_pad(input: BigUint, padded_len: usize) -> Result<Vec<u8>> {
    left_pad(&input.to_bytes_be(), padded_len)
}

/// As [`uint_to_be_pad`], for values that must not outlive their use.
#[inline]
pub(crate) fn uint_to_zeroizing_be_pad(
    input: BigUint,
    padded_len: usize,
) -> Result<Zeroizing<Vec<u8>>> {
    let input = Zeroizing::new(input);
    let bytes = Zeroizing::new(input.to_bytes_be());
    left_pad(&bytes, padded_len).map(Zeroizing::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_left_pad() {
        const INPUT_LEN: usize = 3;
        let input = alloc::vec![0u8; INPUT_LEN];

        // input len < padded len
        let padded = left_pad(&input, INPUT_LEN + 1).unwrap();
        assert_eq!(padded.len(), INPUT_LEN + 1);

        // input len == padded len
        let padded = left_pad(&input, INPUT_LEN).unwrap();
        assert_eq!(padded.len(), INPUT_LEN);

        // input len > padded len
        let padded = left_pad(&input, INPUT_LEN - 1);
        assert!(padded.is_err());
    }

    #[test]
    fn pads_to_block_width() {
        let v = BigUint::from_u64(0x0102);
        assert_eq!(uint_to_be_pad(v, 4).unwrap(), [0, 0, 1, 2]);
        assert_eq!(uint_to_be_pad(BigUint::zero(), 3).unwrap(), [0, 0, 0]);
    }
}
