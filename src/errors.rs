//! Error types.

use alloc::string::String;

/// Alias for [`core::result::Result`] with the `pubkey` error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Error types
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The requested operation is not supported by the chosen padding scheme.
    InvalidPaddingScheme,

    /// Ciphertext (or its padding) could not be decoded. Callers must treat
    /// this as "invalid ciphertext", never as a partial plaintext.
    Decryption,

    /// Signature could not be verified against the given message.
    Verification,

    /// The message is too long for the modulus and padding in use.
    MessageTooLong,

    /// A ciphertext or signature is not a whole number of modulus-sized blocks.
    InvalidInputLength,

    /// Prime material failed a consistency check.
    InvalidPrime,

    /// The modulus does not match the product of the key's primes.
    InvalidModulus,

    /// `d` is not the inverse of `e` modulo the key's prime group order.
    InvalidExponent,

    /// The CRT coefficient is not `q^-1 mod p`.
    InvalidCoefficient,

    /// Public exponent below the accepted range.
    PublicExponentTooSmall,

    /// Public exponent at or above `2^31`.
    PublicExponentTooLarge,

    /// Malformed hexadecimal key material.
    ParseError { reason: String },

    /// Internal consistency failure (e.g. a CRT fault detected while signing).
    Internal,
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self {
            Error::InvalidPaddingScheme => write!(f, "invalid padding scheme"),
            Error::Decryption => write!(f, "decryption error"),
            Error::Verification => write!(f, "verification error"),
            Error::MessageTooLong => write!(f, "message too long"),
            Error::InvalidInputLength => write!(f, "input is not a multiple of the block size"),
            Error::InvalidPrime => write!(f, "invalid prime value"),
            Error::InvalidModulus => write!(f, "invalid modulus"),
            Error::InvalidExponent => write!(f, "invalid exponent"),
            Error::InvalidCoefficient => write!(f, "invalid coefficient"),
            Error::PublicExponentTooSmall => write!(f, "public exponent too small"),
            Error::PublicExponentTooLarge => write!(f, "public exponent too large"),
            Error::ParseError { reason } => write!(f, "parse error: {}", reason),
            Error::Internal => write!(f, "internal error"),
        }
    }
}
