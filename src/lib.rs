//! The cryptographic core of a small public-key library: textbook RSA with
//! PKCS#1 v1.5, OAEP and PSS padding, and X25519 key agreement over
//! Curve25519.
//!
//! RSA keys are created by hex parsing ([`RsaPrivateKey::from_hex_crt`]) or
//! generation ([`RsaPrivateKey::generate`]) and drive four block-oriented
//! operations — encrypt, decrypt, sign, verify — through a pluggable
//! [`PaddingScheme`]. X25519 is an independent pair of functions over
//! 32-byte strings.
//!
//! # Example
//!
//! ```
//! use pubkey::{PaddingScheme, RsaPrivateKey};
//! use rand_chacha::ChaCha8Rng;
//! use rand_core::SeedableRng;
//! use sha1::Sha1;
//!
//! let mut rng = ChaCha8Rng::from_seed([7; 32]); // use an OS rng outside of tests
//! let key = RsaPrivateKey::generate(&mut rng, 512, "10001").unwrap();
//!
//! let ciphertext = key
//!     .encrypt(&mut rng, PaddingScheme::new_oaep::<Sha1>(), b"hello")
//!     .unwrap();
//! let plaintext = key
//!     .decrypt(PaddingScheme::new_oaep::<Sha1>(), &ciphertext)
//!     .unwrap();
//! assert_eq!(plaintext, b"hello");
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

extern crate alloc;

pub mod errors;
pub mod x25519;

mod algorithms;
mod bigint;
mod key;
mod padding;

pub use crate::bigint::BigUint;
pub use crate::errors::{Error, Result};
pub use crate::key::{check_public, PublicKeyParts, RsaPrivateKey, RsaPublicKey};
pub use crate::padding::PaddingScheme;
