//! Available padding schemes.

use alloc::boxed::Box;
use core::fmt;

use digest::{Digest, DynDigest};

/// Padding scheme driving the four key operations.
///
/// OAEP and PSS take their hash as a capability object; the MGF1 mask inside
/// both is built on the same digest.
pub enum PaddingScheme {
    /// PKCS#1 v1.5: type-2 blocks for encryption, type-1 for signatures.
    Pkcs1v15,

    /// OAEP with an empty label.
    Oaep {
        digest: Box<dyn DynDigest + Send + Sync>,
    },

    /// PSS. A `salt_len` of `None` uses the digest output size.
    Pss {
        digest: Box<dyn DynDigest + Send + Sync>,
        salt_len: Option<usize>,
    },
}

impl PaddingScheme {
    pub fn new_pkcs1v15() -> Self {
        PaddingScheme::Pkcs1v15
    }

    pub fn new_oaep<D: 'static + Digest + DynDigest + Send + Sync>() -> Self {
        PaddingScheme::Oaep {
            digest: Box::new(D::new()),
        }
    }

    pub fn new_pss<D: 'static + Digest + DynDigest + Send + Sync>() -> Self {
        PaddingScheme::Pss {
            digest: Box::new(D::new()),
            salt_len: None,
        }
    }

    pub fn new_pss_with_salt_len<D: 'static + Digest + DynDigest + Send + Sync>(
        salt_len: usize,
    ) -> Self {
        PaddingScheme::Pss {
            digest: Box::new(D::new()),
            salt_len: Some(salt_len),
        }
    }
}

impl fmt::Debug for PaddingScheme {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PaddingScheme::Pkcs1v15 => write!(f, "PaddingScheme::Pkcs1v15"),
            PaddingScheme::Oaep { .. } => write!(f, "PaddingScheme::Oaep"),
            PaddingScheme::Pss { salt_len, .. } => {
                write!(f, "PaddingScheme::Pss(salt_len: {:?})", salt_len)
            }
        }
    }
}
