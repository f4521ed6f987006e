use pubkey::{Error, PaddingScheme, PublicKeyParts, RsaPrivateKey, RsaPublicKey};
use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;

// 512-bit test fixture with full CRT material
const N: &str = "c22011f082f1fd365e7e824e6487e6268ee7a9766c0de78efcacae83ec0266b4495af737a3086bd1e958569c9a79dae98716494ff3d95b402d52433f40c8cd85";
const E: &str = "10001";
const D: &str = "b13944077614645e19809787e801a59cf80408d2e32d0284a8ab219bb08034afb555327ec5e003be18274ff8a1868fab4d0f06def9ea18c7b6fff13c5fa0ce35";
const P: &str = "eb2bef5773197a6ffad901436f0e29e9a924ba7b532aadb46436466bc5b83347";
const Q: &str = "d3517ceedb7d4f7207533709c23d8a520961361d990c7d789e2c81b8c3d626d3";
const DMP1: &str = "34823dd18fd08b86ff427ec6b8c037d9853bbf2b94193e69bdca6494e1b3cc37";
const DMQ1: &str = "337bf40341c88af58e215114789583c0aef65737e8d4e930dce09d0e45f043ef";
const IQMP: &str = "5e9e49189f5bab25e63ed7190742e6d40fedd75fda7e6d482359e4f34899a5d9";

fn crt_key() -> RsaPrivateKey {
    RsaPrivateKey::from_hex_crt(N, E, D, P, Q, DMP1, DMQ1, IQMP).unwrap()
}

fn plain_key() -> RsaPrivateKey {
    RsaPrivateKey::from_hex(N, E, D).unwrap()
}

fn public_key() -> RsaPublicKey {
    RsaPublicKey::from_hex(N, E).unwrap()
}

#[test]
fn fixture_key_is_valid() {
    let key = crt_key();
    key.validate().unwrap();
    assert_eq!(key.size(), 64);
    assert_eq!(key.to_public_key(), public_key());
}

#[test]
fn encrypt_decrypt_roundtrip() {
    let mut rng = ChaCha8Rng::from_seed([42; 32]);
    let key = crt_key();

    let ciphertext = key
        .encrypt(&mut rng, PaddingScheme::new_pkcs1v15(), b"hi")
        .unwrap();
    assert_eq!(ciphertext.len(), 64);
    assert_ne!(&ciphertext[..2], b"hi");

    let plaintext = key
        .decrypt(PaddingScheme::new_pkcs1v15(), &ciphertext)
        .unwrap();
    assert_eq!(plaintext, b"hi");
}

#[test]
fn crt_and_plain_keys_agree() {
    let mut rng = ChaCha8Rng::from_seed([43; 32]);
    let ciphertext = public_key()
        .encrypt(&mut rng, PaddingScheme::new_pkcs1v15(), b"both paths")
        .unwrap();

    let via_crt = crt_key()
        .decrypt(PaddingScheme::new_pkcs1v15(), &ciphertext)
        .unwrap();
    let via_exponent = plain_key()
        .decrypt(PaddingScheme::new_pkcs1v15(), &ciphertext)
        .unwrap();
    assert_eq!(via_crt, b"both paths");
    assert_eq!(via_exponent, b"both paths");
}

#[test]
fn message_length_boundaries() {
    let mut rng = ChaCha8Rng::from_seed([44; 32]);
    let key = crt_key();
    let k = key.size();

    // a message of exactly k - 11 bytes fits one block
    let fitting = vec![0xABu8; k - 11];
    let ct = key
        .encrypt(&mut rng, PaddingScheme::new_pkcs1v15(), &fitting)
        .unwrap();
    assert_eq!(ct.len(), k);
    assert_eq!(
        key.decrypt(PaddingScheme::new_pkcs1v15(), &ct).unwrap(),
        fitting
    );

    // one more byte spills into a second block
    let spilling = vec![0xABu8; k - 10];
    let ct = key
        .encrypt(&mut rng, PaddingScheme::new_pkcs1v15(), &spilling)
        .unwrap();
    assert_eq!(ct.len(), 2 * k);
    assert_eq!(
        key.decrypt(PaddingScheme::new_pkcs1v15(), &ct).unwrap(),
        spilling
    );

    // the empty message still produces one block of padding
    let ct = key
        .encrypt(&mut rng, PaddingScheme::new_pkcs1v15(), b"")
        .unwrap();
    assert_eq!(ct.len(), k);
    assert_eq!(
        key.decrypt(PaddingScheme::new_pkcs1v15(), &ct).unwrap(),
        b""
    );
}

#[test]
fn decrypt_rejects_partial_blocks() {
    let mut rng = ChaCha8Rng::from_seed([45; 32]);
    let key = crt_key();
    let ct = key
        .encrypt(&mut rng, PaddingScheme::new_pkcs1v15(), b"hi")
        .unwrap();

    assert_eq!(
        key.decrypt(PaddingScheme::new_pkcs1v15(), &ct[..63]),
        Err(Error::InvalidInputLength)
    );
    assert_eq!(
        key.decrypt(PaddingScheme::new_pkcs1v15(), b""),
        Err(Error::InvalidInputLength)
    );
}

#[test]
fn decrypt_rejects_garbage_blocks() {
    let key = crt_key();
    // an all-zero block decrypts to zero, which cannot carry valid padding
    assert_eq!(
        key.decrypt(PaddingScheme::new_pkcs1v15(), &[0u8; 64]),
        Err(Error::Decryption)
    );
    // a block at the modulus value is out of range
    assert_eq!(
        key.decrypt(PaddingScheme::new_pkcs1v15(), &[0xFFu8; 64]),
        Err(Error::Decryption)
    );
}

#[test]
fn sign_verify_roundtrip() {
    let mut rng = ChaCha8Rng::from_seed([46; 32]);
    let key = crt_key();

    let sig = key
        .sign(&mut rng, PaddingScheme::new_pkcs1v15(), b"hi")
        .unwrap();
    assert_eq!(sig.len(), 64);

    let recovered = public_key()
        .verify(PaddingScheme::new_pkcs1v15(), &sig, None)
        .unwrap();
    assert_eq!(recovered, b"hi");
}

#[test]
fn signing_is_deterministic() {
    let mut rng = ChaCha8Rng::from_seed([47; 32]);
    let key = crt_key();
    let a = key
        .sign(&mut rng, PaddingScheme::new_pkcs1v15(), b"same input")
        .unwrap();
    let b = key
        .sign(&mut rng, PaddingScheme::new_pkcs1v15(), b"same input")
        .unwrap();
    assert_eq!(a, b);
}

#[test]
fn tampered_signature_is_rejected() {
    let mut rng = ChaCha8Rng::from_seed([48; 32]);
    let key = crt_key();
    let mut sig = key
        .sign(&mut rng, PaddingScheme::new_pkcs1v15(), b"hi")
        .unwrap();
    sig[20] ^= 0x01;
    assert_eq!(
        public_key().verify(PaddingScheme::new_pkcs1v15(), &sig, None),
        Err(Error::Verification)
    );
}

#[test]
fn multi_block_signature_roundtrip() {
    let mut rng = ChaCha8Rng::from_seed([49; 32]);
    let key = crt_key();
    let msg = vec![0x37u8; 120];

    let sig = key
        .sign(&mut rng, PaddingScheme::new_pkcs1v15(), &msg)
        .unwrap();
    assert_eq!(sig.len(), 3 * 64);
    assert_eq!(
        public_key()
            .verify(PaddingScheme::new_pkcs1v15(), &sig, None)
            .unwrap(),
        msg
    );
}

#[test]
fn signing_requires_private_material() {
    let mut rng = ChaCha8Rng::from_seed([50; 32]);
    let key = crt_key();
    let ct = key
        .encrypt(&mut rng, PaddingScheme::new_oaep::<sha1::Sha1>(), b"x")
        .unwrap();
    // scheme mismatch on the private ops is rejected up front
    assert_eq!(
        key.sign(&mut rng, PaddingScheme::new_oaep::<sha1::Sha1>(), b"x"),
        Err(Error::InvalidPaddingScheme)
    );
    assert_eq!(
        key.decrypt(PaddingScheme::new_pss::<sha1::Sha1>(), &ct),
        Err(Error::InvalidPaddingScheme)
    );
}
