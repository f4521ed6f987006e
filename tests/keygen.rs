use pubkey::{BigUint, PaddingScheme, PublicKeyParts, RsaPrivateKey};
use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;
use sha1::Sha1;

#[test]
fn generated_key_is_internally_consistent() {
    let mut rng = ChaCha8Rng::from_seed([61; 32]);
    let key = RsaPrivateKey::generate(&mut rng, 512, "10001").unwrap();
    key.validate().unwrap();

    assert_eq!(key.e(), 65537);

    let (p, q) = key.primes().expect("generated keys carry CRT material");
    assert!(p > q);
    assert!(p.is_probable_prime(10));
    assert!(q.is_probable_prime(10));
    assert_eq!(&(p * q), key.n());

    // e * d = 1 mod (p-1)(q-1)
    let one = BigUint::one();
    let phi = &(p - &one) * &(q - &one);
    let e = BigUint::from_u64(65537);
    assert_eq!(&(&e * key.d()) % &phi, one);
}

#[test]
fn generated_key_encrypts_and_decrypts() {
    let mut rng = ChaCha8Rng::from_seed([62; 32]);
    let key = RsaPrivateKey::generate(&mut rng, 512, "10001").unwrap();

    let ciphertext = key
        .encrypt(&mut rng, PaddingScheme::new_oaep::<Sha1>(), b"hello")
        .unwrap();
    assert_eq!(ciphertext.len(), key.size());

    let plaintext = key
        .decrypt(PaddingScheme::new_oaep::<Sha1>(), &ciphertext)
        .unwrap();
    assert_eq!(plaintext, b"hello");
}

#[test]
fn generated_key_signs_and_verifies() {
    let mut rng = ChaCha8Rng::from_seed([63; 32]);
    let key = RsaPrivateKey::generate(&mut rng, 512, "10001").unwrap();

    let sig = key
        .sign(&mut rng, PaddingScheme::new_pss::<Sha1>(), b"generated")
        .unwrap();
    key.to_public_key()
        .verify(PaddingScheme::new_pss::<Sha1>(), &sig, Some(b"generated"))
        .unwrap();
}

#[test]
fn generation_honours_the_exponent() {
    let mut rng = ChaCha8Rng::from_seed([64; 32]);
    let key = RsaPrivateKey::generate(&mut rng, 256, "3").unwrap();
    key.validate().unwrap();
    assert_eq!(key.e(), 3);

    let ciphertext = key
        .encrypt(&mut rng, PaddingScheme::new_pkcs1v15(), b"e3")
        .unwrap();
    assert_eq!(
        key.decrypt(PaddingScheme::new_pkcs1v15(), &ciphertext)
            .unwrap(),
        b"e3"
    );
}

#[test]
fn oversized_exponents_are_rejected() {
    let mut rng = ChaCha8Rng::from_seed([65; 32]);
    assert!(RsaPrivateKey::generate(&mut rng, 128, "80000000").is_err());
    assert!(RsaPrivateKey::generate(&mut rng, 128, "1").is_err());
}
