use hex_literal::hex;
use pubkey::x25519::{x25519, x25519_base, BASEPOINT_BYTES};
use rand_chacha::ChaCha8Rng;
use rand_core::{RngCore, SeedableRng};

#[test]
fn rfc7748_keypair_vector() {
    // RFC 7748 section 6.1, Alice's keypair
    let secret = hex!("77076d0a7318a57d3c16c17251b26645df4c2f87ebc0992ab177fba51db92c2a");
    let public = hex!("8520f0098930a754748b7ddcb43ef75a0dbf3a0d26381af4eba4a98eaa9b4e6a");
    assert_eq!(x25519_base(&secret), public);
}

#[test]
fn rfc7748_shared_secret_vector() {
    let alice_priv = hex!("77076d0a7318a57d3c16c17251b26645df4c2f87ebc0992ab177fba51db92c2a");
    let bob_priv = hex!("5dab087e624a8a4b79e17f8b83800ee66f3bb1292618b6fd1c2f8b27ff88e0eb");
    let shared = hex!("4a5d9d5ba4ce2de1728e3bf480350f25e07e21c947d19e3376f09b3c1e161742");

    let alice_pub = x25519_base(&alice_priv);
    let bob_pub = x25519_base(&bob_priv);
    assert_eq!(x25519(&alice_priv, &bob_pub), shared);
    assert_eq!(x25519(&bob_priv, &alice_pub), shared);
}

#[test]
fn key_agreement_is_symmetric() {
    let mut rng = ChaCha8Rng::from_seed([21; 32]);
    for _ in 0..8 {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        rng.fill_bytes(&mut a);
        rng.fill_bytes(&mut b);

        let shared_ab = x25519(&a, &x25519_base(&b));
        let shared_ba = x25519(&b, &x25519_base(&a));
        assert_eq!(shared_ab, shared_ba);
        assert_ne!(shared_ab, [0u8; 32]);
    }
}

#[test]
fn keypair_generation_is_deterministic() {
    let secret = [0xA7u8; 32];
    assert_eq!(x25519_base(&secret), x25519_base(&secret));
}

#[test]
fn clamping_folds_equivalent_scalars() {
    // bits cleared by clamping do not affect the result
    let mut a = [0x10u8; 32];
    let mut b = a;
    a[0] |= 0b0000_0111;
    b[0] &= 0b1111_1000;
    a[31] |= 0b1000_0000;
    b[31] &= 0b0111_1111;
    assert_eq!(x25519_base(&a), x25519_base(&b));
}

#[test]
fn basepoint_constant_matches() {
    let mut nine = [0u8; 32];
    nine[0] = 9;
    assert_eq!(BASEPOINT_BYTES, nine);
    let secret = [0x33u8; 32];
    assert_eq!(x25519(&secret, &nine), x25519_base(&secret));
}
