//! X25519 Diffie-Hellman key agreement over Curve25519 (RFC 7748).
//!
//! A constant-time Montgomery ladder over the field GF(2^255 - 19). Scalars
//! and points are 32-byte little-endian strings; the 32-byte shape is part
//! of the function signatures.

mod field;

use field::{FieldElement, A24};

/// The u-coordinate of the Curve25519 base point, 9.
pub const BASEPOINT_BYTES: [u8; 32] = {
    let mut bytes = [0u8; 32];
    bytes[0] = 9;
    bytes
};

/// Masks a scalar per RFC 7748: clear the three low bits, clear the top bit
/// and set bit 254.
fn clamp(scalar: &[u8; 32]) -> [u8; 32] {
    let mut z = *scalar;
    z[0] &= 248;
    z[31] = (z[31] & 127) | 64;
    z
}

/// Scalar multiplication `clamp(scalar) * point`, the X25519 function of
/// RFC 7748. Deterministic in its inputs.
///
/// 255 ladder steps walk the scalar from bit 254 down to bit 0, maintaining
/// two projective points whose roles are exchanged by a constant-time swap
/// keyed on consecutive scalar bits; the result is affinized by one field
/// inversion.
pub fn x25519(scalar: &[u8; 32], point: &[u8; 32]) -> [u8; 32] {
    let z = clamp(scalar);
    let x1 = FieldElement::unpack(point);

    let mut x2 = FieldElement::ONE;
    let mut z2 = FieldElement::ZERO;
    let mut x3 = x1;
    let mut z3 = FieldElement::ONE;
    let mut swap: i64 = 0;

    for t in (0..255usize).rev() {
        let k_t = i64::from((z[t >> 3] >> (t & 7)) & 1);
        swap ^= k_t;
        FieldElement::cswap(&mut x2, &mut x3, swap);
        FieldElement::cswap(&mut z2, &mut z3, swap);
        swap = k_t;

        // one differential add-and-double step
        let a = &x2 + &z2;
        let b = &x2 - &z2;
        let aa = a.square();
        let bb = b.square();
        let e = &aa - &bb;
        let c = &x3 + &z3;
        let d = &x3 - &z3;
        let da = &d * &a;
        let cb = &c * &b;

        x3 = (&da + &cb).square();
        z3 = &x1 * &(&da - &cb).square();
        x2 = &aa * &bb;
        z2 = &e * &(&aa + &(&A24 * &e));
    }

    FieldElement::cswap(&mut x2, &mut x3, swap);
    FieldElement::cswap(&mut z2, &mut z3, swap);

    (&x2 * &z2.invert()).pack()
}

/// Derives the public key for `scalar`: `clamp(scalar) * 9`.
pub fn x25519_base(scalar: &[u8; 32]) -> [u8; 32] {
    x25519(scalar, &BASEPOINT_BYTES)
}
