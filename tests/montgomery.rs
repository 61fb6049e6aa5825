//! Montgomery ladder tests: RFC 7748 vectors and agreement with the
//! Edwards engine across the birational map.

use hex_literal::hex;
use wei25519::montgomery::{clamp_scalar, MontgomeryAffine, MontgomeryPoint};
use wei25519::morph::montgomery_u_from_edwards_y;
use wei25519::EdwardsPoint;

#[test]
fn rfc7748_vector_1() {
    let scalar = hex!("a546e36bf0527c9d3b16154b82465edd62144c0ac1fc5a18506a2244ba449ac4");
    let point = MontgomeryPoint(hex!(
        "e6db6867583030db3594c1a424b15f7c726624ec26b3353b10a903a6d0ab1c4c"
    ));
    let expected = hex!("c3da55379de9c6908e94ea4df28d084f32eccf03491c71f754b4075577a28552");

    assert_eq!(point.mul_clamped(&scalar).to_bytes(), expected);
}

#[test]
fn rfc7748_key_derivation() {
    let alice_private = hex!("77076d0a7318a57d3c16c17251b26645df4c2f87ebc0992ab177fba51db92c2a");
    let alice_public = hex!("8520f0098930a754748b7ddcb43ef75a0dbf3a0d26381af4eba4a98eaa9b4e6a");
    let bob_private = hex!("5dab087e624a8a4b79e17f8b83800ee66f3bb1292618b6fd1c2f8b27ff88e0eb");
    let bob_public = hex!("de9edb7d7b7dc1b4d35b61c2ece435373f8343c85b78674dadfc7e146f882b4f");
    let shared = hex!("4a5d9d5ba4ce2de1728e3bf480350f25e07e21c947d19e3376f09b3c1e161742");

    let g = MontgomeryPoint::GENERATOR;
    assert_eq!(g.mul_clamped(&alice_private).to_bytes(), alice_public);
    assert_eq!(g.mul_clamped(&bob_private).to_bytes(), bob_public);

    assert_eq!(
        MontgomeryPoint(bob_public)
            .mul_clamped(&alice_private)
            .to_bytes(),
        shared
    );
    assert_eq!(
        MontgomeryPoint(alice_public)
            .mul_clamped(&bob_private)
            .to_bytes(),
        shared
    );
}

#[test]
fn rfc7748_iterated_ladder_one_step() {
    let base = hex!("0900000000000000000000000000000000000000000000000000000000000000");
    let expected = hex!("422c8e7a6227d7bca1350b3e2bb7279f7897b87bb6854b783c60e80311ae3079");

    let result = MontgomeryPoint(base).mul_clamped(&base);
    assert_eq!(result.to_bytes(), expected);
}

/// The ladder result must match the Edwards scalar multiple pushed
/// through y -> u, for any prepared scalar.
fn assert_ladder_matches_edwards(e: &[u8; 32]) {
    let from_ladder = MontgomeryPoint::GENERATOR.mul_bits(e);

    let ed = EdwardsPoint::generator().scalar_mul(e).to_affine();
    let from_edwards = montgomery_u_from_edwards_y(&ed.y);

    assert_eq!(from_ladder.to_bytes(), from_edwards.to_bytes());
}

#[test]
fn ladder_agrees_with_edwards_clamped_zero() {
    // Clamping all-zero bytes still leaves bit 254 set.
    assert_ladder_matches_edwards(&clamp_scalar([0u8; 32]));
}

#[test]
fn ladder_agrees_with_edwards_clamped_one() {
    // Byte zero is cleared by the clamp; the scalar becomes 2^254.
    let e = clamp_scalar({
        let mut b = [0u8; 32];
        b[0] = 1;
        b
    });
    assert_eq!(e[0], 0);
    assert_ladder_matches_edwards(&e);
}

#[test]
fn ladder_agrees_with_edwards_dense_scalar() {
    assert_ladder_matches_edwards(&clamp_scalar([0xa7; 32]));
}

/// Full-point multiplication: the recovered (u, v) result, mapped
/// through Weierstrass and back to Edwards, is the Edwards multiple.
#[test]
fn xy_mul_recovers_the_edwards_multiple() {
    let e = clamp_scalar([0u8; 32]);

    let full = MontgomeryAffine::generator().mul_bits(&e);
    assert!(bool::from(full.is_on_curve()));

    let round_tripped = full.to_weierstrass().to_edwards();
    let expected = EdwardsPoint::generator().scalar_mul(&e).to_affine();
    assert_eq!(round_tripped, expected);
}

#[test]
fn xy_mul_matches_u_only_mul() {
    for seed in [[0x01u8; 32], [0x5e; 32], [0xfe; 32]] {
        let e = clamp_scalar(seed);
        let full = MontgomeryAffine::generator().mul_bits(&e);
        let u_only = MontgomeryPoint::GENERATOR.mul_bits(&e);
        assert_eq!(full.to_point(), u_only);
        assert!(bool::from(full.is_on_curve()));
    }
}
