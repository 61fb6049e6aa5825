//! End-to-end ECDSA tests: sign/verify round trip, tampering, and
//! signature encoding.

use hex_literal::hex;
use sha2::{Digest, Sha256};
use signature::hazmat::PrehashVerifier;
use signature::SignatureEncoding;
use wei25519::{Signature, SigningKey, VerifyingKey};

/// Fixed test private key (below the group order).
const D: [u8; 32] = hex!("42e1d5002b71e9cbd09f4e95d9c1a9849cfd2f69596d1d2b6a2978e41a5d3c0e");

/// Fixed test nonce.
const K: [u8; 32] = hex!("7b0ac52a836df1bd92731f8c1e0231d3b8e1f4e41d9d0d5846b6b1a8f2e0c35a");

fn test_digest() -> [u8; 32] {
    Sha256::digest(b"test").into()
}

#[test]
fn sign_verify_round_trip() {
    let key = SigningKey::from_bytes(&D).unwrap();
    let public = key.verifying_key();
    let digest = test_digest();

    let signature = key.sign_prehashed(&digest, &K).unwrap();
    assert!(public.verify_prehashed(&digest, &signature).is_ok());
}

#[test]
fn signing_is_deterministic_in_its_inputs() {
    let key = SigningKey::from_bytes(&D).unwrap();
    let digest = test_digest();

    let a = key.sign_prehashed(&digest, &K).unwrap();
    let b = key.sign_prehashed(&digest, &K).unwrap();
    assert_eq!(a, b);

    let mut other_nonce = K;
    other_nonce[0] ^= 1;
    let c = key.sign_prehashed(&digest, &other_nonce).unwrap();
    assert_ne!(a, c);
}

#[test]
fn tampered_digest_fails() {
    let key = SigningKey::from_bytes(&D).unwrap();
    let public = key.verifying_key();
    let digest = test_digest();
    let signature = key.sign_prehashed(&digest, &K).unwrap();

    let mut bad = digest;
    bad[0] ^= 1;
    assert!(public.verify_prehashed(&bad, &signature).is_err());
}

#[test]
fn tampered_signature_fails() {
    let key = SigningKey::from_bytes(&D).unwrap();
    let public = key.verifying_key();
    let digest = test_digest();
    let signature = key.sign_prehashed(&digest, &K).unwrap();

    let good = signature.to_bytes();
    for byte in [0usize, 17, 31, 32, 40, 63] {
        let mut bad = good;
        bad[byte] ^= 0x04;
        // Either the mangled bytes no longer parse as a valid
        // signature, or they parse and fail verification.
        if let Ok(sig) = Signature::try_from(&bad[..]) {
            assert!(public.verify_prehashed(&digest, &sig).is_err());
        }
    }
}

#[test]
fn tampered_public_key_fails() {
    let key = SigningKey::from_bytes(&D).unwrap();
    let digest = test_digest();
    let signature = key.sign_prehashed(&digest, &K).unwrap();

    let mut bytes = key.verifying_key().to_bytes();
    bytes[0] ^= 1;
    let bad_x = VerifyingKey::from_bytes(&bytes);
    assert!(bad_x.verify_prehashed(&digest, &signature).is_err());

    let mut bytes = key.verifying_key().to_bytes();
    bytes[63] ^= 0x10;
    let bad_y = VerifyingKey::from_bytes(&bytes);
    assert!(bad_y.verify_prehashed(&digest, &signature).is_err());
}

#[test]
fn wrong_key_fails() {
    let key = SigningKey::from_bytes(&D).unwrap();
    let digest = test_digest();
    let signature = key.sign_prehashed(&digest, &K).unwrap();

    let mut other_d = D;
    other_d[5] ^= 0x20;
    let other_public = SigningKey::from_bytes(&other_d).unwrap().verifying_key();
    assert!(other_public.verify_prehashed(&digest, &signature).is_err());
}

#[test]
fn public_key_bytes_round_trip() {
    let key = SigningKey::from_bytes(&D).unwrap();
    let public = key.verifying_key();
    let restored = VerifyingKey::from_bytes(&public.to_bytes());
    assert_eq!(public, restored);
    assert!(bool::from(public.as_point().is_on_curve()));
}

#[test]
fn signature_encoding_round_trip() {
    let key = SigningKey::from_bytes(&D).unwrap();
    let digest = test_digest();
    let signature = key.sign_prehashed(&digest, &K).unwrap();

    let bytes = signature.to_bytes();
    let restored = Signature::try_from(&bytes[..]).unwrap();
    assert_eq!(signature, restored);
    assert_eq!(signature.encoded_len(), 64);
}

#[test]
fn prehash_verifier_trait() {
    let key = SigningKey::from_bytes(&D).unwrap();
    let public = key.verifying_key();
    let digest = test_digest();
    let signature = key.sign_prehashed(&digest, &K).unwrap();

    assert!(public.verify_prehash(&digest, &signature).is_ok());
    // Wrong prehash length is an error, not a panic.
    assert!(public.verify_prehash(&digest[..31], &signature).is_err());
}

#[test]
fn signing_key_bytes_round_trip() {
    let key = SigningKey::from_bytes(&D).unwrap();
    assert_eq!(key.to_bytes(), D);
}
