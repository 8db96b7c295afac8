//! PKCE (RFC 7636) challenge verification.

use crate::domains::oauth::domain::model::CodeChallengeMethod;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Verifier length bounds from RFC 7636 §4.1
pub const VERIFIER_MIN_LEN: usize = 43;
pub const VERIFIER_MAX_LEN: usize = 128;

fn is_unreserved(byte: u8) -> bool {
    matches!(byte, b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~')
}

/// Verifier syntax: 43-128 unreserved URL characters
pub fn is_valid_verifier(verifier: &str) -> bool {
    (VERIFIER_MIN_LEN..=VERIFIER_MAX_LEN).contains(&verifier.len())
        && verifier.bytes().all(is_unreserved)
}

/// Challenge syntax shares the verifier charset and bounds: a plain
/// challenge is a verifier, an S256 challenge is 43 base64url characters
pub fn is_valid_challenge(challenge: &str) -> bool {
    (VERIFIER_MIN_LEN..=VERIFIER_MAX_LEN).contains(&challenge.len())
        && challenge.bytes().all(is_unreserved)
}

/// base64url(SHA-256(verifier)) without padding
pub fn compute_s256_challenge(verifier: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()))
}

/// Verify a token-request verifier against the stored challenge
///
/// Rejects malformed verifiers outright, then compares in constant time.
pub fn verify_pkce(verifier: &str, challenge: &str, method: CodeChallengeMethod) -> bool {
    if !is_valid_verifier(verifier) {
        return false;
    }
    match method {
        CodeChallengeMethod::S256 => {
            constant_time_eq(compute_s256_challenge(verifier).as_bytes(), challenge.as_bytes())
        },
        CodeChallengeMethod::Plain => constant_time_eq(verifier.as_bytes(), challenge.as_bytes()),
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && bool::from(a.ct_eq(b))
}
