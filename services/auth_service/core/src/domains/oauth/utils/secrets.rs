//! CSPRNG-backed opaque secrets, codes and session ids.

use rand::rngs::OsRng;
use rand::Rng;

/// 64-symbol URL-safe alphabet; 6 bits of entropy per character
const URL_SAFE_CHARSET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Client secrets: 32 chars = 192 bits
pub const CLIENT_SECRET_LEN: usize = 32;

/// Authorization codes and session ids: 43 chars = 258 bits
pub const AUTH_CODE_LEN: usize = 43;
pub const SESSION_ID_LEN: usize = 43;

fn random_urlsafe(len: usize) -> String {
    let mut rng = OsRng;
    (0..len)
        .map(|_| URL_SAFE_CHARSET[rng.gen_range(0..URL_SAFE_CHARSET.len())] as char)
        .collect()
}

/// Generate a plaintext client secret
pub fn generate_client_secret() -> String {
    random_urlsafe(CLIENT_SECRET_LEN)
}

/// Generate an opaque authorization code
pub fn generate_auth_code() -> String {
    random_urlsafe(AUTH_CODE_LEN)
}

/// Generate an opaque session id (doubles as the cookie value)
pub fn generate_session_id() -> String {
    random_urlsafe(SESSION_ID_LEN)
}
