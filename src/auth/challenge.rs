//! Challenge digest derivation for the Blackboard login form.
//!
//! The portal's challenge login works on digests only. With
//! `h(b) = uppercase-hex(MD5(b))`:
//!
//! ```text
//! pw_hash            = h(password bytes)
//! pw_hash_unicode    = h(password as UTF-16LE bytes)
//! encoded_pw         = h(pw_hash ++ token)
//! encoded_pw_unicode = h((pw_hash_unicode ++ token) as UTF-16LE bytes)
//! ```
//!
//! where `++` concatenates the ASCII hex digest with the raw token bytes.
//! Only the two `encoded_*` values ever travel over the wire; combined with
//! the single-use token they make a captured submission worthless for replay.

use md5::{Digest, Md5};

/// The derived password pair submitted with the login form.
///
/// Recomputed for every attempt (the token is single-use) and never stored.
pub struct ChallengeDigests {
    pub encoded_pw: String,
    pub encoded_pw_unicode: String,
}

impl ChallengeDigests {
    /// Derive the digest pair from the password and the one-time token.
    pub fn derive(password: &str, token: &str) -> Self {
        let pw_hash = md5_hex_upper(password.as_bytes());
        let pw_hash_unicode = md5_hex_upper(&utf16_le_bytes(password));

        let encoded_pw = md5_hex_upper(format!("{pw_hash}{token}").as_bytes());
        let encoded_pw_unicode =
            md5_hex_upper(&utf16_le_bytes(&format!("{pw_hash_unicode}{token}")));

        Self {
            encoded_pw,
            encoded_pw_unicode,
        }
    }
}

/// Uppercase hex MD5, the only digest form the portal accepts.
fn md5_hex_upper(bytes: &[u8]) -> String {
    Md5::digest(bytes)
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect()
}

/// Encode a string as UTF-16 little-endian bytes.
fn utf16_le_bytes(s: &str) -> Vec<u8> {
    s.encode_utf16().flat_map(u16::to_le_bytes).collect()
}
