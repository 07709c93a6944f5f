//! Session key fingerprinting.
//!
//! The fingerprint is logged at startup so operators can tell which key file a
//! running instance picked up without exposing key material.

use actix_web::cookie::Key;
use sha2::{Digest, Sha256};

/// Bytes of the SHA-256 digest kept before hex encoding.
const FINGERPRINT_BYTES: usize = 8;

/// Truncated SHA-256 fingerprint of the key's signing half, as lowercase hex.
///
/// # Examples
///
/// ```rust
/// use actix_web::cookie::Key;
/// use eventtara::inbound::http::session_config::fingerprint::key_fingerprint;
///
/// let fp = key_fingerprint(&Key::derive_from(&[7_u8; 64]));
/// assert_eq!(fp.len(), 16);
/// assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
/// ```
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    let digest = Sha256::digest(key.signing());
    digest
        .get(..FINGERPRINT_BYTES)
        .map(hex::encode)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn same_key_material_gives_same_fingerprint() {
        let first = key_fingerprint(&Key::derive_from(&[b'e'; 64]));
        let second = key_fingerprint(&Key::derive_from(&[b'e'; 64]));
        assert_eq!(first, second);
    }

    #[rstest]
    fn rotated_key_changes_fingerprint() {
        let old = key_fingerprint(&Key::derive_from(&[b'e'; 64]));
        let new = key_fingerprint(&Key::derive_from(&[b't'; 64]));
        assert_ne!(old, new);
    }

    #[rstest]
    fn fingerprint_is_short_lowercase_hex() {
        let fp = key_fingerprint(&Key::generate());
        assert_eq!(fp.len(), FINGERPRINT_BYTES * 2);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
