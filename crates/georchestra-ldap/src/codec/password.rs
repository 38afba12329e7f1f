//! `{SSHA}` password rendering.
//!
//! `{SSHA}` + base64(SHA-1(password ‖ salt) ‖ salt) with a fresh 4-byte salt.
//! One-way: nothing here verifies a stored credential.

use base64::Engine;
use rand::{rngs::OsRng, RngCore};
use sha1::{Digest, Sha1};

const SCHEME: &str = "{SSHA}";
const SALT_LEN: usize = 4;

/// Hash a plaintext password for the `userPassword` attribute.
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    hash_password_with_salt(password, &salt)
}

pub(crate) fn hash_password_with_salt(password: &str, salt: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(password.as_bytes());
    hasher.update(salt);
    let digest = hasher.finalize();

    let mut framed = Vec::with_capacity(digest.len() + salt.len());
    framed.extend_from_slice(&digest);
    framed.extend_from_slice(salt);

    format!(
        "{}{}",
        SCHEME,
        base64::engine::general_purpose::STANDARD.encode(framed)
    )
}
