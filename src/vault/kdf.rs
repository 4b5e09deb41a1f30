//! Password-based key derivation
//!
//! PBKDF2-HMAC-SHA256 stretches a user password and a 16-byte random salt
//! into a 256-bit AES key. The iteration count is the brute-force cost knob
//! and is never allowed below [`MIN_ITERATIONS`].

use crate::{Error, Result};
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Salt length in bytes
pub const SALT_LEN: usize = 16;

/// Derived key length in bytes (256-bit)
pub const KEY_LEN: usize = 32;

/// Default PBKDF2 round count
pub const DEFAULT_ITERATIONS: u32 = 100_000;

/// Lowest round count accepted by [`derive_key`]
pub const MIN_ITERATIONS: u32 = 100_000;

/// 256-bit symmetric key derived from a password.
///
/// Zeroed on drop. No `Clone` or `Debug` so it cannot be copied around or
/// end up in a log line.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey([u8; KEY_LEN]);

impl DerivedKey {
    /// Raw key bytes, for handing to the cipher
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

/// Derive a key from `password` and `salt`.
///
/// Deterministic for a fixed `(password, salt, iterations)` triple.
///
/// # Errors
/// [`Error::InvalidParameter`] if the salt is not [`SALT_LEN`] bytes or the
/// round count is below [`MIN_ITERATIONS`].
pub fn derive_key(password: &[u8], salt: &[u8], iterations: u32) -> Result<DerivedKey> {
    if salt.len() != SALT_LEN {
        return Err(Error::InvalidParameter(format!(
            "salt must be {} bytes, got {}",
            SALT_LEN,
            salt.len()
        )));
    }
    if iterations < MIN_ITERATIONS {
        return Err(Error::InvalidParameter(format!(
            "KDF iterations must be at least {}, got {}",
            MIN_ITERATIONS, iterations
        )));
    }

    let mut key = DerivedKey([0u8; KEY_LEN]);
    pbkdf2_hmac::<Sha256>(password, salt, iterations, &mut key.0);
    Ok(key)
}
