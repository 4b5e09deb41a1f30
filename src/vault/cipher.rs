//! AES-256-GCM sealing of secret bytes
//!
//! The 16-byte GCM tag is appended to the ciphertext. `open` either returns
//! the full plaintext or nothing: the tag is checked before any plaintext is
//! released.

use super::kdf::DerivedKey;
use crate::{Error, Result};
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

/// GCM nonce length in bytes
pub const NONCE_LEN: usize = 12;

/// Authentication tag length in bytes
pub const TAG_LEN: usize = 16;

/// Fresh random nonce from the OS CSPRNG
pub fn generate_nonce() -> [u8; NONCE_LEN] {
    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);
    nonce
}

/// Fresh random salt from the OS CSPRNG
pub fn generate_salt() -> [u8; super::kdf::SALT_LEN] {
    let mut salt = [0u8; super::kdf::SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    salt
}

fn cipher_for(key: &DerivedKey) -> Aes256Gcm {
    Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()))
}

/// Encrypt `plaintext`. Output is ciphertext followed by the tag.
pub fn seal(plaintext: &[u8], key: &DerivedKey, nonce: &[u8; NONCE_LEN]) -> Result<Vec<u8>> {
    cipher_for(key)
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .map_err(|_| Error::InvalidParameter("plaintext too large to seal".to_string()))
}

/// Decrypt and verify `ciphertext`.
///
/// # Errors
/// [`Error::InvalidParameter`] if the input is shorter than a tag,
/// [`Error::AuthenticationFailure`] if the tag does not verify.
pub fn open(
    ciphertext: &[u8],
    key: &DerivedKey,
    nonce: &[u8; NONCE_LEN],
) -> Result<Zeroizing<Vec<u8>>> {
    if ciphertext.len() < TAG_LEN {
        return Err(Error::InvalidParameter(format!(
            "ciphertext must be at least {} bytes, got {}",
            TAG_LEN,
            ciphertext.len()
        )));
    }

    cipher_for(key)
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map(Zeroizing::new)
        .map_err(|_| Error::AuthenticationFailure)
}
