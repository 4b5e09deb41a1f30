//! End-to-end secret sealing under a password

use super::cipher::{self, NONCE_LEN};
use super::kdf::{self, DEFAULT_ITERATIONS, MIN_ITERATIONS, SALT_LEN};
use crate::config::VaultSettings;
use crate::{Error, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, Zeroizing};

/// At-rest form of a sealed secret.
///
/// All three fields are standard base64. The salt and nonce are fresh for
/// every encryption. Older blobs written with `encryptedData`/`iv` field
/// names are accepted on input.
///
/// The KDF round count is not stored: a blob only opens under a vault with
/// the same `kdf_iterations` it was sealed with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedSecret {
    /// Ciphertext with the GCM tag appended
    #[serde(alias = "encryptedData")]
    pub ciphertext: String,
    /// 12-byte GCM nonce
    #[serde(alias = "iv")]
    pub nonce: String,
    /// 16-byte KDF salt
    pub salt: String,
}

/// Stateless password vault.
///
/// Every call derives its own key and owns its own buffers, so a single
/// vault can be shared freely across threads.
#[derive(Debug, Clone, Copy)]
pub struct SecretVault {
    iterations: u32,
}

impl Default for SecretVault {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

impl SecretVault {
    /// Build a vault from settings
    ///
    /// # Errors
    /// [`Error::InvalidParameter`] if the configured round count is too low.
    pub fn new(settings: &VaultSettings) -> Result<Self> {
        if settings.kdf_iterations < MIN_ITERATIONS {
            return Err(Error::InvalidParameter(format!(
                "kdf_iterations must be at least {}, got {}",
                MIN_ITERATIONS, settings.kdf_iterations
            )));
        }
        Ok(Self {
            iterations: settings.kdf_iterations,
        })
    }

    /// PBKDF2 round count used for both directions
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Seal `plaintext` under `password` with a fresh salt and nonce.
    pub fn encrypt_secret(
        &self,
        plaintext: &str,
        password: &SecretString,
    ) -> Result<EncryptedSecret> {
        let salt = cipher::generate_salt();
        let nonce = cipher::generate_nonce();

        let key = kdf::derive_key(password.expose_secret().as_bytes(), &salt, self.iterations)?;
        let ciphertext = cipher::seal(plaintext.as_bytes(), &key, &nonce)?;

        Ok(EncryptedSecret {
            ciphertext: STANDARD.encode(ciphertext),
            nonce: STANDARD.encode(nonce),
            salt: STANDARD.encode(salt),
        })
    }

    /// Recover the plaintext sealed in `secret`.
    ///
    /// # Errors
    /// - [`Error::InvalidParameter`] if a field is not valid base64 or has
    ///   the wrong length.
    /// - [`Error::WrongPasswordOrCorruptData`] if authentication fails, for
    ///   either cause.
    pub fn decrypt_secret(
        &self,
        secret: &EncryptedSecret,
        password: &SecretString,
    ) -> Result<SecretString> {
        let ciphertext = decode_field("ciphertext", &secret.ciphertext)?;
        let nonce: [u8; NONCE_LEN] = decode_fixed("nonce", &secret.nonce)?;
        let salt: [u8; SALT_LEN] = decode_fixed("salt", &secret.salt)?;

        let key = kdf::derive_key(password.expose_secret().as_bytes(), &salt, self.iterations)?;
        let plaintext = cipher::open(&ciphertext, &key, &nonce).map_err(|e| match e {
            Error::AuthenticationFailure => Error::WrongPasswordOrCorruptData,
            other => other,
        })?;

        into_secret_string(plaintext)
    }
}

fn decode_field(name: &str, value: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(value)
        .map_err(|e| Error::InvalidParameter(format!("{} is not valid base64: {}", name, e)))
}

fn decode_fixed<const N: usize>(name: &str, value: &str) -> Result<[u8; N]> {
    let bytes = decode_field(name, value)?;
    let len = bytes.len();
    bytes.try_into().map_err(|_| {
        Error::InvalidParameter(format!("{} must be {} bytes, got {}", name, N, len))
    })
}

/// Move decrypted bytes into a `SecretString` without leaving stray copies.
///
/// The intermediate buffer is sized exactly so the conversion to a boxed
/// `str` does not reallocate; the source buffer is zeroed on drop.
fn into_secret_string(plaintext: Zeroizing<Vec<u8>>) -> Result<SecretString> {
    let mut exact = Vec::with_capacity(plaintext.len());
    exact.extend_from_slice(&plaintext);
    drop(plaintext);

    match String::from_utf8(exact) {
        Ok(text) => Ok(SecretString::from(text)),
        Err(e) => {
            e.into_bytes().zeroize();
            Err(Error::WrongPasswordOrCorruptData)
        }
    }
}
