//! Password-sealed secret storage
//!
//! Private keys are sealed with AES-256-GCM under a key stretched from the
//! user's password with PBKDF2-HMAC-SHA256. Nothing here keeps state between
//! calls; derived keys and decrypted buffers are zeroed when dropped.

pub mod cipher;
pub mod kdf;
mod password;
mod scrub;
mod secret;

pub use kdf::DerivedKey;
pub use password::{generate_strong_password, PASSWORD_ALPHABET, PASSWORD_LEN};
pub use scrub::{is_sensitive_field, scrub_secret_like};
pub use secret::{EncryptedSecret, SecretVault};
