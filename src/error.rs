//! Error types for the vault and bundle pipeline

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The AEAD tag did not verify. Produced by the cipher layer only.
    #[error("Authentication tag verification failed")]
    AuthenticationFailure,

    /// Decryption through the vault failed. Deliberately says nothing about
    /// whether the password or the ciphertext was at fault.
    #[error("Wrong password or corrupt data")]
    WrongPasswordOrCorruptData,

    #[error("A bundle run is already in progress")]
    AlreadyRunning,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
