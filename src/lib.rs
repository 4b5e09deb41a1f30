//! Bundle Vault
//!
//! Two independent pieces used by a multi-wallet trading client:
//! - A password-sealed vault for private keys (PBKDF2-HMAC-SHA256 +
//!   AES-256-GCM)
//! - A bundle pipeline that groups signed operations into fixed-size
//!   bundles and submits them paced, retried and cancellable
//!
//! # Security Model
//!
//! - Passwords and decrypted keys are carried as `SecretString` and zeroed
//!   on drop
//! - Derived keys never leave the vault module
//! - Decryption failures never say whether the password or the data was bad

pub mod bundles;
pub mod config;
pub mod observers;
pub mod sink;
pub mod vault;
pub mod wallet;

mod error;

// Re-export commonly used types
pub use bundles::{BundleJob, BundleResult, BundleScheduler, JobStatus, JobSummary, Stats};
pub use config::{BundleSettings, Config, FailurePolicy, PRIVATE_KEY_ENV, VAULT_PASSWORD_ENV};
pub use error::{Error, Result};
pub use sink::{Receipt, SubmissionError, SubmissionSink};
pub use vault::{EncryptedSecret, SecretVault};
