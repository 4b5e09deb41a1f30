//! Password-sealed wallet records
//!
//! SECURITY: the private key only exists in plaintext inside `unlock`'s
//! return value.
//! - The record stores the vault's ciphertext, never the key
//! - `Debug` prints the ciphertext as `[REDACTED]`
//! - Unlocked keys come back as `SecretString`, zeroed on drop

use crate::vault::{EncryptedSecret, SecretVault};
use crate::Result;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A wallet whose private key is sealed under a password
#[derive(Clone, Serialize, Deserialize)]
pub struct SealedWallet {
    pub id: Uuid,
    pub label: String,
    /// Public address (safe to expose)
    pub public_key: String,
    /// Sealed private key
    pub secret: EncryptedSecret,
    pub created_at: DateTime<Utc>,
}

impl SealedWallet {
    /// Seal `private_key` under `password`
    pub fn seal(
        vault: &SecretVault,
        label: impl Into<String>,
        public_key: impl Into<String>,
        private_key: &SecretString,
        password: &SecretString,
    ) -> Result<Self> {
        let secret = vault.encrypt_secret(private_key.expose_secret(), password)?;
        let wallet = Self {
            id: Uuid::new_v4(),
            label: label.into(),
            public_key: public_key.into(),
            secret,
            created_at: Utc::now(),
        };

        tracing::info!(
            wallet_id = %wallet.id,
            label = %wallet.label,
            public_key = %wallet.public_key,
            "Sealed wallet private key"
        );
        Ok(wallet)
    }

    /// Decrypt the private key.
    ///
    /// # Errors
    /// [`crate::Error::WrongPasswordOrCorruptData`] on a bad password.
    pub fn unlock(&self, vault: &SecretVault, password: &SecretString) -> Result<SecretString> {
        vault.decrypt_secret(&self.secret, password).inspect_err(|e| {
            tracing::warn!(wallet_id = %self.id, error = %e, "Failed to unlock wallet");
        })
    }

    /// Re-seal under a new password with a fresh salt and nonce
    pub fn rekey(
        &mut self,
        vault: &SecretVault,
        old_password: &SecretString,
        new_password: &SecretString,
    ) -> Result<()> {
        let private_key = self.unlock(vault, old_password)?;
        self.secret = vault.encrypt_secret(private_key.expose_secret(), new_password)?;
        tracing::info!(wallet_id = %self.id, "Re-sealed wallet under new password");
        Ok(())
    }
}

// Implement Debug manually so the sealed blob never lands in logs
impl std::fmt::Debug for SealedWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SealedWallet")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("public_key", &self.public_key)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    // Test key (DO NOT use in production!)
    const TEST_KEY: &str = "4wBqpZM9k3YfZqNDZsZ3VvWkLBaG8rpKgqJZt3wUquX1sP2Tc8BjgSzWnHRrpZLxKb";

    fn pw(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    #[test]
    fn test_seal_and_unlock() {
        let vault = SecretVault::default();
        let wallet =
            SealedWallet::seal(&vault, "Main Wallet", "ABC...123", &pw(TEST_KEY), &pw("pw")).unwrap();

        assert_eq!(wallet.label, "Main Wallet");
        let key = wallet.unlock(&vault, &pw("pw")).unwrap();
        assert_eq!(key.expose_secret(), TEST_KEY);
    }

    #[test]
    fn test_wrong_password() {
        let vault = SecretVault::default();
        let wallet = SealedWallet::seal(&vault, "w", "pk", &pw(TEST_KEY), &pw("pw")).unwrap();
        assert!(matches!(
            wallet.unlock(&vault, &pw("nope")).err().unwrap(),
            Error::WrongPasswordOrCorruptData
        ));
    }

    #[test]
    fn test_rekey() {
        let vault = SecretVault::default();
        let mut wallet = SealedWallet::seal(&vault, "w", "pk", &pw(TEST_KEY), &pw("old")).unwrap();
        let before = wallet.secret.clone();

        wallet.rekey(&vault, &pw("old"), &pw("new")).unwrap();

        assert_ne!(wallet.secret.salt, before.salt);
        assert!(wallet.unlock(&vault, &pw("old")).is_err());
        assert_eq!(
            wallet.unlock(&vault, &pw("new")).unwrap().expose_secret(),
            TEST_KEY
        );
    }

    #[test]
    fn test_rekey_with_wrong_password_leaves_record_untouched() {
        let vault = SecretVault::default();
        let mut wallet = SealedWallet::seal(&vault, "w", "pk", &pw(TEST_KEY), &pw("old")).unwrap();
        let before = wallet.secret.clone();

        assert!(wallet.rekey(&vault, &pw("bad"), &pw("new")).is_err());
        assert_eq!(wallet.secret, before);
    }

    #[test]
    fn test_debug_and_json_never_contain_key() {
        let vault = SecretVault::default();
        let wallet = SealedWallet::seal(&vault, "w", "pk", &pw(TEST_KEY), &pw("pw")).unwrap();

        let debug_str = format!("{:?}", wallet);
        assert!(debug_str.contains("[REDACTED]"));
        assert!(!debug_str.contains(&wallet.secret.ciphertext));

        let json = serde_json::to_string(&wallet).unwrap();
        assert!(!json.contains(TEST_KEY));
        let parsed: SealedWallet = serde_json::from_str(&json).unwrap();
        assert_eq!(
            parsed.unlock(&vault, &pw("pw")).unwrap().expose_secret(),
            TEST_KEY
        );
    }
}
