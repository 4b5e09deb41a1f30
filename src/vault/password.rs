//! Random password generation

use rand::rngs::OsRng;
use rand::Rng;
use secrecy::SecretString;

/// Length of generated passwords
pub const PASSWORD_LEN: usize = 16;

/// Characters a generated password is drawn from
pub const PASSWORD_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*";

/// Generate a [`PASSWORD_LEN`]-character password.
///
/// Each character is picked uniformly from [`PASSWORD_ALPHABET`] using the
/// OS CSPRNG (`gen_range` rejection-samples, so there is no modulo bias).
pub fn generate_strong_password() -> SecretString {
    let mut password = String::with_capacity(PASSWORD_LEN);
    for _ in 0..PASSWORD_LEN {
        let idx = OsRng.gen_range(0..PASSWORD_ALPHABET.len());
        password.push(PASSWORD_ALPHABET[idx] as char);
    }
    SecretString::from(password)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashSet;

    #[test]
    fn test_length_and_alphabet() {
        for _ in 0..50 {
            let password = generate_strong_password();
            let text = password.expose_secret();
            assert_eq!(text.chars().count(), PASSWORD_LEN);
            assert!(text.bytes().all(|b| PASSWORD_ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn test_passwords_are_unique() {
        let seen: HashSet<String> = (0..100)
            .map(|_| generate_strong_password().expose_secret().to_string())
            .collect();
        assert_eq!(seen.len(), 100);
    }

    #[test]
    fn test_uses_whole_alphabet() {
        // 2000 draws * 16 chars over a 70-char alphabet: a missing symbol
        // would mean a broken distribution.
        let mut seen = HashSet::new();
        for _ in 0..2000 {
            seen.extend(generate_strong_password().expose_secret().bytes());
        }
        assert_eq!(seen.len(), PASSWORD_ALPHABET.len());
    }
}
