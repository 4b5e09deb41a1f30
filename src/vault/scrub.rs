//! Best-effort scrubbing of secret-looking fields
//!
//! Overwrites string values whose field name contains `private`, `secret`
//! or `key` in a JSON document before it is dropped. This is a mitigation,
//! not a guarantee: serde and the allocator may already have made copies we
//! cannot reach. Secrets that never leave this crate are held in
//! `SecretString`/`Zeroizing` buffers instead.

use serde_json::Value;
use zeroize::Zeroize;

const SENSITIVE_MARKERS: [&str; 3] = ["private", "secret", "key"];

/// Whether a field name looks like it holds secret material
pub fn is_sensitive_field(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    SENSITIVE_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Zero every string under a sensitive field name, recursing through nested
/// objects and arrays. Returns the number of values scrubbed.
pub fn scrub_secret_like(value: &mut Value) -> usize {
    match value {
        Value::Object(map) => {
            let mut scrubbed = 0;
            for (name, field) in map.iter_mut() {
                if is_sensitive_field(name) {
                    scrubbed += scrub_all_strings(field);
                } else {
                    scrubbed += scrub_secret_like(field);
                }
            }
            scrubbed
        }
        Value::Array(items) => items.iter_mut().map(scrub_secret_like).sum(),
        _ => 0,
    }
}

fn scrub_all_strings(value: &mut Value) -> usize {
    match value {
        Value::String(s) => {
            s.zeroize();
            1
        }
        Value::Object(map) => map.values_mut().map(scrub_all_strings).sum(),
        Value::Array(items) => items.iter_mut().map(scrub_all_strings).sum(),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scrubs_sensitive_fields() {
        let mut doc = json!({
            "label": "Trading Wallet",
            "publicKey": "DEF...456",
            "privateKey": "5Kb8kLf9zgWQnogidDA76",
            "clientSecret": "s3cr3t",
            "balance": 0.85
        });

        let count = scrub_secret_like(&mut doc);

        // publicKey matches "key" as well
        assert_eq!(count, 3);
        assert_eq!(doc["privateKey"], "");
        assert_eq!(doc["clientSecret"], "");
        assert_eq!(doc["label"], "Trading Wallet");
        assert_eq!(doc["balance"], 0.85);
    }

    #[test]
    fn test_recurses_into_nested_values() {
        let mut doc = json!({
            "wallets": [
                { "id": "1", "secret": { "private_key": "aa", "words": ["x", "y"] } },
                { "id": "2", "apiKey": "bb" }
            ]
        });

        assert_eq!(scrub_secret_like(&mut doc), 4);
        assert_eq!(doc["wallets"][0]["secret"]["words"][1], "");
        assert_eq!(doc["wallets"][1]["apiKey"], "");
        assert_eq!(doc["wallets"][1]["id"], "2");
    }

    #[test]
    fn test_ignores_scalars() {
        let mut doc = json!("privateKey");
        assert_eq!(scrub_secret_like(&mut doc), 0);
        assert_eq!(doc, "privateKey");
    }
}
