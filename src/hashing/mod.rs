//! Cache-key hashing.
//!
//! Keys are BLAKE3 digests of a canonical JSON rendering: the value is first converted to a
//! [`serde_json::Value`], whose object maps keep keys sorted, so two values that serialize to
//! the same fields produce the same key regardless of field order in memory.

use serde::Serialize;

/// Canonical JSON text for `value` (object keys sorted, no whitespace).
pub fn canonical_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let tree = serde_json::to_value(value)?;
    serde_json::to_string(&tree)
}

/// Hex BLAKE3 digest of arbitrary bytes.
#[inline]
pub fn hash_hex(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

/// Hex BLAKE3 digest of the canonical JSON rendering of `value`.
pub fn hash_canonical_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    Ok(hash_hex(canonical_json(value)?.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::{BTreeMap, HashMap, HashSet};

    #[test]
    fn test_hash_hex_determinism() {
        let hash1 = hash_hex(b"rust async runtime");
        let hash2 = hash_hex(b"rust async runtime");

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_hash_hex_uniqueness() {
        let inputs = [
            b"quick".as_slice(),
            b"Quick".as_slice(),
            b"quick ".as_slice(),
            b"deep".as_slice(),
        ];

        let hashes: HashSet<_> = inputs.iter().map(|i| hash_hex(i)).collect();
        assert_eq!(hashes.len(), inputs.len());
    }

    #[test]
    fn test_canonical_json_sorts_object_keys() {
        let text = canonical_json(&json!({"mode": "deep", "hunters": ["github"], "b": {"z": 1, "a": 2}}))
            .unwrap();
        assert_eq!(text, r#"{"b":{"a":2,"z":1},"hunters":["github"],"mode":"deep"}"#);
    }

    #[test]
    fn test_hash_ignores_map_insertion_order() {
        let mut first = HashMap::new();
        first.insert("queries", vec!["rust"]);
        first.insert("hunters", vec!["github", "arxiv"]);

        let mut second = BTreeMap::new();
        second.insert("hunters", vec!["github", "arxiv"]);
        second.insert("queries", vec!["rust"]);

        assert_eq!(
            hash_canonical_json(&first).unwrap(),
            hash_canonical_json(&second).unwrap()
        );
    }

    #[test]
    fn test_hash_is_sensitive_to_values_and_list_order() {
        let base = hash_canonical_json(&json!({"queries": ["a", "b"]})).unwrap();
        let reordered = hash_canonical_json(&json!({"queries": ["b", "a"]})).unwrap();
        let changed = hash_canonical_json(&json!({"queries": ["a", "c"]})).unwrap();

        assert_ne!(base, reordered);
        assert_ne!(base, changed);
    }
}
