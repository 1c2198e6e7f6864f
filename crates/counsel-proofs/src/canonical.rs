//! Canonical JSON and content hashing for proof tokens.
//!
//! Proof tokens must be reproducible: semantically identical payloads
//! have to hash to identical tokens regardless of key order or
//! formatting. This module implements the RFC 8785 (JCS) subset needed
//! for that guarantee - object keys sorted by UTF-16 code units, minimal
//! string escaping, no insignificant whitespace - and hashes the
//! canonical bytes with SHA-256.

use sha2::{Digest, Sha256};

/// A 32-byte SHA-256 digest.
pub type Digest32 = [u8; 32];

/// Canonicalizes a JSON value to a deterministic string.
///
/// # Example
///
/// ```
/// use counsel_proofs::canonical::canonicalize;
/// use serde_json::json;
///
/// let a = canonicalize(&json!({"b": 1, "a": 2}));
/// let b = canonicalize(&json!({"a": 2, "b": 1}));
/// assert_eq!(a, b);
/// assert_eq!(a, r#"{"a":2,"b":1}"#);
/// ```
pub fn canonicalize(value: &serde_json::Value) -> String {
    let mut out = String::new();
    write_value(value, &mut out);
    out
}

/// SHA-256 over the canonical form of a JSON value.
pub fn hash_canonical(value: &serde_json::Value) -> Digest32 {
    let mut hasher = Sha256::new();
    hasher.update(canonicalize(value).as_bytes());
    hasher.finalize().into()
}

/// Lowercase-hex SHA-256 over the canonical form of a JSON value.
pub fn hash_hex(value: &serde_json::Value) -> String {
    let digest = hash_canonical(value);
    let mut out = String::with_capacity(64);
    for byte in digest {
        out.push_str(&format!("{:02x}", byte));
    }
    out
}

fn write_value(value: &serde_json::Value, out: &mut String) {
    match value {
        serde_json::Value::Null => out.push_str("null"),
        serde_json::Value::Bool(true) => out.push_str("true"),
        serde_json::Value::Bool(false) => out.push_str("false"),
        serde_json::Value::Number(n) => write_number(n, out),
        serde_json::Value::String(s) => write_string(s, out),
        serde_json::Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(item, out);
            }
            out.push(']');
        }
        serde_json::Value::Object(map) => {
            let mut entries: Vec<(&String, &serde_json::Value)> = map.iter().collect();
            entries.sort_by(|(a, _), (b, _)| compare_utf16(a, b));
            out.push('{');
            for (i, (key, value)) in entries.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(key, out);
                out.push(':');
                write_value(value, out);
            }
            out.push('}');
        }
    }
}

/// Minimal number form: integers without a fraction, floats via Rust's
/// shortest round-trip formatting. Whole-valued floats collapse to the
/// integer form so `1.0` and `1` hash identically.
fn write_number(n: &serde_json::Number, out: &mut String) {
    if let Some(i) = n.as_i64() {
        out.push_str(&i.to_string());
    } else if let Some(u) = n.as_u64() {
        out.push_str(&u.to_string());
    } else if let Some(f) = n.as_f64() {
        if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
            out.push_str(&(f as i64).to_string());
        } else {
            out.push_str(&format!("{}", f));
        }
    } else {
        out.push_str(&n.to_string());
    }
}

/// Minimal escaping: quote, backslash and control characters only.
fn write_string(s: &str, out: &mut String) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\x08' => out.push_str("\\b"),
            '\x0C' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c < '\x20' => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

/// RFC 8785 key order: lexicographic over UTF-16 code units.
fn compare_utf16(a: &str, b: &str) -> std::cmp::Ordering {
    a.encode_utf16().cmp(b.encode_utf16())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalars() {
        assert_eq!(canonicalize(&json!(null)), "null");
        assert_eq!(canonicalize(&json!(true)), "true");
        assert_eq!(canonicalize(&json!(-3)), "-3");
        assert_eq!(canonicalize(&json!("hi")), r#""hi""#);
    }

    #[test]
    fn test_whole_float_collapses_to_integer() {
        assert_eq!(canonicalize(&json!(1.0)), "1");
        assert_eq!(canonicalize(&json!(0.75)), "0.75");
    }

    #[test]
    fn test_key_order_is_deterministic() {
        let a = json!({"z": 1, "a": {"y": 2, "b": 3}});
        let b = json!({"a": {"b": 3, "y": 2}, "z": 1});
        assert_eq!(canonicalize(&a), canonicalize(&b));
        assert_eq!(canonicalize(&a), r#"{"a":{"b":3,"y":2},"z":1}"#);
    }

    #[test]
    fn test_string_escaping() {
        assert_eq!(canonicalize(&json!("a\"b\\c\nd")), r#""a\"b\\c\nd""#);
    }

    #[test]
    fn test_array_order_preserved() {
        assert_eq!(canonicalize(&json!([3, 1, 2])), "[3,1,2]");
    }

    #[test]
    fn test_hash_deterministic() {
        let a = json!({"b": 1, "a": 2});
        let b = json!({"a": 2, "b": 1});
        assert_eq!(hash_hex(&a), hash_hex(&b));
    }

    #[test]
    fn test_hash_distinguishes_values() {
        assert_ne!(hash_hex(&json!({"a": 1})), hash_hex(&json!({"a": 2})));
    }

    #[test]
    fn test_hex_is_lowercase_64_chars() {
        let hex = hash_hex(&json!({"x": 1}));
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
