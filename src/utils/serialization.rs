// src/utils/serialization.rs
//! Serialization utilities for certificate hashing.
//!
//! Provides:
//! - Deserialization of uploaded certificate bytes
//! - Dot-notation flattening of nested JSON documents
//! - The canonical compact JSON encoder used for target hashes
//!
//! # Canonical Encoding
//! Issued certificates were hashed with a compact encoder whose output differs
//! from `serde_json::to_string` in a few places. The encoder here reproduces it
//! byte for byte:
//! - `/` is escaped as `\/`
//! - every non-ASCII character is escaped as lowercase `\uXXXX` UTF-16 units
//! - integral floats drop the fraction (`1.0` is `1`); very large or small
//!   ones use `d.de±N` exponent form
//! - integers beyond `i64` are written as floats
//! - a singleton entry keyed by `0` is a list, not an object

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt::Write;

/// Deserializes a value from raw JSON bytes.
///
/// # Arguments
/// * `data` - UTF-8 JSON bytes
///
/// # Returns
/// - `Ok(T)` with deserialized value on success
/// - `Err(serde_json::Error)` if the bytes are not valid JSON for `T`
pub fn deserialize_slice<T: DeserializeOwned>(data: &[u8]) -> Result<T, serde_json::Error> {
    serde_json::from_slice(data)
}

/// Flattens a JSON value into `(dot.path, leaf)` pairs.
///
/// Objects and arrays are traversed; array indices become path segments.
/// Anything else is a leaf. Empty containers yield no pairs. When two routes
/// produce the same path (e.g. a literal `"a.b"` key next to `{"a": {"b": ..}}`)
/// the one visited later wins, keeping the position of the first.
///
/// Top-level leaves keyed by an integer (`"5"`, a list index) follow the
/// issuing side's merge rules: each time a top-level container is merged in,
/// the integer keys collected so far are renumbered `0..n` in order.
///
/// Traversal uses an explicit work stack, so document depth is bounded only by
/// memory.
pub fn flatten_dot_notation(root: &Value) -> Vec<(String, &Value)> {
    let mut leaves: Vec<(String, &Value)> = Vec::new();
    let mut integer_keys: Vec<bool> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    let mut stack: Vec<(String, &Value, bool)> = Vec::new();
    push_children(&mut stack, "", root, true);

    while let Some((path, value, top_level)) = stack.pop() {
        match value {
            Value::Object(_) | Value::Array(_) => {
                if top_level {
                    renumber_integer_keys(&mut leaves, &integer_keys, &mut positions);
                }
                push_children(&mut stack, &path, value, false);
            }
            leaf => match positions.get(&path) {
                Some(&index) => leaves[index].1 = leaf,
                None => {
                    positions.insert(path.clone(), leaves.len());
                    integer_keys.push(top_level && is_integer_key(&path));
                    leaves.push((path, leaf));
                }
            },
        }
    }

    leaves
}

/// Pushes the children of a container in reverse so they pop in document order.
fn push_children<'a>(
    stack: &mut Vec<(String, &'a Value, bool)>,
    prefix: &str,
    value: &'a Value,
    top_level: bool,
) {
    let join = |key: &str| {
        if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", prefix, key)
        }
    };

    match value {
        Value::Object(map) => {
            let children: Vec<_> = map.iter().collect();
            for (key, child) in children.into_iter().rev() {
                stack.push((join(key.as_str()), child, top_level));
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate().rev() {
                stack.push((join(index.to_string().as_str()), child, top_level));
            }
        }
        _ => {}
    }
}

/// True for keys that decode to an integer array key: canonical decimal
/// without leading zeros, `+`, or `-0`, within `i64`.
fn is_integer_key(key: &str) -> bool {
    key.parse::<i64>().map_or(false, |n| n.to_string() == key)
}

/// Rewrites integer-keyed leaves to `0..n` in their current order.
fn renumber_integer_keys(
    leaves: &mut [(String, &Value)],
    integer_keys: &[bool],
    positions: &mut HashMap<String, usize>,
) {
    // Renumbered keys may collide with old ones, so clear them all first.
    for ((path, _), int) in leaves.iter().zip(integer_keys) {
        if *int {
            positions.remove(path);
        }
    }

    let mut next: u64 = 0;
    for (index, ((path, _), &int)) in leaves.iter_mut().zip(integer_keys).enumerate() {
        if int {
            *path = next.to_string();
            positions.insert(path.clone(), index);
            next += 1;
        }
    }
}

/// Encodes a single flattened `{path: value}` entry canonically.
pub fn encode_leaf_entry(path: &str, value: &Value) -> String {
    let mut out = String::new();
    if path == "0" {
        // An integer key 0 makes the one-entry map a list.
        out.push('[');
        encode_into(&mut out, value);
        out.push(']');
    } else {
        out.push('{');
        encode_string(&mut out, path);
        out.push(':');
        encode_into(&mut out, value);
        out.push('}');
    }
    out
}

/// Encodes any JSON value with the canonical compact encoder.
pub fn encode_canonical(value: &Value) -> String {
    let mut out = String::new();
    encode_into(&mut out, value);
    out
}

fn encode_into(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Number(number) => {
            if number.is_i64() {
                out.push_str(&number.to_string());
            } else if let Some(float) = number.as_f64() {
                // u64 values past i64::MAX decode as floats on the issuing side.
                encode_float(out, float);
            }
        }
        Value::String(s) => encode_string(out, s),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                encode_into(out, item);
            }
            out.push(']');
        }
        Value::Object(map) => encode_object(out, map),
    }
}

fn encode_object(out: &mut String, map: &Map<String, Value>) {
    out.push('{');
    for (i, (key, item)) in map.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        encode_string(out, key);
        out.push(':');
        encode_into(out, item);
    }
    out.push('}');
}

fn encode_string(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '/' => out.push_str("\\/"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c if c.is_ascii() => out.push(c),
            c => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    let _ = write!(out, "\\u{:04x}", unit);
                }
            }
        }
    }
    out.push('"');
}

/// Writes a float using the shortest round-trip digits, switching to
/// exponent form when the decimal point falls outside `[-3, 17]`.
/// Integral values carry no fraction and negative zero keeps its sign.
fn encode_float(out: &mut String, value: f64) {
    if value.is_sign_negative() {
        out.push('-');
    }

    // `{:e}` yields the shortest round-trip mantissa, e.g. "1.2345e2".
    let exp_form = format!("{:e}", value.abs());
    let (mantissa, exponent) = match exp_form.split_once('e') {
        Some(parts) => parts,
        None => {
            out.push_str(&exp_form);
            return;
        }
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let decimal_point = exponent + 1;

    if decimal_point < -3 || decimal_point > 17 {
        out.push_str(&digits[..1]);
        out.push('.');
        if digits.len() > 1 {
            out.push_str(&digits[1..]);
        } else {
            out.push('0');
        }
        let _ = write!(out, "e{}{}", if exponent < 0 { '-' } else { '+' }, exponent.abs());
    } else if decimal_point <= 0 {
        out.push_str("0.");
        out.push_str(&"0".repeat(decimal_point.unsigned_abs() as usize));
        out.push_str(&digits);
    } else {
        let point = decimal_point as usize;
        if digits.len() <= point {
            out.push_str(&digits);
            out.push_str(&"0".repeat(point - digits.len()));
        } else {
            out.push_str(&digits[..point]);
            out.push('.');
            out.push_str(&digits[point..]);
        }
    }
}
