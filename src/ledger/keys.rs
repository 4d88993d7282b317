// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Byte-level key layout for the ledger tables.
//!
//! ```text
//! private_state:   collection | 0x00 | key
//! private_history: collection | 0x00 | key | 0x00 | height_be
//! ```
//!
//! Collection names and simple keys never contain NUL, so the separator keeps
//! every collection (and every key's history) in one contiguous range.

/// Separator between key segments.
const SEP: u8 = 0x00;

/// Namespace prefix shared by all composite keys.
pub const COMPOSITE_KEY_NAMESPACE: char = '\u{0}';

/// Build a composite key:
/// `\0objectType\0attr1\0attr2\0...`.
pub fn composite_key(object_type: &str, attributes: &[&str]) -> String {
    let mut key = String::with_capacity(
        2 + object_type.len() + attributes.iter().map(|a| a.len() + 1).sum::<usize>(),
    );
    key.push(COMPOSITE_KEY_NAMESPACE);
    key.push_str(object_type);
    key.push(COMPOSITE_KEY_NAMESPACE);
    for attribute in attributes {
        key.push_str(attribute);
        key.push(COMPOSITE_KEY_NAMESPACE);
    }
    key
}

/// Key of a live value in `private_state`.
pub fn state_key(collection: &str, key: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(collection.len() + 1 + key.len());
    out.extend_from_slice(collection.as_bytes());
    out.push(SEP);
    out.extend_from_slice(key.as_bytes());
    out
}

/// Bounds `[start, end)` for a range scan over simple keys of a collection.
///
/// An empty `start` begins after the composite-key namespace; an empty `end`
/// runs to the end of the collection.
pub fn state_range(collection: &str, start: &str, end: &str) -> (Vec<u8>, Vec<u8>) {
    let lower = if start.is_empty() {
        let mut lower = state_key(collection, "");
        lower.push(SEP + 1);
        lower
    } else {
        state_key(collection, start)
    };

    let upper = if end.is_empty() {
        let mut upper = collection.as_bytes().to_vec();
        upper.push(SEP + 1);
        upper
    } else {
        state_key(collection, end)
    };

    (lower, upper)
}

/// Strip the collection prefix from a `private_state` key.
pub fn split_state_key<'a>(collection: &str, raw: &'a [u8]) -> Option<&'a str> {
    let prefix_len = collection.len() + 1;
    if raw.len() < prefix_len || &raw[..collection.len()] != collection.as_bytes() {
        return None;
    }
    std::str::from_utf8(&raw[prefix_len..]).ok()
}

/// Key of one historical version in `private_history`.
pub fn history_key(collection: &str, key: &str, height: u64) -> Vec<u8> {
    let mut out = history_prefix(collection, key);
    out.extend_from_slice(&height.to_be_bytes());
    out
}

/// Bounds `[start, end)` covering every version of one key.
pub fn history_range(collection: &str, key: &str) -> (Vec<u8>, Vec<u8>) {
    let start = history_prefix(collection, key);
    let mut end = state_key(collection, key);
    end.push(SEP + 1);
    (start, end)
}

fn history_prefix(collection: &str, key: &str) -> Vec<u8> {
    let mut out = state_key(collection, key);
    out.push(SEP);
    out
}
