//! utils.rs
//! Truncation helpers and content-type naming rules.
use std::fmt;
use num_enum::TryFromPrimitive;

use crate::constants::{DICT_FILE_SUFFIX, DICT_TYPE_SEPARATOR};

/// First `limit` bytes of `content` (all of it when shorter).
#[inline]
pub fn head(content: &[u8], limit: usize) -> &[u8] {
    if content.len() > limit {
        &content[..limit]
    } else {
        content
    }
}

/// Last `limit` bytes of `content` (all of it when shorter).
#[inline]
pub fn tail(content: &[u8], limit: usize) -> &[u8] {
    if content.len() > limit {
        &content[content.len() - limit..]
    } else {
        content
    }
}

/// Append `extra` to `window`, then keep only its last `limit` bytes.
///
/// The window never holds more than `limit` bytes once this returns.
pub fn append_tail_window(window: &mut Vec<u8>, extra: &[u8], limit: usize) {
    if extra.len() >= limit {
        window.clear();
        window.extend_from_slice(tail(extra, limit));
        return;
    }
    window.extend_from_slice(extra);
    if window.len() > limit {
        let excess = window.len() - limit;
        window.drain(..excess);
    }
}

/// Canonical content type key: the part before any `;` parameters, trimmed.
pub fn content_type_key(raw: &str) -> &str {
    raw.split(';').next().unwrap_or("").trim()
}

/// File name of the static dictionary for a content type.
pub fn dict_file_name(content_type: &str) -> String {
    format!("{}{}", content_type.replace('/', DICT_TYPE_SEPARATOR), DICT_FILE_SUFFIX)
}

/// Inverse of [`dict_file_name`]; `None` when the name lacks the suffix.
pub fn content_type_from_dict_file(file_name: &str) -> Option<String> {
    file_name
        .strip_suffix(DICT_FILE_SUFFIX)
        .map(|stem| stem.replace(DICT_TYPE_SEPARATOR, "/"))
}

pub fn enum_name_or_hex<T>(raw: T::Primitive) -> String
where
    T: TryFromPrimitive + fmt::Debug,
    T::Primitive: fmt::LowerHex,
{
    match T::try_from_primitive(raw) {
        Ok(variant) => format!("{:?}", variant),
        Err(_) => format!("0x{:x}", raw),
    }
}
