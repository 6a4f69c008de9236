#![forbid(unsafe_code)]

//! Shareable link building and query-string lookup.
//!
//! Links have the form `<base>?<key>=<picture>`. The base is whatever page
//! address the host serves from; an existing query or fragment on it is
//! dropped. Only the picture parameter is read back, so nothing else in the
//! query needs to survive.

use std::borrow::Cow;

use crate::picture::{Picture, encode_for_url};

/// Query key carrying the picture unless configured otherwise.
pub const DEFAULT_PARAM_KEY: &str = "picture";

/// Build the shareable link for `picture`.
#[must_use]
pub fn build_link(base: &str, key: &str, picture: Picture) -> String {
    let base = base.split(['?', '#']).next().unwrap_or_default();
    format!("{base}?{key}={}", encode_for_url(picture))
}

/// Value of `key` in `query`, percent-decoded.
///
/// `query` may start with `?`. When the key repeats, the first occurrence
/// wins. A key with no `=` yields an empty value.
#[must_use]
pub fn query_param<'a>(query: &'a str, key: &str) -> Option<Cow<'a, str>> {
    let query = query.strip_prefix('?').unwrap_or(query);
    let query = query.split('#').next().unwrap_or_default();
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .find(|(name, _)| percent_decode(name) == key)
        .map(|(_, value)| percent_decode(value))
}

/// Decode `%XX` escapes and `+` (as space). Malformed escapes pass through
/// unchanged; invalid UTF-8 is replaced.
#[must_use]
pub fn percent_decode(input: &str) -> Cow<'_, str> {
    if !input.bytes().any(|b| b == b'%' || b == b'+') {
        return Cow::Borrowed(input);
    }

    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' => match (bytes.get(i + 1), bytes.get(i + 2)) {
                (Some(&hi), Some(&lo)) => match (hex_value(hi), hex_value(lo)) {
                    (Some(hi), Some(lo)) => {
                        out.push((hi << 4) | lo);
                        i += 3;
                    }
                    _ => {
                        out.push(b'%');
                        i += 1;
                    }
                },
                _ => {
                    out.push(b'%');
                    i += 1;
                }
            },
            other => {
                out.push(other);
                i += 1;
            }
        }
    }
    Cow::Owned(String::from_utf8_lossy(&out).into_owned())
}

const fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}
