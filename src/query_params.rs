//! Query-parameter codec: the routing/filter state as an ordered map of
//! string keys to one-or-many string values, with an equality-gated merge so
//! callers only navigate when something actually changed.

use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    One(String),
    Many(Vec<String>),
}

impl QueryValue {
    /// A many-valued parameter resolves to its first element.
    pub fn first(&self) -> Option<&str> {
        match self {
            QueryValue::One(value) => Some(value.as_str()),
            QueryValue::Many(values) => values.first().map(String::as_str),
        }
    }
}

pub type QueryMap = BTreeMap<String, QueryValue>;

pub fn get_first<'a>(params: &'a QueryMap, key: &str) -> Option<&'a str> {
    params.get(key).and_then(QueryValue::first)
}

/// Selected-match extraction. Missing or empty yields no selection; that is
/// the Home state, not an error.
pub fn get_match_id(params: &QueryMap) -> Option<String> {
    get_first(params, "match_id")
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

pub fn get_bool(params: &QueryMap, key: &str, default: bool) -> bool {
    match get_first(params, key) {
        Some(raw) => matches!(
            raw.trim().to_lowercase().as_str(),
            "true" | "1" | "yes" | "y" | "t"
        ),
        None => default,
    }
}

/// Merge the desired key/value pairs into the current parameter set,
/// touching only the named keys. Returns None when every desired value is
/// already present (a missing key and an empty value compare equal), so the
/// caller can skip a redundant update.
pub fn merge_update(current: &QueryMap, desired: &[(&str, String)]) -> Option<QueryMap> {
    let changed = desired.iter().any(|(key, value)| {
        let existing = get_first(current, key).unwrap_or("");
        existing != value.as_str()
    });
    if !changed {
        return None;
    }

    let mut next = current.clone();
    for (key, value) in desired {
        next.insert((*key).to_string(), QueryValue::One(value.clone()));
    }
    Some(next)
}

/// Parse a query string ("a=1&b=2", leading '?' tolerated). Repeated keys
/// collect into a many-valued entry.
pub fn parse(raw: &str) -> QueryMap {
    let trimmed = raw.trim().trim_start_matches('?');
    let mut params = QueryMap::new();
    if trimmed.is_empty() {
        return params;
    }

    for pair in trimmed.split('&') {
        if pair.is_empty() {
            continue;
        }
        let (key, value) = match pair.split_once('=') {
            Some((key, value)) => (percent_decode(key), percent_decode(value)),
            None => (percent_decode(pair), String::new()),
        };
        if key.is_empty() {
            continue;
        }
        match params.remove(&key) {
            None => {
                params.insert(key, QueryValue::One(value));
            }
            Some(QueryValue::One(existing)) => {
                params.insert(key, QueryValue::Many(vec![existing, value]));
            }
            Some(QueryValue::Many(mut values)) => {
                values.push(value);
                params.insert(key, QueryValue::Many(values));
            }
        }
    }
    params
}

/// Encode back to a query string; BTreeMap keeps the output stable.
pub fn encode(params: &QueryMap) -> String {
    let mut parts = Vec::new();
    for (key, value) in params {
        match value {
            QueryValue::One(v) => parts.push(format!("{}={}", percent_encode(key), percent_encode(v))),
            QueryValue::Many(values) => {
                for v in values {
                    parts.push(format!("{}={}", percent_encode(key), percent_encode(v)));
                }
            }
        }
    }
    parts.join("&")
}

fn percent_encode(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

fn percent_decode(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' if i + 2 < bytes.len() => {
                match (hex_val(bytes[i + 1]), hex_val(bytes[i + 2])) {
                    (Some(hi), Some(lo)) => {
                        out.push(hi * 16 + lo);
                        i += 3;
                    }
                    // Malformed escape stays literal.
                    _ => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            other => {
                out.push(other);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_val(byte: u8) -> Option<u8> {
    (byte as char).to_digit(16).map(|v| v as u8)
}

#[cfg(test)]
mod tests {
    use super::{percent_decode, percent_encode};

    #[test]
    fn encode_decode_round_trip() {
        for raw in ["plain", "with space", "a&b=c", "100%", "ümlaut"] {
            assert_eq!(percent_decode(&percent_encode(raw)), raw);
        }
    }

    #[test]
    fn decode_tolerates_malformed_escapes() {
        assert_eq!(percent_decode("%zz"), "%zz");
        assert_eq!(percent_decode("trailing%"), "trailing%");
        assert_eq!(percent_decode("a+b"), "a b");
    }
}
