//! Entry normalization: raw positional arrays into [`Entry`] records.

use std::borrow::Cow;

use serde::Serialize;
use serde_json::Value;

use crate::error::InvalidEntryShapeError;

/// How a result link should be opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkTarget {
    /// Replace the documentation frame (generator flag `1`).
    Parent,
    /// Open a new window (generator flag `0`).
    NewWindow,
}

/// One declaration site of a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Location {
    pub url: String,
    /// Fully-qualified containing scope, e.g. `ripple::test::csf`.
    pub scope: String,
    pub target: LinkTarget,
}

impl Location {
    pub fn new(url: impl Into<String>, scope: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            scope: scope.into(),
            target: LinkTarget::Parent,
        }
    }

    /// `true` for absolute links to external reference pages.
    pub fn is_external(&self) -> bool {
        let url = self.url.as_bytes();
        let has_scheme = |scheme: &[u8]| {
            url.len() >= scheme.len() && url[..scheme.len()].eq_ignore_ascii_case(scheme)
        };
        has_scheme(b"http://") || has_scheme(b"https://")
    }
}

/// The atomic searchable unit.
///
/// Entries are immutable: every field is set at construction and only
/// exposed through shared accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    sort_key: String,
    /// Length in bytes of the base name prefix of `sort_key`.
    base_len: usize,
    ordinal: Option<u64>,
    display_name: String,
    locations: Vec<Location>,
}

impl Entry {
    /// Builds an entry from an already unescaped sort key such as
    /// `ledger_1`.
    ///
    /// The key is lowercased; a trailing `_<digits>` is treated as the
    /// disambiguating ordinal.
    pub fn new(
        sort_key: &str,
        display_name: impl Into<String>,
        locations: Vec<Location>,
    ) -> Result<Self, InvalidEntryShapeError> {
        let (base, ordinal) = split_ordinal(sort_key);
        Self::from_parts(fold(base).into_owned(), ordinal, display_name.into(), locations)
    }

    fn from_parts(
        base: String,
        ordinal: Option<u64>,
        display_name: String,
        locations: Vec<Location>,
    ) -> Result<Self, InvalidEntryShapeError> {
        if base.is_empty() {
            return Err(InvalidEntryShapeError::EmptyKey);
        }
        if display_name.is_empty() {
            return Err(InvalidEntryShapeError::MissingDisplayName);
        }
        if locations.is_empty() {
            return Err(InvalidEntryShapeError::NoLocations);
        }

        let base_len = base.len();
        let sort_key = match ordinal {
            Some(ordinal) => format!("{base}_{ordinal}"),
            None => base,
        };

        Ok(Self {
            sort_key,
            base_len,
            ordinal,
            display_name,
            locations,
        })
    }

    /// Normalized, unique key (`name_<ordinal>`).
    pub fn sort_key(&self) -> &str {
        &self.sort_key
    }

    /// The sort key without its disambiguating suffix.
    pub fn base_name(&self) -> &str {
        &self.sort_key[..self.base_len]
    }

    pub fn ordinal(&self) -> Option<u64> {
        self.ordinal
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Never empty; generator order.
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// Bucket character: the first character of the sort key.
    pub fn letter(&self) -> char {
        // `from_parts` rejects empty base names.
        self.sort_key.chars().next().unwrap_or('\0')
    }

    pub(crate) fn heap_bytes(&self) -> u64 {
        let mut bytes = self.sort_key.capacity() as u64;
        bytes = bytes.saturating_add(self.display_name.capacity() as u64);
        bytes = bytes.saturating_add(
            (self.locations.capacity() * std::mem::size_of::<Location>()) as u64,
        );
        for loc in &self.locations {
            bytes = bytes.saturating_add(loc.url.capacity() as u64);
            bytes = bytes.saturating_add(loc.scope.capacity() as u64);
        }
        bytes
    }
}

/// Normalizes one raw generator entry:
/// `[rawKey, [displayName, [url, target, scope], ...]]`.
pub fn normalize(raw: &Value) -> Result<Entry, InvalidEntryShapeError> {
    let items = raw.as_array().ok_or(InvalidEntryShapeError::NotAPair)?;
    let [key, tail] = items.as_slice() else {
        return Err(InvalidEntryShapeError::NotAPair);
    };

    let key = key.as_str().ok_or(InvalidEntryShapeError::KeyNotString)?;
    let tail = tail.as_array().ok_or(InvalidEntryShapeError::NotAPair)?;

    let (display_name, raw_locations) = match tail.split_first() {
        Some((Value::String(name), rest)) => (name, rest),
        _ => return Err(InvalidEntryShapeError::MissingDisplayName),
    };

    let locations = raw_locations
        .iter()
        .enumerate()
        .map(|(location, raw)| normalize_location(location, raw))
        .collect::<Result<Vec<_>, _>>()?;

    let (escaped, ordinal) = split_ordinal(key);
    let base = fold(&unescape_key(escaped)).into_owned();

    Entry::from_parts(
        base,
        ordinal,
        decode_html(display_name).into_owned(),
        locations,
    )
}

fn normalize_location(location: usize, raw: &Value) -> Result<Location, InvalidEntryShapeError> {
    let items = raw
        .as_array()
        .ok_or(InvalidEntryShapeError::LocationNotArray { location })?;

    let (url, target, scope) = match items.as_slice() {
        [url, target, scope] => (url, Some(target), scope),
        [url, scope] => (url, None, scope),
        _ => return Err(InvalidEntryShapeError::LocationNotArray { location }),
    };

    let url = url
        .as_str()
        .ok_or(InvalidEntryShapeError::UrlNotString { location })?;
    let scope = scope
        .as_str()
        .ok_or(InvalidEntryShapeError::ScopeNotString { location })?;
    let target = match target {
        None => LinkTarget::Parent,
        Some(Value::Bool(flag)) => link_target(*flag),
        Some(flag) => link_target(
            flag.as_i64()
                .ok_or(InvalidEntryShapeError::TargetNotInteger { location })?
                != 0,
        ),
    };

    Ok(Location {
        url: url.to_string(),
        scope: decode_html(scope).into_owned(),
        target,
    })
}

fn link_target(parent: bool) -> LinkTarget {
    if parent {
        LinkTarget::Parent
    } else {
        LinkTarget::NewWindow
    }
}

/// Splits `name_123` into (`name`, `Some(123)`).
fn split_ordinal(key: &str) -> (&str, Option<u64>) {
    let Some((base, suffix)) = key.rsplit_once('_') else {
        return (key, None);
    };
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return (key, None);
    }
    match suffix.parse() {
        Ok(ordinal) => (base, Some(ordinal)),
        Err(_) => (key, None),
    }
}

/// Decodes the generator's `_XX` byte escapes (`map_5ftype` → `map_type`).
///
/// A `_` not followed by two hex digits is kept literally.
pub fn unescape_key(escaped: &str) -> Cow<'_, str> {
    if !escaped.contains('_') {
        return Cow::Borrowed(escaped);
    }

    let bytes = escaped.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'_' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                out.push(hi << 4 | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    Cow::Owned(String::from_utf8_lossy(&out).into_owned())
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Decodes the HTML character references the generator writes into names
/// and scopes (`logstream_buf&lt; CharT &gt;`).
pub fn decode_html(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let decoded = rest
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_reference(&rest[1..semi]).map(|ch| (ch, semi)));
        match decoded {
            Some((ch, semi)) => {
                out.push(ch);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn decode_reference(name: &str) -> Option<char> {
    match name {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let numeric = name.strip_prefix('#')?;
            let code = match numeric.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => numeric.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

fn fold(text: &str) -> Cow<'_, str> {
    if text.is_ascii() {
        if text.bytes().any(|b| b.is_ascii_uppercase()) {
            Cow::Owned(text.to_ascii_lowercase())
        } else {
            Cow::Borrowed(text)
        }
    } else {
        Cow::Owned(text.to_lowercase())
    }
}
