//! Raw shard documents as written by the documentation generator.
//!
//! Each shard is a small JavaScript file:
//!
//! ```text
//! var searchData=
//! [
//!   ['ledger_1234',['Ledger',['../classripple_1_1Ledger.html',1,'ripple']]],
//!   ...
//! ];
//! ```
//!
//! The payload is decoded into a [`serde_json::Value`] so the normalizer can
//! work on one tagged tree regardless of where the shard came from.

use std::path::Path;

use docsearch_core::Category;
use serde_json::Value;

use crate::error::{LoadError, MalformedShardError};

/// One shard as handed over by the generator, not yet normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct RawShard {
    /// Opaque shard identifier, e.g. `classes_c`.
    pub id: String,
    pub category: Category,
    /// Expected to be an array of raw entries; checked at load time.
    pub entries: Value,
}

impl RawShard {
    /// Builds a shard whose category is derived from the `<category>_<bucket>`
    /// naming used by the generator.
    pub fn new(id: impl Into<String>, entries: Value) -> Result<Self, MalformedShardError> {
        let id = id.into();
        let category = category_from_shard_id(&id)?;
        Ok(Self {
            id,
            category,
            entries,
        })
    }

    /// Builds a shard with an explicit category; `id` stays opaque.
    pub fn with_category(id: impl Into<String>, category: Category, entries: Value) -> Self {
        Self {
            id: id.into(),
            category,
            entries,
        }
    }

    /// Decodes a generator `search/*.js` document.
    pub fn from_search_data(id: impl Into<String>, text: &str) -> Result<Self, MalformedShardError> {
        let id = id.into();
        let category = category_from_shard_id(&id)?;
        let entries = parse_search_data(text).map_err(|err| MalformedShardError::Syntax {
            shard: id.clone(),
            offset: err.offset,
            message: err.message.to_string(),
        })?;
        Ok(Self {
            id,
            category,
            entries,
        })
    }
}

fn category_from_shard_id(id: &str) -> Result<Category, MalformedShardError> {
    let prefix = id.rsplit_once('_').map_or(id, |(prefix, _bucket)| prefix);
    prefix
        .parse()
        .map_err(|_| MalformedShardError::UnknownCategory {
            shard: id.to_string(),
            category: prefix.to_string(),
        })
}

/// Position and reason of a decoding failure in a search data document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntaxError {
    pub offset: usize,
    pub message: &'static str,
}

/// Decodes the array literal of a `var searchData = [...];` document.
///
/// Accepts single- or double-quoted strings, integers, `true`/`false`/`null`
/// and nested arrays. Trailing commas are tolerated. The `var name =` prefix
/// and trailing `;` are optional.
pub fn parse_search_data(text: &str) -> Result<Value, SyntaxError> {
    let mut parser = Parser { text, pos: 0 };
    parser.skip_ws();
    parser.skip_assignment_prefix();
    parser.skip_ws();
    let value = parser.parse_value()?;
    parser.skip_ws();
    if parser.peek() == Some(';') {
        parser.bump();
        parser.skip_ws();
    }
    if parser.pos != text.len() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(value)
}

struct Parser<'a> {
    text: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn rest(&self) -> &str {
        &self.text[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn error(&self, message: &'static str) -> SyntaxError {
        SyntaxError {
            offset: self.pos,
            message,
        }
    }

    fn skip_ws(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.text.len() - trimmed.len();
    }

    fn skip_assignment_prefix(&mut self) {
        let Some(after_var) = self.rest().strip_prefix("var") else {
            return;
        };
        if !after_var.starts_with(char::is_whitespace) {
            return;
        }
        if let Some(eq) = after_var.find('=') {
            // `var` + identifier + `=`
            self.pos += "var".len() + eq + 1;
        }
    }

    fn parse_value(&mut self) -> Result<Value, SyntaxError> {
        match self.peek() {
            Some('[') => self.parse_array(),
            Some(quote @ ('\'' | '"')) => self.parse_string(quote).map(Value::String),
            Some(ch) if ch == '-' || ch.is_ascii_digit() => self.parse_integer(),
            Some(ch) if ch.is_ascii_alphabetic() => self.parse_keyword(),
            Some(_) => Err(self.error("unexpected character")),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn parse_array(&mut self) -> Result<Value, SyntaxError> {
        self.bump();
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() == Some(']') {
                self.bump();
                return Ok(Value::Array(items));
            }
            items.push(self.parse_value()?);
            self.skip_ws();
            match self.bump() {
                Some(',') => continue,
                Some(']') => return Ok(Value::Array(items)),
                Some(_) => return Err(self.error("expected `,` or `]`")),
                None => return Err(self.error("unterminated array")),
            }
        }
    }

    fn parse_string(&mut self, quote: char) -> Result<String, SyntaxError> {
        self.bump();
        let mut out = String::new();
        loop {
            let Some(ch) = self.bump() else {
                return Err(self.error("unterminated string"));
            };
            if ch == quote {
                return Ok(out);
            }
            if ch != '\\' {
                out.push(ch);
                continue;
            }
            let Some(escaped) = self.bump() else {
                return Err(self.error("unterminated escape"));
            };
            match escaped {
                'n' => out.push('\n'),
                't' => out.push('\t'),
                'r' => out.push('\r'),
                '0' => out.push('\0'),
                'x' => out.push(self.parse_hex_escape(2)?),
                'u' => out.push(self.parse_hex_escape(4)?),
                other => out.push(other),
            }
        }
    }

    fn parse_hex_escape(&mut self, digits: usize) -> Result<char, SyntaxError> {
        let hex = self
            .rest()
            .get(..digits)
            .filter(|hex| hex.bytes().all(|b| b.is_ascii_hexdigit()))
            .ok_or_else(|| self.error("invalid hex escape"))?;
        let code = u32::from_str_radix(hex, 16).map_err(|_| self.error("invalid hex escape"))?;
        let ch = char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER);
        self.pos += digits;
        Ok(ch)
    }

    fn parse_integer(&mut self) -> Result<Value, SyntaxError> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.bump();
        }
        let digits = self.rest().bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            return Err(self.error("expected digits"));
        }
        self.pos += digits;
        let literal = &self.text[start..self.pos];
        literal
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| SyntaxError {
                offset: start,
                message: "integer out of range",
            })
    }

    fn parse_keyword(&mut self) -> Result<Value, SyntaxError> {
        let len = self
            .rest()
            .bytes()
            .take_while(u8::is_ascii_alphanumeric)
            .count();
        let word = &self.rest()[..len];
        let value = match word {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            "null" => Value::Null,
            _ => return Err(self.error("unexpected identifier")),
        };
        self.pos += len;
        Ok(value)
    }
}

/// Reads every `<category>_<bucket>.js` shard in a generator `search/`
/// directory.
///
/// Files are visited in file-name order. Files whose name does not start with
/// a known category (the generator also writes `search.js`, `searchdata.js`,
/// ...) are ignored. Files that cannot be read or decoded are returned as
/// rejected shards; only a failure to list the directory is an error.
pub fn load_search_dir(
    dir: &Path,
) -> Result<(Vec<RawShard>, Vec<MalformedShardError>), LoadError> {
    let read_dir = std::fs::read_dir(dir).map_err(|source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<_> = read_dir
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "js"))
        .collect();
    paths.sort();

    let mut shards = Vec::new();
    let mut rejected = Vec::new();
    for path in paths {
        let Some(id) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        if category_from_shard_id(id).is_err() {
            tracing::debug!(
                target = "docsearch.index",
                file = %path.display(),
                "skipping non-shard search file"
            );
            continue;
        }

        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) => {
                rejected.push(MalformedShardError::Unreadable {
                    shard: id.to_string(),
                    message: err.to_string(),
                });
                continue;
            }
        };

        match RawShard::from_search_data(id, &text) {
            Ok(shard) => shards.push(shard),
            Err(err) => rejected.push(err),
        }
    }

    Ok((shards, rejected))
}
