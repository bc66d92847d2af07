use std::path::PathBuf;

use thiserror::Error;

/// A whole shard was rejected. Loading continues with the remaining shards.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedShardError {
    #[error("shard `{shard}`: syntax error at byte {offset}: {message}")]
    Syntax {
        shard: String,
        offset: usize,
        message: String,
    },

    #[error("shard `{shard}`: unknown category `{category}`")]
    UnknownCategory { shard: String, category: String },

    #[error("shard `{shard}`: expected an array of entries, found {found}")]
    NotAnArray { shard: String, found: &'static str },

    #[error("shard `{shard}`: failed to read shard file: {message}")]
    Unreadable { shard: String, message: String },
}

impl MalformedShardError {
    /// Identifier of the rejected shard.
    pub fn shard(&self) -> &str {
        match self {
            MalformedShardError::Syntax { shard, .. }
            | MalformedShardError::UnknownCategory { shard, .. }
            | MalformedShardError::NotAnArray { shard, .. }
            | MalformedShardError::Unreadable { shard, .. } => shard,
        }
    }
}

/// A single entry was skipped; its siblings load normally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidEntryShapeError {
    #[error("entry is not a `[key, [name, locations...]]` pair")]
    NotAPair,

    #[error("entry key is not a string")]
    KeyNotString,

    #[error("entry key is empty")]
    EmptyKey,

    #[error("entry has no display name")]
    MissingDisplayName,

    #[error("entry has no locations")]
    NoLocations,

    #[error("location {location} is not a `[url, target, scope]` array")]
    LocationNotArray { location: usize },

    #[error("location {location} has a non-string url")]
    UrlNotString { location: usize },

    #[error("location {location} has a non-string scope")]
    ScopeNotString { location: usize },

    #[error("location {location} has a non-integer target flag")]
    TargetNotInteger { location: usize },

    #[error("sort key `{sort_key}` already exists in bucket")]
    DuplicateSortKey { sort_key: String },
}

/// The caller handed the match engine something that is not text.
///
/// Text queries never fail; the ones no entry can match return no hits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidQueryError {
    #[error("query is not valid UTF-8 (valid up to byte {valid_up_to})")]
    NotUtf8 { valid_up_to: usize },
}

/// Failure to enumerate a search directory at all.
///
/// Per-file problems are not errors; they surface as rejected shards.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read search directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
