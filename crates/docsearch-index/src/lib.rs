//! Sharded documentation symbol index.
//!
//! Shards produced by the documentation generator are decoded
//! ([`parse_search_data`]), normalized into [`Entry`] records, filed into
//! `(category, letter)` buckets of an immutable [`ShardStore`], matched per
//! keystroke ([`ShardStore::search`]) and grouped for display ([`rank()`]).

mod error;
mod normalize;
mod rank;
mod raw;
mod search;
mod store;

pub use docsearch_core::{Category, ShardKey};
pub use docsearch_matcher::{MatchKind, MatchScore};

pub use error::*;
pub use normalize::{decode_html, normalize, unescape_key, Entry, LinkTarget, Location};
pub use rank::{
    cmp_ranked, rank, RankOptions, RankedEntry, RankedGroup, ResultTuple, DEFAULT_PER_CATEGORY_CAP,
};
pub use raw::{load_search_dir, parse_search_data, RawShard, SyntaxError};
pub use search::{query_from_utf8, SearchHit, SearchOptions, SearchStats, DEFAULT_MAX_QUERY_LENGTH};
pub use store::{LoadReport, SharedStore, ShardStore, ShardStoreBuilder, SkippedEntry};
