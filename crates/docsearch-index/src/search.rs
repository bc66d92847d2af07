//! Match engine: per-keystroke candidate lookup across shards.

use docsearch_core::{Category, ShardKey};
use docsearch_matcher::{MatchScore, PrefixMatcher};

use crate::error::InvalidQueryError;
use crate::normalize::Entry;
use crate::store::ShardStore;

pub const DEFAULT_MAX_QUERY_LENGTH: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Longest query that can match, in chars after trimming; longer
    /// queries return no hits.
    pub max_query_length: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_query_length: DEFAULT_MAX_QUERY_LENGTH,
        }
    }
}

/// One matched entry.
#[derive(Debug, Clone, Copy)]
pub struct SearchHit<'a> {
    pub entry: &'a Entry,
    pub category: Category,
    pub score: MatchScore,
    /// Position of the entry in its bucket.
    pub ordinal: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub buckets_scanned: usize,
    pub candidates_considered: usize,
}

impl ShardStore {
    /// Finds every entry the query matches.
    ///
    /// Hits come back in category order, then bucket order.
    pub fn search(&self, query: &str, options: &SearchOptions) -> Vec<SearchHit<'_>> {
        self.search_with_stats(query, options).0
    }

    pub fn search_with_stats(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> (Vec<SearchHit<'_>>, SearchStats) {
        let mut stats = SearchStats::default();
        if !is_searchable(query, options.max_query_length) {
            tracing::trace!(
                target = "docsearch.index",
                len = query.len(),
                "query cannot match any entry"
            );
            return (Vec::new(), stats);
        }

        let matcher = PrefixMatcher::new(query);
        // Only the buckets filed under the query's first character can hold
        // a match; an empty query selects none.
        let Some(letter) = matcher.first_letter() else {
            return (Vec::new(), stats);
        };

        let mut hits = Vec::new();
        for &category in self.categories() {
            let bucket = self.bucket(&ShardKey::new(category, letter));
            if bucket.is_empty() {
                continue;
            }
            stats.buckets_scanned += 1;
            stats.candidates_considered += bucket.len();

            for (ordinal, entry) in bucket.iter().enumerate() {
                if let Some(score) = score_entry(&matcher, entry) {
                    hits.push(SearchHit {
                        entry,
                        category,
                        score,
                        ordinal,
                    });
                }
            }
        }

        tracing::trace!(
            target = "docsearch.index",
            query = matcher.query(),
            hits = hits.len(),
            candidates = stats.candidates_considered,
            "search"
        );
        (hits, stats)
    }
}

/// Decodes a query handed over as raw bytes.
///
/// Text that is not UTF-8 is the one input the engine refuses outright.
pub fn query_from_utf8(raw: &[u8]) -> Result<&str, InvalidQueryError> {
    std::str::from_utf8(raw).map_err(|err| InvalidQueryError::NotUtf8 {
        valid_up_to: err.valid_up_to(),
    })
}

/// `false` for queries no entry can match: control characters never occur
/// in symbol names, and nothing is longer than `max_query_length`.
fn is_searchable(query: &str, max_query_length: usize) -> bool {
    let trimmed = query.trim();
    let mut len = 0usize;
    for ch in trimmed.chars() {
        if ch.is_control() {
            return false;
        }
        len += 1;
    }
    len <= max_query_length
}

fn score_entry(matcher: &PrefixMatcher, entry: &Entry) -> Option<MatchScore> {
    // Primary names: the normalized base name and the display name.
    let mut best = matcher.score_name(entry.base_name());
    best = MatchScore::best(best, matcher.score_name(entry.display_name()));
    if best.is_some() {
        // A primary-name match always outranks any component match.
        return best;
    }

    best = matcher.score_components(entry.display_name());
    for location in entry.locations() {
        best = MatchScore::best(best, matcher.score_components(&location.scope));
    }
    best
}
