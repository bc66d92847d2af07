//! Prefix matching primitives used by the docsearch query engine.
//!
//! Matching is case-insensitive and always anchored at the start of a token:
//! either the start of a symbol's primary name, or the start of one of the
//! components a display name or scope splits into (`ripple::LedgerMaster`
//! has the components `ripple` and `LedgerMaster`).
//!
//! ## Case folding
//!
//! Queries are folded once with [`fold_query`] (trim + lowercase). Candidates
//! are folded lazily while comparing, so scoring a candidate never allocates.
//! ASCII inputs take a byte-wise fast path; anything else is compared with
//! `char::to_lowercase`, which handles expansions such as `İ → i̇`.

#![forbid(unsafe_code)]

mod components;
mod scoring;

pub use components::{components, is_component_separator, Components};
pub use scoring::{MatchKind, MatchScore, PrefixMatcher, RankKey};

/// Normalizes raw user input into the form matched against the index.
///
/// Leading and trailing whitespace is dropped and the result is lowercased.
pub fn fold_query(query: &str) -> String {
    let trimmed = query.trim();
    if trimmed.is_ascii() {
        return trimmed.to_ascii_lowercase();
    }
    trimmed.to_lowercase()
}

/// Returns `true` if `candidate` starts with `query_folded`, comparing
/// `candidate` case-insensitively.
///
/// `query_folded` must already be lowercased (see [`fold_query`]).
pub fn starts_with_folded(candidate: &str, query_folded: &str) -> bool {
    if candidate.is_ascii() && query_folded.is_ascii() {
        let c = candidate.as_bytes();
        let q = query_folded.as_bytes();
        if q.len() > c.len() {
            return false;
        }
        return c
            .iter()
            .zip(q.iter())
            .all(|(&c, &q)| c.to_ascii_lowercase() == q);
    }

    let mut folded = candidate.chars().flat_map(char::to_lowercase);
    query_folded
        .chars()
        .all(|q| folded.next().is_some_and(|c| c == q))
}

/// Returns `true` if `candidate`, once folded, is exactly `query_folded`.
pub fn eq_folded(candidate: &str, query_folded: &str) -> bool {
    if candidate.is_ascii() && query_folded.is_ascii() {
        return candidate.len() == query_folded.len()
            && starts_with_folded(candidate, query_folded);
    }

    candidate
        .chars()
        .flat_map(char::to_lowercase)
        .eq(query_folded.chars())
}
