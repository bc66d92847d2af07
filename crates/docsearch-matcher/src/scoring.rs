use crate::{components, eq_folded, fold_query, starts_with_folded};

/// The kind of match that was produced, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatchKind {
    /// The query is a prefix of one component of a display name or scope.
    ComponentPrefix,
    /// The query is a prefix of the symbol's primary name.
    NamePrefix,
    /// The query equals the symbol's primary name.
    Exact,
}

impl MatchKind {
    #[inline]
    const fn tier(self) -> i64 {
        match self {
            MatchKind::ComponentPrefix => 1,
            MatchKind::NamePrefix => 2,
            MatchKind::Exact => 3,
        }
    }
}

/// Score returned by [`PrefixMatcher`].
///
/// Only the kind of match counts; entries of the same kind tie and are
/// ordered by name downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatchScore {
    pub kind: MatchKind,
}

/// A key that defines stable ordering for matches.
///
/// This is returned by [`MatchScore::rank_key`] and can be used as a sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RankKey {
    kind: MatchKind,
}

impl MatchScore {
    pub const fn new(kind: MatchKind) -> Self {
        Self { kind }
    }

    pub fn rank_key(self) -> RankKey {
        RankKey { kind: self.kind }
    }

    /// The score as one integer: `3` exact, `2` name prefix, `1` component.
    pub fn value(self) -> i64 {
        self.kind.tier()
    }

    /// Picks the higher ranked of two optional scores; `a` wins ties.
    pub fn best(a: Option<MatchScore>, b: Option<MatchScore>) -> Option<MatchScore> {
        match (a, b) {
            (Some(a), Some(b)) if b.rank_key() > a.rank_key() => Some(b),
            (Some(a), _) => Some(a),
            (None, b) => b,
        }
    }
}

/// Reusable matcher holding a pre-folded query.
///
/// An empty query matches nothing.
#[derive(Debug, Clone)]
pub struct PrefixMatcher {
    query: String,
}

impl PrefixMatcher {
    pub fn new(query: &str) -> Self {
        Self {
            query: fold_query(query),
        }
    }

    /// The folded query.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_empty(&self) -> bool {
        self.query.is_empty()
    }

    /// Bucket character the query selects.
    pub fn first_letter(&self) -> Option<char> {
        self.query.chars().next()
    }

    /// Scores `name` as a primary name: [`MatchKind::Exact`] or
    /// [`MatchKind::NamePrefix`].
    pub fn score_name(&self, name: &str) -> Option<MatchScore> {
        if self.query.is_empty() || !starts_with_folded(name, &self.query) {
            return None;
        }

        let kind = if eq_folded(name, &self.query) {
            MatchKind::Exact
        } else {
            MatchKind::NamePrefix
        };
        Some(MatchScore::new(kind))
    }

    /// Scores `text` as [`MatchKind::ComponentPrefix`] when the query is a
    /// prefix of any of its components.
    pub fn score_components(&self, text: &str) -> Option<MatchScore> {
        if self.query.is_empty() {
            return None;
        }

        components(text)
            .any(|component| starts_with_folded(component, &self.query))
            .then_some(MatchScore::new(MatchKind::ComponentPrefix))
    }
}
