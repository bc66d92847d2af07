//! Grouping and ordering of match results for display.

use std::cmp::Ordering;

use docsearch_core::Category;
use docsearch_matcher::MatchScore;

use crate::normalize::Entry;
use crate::search::SearchHit;

pub const DEFAULT_PER_CATEGORY_CAP: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankOptions {
    /// Maximum entries kept per category; the rest are dropped.
    pub per_category_cap: usize,
    /// Display order of result groups.
    pub category_order: Vec<Category>,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            per_category_cap: DEFAULT_PER_CATEGORY_CAP,
            category_order: Category::ALL.to_vec(),
        }
    }
}

impl RankOptions {
    /// `category_order` without duplicates, followed by every category it
    /// omits (in [`Category::ALL`] order).
    pub fn effective_order(&self) -> Vec<Category> {
        let mut order = Vec::with_capacity(Category::ALL.len());
        for &category in self.category_order.iter().chain(Category::ALL.iter()) {
            if !order.contains(&category) {
                order.push(category);
            }
        }
        order
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RankedEntry<'a> {
    pub entry: &'a Entry,
    pub score: MatchScore,
}

/// One renderable `(display name, scope, url)` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultTuple<'a> {
    pub display_name: &'a str,
    pub scope: &'a str,
    pub url: &'a str,
}

impl<'a> RankedEntry<'a> {
    /// One tuple per location, in location order.
    pub fn tuples(&self) -> impl Iterator<Item = ResultTuple<'a>> + 'a {
        let entry = self.entry;
        entry.locations().iter().map(move |location| ResultTuple {
            display_name: entry.display_name(),
            scope: &location.scope,
            url: &location.url,
        })
    }
}

#[derive(Debug, Clone)]
pub struct RankedGroup<'a> {
    pub category: Category,
    pub entries: Vec<RankedEntry<'a>>,
}

/// Groups hits by category and orders each group.
///
/// Groups follow [`RankOptions::effective_order`] regardless of how many hits
/// they hold; empty groups are omitted. Within a group entries are ordered by
/// score (best first), then display name (case-insensitive), then sort key.
pub fn rank<'a>(hits: Vec<SearchHit<'a>>, options: &RankOptions) -> Vec<RankedGroup<'a>> {
    let order = options.effective_order();
    let mut grouped: Vec<Vec<RankedEntry<'a>>> = vec![Vec::new(); order.len()];
    for hit in hits {
        let Some(slot) = order.iter().position(|&category| category == hit.category) else {
            continue;
        };
        grouped[slot].push(RankedEntry {
            entry: hit.entry,
            score: hit.score,
        });
    }

    order
        .into_iter()
        .zip(grouped)
        .filter_map(|(category, mut entries)| {
            let limit = options.per_category_cap;
            // Keep the `limit` best entries without sorting the entire group.
            if entries.len() > limit {
                if limit > 0 {
                    entries.select_nth_unstable_by(limit, cmp_ranked);
                }
                entries.truncate(limit);
            }
            entries.sort_by(cmp_ranked);
            (!entries.is_empty()).then_some(RankedGroup { category, entries })
        })
        .collect()
}

/// Total order used within a result group.
pub fn cmp_ranked(a: &RankedEntry<'_>, b: &RankedEntry<'_>) -> Ordering {
    b.score
        .value()
        .cmp(&a.score.value())
        .then_with(|| cmp_ignore_case(a.entry.display_name(), b.entry.display_name()))
        .then_with(|| a.entry.sort_key().cmp(b.entry.sort_key()))
}

fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    if a.is_ascii() && b.is_ascii() {
        let a = a.bytes().map(|byte| byte.to_ascii_lowercase());
        let b = b.bytes().map(|byte| byte.to_ascii_lowercase());
        return a.cmp(b);
    }
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}
