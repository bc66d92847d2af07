use docsearch_core::{Category, Generation};
use docsearch_index::{LinkTarget, RankedGroup};
use serde::Serialize;

/// What the rendering side receives for one settled query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryResponse {
    /// The query as typed.
    pub query: String,
    pub generation: Generation,
    /// `true` when the query was too short to search.
    pub skipped: bool,
    /// Non-empty groups in display order.
    pub groups: Vec<ResponseGroup>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseGroup {
    pub category: Category,
    pub label: &'static str,
    pub items: Vec<ResultItem>,
}

/// One row: an entry at one of its locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultItem {
    pub display_name: String,
    pub scope: String,
    pub url: String,
    /// Shared by every row of the same entry.
    pub sort_key: String,
    pub external: bool,
    pub target: LinkTarget,
}

impl QueryResponse {
    pub(crate) fn skipped(query: String, generation: Generation) -> Self {
        Self {
            query,
            generation,
            skipped: true,
            groups: Vec::new(),
        }
    }

    pub(crate) fn from_ranked(
        query: String,
        generation: Generation,
        ranked: Vec<RankedGroup<'_>>,
    ) -> Self {
        let groups = ranked
            .into_iter()
            .map(|group| ResponseGroup {
                category: group.category,
                label: group.category.label(),
                items: group
                    .entries
                    .iter()
                    .flat_map(|ranked| {
                        let entry = ranked.entry;
                        entry.locations().iter().map(move |location| ResultItem {
                            display_name: entry.display_name().to_string(),
                            scope: location.scope.clone(),
                            url: location.url.clone(),
                            sort_key: entry.sort_key().to_string(),
                            external: location.is_external(),
                            target: location.target,
                        })
                    })
                    .collect(),
            })
            .collect();

        Self {
            query,
            generation,
            skipped: false,
            groups,
        }
    }

    /// Number of rows across all groups.
    pub fn item_count(&self) -> usize {
        self.groups.iter().map(|group| group.items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
