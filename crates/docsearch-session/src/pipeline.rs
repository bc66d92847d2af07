use docsearch_config::SearchConfig;
use docsearch_index::{rank, RankOptions, SearchOptions, SharedStore};

use crate::response::QueryResponse;
use crate::session::QueryTicket;

/// Match engine plus ranker, evaluated against the current store.
#[derive(Debug, Clone)]
pub struct SearchPipeline {
    store: SharedStore,
    search: SearchOptions,
    rank: RankOptions,
    min_query_length: usize,
}

impl SearchPipeline {
    pub fn new(store: SharedStore, search: SearchOptions, rank: RankOptions) -> Self {
        Self {
            store,
            search,
            rank,
            min_query_length: 1,
        }
    }

    pub fn from_config(store: SharedStore, config: &SearchConfig) -> Self {
        Self {
            store,
            search: config.search_options(),
            rank: config.rank_options(),
            min_query_length: config.min_query_length,
        }
    }

    #[must_use]
    pub fn with_min_query_length(mut self, min_query_length: usize) -> Self {
        self.min_query_length = min_query_length;
        self
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    pub fn search_options(&self) -> &SearchOptions {
        &self.search
    }

    /// Runs one query.
    ///
    /// Queries shorter than the minimum length (after trimming) produce a
    /// skipped response without touching the store. Queries nothing can
    /// match produce an empty one.
    pub fn execute(&self, ticket: &QueryTicket) -> QueryResponse {
        let query = ticket.query();
        if query.trim().chars().count() < self.min_query_length {
            return QueryResponse::skipped(query.to_string(), ticket.generation());
        }

        // In-flight queries keep the snapshot they started with across reloads.
        let store = self.store.snapshot();
        let hits = store.search(query, &self.search);
        let groups = rank(hits, &self.rank);
        QueryResponse::from_ranked(query.to_string(), ticket.generation(), groups)
    }
}
