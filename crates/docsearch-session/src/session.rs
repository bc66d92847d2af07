use docsearch_core::Generation;
use parking_lot::Mutex;
use serde::Serialize;

use crate::pipeline::SearchPipeline;
use crate::response::QueryResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No query in flight.
    Idle,
    /// The latest query has been issued but has not completed.
    Pending,
    /// The latest query completed and its response was emitted.
    Settled,
}

/// One issued query attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTicket {
    query: String,
    generation: Generation,
}

impl QueryTicket {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }
}

/// Outcome of completing a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The query was still the latest one; hand the response to the renderer.
    Emitted(QueryResponse),
    /// A newer query was issued in the meantime; the result was discarded.
    Superseded { generation: Generation },
}

impl Completion {
    pub fn into_response(self) -> Option<QueryResponse> {
        match self {
            Completion::Emitted(response) => Some(response),
            Completion::Superseded { .. } => None,
        }
    }
}

#[derive(Debug)]
struct Inner {
    latest: Generation,
    state: SessionState,
}

/// Generation-counting query state machine.
///
/// Issuing a query is the only cancellation signal: every completion is
/// compared against the latest issued generation and stale results are
/// dropped. The session never terminates.
#[derive(Debug)]
pub struct QuerySession {
    inner: Mutex<Inner>,
}

impl Default for QuerySession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuerySession {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                latest: Generation::default(),
                state: SessionState::Idle,
            }),
        }
    }

    pub fn state(&self) -> SessionState {
        self.inner.lock().state
    }

    /// Generation of the most recently issued query; `0` before the first.
    pub fn latest_generation(&self) -> Generation {
        self.inner.lock().latest
    }

    /// Issues a new query, superseding every older one.
    pub fn begin(&self, query: impl Into<String>) -> QueryTicket {
        let mut inner = self.inner.lock();
        inner.latest = inner.latest.next();
        inner.state = SessionState::Pending;
        let ticket = QueryTicket {
            query: query.into(),
            generation: inner.latest,
        };
        tracing::trace!(
            target = "docsearch.session",
            generation = ticket.generation.get(),
            query = %ticket.query,
            "query issued"
        );
        ticket
    }

    /// Completes a query with its pipeline response.
    ///
    /// Responses of superseded queries are discarded.
    pub fn complete(&self, ticket: QueryTicket, response: QueryResponse) -> Completion {
        let mut inner = self.inner.lock();
        if ticket.generation != inner.latest {
            tracing::trace!(
                target = "docsearch.session",
                generation = ticket.generation.get(),
                latest = inner.latest.get(),
                "dropping superseded result"
            );
            return Completion::Superseded {
                generation: ticket.generation,
            };
        }

        inner.state = SessionState::Settled;
        tracing::debug!(
            target = "docsearch.session",
            generation = ticket.generation.get(),
            items = response.item_count(),
            skipped = response.skipped,
            "query settled"
        );
        Completion::Emitted(response)
    }

    /// Issues, runs and completes a query in one step.
    pub fn submit(&self, pipeline: &SearchPipeline, query: impl Into<String>) -> Completion {
        let ticket = self.begin(query);
        let response = pipeline.execute(&ticket);
        self.complete(ticket, response)
    }
}
