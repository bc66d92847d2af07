use std::sync::Arc;
use std::time::Duration;

use docsearch_config::SearchConfig;
use docsearch_core::Generation;
use docsearch_index::{query_from_utf8, InvalidQueryError, SharedStore};
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::pipeline::SearchPipeline;
use crate::response::QueryResponse;
use crate::session::{Completion, QuerySession, QueryTicket};

struct PendingRun {
    generation: Generation,
    handle: tokio::task::JoinHandle<()>,
}

struct DebouncedInner {
    runtime: Handle,
    session: QuerySession,
    pipeline: SearchPipeline,
    delay: Duration,
    pending: Mutex<Option<PendingRun>>,
    responses: mpsc::UnboundedSender<QueryResponse>,
}

/// Keystroke-driven front end for a [`QuerySession`].
///
/// Every input starts a new generation immediately. The pipeline runs on the
/// blocking pool once no newer input has arrived for `delay`; its response is
/// sent to the receiver returned by [`DebouncedSession::new`] unless a newer
/// query was issued while it ran.
#[derive(Clone)]
pub struct DebouncedSession {
    inner: Arc<DebouncedInner>,
}

impl DebouncedSession {
    pub fn new(
        runtime: Handle,
        pipeline: SearchPipeline,
        delay: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<QueryResponse>) {
        let (responses, receiver) = mpsc::unbounded_channel();
        let session = Self {
            inner: Arc::new(DebouncedInner {
                runtime,
                session: QuerySession::new(),
                pipeline,
                delay,
                pending: Mutex::new(None),
                responses,
            }),
        };
        (session, receiver)
    }

    pub fn from_config(
        runtime: Handle,
        store: SharedStore,
        config: &SearchConfig,
    ) -> (Self, mpsc::UnboundedReceiver<QueryResponse>) {
        Self::new(
            runtime,
            SearchPipeline::from_config(store, config),
            config.debounce(),
        )
    }

    pub fn session(&self) -> &QuerySession {
        &self.inner.session
    }

    /// Handles one input change.
    pub fn input(&self, query: impl Into<String>) -> Generation {
        let mut pending = self.inner.pending.lock();
        if let Some(previous) = pending.take() {
            // A run already past its timer keeps going; its result is
            // dropped at completion.
            previous.handle.abort();
            tracing::trace!(
                target = "docsearch.session",
                generation = previous.generation.get(),
                "debounce timer reset"
            );
        }

        let ticket = self.inner.session.begin(query);
        let generation = ticket.generation();
        let inner = Arc::clone(&self.inner);
        let handle = self.inner.runtime.spawn(async move {
            tokio::time::sleep(inner.delay).await;
            run_pipeline(&inner, ticket).await;

            let mut pending = inner.pending.lock();
            if pending.as_ref().is_some_and(|run| run.generation == generation) {
                *pending = None;
            }
        });

        *pending = Some(PendingRun { generation, handle });
        generation
    }

    /// Handles input that arrives as raw bytes.
    ///
    /// Bytes that are not UTF-8 are rejected here and do not supersede the
    /// query in flight.
    pub fn input_utf8(&self, raw: &[u8]) -> Result<Generation, InvalidQueryError> {
        let query = query_from_utf8(raw)?;
        Ok(self.input(query))
    }

    /// `true` while a debounce timer or pipeline run is outstanding.
    pub fn has_pending(&self) -> bool {
        self.inner.pending.lock().is_some()
    }
}

async fn run_pipeline(inner: &Arc<DebouncedInner>, ticket: QueryTicket) {
    let generation = ticket.generation();
    let run = Arc::clone(inner);
    let ticket_for_run = ticket.clone();
    let response = tokio::task::spawn_blocking(move || run.pipeline.execute(&ticket_for_run)).await;
    let response = match response {
        Ok(response) => response,
        Err(err) => {
            tracing::warn!(
                target = "docsearch.session",
                generation = generation.get(),
                error = %err,
                "search pipeline task failed"
            );
            return;
        }
    };

    if let Completion::Emitted(response) = inner.session.complete(ticket, response) {
        // A dropped receiver means nobody renders results any more.
        let _ = inner.responses.send(response);
    }
}
