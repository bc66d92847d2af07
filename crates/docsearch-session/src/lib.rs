//! Query session for the documentation search box.
//!
//! Each keystroke issues a new [`QueryTicket`] with a fresh generation. The
//! [`SearchPipeline`] evaluates it against the current store and the
//! [`QuerySession`] emits the result only if no newer query was issued in the
//! meantime. [`DebouncedSession`] drives the same state machine from a tokio
//! runtime with a keystroke debounce.

mod debounce;
mod pipeline;
mod response;
mod session;

pub use debounce::DebouncedSession;
pub use docsearch_core::Generation;
pub use pipeline::SearchPipeline;
pub use response::{QueryResponse, ResponseGroup, ResultItem};
pub use session::{Completion, QuerySession, QueryTicket, SessionState};
