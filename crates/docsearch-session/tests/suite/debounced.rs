use std::time::Duration;

use docsearch_config::SearchConfig;
use docsearch_index::{InvalidQueryError, RankOptions, SearchOptions, SharedStore};
use docsearch_session::{DebouncedSession, Generation, SearchPipeline, SessionState};
use tokio::time::timeout;

use super::ripple_store;

const DEBOUNCE: Duration = Duration::from_millis(30);
const WAIT: Duration = Duration::from_secs(5);

fn pipeline() -> SearchPipeline {
    SearchPipeline::new(
        SharedStore::new(ripple_store()),
        SearchOptions::default(),
        RankOptions::default(),
    )
}

#[tokio::test]
async fn rapid_keystrokes_emit_only_the_last_query() {
    let (session, mut responses) =
        DebouncedSession::new(tokio::runtime::Handle::current(), pipeline(), DEBOUNCE);

    for query in ["l", "le", "led", "ledger"] {
        session.input(query);
    }
    assert_eq!(session.session().latest_generation(), Generation(4));
    assert_eq!(session.session().state(), SessionState::Pending);

    let response = timeout(WAIT, responses.recv())
        .await
        .expect("response before timeout")
        .expect("channel open");
    assert_eq!(response.query, "ledger");
    assert_eq!(response.generation, Generation(4));
    assert_eq!(response.groups.len(), 2);

    tokio::time::sleep(DEBOUNCE * 4).await;
    assert!(responses.try_recv().is_err(), "older keystrokes must not emit");
    assert_eq!(session.session().state(), SessionState::Settled);
    assert!(!session.has_pending());
}

#[tokio::test]
async fn spaced_keystrokes_each_emit() {
    let (session, mut responses) =
        DebouncedSession::new(tokio::runtime::Handle::current(), pipeline(), DEBOUNCE);

    for (i, query) in ["le", "ledgerh"].into_iter().enumerate() {
        session.input(query);
        let response = timeout(WAIT, responses.recv()).await.unwrap().unwrap();
        assert_eq!(response.query, query);
        assert_eq!(response.generation, Generation(i as u64 + 1));
    }
}

#[tokio::test]
async fn non_utf8_input_is_rejected_without_superseding() {
    let (session, mut responses) =
        DebouncedSession::new(tokio::runtime::Handle::current(), pipeline(), DEBOUNCE);

    session.input("ledger");
    let err = session.input_utf8(b"ledger\xc3").unwrap_err();
    assert_eq!(err, InvalidQueryError::NotUtf8 { valid_up_to: 6 });
    assert_eq!(session.session().latest_generation(), Generation(1));

    let response = timeout(WAIT, responses.recv()).await.unwrap().unwrap();
    assert_eq!(response.query, "ledger");
    assert!(!response.is_empty());
}

#[tokio::test]
async fn control_characters_supersede_and_settle_empty() {
    let (session, mut responses) =
        DebouncedSession::new(tokio::runtime::Handle::current(), pipeline(), DEBOUNCE);

    session.input("ledger");
    let generation = session.input_utf8(b"ledger\x08").unwrap();
    assert_eq!(generation, Generation(2));

    let response = timeout(WAIT, responses.recv()).await.unwrap().unwrap();
    assert_eq!(response.query, "ledger\u{8}");
    assert_eq!(response.generation, Generation(2));
    assert!(!response.skipped);
    assert!(response.is_empty());
}

#[tokio::test]
async fn configured_minimum_length_skips_the_search() {
    let config = SearchConfig {
        min_query_length: 2,
        debounce_ms: 10,
        ..SearchConfig::default()
    };
    let (session, mut responses) = DebouncedSession::from_config(
        tokio::runtime::Handle::current(),
        SharedStore::new(ripple_store()),
        &config,
    );

    session.input("l");
    let response = timeout(WAIT, responses.recv()).await.unwrap().unwrap();
    assert!(response.skipped);
    assert!(response.groups.is_empty());
}
