use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use docsearch_index::{RankOptions, SearchOptions, SharedStore};
use docsearch_session::{Completion, Generation, QuerySession, SearchPipeline, SessionState};

use super::ripple_store;

#[test]
fn only_the_latest_query_is_emitted_when_an_older_one_finishes_last() {
    let session = Arc::new(QuerySession::new());
    let pipeline = Arc::new(SearchPipeline::new(
        SharedStore::new(ripple_store()),
        SearchOptions::default(),
        RankOptions::default(),
    ));

    let a = session.begin("l");
    let b = session.begin("ledgerm");

    // A runs on another thread and is held back until B has completed.
    let (release_a, wait_for_b) = mpsc::channel::<()>();
    let a_thread = {
        let session = Arc::clone(&session);
        let pipeline = Arc::clone(&pipeline);
        thread::spawn(move || {
            let result = pipeline.execute(&a);
            wait_for_b.recv().unwrap();
            session.complete(a, result)
        })
    };

    let b_result = pipeline.execute(&b);
    let b_done = session.complete(b, b_result);
    release_a.send(()).unwrap();
    let a_done = a_thread.join().unwrap();

    let Completion::Emitted(response) = b_done else {
        panic!("expected B to be emitted, got {b_done:?}");
    };
    assert_eq!(response.query, "ledgerm");
    assert_eq!(response.generation, Generation(2));
    let names: Vec<_> = response.groups[0]
        .items
        .iter()
        .map(|item| item.display_name.as_str())
        .collect();
    assert_eq!(names, ["LedgerMaster"]);

    assert_eq!(
        a_done,
        Completion::Superseded {
            generation: Generation(1)
        }
    );
    assert_eq!(session.state(), SessionState::Settled);
    assert_eq!(session.latest_generation(), Generation(2));
}

#[test]
fn session_cycles_indefinitely() {
    let session = QuerySession::new();
    let pipeline = SearchPipeline::new(
        SharedStore::new(ripple_store()),
        SearchOptions::default(),
        RankOptions::default(),
    );

    for (i, query) in ["l", "le", "led", "ledg", "m", ""].into_iter().enumerate() {
        let completion = session.submit(&pipeline, query);
        let response = completion.into_response().expect("latest query is emitted");
        assert_eq!(response.generation, Generation(i as u64 + 1));
        assert_eq!(session.state(), SessionState::Settled);
    }
}

#[test]
fn two_locations_surface_as_two_rows() {
    let session = QuerySession::new();
    let pipeline = SearchPipeline::new(
        SharedStore::new(ripple_store()),
        SearchOptions::default(),
        RankOptions::default(),
    );

    let response = session
        .submit(&pipeline, "Ledger")
        .into_response()
        .unwrap();
    let classes = &response.groups[0];
    let rows: Vec<_> = classes
        .items
        .iter()
        .filter(|item| item.sort_key == "ledger_1")
        .map(|item| (item.display_name.as_str(), item.scope.as_str()))
        .collect();
    assert_eq!(rows, [("Ledger", "ripple::test::csf"), ("Ledger", "ripple")]);

    // `LoadFeeTrack` only matches through its scope and ranks last.
    assert_eq!(
        classes.items.last().map(|item| item.display_name.as_str()),
        Some("LoadFeeTrack")
    );
}

#[test]
fn external_links_are_flagged() {
    let session = QuerySession::new();
    let pipeline = SearchPipeline::new(
        SharedStore::new(ripple_store()),
        SearchOptions::default(),
        RankOptions::default(),
    );
    let response = session
        .submit(&pipeline, "mutex")
        .into_response()
        .unwrap();
    let item = &response.groups[0].items[0];
    assert!(item.external);
    assert_eq!(item.target, docsearch_index::LinkTarget::NewWindow);
}
