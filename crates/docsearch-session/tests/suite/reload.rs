use docsearch_index::{RankOptions, RawShard, SearchOptions, SharedStore, ShardStore};
use docsearch_session::{QuerySession, SearchPipeline};
use serde_json::json;

use super::ripple_store;

#[test]
fn queries_after_a_reload_see_the_new_store() {
    let shared = SharedStore::new(ripple_store());
    let pipeline = SearchPipeline::new(
        shared.clone(),
        SearchOptions::default(),
        RankOptions::default(),
    );
    let session = QuerySession::new();

    let before = session
        .submit(&pipeline, "ledgerc")
        .into_response()
        .unwrap();
    assert!(before.is_empty());

    let shard = RawShard::new(
        "classes_b",
        json!([["ledgercleaner_9", ["LedgerCleaner", ["lc.html", 1, "ripple"]]]]),
    )
    .unwrap();
    let old = shared.replace(ShardStore::load([shard]).0);
    assert!(!old.is_empty());

    let after = session
        .submit(&pipeline, "ledgerc")
        .into_response()
        .unwrap();
    assert_eq!(after.item_count(), 1);
    assert_eq!(after.groups[0].items[0].display_name, "LedgerCleaner");
}
