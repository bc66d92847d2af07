mod debounced;
mod out_of_order;
mod reload;

use docsearch_index::{RawShard, ShardStore};
use serde_json::json;

/// A small store with the `ripple` ledger classes and typedefs.
pub(crate) fn ripple_store() -> ShardStore {
    let classes = RawShard::new(
        "classes_b",
        json!([
            ["ledger_1", ["Ledger",
                ["classripple_1_1test_1_1csf_1_1Ledger.html", 1, "ripple::test::csf"],
                ["classripple_1_1Ledger.html", 1, "ripple"]]],
            ["ledgermaster_2", ["LedgerMaster", ["classripple_1_1LedgerMaster.html", 1, "ripple"]]],
            ["loadfeetrack_3", ["LoadFeeTrack", ["classripple_1_1LoadFeeTrack.html", 1, "ripple::Ledger"]]],
        ]),
    )
    .unwrap();
    let typedefs = RawShard::new(
        "typedefs_f",
        json!([
            ["ledgerhash_4", ["LedgerHash", ["namespaceripple.html#a1", 1, "ripple"]]],
            ["mutex_5", ["mutex", ["https://en.cppreference.com/w/cpp/thread/mutex", 0, "std"]]],
        ]),
    )
    .unwrap();
    let (store, report) = ShardStore::load([classes, typedefs]);
    assert!(report.is_clean());
    store
}
