use docsearch_index::{
    rank, Category, RankOptions, RawShard, ResultTuple, SearchOptions, ShardStore,
};
use serde_json::json;

fn ripple_store() -> ShardStore {
    let classes = RawShard::new(
        "classes_b",
        json!([
            ["ledger_1", ["Ledger",
                ["../classripple_1_1test_1_1csf_1_1Ledger.html", 1, "ripple::test::csf"],
                ["a.html", 1, "ripple"]]],
            ["ledgermaster_2", ["LedgerMaster", ["b.html", 1, "ripple"]]],
            ["loadfeetrack_3", ["LoadFeeTrack", ["c.html", 1, "ripple::Ledger"]]],
        ]),
    )
    .unwrap();
    let (store, report) = ShardStore::load([classes]);
    assert!(report.is_clean());
    store
}

#[test]
fn exact_name_ranks_before_longer_name_and_scope_matches() {
    let store = ripple_store();
    let hits = store.search("ledger", &SearchOptions::default());
    let groups = rank(hits, &RankOptions::default());

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].category, Category::Classes);
    let names: Vec<_> = groups[0]
        .entries
        .iter()
        .map(|e| e.entry.display_name())
        .collect();
    assert_eq!(names, ["Ledger", "LedgerMaster", "LoadFeeTrack"]);
}

#[test]
fn entry_with_two_locations_yields_two_tuples_with_one_sort_key() {
    let store = ripple_store();
    let hits = store.search("Ledger", &SearchOptions::default());
    let groups = rank(hits, &RankOptions::default());

    let ledger = &groups[0].entries[0];
    assert_eq!(ledger.entry.sort_key(), "ledger_1");
    let tuples: Vec<_> = ledger.tuples().collect();
    assert_eq!(
        tuples,
        [
            ResultTuple {
                display_name: "Ledger",
                scope: "ripple::test::csf",
                url: "../classripple_1_1test_1_1csf_1_1Ledger.html",
            },
            ResultTuple {
                display_name: "Ledger",
                scope: "ripple",
                url: "a.html",
            },
        ]
    );
}

#[test]
fn shards_may_arrive_in_any_order() {
    let shards = || {
        vec![
            RawShard::new(
                "typedefs_3",
                json!([["ledgerhash_9", ["LedgerHash", ["h.html", 1, "ripple"]]]]),
            )
            .unwrap(),
            RawShard::new(
                "classes_b",
                json!([["ledger_1", ["Ledger", ["a.html", 1, "ripple"]]]]),
            )
            .unwrap(),
        ]
    };

    let (forward, _) = ShardStore::load(shards());
    let (backward, _) = ShardStore::load(shards().into_iter().rev());

    let render = |store: &ShardStore| {
        let hits = store.search("ledger", &SearchOptions::default());
        rank(hits, &RankOptions::default())
            .iter()
            .map(|group| {
                (
                    group.category,
                    group
                        .entries
                        .iter()
                        .map(|e| e.entry.sort_key().to_string())
                        .collect::<Vec<_>>(),
                )
            })
            .collect::<Vec<_>>()
    };
    assert_eq!(render(&forward), render(&backward));
    assert_eq!(
        render(&forward),
        [
            (Category::Classes, vec!["ledger_1".to_string()]),
            (Category::Typedefs, vec!["ledgerhash_9".to_string()]),
        ]
    );
}

#[test]
fn duplicate_sort_key_in_a_bucket_skips_only_that_entry() {
    let shard = RawShard::new(
        "classes_b",
        json!([
            ["ledger_1", ["Ledger", ["a.html", 1, "ripple"]]],
            ["ledger_1", ["Ledger", ["z.html", 1, "other"]]],
            ["ledgermaster_2", ["LedgerMaster", ["b.html", 1, "ripple"]]],
        ]),
    )
    .unwrap();
    let (store, report) = ShardStore::load([shard]);

    assert_eq!(store.len(), 2);
    assert_eq!(report.skipped_entries.len(), 1);
    assert_eq!(report.skipped_entries[0].index, 1);
    assert_eq!(
        store.get(Category::Classes, 'l')[0].locations()[0].url,
        "a.html"
    );
}

#[test]
fn same_sort_key_in_different_categories_is_allowed() {
    let (store, report) = ShardStore::load([
        RawShard::new("all_b", json!([["ledger_1", ["Ledger", ["a.html", 1, "ripple"]]]])).unwrap(),
        RawShard::new("classes_b", json!([["ledger_1", ["Ledger", ["a.html", 1, "ripple"]]]]))
            .unwrap(),
    ]);
    assert!(report.is_clean());
    assert_eq!(store.len(), 2);
}

#[test]
fn same_kind_matches_order_alphabetically_not_by_length() {
    // Generator text, listed out of alphabetical order on purpose.
    let text = "var searchData=\n[\n\
        ['ledgerfill_12959',['LedgerFill',['../structripple_1_1LedgerFill.html',1,'ripple']]],\n\
        ['ledgercollector_12956',['LedgerCollector',['../structripple_1_1test_1_1csf_1_1LedgerCollector.html',1,'ripple::test::csf']]],\n\
        ['ledgercleaner_12953',['LedgerCleaner',['../classripple_1_1detail_1_1LedgerCleaner.html',1,'ripple::detail']]]\n\
    ];\n";
    let shard = RawShard::from_search_data("classes_c", text).unwrap();
    let (store, report) = ShardStore::load([shard]);
    assert!(report.is_clean());

    let hits = store.search("ledger", &SearchOptions::default());
    let values: Vec<_> = hits.iter().map(|hit| hit.score.value()).collect();
    assert!(values.windows(2).all(|pair| pair[0] == pair[1]));

    let groups = rank(hits, &RankOptions::default());
    let names: Vec<_> = groups[0]
        .entries
        .iter()
        .map(|ranked| ranked.entry.display_name())
        .collect();
    assert_eq!(names, ["LedgerCleaner", "LedgerCollector", "LedgerFill"]);
}
