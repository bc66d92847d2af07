use std::cmp::Ordering;

use docsearch_index::{
    cmp_ranked, rank, Category, Entry, Location, RankOptions, SearchOptions, ShardStore,
    ShardStoreBuilder,
};

const NAMES: &[&str] = &[
    "Ledger",
    "LedgerMaster",
    "LedgerHash",
    "ledger_hash",
    "LoadFeeTrack",
    "LoadManager",
    "Map",
    "map_t",
    "MapView",
    "mutex",
    "Rules",
    "RippleState",
    "rpc",
    "STObject",
    "STLedgerEntry",
];

const SCOPES: &[&str] = &[
    "ripple",
    "ripple::Ledger",
    "ripple::test::csf",
    "ripple::RPC",
    "std",
    "beast::detail",
];

fn corpus() -> ShardStore {
    let categories = [Category::Classes, Category::Typedefs, Category::Functions];
    let mut builder = ShardStoreBuilder::new();
    let mut ordinal = 0;
    for (c, &category) in categories.iter().enumerate() {
        for (n, name) in NAMES.iter().enumerate() {
            ordinal += 1;
            let locations = (0..1 + (n + c) % 2)
                .map(|i| {
                    Location::new(
                        format!("{name}_{i}.html"),
                        SCOPES[(n + c + i) % SCOPES.len()],
                    )
                })
                .collect();
            let key = format!("{}_{ordinal}", name.to_lowercase());
            let entry = Entry::new(&key, *name, locations).unwrap();
            builder.add_entry(category, entry).unwrap();
        }
    }
    builder.finish().0
}

fn queries() -> Vec<&'static str> {
    vec!["l", "le", "Ledger", "LOAD", "map", "m", "r", "st", "std", "ripple", "csf", "x", "ledger_"]
}

fn has_token_with_prefix(text: &str, query: &str) -> bool {
    text.to_lowercase().starts_with(query)
        || docsearch_matcher::components(text).any(|c| c.to_lowercase().starts_with(query))
}

#[test]
fn every_hit_has_a_name_or_scope_token_with_the_query_as_prefix() {
    let store = corpus();
    for query in queries() {
        let folded = query.to_lowercase();
        let hits = store.search(query, &SearchOptions::default());
        for hit in hits {
            let entry = hit.entry;
            let matched = entry.sort_key().starts_with(&folded)
                || has_token_with_prefix(entry.display_name(), &folded)
                || entry
                    .locations()
                    .iter()
                    .any(|loc| has_token_with_prefix(&loc.scope, &folded));
            assert!(matched, "{query:?} matched {:?}", entry.sort_key());
        }
    }
}

#[test]
fn hits_only_come_from_the_query_letter_bucket() {
    let store = corpus();
    for query in queries() {
        let first = query.chars().next().unwrap().to_ascii_lowercase();
        for hit in store.search(query, &SearchOptions::default()) {
            assert_eq!(hit.entry.letter(), first, "{query:?} -> {}", hit.entry.sort_key());
        }
    }
}

#[test]
fn repeated_queries_yield_identical_output() {
    let store = corpus();
    let options = RankOptions {
        per_category_cap: 3,
        ..RankOptions::default()
    };
    let render = |query: &str| {
        let hits = store.search(query, &SearchOptions::default());
        rank(hits, &options)
            .into_iter()
            .flat_map(|group| {
                group
                    .entries
                    .iter()
                    .flat_map(|e| e.tuples())
                    .map(|t| (group.category, t.display_name, t.scope, t.url))
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>()
    };

    for query in queries() {
        assert_eq!(render(query), render(query), "{query:?}");
    }
}

#[test]
fn group_order_is_a_strict_total_order() {
    let store = corpus();
    for query in queries() {
        let hits = store.search(query, &SearchOptions::default());
        for group in rank(hits, &RankOptions::default()) {
            for pair in group.entries.windows(2) {
                assert_eq!(
                    cmp_ranked(&pair[0], &pair[1]),
                    Ordering::Less,
                    "{query:?}: {} vs {}",
                    pair[0].entry.sort_key(),
                    pair[1].entry.sort_key()
                );
            }
        }
    }
}

#[test]
fn cap_bounds_every_group() {
    let store = corpus();
    let options = RankOptions {
        per_category_cap: 2,
        ..RankOptions::default()
    };
    let hits = store.search("l", &SearchOptions::default());
    let groups = rank(hits, &options);
    assert_eq!(groups.len(), 3);
    assert!(groups.iter().all(|g| g.entries.len() == 2));
}
