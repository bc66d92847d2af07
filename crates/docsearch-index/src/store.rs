use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;
use std::sync::Arc;

use docsearch_core::{Category, ShardKey};
use parking_lot::RwLock;
use serde_json::Value;

use crate::error::{InvalidEntryShapeError, LoadError, MalformedShardError};
use crate::normalize::{normalize, Entry};
use crate::raw::{load_search_dir, RawShard};

/// An entry that was dropped while loading a shard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub shard: String,
    /// Position of the entry within the raw shard.
    pub index: usize,
    pub error: InvalidEntryShapeError,
}

/// Partial-load diagnostics. Nothing in here is fatal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub shards_loaded: usize,
    pub entries_loaded: usize,
    pub rejected_shards: Vec<MalformedShardError>,
    pub skipped_entries: Vec<SkippedEntry>,
}

impl LoadReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.rejected_shards.is_empty() && self.skipped_entries.is_empty()
    }
}

#[derive(Debug, Default)]
struct PendingBucket {
    entries: Vec<Entry>,
    sort_keys: HashSet<String>,
}

/// Accumulates shards, then freezes into a [`ShardStore`].
///
/// Shards may be added in any order. Entries are filed into buckets by the
/// first character of their sort key; within a bucket they keep the order in
/// which they were added.
#[derive(Debug, Default)]
pub struct ShardStoreBuilder {
    buckets: BTreeMap<ShardKey, PendingBucket>,
    report: LoadReport,
}

impl ShardStoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one shard. Returns the number of entries accepted from it.
    ///
    /// A structurally malformed shard is rejected as a whole (and recorded in
    /// the report); invalid entries are skipped individually.
    pub fn add_shard(&mut self, shard: RawShard) -> Result<usize, MalformedShardError> {
        let RawShard {
            id,
            category,
            entries,
        } = shard;

        let raw_entries = match entries {
            Value::Array(items) => items,
            other => {
                let err = MalformedShardError::NotAnArray {
                    shard: id,
                    found: json_kind(&other),
                };
                tracing::warn!(target = "docsearch.index", error = %err, "rejecting shard");
                self.report.rejected_shards.push(err.clone());
                return Err(err);
            }
        };

        let mut accepted = 0usize;
        for (index, raw) in raw_entries.iter().enumerate() {
            let result = normalize(raw).and_then(|entry| self.insert(category, entry));
            match result {
                Ok(()) => accepted += 1,
                Err(error) => {
                    tracing::warn!(
                        target = "docsearch.index",
                        shard = %id,
                        index,
                        error = %error,
                        "skipping invalid entry"
                    );
                    self.report.skipped_entries.push(SkippedEntry {
                        shard: id.clone(),
                        index,
                        error,
                    });
                }
            }
        }

        tracing::debug!(
            target = "docsearch.index",
            shard = %id,
            %category,
            accepted,
            "loaded shard"
        );
        self.report.shards_loaded += 1;
        self.report.entries_loaded += accepted;
        Ok(accepted)
    }

    /// Records a shard that failed before it could be added (e.g. it could
    /// not be decoded).
    pub fn reject_shard(&mut self, err: MalformedShardError) {
        tracing::warn!(target = "docsearch.index", error = %err, "rejecting shard");
        self.report.rejected_shards.push(err);
    }

    /// Adds an already normalized entry.
    pub fn add_entry(
        &mut self,
        category: Category,
        entry: Entry,
    ) -> Result<(), InvalidEntryShapeError> {
        self.insert(category, entry)?;
        self.report.entries_loaded += 1;
        Ok(())
    }

    fn insert(&mut self, category: Category, entry: Entry) -> Result<(), InvalidEntryShapeError> {
        let key = ShardKey::new(category, entry.letter());
        let bucket = self.buckets.entry(key).or_default();
        if !bucket.sort_keys.insert(entry.sort_key().to_string()) {
            return Err(InvalidEntryShapeError::DuplicateSortKey {
                sort_key: entry.sort_key().to_string(),
            });
        }
        bucket.entries.push(entry);
        Ok(())
    }

    /// Freezes the store. No further mutation is possible.
    pub fn finish(self) -> (ShardStore, LoadReport) {
        let mut entry_count = 0usize;
        let buckets: BTreeMap<ShardKey, Box<[Entry]>> = self
            .buckets
            .into_iter()
            .map(|(key, bucket)| {
                entry_count += bucket.entries.len();
                (key, bucket.entries.into_boxed_slice())
            })
            .collect();
        let categories: BTreeSet<Category> = buckets.keys().map(|key| key.category).collect();

        if entry_count == 0 {
            tracing::warn!(
                target = "docsearch.index",
                rejected = self.report.rejected_shards.len(),
                "no valid shard entries loaded; searches will return no results"
            );
        }

        (
            ShardStore {
                buckets,
                categories: categories.into_iter().collect(),
                entry_count,
            },
            self.report,
        )
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Immutable, fully loaded symbol index.
#[derive(Debug, Default)]
pub struct ShardStore {
    buckets: BTreeMap<ShardKey, Box<[Entry]>>,
    /// Categories with at least one entry, in `Category` order.
    categories: Vec<Category>,
    entry_count: usize,
}

impl ShardStore {
    /// An index with no entries; every search returns nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads all shards eagerly. Malformed shards and invalid entries are
    /// reported, never fatal.
    pub fn load(shards: impl IntoIterator<Item = RawShard>) -> (Self, LoadReport) {
        let mut builder = ShardStoreBuilder::new();
        for shard in shards {
            // Rejections are recorded in the builder's report.
            let _ = builder.add_shard(shard);
        }
        builder.finish()
    }

    /// Loads every shard file in a generator `search/` directory.
    pub fn load_dir(dir: &Path) -> Result<(Self, LoadReport), LoadError> {
        let (shards, rejected) = load_search_dir(dir)?;
        let mut builder = ShardStoreBuilder::new();
        for err in rejected {
            builder.reject_shard(err);
        }
        for shard in shards {
            let _ = builder.add_shard(shard);
        }
        let (store, report) = builder.finish();
        tracing::info!(
            target = "docsearch.index",
            dir = %dir.display(),
            shards = report.shards_loaded,
            entries = report.entries_loaded,
            rejected_shards = report.rejected_shards.len(),
            skipped_entries = report.skipped_entries.len(),
            "loaded search index"
        );
        Ok((store, report))
    }

    /// Entries of one bucket, in load order. Empty when the bucket is absent.
    pub fn get(&self, category: Category, letter: char) -> &[Entry] {
        self.bucket(&ShardKey::new(category, letter))
    }

    pub fn bucket(&self, key: &ShardKey) -> &[Entry] {
        self.buckets.get(key).map(|entries| &**entries).unwrap_or(&[])
    }

    pub fn keys(&self) -> impl Iterator<Item = &ShardKey> + '_ {
        self.buckets.keys()
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Total number of entries.
    pub fn len(&self) -> usize {
        self.entry_count
    }

    pub fn is_empty(&self) -> bool {
        self.entry_count == 0
    }

    /// Approximate heap memory usage of this store in bytes.
    pub fn estimated_bytes(&self) -> u64 {
        use std::mem::size_of;

        let mut bytes = (self.categories.capacity() * size_of::<Category>()) as u64;
        for entries in self.buckets.values() {
            bytes = bytes.saturating_add((size_of::<ShardKey>() + size_of::<Box<[Entry]>>()) as u64);
            bytes = bytes.saturating_add((entries.len() * size_of::<Entry>()) as u64);
            for entry in entries.iter() {
                bytes = bytes.saturating_add(entry.heap_bytes());
            }
        }
        bytes
    }
}

/// Shared handle to the current [`ShardStore`].
///
/// Reloads swap the whole store: callers holding a snapshot keep reading the
/// old store, new snapshots observe the new one.
#[derive(Debug, Clone)]
pub struct SharedStore {
    current: Arc<RwLock<Arc<ShardStore>>>,
}

impl SharedStore {
    pub fn new(store: ShardStore) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(store))),
        }
    }

    pub fn snapshot(&self) -> Arc<ShardStore> {
        self.current.read().clone()
    }

    /// Atomically replaces the store, returning the previous one.
    pub fn replace(&self, store: ShardStore) -> Arc<ShardStore> {
        let next = Arc::new(store);
        tracing::info!(
            target = "docsearch.index",
            entries = next.len(),
            "swapping search index"
        );
        std::mem::replace(&mut *self.current.write(), next)
    }
}

impl Default for SharedStore {
    fn default() -> Self {
        Self::new(ShardStore::empty())
    }
}
