//! Immutable symbol index
//!
//! Built once from a full table and queried concurrently afterwards.
//! Results of both lookups are ordered by key length (in characters), then
//! by key, then by load order.

use std::path::Path;
use std::time::Instant;

use tracing::{debug, info};

use super::key_dict::{EntryId, KeyDictionary, KeyDictionaryBuilder};
use super::source::TableSource;
use crate::format::TableFormat;
use crate::models::{fold_key, IndexEntry};
use crate::Result;

/// Read-only table of index entries with exact and prefix lookup
pub struct SymbolIndex {
    /// Entries in load order
    entries: Vec<IndexEntry>,
    /// Folded key -> entry ids
    keys: KeyDictionary,
    /// Position of each entry in the result ordering
    rank: Vec<u32>,
}

impl SymbolIndex {
    /// Build an index from validated entries, keeping their order as load order
    pub fn from_entries(entries: Vec<IndexEntry>) -> Result<Self> {
        let mut builder = KeyDictionaryBuilder::new();
        for (id, entry) in entries.iter().enumerate() {
            builder.add(entry.folded_key(), id as EntryId);
        }
        let keys = builder.build()?;

        let mut order: Vec<usize> = (0..entries.len()).collect();
        order.sort_by(|&a, &b| {
            let (ka, kb) = (entries[a].key(), entries[b].key());
            ka.chars()
                .count()
                .cmp(&kb.chars().count())
                .then_with(|| ka.cmp(kb))
                .then_with(|| a.cmp(&b))
        });
        let mut rank = vec![0u32; entries.len()];
        for (position, id) in order.into_iter().enumerate() {
            rank[id] = position as u32;
        }

        debug!(
            entries = entries.len(),
            keys = keys.len(),
            fst_bytes = keys.fst_size(),
            "built symbol index"
        );

        Ok(Self {
            entries,
            keys,
            rank,
        })
    }

    /// Parse a serialized table and build an index from it.
    ///
    /// A malformed record fails the whole load; no partial index is returned.
    pub fn load(input: &str, format: TableFormat) -> Result<Self> {
        let start = Instant::now();
        let format = format.resolve(input)?;
        let entries = format.parse(input)?;
        let index = Self::from_entries(entries)?;

        info!(
            format = %format,
            entries = index.len(),
            took_ms = start.elapsed().as_millis() as u64,
            "loaded symbol index"
        );
        Ok(index)
    }

    /// Load a single table file
    pub fn load_file(path: impl AsRef<Path>, format: TableFormat) -> Result<Self> {
        TableSource::file(path.as_ref(), format).load()
    }

    /// Load every table of one category (`all`, `classes`, ...) from a
    /// Doxygen `search/` directory
    pub fn load_dir(dir: impl AsRef<Path>, category: &str) -> Result<Self> {
        TableSource::directory(dir.as_ref(), category).load()
    }

    /// Entries whose key starts with `query`, ignoring case
    pub fn lookup(&self, query: &str) -> Vec<&IndexEntry> {
        let mut ids = self.keys.prefix_search(&fold_key(query));
        self.sort_ids(&mut ids);
        ids.into_iter().map(|id| &self.entries[id as usize]).collect()
    }

    /// Like [`lookup`](Self::lookup), truncated to `limit` results.
    /// Also returns the number of matches before truncation.
    pub fn lookup_limited(&self, query: &str, limit: usize) -> (Vec<&IndexEntry>, usize) {
        let mut ids = self.keys.prefix_search(&fold_key(query));
        let total = ids.len();
        if limit < total {
            ids.select_nth_unstable_by_key(limit, |&id| self.rank[id as usize]);
            ids.truncate(limit);
        }
        self.sort_ids(&mut ids);
        (
            ids.into_iter().map(|id| &self.entries[id as usize]).collect(),
            total,
        )
    }

    /// Entries whose key equals `key` exactly, in load order
    pub fn exact_match(&self, key: &str) -> Vec<&IndexEntry> {
        // Keys sharing a folded form differ only in case; keep the exact ones
        self.keys
            .get(&fold_key(key))
            .iter()
            .map(|&id| &self.entries[id as usize])
            .filter(|entry| entry.key() == key)
            .collect()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct case-folded keys
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    /// Total number of targets across all entries
    pub fn target_count(&self) -> usize {
        self.entries.iter().map(|e| e.targets().len()).sum()
    }

    /// Entries in load order
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Serialize the table back into `format`
    pub fn to_table(&self, format: TableFormat) -> Result<String> {
        format.render(&self.entries)
    }

    fn sort_ids(&self, ids: &mut [EntryId]) {
        ids.sort_unstable_by_key(|&id| self.rank[id as usize]);
    }
}

impl std::fmt::Debug for SymbolIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymbolIndex")
            .field("entries", &self.entries.len())
            .field("keys", &self.keys.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SymdexError;
    use crate::models::Target;

    fn entry(key: &str, scopes: &[&str]) -> IndexEntry {
        let targets = scopes
            .iter()
            .enumerate()
            .map(|(i, scope)| Target::new(format!("{}.html", key), format!("a{}", i), *scope))
            .collect();
        IndexEntry::new(key, key, targets).unwrap()
    }

    fn keys(entries: &[&IndexEntry]) -> Vec<String> {
        entries.iter().map(|e| e.key().to_string()).collect()
    }

    fn sample() -> SymbolIndex {
        SymbolIndex::from_entries(vec![
            entry("take_all", &["CLI::OptionBase"]),
            entry("type_size", &["CLI::Option::type_size(int)", "CLI::Option::type_size(int, int)"]),
            entry("type_size_max_", &["CLI::Option"]),
            entry("Transformer", &["CLI::Transformer"]),
            entry("type_name", &["CLI::Option"]),
            entry("type_size", &["Other::type_size()"]),
            entry("take", &["CLI::OptionBase"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_lookup_orders_by_length_then_key_then_load_order() {
        let index = sample();
        let results = index.lookup("type_");
        assert_eq!(
            keys(&results),
            vec!["type_name", "type_size", "type_size", "type_size_max_"]
        );
        assert_eq!(results[1].targets().len(), 2);
        assert_eq!(results[2].primary_target().scope_label, "Other::type_size()");
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let index = sample();
        assert_eq!(keys(&index.lookup("TRANS")), vec!["Transformer"]);
        assert_eq!(keys(&index.lookup("tRaNsFoRmEr")), vec!["Transformer"]);
    }

    #[test]
    fn test_lookup_folds_non_ascii_keys() {
        let index = SymbolIndex::from_entries(vec![
            entry("ΑΣΑ", &["greek"]),
            entry("Überblick", &["de"]),
        ])
        .unwrap();
        assert_eq!(keys(&index.lookup("ΑΣ")), vec!["ΑΣΑ"]);
        assert_eq!(keys(&index.lookup("ασ")), vec!["ΑΣΑ"]);
        assert_eq!(keys(&index.lookup("über")), vec!["Überblick"]);
    }

    #[test]
    fn test_lookup_no_match_is_empty() {
        let index = sample();
        assert!(index.lookup("zzz").is_empty());
    }

    #[test]
    fn test_empty_query_returns_everything_in_order() {
        let index = sample();
        let all = keys(&index.lookup(""));
        assert_eq!(
            all,
            vec![
                "take",
                "take_all",
                "type_name",
                "type_size",
                "type_size",
                "Transformer",
                "type_size_max_",
            ]
        );
        assert_eq!(keys(&index.lookup("")), all);
    }

    #[test]
    fn test_exact_match() {
        let index = sample();
        let results = index.exact_match("type_size");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].targets().len(), 2);
        assert_eq!(results[1].primary_target().scope_label, "Other::type_size()");

        assert!(index.exact_match("type_").is_empty());
        assert!(index.exact_match("transformer").is_empty());
        assert_eq!(index.exact_match("Transformer").len(), 1);
    }

    #[test]
    fn test_lookup_limited() {
        let index = sample();
        let (results, total) = index.lookup_limited("t", 3);
        assert_eq!(total, 7);
        assert_eq!(keys(&results), vec!["take", "take_all", "type_name"]);

        let (results, total) = index.lookup_limited("type_size", 10);
        assert_eq!(total, 3);
        assert_eq!(results.len(), 3);

        let (results, total) = index.lookup_limited("t", 0);
        assert_eq!(total, 7);
        assert!(results.is_empty());
    }

    #[test]
    fn test_counts() {
        let index = sample();
        assert_eq!(index.len(), 7);
        assert_eq!(index.key_count(), 6);
        assert_eq!(index.target_count(), 8);
        assert!(!index.is_empty());
    }

    #[test]
    fn test_load_rejects_malformed_table() {
        let input = r#"[{"key": "a", "label": "a", "targets": [{"document_path": "a.html"}]}]"#;
        let result = SymbolIndex::load(input, TableFormat::Auto);
        assert!(matches!(result, Err(SymdexError::MalformedIndex { record: 0, .. })));
    }

    #[test]
    fn test_to_table_round_trip() {
        let index = sample();
        for format in [TableFormat::Doxygen, TableFormat::Json] {
            let table = index.to_table(format).unwrap();
            let reloaded = SymbolIndex::load(&table, TableFormat::Auto).unwrap();
            assert_eq!(reloaded.entries(), index.entries());
            assert_eq!(keys(&reloaded.lookup("ty")), keys(&index.lookup("ty")));
        }
    }
}
