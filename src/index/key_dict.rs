//! Key dictionary using FST (Finite State Transducer)
//!
//! Maps case-folded keys to the group of entry ids that share them.
//! FST provides O(|key|) exact lookups and prefix streams without scanning
//! the whole key set.

use std::collections::BTreeMap;

use fst::automaton::{Automaton, Str};
use fst::{IntoStreamer, Map, MapBuilder, Streamer};

use crate::error::SymdexError;
use crate::Result;

/// Entry position in load order
pub type EntryId = u32;

/// Key dictionary backed by FST
///
/// The FST stores a u64 value which indexes into the `groups` array.
pub struct KeyDictionary {
    fst: Map<Vec<u8>>,
    /// Entry ids per folded key, each group ascending
    groups: Vec<Vec<EntryId>>,
}

impl KeyDictionary {
    /// Entry ids whose folded key equals `folded`
    pub fn get(&self, folded: &str) -> &[EntryId] {
        self.fst
            .get(folded.as_bytes())
            .map(|idx| self.groups[idx as usize].as_slice())
            .unwrap_or(&[])
    }

    /// Check if a folded key exists
    pub fn contains(&self, folded: &str) -> bool {
        self.fst.contains_key(folded.as_bytes())
    }

    /// Entry ids of every folded key starting with `prefix`
    pub fn prefix_search(&self, prefix: &str) -> Vec<EntryId> {
        let matcher = Str::new(prefix).starts_with();
        let mut stream = self.fst.search(matcher).into_stream();

        let mut ids = Vec::new();
        while let Some((_, idx)) = stream.next() {
            ids.extend_from_slice(&self.groups[idx as usize]);
        }
        ids
    }

    /// Number of distinct folded keys
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Size of the FST in bytes
    pub fn fst_size(&self) -> usize {
        self.fst.as_fst().size()
    }
}

/// Builder for key dictionaries
#[derive(Default)]
pub struct KeyDictionaryBuilder {
    keys: BTreeMap<String, Vec<EntryId>>,
}

impl KeyDictionaryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entry under its folded key.
    /// Ids must be added in ascending order.
    pub fn add(&mut self, folded: String, id: EntryId) {
        self.keys.entry(folded).or_default().push(id);
    }

    /// Build the key dictionary
    pub fn build(self) -> Result<KeyDictionary> {
        let mut fst_builder = MapBuilder::memory();
        let mut groups = Vec::with_capacity(self.keys.len());

        // BTreeMap iterates in byte order, which is what the FST requires
        for (idx, (key, ids)) in self.keys.into_iter().enumerate() {
            fst_builder
                .insert(key.as_bytes(), idx as u64)
                .map_err(|e| SymdexError::Internal(format!("fst insert failed: {}", e)))?;
            groups.push(ids);
        }

        let fst_data = fst_builder
            .into_inner()
            .map_err(|e| SymdexError::Internal(format!("fst build failed: {}", e)))?;
        let fst = Map::new(fst_data)
            .map_err(|e| SymdexError::Internal(format!("fst load failed: {}", e)))?;

        Ok(KeyDictionary { fst, groups })
    }
}
