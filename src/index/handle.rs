//! Atomically swappable reference to the current symbol index

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::{info, warn};

use super::source::TableSource;
use super::symbol_index::SymbolIndex;
use crate::error::SymdexError;
use crate::Result;

/// Thread-safe holder for the served index.
///
/// Readers take an `Arc` snapshot that stays valid across swaps; a
/// regenerated table replaces the whole index in one store.
pub struct IndexHandle {
    inner: ArcSwap<SymbolIndex>,
    source: Option<TableSource>,
    generation: AtomicU64,
}

impl IndexHandle {
    /// Wrap an already-built index with no reload source
    pub fn new(index: SymbolIndex) -> Self {
        Self {
            inner: ArcSwap::from_pointee(index),
            source: None,
            generation: AtomicU64::new(1),
        }
    }

    /// Load the index from `source`, remembering it for reloads
    pub fn open(source: TableSource) -> Result<Self> {
        let index = source.load()?;
        Ok(Self {
            inner: ArcSwap::from_pointee(index),
            source: Some(source),
            generation: AtomicU64::new(1),
        })
    }

    /// Snapshot of the current index
    pub fn current(&self) -> Arc<SymbolIndex> {
        self.inner.load_full()
    }

    /// Number of indexes installed so far, starting at 1
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    pub fn source(&self) -> Option<&TableSource> {
        self.source.as_ref()
    }

    /// Atomically replace the index, returning the new generation
    pub fn replace(&self, index: SymbolIndex) -> u64 {
        self.install(Arc::new(index))
    }

    fn install(&self, index: Arc<SymbolIndex>) -> u64 {
        self.inner.store(index);
        self.generation.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Reload from the configured source, returning the installed index and
    /// its generation.
    ///
    /// The current index keeps serving if the reload fails.
    pub fn reload(&self) -> Result<(Arc<SymbolIndex>, u64)> {
        let source = self
            .source
            .as_ref()
            .ok_or_else(|| SymdexError::Config("index has no reload source".to_string()))?;

        match source.load() {
            Ok(index) => {
                let index = Arc::new(index);
                let generation = self.install(index.clone());
                info!(source = %source.describe(), entries = index.len(), generation, "reloaded symbol index");
                Ok((index, generation))
            }
            Err(e) => {
                warn!(source = %source.describe(), error = %e, "reload failed, keeping current index");
                Err(e)
            }
        }
    }
}
