//! Tagged JSON tables
//!
//! ```json
//! [
//!   {
//!     "key": "type_size",
//!     "label": "type_size",
//!     "targets": [
//!       { "document_path": "../class_c_l_i_1_1_option.html", "anchor": "a490e", "scope_label": "CLI::Option::type_size(int)" }
//!     ]
//!   }
//! ]
//! ```

use serde::Deserialize;
use tracing::debug;

use crate::error::SymdexError;
use crate::models::{IndexEntry, Target};
use crate::Result;

/// Record as read from disk, before validation
#[derive(Debug, Deserialize)]
struct JsonRecord {
    key: Option<String>,
    label: Option<String>,
    targets: Option<Vec<JsonTarget>>,
}

#[derive(Debug, Deserialize)]
struct JsonTarget {
    document_path: Option<String>,
    anchor: Option<String>,
    #[serde(default)]
    scope_label: String,
    #[serde(default)]
    external: bool,
}

/// Parse a JSON table into entries, in table order
pub fn parse(input: &str) -> Result<Vec<IndexEntry>> {
    let records: Vec<JsonRecord> = serde_json::from_str(input)?;
    let entries = records
        .into_iter()
        .enumerate()
        .map(|(position, record)| record.into_entry(position))
        .collect::<Result<Vec<_>>>()?;

    debug!(entries = entries.len(), "parsed json search table");
    Ok(entries)
}

/// Render entries as a pretty-printed JSON table
pub fn render(entries: &[IndexEntry]) -> Result<String> {
    Ok(serde_json::to_string_pretty(entries)?)
}

impl JsonRecord {
    fn into_entry(self, position: usize) -> Result<IndexEntry> {
        let key = self
            .key
            .ok_or_else(|| SymdexError::malformed(position, "missing key"))?;
        let label = self
            .label
            .ok_or_else(|| SymdexError::malformed(position, "missing label"))?;
        let targets = self
            .targets
            .ok_or_else(|| SymdexError::malformed(position, "missing targets"))?
            .into_iter()
            .enumerate()
            .map(|(i, target)| target.into_target(position, i))
            .collect::<Result<Vec<_>>>()?;

        IndexEntry::new(key, label, targets)
            .map_err(|e| SymdexError::malformed(position, e.to_string()))
    }
}

impl JsonTarget {
    fn into_target(self, position: usize, index: usize) -> Result<Target> {
        let document_path = self.document_path.ok_or_else(|| {
            SymdexError::malformed(position, format!("target {} is missing document_path", index))
        })?;
        let anchor = self.anchor.ok_or_else(|| {
            SymdexError::malformed(position, format!("target {} is missing anchor", index))
        })?;

        Ok(Target::new(document_path, anchor, self.scope_label).with_external(self.external))
    }
}
