use serde::{Deserialize, Serialize};

use super::entry::{IndexEntry, Target};

/// How a query string is matched against keys
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupMode {
    /// Case-insensitive key prefix
    Prefix,
    /// Exact, case-sensitive key
    Exact,
}

impl LookupMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupMode::Prefix => "prefix",
            LookupMode::Exact => "exact",
        }
    }
}

/// A target rendered for a search widget
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetLink {
    pub url: String,
    pub document_path: String,
    pub anchor: String,
    pub scope_label: String,
    pub external: bool,
}

impl From<&Target> for TargetLink {
    fn from(target: &Target) -> Self {
        Self {
            url: target.url(),
            document_path: target.document_path.clone(),
            anchor: target.anchor.clone(),
            scope_label: target.scope_label.clone(),
            external: target.external,
        }
    }
}

/// One matched entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub key: String,
    pub label: String,
    pub targets: Vec<TargetLink>,
}

impl From<&IndexEntry> for SearchHit {
    fn from(entry: &IndexEntry) -> Self {
        Self {
            key: entry.key().to_string(),
            label: entry.label().to_string(),
            targets: entry.targets().iter().map(TargetLink::from).collect(),
        }
    }
}

/// Search response with timing information
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub mode: LookupMode,
    pub query: String,
    pub results: Vec<SearchHit>,
    pub took_ms: u64,
    /// Matches before any limit was applied
    pub total_hits: usize,
}
