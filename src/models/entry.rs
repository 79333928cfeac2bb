use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single clickable destination for an index entry
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
    /// Relative path of the generated page
    pub document_path: String,
    /// In-page fragment, empty for page-level links
    pub anchor: String,
    /// Enclosing type/namespace shown to disambiguate overloads
    pub scope_label: String,
    /// Link into another documentation set rather than this one
    #[serde(default)]
    pub external: bool,
}

impl Target {
    pub fn new(
        document_path: impl Into<String>,
        anchor: impl Into<String>,
        scope_label: impl Into<String>,
    ) -> Self {
        Self {
            document_path: document_path.into(),
            anchor: anchor.into(),
            scope_label: scope_label.into(),
            external: false,
        }
    }

    /// Build a target from a `path#anchor` link
    pub fn from_link(link: &str, scope_label: impl Into<String>) -> Self {
        let (path, anchor) = link.split_once('#').unwrap_or((link, ""));
        Self::new(path, anchor, scope_label)
    }

    pub fn with_external(mut self, external: bool) -> Self {
        self.external = external;
        self
    }

    /// The `path#anchor` link, or the bare path for page-level targets
    pub fn url(&self) -> String {
        if self.anchor.is_empty() {
            self.document_path.clone()
        } else {
            format!("{}#{}", self.document_path, self.anchor)
        }
    }
}

/// Reasons an entry cannot be constructed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidEntry {
    #[error("key is empty")]
    EmptyKey,

    #[error("entry has no targets")]
    NoTargets,

    #[error("target {0} has an empty document path")]
    EmptyDocumentPath(usize),

    #[error("target {0} has a '#' in its document path")]
    FragmentInDocumentPath(usize),
}

/// One row of the symbol index
///
/// An entry always carries at least one target; the only way to build one is
/// [`IndexEntry::new`], which rejects empty target lists.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IndexEntry {
    key: String,
    label: String,
    targets: Vec<Target>,
}

impl IndexEntry {
    pub fn new(
        key: impl Into<String>,
        label: impl Into<String>,
        targets: Vec<Target>,
    ) -> Result<Self, InvalidEntry> {
        let key = key.into();
        if key.is_empty() {
            return Err(InvalidEntry::EmptyKey);
        }
        if targets.is_empty() {
            return Err(InvalidEntry::NoTargets);
        }
        if let Some(pos) = targets.iter().position(|t| t.document_path.is_empty()) {
            return Err(InvalidEntry::EmptyDocumentPath(pos));
        }
        // `path#anchor` links split at the first '#'
        if let Some(pos) = targets.iter().position(|t| t.document_path.contains('#')) {
            return Err(InvalidEntry::FragmentInDocumentPath(pos));
        }

        Ok(Self {
            key,
            label: label.into(),
            targets,
        })
    }

    /// Lookup token
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Human-readable display text
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Destinations, never empty
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// First destination
    pub fn primary_target(&self) -> &Target {
        &self.targets[0]
    }

    /// Key folded for case-insensitive matching
    pub fn folded_key(&self) -> String {
        fold_key(&self.key)
    }
}

/// Case folding applied to keys and queries alike.
///
/// Lowercases one character at a time so a prefix of a key folds to a
/// prefix of the folded key (`str::to_lowercase` maps a word-final sigma
/// differently).
pub fn fold_key(key: &str) -> String {
    key.chars().flat_map(char::to_lowercase).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_from_link() {
        let target = Target::from_link("../class_c_l_i_1_1_option.html#a490e", "CLI::Option");
        assert_eq!(target.document_path, "../class_c_l_i_1_1_option.html");
        assert_eq!(target.anchor, "a490e");
        assert_eq!(target.url(), "../class_c_l_i_1_1_option.html#a490e");
        assert!(!target.external);

        let page = Target::from_link("../classltsy_1_1_truth_interp.html", "ltsy");
        assert_eq!(page.anchor, "");
        assert_eq!(page.url(), "../classltsy_1_1_truth_interp.html");
    }

    #[test]
    fn test_entry_requires_targets() {
        assert_eq!(
            IndexEntry::new("take_all", "take_all", vec![]),
            Err(InvalidEntry::NoTargets)
        );
        assert_eq!(
            IndexEntry::new("", "x", vec![Target::new("a.html", "b", "")]),
            Err(InvalidEntry::EmptyKey)
        );
        assert_eq!(
            IndexEntry::new(
                "x",
                "x",
                vec![Target::new("a.html", "b", ""), Target::new("", "c", "")]
            ),
            Err(InvalidEntry::EmptyDocumentPath(1))
        );
        assert_eq!(
            IndexEntry::new("x", "x", vec![Target::new("dir#1/page.html", "anc", "")]),
            Err(InvalidEntry::FragmentInDocumentPath(0))
        );
    }

    #[test]
    fn test_entry_accessors() {
        let entry = IndexEntry::new(
            "TruthTable",
            "TruthTable",
            vec![
                Target::new("t.html", "", "ltsy"),
                Target::new("t.html", "ace15", "ltsy::TruthTable::TruthTable()"),
            ],
        )
        .unwrap();

        assert_eq!(entry.key(), "TruthTable");
        assert_eq!(entry.folded_key(), "truthtable");
        assert_eq!(entry.targets().len(), 2);
        assert_eq!(entry.primary_target().scope_label, "ltsy");
    }

    #[test]
    fn test_fold_key_ignores_word_position() {
        assert_eq!(fold_key("ΑΣΑ"), "ασα");
        assert_eq!(fold_key("ΑΣ"), "ασ");
        assert!(fold_key("ΑΣΑ").starts_with(&fold_key("ΑΣ")));
    }
}
