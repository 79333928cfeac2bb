//! Where a symbol index is loaded from

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::symbol_index::SymbolIndex;
use crate::error::SymdexError;
use crate::format::TableFormat;
use crate::Result;

/// Location of a serialized search table
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TableSource {
    /// One table file
    File {
        path: PathBuf,
        #[serde(default)]
        format: TableFormat,
    },
    /// All `<category>_<n>.js` tables of a Doxygen `search/` directory,
    /// merged in ascending `n`
    Directory { path: PathBuf, category: String },
}

impl TableSource {
    pub fn file(path: impl Into<PathBuf>, format: TableFormat) -> Self {
        TableSource::File {
            path: path.into(),
            format,
        }
    }

    pub fn directory(path: impl Into<PathBuf>, category: impl Into<String>) -> Self {
        TableSource::Directory {
            path: path.into(),
            category: category.into(),
        }
    }

    /// Read and parse the table(s), building a fresh index
    pub fn load(&self) -> Result<SymbolIndex> {
        match self {
            TableSource::File { path, format } => {
                let input = fs::read_to_string(path)?;
                SymbolIndex::load(&input, *format).map_err(|e| in_file(e, path))
            }
            TableSource::Directory { path, category } => load_directory(path, category),
        }
    }

    /// Human-readable description for logs
    pub fn describe(&self) -> String {
        match self {
            TableSource::File { path, .. } => path.display().to_string(),
            TableSource::Directory { path, category } => {
                format!("{}/{}_*.js", path.display(), category)
            }
        }
    }
}

fn load_directory(dir: &Path, category: &str) -> Result<SymbolIndex> {
    let start = Instant::now();
    let files = category_files(dir, category)?;
    if files.is_empty() {
        return Err(SymdexError::Config(format!(
            "no '{}' search tables found in {}",
            category,
            dir.display()
        )));
    }

    let mut entries = Vec::new();
    for path in &files {
        let input = fs::read_to_string(path)?;
        let parsed = TableFormat::Auto.parse(&input).map_err(|e| in_file(e, path))?;
        debug!(file = %path.display(), entries = parsed.len(), "read search table");
        entries.extend(parsed);
    }

    let index = SymbolIndex::from_entries(entries)?;
    info!(
        dir = %dir.display(),
        category,
        files = files.len(),
        entries = index.len(),
        took_ms = start.elapsed().as_millis() as u64,
        "loaded symbol index from directory"
    );
    Ok(index)
}

/// Files named `<category>_<n>.js`, sorted by `n`
fn category_files(dir: &Path, category: &str) -> Result<Vec<PathBuf>> {
    let prefix = format!("{}_", category);
    let mut numbered = Vec::new();

    for dir_entry in fs::read_dir(dir)? {
        let path = dir_entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let number = name
            .strip_prefix(&prefix)
            .and_then(|rest| rest.strip_suffix(".js"))
            .and_then(|n| n.parse::<u32>().ok());
        if let Some(number) = number {
            numbered.push((number, path));
        }
    }

    numbered.sort_by_key(|(number, _)| *number);
    Ok(numbered.into_iter().map(|(_, path)| path).collect())
}

/// Prefix table errors with the file they came from
fn in_file(err: SymdexError, path: &Path) -> SymdexError {
    match err {
        SymdexError::MalformedIndex { record, reason } => SymdexError::MalformedIndex {
            record,
            reason: format!("{}: {}", path.display(), reason),
        },
        SymdexError::Syntax { offset, reason } => SymdexError::Syntax {
            offset,
            reason: format!("{}: {}", path.display(), reason),
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, body: &str) {
        fs::write(dir.join(name), body).unwrap();
    }

    #[test]
    fn test_category_files_sorted_numerically() {
        let tmp = TempDir::new().unwrap();
        for name in ["all_10.js", "all_2.js", "all_0.js", "classes_0.js", "all_x.js", "searchdata.js"] {
            write(tmp.path(), name, "var searchData=[];");
        }

        let files = category_files(tmp.path(), "all").unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["all_0.js", "all_2.js", "all_10.js"]);
    }

    #[test]
    fn test_empty_directory_is_config_error() {
        let tmp = TempDir::new().unwrap();
        let err = TableSource::directory(tmp.path(), "all").load().unwrap_err();
        assert!(matches!(err, SymdexError::Config(_)));
    }

    #[test]
    fn test_malformed_file_names_the_file() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "all_0.js", "var searchData=[['a_1',['a']]];");

        let err = TableSource::directory(tmp.path(), "all").load().unwrap_err();
        match err {
            SymdexError::MalformedIndex { record, reason } => {
                assert_eq!(record, 0);
                assert!(reason.contains("all_0.js"), "{}", reason);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = TableSource::file("/nonexistent/search.js", TableFormat::Auto)
            .load()
            .unwrap_err();
        assert!(matches!(err, SymdexError::Io(_)));
    }

    #[test]
    fn test_source_serde() {
        let source: TableSource =
            toml::from_str("kind = \"directory\"\npath = \"docs/html/search\"\ncategory = \"all\"")
                .unwrap();
        assert_eq!(source, TableSource::directory("docs/html/search", "all"));
        assert_eq!(source.describe(), "docs/html/search/all_*.js");
    }
}
