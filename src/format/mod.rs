//! Serialized search table formats
//!
//! - `doxygen`: the `var searchData = [...]` literal from `search/*.js`
//! - `json`: tagged records

pub mod doxygen;
pub mod escape;
pub mod json;
pub mod lexer;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SymdexError;
use crate::models::IndexEntry;
use crate::Result;

/// Serialized table format
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableFormat {
    /// Pick from the content
    #[default]
    Auto,
    Doxygen,
    Json,
}

impl TableFormat {
    /// Guess the format of a table from its first significant characters
    pub fn detect(input: &str) -> Result<TableFormat> {
        let trimmed = input.trim_start_matches('\u{feff}').trim_start();

        if trimmed.starts_with("var ") || trimmed.starts_with("//") || trimmed.starts_with("/*") {
            return Ok(TableFormat::Doxygen);
        }

        if let Some(rest) = trimmed.strip_prefix('[') {
            return match rest.trim_start().chars().next() {
                Some('{') | Some(']') | None => Ok(TableFormat::Json),
                _ => Ok(TableFormat::Doxygen),
            };
        }

        let head: String = trimmed.chars().take(16).collect();
        Err(SymdexError::UnknownFormat(format!(
            "cannot detect table format from '{}'",
            head
        )))
    }

    /// Resolve `Auto` against the given content
    pub fn resolve(self, input: &str) -> Result<TableFormat> {
        match self {
            TableFormat::Auto => Self::detect(input),
            concrete => Ok(concrete),
        }
    }

    /// Parse entries in this format
    pub fn parse(self, input: &str) -> Result<Vec<IndexEntry>> {
        match self.resolve(input)? {
            TableFormat::Doxygen => doxygen::parse(input),
            TableFormat::Json => json::parse(input),
            TableFormat::Auto => Err(SymdexError::Internal(
                "table format left unresolved".to_string(),
            )),
        }
    }

    /// Render entries in this format; `Auto` renders Doxygen
    pub fn render(self, entries: &[IndexEntry]) -> Result<String> {
        match self {
            TableFormat::Auto | TableFormat::Doxygen => Ok(doxygen::render(entries)),
            TableFormat::Json => json::render(entries),
        }
    }
}

impl fmt::Display for TableFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TableFormat::Auto => "auto",
            TableFormat::Doxygen => "doxygen",
            TableFormat::Json => "json",
        };
        f.write_str(name)
    }
}

impl FromStr for TableFormat {
    type Err = SymdexError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(TableFormat::Auto),
            "doxygen" | "js" => Ok(TableFormat::Doxygen),
            "json" => Ok(TableFormat::Json),
            other => Err(SymdexError::UnknownFormat(other.to_string())),
        }
    }
}
