//! Doxygen `searchData` tables
//!
//! A table is a JavaScript literal of the form
//!
//! ```text
//! var searchData=
//! [
//!   ['take_5fall_564',['take_all',['../class_c_l_i_1_1_option_base.html#a5961',1,'CLI::OptionBase']]],
//!   ...
//! ];
//! ```
//!
//! Each record is `[id, [label, target...]]` and each target is
//! `[link, flag, scope]` where `flag` is `1` for links inside this
//! documentation set and `0` for links resolved through a tag file.
//! `[link, scope]` targets without a flag are accepted as internal.

use std::fmt::Write as _;

use tracing::debug;

use super::escape::{decode_html, decode_search_id, encode_html, encode_search_id};
use super::lexer::{Lexer, Token};
use crate::error::SymdexError;
use crate::models::{IndexEntry, Target};
use crate::Result;

/// Parsed literal value
#[derive(Debug, Clone, PartialEq)]
enum Literal {
    Str(String),
    Number(i64),
    Bool(bool),
    List(Vec<Literal>),
}

impl Literal {
    fn kind(&self) -> &'static str {
        match self {
            Literal::Str(_) => "string",
            Literal::Number(_) => "number",
            Literal::Bool(_) => "boolean",
            Literal::List(_) => "array",
        }
    }
}

/// Recursive-descent parser over lexer tokens
struct LiteralParser {
    lexer: Lexer,
    current: Token,
    current_offset: usize,
}

impl LiteralParser {
    fn new(input: &str) -> Result<Self> {
        let mut lexer = Lexer::new(input);
        let current_offset = lexer.offset();
        let current = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            current_offset,
        })
    }

    fn bump(&mut self) -> Result<Token> {
        self.current_offset = self.lexer.offset();
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    /// Parses an optional `var name =` prelude, one array, and an optional `;`
    fn parse_table(&mut self) -> Result<Vec<Literal>> {
        while matches!(self.current, Token::Ident(_) | Token::Equals) {
            self.bump()?;
        }

        if self.current != Token::LeftBracket {
            return Err(SymdexError::syntax(
                self.current_offset,
                "expected '[' to open the search table",
            ));
        }
        let offset = self.current_offset;
        let table = match self.parse_value()? {
            Literal::List(items) => items,
            other => {
                return Err(SymdexError::syntax(
                    offset,
                    format!("search table must be an array, found {}", other.kind()),
                ))
            }
        };

        if self.current == Token::Semicolon {
            self.bump()?;
        }
        if self.current != Token::Eof {
            return Err(SymdexError::syntax(
                self.current_offset,
                "unexpected content after the search table",
            ));
        }
        Ok(table)
    }

    fn parse_value(&mut self) -> Result<Literal> {
        let offset = self.current_offset;
        match self.bump()? {
            Token::Str(s) => Ok(Literal::Str(s)),
            Token::Number(n) => Ok(Literal::Number(n)),
            Token::Ident(ident) => match ident.as_str() {
                "true" => Ok(Literal::Bool(true)),
                "false" => Ok(Literal::Bool(false)),
                _ => Err(SymdexError::syntax(
                    offset,
                    format!("unexpected identifier '{}'", ident),
                )),
            },
            Token::LeftBracket => self.parse_list_tail(),
            other => Err(SymdexError::syntax(
                offset,
                format!("expected a value, found {:?}", other),
            )),
        }
    }

    /// Parses list items after the opening bracket; trailing commas are allowed
    fn parse_list_tail(&mut self) -> Result<Literal> {
        let mut items = Vec::new();
        loop {
            if self.current == Token::RightBracket {
                self.bump()?;
                return Ok(Literal::List(items));
            }
            items.push(self.parse_value()?);
            match self.current {
                Token::Comma => {
                    self.bump()?;
                }
                Token::RightBracket => {}
                _ => {
                    return Err(SymdexError::syntax(
                        self.current_offset,
                        "expected ',' or ']' in array",
                    ))
                }
            }
        }
    }
}

/// Parse a Doxygen search table into entries, in table order
pub fn parse(input: &str) -> Result<Vec<IndexEntry>> {
    let records = LiteralParser::new(input)?.parse_table()?;
    let entries = records
        .into_iter()
        .enumerate()
        .map(|(position, record)| record_to_entry(position, record))
        .collect::<Result<Vec<_>>>()?;

    debug!(entries = entries.len(), "parsed doxygen search table");
    Ok(entries)
}

fn record_to_entry(position: usize, record: Literal) -> Result<IndexEntry> {
    let malformed = |reason: String| SymdexError::malformed(position, reason);

    let mut fields = match record {
        Literal::List(fields) => fields.into_iter(),
        other => {
            return Err(malformed(format!(
                "expected [id, [label, targets...]], found {}",
                other.kind()
            )))
        }
    };

    let id = match fields.next() {
        Some(Literal::Str(id)) => id,
        Some(other) => return Err(malformed(format!("id must be a string, found {}", other.kind()))),
        None => return Err(malformed("missing key".to_string())),
    };
    let key = decode_search_id(&id).map_err(malformed)?;

    let mut body = match fields.next() {
        Some(Literal::List(body)) => body.into_iter(),
        Some(other) => {
            return Err(malformed(format!(
                "entry body must be an array, found {}",
                other.kind()
            )))
        }
        None => return Err(malformed("missing label".to_string())),
    };

    let label = match body.next() {
        Some(Literal::Str(label)) => decode_html(&label),
        Some(other) => {
            return Err(malformed(format!("label must be a string, found {}", other.kind())))
        }
        None => return Err(malformed("missing label".to_string())),
    };

    let targets = body
        .enumerate()
        .map(|(i, target)| literal_to_target(i, target).map_err(&malformed))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    IndexEntry::new(key, label, targets).map_err(|e| malformed(e.to_string()))
}

fn literal_to_target(index: usize, literal: Literal) -> std::result::Result<Target, String> {
    let parts = match literal {
        Literal::List(parts) => parts,
        other => {
            return Err(format!(
                "target {} must be an array, found {}",
                index,
                other.kind()
            ))
        }
    };

    let (link, flag, scope) = match parts.as_slice() {
        [Literal::Str(link), flag, Literal::Str(scope)] => (link, Some(flag), scope.as_str()),
        [Literal::Str(link), Literal::Str(scope)] => (link, None, scope.as_str()),
        [Literal::Str(link)] => (link, None, ""),
        [] => return Err(format!("target {} is missing its document path", index)),
        _ => return Err(format!("target {} has an unrecognized shape", index)),
    };

    let internal = match flag {
        None => true,
        Some(Literal::Number(n)) => *n != 0,
        Some(Literal::Bool(b)) => *b,
        Some(other) => {
            return Err(format!(
                "target {} link flag must be a number, found {}",
                index,
                other.kind()
            ))
        }
    };

    Ok(Target::from_link(link, decode_html(scope)).with_external(!internal))
}

/// Render entries as a Doxygen search table.
/// Ids are numbered from zero in table order.
pub fn render(entries: &[IndexEntry]) -> String {
    let mut out = String::from("var searchData=\n[\n");

    for (counter, entry) in entries.iter().enumerate() {
        let _ = write!(
            out,
            "  ['{}',['{}'",
            js_escape(&encode_search_id(entry.key(), counter)),
            js_escape(&encode_html(entry.label()))
        );
        for target in entry.targets() {
            let _ = write!(
                out,
                ",['{}',{},'{}']",
                js_escape(&target.url()),
                if target.external { 0 } else { 1 },
                js_escape(&encode_html(&target.scope_label))
            );
        }
        out.push_str("]]");
        if counter + 1 < entries.len() {
            out.push(',');
        }
        out.push('\n');
    }

    out.push_str("];\n");
    out
}

fn js_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out
}
