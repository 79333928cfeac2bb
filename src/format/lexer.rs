//! Lexer for search table literals
//!
//! Tokenizes the JavaScript array literals that documentation generators
//! write into `search/*.js` files.

use crate::error::SymdexError;
use crate::Result;

/// Token types for search table literals
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Bare identifier (`var`, `searchData`, `true`, ...)
    Ident(String),
    /// Single- or double-quoted string with escapes resolved
    Str(String),
    /// Integer literal
    Number(i64),

    LeftBracket,
    RightBracket,
    Comma,
    Equals,
    Semicolon,

    /// End of input
    Eof,
}

/// Lexer for tokenizing search table literals
pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    /// Create a new lexer for the given input string
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
        }
    }

    /// Character offset of the next unread input
    pub fn offset(&self) -> usize {
        self.position
    }

    /// Get the next token from the input
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_trivia()?;

        if self.position >= self.input.len() {
            return Ok(Token::Eof);
        }

        let ch = self.current_char();

        match ch {
            '[' => {
                self.advance();
                Ok(Token::LeftBracket)
            }
            ']' => {
                self.advance();
                Ok(Token::RightBracket)
            }
            ',' => {
                self.advance();
                Ok(Token::Comma)
            }
            '=' => {
                self.advance();
                Ok(Token::Equals)
            }
            ';' => {
                self.advance();
                Ok(Token::Semicolon)
            }
            '\'' | '"' => {
                self.advance();
                self.read_string(ch)
            }
            '-' => self.read_number(),
            _ if ch.is_ascii_digit() => self.read_number(),
            _ if ch.is_alphabetic() || ch == '_' || ch == '$' => Ok(self.read_ident()),
            _ => Err(SymdexError::syntax(
                self.position,
                format!("unexpected character '{}'", ch),
            )),
        }
    }

    fn read_ident(&mut self) -> Token {
        let mut ident = String::new();
        while self.position < self.input.len() {
            let ch = self.current_char();
            if ch.is_alphanumeric() || ch == '_' || ch == '$' || ch == '.' {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        Token::Ident(ident)
    }

    fn read_string(&mut self, quote: char) -> Result<Token> {
        let start = self.position - 1;
        let mut s = String::new();

        while self.position < self.input.len() {
            let ch = self.current_char();
            if ch == quote {
                self.advance();
                return Ok(Token::Str(s));
            }
            if ch == '\\' {
                self.advance();
                if self.position >= self.input.len() {
                    break;
                }
                let escaped = self.current_char();
                match escaped {
                    'n' => s.push('\n'),
                    't' => s.push('\t'),
                    'r' => s.push('\r'),
                    'u' => {
                        let code = self.read_unicode_escape()?;
                        s.push(code);
                        continue;
                    }
                    // \' \" \\ \/ and anything else stand for themselves
                    _ => s.push(escaped),
                }
                self.advance();
            } else {
                s.push(ch);
                self.advance();
            }
        }

        Err(SymdexError::syntax(start, "unterminated string"))
    }

    /// Reads the four hex digits after `\u`; the lexer sits on the `u`.
    /// A high surrogate must be followed by a `\uXXXX` low surrogate.
    fn read_unicode_escape(&mut self) -> Result<char> {
        let start = self.position;
        self.advance();
        let high = self.read_hex4(start)?;

        let code = if (0xD800..0xDC00).contains(&high) {
            if self.input.get(self.position) != Some(&'\\')
                || self.input.get(self.position + 1) != Some(&'u')
            {
                return Err(SymdexError::syntax(start, "unpaired surrogate in \\u escape"));
            }
            self.position += 2;
            let low = self.read_hex4(start)?;
            if !(0xDC00..0xE000).contains(&low) {
                return Err(SymdexError::syntax(start, "unpaired surrogate in \\u escape"));
            }
            0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
        } else {
            high
        };

        char::from_u32(code).ok_or_else(|| {
            SymdexError::syntax(start, format!("invalid \\u escape '{:04x}'", code))
        })
    }

    fn read_hex4(&mut self, start: usize) -> Result<u32> {
        if self.position + 4 > self.input.len() {
            return Err(SymdexError::syntax(start, "truncated \\u escape"));
        }
        let hex: String = self.input[self.position..self.position + 4].iter().collect();
        self.position += 4;
        u32::from_str_radix(&hex, 16)
            .map_err(|_| SymdexError::syntax(start, format!("invalid \\u escape '{}'", hex)))
    }

    fn read_number(&mut self) -> Result<Token> {
        let start = self.position;
        let mut num_str = String::new();
        if self.current_char() == '-' {
            num_str.push('-');
            self.advance();
        }

        while self.position < self.input.len() && self.current_char().is_ascii_digit() {
            num_str.push(self.current_char());
            self.advance();
        }

        num_str
            .parse::<i64>()
            .map(Token::Number)
            .map_err(|_| SymdexError::syntax(start, format!("invalid number '{}'", num_str)))
    }

    fn current_char(&self) -> char {
        self.input[self.position]
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    /// Skips whitespace and `//` or `/* */` comments
    fn skip_trivia(&mut self) -> Result<()> {
        loop {
            while self.position < self.input.len() && self.current_char().is_whitespace() {
                self.advance();
            }
            if self.position >= self.input.len() || self.current_char() != '/' {
                return Ok(());
            }
            match self.peek() {
                Some('/') => {
                    while self.position < self.input.len() && self.current_char() != '\n' {
                        self.advance();
                    }
                }
                Some('*') => {
                    let start = self.position;
                    self.position += 2;
                    loop {
                        if self.position + 1 >= self.input.len() {
                            return Err(SymdexError::syntax(start, "unterminated comment"));
                        }
                        if self.current_char() == '*' && self.peek() == Some('/') {
                            self.position += 2;
                            break;
                        }
                        self.advance();
                    }
                }
                _ => return Ok(()),
            }
        }
    }
}
