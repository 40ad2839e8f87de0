//! # JSON Lexer
//!
//! Turns a sequential byte source from a JSON document into tokens, one
//! token per call, hiding whitespace and raw-byte handling from the parser.
//!
//! ```rust
//! use minijson::tokenizer::{JToken, Lexer};
//!
//! let mut lexer = Lexer::new(r#"{"n": 1}"#.as_bytes());
//! assert_eq!(lexer.next_token().unwrap(), JToken::LCurly);
//! assert_eq!(lexer.next_token().unwrap(), JToken::JString("n".into()));
//! ```
use std::error::Error;
use std::fmt;
use std::io::{self, Read};
use std::iter::FusedIterator;

use crate::tokenizer::JToken;
use crate::tokenizer::source::ByteSource;

/// The ways in which lexing can fail.
#[derive(Debug)]
pub enum LexErrorKind {
    /// A `t`/`f`/`n`-led word did not spell `true`/`false`/`null`.
    MalformedLiteral {
        /// The literal that was being matched
        expected: &'static str,
        /// The first byte that did not match
        found: u8,
    },
    /// The input ended partway through a literal.
    UnexpectedEndOfInput {
        /// The literal that was being matched
        expected: &'static str,
    },
    /// A byte with no lexical production.
    UnexpectedByte(u8),
    /// A string payload was not valid UTF-8.
    InvalidUtf8,
    /// The byte source failed.
    Io(io::Error),
}

/// A lexical error along with the byte offset where it occurred.
#[derive(Debug)]
pub struct LexError {
    kind: LexErrorKind,
    offset: usize,
}

impl LexError {
    const fn new(kind: LexErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }

    /// What went wrong.
    #[must_use]
    pub const fn kind(&self) -> &LexErrorKind {
        &self.kind
    }

    /// Byte offset of the offending byte (or of the end of input).
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// True for both a mismatched literal and one cut short by end of input.
    #[must_use]
    pub const fn is_malformed_literal(&self) -> bool {
        matches!(
            self.kind,
            LexErrorKind::MalformedLiteral { .. }
                | LexErrorKind::UnexpectedEndOfInput { .. }
        )
    }
}

impl Error for LexError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            LexErrorKind::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let offset = self.offset;
        match &self.kind {
            LexErrorKind::MalformedLiteral { expected, found } => write!(
                f,
                "malformed literal at byte {offset}: expected `{expected}`, found '{}'",
                char::from(*found).escape_default()
            ),
            LexErrorKind::UnexpectedEndOfInput { expected } => write!(
                f,
                "unexpected end of input at byte {offset} while reading `{expected}`"
            ),
            LexErrorKind::UnexpectedByte(byte) => write!(
                f,
                "unexpected character '{}' at byte {offset}",
                char::from(*byte).escape_default()
            ),
            LexErrorKind::InvalidUtf8 => {
                write!(f, "string starting at byte {offset} is not valid UTF-8")
            }
            LexErrorKind::Io(err) => {
                write!(f, "failed to read input at byte {offset}: {err}")
            }
        }
    }
}

/// A lexer that pulls bytes from a reader and produces [`JToken`]s.
pub struct Lexer<R> {
    /// The input byte stream
    source: ByteSource<R>,
    /// Set once end of input has been seen; every later call yields `Eof`
    finished: bool,
}

impl<R: Read> Lexer<R> {
    /// Creates a lexer reading from `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            source: ByteSource::new(reader),
            finished: false,
        }
    }

    /// Number of input bytes consumed so far.
    pub const fn offset(&self) -> usize {
        self.source.offset()
    }

    /// Reads and consumes the next byte.
    fn read_byte(&mut self) -> Result<Option<u8>, LexError> {
        let offset = self.source.offset();
        self.source
            .next_byte()
            .map_err(|err| LexError::new(LexErrorKind::Io(err), offset))
    }

    /// Consume whitespace byte(s), returning the first byte after them.
    fn skip_whitespace(&mut self) -> Result<Option<u8>, LexError> {
        loop {
            match self.read_byte()? {
                Some(b' ' | b'\t' | b'\n' | b'\r') => {}
                other => return Ok(other),
            }
        }
    }

    /// Returns the next token in the input sequence from the current position.
    ///
    /// Once the input is exhausted this keeps returning [`JToken::Eof`].
    ///
    /// # Errors
    ///
    /// Returns a [`LexError`] for a malformed `true`/`false`/`null`, a byte
    /// that cannot start any token, a non-UTF-8 string, or a failing reader.
    pub fn next_token(&mut self) -> Result<JToken, LexError> {
        if self.finished {
            return Ok(JToken::Eof);
        }

        let Some(byte) = self.skip_whitespace()? else {
            self.finished = true;
            return Ok(JToken::Eof);
        };
        let start = self.source.offset() - 1;

        match byte {
            b'{' => Ok(JToken::LCurly),
            b'}' => Ok(JToken::RCurly),
            b'[' => Ok(JToken::LSquare),
            b']' => Ok(JToken::RSquare),
            b':' => Ok(JToken::Colon),
            b',' => Ok(JToken::Comma),
            b'"' => self.read_string(start),
            b'-' | b'0'..=b'9' => self.read_number(byte),
            b't' => self.read_literal("true", JToken::Bool(true)),
            b'f' => self.read_literal("false", JToken::Bool(false)),
            b'n' => self.read_literal("null", JToken::Null),
            other => {
                Err(LexError::new(LexErrorKind::UnexpectedByte(other), start))
            }
        }
    }

    /// Matches the remainder of `literal`; its first byte is already consumed.
    fn read_literal(
        &mut self,
        literal: &'static str,
        token: JToken,
    ) -> Result<JToken, LexError> {
        for &expected in &literal.as_bytes()[1..] {
            let offset = self.source.offset();
            match self.read_byte()? {
                Some(byte) if byte == expected => {}
                Some(found) => {
                    return Err(LexError::new(
                        LexErrorKind::MalformedLiteral {
                            expected: literal,
                            found,
                        },
                        offset,
                    ));
                }
                None => {
                    return Err(LexError::new(
                        LexErrorKind::UnexpectedEndOfInput { expected: literal },
                        offset,
                    ));
                }
            }
        }
        Ok(token)
    }

    /// Reads a string up to the closing quote or end of input; the opening
    /// quote is already consumed.
    fn read_string(&mut self, start: usize) -> Result<JToken, LexError> {
        let mut bytes = Vec::new();
        loop {
            match self.read_byte()? {
                None | Some(b'"') => break,
                Some(b'\\') => {
                    // keep the escape verbatim so `\"` does not end the string
                    bytes.push(b'\\');
                    if let Some(escaped) = self.read_byte()? {
                        bytes.push(escaped);
                    }
                }
                Some(byte) => bytes.push(byte),
            }
        }

        String::from_utf8(bytes)
            .map(JToken::JString)
            .map_err(|_| LexError::new(LexErrorKind::InvalidUtf8, start))
    }

    /// Greedily reads digits, `.` and `-`, handing back the first byte that
    /// is none of those.
    fn read_number(&mut self, first: u8) -> Result<JToken, LexError> {
        let mut text = String::from(char::from(first));
        while let Some(byte) = self.read_byte()? {
            if byte.is_ascii_digit() || matches!(byte, b'.' | b'-') {
                text.push(char::from(byte));
            } else {
                self.source.unread(byte);
                break;
            }
        }
        Ok(JToken::JNumber(text))
    }

    /// Converts the lexer into an iterator over its tokens.
    ///
    /// The iterator ends before [`JToken::Eof`] and stops for good after the
    /// first error.
    pub fn tokens(self) -> Tokens<R> {
        Tokens {
            lexer: self,
            done: false,
        }
    }
}

/// Iterator returned by [`Lexer::tokens`].
pub struct Tokens<R> {
    lexer: Lexer<R>,
    done: bool,
}

impl<R: Read> Iterator for Tokens<R> {
    type Item = Result<JToken, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.lexer.next_token() {
            Ok(JToken::Eof) => {
                self.done = true;
                None
            }
            Ok(token) => Some(Ok(token)),
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

impl<R: Read> FusedIterator for Tokens<R> {}

/// Tokenize a JSON document into its token sequence, excluding the final
/// [`JToken::Eof`].
///
/// # Errors
///
/// Returns the first [`LexError`] encountered; no partial sequence is
/// returned.
pub fn tokenize<R: Read>(reader: R) -> Result<Vec<JToken>, LexError> {
    Lexer::new(reader).tokens().collect()
}
