//! Parse errors and structural diagnostics.
use std::error::Error;
use std::fmt;

use crate::tokenizer::LexError;

/// A deviation from the JSON grammar.
///
/// Lenient parses record these as warnings and carry on with a best-effort
/// tree; strict parses fail on the first one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    /// The document does not start with a value.
    NoValue {
        /// The token found instead
        found: &'static str,
    },
    /// Input ended inside an object or array.
    Unclosed {
        /// The delimiter that never arrived
        closing: char,
    },
    /// A token that has no place at this point of an object or array.
    UnexpectedToken {
        /// The offending token
        found: &'static str,
        /// `"object"` or `"array"`
        within: &'static str,
    },
    /// A `:` with no key before it.
    MissingKey,
    /// An object key not followed by `:`.
    MissingColon,
    /// A `key:` with no value after it.
    MissingValue,
    /// Two members without a `,` between them.
    MissingComma,
    /// A `,` directly before the closing delimiter.
    TrailingComma,
    /// Number text that is not a valid number, e.g. `1-2`.
    InvalidNumber(String),
    /// Tokens after the top-level value.
    TrailingContent {
        /// The first token after the value
        found: &'static str,
    },
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoValue { found } => write!(f, "expected a value, found {found}"),
            Self::Unclosed { closing } => {
                write!(f, "input ended before the closing '{closing}'")
            }
            Self::UnexpectedToken { found, within } => {
                write!(f, "unexpected {found} in {within}")
            }
            Self::MissingKey => write!(f, "':' without a preceding key"),
            Self::MissingColon => write!(f, "object key not followed by ':'"),
            Self::MissingValue => write!(f, "object key has no value"),
            Self::MissingComma => write!(f, "missing ',' between members"),
            Self::TrailingComma => write!(f, "trailing ',' before closing delimiter"),
            Self::InvalidNumber(text) => write!(f, "`{text}` is not a valid number"),
            Self::TrailingContent { found } => {
                write!(f, "unexpected {found} after the top-level value")
            }
        }
    }
}

/// A structural issue and the byte offset just past the token that
/// revealed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralIssue {
    /// What is wrong
    pub kind: IssueKind,
    /// Where it was noticed
    pub offset: usize,
}

impl fmt::Display for StructuralIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at byte {})", self.kind, self.offset)
    }
}

/// Represents errors that abort a parse.
#[derive(Debug)]
pub enum ParseError {
    /// The lexer could not produce a token.
    Lex(LexError),
    /// A structural issue in strict mode.
    Structural(StructuralIssue),
    /// Containers nested deeper than [`ParseOptions::max_depth`](super::ParseOptions::max_depth).
    TooDeep {
        /// The configured limit
        limit: usize,
        /// Offset of the container that crossed it
        offset: usize,
    },
}

impl ParseError {
    /// The structural issue behind this error, if that is what it is.
    #[must_use]
    pub const fn issue(&self) -> Option<&StructuralIssue> {
        match self {
            Self::Structural(issue) => Some(issue),
            _ => None,
        }
    }
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        Self::Lex(err)
    }
}

impl Error for ParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Lex(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lex(err) => write!(f, "Lexical error: {err}"),
            Self::Structural(issue) => write!(f, "Structural error: {issue}"),
            Self::TooDeep { limit, offset } => write!(
                f,
                "Nesting deeper than {limit} levels at byte {offset}"
            ),
        }
    }
}
