//! # JSON Token
//!
//! Defines possible tokens from lexing a JSON document byte sequence.
use std::fmt::Display;

/// Represents a token value from a JSON document.
///
/// Only [`JToken::JString`] and [`JToken::JNumber`] carry text; every other
/// token is fully described by its tag.
#[derive(Debug, PartialEq, Clone, Eq)]
pub enum JToken {
    /* Delimiters */
    /// Opening curly brace
    LCurly,

    /// Closing curly brace
    RCurly,

    /// Opening square bracket
    LSquare,

    /// Closing square bracket
    RSquare,

    /// Colon character
    Colon,

    /// Comma character
    Comma,

    /* Values */
    /// Nil value
    Null,

    /// Boolean value
    Bool(bool),

    /// String value, the raw bytes between the quotes (escapes untouched)
    JString(String),

    /// Numeric value
    // NOTE: kept as raw text; the parser decides how to interpret it.
    JNumber(String),

    /* Reserved */
    /// End of input
    Eof,
}

impl JToken {
    /// Short name of the token's tag, e.g. `"string"` or `"'{'"`.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::LCurly => "'{'",
            Self::RCurly => "'}'",
            Self::LSquare => "'['",
            Self::RSquare => "']'",
            Self::Colon => "':'",
            Self::Comma => "','",
            Self::Null => "null",
            Self::Bool(true) => "true",
            Self::Bool(false) => "false",
            Self::JString(_) => "string",
            Self::JNumber(_) => "number",
            Self::Eof => "end of input",
        }
    }

    /// Whether this token can begin a value.
    #[must_use]
    pub const fn starts_value(&self) -> bool {
        matches!(
            self,
            Self::LCurly
                | Self::LSquare
                | Self::Null
                | Self::Bool(_)
                | Self::JString(_)
                | Self::JNumber(_)
        )
    }
}

impl Display for JToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LCurly => write!(f, "{{"),
            Self::RCurly => write!(f, "}}"),
            Self::LSquare => write!(f, "["),
            Self::RSquare => write!(f, "]"),
            Self::Colon => write!(f, ":"),
            Self::Comma => write!(f, ","),
            Self::Null => write!(f, "null"),
            Self::Bool(val) => write!(f, "{val}"),
            Self::JString(text) => write!(f, "\"{text}\""),
            Self::JNumber(text) => write!(f, "{text}"),
            Self::Eof => write!(f, ""),
        }
    }
}
