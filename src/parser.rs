/*!
# Parser

Recursive-descent parser turning the lexer's token stream into a [`Value`]
tree.

## Examples

```rust
use minijson::parser::parse_str;

let value = parse_str(r#"{"name":"Bob","tags":["a","b"]}"#).unwrap();
assert_eq!(value.get("name").and_then(|v| v.as_str()), Some("Bob"));
```

## Lenient and strict parsing

By default the parser never fails on structure: a missing `:`, an unclosed
`{` or a stray `,` produce a best-effort tree, and each deviation is
recorded as a [`StructuralIssue`] warning. Strict mode turns the first such
issue into an error instead:

```rust
use minijson::parser::{parse_with_options, ParseError, ParseOptions};

let lenient = parse_with_options(r#"{"a":1"#.as_bytes(), ParseOptions::lenient()).unwrap();
assert_eq!(lenient.warnings.len(), 1);

let strict = parse_with_options(r#"{"a":1"#.as_bytes(), ParseOptions::strict());
assert!(matches!(strict, Err(ParseError::Structural(_))));
```

Lexical errors (`trux`, `@`) abort the parse in both modes.
*/

mod descent;
pub mod error;

use std::io::Read;

use crate::tokenizer::Lexer;
use crate::value::Value;

pub use descent::Parser;
pub use error::{IssueKind, ParseError, StructuralIssue};

/// Settings for a parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Fail on the first structural issue instead of recording it
    pub strict: bool,
    /// Maximum number of nested arrays/objects
    pub max_depth: usize,
}

impl ParseOptions {
    /// Nesting limit used unless configured otherwise.
    pub const DEFAULT_MAX_DEPTH: usize = 512;

    /// Best-effort parsing with structural warnings.
    #[must_use]
    pub const fn lenient() -> Self {
        Self {
            strict: false,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }

    /// Grammar-enforcing parsing.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            strict: true,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }

    /// The same options with a different nesting limit.
    #[must_use]
    pub const fn with_max_depth(self, max_depth: usize) -> Self {
        Self { max_depth, ..self }
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::lenient()
    }
}

/// A parsed value together with the structural issues tolerated on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    /// The value tree
    pub value: Value,
    /// Structural warnings, always empty for strict parses
    pub warnings: Vec<StructuralIssue>,
}

/// Parse a JSON document from `reader` leniently, discarding warnings.
///
/// # Errors
///
/// Returns a [`ParseError`] for lexical errors or excessive nesting.
pub fn parse<R: Read>(reader: R) -> Result<Value, ParseError> {
    parse_with_options(reader, ParseOptions::default()).map(|parsed| parsed.value)
}

/// Parse a JSON document held in a string leniently.
///
/// # Errors
///
/// See [`parse`].
pub fn parse_str(input: &str) -> Result<Value, ParseError> {
    parse(input.as_bytes())
}

/// Parse a JSON document from `reader` with explicit options.
///
/// # Errors
///
/// Returns a [`ParseError`] for lexical errors, excessive nesting, and, in
/// strict mode, the first structural issue.
pub fn parse_with_options<R: Read>(
    reader: R,
    options: ParseOptions,
) -> Result<Parsed, ParseError> {
    Parser::new(Lexer::new(reader), options).parse()
}
