//! # Tokenizer/ Lexer
//!
//! Lexes a sequential stream of bytes from a JSON document into a token
//! stream.
pub mod lexer;
pub mod source;
pub mod token;

// Re-exports
pub use lexer::{LexError, LexErrorKind, Lexer, Tokens, tokenize};
pub use token::JToken;
