/*!
# `minijson` Library

Turns a stream of JSON text into a dynamically-typed [`Value`] tree.

Two stages do the work: a [`tokenizer`] that lexes bytes from any
[`std::io::Read`] into [`JToken`]s, and a recursive-descent [`parser`] that
pulls those tokens on demand and builds the tree.

```rust
use minijson::{Value, parse_str};

let value = parse_str(r#"{"name":"Bob","age":30,"active":true,"address":null}"#).unwrap();
assert_eq!(value.get("age"), Some(&Value::Number(30.0)));
assert_eq!(value.get("address"), Some(&Value::Null));
```
*/

pub mod ingest;
pub mod parser;
pub mod tokenizer;
pub mod utils;
pub mod value;

// Re-exports
pub use parser::{ParseError, ParseOptions, Parsed, parse, parse_str, parse_with_options};
pub use tokenizer::{JToken, LexError, Lexer, tokenize};
pub use value::{Map, Value};
