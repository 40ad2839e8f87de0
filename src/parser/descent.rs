//! Recursive-descent construction of a [`Value`] tree from a token stream.
use std::io::Read;

use crate::parser::error::{IssueKind, ParseError, StructuralIssue};
use crate::parser::{ParseOptions, Parsed};
use crate::tokenizer::{JToken, Lexer};
use crate::value::{Map, Value};

/// Position within the member list of an object or array frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    /// Just after the opening delimiter
    First,
    /// After a `,`
    Member,
    /// After an object key
    Colon,
    /// After a complete member
    Separator,
}

/// A recursive-descent parser pulling tokens from a [`Lexer`] on demand.
pub struct Parser<R> {
    lexer: Lexer<R>,
    options: ParseOptions,
    /// Structural issues recorded so far (lenient mode only)
    warnings: Vec<StructuralIssue>,
    /// Number of open containers
    depth: usize,
}

impl<R: Read> Parser<R> {
    /// Creates a parser over `lexer`.
    pub const fn new(lexer: Lexer<R>, options: ParseOptions) -> Self {
        Self {
            lexer,
            options,
            warnings: Vec::new(),
            depth: 0,
        }
    }

    /// Parses a single top-level value.
    ///
    /// In lenient mode input past the value is never read. In strict mode
    /// only whitespace may follow it.
    ///
    /// # Errors
    ///
    /// Any [`LexError`](crate::tokenizer::LexError), a nesting depth over the
    /// configured limit, and in strict mode the first structural issue.
    pub fn parse(mut self) -> Result<Parsed, ParseError> {
        let value = self.parse_value()?;

        if self.options.strict {
            let token = self.next()?;
            if token != JToken::Eof {
                self.report(IssueKind::TrailingContent {
                    found: token.kind(),
                })?;
            }
        }

        Ok(Parsed {
            value,
            warnings: self.warnings,
        })
    }

    fn next(&mut self) -> Result<JToken, ParseError> {
        Ok(self.lexer.next_token()?)
    }

    /// Records `kind` as a warning, or fails with it in strict mode.
    fn report(&mut self, kind: IssueKind) -> Result<(), ParseError> {
        let issue = StructuralIssue {
            kind,
            offset: self.lexer.offset(),
        };
        if self.options.strict {
            return Err(ParseError::Structural(issue));
        }
        self.warnings.push(issue);
        Ok(())
    }

    /// value := object | array | literal
    fn parse_value(&mut self) -> Result<Value, ParseError> {
        let token = self.next()?;
        if token.starts_value() {
            return self.resolve(token);
        }

        self.report(IssueKind::NoValue {
            found: token.kind(),
        })?;
        Ok(Value::Null)
    }

    /// Builds the value that `token` starts.
    fn resolve(&mut self, token: JToken) -> Result<Value, ParseError> {
        match token {
            JToken::LCurly => self.descend(Self::parse_object),
            JToken::LSquare => self.descend(Self::parse_array),
            JToken::JString(text) => Ok(Value::String(text)),
            JToken::JNumber(text) => self.number(text),
            JToken::Bool(b) => Ok(Value::Bool(b)),
            JToken::Null => Ok(Value::Null),
            // callers only pass tokens for which `starts_value` holds
            JToken::RCurly
            | JToken::RSquare
            | JToken::Colon
            | JToken::Comma
            | JToken::Eof => Ok(Value::Null),
        }
    }

    /// Runs a container production one level deeper.
    fn descend(
        &mut self,
        production: fn(&mut Self) -> Result<Value, ParseError>,
    ) -> Result<Value, ParseError> {
        if self.depth >= self.options.max_depth {
            return Err(ParseError::TooDeep {
                limit: self.options.max_depth,
                offset: self.lexer.offset(),
            });
        }
        self.depth += 1;
        let value = production(self);
        self.depth -= 1;
        value
    }

    /// Text that does not parse as a finite double falls back to a string.
    fn number(&mut self, text: String) -> Result<Value, ParseError> {
        match text.parse::<f64>() {
            Ok(n) if n.is_finite() => return Ok(Value::Number(n)),
            _ => {}
        }
        self.report(IssueKind::InvalidNumber(text.clone()))?;
        Ok(Value::String(text))
    }

    /// object := '{' (pair (',' pair)*)? '}' with the opening brace consumed.
    ///
    /// Holds at most one pending key; a later key replaces an unused one.
    fn parse_object(&mut self) -> Result<Value, ParseError> {
        let mut map = Map::new();
        let mut pending_key: Option<String> = None;
        let mut expect = Expect::First;

        loop {
            match self.next()? {
                JToken::RCurly => {
                    match expect {
                        Expect::Member => self.report(IssueKind::TrailingComma)?,
                        Expect::Colon => self.report(IssueKind::MissingColon)?,
                        Expect::First | Expect::Separator => {}
                    }
                    return Ok(Value::Object(map));
                }
                JToken::Eof => {
                    self.report(IssueKind::Unclosed { closing: '}' })?;
                    return Ok(Value::Object(map));
                }
                JToken::JString(key) => {
                    match expect {
                        Expect::Separator => self.report(IssueKind::MissingComma)?,
                        Expect::Colon => self.report(IssueKind::MissingColon)?,
                        Expect::First | Expect::Member => {}
                    }
                    pending_key = Some(key);
                    expect = Expect::Colon;
                }
                JToken::Colon => {
                    let key = if let Some(key) = pending_key.take() {
                        key
                    } else {
                        self.report(IssueKind::MissingKey)?;
                        String::new()
                    };

                    let token = self.next()?;
                    if token.starts_value() {
                        let value = self.resolve(token)?;
                        // last write wins; the key keeps its first position
                        map.insert(key, value);
                        expect = Expect::Separator;
                        continue;
                    }

                    self.report(IssueKind::MissingValue)?;
                    match token {
                        JToken::RCurly => return Ok(Value::Object(map)),
                        JToken::Eof => {
                            self.report(IssueKind::Unclosed { closing: '}' })?;
                            return Ok(Value::Object(map));
                        }
                        JToken::Comma => expect = Expect::Member,
                        _ => expect = Expect::Separator,
                    }
                }
                JToken::Comma => {
                    match expect {
                        Expect::Separator => {}
                        Expect::Colon => self.report(IssueKind::MissingColon)?,
                        Expect::First | Expect::Member => {
                            self.report(IssueKind::UnexpectedToken {
                                found: JToken::Comma.kind(),
                                within: "object",
                            })?;
                        }
                    }
                    expect = Expect::Member;
                }
                token @ (JToken::LCurly | JToken::LSquare) => {
                    self.unexpected_in_object(&token, expect)?;
                    // a container outside a value slot is parsed and dropped
                    self.resolve(token)?;
                }
                token => self.unexpected_in_object(&token, expect)?,
            }
        }
    }

    fn unexpected_in_object(
        &mut self,
        token: &JToken,
        expect: Expect,
    ) -> Result<(), ParseError> {
        if expect == Expect::Colon {
            self.report(IssueKind::MissingColon)
        } else {
            self.report(IssueKind::UnexpectedToken {
                found: token.kind(),
                within: "object",
            })
        }
    }

    /// array := '[' (value (',' value)*)? ']' with the opening bracket
    /// consumed.
    fn parse_array(&mut self) -> Result<Value, ParseError> {
        let mut items = Vec::new();
        let mut expect = Expect::First;

        loop {
            match self.next()? {
                JToken::RSquare => {
                    if expect == Expect::Member {
                        self.report(IssueKind::TrailingComma)?;
                    }
                    return Ok(Value::Array(items));
                }
                JToken::Eof => {
                    self.report(IssueKind::Unclosed { closing: ']' })?;
                    return Ok(Value::Array(items));
                }
                JToken::Comma => {
                    if expect != Expect::Separator {
                        self.report(IssueKind::UnexpectedToken {
                            found: JToken::Comma.kind(),
                            within: "array",
                        })?;
                    }
                    expect = Expect::Member;
                }
                token if token.starts_value() => {
                    if expect == Expect::Separator {
                        self.report(IssueKind::MissingComma)?;
                    }
                    items.push(self.resolve(token)?);
                    expect = Expect::Separator;
                }
                token => self.report(IssueKind::UnexpectedToken {
                    found: token.kind(),
                    within: "array",
                })?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::{
        IssueKind, ParseError, ParseOptions, Parsed, parse_str, parse_with_options,
    };
    use crate::tokenizer::LexErrorKind;
    use crate::value::Value;

    fn lenient(input: &str) -> Parsed {
        parse_with_options(input.as_bytes(), ParseOptions::lenient()).unwrap()
    }

    fn strict(input: &str) -> Result<Parsed, ParseError> {
        parse_with_options(input.as_bytes(), ParseOptions::strict())
    }

    fn strict_issue(input: &str) -> IssueKind {
        match strict(input) {
            Err(ParseError::Structural(issue)) => issue.kind,
            other => panic!("expected a structural error for {input:?}, got {other:?}"),
        }
    }

    fn warning_kinds(parsed: &Parsed) -> Vec<IssueKind> {
        parsed.warnings.iter().map(|w| w.kind.clone()).collect()
    }

    fn obj<const N: usize>(pairs: [(&str, Value); N]) -> Value {
        pairs.into_iter().collect()
    }

    fn arr<const N: usize>(items: [Value; N]) -> Value {
        Value::Array(items.into())
    }

    fn num(n: f64) -> Value {
        Value::Number(n)
    }

    fn s(text: &str) -> Value {
        Value::from(text)
    }

    #[test]
    fn empty_containers() {
        assert_eq!(parse_str("[]").unwrap(), Value::Array(vec![]));
        assert_eq!(parse_str("{}").unwrap(), obj([]));
        assert_eq!(parse_str(" [ ] ").unwrap(), Value::Array(vec![]));
    }

    #[test]
    fn top_level_literals() {
        assert_eq!(parse_str(r#""hello""#).unwrap(), s("hello"));
        assert_eq!(parse_str(r#""""#).unwrap(), s(""));
        assert_eq!(parse_str("42").unwrap(), num(42.0));
        assert_eq!(parse_str("-7").unwrap(), num(-7.0));
        assert_eq!(parse_str("3.14").unwrap(), num(3.14));
        assert_eq!(parse_str("true").unwrap(), Value::Bool(true));
        assert_eq!(parse_str("false").unwrap(), Value::Bool(false));
        assert_eq!(parse_str("null").unwrap(), Value::Null);
    }

    #[test]
    fn mixed_type_object() {
        let value =
            parse_str(r#"{"name":"Bob","age":30,"active":true,"address":null}"#)
                .unwrap();
        let map = value.as_object().unwrap();
        assert_eq!(map.len(), 4);
        assert_eq!(map["name"], s("Bob"));
        assert_eq!(map["age"], num(30.0));
        assert_eq!(map["active"], Value::Bool(true));
        assert_eq!(map["address"], Value::Null);
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, ["name", "age", "active", "address"]);
    }

    #[test]
    fn deep_nesting_is_preserved() {
        let value = parse_str(r#"{"a":{"b":{"c":{"d":1}}}}"#).unwrap();
        let expected = obj([("a", obj([("b", obj([("c", obj([("d", num(1.0))]))]))]))]);
        assert_eq!(value, expected);
        assert_eq!(value.depth(), 5);
    }

    #[test]
    fn duplicate_keys_last_write_wins() {
        assert_eq!(
            parse_str(r#"{"a":1,"a":2}"#).unwrap(),
            obj([("a", num(2.0))])
        );

        let value = parse_str(r#"{"a":1,"b":2,"a":3}"#).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["a", "b"]);
        assert_eq!(value.get("a"), Some(&num(3.0)));
    }

    #[test]
    fn nested_arrays_and_objects() {
        assert_eq!(
            parse_str("[[1,2],[3,4],[5,[6,7]]]").unwrap(),
            arr([
                arr([num(1.0), num(2.0)]),
                arr([num(3.0), num(4.0)]),
                arr([num(5.0), arr([num(6.0), num(7.0)])]),
            ])
        );
        assert_eq!(
            parse_str(r#"[{"id":1,"item":"book"},{"id":2,"item":"pen"}]"#).unwrap(),
            arr([
                obj([("id", num(1.0)), ("item", s("book"))]),
                obj([("id", num(2.0)), ("item", s("pen"))]),
            ])
        );
        assert_eq!(
            parse_str("[true,false,null]").unwrap(),
            arr([Value::Bool(true), Value::Bool(false), Value::Null])
        );
    }

    #[test]
    fn full_payload() {
        let input = r#"{
            "users": [
                {"id":1,"name":"John","roles":["admin","dev"]},
                {"id":2,"name":"Jane","roles":["user"],"meta":{"verified":true,"points":42}}
            ],
            "active":true,
            "stats":{"total":2,"online":1}
        }"#;
        let expected = obj([
            (
                "users",
                arr([
                    obj([
                        ("id", num(1.0)),
                        ("name", s("John")),
                        ("roles", arr([s("admin"), s("dev")])),
                    ]),
                    obj([
                        ("id", num(2.0)),
                        ("name", s("Jane")),
                        ("roles", arr([s("user")])),
                        (
                            "meta",
                            obj([("verified", Value::Bool(true)), ("points", num(42.0))]),
                        ),
                    ]),
                ]),
            ),
            ("active", Value::Bool(true)),
            ("stats", obj([("total", num(2.0)), ("online", num(1.0))])),
        ]);

        let parsed = strict(input).unwrap();
        assert_eq!(parsed.value, expected);
        assert!(parsed.warnings.is_empty());
        assert!(lenient(input).warnings.is_empty());
    }

    #[test]
    fn reads_from_any_reader() {
        let reader = std::io::Cursor::new(b"{\"temp\":-12.5,\"offset\":0.001}".to_vec());
        assert_eq!(
            crate::parser::parse(reader).unwrap(),
            obj([("temp", num(-12.5)), ("offset", num(0.001))])
        );
    }

    #[test]
    fn no_value_defaults_to_null() {
        for input in ["", "   ", ",", ":", "}", "]"] {
            let parsed = lenient(input);
            assert_eq!(parsed.value, Value::Null, "{input:?}");
            assert!(
                matches!(parsed.warnings[0].kind, IssueKind::NoValue { .. }),
                "{input:?}"
            );
        }
        assert_eq!(
            strict_issue(","),
            IssueKind::NoValue { found: "','" }
        );
        assert_eq!(
            strict_issue(""),
            IssueKind::NoValue {
                found: "end of input"
            }
        );
    }

    #[test]
    fn unclosed_containers_return_partial_trees() {
        let parsed = lenient(r#"{"a":1,"b":[true"#);
        assert_eq!(
            parsed.value,
            obj([("a", num(1.0)), ("b", arr([Value::Bool(true)]))])
        );
        assert_eq!(
            warning_kinds(&parsed),
            [
                IssueKind::Unclosed { closing: ']' },
                IssueKind::Unclosed { closing: '}' },
            ]
        );

        assert_eq!(lenient("[1,2").value, arr([num(1.0), num(2.0)]));
        assert_eq!(
            strict_issue(r#"{"a":1"#),
            IssueKind::Unclosed { closing: '}' }
        );
        match strict(r#"{"a":1"#) {
            Err(ParseError::Structural(issue)) => assert_eq!(issue.offset, 6),
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn colon_without_key_uses_empty_key() {
        let parsed = lenient("{:1}");
        assert_eq!(parsed.value, obj([("", num(1.0))]));
        assert_eq!(warning_kinds(&parsed), [IssueKind::MissingKey]);
        assert_eq!(strict_issue("{:1}"), IssueKind::MissingKey);
    }

    #[test]
    fn missing_values_drop_the_key() {
        let parsed = lenient(r#"{"a":}"#);
        assert_eq!(parsed.value, obj([]));
        assert_eq!(warning_kinds(&parsed), [IssueKind::MissingValue]);

        assert_eq!(lenient(r#"{"a":,"b":2}"#).value, obj([("b", num(2.0))]));
        assert_eq!(lenient(r#"{"a":"#).value, obj([]));
        assert_eq!(strict_issue(r#"{"a":}"#), IssueKind::MissingValue);
    }

    #[test]
    fn missing_colon() {
        let parsed = lenient(r#"{"a" 1}"#);
        assert_eq!(parsed.value, obj([]));
        assert_eq!(
            warning_kinds(&parsed),
            [IssueKind::MissingColon, IssueKind::MissingColon]
        );
        assert_eq!(strict_issue(r#"{"a" 1}"#), IssueKind::MissingColon);
        assert_eq!(strict_issue(r#"{"a"}"#), IssueKind::MissingColon);
    }

    #[test]
    fn later_key_replaces_unused_one() {
        let parsed = lenient(r#"{"a" "b":1}"#);
        assert_eq!(parsed.value, obj([("b", num(1.0))]));
    }

    #[test]
    fn stray_container_in_object_is_discarded() {
        let parsed = lenient(r#"{"x":[1,2],[3],"y":true}"#);
        assert_eq!(
            parsed.value,
            obj([("x", arr([num(1.0), num(2.0)])), ("y", Value::Bool(true))])
        );
        assert_eq!(
            parsed.warnings[0].kind,
            IssueKind::UnexpectedToken {
                found: "'['",
                within: "object"
            }
        );

        assert_eq!(
            lenient(r#"{{"inner":1},"outer":2}"#).value,
            obj([("outer", num(2.0))])
        );
    }

    #[test]
    fn separators_in_arrays() {
        let parsed = lenient("[1 2]");
        assert_eq!(parsed.value, arr([num(1.0), num(2.0)]));
        assert_eq!(warning_kinds(&parsed), [IssueKind::MissingComma]);

        let parsed = lenient("[1,]");
        assert_eq!(parsed.value, arr([num(1.0)]));
        assert_eq!(warning_kinds(&parsed), [IssueKind::TrailingComma]);

        assert_eq!(lenient("[,,1,,]").value, arr([num(1.0)]));
        assert_eq!(lenient("[1:2}]").value, arr([num(1.0), num(2.0)]));

        assert_eq!(strict_issue("[1 2]"), IssueKind::MissingComma);
        assert_eq!(strict_issue("[1,]"), IssueKind::TrailingComma);
        assert_eq!(
            strict_issue("[,1]"),
            IssueKind::UnexpectedToken {
                found: "','",
                within: "array"
            }
        );
    }

    #[test]
    fn separators_in_objects() {
        assert_eq!(strict_issue(r#"{"a":1,}"#), IssueKind::TrailingComma);
        assert_eq!(strict_issue(r#"{"a":1 "b":2}"#), IssueKind::MissingComma);
        assert_eq!(
            lenient(r#"{"a":1 "b":2}"#).value,
            obj([("a", num(1.0)), ("b", num(2.0))])
        );
    }

    #[test]
    fn unparseable_numbers_fall_back_to_strings() {
        let parsed = lenient("[1-2, 1.2.3, -]");
        assert_eq!(parsed.value, arr([s("1-2"), s("1.2.3"), s("-")]));
        assert_eq!(
            warning_kinds(&parsed),
            [
                IssueKind::InvalidNumber("1-2".into()),
                IssueKind::InvalidNumber("1.2.3".into()),
                IssueKind::InvalidNumber("-".into()),
            ]
        );
        assert_eq!(
            strict_issue(r#"{"n":1-2}"#),
            IssueKind::InvalidNumber("1-2".into())
        );
    }

    #[test]
    fn out_of_range_numbers_fall_back_to_strings() {
        let huge = "1".repeat(400);
        let negative = format!("-{huge}");

        let parsed = lenient(&format!("[{huge}, {negative}, 2]"));
        assert_eq!(parsed.value, arr([s(&huge), s(&negative), num(2.0)]));
        assert_eq!(
            warning_kinds(&parsed),
            [
                IssueKind::InvalidNumber(huge.clone()),
                IssueKind::InvalidNumber(negative),
            ]
        );

        assert_eq!(strict_issue(&huge), IssueKind::InvalidNumber(huge.clone()));
        // the largest finite double still parses
        let max = format!("{:.0}", f64::MAX);
        assert_eq!(lenient(&max).value, num(f64::MAX));
    }

    #[test]
    fn trailing_content() {
        assert_eq!(lenient("1 2").value, num(1.0));
        // lenient mode never looks past the value
        assert_eq!(lenient("[1] @").value, arr([num(1.0)]));
        assert_eq!(
            strict_issue("1 2"),
            IssueKind::TrailingContent { found: "number" }
        );
        assert!(strict("[1]  \n").is_ok());
    }

    #[test]
    fn lexical_errors_abort() {
        let err = parse_str(r#"{"a": trux}"#).unwrap_err();
        match err {
            ParseError::Lex(lex) => assert!(lex.is_malformed_literal()),
            other => panic!("unexpected error {other:?}"),
        }

        let err = parse_str("[1, @]").unwrap_err();
        assert!(matches!(
            err,
            ParseError::Lex(ref lex) if matches!(lex.kind(), LexErrorKind::UnexpectedByte(b'@'))
        ));
    }

    #[test]
    fn depth_limit() {
        let shallow = ParseOptions::lenient().with_max_depth(2);
        assert!(parse_with_options("[[1]]".as_bytes(), shallow).is_ok());
        let err = parse_with_options("[[[1]]]".as_bytes(), shallow).unwrap_err();
        assert!(matches!(err, ParseError::TooDeep { limit: 2, offset: 3 }));

        let hostile = "[".repeat(100_000);
        let err = parse_str(&hostile).unwrap_err();
        assert!(matches!(
            err,
            ParseError::TooDeep {
                limit: ParseOptions::DEFAULT_MAX_DEPTH,
                ..
            }
        ));
    }
}
