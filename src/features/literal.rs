//! Structured-literal parsing for nested listing fields
//!
//! The scraper serializes `homeFacts` and `schools` with a loose,
//! language-literal syntax: single-quoted strings, `None` for null,
//! occasional trailing commas. Parsing is attempted in order:
//! permissive literal → quote-normalized strict JSON → default.

use serde_json::{Map, Number, Value};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq)]
pub enum LiteralError {
    #[error("unexpected character '{found}' at byte {at}")]
    UnexpectedChar { found: char, at: usize },

    #[error("unexpected end of input")]
    UnexpectedEnd,

    #[error("trailing input at byte {at}")]
    TrailingInput { at: usize },

    #[error("invalid number '{text}'")]
    InvalidNumber { text: String },
}

/// Outcome of the fallback chain. `Defaulted` means both parse stages
/// failed and the caller should substitute its documented default.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    Parsed(Value),
    Defaulted,
}

impl ParseOutcome {
    pub fn into_value(self) -> Option<Value> {
        match self {
            ParseOutcome::Parsed(value) => Some(value),
            ParseOutcome::Defaulted => None,
        }
    }
}

/// Run the fallback chain over a stringified nested field.
/// Never fails; a totally unparseable value becomes `Defaulted`.
pub fn parse_nested_field(raw: &str) -> ParseOutcome {
    let first_error = match parse_literal(raw) {
        Ok(value) => return ParseOutcome::Parsed(value),
        Err(err) => err,
    };

    // Second stage mirrors the upstream convention: swap quote style,
    // rewrite the null token, then hand off to the strict JSON parser.
    let normalized = raw.replace('\'', "\"").replace("None", "null");
    match serde_json::from_str::<Value>(&normalized) {
        Ok(value) => ParseOutcome::Parsed(value),
        Err(json_err) => {
            debug!(
                literal_error = %first_error,
                json_error = %json_err,
                "nested field unparseable, substituting default"
            );
            ParseOutcome::Defaulted
        }
    }
}

/// Parse a permissive structured literal into a JSON value.
/// Accepts single- or double-quoted strings, `None`/`null`, `True`/`true`,
/// `False`/`false`, tuples as lists, and trailing commas.
pub fn parse_literal(input: &str) -> Result<Value, LiteralError> {
    let mut parser = Parser {
        bytes: input.as_bytes(),
        pos: 0,
    };
    let value = parser.parse_value()?;
    parser.skip_whitespace();
    if parser.pos < parser.bytes.len() {
        return Err(LiteralError::TrailingInput { at: parser.pos });
    }
    Ok(value)
}

struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn skip_whitespace(&mut self) {
        while let Some(&b) = self.bytes.get(self.pos) {
            if b.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn unexpected(&self, b: u8) -> LiteralError {
        LiteralError::UnexpectedChar {
            found: b as char,
            at: self.pos,
        }
    }

    fn parse_value(&mut self) -> Result<Value, LiteralError> {
        self.skip_whitespace();
        match self.peek().ok_or(LiteralError::UnexpectedEnd)? {
            b'{' => self.parse_mapping(),
            b'[' => self.parse_sequence(b'[', b']'),
            b'(' => self.parse_sequence(b'(', b')'),
            b'\'' | b'"' => self.parse_string().map(Value::String),
            b'-' | b'+' | b'.' | b'0'..=b'9' => self.parse_number(),
            b => {
                if b.is_ascii_alphabetic() {
                    self.parse_ident()
                } else {
                    Err(self.unexpected(b))
                }
            }
        }
    }

    fn parse_mapping(&mut self) -> Result<Value, LiteralError> {
        self.pos += 1; // consume '{'
        let mut map = Map::new();
        loop {
            self.skip_whitespace();
            match self.peek().ok_or(LiteralError::UnexpectedEnd)? {
                b'}' => {
                    self.pos += 1;
                    return Ok(Value::Object(map));
                }
                _ => {
                    let key = match self.parse_value()? {
                        Value::String(s) => s,
                        // non-string keys get stringified, last wins
                        other => other.to_string(),
                    };
                    self.skip_whitespace();
                    match self.peek().ok_or(LiteralError::UnexpectedEnd)? {
                        b':' => self.pos += 1,
                        b => return Err(self.unexpected(b)),
                    }
                    let value = self.parse_value()?;
                    map.insert(key, value);
                    self.skip_whitespace();
                    match self.peek().ok_or(LiteralError::UnexpectedEnd)? {
                        b',' => self.pos += 1,
                        b'}' => {}
                        b => return Err(self.unexpected(b)),
                    }
                }
            }
        }
    }

    fn parse_sequence(&mut self, open: u8, close: u8) -> Result<Value, LiteralError> {
        debug_assert_eq!(self.peek(), Some(open));
        self.pos += 1;
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek().ok_or(LiteralError::UnexpectedEnd)? {
                b if b == close => {
                    self.pos += 1;
                    return Ok(Value::Array(items));
                }
                _ => {
                    items.push(self.parse_value()?);
                    self.skip_whitespace();
                    match self.peek().ok_or(LiteralError::UnexpectedEnd)? {
                        b',' => self.pos += 1,
                        b if b == close => {}
                        b => return Err(self.unexpected(b)),
                    }
                }
            }
        }
    }

    fn parse_string(&mut self) -> Result<String, LiteralError> {
        let quote = self.bytes[self.pos];
        self.pos += 1;
        let mut out = Vec::new();
        loop {
            let b = *self
                .bytes
                .get(self.pos)
                .ok_or(LiteralError::UnexpectedEnd)?;
            self.pos += 1;
            if b == quote {
                return Ok(String::from_utf8_lossy(&out).into_owned());
            }
            if b == b'\\' {
                let escaped = *self
                    .bytes
                    .get(self.pos)
                    .ok_or(LiteralError::UnexpectedEnd)?;
                self.pos += 1;
                match escaped {
                    b'n' => out.push(b'\n'),
                    b't' => out.push(b'\t'),
                    b'r' => out.push(b'\r'),
                    other => out.push(other),
                }
            } else {
                out.push(b);
            }
        }
    }

    fn parse_number(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if matches!(b, b'0'..=b'9' | b'.' | b'e' | b'E' | b'+' | b'-') {
                self.pos += 1;
            } else {
                break;
            }
        }
        let text = std::str::from_utf8(&self.bytes[start..self.pos]).unwrap_or("");
        if !text.contains('.') && !text.contains('e') && !text.contains('E') {
            if let Ok(int) = text.parse::<i64>() {
                return Ok(Value::Number(Number::from(int)));
            }
        }
        let float = text
            .parse::<f64>()
            .map_err(|_| LiteralError::InvalidNumber {
                text: text.to_string(),
            })?;
        Number::from_f64(float)
            .map(Value::Number)
            .ok_or(LiteralError::InvalidNumber {
                text: text.to_string(),
            })
    }

    fn parse_ident(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_alphabetic() {
                self.pos += 1;
            } else {
                break;
            }
        }
        let ident = std::str::from_utf8(&self.bytes[start..self.pos]).unwrap_or("");
        match ident {
            "None" | "null" => Ok(Value::Null),
            "True" | "true" => Ok(Value::Bool(true)),
            "False" | "false" => Ok(Value::Bool(false)),
            _ => Err(LiteralError::UnexpectedChar {
                found: self.bytes[start] as char,
                at: start,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_single_quoted_mapping() {
        let value = parse_literal("{'factLabel': 'Year built', 'factValue': '1920'}").unwrap();
        assert_eq!(
            value,
            json!({"factLabel": "Year built", "factValue": "1920"})
        );
    }

    #[test]
    fn test_parse_none_and_booleans() {
        let value = parse_literal("[None, True, False]").unwrap();
        assert_eq!(value, json!([null, true, false]));
    }

    #[test]
    fn test_parse_nested_school_list() {
        let raw = "[{'rating': ['NR', '7'], 'data': {'Distance': ['0.9 mi'], \
                   'Grades': ['K-5']}, 'name': ['Lincoln Elementary School']}]";
        let value = parse_literal(raw).unwrap();
        assert_eq!(
            value,
            json!([{
                "rating": ["NR", "7"],
                "data": {"Distance": ["0.9 mi"], "Grades": ["K-5"]},
                "name": ["Lincoln Elementary School"]
            }])
        );
    }

    #[test]
    fn test_parse_numbers_and_trailing_comma() {
        let value = parse_literal("{'a': 3, 'b': 2.5, 'c': [1, 2,],}").unwrap();
        assert_eq!(value, json!({"a": 3, "b": 2.5, "c": [1, 2]}));
    }

    #[test]
    fn test_tuple_becomes_list() {
        let value = parse_literal("('a', 'b')").unwrap();
        assert_eq!(value, json!(["a", "b"]));
    }

    #[test]
    fn test_trailing_garbage_rejected() {
        assert!(matches!(
            parse_literal("[1, 2] extra"),
            Err(LiteralError::TrailingInput { .. })
        ));
    }

    #[test]
    fn test_fallback_chain_defaults_on_garbage() {
        assert_eq!(parse_nested_field("not a list"), ParseOutcome::Defaulted);
        assert_eq!(
            parse_nested_field("{unquoted: 1}"),
            ParseOutcome::Defaulted
        );
    }

    #[test]
    fn test_fallback_chain_parses_literal_syntax() {
        let outcome = parse_nested_field("{'atAGlanceFacts': None}");
        assert_eq!(
            outcome,
            ParseOutcome::Parsed(json!({"atAGlanceFacts": null}))
        );
    }
}
