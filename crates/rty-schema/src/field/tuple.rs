//! Fixed-arity tuples, given natively or as a `"(a, b, ...)"` literal.

use std::iter::Peekable;
use std::str::Chars;

use rty_core::{Mapping, ValidationError, Value};

use super::{Field, ValidateAndBuild};

#[derive(Debug, Clone)]
pub struct TupleField {
    items: Vec<Field>,
}

impl TupleField {
    pub fn new(items: Vec<Field>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[Field] {
        &self.items
    }
}

impl ValidateAndBuild for TupleField {
    fn validate_and_build(&self, value: &Value) -> Result<Value, ValidationError> {
        let parsed;
        let elements: &[Value] = match value {
            Value::Tuple(items) => items,
            Value::Str(text) => {
                parsed = parse_tuple_literal(text)
                    .map_err(|e| ValidationError::new(format!("Invalid tuple literal {text:?}: {e}")))?;
                &parsed
            }
            Value::Null => return Err(ValidationError::new("None is not a valid tuple")),
            other => {
                return Err(ValidationError::new(format!(
                    "Expected a tuple, got {}",
                    other.type_name()
                )))
            }
        };

        if elements.len() != self.items.len() {
            return Err(ValidationError::new(format!(
                "Tuple must contain exactly {} elements (got {})",
                self.items.len(),
                elements.len()
            )));
        }

        self.items
            .iter()
            .zip(elements)
            .enumerate()
            .map(|(idx, (field, element))| {
                field
                    .validate_and_build(element)
                    .map_err(|e| ValidationError::new(format!("Tuple element {idx} invalid: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Tuple)
    }
}

/// Parse `"(a, b, ...)"` into its elements.
///
/// Elements may be quoted strings, integers, floats, `true`/`false`,
/// `None`/`null`, nested `(...)` tuples, `[...]` lists or `{k: v}`
/// mappings. Any other bare token is taken as a string. A trailing comma is
/// allowed.
pub fn parse_tuple_literal(text: &str) -> Result<Vec<Value>, String> {
    let text = text.trim();
    if !(text.starts_with('(') && text.ends_with(')')) {
        return Err("a tuple literal must be wrapped in parentheses".to_string());
    }
    let mut parser = LiteralParser {
        chars: text.chars().peekable(),
    };
    let value = parser.value()?;
    parser.skip_ws();
    if parser.chars.peek().is_some() {
        return Err("unexpected text after closing parenthesis".to_string());
    }
    match value {
        Value::Tuple(items) => Ok(items),
        _ => Err("a tuple literal must be wrapped in parentheses".to_string()),
    }
}

struct LiteralParser<'a> {
    chars: Peekable<Chars<'a>>,
}

impl LiteralParser<'_> {
    fn skip_ws(&mut self) {
        while self.chars.next_if(|c| c.is_whitespace()).is_some() {}
    }

    fn value(&mut self) -> Result<Value, String> {
        self.skip_ws();
        match self.chars.peek() {
            Some('(') => {
                self.chars.next();
                self.sequence(')').map(Value::Tuple)
            }
            Some('[') => {
                self.chars.next();
                self.sequence(']').map(Value::List)
            }
            Some('{') => {
                self.chars.next();
                self.mapping().map(Value::Map)
            }
            Some(&quote) if quote == '\'' || quote == '"' => {
                self.chars.next();
                self.quoted(quote).map(Value::Str)
            }
            Some(_) => Ok(classify(&self.bare(&[',', ')', ']', '}']))),
            None => Err("unexpected end of literal".to_string()),
        }
    }

    fn sequence(&mut self, close: char) -> Result<Vec<Value>, String> {
        let mut items = Vec::new();
        self.skip_ws();
        if self.chars.next_if_eq(&close).is_some() {
            return Ok(items);
        }
        loop {
            items.push(self.value()?);
            self.skip_ws();
            match self.chars.next() {
                Some(',') => {
                    self.skip_ws();
                    if self.chars.next_if_eq(&close).is_some() {
                        return Ok(items);
                    }
                }
                Some(c) if c == close => return Ok(items),
                Some(c) => return Err(format!("expected ',' or '{close}', found '{c}'")),
                None => return Err(format!("missing closing '{close}'")),
            }
        }
    }

    fn mapping(&mut self) -> Result<Mapping, String> {
        let mut map = Mapping::new();
        self.skip_ws();
        if self.chars.next_if_eq(&'}').is_some() {
            return Ok(map);
        }
        loop {
            let key = self.key()?;
            self.skip_ws();
            if self.chars.next_if_eq(&':').is_none() {
                return Err(format!("expected ':' after key '{key}'"));
            }
            let value = self.value()?;
            map.insert(key, value);
            self.skip_ws();
            match self.chars.next() {
                Some(',') => {
                    self.skip_ws();
                    if self.chars.next_if_eq(&'}').is_some() {
                        return Ok(map);
                    }
                }
                Some('}') => return Ok(map),
                Some(c) => return Err(format!("expected ',' or '}}', found '{c}'")),
                None => return Err("missing closing '}'".to_string()),
            }
        }
    }

    /// Mapping keys are quoted strings or bare tokens taken verbatim.
    fn key(&mut self) -> Result<String, String> {
        self.skip_ws();
        match self.chars.peek() {
            Some(&quote) if quote == '\'' || quote == '"' => {
                self.chars.next();
                self.quoted(quote)
            }
            Some(_) => {
                let token = self.bare(&[':', ',', '}']);
                if token.is_empty() {
                    Err("empty mapping key".to_string())
                } else {
                    Ok(token)
                }
            }
            None => Err("unexpected end of literal".to_string()),
        }
    }

    fn quoted(&mut self, quote: char) -> Result<String, String> {
        let mut out = String::new();
        while let Some(c) = self.chars.next() {
            match c {
                '\\' => match self.chars.next() {
                    Some(escaped) => out.push(escaped),
                    None => break,
                },
                c if c == quote => return Ok(out),
                c => out.push(c),
            }
        }
        Err("unterminated string".to_string())
    }

    fn bare(&mut self, stops: &[char]) -> String {
        let mut token = String::new();
        while let Some(c) = self.chars.next_if(|c| !stops.contains(c)) {
            token.push(c);
        }
        token.trim().to_string()
    }
}

fn classify(token: &str) -> Value {
    if token.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if token.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if matches!(token, "None" | "null") {
        return Value::Null;
    }
    if let Ok(i) = token.parse::<i64>() {
        return Value::Int(i);
    }
    if token.chars().any(|c| c.is_ascii_digit()) {
        if let Ok(f) = token.parse::<f64>() {
            return Value::Float(f);
        }
    }
    Value::Str(token.to_string())
}
