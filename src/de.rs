//! Serpent deserialization.
//!
//! This module provides the safe reader: a recursive-descent parser that
//! accepts pure literal expressions only, and a [`Deserializer`] that feeds
//! the parsed [`Value`] to any `T: Deserialize`.
//!
//! ## Overview
//!
//! - **No evaluation**: names, calls, attribute access and arithmetic are
//!   grammar violations, so hostile input can at worst be rejected
//! - **Header check**: a `# serpent utf-8 <tag>` first line is validated
//!   against the reader profile before anything else is parsed
//! - **Bounded nesting**: depth is limited by [`ReadOptions::max_depth`]
//! - **Error reporting**: line, column and the offending source line
//!
//! ## Usage
//!
//! Most users should use the high-level functions in the crate root:
//!
//! ```rust
//! use serde_serpent::{from_str, read_str, Value};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Data { x: i32, y: i32 }
//!
//! let data: Data = from_str("{'__class__':'Data','x':1,'y':2}").unwrap();
//! assert_eq!(data, Data { x: 1, y: 2 });
//!
//! let value = read_str("[1, 'two', (3.0, None)]").unwrap();
//! assert_eq!(value.as_slice().map(|items| items.len()), Some(3));
//! ```

use crate::grammar::{tag_declares_sets, HEADER_PREFIX, TAG_PY26, TAG_PY32};
use crate::{Complex, Error, ReadOptions, Result, SerpentMap, SerpentSet, Value, CLASS_KEY};
use num_bigint::BigInt;
use serde::de::{Deserializer as _, IntoDeserializer};
use serde::{de, forward_to_deserialize_any};

/// Rejects NUL bytes and invalid UTF-8 before any parsing happens.
pub(crate) fn decode_input(bytes: &[u8]) -> Result<&str> {
    if let Some(offset) = bytes.iter().position(|&b| b == 0) {
        return Err(Error::EmbeddedNul { offset });
    }
    std::str::from_utf8(bytes).map_err(|e| Error::InvalidEncoding(e.to_string()))
}

/// The serpent deserializer.
///
/// Parses one serpent document into a [`Value`], then hands it to the
/// `Deserialize` impl of the requested type.
pub struct Deserializer<'de> {
    input: &'de str,
    position: usize,
    line: usize,
    column: usize,
    options: ReadOptions,
    set_literals: bool,
}

/// A numeric literal before it becomes a [`Value`].
enum Number {
    Int(BigInt),
    Float(f64),
    Imaginary { re: f64, im: f64 },
}

impl Number {
    fn negate(self) -> Number {
        match self {
            Number::Int(i) => Number::Int(-i),
            Number::Float(f) => Number::Float(-f),
            Number::Imaginary { re, im } => Number::Imaginary { re: -re, im: -im },
        }
    }

    fn into_value(self) -> Value {
        match self {
            Number::Int(i) => Value::Int(i),
            Number::Float(f) => Value::Float(f),
            Number::Imaginary { re, im } => Value::Complex(Complex::new(re, im)),
        }
    }
}

/// A string or bytes literal being decoded.
enum Literal {
    Str(String),
    Bytes(Vec<u8>),
}

impl Literal {
    fn push_char(&mut self, ch: char) -> std::result::Result<(), &'static str> {
        match self {
            Literal::Str(s) => s.push(ch),
            Literal::Bytes(b) => {
                if !ch.is_ascii() {
                    return Err("bytes can only contain ASCII literal characters");
                }
                b.push(ch as u8);
            }
        }
        Ok(())
    }

    /// Pushes the value of a numeric escape.
    fn push_code(&mut self, code: u32) -> std::result::Result<(), &'static str> {
        match self {
            Literal::Str(s) => s.push(char::from_u32(code).ok_or("invalid code point in escape")?),
            Literal::Bytes(b) => b.push(u8::try_from(code).map_err(|_| "byte escape out of range")?),
        }
        Ok(())
    }

    fn is_bytes(&self) -> bool {
        matches!(self, Literal::Bytes(_))
    }
}

impl<'de> Deserializer<'de> {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(input: &'de str) -> Self {
        Self::with_options(input, &ReadOptions::default())
    }

    pub fn with_options(input: &'de str, options: &ReadOptions) -> Self {
        Deserializer {
            input,
            position: 0,
            line: 1,
            column: 1,
            options: options.clone(),
            set_literals: options.set_literals,
        }
    }

    /// Parses the whole input as one document.
    ///
    /// # Errors
    ///
    /// Fails on NUL bytes, an incompatible header, anything that is not a
    /// pure literal, malformed literals, excessive nesting, and trailing
    /// content after the value.
    pub fn parse_document(&mut self) -> Result<Value> {
        if let Some(offset) = self.input.bytes().position(|b| b == 0) {
            return Err(Error::EmbeddedNul { offset });
        }
        self.read_header()?;
        self.skip_whitespace();
        if self.at_end() {
            return Err(self.eof("a value"));
        }
        let value = self.parse_value(0)?;
        self.skip_whitespace();
        if !self.at_end() {
            return Err(self.grammar("unexpected content after the value"));
        }
        Ok(value)
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.input[self.position..].chars().nth(n)
    }

    fn next_char(&mut self) -> Option<char> {
        if let Some(ch) = self.input[self.position..].chars().next() {
            self.position += ch.len_utf8();
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
            Some(ch)
        } else {
            None
        }
    }

    fn at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Skips whitespace, `#` comments and backslash line continuations.
    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek_char() {
            match ch {
                ' ' | '\t' | '\n' | '\r' | '\x0c' => {
                    self.next_char();
                }
                '#' => {
                    while let Some(c) = self.peek_char() {
                        if c == '\n' {
                            break;
                        }
                        self.next_char();
                    }
                }
                '\\' if self.peek_nth(1) == Some('\n') => {
                    self.next_char();
                    self.next_char();
                }
                _ => break,
            }
        }
    }

    /// The source line the cursor is on.
    fn context(&self) -> &'de str {
        let start = self.input[..self.position]
            .rfind('\n')
            .map_or(0, |i| i + 1);
        let end = self.input[self.position..]
            .find('\n')
            .map_or(self.input.len(), |i| self.position + i);
        &self.input[start..end]
    }

    fn grammar(&self, msg: &str) -> Error {
        Error::grammar(self.line, self.column, msg, self.context())
    }

    fn malformed_at(&self, line: usize, col: usize, msg: &str) -> Error {
        Error::malformed(line, col, msg, self.context())
    }

    fn eof(&self, expected: &str) -> Error {
        Error::unexpected_eof(self.line, self.column, expected)
    }

    fn read_header(&mut self) -> Result<()> {
        let Some(tail) = self.input.strip_prefix(HEADER_PREFIX) else {
            return Ok(());
        };
        let tag = tail.lines().next().unwrap_or_default().trim();
        let supported = if self.options.set_literals {
            TAG_PY32
        } else {
            TAG_PY26
        };
        match tag_declares_sets(tag) {
            Some(true) if !self.options.set_literals => {
                return Err(Error::IncompatibleCapability {
                    declared: tag.to_string(),
                    supported: supported.to_string(),
                });
            }
            Some(declared) => self.set_literals = declared,
            None => {}
        }
        tracing::debug!(tag, set_literals = self.set_literals, "serpent header accepted");
        Ok(())
    }

    fn parse_value(&mut self, level: usize) -> Result<Value> {
        if level > self.options.max_depth {
            return Err(Error::NestingTooDeep {
                limit: self.options.max_depth,
            });
        }
        self.skip_whitespace();
        match self.peek_char() {
            None => Err(self.eof("a value")),
            Some('[') => self.parse_list(level),
            Some('(') => self.parse_parenthesized(level),
            Some('{') => self.parse_braced(level),
            Some('\'' | '"') => self.parse_strings(),
            Some(c) if c.is_ascii_digit() || matches!(c, '.' | '+' | '-') => self.parse_numeric(),
            Some(c) if c.is_alphabetic() || c == '_' => {
                if self.at_string_start() {
                    self.parse_strings()
                } else {
                    self.parse_name()
                }
            }
            Some(c) => Err(self.grammar(&format!("unexpected character {:?}", c))),
        }
    }

    fn parse_name(&mut self) -> Result<Value> {
        let (line, col) = (self.line, self.column);
        let start = self.position;
        while let Some(c) = self.peek_char() {
            if c.is_alphanumeric() || c == '_' {
                self.next_char();
            } else {
                break;
            }
        }
        match &self.input[start..self.position] {
            "None" => Ok(Value::None),
            "True" => Ok(Value::Bool(true)),
            "False" => Ok(Value::Bool(false)),
            name => Err(Error::grammar(
                line,
                col,
                &format!("names are not allowed in literals: `{}`", name),
                self.context(),
            )),
        }
    }

    fn parse_list(&mut self, level: usize) -> Result<Value> {
        self.next_char();
        Ok(Value::List(self.parse_elements(']', level)?))
    }

    /// Parses comma separated elements through `close`; a trailing comma is allowed.
    fn parse_elements(&mut self, close: char, level: usize) -> Result<Vec<Value>> {
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek_char() {
                Some(c) if c == close => {
                    self.next_char();
                    return Ok(items);
                }
                None => return Err(self.eof(&format!("'{}'", close))),
                _ => {}
            }
            items.push(self.parse_value(level + 1)?);
            self.skip_whitespace();
            match self.peek_char() {
                Some(',') => {
                    self.next_char();
                }
                Some(c) if c == close => {
                    self.next_char();
                    return Ok(items);
                }
                None => return Err(self.eof(&format!("',' or '{}'", close))),
                Some(c) => {
                    return Err(self.grammar(&format!("expected ',' or '{}', found {:?}", close, c)))
                }
            }
        }
    }

    /// A tuple, or a single parenthesized value.
    fn parse_parenthesized(&mut self, level: usize) -> Result<Value> {
        self.next_char();
        self.skip_whitespace();
        if self.peek_char() == Some(')') {
            self.next_char();
            return Ok(Value::Tuple(Vec::new()));
        }
        let first = self.parse_value(level + 1)?;
        self.skip_whitespace();
        match self.peek_char() {
            Some(')') => {
                self.next_char();
                Ok(first)
            }
            Some(',') => {
                self.next_char();
                let mut items = vec![first];
                items.extend(self.parse_elements(')', level)?);
                Ok(Value::Tuple(items))
            }
            None => Err(self.eof("',' or ')'")),
            Some(c) => Err(self.grammar(&format!("expected ',' or ')', found {:?}", c))),
        }
    }

    /// A dict or a set.
    fn parse_braced(&mut self, level: usize) -> Result<Value> {
        self.next_char();
        self.skip_whitespace();
        if self.peek_char() == Some('}') {
            self.next_char();
            return Ok(Value::Map(SerpentMap::new()));
        }
        let first = self.parse_value(level + 1)?;
        self.skip_whitespace();
        if self.peek_char() == Some(':') {
            return self.parse_dict(first, level);
        }
        if !self.set_literals {
            return Err(self.grammar("set literals are not allowed by this reader profile"));
        }
        let mut items = vec![first];
        match self.peek_char() {
            Some(',') => {
                self.next_char();
                items.extend(self.parse_elements('}', level)?);
            }
            Some('}') => {
                self.next_char();
            }
            None => return Err(self.eof("',' or '}'")),
            Some(c) => return Err(self.grammar(&format!("expected ',' or '}}', found {:?}", c))),
        }
        let mut set = SerpentSet::with_capacity(items.len());
        for item in items {
            check_key(&item)?;
            set.insert(item);
        }
        Ok(Value::Set(set))
    }

    fn parse_dict(&mut self, first_key: Value, level: usize) -> Result<Value> {
        let mut map = SerpentMap::new();
        let mut key = first_key;
        loop {
            check_key(&key)?;
            self.skip_whitespace();
            match self.next_char() {
                Some(':') => {}
                None => return Err(self.eof("':'")),
                Some(c) => return Err(self.grammar(&format!("expected ':', found {:?}", c))),
            }
            let value = self.parse_value(level + 1)?;
            // a repeated key keeps its first position and takes the last value
            map.insert(key, value);
            self.skip_whitespace();
            match self.peek_char() {
                Some(',') => {
                    self.next_char();
                    self.skip_whitespace();
                    if self.peek_char() == Some('}') {
                        self.next_char();
                        break;
                    }
                }
                Some('}') => {
                    self.next_char();
                    break;
                }
                None => return Err(self.eof("',' or '}'")),
                Some(c) => return Err(self.grammar(&format!("expected ',' or '}}', found {:?}", c))),
            }
            key = self.parse_value(level + 1)?;
        }
        if self.options.fold_nan {
            if let Some(folded) = fold_special(&map) {
                return Ok(folded);
            }
        }
        Ok(Value::Map(map))
    }


    /// A number, or a complex written as `real ± imaginary`.
    fn parse_numeric(&mut self) -> Result<Value> {
        let (line, col) = (self.line, self.column);
        let left = self.parse_signed()?;
        self.skip_whitespace();
        let op = match self.peek_char() {
            Some(op @ ('+' | '-')) => op,
            _ => return Ok(left.into_value()),
        };
        self.next_char();
        self.skip_whitespace();
        let right = self.parse_unsigned()?;
        let re = match left {
            Number::Int(i) => Value::Int(i).as_f64(),
            Number::Float(f) => Some(f),
            Number::Imaginary { .. } => None,
        };
        match (re, right) {
            (Some(re), Number::Imaginary { im, .. }) => {
                let im = if op == '-' { -im } else { im };
                Ok(Value::Complex(Complex::new(re, im)))
            }
            _ => Err(Error::grammar(
                line,
                col,
                "arithmetic is not allowed in literals",
                self.context(),
            )),
        }
    }

    fn parse_signed(&mut self) -> Result<Number> {
        let negative = match self.peek_char() {
            Some('-') => true,
            Some('+') => false,
            _ => return self.parse_unsigned(),
        };
        self.next_char();
        self.skip_whitespace();
        if matches!(self.peek_char(), Some('+' | '-')) {
            return Err(self.grammar("only a single unary sign is allowed"));
        }
        let number = self.parse_unsigned()?;
        Ok(if negative { number.negate() } else { number })
    }

    fn parse_unsigned(&mut self) -> Result<Number> {
        let (line, col) = (self.line, self.column);
        match self.peek_char() {
            Some(c) if c.is_ascii_digit() || c == '.' => {}
            None => return Err(self.eof("a number")),
            Some(c) => return Err(self.grammar(&format!("expected a number, found {:?}", c))),
        }

        let radix = match (self.peek_char(), self.peek_nth(1)) {
            (Some('0'), Some('x' | 'X')) => Some(16),
            (Some('0'), Some('o' | 'O')) => Some(8),
            (Some('0'), Some('b' | 'B')) => Some(2),
            _ => None,
        };
        if let Some(radix) = radix {
            self.next_char();
            self.next_char();
            let start = self.position;
            while matches!(self.peek_char(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
                self.next_char();
            }
            let raw = &self.input[start..self.position];
            let raw = raw.strip_prefix('_').unwrap_or(raw);
            return strip_separators(raw, radix)
                .and_then(|digits| BigInt::parse_bytes(digits.as_bytes(), radix))
                .map(Number::Int)
                .ok_or_else(|| self.malformed_at(line, col, "invalid integer literal"));
        }

        let start = self.position;
        while let Some(c) = self.peek_char() {
            match c {
                '0'..='9' | '_' | '.' => {
                    self.next_char();
                }
                'e' | 'E' => {
                    self.next_char();
                    if matches!(self.peek_char(), Some('+' | '-')) {
                        self.next_char();
                    }
                }
                _ => break,
            }
        }
        let text = &self.input[start..self.position];
        let imaginary = matches!(self.peek_char(), Some('j' | 'J'));
        if imaginary {
            self.next_char();
        }
        if matches!(self.peek_char(), Some(c) if c.is_alphanumeric() || c == '_') {
            return Err(self.malformed_at(line, col, "invalid number literal"));
        }

        let digits = strip_separators(text, 10)
            .ok_or_else(|| self.malformed_at(line, col, "invalid number literal"))?;
        let is_float = imaginary || digits.contains(['.', 'e', 'E']);
        if !is_float {
            if digits.len() > 1 && digits.starts_with('0') && digits.bytes().any(|b| b != b'0') {
                return Err(self.malformed_at(
                    line,
                    col,
                    "leading zeros in decimal integer literals are not permitted",
                ));
            }
            return BigInt::parse_bytes(digits.as_bytes(), 10)
                .map(Number::Int)
                .ok_or_else(|| self.malformed_at(line, col, "invalid integer literal"));
        }

        // overflowing exponents such as 1e30000 parse to infinity
        let value: f64 = digits
            .parse()
            .map_err(|_| self.malformed_at(line, col, "invalid float literal"))?;
        Ok(if imaginary {
            Number::Imaginary { re: 0.0, im: value }
        } else {
            Number::Float(value)
        })
    }

    /// Whether the cursor is on a quote, optionally behind a string prefix.
    fn at_string_start(&self) -> bool {
        let mut chars = self.input[self.position..].chars();
        for _ in 0..3 {
            match chars.next() {
                Some('\'' | '"') => return true,
                Some('r' | 'R' | 'b' | 'B' | 'u' | 'U') => continue,
                _ => return false,
            }
        }
        false
    }

    /// One or more adjacent string literals, concatenated.
    fn parse_strings(&mut self) -> Result<Value> {
        let (line, col) = (self.line, self.column);
        let mut acc = self.parse_literal()?;
        loop {
            self.skip_whitespace();
            if !self.at_string_start() {
                break;
            }
            match (&mut acc, self.parse_literal()?) {
                (Literal::Str(a), Literal::Str(b)) => a.push_str(&b),
                (Literal::Bytes(a), Literal::Bytes(b)) => a.extend_from_slice(&b),
                _ => {
                    return Err(self.malformed_at(line, col, "cannot mix bytes and str literals"))
                }
            }
        }
        Ok(match acc {
            Literal::Str(s) => Value::Str(s),
            Literal::Bytes(b) => Value::Bytes(b),
        })
    }

    fn parse_literal(&mut self) -> Result<Literal> {
        let (line, col) = (self.line, self.column);
        let (mut raw, mut bytes, mut unicode) = (false, false, false);
        while let Some(c) = self.peek_char() {
            match c {
                '\'' | '"' => break,
                'r' | 'R' if !raw && !unicode => raw = true,
                'b' | 'B' if !bytes && !unicode => bytes = true,
                'u' | 'U' if !raw && !bytes && !unicode => unicode = true,
                _ => return Err(self.malformed_at(line, col, "invalid string prefix")),
            }
            self.next_char();
        }
        let Some(quote) = self.next_char() else {
            return Err(self.eof("a quote"));
        };
        let triple = self.peek_char() == Some(quote) && self.peek_nth(1) == Some(quote);
        if triple {
            self.next_char();
            self.next_char();
        }

        let mut literal = if bytes {
            Literal::Bytes(Vec::new())
        } else {
            Literal::Str(String::new())
        };
        loop {
            let (ch_line, ch_col) = (self.line, self.column);
            let Some(ch) = self.next_char() else {
                return Err(self.eof("the closing quote"));
            };
            let pushed = match ch {
                c if c == quote => {
                    if !triple {
                        break;
                    }
                    if self.peek_char() == Some(quote) && self.peek_nth(1) == Some(quote) {
                        self.next_char();
                        self.next_char();
                        break;
                    }
                    literal.push_char(c)
                }
                '\n' if !triple => {
                    return Err(self.malformed_at(line, col, "unterminated string literal"))
                }
                '\\' if raw => {
                    // the escaped character is kept, and never closes the literal
                    let next = self.next_char();
                    literal
                        .push_char('\\')
                        .and_then(|()| next.map_or(Ok(()), |c| literal.push_char(c)))
                }
                '\\' => self.escape(&mut literal, ch_line, ch_col)?,
                c => literal.push_char(c),
            };
            pushed.map_err(|msg| self.malformed_at(ch_line, ch_col, msg))?;
        }
        Ok(literal)
    }

    /// Decodes the escape after a backslash.
    fn escape(
        &mut self,
        literal: &mut Literal,
        line: usize,
        col: usize,
    ) -> Result<std::result::Result<(), &'static str>> {
        let Some(c) = self.next_char() else {
            return Err(self.eof("an escape sequence"));
        };
        let simple = match c {
            '\n' => return Ok(Ok(())),
            '\\' | '\'' | '"' => c,
            'a' => '\x07',
            'b' => '\x08',
            'f' => '\x0c',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'v' => '\x0b',
            '0'..='7' => {
                let mut code = c.to_digit(8).unwrap_or_default();
                for _ in 0..2 {
                    match self.peek_char().and_then(|d| d.to_digit(8)) {
                        Some(digit) => {
                            self.next_char();
                            code = code * 8 + digit;
                        }
                        None => break,
                    }
                }
                return Ok(literal.push_code(code));
            }
            'x' => {
                let code = self.hex_escape(2, line, col)?;
                return Ok(literal.push_code(code));
            }
            'u' if !literal.is_bytes() => {
                let code = self.hex_escape(4, line, col)?;
                return Ok(literal.push_code(code));
            }
            'U' if !literal.is_bytes() => {
                let code = self.hex_escape(8, line, col)?;
                return Ok(literal.push_code(code));
            }
            'N' if !literal.is_bytes() => {
                return Err(self.malformed_at(line, col, "named unicode escapes are not supported"))
            }
            other => {
                // unknown escapes keep their backslash
                return Ok(literal.push_char('\\').and_then(|()| literal.push_char(other)));
            }
        };
        Ok(literal.push_char(simple))
    }

    fn hex_escape(&mut self, len: usize, line: usize, col: usize) -> Result<u32> {
        let mut code = 0u32;
        for _ in 0..len {
            match self.peek_char().and_then(|d| d.to_digit(16)) {
                Some(digit) => {
                    self.next_char();
                    code = code * 16 + digit;
                }
                None => return Err(self.malformed_at(line, col, "truncated hex escape")),
            }
        }
        Ok(code)
    }
}

/// Removes `_` digit separators, which must sit between two digits.
fn strip_separators(text: &str, radix: u32) -> Option<String> {
    let bytes = text.as_bytes();
    let is_digit = |b: u8| (b as char).is_digit(radix);
    let mut out = String::with_capacity(text.len());
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'_' {
            let before = i.checked_sub(1).map(|j| bytes[j]);
            let after = bytes.get(i + 1).copied();
            if !(before.is_some_and(is_digit) && after.is_some_and(is_digit)) {
                return None;
            }
        } else {
            out.push(b as char);
        }
    }
    Some(out)
}

/// Dict keys and set elements must be hashable; `None` and bytes are allowed.
fn check_key(key: &Value) -> Result<()> {
    match key {
        Value::List(_) | Value::Map(_) | Value::Set(_) => Err(Error::non_hashable(key.kind_name())),
        Value::Tuple(items) => items.iter().try_for_each(check_key),
        _ => Ok(()),
    }
}

/// Recognizes the tagged mappings written for NaN floats and NaN complexes.
fn fold_special(map: &SerpentMap) -> Option<Value> {
    let field = |name: &str| map.get_str(name);
    match field(CLASS_KEY)?.as_str()? {
        "float" if map.len() == 2 && field("value")?.as_str()? == "nan" => Some(Value::Float(f64::NAN)),
        "complex" if map.len() == 3 => {
            let re = field("real")?.as_f64()?;
            let im = field("imag")?.as_f64()?;
            Some(Value::Complex(Complex::new(re, im)))
        }
        _ => None,
    }
}

macro_rules! forward_to_value {
    ($($method:ident($($arg:ident: $ty:ty),*))*) => {
        $(
            fn $method<V>(self, $($arg: $ty,)* visitor: V) -> Result<V::Value>
            where
                V: de::Visitor<'de>,
            {
                let value = self.parse_document()?;
                ValueDeserializer::new(value).$method($($arg,)* visitor)
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for &mut Deserializer<'de> {
    type Error = Error;

    forward_to_value! {
        deserialize_any()
        deserialize_bool()
        deserialize_i8()
        deserialize_i16()
        deserialize_i32()
        deserialize_i64()
        deserialize_i128()
        deserialize_u8()
        deserialize_u16()
        deserialize_u32()
        deserialize_u64()
        deserialize_u128()
        deserialize_f32()
        deserialize_f64()
        deserialize_char()
        deserialize_str()
        deserialize_string()
        deserialize_bytes()
        deserialize_byte_buf()
        deserialize_option()
        deserialize_unit()
        deserialize_unit_struct(name: &'static str)
        deserialize_newtype_struct(name: &'static str)
        deserialize_seq()
        deserialize_tuple(len: usize)
        deserialize_tuple_struct(name: &'static str, len: usize)
        deserialize_map()
        deserialize_struct(name: &'static str, fields: &'static [&'static str])
        deserialize_enum(name: &'static str, variants: &'static [&'static str])
        deserialize_identifier()
        deserialize_ignored_any()
    }
}

/// Drives a `Deserialize` impl from an already parsed [`Value`].
pub(crate) struct ValueDeserializer {
    value: Value,
}

impl ValueDeserializer {
    pub(crate) fn new(value: Value) -> Self {
        ValueDeserializer { value }
    }
}

impl<'de> de::Deserializer<'de> for ValueDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::None => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(b),
            Value::Int(i) => {
                if let Ok(small) = i64::try_from(&i) {
                    visitor.visit_i64(small)
                } else if let Ok(small) = u64::try_from(&i) {
                    visitor.visit_u64(small)
                } else if let Ok(wide) = i128::try_from(&i) {
                    visitor.visit_i128(wide)
                } else if let Ok(wide) = u128::try_from(&i) {
                    visitor.visit_u128(wide)
                } else {
                    visitor.visit_string(i.to_string())
                }
            }
            Value::Float(f) => visitor.visit_f64(f),
            Value::Complex(c) => {
                visitor.visit_seq(SeqDeserializer::new(vec![Value::Float(c.re), Value::Float(c.im)]))
            }
            Value::Str(s) => visitor.visit_string(s),
            Value::Bytes(b) => visitor.visit_byte_buf(b),
            Value::List(items) | Value::Tuple(items) => visitor.visit_seq(SeqDeserializer::new(items)),
            Value::Set(set) => visitor.visit_seq(SeqDeserializer::new(set.into_iter().collect())),
            Value::Map(map) => visitor.visit_map(MapDeserializer::new(map)),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::None => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match &self.value {
            Value::None => visitor.visit_unit(),
            Value::Tuple(items) if items.is_empty() => visitor.visit_unit(),
            _ => self.deserialize_any(visitor),
        }
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match &self.value {
            Value::Map(map) if map.len() == 1 && map.get_str(CLASS_KEY).is_some() => visitor.visit_unit(),
            _ => self.deserialize_unit(visitor),
        }
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match &self.value {
            Value::Bytes(_) | Value::Map(_) => match crate::bytes::decode_bytes(&self.value) {
                Ok(bytes) => visitor.visit_byte_buf(bytes),
                Err(_) => self.deserialize_any(visitor),
            },
            _ => self.deserialize_any(visitor),
        }
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_struct<V>(
        self,
        name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Map(mut map) => {
                map.remove(&Value::from(CLASS_KEY));
                visitor.visit_map(MapDeserializer::new(map))
            }
            Value::Float(seconds) if name == "Duration" && fields.contains(&"nanos") => {
                if !(seconds.is_finite() && seconds >= 0.0) {
                    return Err(Error::type_mismatch("non-negative seconds", "float"));
                }
                let mut parts = SerpentMap::with_capacity(2);
                parts.insert(Value::from("secs"), Value::from(seconds.trunc() as u64));
                parts.insert(
                    Value::from("nanos"),
                    Value::from(((seconds.fract() * 1e9).round() as u32).min(999_999_999)),
                );
                visitor.visit_map(MapDeserializer::new(parts))
            }
            other => ValueDeserializer::new(other).deserialize_any(visitor),
        }
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Str(variant) => visitor.visit_enum(variant.into_deserializer()),
            Value::Int(index) => {
                let index = u32::try_from(&index)
                    .map_err(|_| Error::type_mismatch("variant index", "int"))?;
                visitor.visit_enum(de::value::U32Deserializer::<Error>::new(index))
            }
            Value::Map(map) if map.len() == 1 => {
                let Some((variant, value)) = map.into_iter().next() else {
                    return Err(Error::custom("empty enum mapping"));
                };
                visitor.visit_enum(EnumDeserializer { variant, value })
            }
            other => Err(Error::type_mismatch("enum", other.kind_name())),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        seq tuple tuple_struct map identifier ignored_any
    }
}

struct SeqDeserializer {
    iter: std::vec::IntoIter<Value>,
}

impl SeqDeserializer {
    fn new(items: Vec<Value>) -> Self {
        SeqDeserializer {
            iter: items.into_iter(),
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct MapDeserializer {
    iter: indexmap::map::IntoIter<Value, Value>,
    value: Option<Value>,
}

impl MapDeserializer {
    fn new(map: SerpentMap) -> Self {
        MapDeserializer {
            iter: map.into_iter(),
            value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(ValueDeserializer::new(key)).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(Error::custom("value is missing")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct EnumDeserializer {
    variant: Value,
    value: Value,
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = VariantDeserializer;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(ValueDeserializer::new(self.variant))?;
        Ok((variant, VariantDeserializer { value: self.value }))
    }
}

struct VariantDeserializer {
    value: Value,
}

impl<'de> de::VariantAccess<'de> for VariantDeserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.value {
            Value::None => Ok(()),
            other => Err(Error::type_mismatch("unit variant", other.kind_name())),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        seed.deserialize(ValueDeserializer::new(self.value))
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        de::Deserializer::deserialize_seq(ValueDeserializer::new(self.value), visitor)
    }

    fn struct_variant<V>(self, fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        de::Deserializer::deserialize_struct(ValueDeserializer::new(self.value), "", fields, visitor)
    }
}
