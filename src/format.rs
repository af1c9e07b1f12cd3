//! Text emission for [`Value`] trees.
//!
//! The formatter is the second half of the writer: dispatch in [`crate::ser`]
//! reduces any serializable value to a [`Value`], and this module turns that
//! tree into serpent text. It owns every textual decision: quoting, escaping,
//! numeric edge cases, compact and indented layout, and the canonical ordering
//! of dict keys and set elements in indented output.

use crate::{BytesMode, Complex, Error, Result, SerpentMap, SerpentOptions, SerpentSet, Value};
use num_bigint::BigInt;
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt::Write as _;

const NAN_MAPPING: &str = "{'__class__':'float','value':'nan'}";
const POS_INF: &str = "1e30000";
const NEG_INF: &str = "-1e30000";

/// Writes the header line followed by `value`.
pub(crate) fn write_document(value: &Value, options: &SerpentOptions) -> Result<String> {
    let mut formatter = Formatter::new(options, true);
    formatter.out.push_str(options.header());
    formatter.value(value, 0)?;
    Ok(formatter.out)
}

/// Compact rendering without header or validation, used by `Display`.
pub(crate) fn display(value: &Value) -> String {
    let options = SerpentOptions::new()
        .with_bytes_mode(BytesMode::Literal)
        .with_max_depth(usize::MAX);
    let mut formatter = Formatter::new(&options, false);
    // lenient mode has no failure paths
    let _ = formatter.value(value, 0);
    formatter.out
}

struct Formatter<'a> {
    out: String,
    options: &'a SerpentOptions,
    strict: bool,
}

impl<'a> Formatter<'a> {
    fn new(options: &'a SerpentOptions, strict: bool) -> Self {
        Formatter {
            out: String::with_capacity(256),
            options,
            strict,
        }
    }

    fn value(&mut self, value: &Value, level: usize) -> Result<()> {
        if self.strict && level > self.options.max_depth {
            return Err(Error::NestingTooDeep {
                limit: self.options.max_depth,
            });
        }
        match value {
            Value::None => self.out.push_str("None"),
            Value::Bool(b) => self.out.push_str(if *b { "True" } else { "False" }),
            Value::Int(i) => {
                let _ = write!(self.out, "{}", i);
            }
            Value::Float(f) => write_float(&mut self.out, *f),
            Value::Complex(c) => write_complex(&mut self.out, *c),
            Value::Str(s) => write_quoted(&mut self.out, s),
            Value::Bytes(data) => match self.options.bytes {
                BytesMode::Base64 => {
                    let wrapped = crate::bytes::encode_bytes(data, BytesMode::Base64);
                    self.value(&wrapped, level)?;
                }
                BytesMode::Literal => write_bytes_literal(&mut self.out, data),
            },
            Value::List(items) => self.sequence('[', ']', items.iter(), level, false)?,
            Value::Tuple(items) => self.sequence('(', ')', items.iter(), level, true)?,
            Value::Set(set) => self.set(set, level)?,
            Value::Map(map) => self.map(map, level)?,
        }
        Ok(())
    }

    fn sequence<'v, I>(&mut self, open: char, close: char, items: I, level: usize, tuple: bool) -> Result<()>
    where
        I: ExactSizeIterator<Item = &'v Value>,
    {
        let len = items.len();
        self.out.push(open);
        if len == 0 {
            self.out.push(close);
            return Ok(());
        }
        if self.options.indent {
            self.out.push('\n');
            for (i, item) in items.enumerate() {
                self.indent(level + 1);
                self.value(item, level + 1)?;
                if i + 1 < len || (tuple && len == 1) {
                    self.out.push(',');
                }
                self.out.push('\n');
            }
            self.indent(level);
        } else {
            for (i, item) in items.enumerate() {
                if i > 0 {
                    self.out.push(',');
                }
                self.value(item, level + 1)?;
            }
            if tuple && len == 1 {
                self.out.push(',');
            }
        }
        self.out.push(close);
        Ok(())
    }

    fn set(&mut self, set: &SerpentSet, level: usize) -> Result<()> {
        if self.strict {
            for element in set {
                check_key(element)?;
            }
        }
        if set.is_empty() {
            // no literal form for the empty set
            self.out.push_str("()");
            return Ok(());
        }
        let mut elements: Vec<&Value> = set.iter().collect();
        if self.options.indent {
            sort_canonical(&mut elements, |v| *v);
        }
        if self.options.set_literals {
            self.sequence('{', '}', elements.into_iter(), level, false)
        } else {
            self.sequence('(', ')', elements.into_iter(), level, true)
        }
    }

    fn map(&mut self, map: &SerpentMap, level: usize) -> Result<()> {
        if self.strict {
            for key in map.keys() {
                check_key(key)?;
            }
        }
        self.out.push('{');
        if map.is_empty() {
            self.out.push('}');
            return Ok(());
        }
        if self.options.indent {
            let mut entries: Vec<(&Value, &Value)> = map.iter().collect();
            sort_canonical(&mut entries, |(k, _)| *k);
            self.out.push('\n');
            let last = entries.len() - 1;
            for (i, (key, value)) in entries.into_iter().enumerate() {
                self.indent(level + 1);
                self.value(key, level + 1)?;
                self.out.push_str(": ");
                self.value(value, level + 1)?;
                if i < last {
                    self.out.push(',');
                }
                self.out.push('\n');
            }
            self.indent(level);
        } else {
            for (i, (key, value)) in map.iter().enumerate() {
                if i > 0 {
                    self.out.push(',');
                }
                self.value(key, level + 1)?;
                self.out.push(':');
                self.value(value, level + 1)?;
            }
        }
        self.out.push('}');
        Ok(())
    }

    #[inline]
    fn indent(&mut self, level: usize) {
        for _ in 0..level {
            self.out.push_str("  ");
        }
    }
}

/// Dict keys and set elements must read back as hashable values.
fn check_key(key: &Value) -> Result<()> {
    if !key.is_hashable() {
        return Err(Error::non_hashable(key.kind_name()));
    }
    if contains_nan(key) {
        // NaN is written as a dict, which cannot be a key
        return Err(Error::non_hashable("float nan"));
    }
    Ok(())
}

fn contains_nan(value: &Value) -> bool {
    match value {
        Value::Float(f) => f.is_nan(),
        Value::Complex(c) => c.has_nan(),
        Value::Tuple(items) => items.iter().any(contains_nan),
        _ => false,
    }
}

/// Sorts in canonical order when every pair is comparable; otherwise the
/// original order is kept.
fn sort_canonical<T, F>(items: &mut [T], key: F)
where
    F: Fn(&T) -> &Value,
{
    let mut shape: Option<Shape> = None;
    for item in items.iter() {
        let Some(next) = Shape::of(key(item)) else {
            return;
        };
        shape = match shape {
            None => Some(next),
            Some(prev) => match prev.merge(next) {
                Some(merged) => Some(merged),
                None => return,
            },
        };
    }
    items.sort_by(|a, b| canonical_cmp(key(a), key(b)));
}

/// What a value can be ordered against. Tuples compare element-wise, so
/// their shape is the merged shape of each position.
#[derive(Debug, PartialEq)]
enum Shape {
    Number,
    Str,
    Bytes,
    Tuple(Vec<Shape>),
}

impl Shape {
    fn of(value: &Value) -> Option<Shape> {
        match value {
            Value::Float(f) if f.is_nan() => None,
            Value::Bool(_) | Value::Int(_) | Value::Float(_) => Some(Shape::Number),
            Value::Str(_) => Some(Shape::Str),
            Value::Bytes(_) => Some(Shape::Bytes),
            Value::Tuple(items) => items
                .iter()
                .map(Shape::of)
                .collect::<Option<Vec<_>>>()
                .map(Shape::Tuple),
            _ => None,
        }
    }

    fn merge(self, other: Shape) -> Option<Shape> {
        match (self, other) {
            (Shape::Tuple(left), Shape::Tuple(right)) => {
                let (mut long, short) = if left.len() >= right.len() {
                    (left, right)
                } else {
                    (right, left)
                };
                let tail = long.split_off(short.len());
                let mut merged = long
                    .into_iter()
                    .zip(short)
                    .map(|(a, b)| a.merge(b))
                    .collect::<Option<Vec<_>>>()?;
                merged.extend(tail);
                Some(Shape::Tuple(merged))
            }
            (a, b) if a == b => Some(a),
            _ => None,
        }
    }
}

/// Total over values sharing a [`Shape`]: numbers by exact value, strings and
/// bytes lexicographically, tuples element-wise then by length.
fn canonical_cmp(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Str(x), Value::Str(y)) => x.cmp(y),
        (Value::Bytes(x), Value::Bytes(y)) => x.cmp(y),
        (Value::Tuple(x), Value::Tuple(y)) => x
            .iter()
            .zip(y.iter())
            .map(|(left, right)| canonical_cmp(left, right))
            .find(|ord| ord.is_ne())
            .unwrap_or_else(|| x.len().cmp(&y.len())),
        (Value::Float(x), Value::Float(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        (Value::Float(x), _) => match integer(b) {
            Some(y) => int_float_cmp(&y, *x).reverse(),
            None => Ordering::Equal,
        },
        (_, Value::Float(y)) => match integer(a) {
            Some(x) => int_float_cmp(&x, *y),
            None => Ordering::Equal,
        },
        _ => match (integer(a), integer(b)) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => Ordering::Equal,
        },
    }
}

fn integer(value: &Value) -> Option<Cow<'_, BigInt>> {
    match value {
        Value::Bool(b) => Some(Cow::Owned(BigInt::from(u8::from(*b)))),
        Value::Int(i) => Some(Cow::Borrowed(i)),
        _ => None,
    }
}

/// Compares without rounding the integer through `f64`.
fn int_float_cmp(int: &BigInt, float: f64) -> Ordering {
    if float.is_infinite() {
        return if float > 0.0 {
            Ordering::Less
        } else {
            Ordering::Greater
        };
    }
    let whole = float.trunc();
    // `{:.0}` prints every digit of an integral float
    let Ok(whole_int) = format!("{whole:.0}").parse::<BigInt>() else {
        return Ordering::Equal;
    };
    match int.cmp(&whole_int) {
        Ordering::Equal => 0.0_f64.partial_cmp(&(float - whole)).unwrap_or(Ordering::Equal),
        other => other,
    }
}

fn write_float(out: &mut String, f: f64) {
    if f.is_nan() {
        out.push_str(NAN_MAPPING);
    } else if f.is_infinite() {
        out.push_str(if f > 0.0 { POS_INF } else { NEG_INF });
    } else {
        // Debug keeps the fraction and switches to exponent form for extremes
        let _ = write!(out, "{:?}", f);
    }
}

fn write_complex(out: &mut String, c: Complex) {
    if c.has_nan() {
        out.push_str("{'__class__':'complex','real':");
        write_float(out, c.re);
        out.push_str(",'imag':");
        write_float(out, c.im);
        out.push('}');
        return;
    }
    out.push('(');
    write_float(out, c.re);
    if c.im.is_sign_negative() {
        out.push('-');
        write_float(out, -c.im);
    } else {
        out.push('+');
        write_float(out, c.im);
    }
    out.push_str("j)");
}

/// Picks the quote character: single, unless the text holds `'` and no `"`.
#[inline]
fn quote_for(has_single: bool, has_double: bool) -> char {
    if has_single && !has_double {
        '"'
    } else {
        '\''
    }
}

fn write_quoted(out: &mut String, s: &str) {
    let quote = quote_for(s.contains('\''), s.contains('"'));
    out.reserve(s.len() + 2);
    out.push(quote);
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(ch),
            c => {
                let code = c as u32;
                let _ = if code < 0x100 {
                    write!(out, "\\x{:02x}", code)
                } else if code < 0x10000 {
                    write!(out, "\\u{:04x}", code)
                } else {
                    write!(out, "\\U{:08x}", code)
                };
            }
        }
    }
    out.push(quote);
}

fn write_bytes_literal(out: &mut String, data: &[u8]) {
    let quote = quote_for(data.contains(&b'\''), data.contains(&b'"'));
    out.reserve(data.len() + 3);
    out.push('b');
    out.push(quote);
    for &byte in data {
        match byte {
            b'\\' => out.push_str("\\\\"),
            b'\t' => out.push_str("\\t"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b if char::from(b) == quote => {
                out.push('\\');
                out.push(char::from(b));
            }
            b' '..=b'~' => out.push(char::from(byte)),
            b => {
                let _ = write!(out, "\\x{:02x}", b);
            }
        }
    }
    out.push(quote);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compact(value: &Value) -> String {
        let options = SerpentOptions::new();
        let text = write_document(value, &options).unwrap();
        text[options.header().len()..].to_string()
    }

    fn indented(value: &Value) -> String {
        let options = SerpentOptions::pretty();
        let text = write_document(value, &options).unwrap();
        text[options.header().len()..].to_string()
    }

    fn ints(items: &[i64]) -> Vec<Value> {
        items.iter().copied().map(Value::from).collect()
    }

    #[test]
    fn test_float_forms() {
        assert_eq!(compact(&Value::Float(16.5)), "16.5");
        assert_eq!(compact(&Value::Float(1.0)), "1.0");
        assert_eq!(compact(&Value::Float(-0.0)), "-0.0");
        assert_eq!(compact(&Value::Float(f64::INFINITY)), "1e30000");
        assert_eq!(compact(&Value::Float(f64::NEG_INFINITY)), "-1e30000");
        assert_eq!(compact(&Value::Float(f64::NAN)), NAN_MAPPING);
    }

    #[test]
    fn test_complex_forms() {
        assert_eq!(compact(&Value::Complex(Complex::new(2.0, 3.0))), "(2.0+3.0j)");
        assert_eq!(compact(&Value::Complex(Complex::new(2.0, -3.0))), "(2.0-3.0j)");
        assert_eq!(
            compact(&Value::Complex(Complex::new(f64::INFINITY, 4.0))),
            "(1e30000+4.0j)"
        );
        assert_eq!(
            compact(&Value::Complex(Complex::new(1.0, f64::NAN))),
            "{'__class__':'complex','real':1.0,'imag':{'__class__':'float','value':'nan'}}"
        );
    }

    #[test]
    fn test_quote_selection() {
        assert_eq!(compact(&Value::from("plain")), "'plain'");
        assert_eq!(compact(&Value::from("it's")), "\"it's\"");
        assert_eq!(compact(&Value::from("He said \"hi\"")), "'He said \"hi\"'");
        assert_eq!(compact(&Value::from("quotes'\"")), "'quotes\\'\"'");
    }

    #[test]
    fn test_escapes() {
        assert_eq!(compact(&Value::from("a\\b")), "'a\\\\b'");
        assert_eq!(compact(&Value::from("\t\n\r")), "'\\t\\n\\r'");
        assert_eq!(compact(&Value::from("\x07\x0b\x0c")), "'\\x07\\x0b\\x0c'");
        assert_eq!(compact(&Value::from("\0")), "'\\x00'");
        assert_eq!(compact(&Value::from("é€😀")), "'\\xe9\\u20ac\\U0001f600'");
    }

    #[test]
    fn test_compact_containers() {
        let list = Value::List(vec![Value::from(42), Value::from("Sally"), Value::Float(16.5)]);
        assert_eq!(compact(&list), "[42,'Sally',16.5]");
        assert_eq!(compact(&Value::Tuple(ints(&[1]))), "(1,)");
        assert_eq!(compact(&Value::Tuple(ints(&[3, 2, 1]))), "(3,2,1)");
        assert_eq!(compact(&Value::Tuple(vec![])), "()");
        assert_eq!(compact(&Value::List(vec![])), "[]");
        assert_eq!(compact(&Value::Map(SerpentMap::new())), "{}");
        assert_eq!(compact(&Value::Set(SerpentSet::new())), "()");
    }

    #[test]
    fn test_indented_list() {
        let list = Value::List(vec![Value::from(42), Value::from("Sally"), Value::Float(16.5)]);
        assert_eq!(indented(&list), "[\n  42,\n  'Sally',\n  16.5\n]");
        assert_eq!(indented(&Value::Tuple(ints(&[1]))), "(\n  1,\n)");
        assert_eq!(indented(&Value::Tuple(ints(&[1, 2]))), "(\n  1,\n  2\n)");
    }

    #[test]
    fn test_indented_dict_is_sorted() {
        let map: SerpentMap = [(3, "three"), (1, "one"), (2, "two")]
            .into_iter()
            .map(|(k, v)| (Value::from(k), Value::from(v)))
            .collect();
        assert_eq!(
            indented(&Value::Map(map.clone())),
            "{\n  1: 'one',\n  2: 'two',\n  3: 'three'\n}"
        );
        assert_eq!(compact(&Value::Map(map)), "{3:'three',1:'one',2:'two'}");
    }

    #[test]
    fn test_indented_order_is_exact_and_total() {
        let big: num_bigint::BigInt = "9007199254740993".parse().unwrap();
        let set: SerpentSet = [
            Value::Float(2.5),
            Value::Int(big),
            Value::from(2),
            Value::Float(9007199254740992.0),
            Value::Bool(true),
            Value::Float(-0.5),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            indented(&Value::Set(set)),
            "{\n  -0.5,\n  True,\n  2,\n  2.5,\n  9007199254740992.0,\n  9007199254740993\n}"
        );

        // tuples differing in the type at some position keep insertion order
        let mut map = SerpentMap::new();
        map.insert(Value::Tuple(vec![Value::from(2), Value::from("x")]), Value::None);
        map.insert(Value::Tuple(vec![Value::from(1), Value::from(3)]), Value::None);
        assert_eq!(
            indented(&Value::Map(map)),
            "{\n  (\n    2,\n    'x'\n  ): None,\n  (\n    1,\n    3\n  ): None\n}"
        );

        // tuples of one shape sort element-wise, shorter first on a tie
        let mut map = SerpentMap::new();
        for key in [vec![2, 1], vec![1, 5], vec![1]] {
            map.insert(Value::Tuple(key.into_iter().map(Value::from).collect()), Value::None);
        }
        let keys: Vec<String> = indented(&Value::Map(map))
            .lines()
            .filter(|line| line.starts_with("    "))
            .map(str::trim)
            .map(str::to_string)
            .collect();
        assert_eq!(keys, ["1,", "1,", "5", "2,", "1"]);
    }

    #[test]
    fn test_mixed_keys_never_panic() {
        let mut map = SerpentMap::new();
        for i in 0..40_i64 {
            let key = match i % 4 {
                0 => Value::from(i),
                1 => Value::from(format!("k{i}")),
                2 => Value::Tuple(vec![Value::from(i), Value::from("t")]),
                _ => Value::Tuple(vec![Value::from("t"), Value::from(i)]),
            };
            map.insert(key, Value::from(i));
        }
        let text = indented(&Value::Map(map));
        assert_eq!(text.matches(": ").count(), 40);
        assert!(text.starts_with("{\n  0: 0,\n  'k1': 1,"));
    }

    #[test]
    fn test_nested_indentation() {
        let mut inner = SerpentMap::new();
        inner.insert(Value::from("k"), Value::List(ints(&[1])));
        let outer = Value::List(vec![Value::Map(inner)]);
        assert_eq!(indented(&outer), "[\n  {\n    'k': [\n      1\n    ]\n  }\n]");
    }

    #[test]
    fn test_mixed_keys_keep_insertion_order() {
        let mut map = SerpentMap::new();
        map.insert(Value::from("b"), Value::None);
        map.insert(Value::from(1), Value::None);
        map.insert(Value::from("a"), Value::None);
        assert_eq!(
            indented(&Value::Map(map)),
            "{\n  'b': None,\n  1: None,\n  'a': None\n}"
        );
    }

    #[test]
    fn test_sets_without_literals() {
        let set: SerpentSet = ints(&[3, 1, 2]).into_iter().collect();
        let options = SerpentOptions::new().with_set_literals(false);
        let text = write_document(&Value::Set(set.clone()), &options).unwrap();
        assert_eq!(text, "# serpent utf-8 python2.6\n(3,1,2)");

        let options = SerpentOptions::pretty().with_set_literals(false);
        let text = write_document(&Value::Set(set), &options).unwrap();
        assert_eq!(text, "# serpent utf-8 python2.6\n(\n  1,\n  2,\n  3\n)");
    }

    #[test]
    fn test_bytes_modes() {
        let data = Value::bytes(b"it's\x00".to_vec());
        assert_eq!(compact(&data), "{'data':'aXQncwA=','encoding':'base64'}");
        let options = SerpentOptions::new().with_bytes_mode(BytesMode::Literal);
        let text = write_document(&data, &options).unwrap();
        assert!(text.ends_with("b\"it's\\x00\""));
    }

    #[test]
    fn test_key_checks() {
        let mut map = SerpentMap::new();
        map.insert(Value::List(vec![]), Value::None);
        let err = write_document(&Value::Map(map), &SerpentOptions::new()).unwrap_err();
        assert!(matches!(err, Error::NonHashableKey(ref kind) if kind == "list"));

        let mut map = SerpentMap::new();
        map.insert(Value::Float(f64::NAN), Value::None);
        assert!(write_document(&Value::Map(map), &SerpentOptions::new()).is_err());

        let set: SerpentSet = [Value::None].into_iter().collect();
        assert!(write_document(&Value::Set(set), &SerpentOptions::new()).is_err());
    }

    #[test]
    fn test_depth_ceiling() {
        let nested = Value::List(vec![
            Value::from("level1"),
            Value::List(vec![
                Value::from("level2"),
                Value::List(vec![
                    Value::from("level3"),
                    Value::List(vec![Value::from("level4")]),
                ]),
            ]),
        ]);
        let ok = SerpentOptions::new().with_max_depth(4);
        assert!(write_document(&nested, &ok).is_ok());
        let tight = SerpentOptions::new().with_max_depth(3);
        assert!(matches!(
            write_document(&nested, &tight),
            Err(Error::NestingTooDeep { limit: 3 })
        ));
    }

    #[test]
    fn test_display_is_lenient() {
        let mut map = SerpentMap::new();
        map.insert(Value::List(vec![]), Value::bytes(b"x".to_vec()));
        assert_eq!(display(&Value::Map(map)), "{[]:b'x'}");
    }
}
