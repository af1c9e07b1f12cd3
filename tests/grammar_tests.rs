use serde::Serialize;
use serde_serpent::{
    read_str, read_with_options, to_string, to_string_pretty, to_string_with_options, Error,
    ReadOptions, SerpentOptions, Value,
};

#[derive(Serialize)]
struct User {
    id: u32,
    name: String,
    role: String,
}

fn body(text: &str) -> &str {
    text.split_once('\n').map_or(text, |(_, rest)| rest)
}

#[test]
fn test_header_line() {
    let text = to_string(&1).unwrap();
    assert_eq!(text, "# serpent utf-8 python3.2\n1");
}

#[test]
fn test_struct_list_layout() {
    let users = vec![
        User {
            id: 1,
            name: "Alice".to_string(),
            role: "admin".to_string(),
        },
        User {
            id: 2,
            name: "Bob".to_string(),
            role: "user".to_string(),
        },
    ];

    let text = to_string(&users).unwrap();
    assert_eq!(
        body(&text),
        "[{'__class__':'User','id':1,'name':'Alice','role':'admin'},{'__class__':'User','id':2,'name':'Bob','role':'user'}]"
    );
}

#[test]
fn test_indented_layout() {
    let user = User {
        id: 1,
        name: "Alice".to_string(),
        role: "admin".to_string(),
    };
    let text = to_string_pretty(&(user, vec![1])).unwrap();
    println!("Indented:\n{}", text);
    assert_eq!(
        body(&text),
        "(\n  {\n    '__class__': 'User',\n    'id': 1,\n    'name': 'Alice',\n    'role': 'admin'\n  },\n  [\n    1\n  ]\n)"
    );
}

#[test]
fn test_indented_sets_are_sorted() {
    let set: serde_serpent::SerpentSet = [3, 1, 2].into_iter().map(Value::from).collect();
    let text = to_string_pretty(&Value::Set(set)).unwrap();
    assert_eq!(body(&text), "{\n  1,\n  2,\n  3\n}");
}

#[test]
fn test_indented_mixed_keys_keep_insertion_order() {
    let value = read_str("{'b': 1, 2: 'x', 'a': 3}").unwrap();
    let text = to_string_pretty(&value).unwrap();
    assert_eq!(body(&text), "{\n  'b': 1,\n  2: 'x',\n  'a': 3\n}");
}

#[test]
fn test_single_element_tuple() {
    assert_eq!(body(&to_string(&(5,)).unwrap()), "(5,)");
    assert_eq!(body(&to_string_pretty(&(5,)).unwrap()), "(\n  5,\n)");
}

#[test]
fn test_empty_containers() {
    let empty: Vec<i32> = Vec::new();
    assert_eq!(body(&to_string(&empty).unwrap()), "[]");
    assert_eq!(body(&to_string(&()).unwrap()), "None");
    assert_eq!(body(&to_string(&Value::Tuple(vec![])).unwrap()), "()");
    assert_eq!(body(&to_string(&Value::Set(Default::default())).unwrap()), "()");
    assert_eq!(body(&to_string(&std::collections::HashMap::<i32, i32>::new()).unwrap()), "{}");
}

#[test]
fn test_quote_selection() {
    assert_eq!(body(&to_string("plain").unwrap()), "'plain'");
    assert_eq!(body(&to_string("it's").unwrap()), "\"it's\"");
    assert_eq!(body(&to_string("say \"hi\"").unwrap()), "'say \"hi\"'");
    assert_eq!(body(&to_string("both ' and \"").unwrap()), "'both \\' and \"'");
}

#[test]
fn test_non_ascii_is_escaped() {
    assert_eq!(body(&to_string("é").unwrap()), "'\\xe9'");
    assert_eq!(body(&to_string("€").unwrap()), "'\\u20ac'");
    assert_eq!(body(&to_string("😀").unwrap()), "'\\U0001f600'");
    assert_eq!(body(&to_string("a\u{0}b").unwrap()), "'a\\x00b'");
}

#[test]
fn test_float_forms() {
    assert_eq!(body(&to_string(&1.0).unwrap()), "1.0");
    assert_eq!(body(&to_string(&0.1).unwrap()), "0.1");
    assert_eq!(body(&to_string(&1e300).unwrap()), "1e300");
    assert_eq!(body(&to_string(&f64::INFINITY).unwrap()), "1e30000");
}

#[test]
fn test_reader_literal_forms() {
    let value = read_str(
        "[0x1F, 0o17, 0b11, 1_000, 1., .5, 2E-2, 3j, -4.5+1j, r'\\d', b'\\x01', u'\\u00e9', 'a' 'b']",
    )
    .unwrap();
    let expected = vec![
        Value::from(31),
        Value::from(15),
        Value::from(3),
        Value::from(1000),
        Value::Float(1.0),
        Value::Float(0.5),
        Value::Float(0.02),
        Value::Complex(serde_serpent::Complex::new(0.0, 3.0)),
        Value::Complex(serde_serpent::Complex::new(-4.5, 1.0)),
        Value::from("\\d"),
        Value::Bytes(vec![1]),
        Value::from("é"),
        Value::from("ab"),
    ];
    assert_eq!(value, Value::List(expected));
}

#[test]
fn test_reader_accepts_trailing_commas_and_comments() {
    let text = "# a comment\n{\n  'a': [1, 2,],  # trailing\n  'b': (3,),\n}\n";
    let value = read_str(text).unwrap();
    assert_eq!(value.as_map().map(|m| m.len()), Some(2));
}

#[test]
fn test_reader_rejects_multiple_expressions() {
    assert!(matches!(read_str("1\n2"), Err(Error::GrammarViolation { .. })));
    assert!(matches!(read_str("1; 2"), Err(Error::GrammarViolation { .. })));
}

#[test]
fn test_reader_rejects_sets_in_legacy_profile() {
    let legacy = ReadOptions::new().with_set_literals(false);
    assert!(matches!(
        read_with_options(b"{1, 2}", &legacy),
        Err(Error::GrammarViolation { .. })
    ));
    assert!(read_with_options(b"{1: 2}", &legacy).is_ok());
}

#[test]
fn test_reader_malformed_literals() {
    for input in ["[1, 2", "{'a': 1", "(1, 2", "'abc", "'''abc''"] {
        assert!(
            matches!(read_str(input), Err(Error::UnexpectedEof { .. })),
            "{input} should hit end of input"
        );
    }
    for input in ["'\\x1'", "'\\N{BULLET}'", "0x", "1_", "08", "1e", "'\\ud800'"] {
        assert!(
            matches!(read_str(input), Err(Error::Malformed { .. })),
            "{input} should be malformed"
        );
    }
}

#[test]
fn test_legacy_profile_output() {
    let set: serde_serpent::SerpentSet = [1].into_iter().map(Value::from).collect();
    let options = SerpentOptions::new().with_set_literals(false);
    let text = to_string_with_options(&Value::Set(set), options).unwrap();
    assert_eq!(text, "# serpent utf-8 python2.6\n(1,)");
}

#[test]
fn test_reader_accepts_other_writer_headers() {
    let text = "# serpent utf-8 python2.7\n[ 1, 2,\n # some comments here\n 3, 4] # more here\n";
    let expected: Vec<Value> = (1..=4).map(Value::from).collect();
    assert_eq!(read_str(text).unwrap(), Value::List(expected));

    for header in ["python3.11", ".net", "dotnet-cli4.0"] {
        let text = format!("# serpent utf-8 {header}\n{{'a': (1, 2)}}");
        assert!(read_str(&text).is_ok(), "{header} should be readable");
    }

    let legacy = ReadOptions::new().with_set_literals(false);
    assert!(matches!(
        read_with_options(b"# serpent utf-8 python3.11\n[]", &legacy),
        Err(Error::IncompatibleCapability { .. })
    ));
    assert!(read_with_options(b"# serpent utf-8 python2.7\n[]", &legacy).is_ok());
}
