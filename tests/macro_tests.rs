use serde_serpent::{read_str, serpent, to_string, SerpentMap, Value};

#[test]
fn test_serpent_macro_none() {
    let value = serpent!(None);
    assert_eq!(value, Value::None);
}

#[test]
fn test_serpent_macro_booleans() {
    let true_val = serpent!(True);
    assert_eq!(true_val, Value::Bool(true));

    let false_val = serpent!(False);
    assert_eq!(false_val, Value::Bool(false));
}

#[test]
fn test_serpent_macro_numbers() {
    let int_val = serpent!(42);
    assert_eq!(int_val, Value::from(42));

    let float_val = serpent!(3.5);
    assert_eq!(float_val, Value::Float(3.5));

    let negative_val = serpent!(-123);
    assert_eq!(negative_val, Value::from(-123));
}

#[test]
fn test_serpent_macro_strings() {
    let string_val = serpent!("hello world");
    assert_eq!(string_val, Value::Str("hello world".to_string()));

    let empty_string = serpent!("");
    assert_eq!(empty_string, Value::Str(String::new()));
}

#[test]
fn test_serpent_macro_lists() {
    assert_eq!(serpent!([]), Value::List(vec![]));

    let list = serpent!([1, "two", None, (-3)]);
    assert_eq!(
        list,
        Value::List(vec![
            Value::from(1),
            Value::from("two"),
            Value::None,
            Value::from(-3),
        ])
    );
}

#[test]
fn test_serpent_macro_tuples() {
    assert_eq!(serpent!(()), Value::Tuple(vec![]));
    assert_eq!(serpent!((1,)), Value::Tuple(vec![Value::from(1)]));
    assert_eq!(
        serpent!((1, "a", True)),
        Value::Tuple(vec![Value::from(1), Value::from("a"), Value::Bool(true)])
    );
}

#[test]
fn test_serpent_macro_dicts() {
    assert_eq!(serpent!({}), Value::Map(SerpentMap::new()));

    let dict = serpent!({
        "name": "Alice",
        "age": 30,
        1: "int key",
        (0, 0): "origin"
    });
    let map = dict.as_map().unwrap();
    assert_eq!(map.len(), 4);
    assert_eq!(map.get_str("name"), Some(&Value::from("Alice")));
    assert_eq!(map.get(&Value::from(1)), Some(&Value::from("int key")));
    assert_eq!(
        map.get(&Value::Tuple(vec![Value::from(0), Value::from(0)])),
        Some(&Value::from("origin"))
    );
}

#[test]
fn test_serpent_macro_sets() {
    let set = serpent!({"a", "b", "a"});
    let set = set.as_set().unwrap();
    assert_eq!(set.len(), 2);
    assert!(set.contains(&Value::from("b")));
}

#[test]
fn test_serpent_macro_expressions() {
    let name = String::from("dynamic");
    let count = 2 + 3;
    let value = serpent!({"name": name, "count": count});
    assert_eq!(value.as_map().and_then(|m| m.get_str("count")), Some(&Value::from(5)));
}

#[test]
fn test_serpent_macro_matches_reader() {
    let built = serpent!({
        "users": [
            {"id": 1, "tags": ("admin",)},
            {"id": 2, "tags": ()}
        ],
        "active": True
    });
    let text = to_string(&built).unwrap();
    assert_eq!(read_str(&text).unwrap(), built);
    assert_eq!(
        read_str("{'users': [{'id': 1, 'tags': ('admin',)}, {'id': 2, 'tags': ()}], 'active': True}")
            .unwrap(),
        built
    );
}
