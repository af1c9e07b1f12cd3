/// Builds a [`Value`](crate::Value) from Python-like literal syntax.
///
/// Lists use `[..]`, dicts use `{k: v}`, sets use `{a, b}` and tuples use
/// `(a, b)` or `(a,)`. `None`, `True` and `False` are recognised; anything
/// else goes through `Value::from`. Negative numbers must be parenthesized.
///
/// ```rust
/// use serde_serpent::{serpent, Value};
///
/// let data = serpent!({
///     "name": "Alice",
///     "tags": ["rust", "python"],
///     "origin": (0, 0),
///     "manager": None
/// });
/// assert_eq!(data.to_string(), "{'name':'Alice','tags':['rust','python'],'origin':(0,0),'manager':None}");
/// ```
#[macro_export]
macro_rules! serpent {
    (None) => {
        $crate::Value::None
    };

    (True) => {
        $crate::Value::Bool(true)
    };

    (False) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::List(::std::vec::Vec::new())
    };

    ([ $($elem:tt),+ $(,)? ]) => {
        $crate::Value::List(vec![$($crate::serpent!($elem)),+])
    };

    ({}) => {
        $crate::Value::Map($crate::SerpentMap::new())
    };

    ({ $($key:tt : $value:tt),+ $(,)? }) => {{
        let mut map = $crate::SerpentMap::new();
        $(
            map.insert($crate::serpent!($key), $crate::serpent!($value));
        )+
        $crate::Value::Map(map)
    }};

    ({ $($elem:tt),+ $(,)? }) => {{
        let mut set = $crate::SerpentSet::new();
        $(
            set.insert($crate::serpent!($elem));
        )+
        $crate::Value::Set(set)
    }};

    (()) => {
        $crate::Value::Tuple(::std::vec::Vec::new())
    };

    // a parenthesized single value, not a tuple
    (( $single:tt )) => {
        $crate::serpent!($single)
    };

    (( $($elem:tt),+ $(,)? )) => {
        $crate::Value::Tuple(vec![$($crate::serpent!($elem)),+])
    };

    ($other:expr) => {
        $crate::Value::from($other)
    };
}

#[cfg(test)]
mod tests {
    use crate::{SerpentMap, Value};

    #[test]
    fn test_serpent_macro_primitives() {
        assert_eq!(serpent!(None), Value::None);
        assert_eq!(serpent!(True), Value::Bool(true));
        assert_eq!(serpent!(42), Value::from(42));
        assert_eq!(serpent!(3.5), Value::Float(3.5));
        assert_eq!(serpent!("hello"), Value::Str("hello".to_string()));
        assert_eq!(serpent!((-7)), Value::from(-7));
    }

    #[test]
    fn test_serpent_macro_containers() {
        assert_eq!(serpent!([]), Value::List(vec![]));
        assert_eq!(serpent!({}), Value::Map(SerpentMap::new()));
        assert_eq!(serpent!(()), Value::Tuple(vec![]));
        assert_eq!(serpent!((1,)), Value::Tuple(vec![Value::from(1)]));

        let set = serpent!({1, 2, 2});
        assert_eq!(set.as_set().map(|s| s.len()), Some(2));
    }

    #[test]
    fn test_serpent_macro_nested() {
        let value = serpent!({
            "point": (1, 2),
            "children": [None, {"leaf": True}]
        });
        let map = value.as_map().unwrap();
        assert_eq!(
            map.get_str("point"),
            Some(&Value::Tuple(vec![Value::from(1), Value::from(2)]))
        );
        assert_eq!(map.get_str("children").and_then(Value::as_slice).map(<[Value]>::len), Some(2));
    }
}
