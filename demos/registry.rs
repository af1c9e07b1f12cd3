//! Custom type handlers, explicit object state, exceptions and shared graphs.
//!
//! Run with: cargo run --example registry

use serde::{Serialize, Serializer};
use serde_serpent::{
    serialize_object, to_string, to_string_with_options, Exception, ObjectState, Registry,
    SerpentMap, SerpentOptions, Shared, TypeKind, Value,
};
use std::borrow::Cow;
use std::error::Error;

#[derive(Serialize)]
struct Celsius(f64);

#[derive(Serialize)]
enum Level {
    Low,
    High,
}

struct Account {
    owner: String,
    balance_cents: i64,
}

impl ObjectState for Account {
    fn class_name(&self) -> Cow<'_, str> {
        Cow::Borrowed("bank.Account")
    }

    fn get_state(&self) -> Option<SerpentMap> {
        let mut state = SerpentMap::new();
        state.insert(Value::from("owner"), Value::from(self.owner.as_str()));
        state.insert(Value::from("balance"), Value::from(self.balance_cents as f64 / 100.0));
        Some(state)
    }
}

impl Serialize for Account {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_object(self, serializer)
    }
}

#[derive(Serialize)]
struct Node {
    name: String,
    children: Vec<Shared<Node>>,
}

fn main() -> Result<(), Box<dyn Error>> {
    // A handler replaces the natural rendering of a matching type
    let mut registry = Registry::default();
    registry.register("Celsius", |natural, _ctx| {
        let degrees = natural.as_f64().unwrap_or_default();
        Ok(Value::from(format!("{:.1} °C", degrees)))
    });
    // Unit variants render as ordinals by default; use the variant name instead
    registry.register(TypeKind::UnitVariant, |_natural, ctx| {
        Ok(Value::from(ctx.info.variant.unwrap_or_default()))
    });
    let options = SerpentOptions::new().with_registry(registry);
    let readings = (Celsius(21.5), Level::Low, Level::High);
    println!("With handlers:\n{}\n", to_string_with_options(&readings, options)?);
    println!("Without:\n{}\n", to_string(&readings)?);

    // Objects with explicit state
    let account = Account {
        owner: "Alice".to_string(),
        balance_cents: 12_345,
    };
    println!("Object state:\n{}\n", to_string(&account)?);

    // Errors travel as tagged exception dicts
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "config.toml missing");
    let exc = Exception::from_error(&io).with_attribute("path", "config.toml");
    println!("Exception:\n{}\n", to_string(&exc)?);

    // Shared nodes may repeat, but a cycle is an error
    let leaf = Shared::new(Node {
        name: "leaf".to_string(),
        children: vec![],
    });
    let root = Shared::new(Node {
        name: "root".to_string(),
        children: vec![leaf.clone(), leaf.clone()],
    });
    println!("Diamond:\n{}\n", to_string(&root)?);

    leaf.borrow_mut().children.push(root.clone());
    match to_string(&root) {
        Ok(text) => println!("unexpectedly written: {}", text),
        Err(err) => println!("✓ {}", err),
    }
    // break the cycle so both nodes are freed
    leaf.borrow_mut().children.clear();

    Ok(())
}
