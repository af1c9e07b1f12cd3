//! Working with Value for runtime flexibility.
//!
//! Run with: cargo run --example dynamic_values

use serde::{Deserialize, Serialize};
use serde_serpent::{from_value, read_str, serpent, to_string_pretty, to_value, Value};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize)]
struct User {
    id: u32,
    name: String,
    roles: Vec<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    // A worker config as it might arrive from a Python service
    let config = serpent!({
        "queue": "ingest",
        "workers": 4,
        "retry_on": ["timeout", "throttled"],
        "listen": ("0.0.0.0", 8080),
        "dry_run": True
    });

    println!("Config as serpent:\n{}\n", to_string_pretty(&config)?);

    let map = config.as_map().ok_or("config is not a dict")?;
    let queue = map.get_str("queue").and_then(Value::as_str).unwrap_or("default");
    let workers = map.get_str("workers").and_then(Value::as_i64).unwrap_or(1);
    let retry_on = map.get_str("retry_on").and_then(Value::as_slice).map_or(0, <[Value]>::len);
    println!("queue={queue} workers={workers} retry kinds={retry_on}");

    // tuples and lists are distinct kinds
    if let Some(listen) = map.get_str("listen") {
        println!("listen is a {}\n", listen.kind_name());
    }

    // A typed struct becomes a tagged dict
    let user = User {
        id: 41,
        name: "Mara".to_string(),
        roles: vec!["operator".to_string()],
    };

    let tagged = to_value(&user)?;
    println!("User as Value: {}\n", tagged);
    println!("Class name: {:?}", tagged.class_name());

    println!("Type checks:");
    println!("  is_map:  {}", tagged.is_map());
    println!("  is_list: {}", tagged.is_list());
    println!("  is_str:  {}", tagged.is_str());

    // Parse dynamically, then narrow to a concrete type
    let parsed = read_str("{'id': 7, 'name': 'Eve', 'roles': ['auditor'], 'extra': {1, 2}}")?;
    println!("\nParsed kind: {}", parsed.kind_name());
    let eve: User = from_value(parsed)?;
    println!("Narrowed: {:?}", eve);

    Ok(())
}
