//! Basic serpent serialization and deserialization.
//!
//! Run with: cargo run --example simple

use serde::{Deserialize, Serialize};
use serde_serpent::{from_str, read_str, to_string};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct User {
    id: u32,
    name: String,
    email: String,
    nickname: Option<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let users = vec![
        User {
            id: 42,
            name: "Alice Johnson".to_string(),
            email: "alice@example.com".to_string(),
            nickname: Some("Al".to_string()),
        },
        User {
            id: 43,
            name: "Bob Smith".to_string(),
            email: "bob@example.com".to_string(),
            nickname: None,
        },
    ];

    // Serialize to serpent
    let text = to_string(&users)?;
    println!("serpent output:\n{}\n", text);

    // Deserialize back to struct
    let users_back: Vec<User> = from_str(&text)?;
    assert_eq!(users, users_back);
    println!("✓ Round-trip successful");

    // Untrusted input is parsed, never evaluated
    match read_str("__import__('os').system('echo pwned')") {
        Ok(value) => println!("unexpectedly accepted: {}", value),
        Err(err) => println!("✓ Rejected code:\n{}", err),
    }

    Ok(())
}
