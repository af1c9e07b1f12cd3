//! Customizing serpent output with SerpentOptions and ReadOptions.
//!
//! Run with: cargo run --example custom_options

use serde::{Deserialize, Serialize};
use serde_serpent::{
    read_with_options, to_string, to_string_with_options, BytesMode, ReadOptions, Set,
    SerpentOptions, Value,
};
use std::collections::BTreeSet;
use std::error::Error;

#[derive(Debug, Serialize, Deserialize)]
struct Config {
    name: String,
    version: (u32, u32, u32),
    debug: bool,
}

#[derive(Debug, Serialize)]
struct Upload {
    filename: String,
    #[serde(serialize_with = "as_bytes")]
    payload: Vec<u8>,
    labels: Set<BTreeSet<String>>,
}

fn as_bytes<S: serde::Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_bytes(data)
}

mod app {
    #[derive(Debug, serde::Serialize)]
    pub struct Settings {
        pub retries: u8,
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let config = Config {
        name: "MyApp".to_string(),
        version: (1, 0, 0),
        debug: true,
    };

    // Default format: compact, set literals, base64 bytes
    println!("Default:");
    println!("{}\n", to_string(&config)?);

    // Indented output with sorted keys
    println!("Indented:");
    let indented = to_string_with_options(&config, SerpentOptions::pretty())?;
    println!("{}\n", indented);

    let upload = Upload {
        filename: "notes.txt".to_string(),
        payload: b"hello\x00world".to_vec(),
        labels: Set(["draft", "shared"].iter().map(|s| s.to_string()).collect()),
    };

    // Bytes as a base64 mapping or as a bytes literal
    println!("Base64 bytes:");
    println!("{}\n", to_string(&upload)?);
    println!("Literal bytes:");
    let literal = SerpentOptions::new().with_bytes_mode(BytesMode::Literal);
    println!("{}\n", to_string_with_options(&upload, literal)?);

    // Legacy profile: sets become tuples, header says python2.6
    println!("Legacy profile:");
    let legacy = SerpentOptions::new().with_set_literals(false);
    let legacy_text = to_string_with_options(&upload, legacy)?;
    println!("{}\n", legacy_text);
    let strict_reader = ReadOptions::new().with_set_literals(false);
    let value: Value = read_with_options(legacy_text.as_bytes(), &strict_reader)?;
    println!("Read back under the legacy profile: {}\n", value);

    // Module-qualified class names
    println!("Qualified class names:");
    let qualified = SerpentOptions::new().with_module_in_classname(true);
    println!("{}", to_string_with_options(&app::Settings { retries: 3 }, qualified)?);

    Ok(())
}
