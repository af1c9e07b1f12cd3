//! Error types for serpent serialization and parsing.
//!
//! Every failure is terminal for the operation in progress: no partial output
//! is ever returned, and nothing is retried internally.
//!
//! ## Error Categories
//!
//! - **Writer errors**: [`Error::UnsupportedType`], [`Error::NonHashableKey`],
//!   [`Error::CircularReference`] and [`Error::NestingTooDeep`]
//! - **Reader errors**: [`Error::GrammarViolation`] for anything that is not a
//!   pure literal, [`Error::Malformed`] and [`Error::UnexpectedEof`] for broken
//!   literals, plus the pre-parse guards [`Error::EmbeddedNul`],
//!   [`Error::InvalidEncoding`] and [`Error::IncompatibleCapability`]
//! - **Byte data**: [`Error::ByteDecode`] and [`Error::NotBytes`]
//!
//! ## Examples
//!
//! ```rust
//! use serde_serpent::{read_str, Error};
//!
//! let result = read_str("__import__('os')");
//! assert!(matches!(result, Err(Error::GrammarViolation { .. })));
//!
//! if let Err(err) = result {
//!     eprintln!("Parse error: {}", err);
//!     // Reader errors carry the line, the column and the offending source line
//! }
//! ```

use std::fmt;
use thiserror::Error;

/// Prefix used by [`crate::ObjectState`] implementations to report a missing
/// state mapping through a foreign `serde::ser::Error`.
pub(crate) const UNSUPPORTED_MARKER: &str = "$serde_serpent::unsupported:";

/// Represents all possible errors that can occur while writing or reading serpent text.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// A value has no registered handler and no state mapping
    #[error("Unsupported type: don't know how to serialize {0}")]
    UnsupportedType(String),

    /// A dict key or set element outside the hashable allowlist
    #[error("Non-hashable key: one of the keys in a dict or set is not of a primitive hashable type: {0}")]
    NonHashableKey(String),

    /// A shared value was reached again while it was still being written
    #[error("Circular reference detected ({kind})")]
    CircularReference { kind: String },

    /// The object graph is nested deeper than the configured ceiling
    #[error("Object graph nesting too deep (limit {limit}); raise max_depth if you need more")]
    NestingTooDeep { limit: usize },

    /// The reader met a construct that is not a pure literal
    #[error("Grammar violation at line {line}, column {col}:\n{context}\n{msg}")]
    GrammarViolation {
        line: usize,
        col: usize,
        msg: String,
        context: String,
    },

    /// A literal is recognisable but broken (bad escape, bad number, missing bracket)
    #[error("Malformed literal at line {line}, column {col}:\n{context}\n{msg}")]
    Malformed {
        line: usize,
        col: usize,
        msg: String,
        context: String,
    },

    /// Unexpected end of input
    #[error("Unexpected end of input at line {line}, column {col}\nExpected: {expected}")]
    UnexpectedEof {
        line: usize,
        col: usize,
        expected: String,
    },

    /// The input contains a literal NUL byte
    #[error("The serpent data contains 0-bytes at offset {offset}; has it been corrupted?")]
    EmbeddedNul { offset: usize },

    /// The header declares grammar the reader's profile does not allow
    #[error("Incompatible capability: data declares '{declared}', reader supports '{supported}'")]
    IncompatibleCapability { declared: String, supported: String },

    /// The input is not valid UTF-8
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    /// A base64 byte mapping has the right shape but undecodable data
    #[error("Byte decode error: {0}")]
    ByteDecode(String),

    /// A value is neither bytes nor a base64 byte mapping
    #[error("Not bytes: argument is neither bytes nor a serpent base64 encoded bytes dict (found {0})")]
    NotBytes(String),

    /// Type mismatch while deserializing into a concrete Rust type
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a grammar violation with the offending source line as context.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_serpent::Error;
    ///
    /// let err = Error::grammar(1, 3, "names are not allowed", "__import__('os')");
    /// assert!(err.to_string().contains("line 1"));
    /// ```
    pub fn grammar(line: usize, col: usize, msg: &str, context: &str) -> Self {
        Error::GrammarViolation {
            line,
            col,
            msg: msg.to_string(),
            context: context.to_string(),
        }
    }

    /// Creates a malformed-literal error with the offending source line as context.
    pub fn malformed(line: usize, col: usize, msg: &str, context: &str) -> Self {
        Error::Malformed {
            line,
            col,
            msg: msg.to_string(),
            context: context.to_string(),
        }
    }

    /// Creates an unexpected end-of-input error.
    pub fn unexpected_eof(line: usize, col: usize, expected: &str) -> Self {
        Error::UnexpectedEof {
            line,
            col,
            expected: expected.to_string(),
        }
    }

    /// Creates a type mismatch error for deserialization into concrete types.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_serpent::Error;
    ///
    /// let err = Error::type_mismatch("integer", "str");
    /// assert!(err.to_string().contains("expected integer"));
    /// ```
    pub fn type_mismatch(expected: &str, found: &str) -> Self {
        Error::TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Creates an unsupported type error.
    pub fn unsupported_type(what: &str) -> Self {
        Error::UnsupportedType(what.to_string())
    }

    /// Creates a non-hashable key error naming the offending kind.
    pub fn non_hashable(kind: &str) -> Self {
        Error::NonHashableKey(kind.to_string())
    }

    /// Creates a circular reference error naming the container kind.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_serpent::Error;
    ///
    /// let err = Error::circular("list");
    /// assert_eq!(err.to_string(), "Circular reference detected (list)");
    /// ```
    pub fn circular(kind: &str) -> Self {
        Error::CircularReference {
            kind: kind.to_string(),
        }
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        let msg = msg.to_string();
        match msg.strip_prefix(UNSUPPORTED_MARKER) {
            Some(what) => Error::UnsupportedType(what.to_string()),
            None => Error::Custom(msg),
        }
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    fn invalid_type(unexp: serde::de::Unexpected<'_>, exp: &dyn serde::de::Expected) -> Self {
        Error::type_mismatch(&exp.to_string(), &unexp.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
