//! Configuration options for writing and reading serpent text.
//!
//! This module provides:
//!
//! - [`SerpentOptions`]: writer configuration (layout, set literals, class names, bytes)
//! - [`BytesMode`]: how byte payloads are written
//! - [`ReadOptions`]: the reader's grammar profile and NaN policy
//!
//! ## Examples
//!
//! ```rust
//! use serde_serpent::{to_string_with_options, BytesMode, SerpentOptions};
//!
//! // Python 2.6 compatible output: sets are written as tuples
//! let options = SerpentOptions::new().with_set_literals(false);
//! let text = to_string_with_options(&(1, 2), options).unwrap();
//! assert!(text.starts_with("# serpent utf-8 python2.6\n"));
//!
//! // Raw byte literals instead of base64 mappings
//! let options = SerpentOptions::new().with_bytes_mode(BytesMode::Literal);
//! ```

use crate::Registry;
use std::sync::OnceLock;

const DEFAULT_STACK_BYTES: usize = 2 * 1024 * 1024;
const STACK_BYTES_PER_LEVEL: usize = 8 * 1024;
const MIN_DEPTH: usize = 64;
const MAX_DEPTH: usize = 1000;

/// Returns the default nesting ceiling for writer and reader.
///
/// Derived from the thread stack budget (`RUST_MIN_STACK` when set, else the
/// 2 MiB default for spawned threads) divided by a per-level frame estimate,
/// clamped to `64..=1000`. Computed once per process.
///
/// # Examples
///
/// ```rust
/// let depth = serde_serpent::default_max_depth();
/// assert!((64..=1000).contains(&depth));
/// ```
#[must_use]
pub fn default_max_depth() -> usize {
    static DEPTH: OnceLock<usize> = OnceLock::new();
    *DEPTH.get_or_init(|| {
        let stack = std::env::var("RUST_MIN_STACK")
            .ok()
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_STACK_BYTES);
        (stack / STACK_BYTES_PER_LEVEL).clamp(MIN_DEPTH, MAX_DEPTH)
    })
}

/// How byte payloads are written.
///
/// # Examples
///
/// ```rust
/// use serde_serpent::{to_string_with_options, BytesMode, SerpentOptions};
/// use serde_serpent::Value;
///
/// let data = Value::bytes(b"abc".to_vec());
/// let b64 = to_string_with_options(&data, SerpentOptions::new()).unwrap();
/// assert!(b64.ends_with("{'data':'YWJj','encoding':'base64'}"));
///
/// let raw = SerpentOptions::new().with_bytes_mode(BytesMode::Literal);
/// assert!(to_string_with_options(&data, raw).unwrap().ends_with("b'abc'"));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BytesMode {
    /// `{'data': <base64>, 'encoding': 'base64'}`; readable by any literal reader.
    #[default]
    Base64,
    /// A `b'...'` byte literal; more compact, needs a reader with byte literals.
    Literal,
}

/// Configuration options for serpent serialization.
///
/// # Examples
///
/// ```rust
/// use serde_serpent::SerpentOptions;
///
/// // Default compact options
/// let options = SerpentOptions::new();
/// assert!(!options.indent);
/// assert!(options.set_literals);
///
/// // One element per line, sorted dict keys and set elements
/// let options = SerpentOptions::pretty();
/// assert!(options.indent);
///
/// // Custom configuration
/// let options = SerpentOptions::new()
///     .with_module_in_classname(true)
///     .with_max_depth(32);
/// ```
#[derive(Clone, Debug)]
pub struct SerpentOptions {
    /// Two-space indented layout with canonical ordering.
    pub indent: bool,
    /// Emit `{a,b}` set literals (header `python3.2`); otherwise sets become tuples.
    pub set_literals: bool,
    /// Keep the namespace prefix of class names (`std.io.Error` instead of `Error`).
    ///
    /// Only names that carry a path are affected: [`ObjectState`] class
    /// names, [`Exception`] classes and `collections.OrderedDict`. Derived
    /// structs and enums always use their bare serde name, since serde never
    /// reports a module path for them.
    ///
    /// [`ObjectState`]: crate::ObjectState
    /// [`Exception`]: crate::Exception
    pub module_in_classname: bool,
    pub bytes: BytesMode,
    /// Deepest element level written before failing with `NestingTooDeep`.
    pub max_depth: usize,
    /// Registry to dispatch with; `None` snapshots the global registry.
    pub registry: Option<Registry>,
}

impl Default for SerpentOptions {
    fn default() -> Self {
        SerpentOptions {
            indent: false,
            set_literals: true,
            module_in_classname: false,
            bytes: BytesMode::default(),
            max_depth: default_max_depth(),
            registry: None,
        }
    }
}

impl SerpentOptions {
    /// Creates default options (compact layout, set literals, base64 bytes).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options for indented output.
    #[must_use]
    pub fn pretty() -> Self {
        SerpentOptions {
            indent: true,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_indent(mut self, indent: bool) -> Self {
        self.indent = indent;
        self
    }

    /// Enables or disables set literals.
    ///
    /// Disabling them targets readers without set-literal support: the header
    /// declares `python2.6` and sets are written as tuples.
    #[must_use]
    pub fn with_set_literals(mut self, set_literals: bool) -> Self {
        self.set_literals = set_literals;
        self
    }

    /// See [`SerpentOptions::module_in_classname`] for which names this affects.
    #[must_use]
    pub fn with_module_in_classname(mut self, qualify: bool) -> Self {
        self.module_in_classname = qualify;
        self
    }

    #[must_use]
    pub fn with_bytes_mode(mut self, bytes: BytesMode) -> Self {
        self.bytes = bytes;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Dispatches with `registry` instead of the process-wide one.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_serpent::{to_string_with_options, Registry, SerpentOptions};
    ///
    /// // An empty registry turns off the built-in enum ordinal handler
    /// let options = SerpentOptions::new().with_registry(Registry::empty());
    /// ```
    #[must_use]
    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// The header line this configuration writes, including the newline.
    #[must_use]
    pub fn header(&self) -> &'static str {
        if self.set_literals {
            crate::grammar::HEADER_PY32
        } else {
            crate::grammar::HEADER_PY26
        }
    }
}

/// The reader's grammar profile.
///
/// # Examples
///
/// ```rust
/// use serde_serpent::{read_with_options, ReadOptions, Value};
///
/// let nan = b"{'__class__':'float','value':'nan'}";
///
/// let folded = read_with_options(nan, &ReadOptions::new()).unwrap();
/// assert!(folded.as_f64().map_or(false, f64::is_nan));
///
/// let raw = read_with_options(nan, &ReadOptions::new().with_fold_nan(false)).unwrap();
/// assert_eq!(raw.class_name(), Some("float"));
/// ```
#[derive(Clone, Debug)]
pub struct ReadOptions {
    /// Accept `{a,b}` set literals and the `python3.2` header.
    pub set_literals: bool,
    /// Fold the NaN mapping back to a float, and the complex mapping back to a complex.
    pub fold_nan: bool,
    pub max_depth: usize,
}

impl Default for ReadOptions {
    fn default() -> Self {
        ReadOptions {
            set_literals: true,
            fold_nan: true,
            max_depth: default_max_depth(),
        }
    }
}

impl ReadOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_set_literals(mut self, set_literals: bool) -> Self {
        self.set_literals = set_literals;
        self
    }

    #[must_use]
    pub fn with_fold_nan(mut self, fold_nan: bool) -> Self {
        self.fold_nan = fold_nan;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
