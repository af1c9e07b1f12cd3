//! The serpent text grammar, as written and read by this library.
//!
//! # Overview
//!
//! Serpent text is a single Python literal expression, readable by Python's
//! `ast.literal_eval`. It carries only constants and literal containers, so a
//! reader never needs to evaluate code. An optional first line declares the
//! grammar features the writer used:
//!
//! ```text
//! # serpent utf-8 python3.2
//! {'name':'Alice','tags':{'admin','ops'},'ratio':0.25}
//! ```
//!
//! # Header
//!
//! | Tag | Meaning |
//! |-----|---------|
//! | `python3.2` | set literals `{a,b}` may appear |
//! | `python2.6` | no set literals; sets were written as tuples |
//!
//! Other `pythonX.Y` tags declare set literals from version 3.2 on. Tags
//! from other writers (`.net`, `dotnet-cli4.0`, ...) declare nothing, and the
//! reader's own profile decides. The header is a comment, so text without it
//! is still valid. A reader that does not allow set literals rejects data
//! declaring them up front instead of failing half way through.
//!
//! # Constants
//!
//! | Kind | Written as | Notes |
//! |------|-----------|-------|
//! | None | `None` | also `()` for unit values read back as None |
//! | bool | `True`, `False` | |
//! | int | `42`, `-7`, `123456789012345678901234567890` | arbitrary precision |
//! | float | `16.5`, `1e-07`, `-0.0` | shortest round-trip digits |
//! | infinity | `1e30000`, `-1e30000` | overflows to ±inf on read |
//! | NaN | `{'__class__':'float','value':'nan'}` | no literal form exists |
//! | complex | `(2.0+3.0j)`, `(1e30000-4.0j)` | NaN parts use `{'__class__':'complex',...}` |
//! | str | `'abc'`, `"it's"`, `'both \' and "'` | ASCII only, see below |
//! | bytes | `{'data':'YWJj','encoding':'base64'}` or `b'abc'` | see [`crate::BytesMode`] |
//!
//! # Strings
//!
//! Single quotes are preferred. A string containing `'` but no `"` is written
//! in double quotes; one containing both keeps single quotes and escapes `'`.
//! Backslash, tab, newline and carriage return use short escapes; anything
//! else outside printable ASCII becomes `\xHH`, `\uHHHH` or `\UHHHHHHHH`.
//! Written text therefore never contains a NUL byte or a raw control
//! character, and is plain ASCII apart from the header.
//!
//! # Containers
//!
//! | Kind | Compact | Empty |
//! |------|---------|-------|
//! | list | `[1,2,3]` | `[]` |
//! | tuple | `(1,2,3)`, `(1,)` | `()` |
//! | set | `{1,2,3}` | `()` |
//! | dict | `{'a':1,'b':2}` | `{}` |
//!
//! Indented output puts one element per line, two spaces deeper per level,
//! with `": "` between key and value. Dict keys and set elements are sorted
//! when they are mutually comparable (numbers, strings, bytes, or tuples of
//! those), otherwise insertion order is kept. A one-element tuple keeps its
//! trailing comma:
//!
//! ```text
//! {
//!   1: 'one',
//!   2: (
//!     'two',
//!   )
//! }
//! ```
//!
//! Dict keys and set elements must be hashable: bool, int, float, complex,
//! str, or tuples of those.
//!
//! # Objects
//!
//! Anything that is not a builtin shape is written as a *tagged object*, a
//! dict whose first key is `__class__`:
//!
//! ```text
//! {'__class__':'Point','x':1,'y':2}
//! {'__class__':'ZeroDivisionError','__exception__':True,'args':('division by zero',),'attributes':{}}
//! {'__class__':'OrderedDict','items':[('b',2),('a',1)]}
//! ```
//!
//! Enum values are written as their ordinal; durations as float seconds;
//! timestamps, dates, times, UUIDs and decimals as strings.
//!
//! # What the reader accepts
//!
//! Everything above, plus the literal forms people write by hand:
//!
//! - `#` comments anywhere outside strings
//! - triple-quoted strings, `r`/`u`/`b`/`rb` prefixes, adjacent literal concatenation
//! - the escapes `\a \b \f \v \ooo` and backslash-newline
//! - `0x`, `0o`, `0b` integers and `_` digit separators
//! - imaginary literals (`2j`) and `real+imagj` sums, with or without parentheses
//! - one unary `+` or `-` on a number
//! - trailing commas, and parentheses around a single value
//!
//! Names, calls, attribute access, subscripts and arithmetic are grammar
//! violations.

/// Header line written when set literals are enabled.
pub const HEADER_PY32: &str = "# serpent utf-8 python3.2\n";

/// Header line written when set literals are disabled.
pub const HEADER_PY26: &str = "# serpent utf-8 python2.6\n";

pub(crate) const HEADER_PREFIX: &str = "# serpent utf-8 ";
pub(crate) const TAG_PY32: &str = "python3.2";
pub(crate) const TAG_PY26: &str = "python2.6";

/// Whether a header tag declares set literals.
///
/// `None` means the tag says nothing about them.
pub(crate) fn tag_declares_sets(tag: &str) -> Option<bool> {
    let version = tag.strip_prefix("python")?;
    let mut parts = version.split('.').map(str::parse::<u32>);
    let major = parts.next()?.ok()?;
    let minor = match parts.next() {
        Some(minor) => minor.ok()?,
        None => 0,
    };
    Some((major, minor) >= (3, 2))
}
