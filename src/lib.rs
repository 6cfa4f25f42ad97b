//! # toml_decode
//!
//! A decoder for TOML configuration text, producing an ordered dynamic
//! value tree — with Serde support for decoding straight into your own
//! types.
//!
//! ## Pipeline
//!
//! Decoding runs in three synchronous stages:
//!
//! 1. **Tokenize** — a CRLF-normalizing character cursor feeds sub-scanners
//!    for bare keys, whitespace, comments, and the four string styles
//!    (literal/basic × single-line/multiline), producing one token at a
//!    time with single-token lookahead.
//! 2. **Parse** — a recursive-descent parser builds a syntax tree mirroring
//!    the grammar: key-value pairs, `[table]` and `[[array-of-tables]]`
//!    headers, inline tables, arrays, and typed scalar leaves.
//! 3. **Normalize** — the tree collapses into one nested [`Value`]:
//!    dotted keys expand, repeated table paths merge, array-of-tables
//!    headers append, and conflicting redefinitions abort the decode.
//!
//! The whole pipeline is pure and call-local: no I/O, no shared state, and
//! any rule violation fails the entire decode with a typed [`Error`] — no
//! partial results.
//!
//! ## Value syntax
//!
//! | Kind | Literal forms |
//! |------|---------------|
//! | String | `"basic"`, `'literal'`, `"""multiline"""`, `'''multiline'''` |
//! | Integer | `42`, `-17`, `+99`, `1_000`, `0xDEADBEEF`, `0o755`, `0b1101` |
//! | Float | `3.14`, `-0.01`, `5e+22`, `6.626e-34`, `inf`, `-inf`, `nan` |
//! | Boolean | `true`, `false` |
//! | Offset date-time | `1979-05-27T00:32:00-07:00`, `1979-05-27T07:32:00Z` |
//! | Local date-time | `1979-05-27T07:32:00`, `1979-05-27 07:32:00.999` |
//! | Local date | `1979-05-27` |
//! | Local time | `07:32:00`, `07:32:00.123` |
//! | Array | `[ 1, 2, 3, ]` (newlines and comments allowed inside) |
//! | Inline table | `{ key = "value", dotted.key = 1 }` |
//!
//! Keys are bare (`[A-Za-z0-9_-]+`) or quoted strings, optionally dotted:
//! `a.b."c d" = 1` defines a value three tables deep.
//!
//! ## Quick Start
//!
//! ```rust
//! use serde::Deserialize;
//! use toml_decode::from_str;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Config {
//!     title: String,
//!     owner: Owner,
//!     ports: Vec<u16>,
//! }
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Owner {
//!     name: String,
//! }
//!
//! let config: Config = from_str(
//!     r#"
//!     title = "example"
//!     ports = [8000, 8001]
//!
//!     [owner]
//!     name = "Alice"
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.title, "example");
//! assert_eq!(config.owner.name, "Alice");
//! ```
//!
//! ### Dynamic decoding
//!
//! When the shape of the document isn't known at compile time, decode to a
//! [`Value`] and inspect it:
//!
//! ```rust
//! use toml_decode::decode;
//!
//! let value = decode("a.b.c = 1\na.b.d = 2").unwrap();
//! let b = value.get("a").and_then(|a| a.get("b")).unwrap();
//! assert_eq!(b.get("c").and_then(|c| c.as_integer()), Some(1));
//! assert_eq!(b.get("d").and_then(|d| d.as_integer()), Some(2));
//! ```
//!
//! ## Scope
//!
//! This crate decodes. It does not encode values back to TOML text, read
//! files, or format errors with source snippets — callers own file I/O and
//! error presentation, and receive a typed [`Error`] to render.

pub mod datetime;
pub mod de;
pub mod error;
pub mod macros;
pub mod map;
pub mod value;

mod normalizer;
mod parser;
mod tokenizer;

pub use datetime::{LocalDate, LocalDateTime, LocalTime};
pub use error::{Error, Result};
pub use map::TomlMap;
pub use value::Value;

use serde::de::DeserializeOwned;
use std::io;

/// Decodes a TOML document into a [`Value`] tree.
///
/// This is the whole pipeline: tokenize, parse, normalize. The result is
/// either the document's root table or the first decode error encountered.
///
/// # Examples
///
/// ```rust
/// use toml_decode::decode;
///
/// let value = decode("answer = 42").unwrap();
/// assert_eq!(value.get("answer").and_then(|v| v.as_integer()), Some(42));
/// ```
///
/// # Errors
///
/// Returns an error for any lexical, grammatical, or semantic violation:
/// malformed literals, broken syntax, duplicate keys, conflicting table
/// redefinitions, or out-of-range temporal components.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode(input: &str) -> Result<Value> {
    let node = parser::Parser::new(input).parse()?;
    normalizer::normalize(&node)
}

/// Deserializes an instance of type `T` from a string of TOML text.
///
/// # Examples
///
/// ```rust
/// use serde::Deserialize;
/// use toml_decode::from_str;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i64, y: i64 }
///
/// let point: Point = from_str("x = 1\ny = 2").unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns an error if the input is not valid TOML or if the decoded value
/// does not fit type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    T::deserialize(decode(s)?)
}

/// Deserializes an instance of type `T` from UTF-8 bytes of TOML text.
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8, not valid TOML, or
/// cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(v: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    let s = std::str::from_utf8(v)
        .map_err(|e| Error::decode(format!("input is not valid UTF-8: {e}")))?;
    from_str(s)
}

/// Deserializes an instance of type `T` from an I/O stream of TOML text.
///
/// The reader is drained to a string first; TOML documents are small and
/// the tokenizer wants random access for lookahead.
///
/// # Errors
///
/// Returns an error if reading fails, the input is not valid TOML, or the
/// data cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(mut reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let mut string = String::new();
    reader
        .read_to_string(&mut string)
        .map_err(|e| Error::custom(e.to_string()))?;
    from_str(&string)
}
