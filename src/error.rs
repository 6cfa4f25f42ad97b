//! Error types for TOML decoding.
//!
//! Decoding is all-or-nothing: the first lexical, grammatical, or semantic
//! violation (merge conflict, out-of-range temporal component) aborts the
//! decode with an [`Error`]. There is no recovery or best-effort mode, and no
//! partial value is ever returned.
//!
//! The decoder itself attaches no file or position context; callers that read
//! configuration from disk are expected to wrap the error with whatever
//! source information they have.
//!
//! ## Examples
//!
//! ```rust
//! use toml_decode::decode;
//!
//! let result = decode("key = ");
//! assert!(result.is_err());
//!
//! if let Err(err) = result {
//!     eprintln!("decode failed: {}", err);
//! }
//! ```

use std::fmt;
use thiserror::Error;

/// All errors this crate can produce.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Malformed TOML input: a lexical, grammatical, or semantic rule was
    /// violated somewhere in the scan → parse → normalize pipeline.
    #[error("TOML decode error: {0}")]
    Decode(String),

    /// Error raised by a `Deserialize` implementation while mapping a
    /// decoded [`Value`](crate::Value) onto a Rust type.
    #[error("{0}")]
    Custom(String),
}

impl Error {
    /// Creates a decode error with a message describing the offending
    /// lexeme or rule.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use toml_decode::Error;
    ///
    /// let err = Error::decode("unterminated string");
    /// assert!(err.to_string().contains("unterminated string"));
    /// ```
    pub fn decode(msg: impl Into<String>) -> Self {
        Error::Decode(msg.into())
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
