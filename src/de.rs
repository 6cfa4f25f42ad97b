//! Serde deserialization from decoded values.
//!
//! [`from_str`](crate::from_str) decodes a document into a [`Value`] and
//! then drives a `Deserialize` implementation over it with the
//! [`serde::Deserializer`] defined here. Arrays and tables hand off to
//! serde's own [`SeqDeserializer`] and [`MapDeserializer`]; temporal values
//! surface as strings in their literal formats, so a `String` field (or a
//! chrono type with a string-based `Deserialize`) can receive them.
//!
//! ## Usage
//!
//! ```rust
//! use serde::Deserialize;
//! use toml_decode::from_str;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Server {
//!     host: String,
//!     port: u16,
//! }
//!
//! let server: Server = from_str("host = \"example.com\"\nport = 8080").unwrap();
//! assert_eq!(server.port, 8080);
//! ```

use crate::{Error, Value};
use serde::de::value::{MapAccessDeserializer, MapDeserializer, SeqDeserializer};
use serde::de::{self, IntoDeserializer, Visitor};
use serde::forward_to_deserialize_any;

impl<'de> IntoDeserializer<'de, Error> for Value {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self::Deserializer {
        self
    }
}

impl<'de> de::Deserializer<'de> for Value {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Error>
    where
        V: Visitor<'de>,
    {
        match self {
            Value::String(s) => visitor.visit_string(s),
            Value::Integer(i) => visitor.visit_i64(i),
            Value::Float(f) => visitor.visit_f64(f),
            Value::Boolean(b) => visitor.visit_bool(b),
            Value::OffsetDateTime(dt) => visitor.visit_string(dt.to_rfc3339()),
            Value::LocalDateTime(dt) => visitor.visit_string(dt.to_string()),
            Value::LocalDate(date) => visitor.visit_string(date.to_string()),
            Value::LocalTime(time) => visitor.visit_string(time.to_string()),
            Value::Array(array) => visitor.visit_seq(SeqDeserializer::new(array.into_iter())),
            Value::Table(table) => visitor.visit_map(MapDeserializer::new(table.into_iter())),
        }
    }

    /// TOML has no null; a present value is always `Some`.
    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    /// Unit variants decode from strings, data-carrying variants from a
    /// single-entry table `{ Variant = payload }`.
    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Error>
    where
        V: Visitor<'de>,
    {
        match self {
            Value::String(s) => visitor.visit_enum(s.into_deserializer()),
            Value::Table(table) if table.len() == 1 => {
                visitor.visit_enum(MapAccessDeserializer::new(MapDeserializer::new(
                    table.into_iter(),
                )))
            }
            other => Err(de::Error::custom(format!(
                "expected enum variant, found {other:?}"
            ))),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple tuple_struct map struct
        identifier ignored_any
    }
}
