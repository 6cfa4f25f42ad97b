//! Dynamic value representation for decoded TOML documents.
//!
//! This module provides the [`Value`] enum, the final output of the decoding
//! pipeline. It represents any value a TOML document can contain: scalars,
//! the four temporal kinds, arrays, and (ordered) tables.
//!
//! ## Usage Patterns
//!
//! ### Decoding and inspecting
//!
//! ```rust
//! use toml_decode::{decode, Value};
//!
//! let value = decode("answer = 42").unwrap();
//! let table = value.as_table().unwrap();
//! assert_eq!(table.get("answer").and_then(Value::as_integer), Some(42));
//! ```
//!
//! ### Building values programmatically
//!
//! ```rust
//! use toml_decode::{toml_value, Value};
//!
//! let value = toml_value!({
//!     "name" = "Alice",
//!     "port" = 8080,
//!     "tags" = ["admin", "ops"]
//! });
//! assert!(value.is_table());
//! ```

use crate::datetime::{LocalDate, LocalDateTime, LocalTime};
use crate::TomlMap;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A dynamically-typed TOML value.
///
/// Temporal values are their own variants rather than strings or tables, so
/// code that walks a decoded document can match on them directly — and the
/// normalizer's "is this a plain table" checks exclude them structurally.
///
/// # Examples
///
/// ```rust
/// use toml_decode::Value;
///
/// let num = Value::Integer(42);
/// let text = Value::String("hello".to_string());
///
/// assert!(num.is_integer());
/// assert!(text.is_string());
/// assert_eq!(num.as_integer(), Some(42));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    OffsetDateTime(DateTime<FixedOffset>),
    LocalDateTime(LocalDateTime),
    LocalDate(LocalDate),
    LocalTime(LocalTime),
    Array(Vec<Value>),
    Table(TomlMap),
}

impl Value {
    /// Returns `true` if the value is a string.
    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Returns `true` if the value is an integer.
    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Value::Integer(_))
    }

    /// Returns `true` if the value is a float.
    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    /// Returns `true` if the value is a boolean.
    #[inline]
    #[must_use]
    pub const fn is_boolean(&self) -> bool {
        matches!(self, Value::Boolean(_))
    }

    /// Returns `true` if the value is any of the four temporal kinds.
    #[inline]
    #[must_use]
    pub const fn is_temporal(&self) -> bool {
        matches!(
            self,
            Value::OffsetDateTime(_)
                | Value::LocalDateTime(_)
                | Value::LocalDate(_)
                | Value::LocalTime(_)
        )
    }

    /// Returns `true` if the value is an array.
    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Returns `true` if the value is a table.
    #[inline]
    #[must_use]
    pub const fn is_table(&self) -> bool {
        matches!(self, Value::Table(_))
    }

    /// If the value is a string, returns it as `&str`. Otherwise returns
    /// `None`.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// If the value is an integer, returns it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// If the value is a float, returns it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// If the value is a boolean, returns it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// If the value is an offset date-time, returns a reference to it.
    /// Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_offset_date_time(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            Value::OffsetDateTime(dt) => Some(dt),
            _ => None,
        }
    }

    /// If the value is a local date-time, returns it. Otherwise returns
    /// `None`.
    #[inline]
    #[must_use]
    pub fn as_local_date_time(&self) -> Option<&LocalDateTime> {
        match self {
            Value::LocalDateTime(dt) => Some(dt),
            _ => None,
        }
    }

    /// If the value is a local date, returns it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_local_date(&self) -> Option<&LocalDate> {
        match self {
            Value::LocalDate(date) => Some(date),
            _ => None,
        }
    }

    /// If the value is a local time, returns it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_local_time(&self) -> Option<&LocalTime> {
        match self {
            Value::LocalTime(time) => Some(time),
            _ => None,
        }
    }

    /// If the value is an array, returns a reference to it. Otherwise
    /// returns `None`.
    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(array) => Some(array),
            _ => None,
        }
    }

    /// If the value is a table, returns a reference to it. Otherwise
    /// returns `None`.
    #[inline]
    #[must_use]
    pub fn as_table(&self) -> Option<&TomlMap> {
        match self {
            Value::Table(table) => Some(table),
            _ => None,
        }
    }

    /// Looks up a key in a table value. Returns `None` for non-tables and
    /// missing keys.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use toml_decode::decode;
    ///
    /// let value = decode("[server]\nport = 8080").unwrap();
    /// let port = value.get("server").and_then(|s| s.get("port"));
    /// assert_eq!(port.and_then(|p| p.as_integer()), Some(8080));
    /// ```
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_table().and_then(|table| table.get(key))
    }
}

fn write_escaped(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    write!(f, "\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

impl fmt::Display for Value {
    /// Diagnostic rendering in inline-table style. This is not an encoder;
    /// round-tripping the output is not a goal.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write_escaped(f, s),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::OffsetDateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            Value::LocalDateTime(dt) => write!(f, "{}", dt),
            Value::LocalDate(date) => write!(f, "{}", date),
            Value::LocalTime(time) => write!(f, "{}", time),
            Value::Array(array) => {
                write!(f, "[")?;
                for (i, value) in array.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                write!(f, "]")
            }
            Value::Table(table) => {
                write!(f, "{{ ")?;
                for (i, (key, value)) in table.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} = {}", key, value)?;
                }
                write!(f, " }}")
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::String(s) => serializer.serialize_str(s),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::OffsetDateTime(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            Value::LocalDateTime(dt) => serializer.serialize_str(&dt.to_string()),
            Value::LocalDate(date) => serializer.serialize_str(&date.to_string()),
            Value::LocalTime(time) => serializer.serialize_str(&time.to_string()),
            Value::Array(array) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(array.len()))?;
                for element in array {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            Value::Table(table) => {
                use serde::ser::SerializeMap;
                let mut map = serializer.serialize_map(Some(table.len()))?;
                for (k, v) in table.iter() {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any valid TOML value")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(Value::Boolean(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                Ok(Value::Integer(value))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E> {
                if value <= i64::MAX as u64 {
                    Ok(Value::Integer(value as i64))
                } else {
                    Ok(Value::Float(value as f64))
                }
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
                Ok(Value::Float(value))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(Value::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(Value::String(value))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Err(de::Error::custom("TOML has no null value"))
            }

            fn visit_none<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Err(de::Error::custom("TOML has no null value"))
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut array = Vec::new();
                while let Some(element) = seq.next_element()? {
                    array.push(element);
                }
                Ok(Value::Array(array))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut table = TomlMap::new();
                while let Some((key, value)) = map.next_entry()? {
                    table.insert(key, value);
                }
                Ok(Value::Table(table))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

// TryFrom implementations for extracting scalars from Value
impl TryFrom<Value> for i64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Integer(i) => Ok(i),
            _ => Err(crate::Error::custom(format!(
                "expected integer, found {:?}",
                value
            ))),
        }
    }
}

impl TryFrom<Value> for f64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Float(f) => Ok(f),
            Value::Integer(i) => Ok(i as f64),
            _ => Err(crate::Error::custom(format!(
                "expected number, found {:?}",
                value
            ))),
        }
    }
}

impl TryFrom<Value> for bool {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Boolean(b) => Ok(b),
            _ => Err(crate::Error::custom(format!(
                "expected boolean, found {:?}",
                value
            ))),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::String(s) => Ok(s),
            _ => Err(crate::Error::custom(format!(
                "expected string, found {:?}",
                value
            ))),
        }
    }
}

// From implementations for creating Value from primitives
impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<i8> for Value {
    fn from(value: i8) -> Self {
        Value::Integer(value as i64)
    }
}

impl From<i16> for Value {
    fn from(value: i16) -> Self {
        Value::Integer(value as i64)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value as i64)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<u8> for Value {
    fn from(value: u8) -> Self {
        Value::Integer(value as i64)
    }
}

impl From<u16> for Value {
    fn from(value: u16) -> Self {
        Value::Integer(value as i64)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Integer(value as i64)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(value as f64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<TomlMap> for Value {
    fn from(value: TomlMap) -> Self {
        Value::Table(value)
    }
}

impl From<LocalDate> for Value {
    fn from(value: LocalDate) -> Self {
        Value::LocalDate(value)
    }
}

impl From<LocalTime> for Value {
    fn from(value: LocalTime) -> Self {
        Value::LocalTime(value)
    }
}

impl From<LocalDateTime> for Value {
    fn from(value: LocalDateTime) -> Self {
        Value::LocalDateTime(value)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Value::OffsetDateTime(value)
    }
}
