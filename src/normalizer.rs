//! Tree-to-value normalization.
//!
//! [`normalize`] walks the syntax tree and produces the final nested
//! [`Value`]: dotted keys expand into nested tables, sibling definitions of
//! the same table path merge, repeated array-of-tables headers append, and
//! conflicting redefinitions are rejected.
//!
//! The merge rules are order-sensitive. For a key that already exists, the
//! cases are tried in this order:
//!
//! 1. both values are arrays → concatenate,
//! 2. both values are tables → merge recursively,
//! 3. existing is an array whose last element is a table, incoming is a
//!    table → merge into a copy of that last element,
//! 4. existing is anything else → duplicate-key decode error,
//!
//! and a key that does not exist yet is simply set. Temporal values are
//! distinct [`Value`] variants, so they can never be mistaken for tables in
//! cases 2 and 3.
//!
//! Every merge step builds an owned map; nothing aliases a map stored
//! elsewhere in the output, so extending one array-of-tables element can
//! never leak into another.

use crate::error::{Error, Result};
use crate::parser::Node;
use crate::{TomlMap, Value};

/// Normalizes a syntax tree into its final value, pure in the tree.
pub(crate) fn normalize(node: &Node) -> Result<Value> {
    match node {
        Node::RootTable { elements } | Node::InlineTable { elements } => {
            Ok(Value::Table(merge_elements(elements)?))
        }
        Node::Key { segments } => Ok(Value::Array(
            key_path(segments)?
                .into_iter()
                .map(Value::String)
                .collect(),
        )),
        Node::KeyValuePair { .. } | Node::Table { .. } | Node::ArrayTable { .. } => {
            Ok(Value::Table(entry(node)?))
        }
        Node::Array { elements } => Ok(Value::Array(
            elements.iter().map(normalize).collect::<Result<_>>()?,
        )),
        Node::Bare(s) | Node::String(s) => Ok(Value::String(s.clone())),
        Node::Integer(i) => Ok(Value::Integer(*i)),
        Node::Float(f) => Ok(Value::Float(*f)),
        Node::Boolean(b) => Ok(Value::Boolean(*b)),
        Node::OffsetDateTime(dt) => Ok(Value::OffsetDateTime(*dt)),
        Node::LocalDateTime(dt) => Ok(Value::LocalDateTime(*dt)),
        Node::LocalDate(date) => Ok(Value::LocalDate(*date)),
        Node::LocalTime(time) => Ok(Value::LocalTime(*time)),
    }
}

/// Normalizes one table-shaped element (a key-value pair or a header node)
/// into a partial mapping ready to be merged with its siblings.
fn entry(node: &Node) -> Result<TomlMap> {
    match node {
        Node::KeyValuePair { key, value } => {
            let path = key_segments(key)?;
            let value = normalize(value)?;
            Ok(objectify(&path, value))
        }
        Node::Table { key, elements } => {
            let path = key_segments(key)?;
            let body = merge_elements(elements)?;
            Ok(objectify(&path, Value::Table(body)))
        }
        Node::ArrayTable { key, elements } => {
            let path = key_segments(key)?;
            let body = merge_elements(elements)?;
            // A one-element array: each repetition of the header merges in
            // one more element via the sequence-concatenation rule.
            Ok(objectify(&path, Value::Array(vec![Value::Table(body)])))
        }
        other => Err(Error::decode(format!(
            "expected a table element, found {other:?}"
        ))),
    }
}

fn merge_elements(elements: &[Node]) -> Result<TomlMap> {
    let mut acc = TomlMap::new();
    for element in elements {
        merge_into(&mut acc, entry(element)?)?;
    }
    Ok(acc)
}

fn key_segments(key: &Node) -> Result<Vec<String>> {
    match key {
        Node::Key { segments } => key_path(segments),
        other => Err(Error::decode(format!("expected a key, found {other:?}"))),
    }
}

fn key_path(segments: &[Node]) -> Result<Vec<String>> {
    segments
        .iter()
        .map(|segment| match segment {
            Node::Bare(s) | Node::String(s) => Ok(s.clone()),
            other => Err(Error::decode(format!(
                "expected a key segment, found {other:?}"
            ))),
        })
        .collect()
}

/// Builds the nested singleton mapping `{k1: {k2: {... {kn: value}}}}` for
/// a key path, so that `merge` can detect collisions at any depth.
fn objectify(path: &[String], value: Value) -> TomlMap {
    let mut map = TomlMap::new();
    let Some((leaf, parents)) = path.split_last() else {
        return map;
    };
    map.insert(leaf.clone(), value);
    for segment in parents.iter().rev() {
        let mut outer = TomlMap::new();
        outer.insert(segment.clone(), Value::Table(map));
        map = outer;
    }
    map
}

/// Folds `incoming` into `acc` key by key, applying the ordered merge cases.
fn merge_into(acc: &mut TomlMap, incoming: TomlMap) -> Result<()> {
    for (key, next) in incoming {
        let merged = match acc.get(&key) {
            Some(existing) => merge_values(existing, next, &key)?,
            None => next,
        };
        acc.insert(key, merged);
    }
    Ok(())
}

fn merge_values(existing: &Value, next: Value, key: &str) -> Result<Value> {
    match (existing, next) {
        (Value::Array(existing), Value::Array(incoming)) => {
            let mut items = existing.clone();
            items.extend(incoming);
            Ok(Value::Array(items))
        }
        (Value::Table(existing), Value::Table(incoming)) => {
            let mut merged = existing.clone();
            merge_into(&mut merged, incoming)?;
            Ok(Value::Table(merged))
        }
        (Value::Array(existing), Value::Table(incoming)) => {
            // A dotted key or repeated standard header may extend the most
            // recently opened array-of-tables element; anything else is a
            // redefinition.
            let mut items = existing.clone();
            match items.pop() {
                Some(Value::Table(last)) => {
                    let mut merged = last;
                    merge_into(&mut merged, incoming)?;
                    items.push(Value::Table(merged));
                    Ok(Value::Array(items))
                }
                _ => Err(Error::decode(format!("cannot redefine key `{key}`"))),
            }
        }
        _ => Err(Error::decode(format!("cannot redefine key `{key}`"))),
    }
}
