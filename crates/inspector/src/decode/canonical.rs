// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Conversion of decoded values into plain serializable data.

use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;

use super::value::{DecodedValue, Primitive};
use crate::cell::{Cell, serialize_boc};
use crate::types::Integer;
use crate::utils::hex_with_prefix;

/// Canonical output: strings, safe-range integers, booleans, null, arrays and
/// insertion-ordered objects.
pub type CanonicalValue = Value;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CanonicalizeError {
    #[error("Composite map with {entries} entries reached canonicalization unexpanded")]
    UnexpandedMap { entries: usize },
}

/// Canonicalize a fully expanded value.
pub fn canonicalize(value: &DecodedValue) -> Result<CanonicalValue, CanonicalizeError> {
    Ok(match value {
        DecodedValue::Primitive(Primitive::Integer(n)) => integer_value(n),
        DecodedValue::Primitive(Primitive::Text(s)) => Value::String(s.clone()),
        DecodedValue::Primitive(Primitive::Bool(b)) => Value::Bool(*b),
        DecodedValue::Primitive(Primitive::Nil) => Value::Null,
        DecodedValue::Blob(bytes) => Value::String(hex_with_prefix(bytes)),
        DecodedValue::Undecoded(cell) | DecodedValue::EmbeddedContainer(cell) => {
            Value::String(opaque_hex(cell))
        }
        DecodedValue::Address(address) => Value::String(address.to_string()),
        DecodedValue::Record(fields) => {
            let mut map = Map::with_capacity(fields.len());
            for (name, field) in fields {
                map.insert(name.clone(), canonicalize(field)?);
            }
            Value::Object(map)
        }
        DecodedValue::Sequence(items) => Value::Array(
            items
                .iter()
                .map(canonicalize)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        DecodedValue::CompositeMap(entries) => {
            return Err(CanonicalizeError::UnexpandedMap {
                entries: entries.len(),
            });
        }
    })
}

/// `0x`-prefixed hex of the cell serialized as a single-root bag of cells.
pub fn opaque_hex(cell: &Arc<Cell>) -> String {
    hex_with_prefix(&serialize_boc(cell))
}

fn integer_value(n: &Integer) -> Value {
    match n.as_safe_i64() {
        Some(safe) => Value::from(safe),
        None => Value::String(n.to_string()),
    }
}
