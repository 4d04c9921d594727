// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Intermediate decoded values produced by strategies.

use serde_json::Value;
use std::sync::Arc;

use crate::cell::Cell;
use crate::types::{Integer, MsgAddress};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Primitive {
    Integer(Integer),
    Text(String),
    Bool(bool),
    Nil,
}

/// A decoded value before expansion and canonicalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedValue {
    /// No strategy could interpret the cell.
    Undecoded(Arc<Cell>),
    Primitive(Primitive),
    Blob(Vec<u8>),
    Address(MsgAddress),
    /// Dictionary entries in enumeration order.
    CompositeMap(Vec<(Integer, DecodedValue)>),
    /// Named fields in declaration order.
    Record(Vec<(String, DecodedValue)>),
    Sequence(Vec<DecodedValue>),
    /// A cell found as a field value that has not been decoded yet.
    EmbeddedContainer(Arc<Cell>),
}

impl DecodedValue {
    pub fn integer(value: impl Into<Integer>) -> Self {
        DecodedValue::Primitive(Primitive::Integer(value.into()))
    }

    pub fn text(value: impl Into<String>) -> Self {
        DecodedValue::Primitive(Primitive::Text(value.into()))
    }

    pub fn bool(value: bool) -> Self {
        DecodedValue::Primitive(Primitive::Bool(value))
    }

    pub fn nil() -> Self {
        DecodedValue::Primitive(Primitive::Nil)
    }

    pub fn address(address: Option<MsgAddress>) -> Self {
        address.map_or(DecodedValue::nil(), DecodedValue::Address)
    }

    /// Build a record tagged with `"@type": type_name`.
    pub fn typed_record(type_name: &str, fields: Vec<(String, DecodedValue)>) -> Self {
        let mut all = Vec::with_capacity(fields.len() + 1);
        all.push(("@type".to_string(), DecodedValue::text(type_name)));
        all.extend(fields);
        DecodedValue::Record(all)
    }

    /// Field lookup on a record.
    pub fn field(&self, name: &str) -> Option<&DecodedValue> {
        match self {
            DecodedValue::Record(fields) => fields
                .iter()
                .find(|(field, _)| field == name)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    pub fn is_undecoded(&self) -> bool {
        matches!(self, DecodedValue::Undecoded(_))
    }

    /// Number of nodes in the tree, this one included.
    pub fn node_count(&self) -> usize {
        1 + match self {
            DecodedValue::CompositeMap(entries) => entries.iter().map(|(_, v)| v.node_count()).sum(),
            DecodedValue::Record(fields) => fields.iter().map(|(_, v)| v.node_count()).sum(),
            DecodedValue::Sequence(items) => items.iter().map(DecodedValue::node_count).sum(),
            DecodedValue::Undecoded(_)
            | DecodedValue::Primitive(_)
            | DecodedValue::Blob(_)
            | DecodedValue::Address(_)
            | DecodedValue::EmbeddedContainer(_) => 0,
        }
    }
}

/// Lift a canonical value back into the decoded domain.
///
/// Canonical numbers are always integers; any other number is carried as
/// its textual form.
impl From<&Value> for DecodedValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => DecodedValue::nil(),
            Value::Bool(b) => DecodedValue::bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    DecodedValue::integer(i)
                } else if let Some(u) = n.as_u64() {
                    DecodedValue::integer(u)
                } else {
                    DecodedValue::text(n.to_string())
                }
            }
            Value::String(s) => DecodedValue::text(s.clone()),
            Value::Array(items) => DecodedValue::Sequence(items.iter().map(Into::into).collect()),
            Value::Object(map) => DecodedValue::Record(
                map.iter()
                    .map(|(key, value)| (key.clone(), value.into()))
                    .collect(),
            ),
        }
    }
}
