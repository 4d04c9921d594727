// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Message layouts used by the schema strategy.
//!
//! A schema is a JSON document listing messages, each identified by a
//! leading opcode and described by an ordered list of typed fields:
//!
//! ```json
//! { "messages": [ { "name": "excesses", "opcode": "0xd53276db",
//!                   "fields": [ { "name": "query_id", "type": "uint", "bits": 64 } ] } ] }
//! ```

use config::DecodeConfig;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::path::Path;
use thiserror::Error;

use crate::consts::{MAX_CELL_BITS, MAX_DICT_KEY_BITS, MAX_INT_BITS, MAX_UINT_BITS};

const BUILTIN_SCHEMA: &str = include_str!("../../schemas/builtin.json");

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Failed to read schema file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse schema: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid message '{message}': {reason}")]
    InvalidMessage { message: String, reason: String },

    #[error("Messages '{first}' and '{second}' share opcode 0x{opcode:x}/{bits}")]
    DuplicateOpcode {
        opcode: u64,
        bits: usize,
        first: String,
        second: String,
    },

    #[error("Opcode of '{short}' is a prefix of the opcode of '{long}'")]
    OverlappingOpcode { short: String, long: String },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Schema {
    #[serde(default)]
    pub messages: Vec<MessageLayout>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MessageLayout {
    pub name: String,
    #[serde(deserialize_with = "deserialize_opcode", serialize_with = "serialize_opcode")]
    pub opcode: u64,
    #[serde(default = "default_opcode_bits")]
    pub opcode_bits: usize,
    #[serde(default)]
    pub fields: Vec<FieldLayout>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldLayout {
    pub name: String,
    #[serde(flatten)]
    pub ty: FieldType,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldType {
    /// `uintN`
    Uint { bits: usize },
    /// `intN`
    Int { bits: usize },
    /// `VarUInteger n` with a `len_bits` wide length prefix.
    VarUint { len_bits: usize },
    Coins,
    /// `MsgAddress`; `addr_none` decodes to null.
    Address,
    Bool,
    /// Raw bits rendered as a blob.
    Bits { bits: usize },
    Ref,
    MaybeRef,
    /// `Either Cell ^Cell`
    EitherRef,
    /// Snake string over the rest of the cell.
    Text,
    /// Snake string held in a reference.
    RefText,
    /// `HashmapE key_bits value`
    Dict { key_bits: usize, value: Box<FieldType> },
    /// Everything left in the cell.
    Remainder,
}

fn default_opcode_bits() -> usize {
    32
}

fn deserialize_opcode<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Opcode {
        Number(u64),
        Text(String),
    }

    match Opcode::deserialize(deserializer)? {
        Opcode::Number(n) => Ok(n),
        Opcode::Text(s) => {
            let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
                Some(hex) => u64::from_str_radix(hex, 16),
                None => s.parse::<u64>(),
            };
            parsed.map_err(|e| serde::de::Error::custom(format!("invalid opcode '{}': {}", s, e)))
        }
    }
}

fn serialize_opcode<S>(opcode: &u64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format!("0x{:08x}", opcode))
}

impl FieldType {
    fn validate(&self) -> Result<(), String> {
        match self {
            FieldType::Uint { bits } if *bits == 0 || *bits > MAX_UINT_BITS => {
                Err(format!("uint width {} outside 1..={}", bits, MAX_UINT_BITS))
            }
            FieldType::Int { bits } if *bits == 0 || *bits > MAX_INT_BITS => {
                Err(format!("int width {} outside 1..={}", bits, MAX_INT_BITS))
            }
            FieldType::VarUint { len_bits } if *len_bits == 0 || *len_bits > 6 => {
                Err(format!("var_uint length width {} outside 1..=6", len_bits))
            }
            FieldType::Bits { bits } if *bits > MAX_CELL_BITS => {
                Err(format!("bits width {} exceeds {}", bits, MAX_CELL_BITS))
            }
            FieldType::Dict { key_bits, .. } if *key_bits == 0 || *key_bits > MAX_DICT_KEY_BITS => {
                Err(format!("dict key width {} outside 1..={}", key_bits, MAX_DICT_KEY_BITS))
            }
            FieldType::Dict { value, .. } => value.validate(),
            _ => Ok(()),
        }
    }
}

impl MessageLayout {
    fn validate(&self) -> Result<(), SchemaError> {
        let invalid = |reason: String| SchemaError::InvalidMessage {
            message: self.name.clone(),
            reason,
        };

        if self.name.is_empty() {
            return Err(invalid("empty name".to_string()));
        }
        if self.opcode_bits == 0 || self.opcode_bits > 64 {
            return Err(invalid(format!("opcode width {} outside 1..=64", self.opcode_bits)));
        }
        if self.opcode_bits < 64 && self.opcode >> self.opcode_bits != 0 {
            return Err(invalid(format!(
                "opcode 0x{:x} does not fit in {} bits",
                self.opcode, self.opcode_bits
            )));
        }
        for (i, field) in self.fields.iter().enumerate() {
            if field.name.is_empty() || field.name == "@type" {
                return Err(invalid(format!("field #{} has a reserved or empty name", i)));
            }
            if self.fields[..i].iter().any(|other| other.name == field.name) {
                return Err(invalid(format!("duplicate field '{}'", field.name)));
            }
            field
                .ty
                .validate()
                .map_err(|reason| invalid(format!("field '{}': {}", field.name, reason)))?;
        }
        Ok(())
    }

    /// Whether one opcode is a leading-bit prefix of the other, so a cell
    /// starting with the longer opcode also matches the shorter one.
    fn opcode_overlaps(&self, other: &MessageLayout) -> bool {
        let (short, long) = if self.opcode_bits <= other.opcode_bits {
            (self, other)
        } else {
            (other, self)
        };
        long.opcode >> (long.opcode_bits - short.opcode_bits) == short.opcode
    }
}

impl Schema {
    /// Schema covering the standard jetton and NFT messages.
    pub fn builtin() -> Result<Self, SchemaError> {
        Self::from_json(BUILTIN_SCHEMA)
    }

    pub fn from_json(text: &str) -> Result<Self, SchemaError> {
        let schema: Schema = serde_json::from_str(text)?;
        schema.validate()?;
        Ok(schema)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Assemble the schema selected by the decode configuration.
    pub fn from_config(config: &DecodeConfig) -> Result<Self, SchemaError> {
        let mut schema = if config.builtin_schema {
            Self::builtin()?
        } else {
            Self::default()
        };
        if let Some(path) = &config.schema_path {
            schema = schema.merge(Self::from_file(path)?)?;
        }
        Ok(schema)
    }

    pub fn validate(&self) -> Result<(), SchemaError> {
        for (i, message) in self.messages.iter().enumerate() {
            message.validate()?;
            let Some(first) = self.messages[..i]
                .iter()
                .find(|other| other.opcode_overlaps(message))
            else {
                continue;
            };
            if first.opcode_bits == message.opcode_bits {
                return Err(SchemaError::DuplicateOpcode {
                    opcode: message.opcode,
                    bits: message.opcode_bits,
                    first: first.name.clone(),
                    second: message.name.clone(),
                });
            }
            let (short, long) = if first.opcode_bits < message.opcode_bits {
                (first, message)
            } else {
                (message, first)
            };
            return Err(SchemaError::OverlappingOpcode {
                short: short.name.clone(),
                long: long.name.clone(),
            });
        }
        Ok(())
    }

    /// Append the messages of `other`; opcodes may not collide or prefix
    /// one another.
    pub fn merge(mut self, other: Schema) -> Result<Self, SchemaError> {
        self.messages.extend(other.messages);
        self.validate()?;
        Ok(self)
    }
}
