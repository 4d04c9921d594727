// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Schema-driven message decoding.

use std::sync::Arc;

use super::schema::{FieldType, MessageLayout, Schema};
use super::strategy::{Strategy, StrategyError};
use super::value::DecodedValue;
use crate::cell::{Cell, CellError, CellSlice};

pub struct SchemaStrategy {
    schema: Schema,
}

impl SchemaStrategy {
    pub fn new(schema: Schema) -> Self {
        Self { schema }
    }
}

impl Strategy for SchemaStrategy {
    fn name(&self) -> &'static str {
        "schema"
    }

    fn decode(&self, cell: &Arc<Cell>) -> Result<DecodedValue, StrategyError> {
        if cell.is_exotic() {
            return Err(StrategyError::Exotic);
        }

        let mut last_error = None;
        for message in &self.schema.messages {
            let slice = cell.as_slice();
            if slice.preload_uint(message.opcode_bits).ok() != Some(message.opcode) {
                continue;
            }
            match decode_message(message, slice) {
                Ok(value) => return Ok(value),
                Err(e) => {
                    tracing::trace!(message = %message.name, error = %e, "Opcode matched but layout did not");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.map_or(StrategyError::NoMatch { strategy: "schema" }, StrategyError::Cell))
    }
}

fn decode_message(message: &MessageLayout, mut slice: CellSlice<'_>) -> Result<DecodedValue, CellError> {
    slice.skip(message.opcode_bits)?;
    let mut fields = Vec::with_capacity(message.fields.len());
    for field in &message.fields {
        fields.push((field.name.clone(), decode_field(&field.ty, &mut slice)?));
    }
    slice.ensure_empty()?;
    Ok(DecodedValue::typed_record(&message.name, fields))
}

/// Decode one field from the current slice position.
pub(crate) fn decode_field(ty: &FieldType, slice: &mut CellSlice<'_>) -> Result<DecodedValue, CellError> {
    Ok(match ty {
        FieldType::Uint { bits } => DecodedValue::integer(slice.load_big_uint(*bits)?),
        FieldType::Int { bits } => DecodedValue::integer(slice.load_int(*bits)?),
        FieldType::VarUint { len_bits } => DecodedValue::integer(slice.load_var_uint(*len_bits)?),
        FieldType::Coins => DecodedValue::integer(slice.load_coins()?),
        FieldType::Address => DecodedValue::address(slice.load_address()?),
        FieldType::Bool => DecodedValue::bool(slice.load_bit()?),
        FieldType::Bits { bits } => DecodedValue::Blob(slice.load_bits(*bits)?),
        FieldType::Ref => DecodedValue::EmbeddedContainer(slice.load_ref()?),
        FieldType::MaybeRef => match slice.load_maybe_ref()? {
            Some(cell) => DecodedValue::EmbeddedContainer(cell),
            None => DecodedValue::nil(),
        },
        FieldType::EitherRef => {
            if slice.load_bit()? {
                DecodedValue::EmbeddedContainer(slice.load_ref()?)
            } else {
                remainder(slice)?
            }
        }
        FieldType::Text => DecodedValue::text(slice.load_snake_text()?),
        FieldType::RefText => {
            let cell = slice.load_ref()?;
            let mut inner = cell.as_slice();
            let text = inner.load_snake_text()?;
            inner.ensure_empty()?;
            DecodedValue::text(text)
        }
        FieldType::Dict { key_bits, value } => DecodedValue::CompositeMap(
            slice.load_dict(*key_bits, |leaf| decode_field(value, leaf))?,
        ),
        FieldType::Remainder => remainder(slice)?,
    })
}

/// The unread part of the slice as a fresh cell; nothing left yields null.
pub(crate) fn remainder(slice: &mut CellSlice<'_>) -> Result<DecodedValue, CellError> {
    if slice.is_empty() {
        return Ok(DecodedValue::nil());
    }
    Ok(DecodedValue::EmbeddedContainer(Arc::new(slice.load_remainder()?)))
}
