// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

#![allow(dead_code)]

use cell_inspector::cell::{Cell, CellBuilder, serialize_boc};
use cell_inspector::decode::{Schema, StrategyDecoder};
use std::sync::Arc;

/// Empty cell as a base64 bag of cells (with CRC32-C).
pub const EMPTY_CELL_BASE64: &str = "te6cckEBAQEAAgAAAEysuc0=";

/// Canonical opaque form of the empty cell.
pub const EMPTY_CELL_HEX: &str = "0xb5ee9c724101010100020000004cacb9cd";

pub const EXCESSES_OPCODE: u64 = 0xd53276db;
pub const JETTON_TRANSFER_OPCODE: u64 = 0x0f8a7ea5;

pub fn builtin_decoder() -> Arc<StrategyDecoder> {
    Arc::new(StrategyDecoder::standard(Schema::builtin().unwrap()))
}

pub fn decoder_with(schema_json: &str) -> Arc<StrategyDecoder> {
    let schema = Schema::from_json(schema_json).unwrap();
    Arc::new(StrategyDecoder::standard(schema))
}

pub fn to_hex(cell: Cell) -> String {
    hex::encode(serialize_boc(&Arc::new(cell)))
}

pub fn excesses(query_id: u64) -> Arc<Cell> {
    let mut b = CellBuilder::new();
    b.store_uint(EXCESSES_OPCODE, 32).unwrap();
    b.store_uint(query_id, 64).unwrap();
    Arc::new(b.build().unwrap())
}

pub fn text_comment(text: &str) -> Cell {
    let mut b = CellBuilder::new();
    b.store_uint(0, 32).unwrap();
    b.store_snake_text(text).unwrap();
    b.build().unwrap()
}
