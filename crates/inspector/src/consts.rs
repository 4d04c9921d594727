// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

/// Data bits a single cell may hold.
pub const MAX_CELL_BITS: usize = 1023;

/// References a single cell may hold.
pub const MAX_CELL_REFS: usize = 4;

/// Widest `uintN` field.
pub const MAX_UINT_BITS: usize = 256;

/// Widest `intN` field.
pub const MAX_INT_BITS: usize = 257;

/// Widest dictionary key.
pub const MAX_DICT_KEY_BITS: usize = 512;

/// Bag-of-cells magic prefixes.
pub const BOC_GENERIC_MAGIC: u32 = 0xb5ee_9c72;
pub const BOC_INDEXED_MAGIC: u32 = 0x68ff_65f3;
pub const BOC_INDEXED_CRC32_MAGIC: u32 = 0xacc3_a728;

/// Opcode of a plain text comment body.
pub const TEXT_COMMENT_OPCODE: u32 = 0;

/// Deepest cell tree accepted.
pub const MAX_CELL_DEPTH: u16 = 1024;

/// Expanded nodes allowed per distinct input cell or data bit.
pub const EXPANSION_NODES_PER_UNIT: usize = 8;

/// Expanded nodes allowed on top of the per-unit share.
pub const EXPANSION_NODE_SLACK: usize = 1024;

/// Most entries read from a single dictionary.
pub const MAX_DICT_ENTRIES: usize = 65_536;
