// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

pub mod checksum;
pub mod format;

pub use checksum::{crc16, crc32c};
pub use format::{bit_at, bits_to_hex_tagged, hex_with_prefix};
