// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Formatting utilities for hex rendering of payload bits.

/// Format bytes as hex string with "0x" prefix
pub fn hex_with_prefix(data: &[u8]) -> String {
    format!("0x{}", hex::encode(data))
}

/// Render `bit_len` leading bits of `data` as upper-case hex nibbles.
///
/// When the bit count is not a multiple of four the completion tag is used:
/// a single `1` bit is appended, the nibble is zero-padded and the text ends
/// with `_` (`x{…_}` dump convention).
pub fn bits_to_hex_tagged(data: &[u8], bit_len: usize) -> String {
    let nibbles = bit_len.div_ceil(4);
    let mut out = String::with_capacity(nibbles + 1);

    for i in 0..nibbles {
        let mut nibble = 0u8;
        for j in 0..4 {
            let pos = i * 4 + j;
            let bit = if pos < bit_len {
                bit_at(data, pos)
            } else {
                pos == bit_len
            };
            nibble = (nibble << 1) | bit as u8;
        }
        out.push(char::from_digit(nibble as u32, 16).unwrap_or('0').to_ascii_uppercase());
    }

    if bit_len % 4 != 0 {
        out.push('_');
    }
    out
}

/// Bit `pos` of `data`, most significant bit first.
pub fn bit_at(data: &[u8], pos: usize) -> bool {
    data[pos / 8] & (0x80 >> (pos % 8)) != 0
}
