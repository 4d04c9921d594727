// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Checksums used by the TON wire formats.
//!
//! - CRC16/XMODEM guards user-friendly addresses.
//! - CRC32-C (Castagnoli) trails a bag of cells when `has_crc32c` is set.

const CRC16_POLY: u16 = 0x1021;
const CRC32C_POLY_REFLECTED: u32 = 0x82f6_3b78;

/// CRC16/XMODEM: poly 0x1021, init 0, no reflection, no final xor.
pub fn crc16(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for byte in data {
        crc ^= (*byte as u16) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ CRC16_POLY
            } else {
                crc << 1
            };
        }
    }
    crc
}

/// CRC32-C: reflected poly 0x82F63B78, init and final xor 0xFFFFFFFF.
pub fn crc32c(data: &[u8]) -> u32 {
    let mut crc: u32 = !0;
    for byte in data {
        crc ^= *byte as u32;
        for _ in 0..8 {
            crc = if crc & 1 != 0 {
                (crc >> 1) ^ CRC32C_POLY_REFLECTED
            } else {
                crc >> 1
            };
        }
    }
    !crc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc16_check_value() {
        assert_eq!(crc16(b"123456789"), 0x31c3);
    }

    #[test]
    fn test_crc16_empty() {
        assert_eq!(crc16(&[]), 0);
    }

    #[test]
    fn test_crc32c_check_value() {
        assert_eq!(crc32c(b"123456789"), 0xe306_9283);
    }

    #[test]
    fn test_crc32c_empty() {
        assert_eq!(crc32c(&[]), 0);
    }
}
