// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Sequential reader over the bits and references of a cell.

use primitive_types::U512;
use std::sync::Arc;

use super::{Cell, CellError};
use crate::consts::{MAX_INT_BITS, MAX_UINT_BITS};
use crate::types::{ExternalAddress, Integer, MsgAddress, StdAddress, VarAddress};
use crate::utils::bit_at;

#[derive(Debug, Clone)]
pub struct CellSlice<'a> {
    cell: &'a Cell,
    bit_pos: usize,
    ref_pos: usize,
}

impl<'a> CellSlice<'a> {
    pub fn new(cell: &'a Cell) -> Self {
        Self {
            cell,
            bit_pos: 0,
            ref_pos: 0,
        }
    }

    pub fn cell(&self) -> &'a Cell {
        self.cell
    }

    pub fn remaining_bits(&self) -> usize {
        self.cell.bit_len() - self.bit_pos
    }

    pub fn remaining_refs(&self) -> usize {
        self.cell.refs().len() - self.ref_pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining_bits() == 0 && self.remaining_refs() == 0
    }

    /// Fail unless every bit and reference has been read.
    pub fn ensure_empty(&self) -> Result<(), CellError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CellError::TrailingData {
                bits: self.remaining_bits(),
                refs: self.remaining_refs(),
            })
        }
    }

    fn require(&self, bits: usize) -> Result<(), CellError> {
        if bits > self.remaining_bits() {
            return Err(CellError::NotEnoughBits {
                needed: bits,
                remaining: self.remaining_bits(),
            });
        }
        Ok(())
    }

    pub fn skip(&mut self, bits: usize) -> Result<(), CellError> {
        self.require(bits)?;
        self.bit_pos += bits;
        Ok(())
    }

    pub fn load_bit(&mut self) -> Result<bool, CellError> {
        self.require(1)?;
        let bit = bit_at(self.cell.data(), self.bit_pos);
        self.bit_pos += 1;
        Ok(bit)
    }

    /// Read `bits` (at most 64) as an unsigned big-endian integer.
    pub fn load_uint(&mut self, bits: usize) -> Result<u64, CellError> {
        let value = self.preload_uint(bits)?;
        self.bit_pos += bits;
        Ok(value)
    }

    /// Read up to 64 bits without advancing.
    pub fn preload_uint(&self, bits: usize) -> Result<u64, CellError> {
        if bits > 64 {
            return Err(CellError::IntegerTooWide { bits, max: 64 });
        }
        self.require(bits)?;
        let data = self.cell.data();
        let mut value = 0u64;
        for i in 0..bits {
            value = (value << 1) | bit_at(data, self.bit_pos + i) as u64;
        }
        Ok(value)
    }

    fn load_raw_u512(&mut self, bits: usize) -> Result<U512, CellError> {
        self.require(bits)?;
        let data = self.cell.data();
        let mut value = U512::zero();
        for i in 0..bits {
            value = value << 1;
            if bit_at(data, self.bit_pos + i) {
                value = value | U512::one();
            }
        }
        self.bit_pos += bits;
        Ok(value)
    }

    /// `uint N` for N up to 256.
    pub fn load_big_uint(&mut self, bits: usize) -> Result<Integer, CellError> {
        if bits > MAX_UINT_BITS {
            return Err(CellError::IntegerTooWide {
                bits,
                max: MAX_UINT_BITS,
            });
        }
        Ok(Integer::unsigned(self.load_raw_u512(bits)?))
    }

    /// Two's complement `int N` for N up to 257.
    pub fn load_int(&mut self, bits: usize) -> Result<Integer, CellError> {
        if bits > MAX_INT_BITS {
            return Err(CellError::IntegerTooWide {
                bits,
                max: MAX_INT_BITS,
            });
        }
        if bits == 0 {
            return Ok(Integer::zero());
        }
        let raw = self.load_raw_u512(bits)?;
        let sign_bit = U512::one() << (bits - 1);
        if raw & sign_bit == U512::zero() {
            Ok(Integer::unsigned(raw))
        } else {
            let modulus = U512::one() << bits;
            Ok(Integer::from_parts(true, modulus - raw))
        }
    }

    /// `VarUInteger n`: a `len_bits`-wide byte count followed by that many bytes.
    pub fn load_var_uint(&mut self, len_bits: usize) -> Result<Integer, CellError> {
        let len = self.load_uint(len_bits)? as usize;
        self.load_big_uint(len * 8)
    }

    /// `Grams` / `Coins`: `VarUInteger 16`.
    pub fn load_coins(&mut self) -> Result<Integer, CellError> {
        self.load_var_uint(4)
    }

    /// Read `bits` bits, returned left-aligned in bytes.
    pub fn load_bits(&mut self, bits: usize) -> Result<Vec<u8>, CellError> {
        self.require(bits)?;
        let data = self.cell.data();
        let mut out = vec![0u8; bits.div_ceil(8)];
        for i in 0..bits {
            if bit_at(data, self.bit_pos + i) {
                out[i / 8] |= 0x80 >> (i % 8);
            }
        }
        self.bit_pos += bits;
        Ok(out)
    }

    /// `Unary`: count of `1` bits terminated by a `0`.
    pub fn load_unary(&mut self) -> Result<usize, CellError> {
        let mut count = 0;
        while self.load_bit()? {
            count += 1;
        }
        Ok(count)
    }

    pub fn load_ref(&mut self) -> Result<Arc<Cell>, CellError> {
        let cell = self
            .cell
            .refs()
            .get(self.ref_pos)
            .cloned()
            .ok_or(CellError::NotEnoughRefs)?;
        self.ref_pos += 1;
        Ok(cell)
    }

    /// `Maybe ^Cell`.
    pub fn load_maybe_ref(&mut self) -> Result<Option<Arc<Cell>>, CellError> {
        if self.load_bit()? {
            self.load_ref().map(Some)
        } else {
            Ok(None)
        }
    }

    /// `MsgAddress`; `addr_none` yields `None`.
    pub fn load_address(&mut self) -> Result<Option<MsgAddress>, CellError> {
        match self.load_uint(2)? {
            0b00 => Ok(None),
            0b01 => {
                let bit_len = self.load_uint(9)? as usize;
                let data = self.load_bits(bit_len)?;
                Ok(Some(MsgAddress::External(ExternalAddress { bit_len, data })))
            }
            0b10 => {
                let anycast = self.load_anycast()?;
                let workchain = self.load_int(8)?;
                let mut hash = [0u8; 32];
                hash.copy_from_slice(&self.load_bits(256)?);
                if let Some((depth, prefix)) = anycast {
                    apply_rewrite_prefix(&mut hash, depth, &prefix);
                }
                let workchain = integer_to_i64(&workchain)? as i8;
                Ok(Some(MsgAddress::Std(StdAddress::new(workchain, hash))))
            }
            _ => {
                let anycast = self.load_anycast()?;
                let bit_len = self.load_uint(9)? as usize;
                let workchain = integer_to_i64(&self.load_int(32)?)? as i32;
                let mut data = self.load_bits(bit_len)?;
                if let Some((depth, prefix)) = anycast {
                    if depth > bit_len {
                        return Err(CellError::InvalidAddress(format!(
                            "anycast depth {} exceeds address length {}",
                            depth, bit_len
                        )));
                    }
                    apply_rewrite_prefix(&mut data, depth, &prefix);
                }
                Ok(Some(MsgAddress::Var(VarAddress {
                    workchain,
                    bit_len,
                    data,
                })))
            }
        }
    }

    /// `anycast_info$_ depth:(#<= 30) { depth >= 1 } rewrite_pfx:(bits depth)`
    fn load_anycast(&mut self) -> Result<Option<(usize, Vec<u8>)>, CellError> {
        if !self.load_bit()? {
            return Ok(None);
        }
        let depth = self.load_uint(5)? as usize;
        if depth == 0 || depth > 30 {
            return Err(CellError::InvalidAddress(format!(
                "invalid anycast depth {}",
                depth
            )));
        }
        let prefix = self.load_bits(depth)?;
        Ok(Some((depth, prefix)))
    }

    /// Snake-encoded text: the remaining bytes of this slice, continued
    /// through the first reference of each cell.
    pub fn load_snake_text(&mut self) -> Result<String, CellError> {
        let mut bytes = Vec::new();
        self.load_snake_bytes_into(&mut bytes)?;
        String::from_utf8(bytes).map_err(|_| CellError::InvalidUtf8)
    }

    fn load_snake_bytes_into(&mut self, out: &mut Vec<u8>) -> Result<(), CellError> {
        let bits = self.remaining_bits();
        if bits % 8 != 0 {
            return Err(CellError::UnalignedText { bits });
        }
        out.extend_from_slice(&self.load_bits(bits)?);

        match self.remaining_refs() {
            0 => Ok(()),
            1 => {
                let next = self.load_ref()?;
                next.as_slice().load_snake_bytes_into(out)
            }
            refs => Err(CellError::TrailingData { bits: 0, refs }),
        }
    }

    /// Copy everything not yet read into a new cell and consume it.
    pub fn load_remainder(&mut self) -> Result<Cell, CellError> {
        let bits = self.remaining_bits();
        let data = self.load_bits(bits)?;
        let refs = self.cell.refs()[self.ref_pos..].to_vec();
        self.ref_pos = self.cell.refs().len();
        Cell::new(data, bits, refs)
    }
}

fn integer_to_i64(value: &Integer) -> Result<i64, CellError> {
    value
        .as_safe_i64()
        .ok_or_else(|| CellError::InvalidAddress(format!("workchain {} out of range", value)))
}

fn apply_rewrite_prefix(data: &mut [u8], depth: usize, prefix: &[u8]) {
    for i in 0..depth {
        let mask = 0x80 >> (i % 8);
        if bit_at(prefix, i) {
            data[i / 8] |= mask;
        } else {
            data[i / 8] &= !mask;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellBuilder;

    #[test]
    fn test_load_uint_across_bytes() {
        let cell = Cell::new(vec![0b1010_1100, 0b0101_0000], 12, vec![]).unwrap();
        let mut slice = cell.as_slice();
        assert_eq!(slice.load_uint(3).unwrap(), 0b101);
        assert_eq!(slice.load_uint(9).unwrap(), 0b0_1100_0101);
        assert!(slice.is_empty());
    }

    #[test]
    fn test_not_enough_bits() {
        let cell = Cell::new(vec![0xff], 4, vec![]).unwrap();
        let mut slice = cell.as_slice();
        assert_eq!(
            slice.load_uint(5),
            Err(CellError::NotEnoughBits {
                needed: 5,
                remaining: 4
            })
        );
        // A failed read does not consume anything.
        assert_eq!(slice.remaining_bits(), 4);
    }

    #[test]
    fn test_load_int_negative() {
        let mut builder = CellBuilder::new();
        builder.store_uint(0xff, 8).unwrap();
        builder.store_uint(0x7f, 8).unwrap();
        let cell = builder.build().unwrap();
        let mut slice = cell.as_slice();
        assert_eq!(slice.load_int(8).unwrap(), Integer::from(-1i64));
        assert_eq!(slice.load_int(8).unwrap(), Integer::from(127i64));
    }

    #[test]
    fn test_load_int257_extremes() {
        let mut builder = CellBuilder::new();
        builder.store_bit(true).unwrap();
        builder.store_uint(0, 64).unwrap();
        builder.store_uint(0, 64).unwrap();
        builder.store_uint(0, 64).unwrap();
        builder.store_uint(0, 64).unwrap();
        let cell = builder.build().unwrap();
        let value = cell.as_slice().load_int(257).unwrap();
        assert!(value.is_negative());
        assert_eq!(value.magnitude(), U512::one() << 256);
    }

    #[test]
    fn test_integer_width_limits() {
        let cell = Cell::new(vec![0; 64], 512, vec![]).unwrap();
        assert!(cell.as_slice().load_big_uint(257).is_err());
        assert!(cell.as_slice().load_int(258).is_err());
        assert!(cell.as_slice().load_uint(65).is_err());
    }

    #[test]
    fn test_load_coins() {
        let mut builder = CellBuilder::new();
        builder.store_coins(&Integer::from(1_000_000_000u64)).unwrap();
        let cell = builder.build().unwrap();
        let mut slice = cell.as_slice();
        assert_eq!(slice.load_coins().unwrap(), Integer::from(1_000_000_000u64));
        assert!(slice.is_empty());
    }

    #[test]
    fn test_load_zero_coins() {
        let cell = Cell::new(vec![0x00], 4, vec![]).unwrap();
        assert_eq!(cell.as_slice().load_coins().unwrap(), Integer::zero());
    }

    #[test]
    fn test_load_unary() {
        let cell = Cell::new(vec![0b1110_1000], 6, vec![]).unwrap();
        let mut slice = cell.as_slice();
        assert_eq!(slice.load_unary().unwrap(), 3);
        assert_eq!(slice.load_unary().unwrap(), 1);
        assert!(slice.load_unary().is_err());
    }

    #[test]
    fn test_load_std_address() {
        let address = StdAddress::new(-1, [0x5a; 32]);
        let mut builder = CellBuilder::new();
        builder.store_address(Some(&MsgAddress::Std(address))).unwrap();
        builder.store_address(None).unwrap();
        let cell = builder.build().unwrap();

        let mut slice = cell.as_slice();
        assert_eq!(slice.load_address().unwrap(), Some(MsgAddress::Std(address)));
        assert_eq!(slice.load_address().unwrap(), None);
        assert!(slice.is_empty());
    }

    #[test]
    fn test_load_std_address_with_anycast() {
        let mut builder = CellBuilder::new();
        builder.store_uint(0b10, 2).unwrap();
        builder.store_bit(true).unwrap();
        builder.store_uint(4, 5).unwrap();
        builder.store_uint(0b1010, 4).unwrap();
        builder.store_uint(0, 8).unwrap();
        for _ in 0..4 {
            builder.store_uint(0, 64).unwrap();
        }
        let cell = builder.build().unwrap();

        match cell.as_slice().load_address().unwrap() {
            Some(MsgAddress::Std(address)) => {
                assert_eq!(address.workchain, 0);
                assert_eq!(address.hash[0], 0b1010_0000);
                assert_eq!(address.hash[1..], [0u8; 31]);
            }
            other => panic!("unexpected address {:?}", other),
        }
    }

    #[test]
    fn test_load_external_address() {
        let external = MsgAddress::External(ExternalAddress {
            bit_len: 12,
            data: vec![0xab, 0xc0],
        });
        let mut builder = CellBuilder::new();
        builder.store_address(Some(&external)).unwrap();
        let cell = builder.build().unwrap();
        assert_eq!(cell.as_slice().load_address().unwrap(), Some(external));
    }

    #[test]
    fn test_snake_text_across_refs() {
        let tail = Arc::new(Cell::new(b"world".to_vec(), 40, vec![]).unwrap());
        let head = Cell::new(b"hello ".to_vec(), 48, vec![tail]).unwrap();
        let mut slice = head.as_slice();
        assert_eq!(slice.load_snake_text().unwrap(), "hello world");
        assert!(slice.is_empty());
    }

    #[test]
    fn test_snake_text_rejects_unaligned() {
        let cell = Cell::new(vec![0x41, 0x80], 9, vec![]).unwrap();
        assert_eq!(
            cell.as_slice().load_snake_text(),
            Err(CellError::UnalignedText { bits: 9 })
        );
    }

    #[test]
    fn test_snake_text_rejects_invalid_utf8() {
        let cell = Cell::new(vec![0xff, 0xfe], 16, vec![]).unwrap();
        assert_eq!(cell.as_slice().load_snake_text(), Err(CellError::InvalidUtf8));
    }

    #[test]
    fn test_load_remainder() {
        let child = Arc::new(Cell::empty());
        let cell = Cell::new(vec![0xab, 0xcd], 16, vec![child.clone()]).unwrap();
        let mut slice = cell.as_slice();
        slice.skip(4).unwrap();
        let rest = slice.load_remainder().unwrap();
        assert_eq!(rest.bit_len(), 12);
        assert_eq!(rest.data(), &[0xbc, 0xd0]);
        assert_eq!(rest.refs(), &[child]);
        assert!(slice.is_empty());
    }

    #[test]
    fn test_ensure_empty_reports_leftovers() {
        let cell = Cell::new(vec![0xff], 8, vec![Arc::new(Cell::empty())]).unwrap();
        let mut slice = cell.as_slice();
        slice.skip(3).unwrap();
        assert_eq!(
            slice.ensure_empty(),
            Err(CellError::TrailingData { bits: 5, refs: 1 })
        );
    }
}
