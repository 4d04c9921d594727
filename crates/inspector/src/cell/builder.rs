// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Bit-level writer producing ordinary cells.

use primitive_types::U512;
use std::sync::Arc;

use super::{Cell, CellError, CellSlice};
use crate::consts::{MAX_CELL_BITS, MAX_CELL_REFS, MAX_INT_BITS, MAX_UINT_BITS};
use crate::types::{Integer, MsgAddress};
use crate::utils::bit_at;

#[derive(Debug, Clone, Default)]
pub struct CellBuilder {
    data: Vec<u8>,
    bit_len: usize,
    refs: Vec<Arc<Cell>>,
}

impl CellBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    fn reserve(&self, bits: usize) -> Result<(), CellError> {
        if self.bit_len + bits > MAX_CELL_BITS {
            return Err(CellError::TooManyBits {
                bits: self.bit_len + bits,
            });
        }
        Ok(())
    }

    fn push_bit(&mut self, bit: bool) {
        if self.bit_len % 8 == 0 {
            self.data.push(0);
        }
        if bit {
            let last = self.data.len() - 1;
            self.data[last] |= 0x80 >> (self.bit_len % 8);
        }
        self.bit_len += 1;
    }

    pub fn store_bit(&mut self, bit: bool) -> Result<&mut Self, CellError> {
        self.reserve(1)?;
        self.push_bit(bit);
        Ok(self)
    }

    /// Store the low `bits` bits of `value`, most significant first.
    pub fn store_uint(&mut self, value: u64, bits: usize) -> Result<&mut Self, CellError> {
        if bits > 64 {
            return Err(CellError::IntegerTooWide { bits, max: 64 });
        }
        if bits < 64 && value >> bits != 0 {
            return Err(CellError::ValueOverflow { bits });
        }
        self.reserve(bits)?;
        for i in (0..bits).rev() {
            self.push_bit((value >> i) & 1 == 1);
        }
        Ok(self)
    }

    fn store_raw_u512(&mut self, value: U512, bits: usize) -> Result<&mut Self, CellError> {
        if value.bits() > bits {
            return Err(CellError::ValueOverflow { bits });
        }
        self.reserve(bits)?;
        for i in (0..bits).rev() {
            self.push_bit(value.bit(i));
        }
        Ok(self)
    }

    /// `uint N` for N up to 256.
    pub fn store_big_uint(&mut self, value: &Integer, bits: usize) -> Result<&mut Self, CellError> {
        if bits > MAX_UINT_BITS {
            return Err(CellError::IntegerTooWide {
                bits,
                max: MAX_UINT_BITS,
            });
        }
        if value.is_negative() {
            return Err(CellError::ValueOverflow { bits });
        }
        self.store_raw_u512(value.magnitude(), bits)
    }

    /// Two's complement `int N` for N up to 257.
    pub fn store_int(&mut self, value: &Integer, bits: usize) -> Result<&mut Self, CellError> {
        if bits > MAX_INT_BITS {
            return Err(CellError::IntegerTooWide {
                bits,
                max: MAX_INT_BITS,
            });
        }
        if bits == 0 {
            return if value.magnitude().is_zero() {
                Ok(self)
            } else {
                Err(CellError::ValueOverflow { bits })
            };
        }
        let half = U512::one() << (bits - 1);
        let magnitude = value.magnitude();
        let raw = if value.is_negative() {
            if magnitude > half {
                return Err(CellError::ValueOverflow { bits });
            }
            (U512::one() << bits) - magnitude
        } else {
            if magnitude >= half {
                return Err(CellError::ValueOverflow { bits });
            }
            magnitude
        };
        self.store_raw_u512(raw, bits)
    }

    /// `VarUInteger n` with a `len_bits`-wide byte count.
    pub fn store_var_uint(&mut self, value: &Integer, len_bits: usize) -> Result<&mut Self, CellError> {
        if value.is_negative() {
            return Err(CellError::ValueOverflow { bits: len_bits });
        }
        let bytes = value.magnitude().bits().div_ceil(8);
        if len_bits < 64 && (bytes as u64) >> len_bits != 0 {
            return Err(CellError::ValueOverflow { bits: len_bits });
        }
        self.store_uint(bytes as u64, len_bits)?;
        self.store_raw_u512(value.magnitude(), bytes * 8)
    }

    pub fn store_coins(&mut self, value: &Integer) -> Result<&mut Self, CellError> {
        self.store_var_uint(value, 4)
    }

    /// Store the first `bits` bits of `data`.
    pub fn store_bits(&mut self, data: &[u8], bits: usize) -> Result<&mut Self, CellError> {
        if data.len() * 8 < bits {
            return Err(CellError::NotEnoughBits {
                needed: bits,
                remaining: data.len() * 8,
            });
        }
        self.reserve(bits)?;
        for i in 0..bits {
            self.push_bit(bit_at(data, i));
        }
        Ok(self)
    }

    pub fn store_bytes(&mut self, data: &[u8]) -> Result<&mut Self, CellError> {
        self.store_bits(data, data.len() * 8)
    }

    /// `MsgAddress`; `None` stores `addr_none`.
    pub fn store_address(&mut self, address: Option<&MsgAddress>) -> Result<&mut Self, CellError> {
        match address {
            None => self.store_uint(0b00, 2),
            Some(MsgAddress::External(external)) => {
                self.store_uint(0b01, 2)?;
                self.store_uint(external.bit_len as u64, 9)?;
                self.store_bits(&external.data, external.bit_len)
            }
            Some(MsgAddress::Std(std)) => {
                self.store_uint(0b10, 2)?;
                self.store_bit(false)?;
                self.store_int(&Integer::from(std.workchain as i64), 8)?;
                self.store_bytes(&std.hash)
            }
            Some(MsgAddress::Var(var)) => {
                self.store_uint(0b11, 2)?;
                self.store_bit(false)?;
                self.store_uint(var.bit_len as u64, 9)?;
                self.store_int(&Integer::from(var.workchain as i64), 32)?;
                self.store_bits(&var.data, var.bit_len)
            }
        }
    }

    pub fn store_ref(&mut self, cell: Arc<Cell>) -> Result<&mut Self, CellError> {
        if self.refs.len() >= MAX_CELL_REFS {
            return Err(CellError::TooManyRefs {
                refs: self.refs.len() + 1,
            });
        }
        self.refs.push(cell);
        Ok(self)
    }

    /// `Maybe ^Cell`.
    pub fn store_maybe_ref(&mut self, cell: Option<Arc<Cell>>) -> Result<&mut Self, CellError> {
        match cell {
            Some(cell) => {
                self.store_bit(true)?;
                self.store_ref(cell)
            }
            None => self.store_bit(false),
        }
    }

    /// Append the unread bits and references of `slice`.
    pub fn store_slice(&mut self, slice: &CellSlice<'_>) -> Result<&mut Self, CellError> {
        let mut rest = slice.clone();
        let cell = rest.load_remainder()?;
        self.store_bits(cell.data(), cell.bit_len())?;
        for child in cell.refs() {
            self.store_ref(child.clone())?;
        }
        Ok(self)
    }

    /// Snake-encoded text starting at the current position, spilling into a
    /// chain of single-reference cells.
    pub fn store_snake_text(&mut self, text: &str) -> Result<&mut Self, CellError> {
        let bytes = text.as_bytes();
        let head = ((MAX_CELL_BITS - self.bit_len) / 8).min(bytes.len());
        let (first, rest) = bytes.split_at(head);
        self.store_bytes(first)?;
        if !rest.is_empty() {
            self.store_ref(Arc::new(snake_chain(rest)?))?;
        }
        Ok(self)
    }

    pub fn build(self) -> Result<Cell, CellError> {
        Cell::new(self.data, self.bit_len, self.refs)
    }
}

fn snake_chain(bytes: &[u8]) -> Result<Cell, CellError> {
    let per_cell = MAX_CELL_BITS / 8;
    let mut chunks: Vec<&[u8]> = bytes.chunks(per_cell).collect();
    let mut tail: Option<Cell> = None;
    while let Some(chunk) = chunks.pop() {
        let mut builder = CellBuilder::new();
        builder.store_bytes(chunk)?;
        if let Some(next) = tail.take() {
            builder.store_ref(Arc::new(next))?;
        }
        tail = Some(builder.build()?);
    }
    Ok(tail.unwrap_or_else(Cell::empty))
}
