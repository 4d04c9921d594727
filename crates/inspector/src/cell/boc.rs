// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Bag-of-cells container codec.
//!
//! Parsing accepts the generic layout (`b5ee9c72`) and the two legacy indexed
//! layouts (`68ff65f3`, `acc3a728`). Serialization always emits the generic
//! layout with a CRC32-C trailer and no index.

use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use super::{Cell, CellError, hash_with_memo};
use crate::consts::{BOC_GENERIC_MAGIC, BOC_INDEXED_CRC32_MAGIC, BOC_INDEXED_MAGIC, MAX_CELL_REFS};
use crate::utils::crc32c;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BocError {
    #[error("Unexpected end of input at byte {offset}")]
    UnexpectedEof { offset: usize },

    #[error("Unknown magic 0x{0:08x}")]
    InvalidMagic(u32),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("Invalid cell #{index}: {reason}")]
    InvalidCell { index: usize, reason: String },

    #[error("Checksum mismatch: stored 0x{stored:08x}, computed 0x{computed:08x}")]
    ChecksumMismatch { stored: u32, computed: u32 },

    #[error("{0} trailing bytes after the last cell")]
    TrailingBytes(usize),

    #[error("Absent cells are not supported")]
    AbsentCells,

    #[error("No root cells")]
    NoRoots,
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, len: usize) -> Result<&'a [u8], BocError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.bytes.len())
            .ok_or(BocError::UnexpectedEof { offset: self.bytes.len() })?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn byte(&mut self) -> Result<u8, BocError> {
        Ok(self.take(1)?[0])
    }

    fn uint(&mut self, width: usize) -> Result<usize, BocError> {
        Ok(self
            .take(width)?
            .iter()
            .fold(0usize, |acc, b| (acc << 8) | *b as usize))
    }
}

/// Raw cell as laid out in the container, before references are resolved.
struct RawCell<'a> {
    data: &'a [u8],
    bit_len: usize,
    refs: Vec<usize>,
    exotic: bool,
    level_mask: u8,
}

/// Parse a bag of cells and return its roots in declaration order.
pub fn parse_boc(bytes: &[u8]) -> Result<Vec<Arc<Cell>>, BocError> {
    let mut reader = Reader { bytes, pos: 0 };
    let magic = u32::from_be_bytes([
        reader.byte()?,
        reader.byte()?,
        reader.byte()?,
        reader.byte()?,
    ]);

    let (has_index, has_crc, size) = match magic {
        BOC_GENERIC_MAGIC => {
            let flags = reader.byte()?;
            (flags & 0x80 != 0, flags & 0x40 != 0, (flags & 0x07) as usize)
        }
        BOC_INDEXED_MAGIC => (true, false, reader.byte()? as usize),
        BOC_INDEXED_CRC32_MAGIC => (true, true, reader.byte()? as usize),
        other => return Err(BocError::InvalidMagic(other)),
    };
    if size == 0 || size > 4 {
        return Err(BocError::InvalidHeader(format!("invalid reference size {}", size)));
    }

    let offset_size = reader.byte()? as usize;
    if offset_size == 0 || offset_size > 8 {
        return Err(BocError::InvalidHeader(format!("invalid offset size {}", offset_size)));
    }

    let cell_count = reader.uint(size)?;
    let root_count = reader.uint(size)?;
    let absent_count = reader.uint(size)?;
    let total_size = reader.uint(offset_size)?;

    if root_count == 0 {
        return Err(BocError::NoRoots);
    }
    if root_count > cell_count {
        return Err(BocError::InvalidHeader(format!(
            "{} roots declared for {} cells",
            root_count, cell_count
        )));
    }
    if absent_count != 0 {
        return Err(BocError::AbsentCells);
    }

    let roots = if magic == BOC_GENERIC_MAGIC {
        (0..root_count)
            .map(|_| reader.uint(size))
            .collect::<Result<Vec<_>, _>>()?
    } else {
        // Legacy layouts carry no root list; the first cell is the root.
        if root_count != 1 {
            return Err(BocError::InvalidHeader(format!(
                "legacy layout with {} roots",
                root_count
            )));
        }
        vec![0]
    };

    if has_index {
        reader.take(cell_count.saturating_mul(offset_size))?;
    }

    let cells_start = reader.pos;
    let mut raw_cells = Vec::with_capacity(cell_count.min(bytes.len()));
    for index in 0..cell_count {
        raw_cells.push(read_raw_cell(&mut reader, index, size, cell_count)?);
    }
    if reader.pos - cells_start != total_size {
        return Err(BocError::InvalidHeader(format!(
            "cell data is {} bytes, header declares {}",
            reader.pos - cells_start,
            total_size
        )));
    }

    if has_crc {
        let computed = crc32c(&bytes[..reader.pos]);
        let stored = u32::from_le_bytes(
            reader
                .take(4)?
                .try_into()
                .map_err(|_| BocError::UnexpectedEof { offset: bytes.len() })?,
        );
        if stored != computed {
            return Err(BocError::ChecksumMismatch { stored, computed });
        }
    }
    if reader.pos != bytes.len() {
        return Err(BocError::TrailingBytes(bytes.len() - reader.pos));
    }

    // References always point forward, so building from the back resolves
    // every child before its parents.
    let mut built: Vec<Option<Arc<Cell>>> = vec![None; cell_count];
    for index in (0..cell_count).rev() {
        let raw = &raw_cells[index];
        let refs = raw
            .refs
            .iter()
            .map(|child| built[*child].clone())
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| BocError::InvalidCell {
                index,
                reason: "unresolved reference".to_string(),
            })?;
        let cell = Cell::with_descriptor(
            raw.data.to_vec(),
            raw.bit_len,
            refs,
            raw.exotic,
            raw.level_mask,
        )
        .map_err(|e: CellError| BocError::InvalidCell {
            index,
            reason: e.to_string(),
        })?;
        built[index] = Some(Arc::new(cell));
    }

    roots
        .into_iter()
        .map(|root| {
            built
                .get(root)
                .cloned()
                .flatten()
                .ok_or_else(|| BocError::InvalidHeader(format!("root index {} out of range", root)))
        })
        .collect()
}

fn read_raw_cell<'a>(
    reader: &mut Reader<'a>,
    index: usize,
    size: usize,
    cell_count: usize,
) -> Result<RawCell<'a>, BocError> {
    let invalid = |reason: String| BocError::InvalidCell { index, reason };

    let d1 = reader.byte()?;
    let d2 = reader.byte()?;
    let ref_count = (d1 & 0x07) as usize;
    let exotic = d1 & 0x08 != 0;
    let with_hashes = d1 & 0x10 != 0;
    let level_mask = d1 >> 5;

    if ref_count == 7 {
        return Err(BocError::AbsentCells);
    }
    if ref_count > MAX_CELL_REFS {
        return Err(invalid(format!("{} references", ref_count)));
    }

    if with_hashes {
        let hash_count = level_mask.count_ones() as usize + 1;
        reader.take(hash_count * (32 + 2))?;
    }

    let byte_len = (d2 as usize).div_ceil(2);
    let data = reader.take(byte_len)?;
    let bit_len = if d2 % 2 == 0 {
        byte_len * 8
    } else {
        let last = data[byte_len - 1];
        if last == 0 {
            return Err(invalid("missing completion tag".to_string()));
        }
        byte_len * 8 - 1 - last.trailing_zeros() as usize
    };

    let mut refs = Vec::with_capacity(ref_count);
    for _ in 0..ref_count {
        let child = reader.uint(size)?;
        if child <= index || child >= cell_count {
            return Err(invalid(format!("reference to cell #{}", child)));
        }
        refs.push(child);
    }

    Ok(RawCell {
        data,
        bit_len,
        refs,
        exotic,
        level_mask,
    })
}

/// Serialize a single-root tree. Identical subtrees are stored once and every
/// parent precedes its children.
pub fn serialize_boc(root: &Arc<Cell>) -> Vec<u8> {
    let mut memo = HashMap::new();
    let mut index_of: HashMap<[u8; 32], usize> = HashMap::new();
    let mut post_order: Vec<Arc<Cell>> = Vec::new();
    visit(root, &mut memo, &mut index_of, &mut post_order);

    // Reverse post-order is a topological order with the root first.
    post_order.reverse();
    let count = post_order.len();
    for (position, cell) in post_order.iter().enumerate() {
        let (hash, _) = hash_with_memo(cell, &mut memo);
        index_of.insert(hash, position);
    }

    let size = bytes_needed(count as u64);
    let mut cells = Vec::new();
    for cell in &post_order {
        cells.push(cell.d1());
        cells.push(cell.d2());
        cells.extend_from_slice(&cell.augmented_data());
        for child in cell.refs() {
            let (hash, _) = hash_with_memo(child, &mut memo);
            let index = index_of.get(&hash).copied().unwrap_or_default();
            cells.extend_from_slice(&(index as u64).to_be_bytes()[8 - size..]);
        }
    }
    let offset_size = bytes_needed(cells.len() as u64);

    let mut out = Vec::with_capacity(cells.len() + 32);
    out.extend_from_slice(&BOC_GENERIC_MAGIC.to_be_bytes());
    out.push(0x40 | size as u8);
    out.push(offset_size as u8);
    out.extend_from_slice(&(count as u64).to_be_bytes()[8 - size..]);
    out.extend_from_slice(&1u64.to_be_bytes()[8 - size..]);
    out.extend_from_slice(&0u64.to_be_bytes()[8 - size..]);
    out.extend_from_slice(&(cells.len() as u64).to_be_bytes()[8 - offset_size..]);
    out.extend_from_slice(&0u64.to_be_bytes()[8 - size..]);
    out.extend_from_slice(&cells);
    let crc = crc32c(&out);
    out.extend_from_slice(&crc.to_le_bytes());
    out
}

fn visit(
    cell: &Arc<Cell>,
    memo: &mut HashMap<*const Cell, ([u8; 32], u16)>,
    seen: &mut HashMap<[u8; 32], usize>,
    post_order: &mut Vec<Arc<Cell>>,
) {
    let (hash, _) = hash_with_memo(cell, memo);
    if seen.contains_key(&hash) {
        return;
    }
    seen.insert(hash, 0);
    for child in cell.refs() {
        visit(child, memo, seen, post_order);
    }
    post_order.push(cell.clone());
}

fn bytes_needed(value: u64) -> usize {
    (((64 - value.leading_zeros()) as usize).div_ceil(8)).max(1)
}
