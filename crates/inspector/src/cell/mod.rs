// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! TON cells: the container format every decoder in this crate reads.
//!
//! A cell holds up to 1023 data bits and up to four ordered references to
//! child cells. Cells are immutable once built and shared through `Arc`, so
//! a bag of cells that references the same subtree twice yields a DAG.

pub mod boc;
pub mod builder;
pub mod dict;
pub mod slice;

pub use boc::{BocError, parse_boc, serialize_boc};
pub use builder::CellBuilder;
pub use dict::{build_dict, parse_dict};
pub use slice::CellSlice;

use sp_crypto_hashing::sha2_256;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::consts::{MAX_CELL_BITS, MAX_CELL_DEPTH, MAX_CELL_REFS};
use crate::utils::bits_to_hex_tagged;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CellError {
    #[error("Cell overflow: {bits} bits exceeds the limit of {MAX_CELL_BITS}")]
    TooManyBits { bits: usize },

    #[error("Cell overflow: {refs} references exceeds the limit of {MAX_CELL_REFS}")]
    TooManyRefs { refs: usize },

    #[error("Cell tree too deep: depth {depth} exceeds the limit of {MAX_CELL_DEPTH}")]
    TooDeep { depth: u16 },

    #[error("Not enough bits: needed {needed}, {remaining} remaining")]
    NotEnoughBits { needed: usize, remaining: usize },

    #[error("Not enough references: needed 1, none remaining")]
    NotEnoughRefs,

    #[error("Integer width {bits} exceeds the supported maximum of {max}")]
    IntegerTooWide { bits: usize, max: usize },

    #[error("Value does not fit in {bits} bits")]
    ValueOverflow { bits: usize },

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Text is not byte aligned: {bits} bits left")]
    UnalignedText { bits: usize },

    #[error("Text is not valid UTF-8")]
    InvalidUtf8,

    #[error("Unexpected tag 0x{found:x}, expected 0x{expected:x}")]
    TagMismatch { expected: u64, found: u64 },

    #[error("Invalid dictionary: {0}")]
    InvalidDict(String),

    #[error("Trailing data: {bits} bits and {refs} references left unread")]
    TrailingData { bits: usize, refs: usize },
}

#[derive(Clone, PartialEq, Eq)]
pub struct Cell {
    data: Vec<u8>,
    bit_len: usize,
    refs: Vec<Arc<Cell>>,
    exotic: bool,
    level_mask: u8,
    depth: u16,
}

impl Cell {
    /// Build an ordinary cell. Bits past `bit_len` in the last byte are cleared.
    pub fn new(data: Vec<u8>, bit_len: usize, refs: Vec<Arc<Cell>>) -> Result<Self, CellError> {
        Self::with_descriptor(data, bit_len, refs, false, 0)
    }

    pub(crate) fn with_descriptor(
        mut data: Vec<u8>,
        bit_len: usize,
        refs: Vec<Arc<Cell>>,
        exotic: bool,
        level_mask: u8,
    ) -> Result<Self, CellError> {
        if bit_len > MAX_CELL_BITS {
            return Err(CellError::TooManyBits { bits: bit_len });
        }
        if refs.len() > MAX_CELL_REFS {
            return Err(CellError::TooManyRefs { refs: refs.len() });
        }
        let depth = refs
            .iter()
            .map(|child| child.depth + 1)
            .max()
            .unwrap_or(0);
        if depth > MAX_CELL_DEPTH {
            return Err(CellError::TooDeep { depth });
        }
        if data.len() * 8 < bit_len {
            return Err(CellError::NotEnoughBits {
                needed: bit_len,
                remaining: data.len() * 8,
            });
        }

        data.truncate(bit_len.div_ceil(8));
        if bit_len % 8 != 0
            && let Some(last) = data.last_mut()
        {
            *last &= 0xffu8 << (8 - bit_len % 8);
        }

        Ok(Self {
            data,
            bit_len,
            refs,
            exotic,
            level_mask,
            depth,
        })
    }

    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            bit_len: 0,
            refs: Vec::new(),
            exotic: false,
            level_mask: 0,
            depth: 0,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    pub fn refs(&self) -> &[Arc<Cell>] {
        &self.refs
    }

    pub fn is_exotic(&self) -> bool {
        self.exotic
    }

    pub fn level_mask(&self) -> u8 {
        self.level_mask
    }

    pub fn is_empty(&self) -> bool {
        self.bit_len == 0 && self.refs.is_empty()
    }

    /// Start reading this cell from its first bit and reference.
    pub fn as_slice(&self) -> CellSlice<'_> {
        CellSlice::new(self)
    }

    /// First descriptor byte: reference count, exotic flag and level mask.
    pub fn d1(&self) -> u8 {
        self.refs.len() as u8 + if self.exotic { 8 } else { 0 } + self.level_mask * 32
    }

    /// Second descriptor byte: `floor(bits / 8) + ceil(bits / 8)`.
    pub fn d2(&self) -> u8 {
        (self.bit_len / 8 + self.bit_len.div_ceil(8)) as u8
    }

    /// Data bytes with the completion tag applied to a partial last byte.
    pub fn augmented_data(&self) -> Vec<u8> {
        let mut data = self.data.clone();
        if self.bit_len % 8 != 0
            && let Some(last) = data.last_mut()
        {
            *last |= 0x80 >> (self.bit_len % 8);
        }
        data
    }

    /// Maximum distance to a leaf; leaves have depth 0.
    pub fn depth(&self) -> u16 {
        self.depth
    }

    /// Representation hash: SHA-256 over descriptors, augmented data, child
    /// depths and child hashes.
    ///
    /// Exotic cells are hashed with the same formula; the result identifies
    /// them structurally but is not their on-chain higher-level hash.
    pub fn repr_hash(&self) -> [u8; 32] {
        let mut memo = HashMap::new();
        hash_with_memo(self, &mut memo).0
    }

    /// Number of distinct cells reachable from `root`, `root` included.
    pub fn count_distinct(root: &Arc<Cell>) -> usize {
        let mut seen = HashSet::new();
        let mut stack = vec![root.clone()];
        while let Some(cell) = stack.pop() {
            if seen.insert(Arc::as_ptr(&cell)) {
                stack.extend(cell.refs.iter().cloned());
            }
        }
        seen.len()
    }

    /// Total data bits over the distinct cells reachable from `root`.
    pub fn count_distinct_bits(root: &Arc<Cell>) -> usize {
        let mut seen = HashSet::new();
        let mut stack = vec![root.clone()];
        let mut bits = 0;
        while let Some(cell) = stack.pop() {
            if seen.insert(Arc::as_ptr(&cell)) {
                bits += cell.bit_len;
                stack.extend(cell.refs.iter().cloned());
            }
        }
        bits
    }

    /// A cell reached again through another parent prints as a single
    /// `x{…} …` line without its children.
    fn fmt_tree(
        &self,
        f: &mut fmt::Formatter<'_>,
        indent: usize,
        seen: &mut HashSet<*const Cell>,
    ) -> fmt::Result {
        write!(
            f,
            "{:indent$}x{{{}}}",
            "",
            bits_to_hex_tagged(&self.data, self.bit_len),
            indent = indent
        )?;
        if self.refs.is_empty() {
            return Ok(());
        }
        if !seen.insert(self as *const Cell) {
            return write!(f, " …");
        }
        for child in &self.refs {
            writeln!(f)?;
            child.fmt_tree(f, indent + 1, seen)?;
        }
        Ok(())
    }
}

pub(crate) fn hash_with_memo(
    cell: &Cell,
    memo: &mut HashMap<*const Cell, ([u8; 32], u16)>,
) -> ([u8; 32], u16) {
    let key = cell as *const Cell;
    if let Some(cached) = memo.get(&key) {
        return *cached;
    }

    let children: Vec<([u8; 32], u16)> = cell
        .refs
        .iter()
        .map(|child| hash_with_memo(child, memo))
        .collect();

    let mut repr = Vec::with_capacity(2 + cell.data.len() + children.len() * 34);
    repr.push(cell.d1());
    repr.push(cell.d2());
    repr.extend_from_slice(&cell.augmented_data());
    for (_, depth) in &children {
        repr.extend_from_slice(&depth.to_be_bytes());
    }
    for (hash, _) in &children {
        repr.extend_from_slice(hash);
    }

    let depth = children
        .iter()
        .map(|(_, depth)| depth + 1)
        .max()
        .unwrap_or(0);
    let result = (sha2_256(&repr), depth);
    memo.insert(key, result);
    result
}

/// Tree dump in the `x{…}` notation, one cell per line, children indented
/// by one space.
impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, 0, &mut HashSet::new())
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cell(x{{{}}}, refs: {})",
            bits_to_hex_tagged(&self.data, self.bit_len),
            self.refs.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clears_unused_bits() {
        let cell = Cell::new(vec![0xff, 0xff], 12, vec![]).unwrap();
        assert_eq!(cell.data(), &[0xff, 0xf0]);
        assert_eq!(cell.bit_len(), 12);
    }

    #[test]
    fn test_new_truncates_extra_bytes() {
        let cell = Cell::new(vec![0xab, 0xcd, 0xef], 8, vec![]).unwrap();
        assert_eq!(cell.data(), &[0xab]);
    }

    #[test]
    fn test_limits() {
        assert_eq!(
            Cell::new(vec![0; 128], 1024, vec![]),
            Err(CellError::TooManyBits { bits: 1024 })
        );
        let child = Arc::new(Cell::empty());
        assert_eq!(
            Cell::new(vec![], 0, vec![child; 5]),
            Err(CellError::TooManyRefs { refs: 5 })
        );
    }

    #[test]
    fn test_descriptors() {
        let cell = Cell::new(vec![0xab, 0x80], 9, vec![Arc::new(Cell::empty())]).unwrap();
        assert_eq!(cell.d1(), 1);
        assert_eq!(cell.d2(), 3);
        assert_eq!(cell.augmented_data(), vec![0xab, 0xc0]);
    }

    #[test]
    fn test_depth() {
        let leaf = Arc::new(Cell::empty());
        let mid = Arc::new(Cell::new(vec![], 0, vec![leaf.clone()]).unwrap());
        let root = Cell::new(vec![], 0, vec![mid, leaf]).unwrap();
        assert_eq!(root.depth(), 2);
    }

    #[test]
    fn test_count_distinct_shares_subtrees() {
        let shared = Arc::new(Cell::new(vec![0x01], 8, vec![]).unwrap());
        let root = Arc::new(Cell::new(vec![], 0, vec![shared.clone(), shared]).unwrap());
        assert_eq!(Cell::count_distinct(&root), 2);
        assert_eq!(Cell::count_distinct_bits(&root), 8);
    }

    #[test]
    fn test_repr_hash_is_structural() {
        let a = Cell::new(vec![0x12], 8, vec![]).unwrap();
        let b = Cell::new(vec![0x12], 8, vec![]).unwrap();
        let c = Cell::new(vec![0x13], 8, vec![]).unwrap();
        assert_eq!(a.repr_hash(), b.repr_hash());
        assert_ne!(a.repr_hash(), c.repr_hash());
    }

    #[test]
    fn test_display_prints_shared_subtree_once() {
        let leaf = Arc::new(Cell::new(vec![0xff], 8, vec![]).unwrap());
        let shared = Arc::new(Cell::new(vec![0x12], 8, vec![leaf]).unwrap());
        let root = Cell::new(vec![], 0, vec![shared.clone(), shared]).unwrap();
        assert_eq!(root.to_string(), "x{}\n x{12}\n  x{FF}\n x{12} …");
    }

    #[test]
    fn test_display_tree() {
        let child = Arc::new(Cell::new(vec![0x80], 1, vec![]).unwrap());
        let root = Cell::new(vec![0xab, 0xcd], 16, vec![child]).unwrap();
        assert_eq!(root.to_string(), "x{ABCD}\n x{C_}");
        assert_eq!(Cell::empty().to_string(), "x{}");
    }
}
