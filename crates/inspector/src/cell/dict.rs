// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! TL-B `Hashmap n X` / `HashmapE n X` dictionaries.
//!
//! ```text
//! hm_edge#_ {n:#} {X:Type} {l:#} {m:#} label:(HmLabel ~l n)
//!           {n = (~m) + l} node:(HashmapNode m X) = Hashmap n X;
//! hml_short$0  len:(Unary ~n) s:(n * Bit)
//! hml_long$10  n:(#<= m) s:(n * Bit)
//! hml_same$11  v:Bit n:(#<= m)
//! ```

use primitive_types::U512;
use std::sync::Arc;

use super::{Cell, CellBuilder, CellError, CellSlice};
use crate::consts::{MAX_DICT_ENTRIES, MAX_DICT_KEY_BITS};
use crate::types::Integer;

/// Width of a `#<= m` field.
fn bits_for(m: usize) -> usize {
    (usize::BITS - m.leading_zeros()) as usize
}

/// Walk a non-empty dictionary rooted at `root` and collect its entries in
/// enumeration order (ascending keys). `value_fn` must consume the whole
/// leaf value.
pub fn parse_dict<V, F>(
    root: &Arc<Cell>,
    key_bits: usize,
    mut value_fn: F,
) -> Result<Vec<(Integer, V)>, CellError>
where
    F: FnMut(&mut CellSlice<'_>) -> Result<V, CellError>,
{
    if key_bits > MAX_DICT_KEY_BITS {
        return Err(CellError::IntegerTooWide {
            bits: key_bits,
            max: MAX_DICT_KEY_BITS,
        });
    }
    let mut entries = Vec::new();
    let mut prefix = Vec::with_capacity(key_bits);
    walk(root, key_bits, &mut prefix, &mut entries, &mut value_fn)?;
    Ok(entries)
}

fn walk<V, F>(
    cell: &Cell,
    m: usize,
    prefix: &mut Vec<bool>,
    entries: &mut Vec<(Integer, V)>,
    value_fn: &mut F,
) -> Result<(), CellError>
where
    F: FnMut(&mut CellSlice<'_>) -> Result<V, CellError>,
{
    let mut slice = cell.as_slice();
    let label = load_label(&mut slice, m)?;
    let depth = prefix.len();
    prefix.extend_from_slice(&label);
    let remaining = m - label.len();

    if remaining == 0 {
        if entries.len() >= MAX_DICT_ENTRIES {
            return Err(CellError::InvalidDict(format!(
                "more than {} entries",
                MAX_DICT_ENTRIES
            )));
        }
        let value = value_fn(&mut slice)?;
        slice.ensure_empty()?;
        entries.push((key_from_bits(prefix), value));
    } else {
        let left = slice.load_ref()?;
        let right = slice.load_ref()?;
        slice.ensure_empty().map_err(|_| {
            CellError::InvalidDict(format!("fork at key depth {} carries extra data", prefix.len()))
        })?;
        for (bit, child) in [(false, left), (true, right)] {
            prefix.push(bit);
            walk(&child, remaining - 1, prefix, entries, value_fn)?;
            prefix.pop();
        }
    }

    prefix.truncate(depth);
    Ok(())
}

fn load_label(slice: &mut CellSlice<'_>, m: usize) -> Result<Vec<bool>, CellError> {
    let too_long = |len: usize| CellError::InvalidDict(format!("label of {} bits exceeds {}", len, m));

    if !slice.load_bit()? {
        let len = slice.load_unary()?;
        if len > m {
            return Err(too_long(len));
        }
        (0..len).map(|_| slice.load_bit()).collect()
    } else if !slice.load_bit()? {
        let len = slice.load_uint(bits_for(m))? as usize;
        if len > m {
            return Err(too_long(len));
        }
        (0..len).map(|_| slice.load_bit()).collect()
    } else {
        let bit = slice.load_bit()?;
        let len = slice.load_uint(bits_for(m))? as usize;
        if len > m {
            return Err(too_long(len));
        }
        Ok(vec![bit; len])
    }
}

fn key_from_bits(bits: &[bool]) -> Integer {
    let magnitude = bits.iter().fold(U512::zero(), |acc, bit| {
        let shifted = acc << 1;
        if *bit { shifted | U512::one() } else { shifted }
    });
    Integer::unsigned(magnitude)
}

impl CellSlice<'_> {
    /// `HashmapE n X`: an absent dictionary yields no entries.
    pub fn load_dict<V, F>(&mut self, key_bits: usize, value_fn: F) -> Result<Vec<(Integer, V)>, CellError>
    where
        F: FnMut(&mut CellSlice<'_>) -> Result<V, CellError>,
    {
        match self.load_maybe_ref()? {
            Some(root) => parse_dict(&root, key_bits, value_fn),
            None => Ok(Vec::new()),
        }
    }
}

/// Serialize `entries` as a `Hashmap n X`, picking the shortest label form
/// at every edge. Returns `None` for an empty map.
pub fn build_dict<V, F>(
    key_bits: usize,
    entries: &[(Integer, V)],
    mut store_value: F,
) -> Result<Option<Cell>, CellError>
where
    F: FnMut(&mut CellBuilder, &V) -> Result<(), CellError>,
{
    if entries.is_empty() {
        return Ok(None);
    }
    if key_bits > MAX_DICT_KEY_BITS {
        return Err(CellError::IntegerTooWide {
            bits: key_bits,
            max: MAX_DICT_KEY_BITS,
        });
    }

    let mut keyed = Vec::with_capacity(entries.len());
    for (key, value) in entries {
        if key.is_negative() || key.magnitude().bits() > key_bits {
            return Err(CellError::ValueOverflow { bits: key_bits });
        }
        let bits: Vec<bool> = (0..key_bits)
            .rev()
            .map(|i| key.magnitude().bit(i))
            .collect();
        keyed.push((bits, value));
    }
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    if keyed.windows(2).any(|pair| pair[0].0 == pair[1].0) {
        return Err(CellError::InvalidDict("duplicate key".to_string()));
    }

    let refs: Vec<(&[bool], &V)> = keyed.iter().map(|(bits, value)| (bits.as_slice(), *value)).collect();
    build_edge(&refs, key_bits, &mut store_value).map(Some)
}

fn build_edge<V, F>(entries: &[(&[bool], &V)], m: usize, store_value: &mut F) -> Result<Cell, CellError>
where
    F: FnMut(&mut CellBuilder, &V) -> Result<(), CellError>,
{
    let first = entries[0].0;
    let common = entries
        .iter()
        .map(|(bits, _)| bits.iter().zip(first).take_while(|(a, b)| a == b).count())
        .min()
        .unwrap_or(0);
    let label = &first[..common];

    let mut builder = CellBuilder::new();
    store_label(&mut builder, label, m)?;

    if common == m {
        store_value(&mut builder, entries[0].1)?;
    } else {
        let split = entries.partition_point(|(bits, _)| !bits[common]);
        let left = build_edge(&strip(&entries[..split], common + 1), m - common - 1, store_value)?;
        let right = build_edge(&strip(&entries[split..], common + 1), m - common - 1, store_value)?;
        builder.store_ref(Arc::new(left))?;
        builder.store_ref(Arc::new(right))?;
    }
    builder.build()
}

fn strip<'a, V>(group: &[(&'a [bool], &'a V)], skip: usize) -> Vec<(&'a [bool], &'a V)> {
    group.iter().map(|(bits, value)| (&bits[skip..], *value)).collect()
}

fn store_label(builder: &mut CellBuilder, label: &[bool], m: usize) -> Result<(), CellError> {
    let n = label.len();
    let k = bits_for(m);
    let short = 2 * n + 2;
    let long = 2 + k + n;
    let same = if label.windows(2).all(|pair| pair[0] == pair[1]) {
        Some(3 + k)
    } else {
        None
    };

    if same.is_some_and(|same| same < short && same < long) {
        builder.store_uint(0b11, 2)?;
        builder.store_bit(label.first().copied().unwrap_or(false))?;
        builder.store_uint(n as u64, k)?;
    } else if long < short {
        builder.store_uint(0b10, 2)?;
        builder.store_uint(n as u64, k)?;
        for bit in label {
            builder.store_bit(*bit)?;
        }
    } else {
        builder.store_bit(false)?;
        for _ in 0..n {
            builder.store_bit(true)?;
        }
        builder.store_bit(false)?;
        for bit in label {
            builder.store_bit(*bit)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_u16(slice: &mut CellSlice<'_>) -> Result<u64, CellError> {
        slice.load_uint(16)
    }

    /// Two entries, 8-bit keys: {1: 10, 2: 20}, encoded by hand.
    fn hand_built_dict() -> Arc<Cell> {
        let leaf = |label_bit: bool, value: u64| {
            let mut b = CellBuilder::new();
            b.store_bit(false).unwrap(); // hml_short
            b.store_uint(0b10, 2).unwrap(); // unary 1
            b.store_bit(label_bit).unwrap();
            b.store_uint(value, 16).unwrap();
            Arc::new(b.build().unwrap())
        };
        let mut root = CellBuilder::new();
        // hml_same, bit 0, length 6 in 4 bits
        root.store_uint(0b11, 2).unwrap();
        root.store_bit(false).unwrap();
        root.store_uint(6, 4).unwrap();
        root.store_ref(leaf(true, 10)).unwrap();
        root.store_ref(leaf(false, 20)).unwrap();
        Arc::new(root.build().unwrap())
    }

    #[test]
    fn test_parse_hand_built_dict() {
        let entries = parse_dict(&hand_built_dict(), 8, load_u16).unwrap();
        assert_eq!(
            entries,
            vec![(Integer::from(1u64), 10), (Integer::from(2u64), 20)]
        );
    }

    #[test]
    fn test_parse_long_label() {
        let mut b = CellBuilder::new();
        b.store_uint(0b10, 2).unwrap();
        b.store_uint(8, 4).unwrap();
        b.store_uint(0xa5, 8).unwrap();
        b.store_uint(7, 16).unwrap();
        let root = Arc::new(b.build().unwrap());
        let entries = parse_dict(&root, 8, load_u16).unwrap();
        assert_eq!(entries, vec![(Integer::from(0xa5u64), 7)]);
    }

    #[test]
    fn test_label_longer_than_key_is_rejected() {
        let mut b = CellBuilder::new();
        b.store_uint(0b11, 2).unwrap();
        b.store_bit(true).unwrap();
        b.store_uint(9, 4).unwrap();
        let root = Arc::new(b.build().unwrap());
        assert!(matches!(
            parse_dict(&root, 8, load_u16),
            Err(CellError::InvalidDict(_))
        ));
    }

    #[test]
    fn test_leftover_value_bits_are_rejected() {
        let root = hand_built_dict();
        let result = parse_dict(&root, 8, |slice| slice.load_uint(8));
        assert!(matches!(result, Err(CellError::TrailingData { bits: 8, refs: 0 })));
    }

    #[test]
    fn test_build_then_parse_preserves_ascending_order() {
        let entries = vec![
            (Integer::from(300u64), 3u64),
            (Integer::from(5u64), 1),
            (Integer::from(17u64), 2),
        ];
        let root = build_dict(32, &entries, |b, v| b.store_uint(*v, 16).map(|_| ()))
            .unwrap()
            .unwrap();
        let parsed = parse_dict(&Arc::new(root), 32, load_u16).unwrap();
        assert_eq!(
            parsed,
            vec![
                (Integer::from(5u64), 1),
                (Integer::from(17u64), 2),
                (Integer::from(300u64), 3)
            ]
        );
    }

    #[test]
    fn test_build_matches_hand_encoding() {
        let entries = vec![(Integer::from(1u64), 10u64), (Integer::from(2u64), 20)];
        let root = build_dict(8, &entries, |b, v| b.store_uint(*v, 16).map(|_| ()))
            .unwrap()
            .unwrap();
        assert_eq!(root.repr_hash(), hand_built_dict().repr_hash());
    }

    #[test]
    fn test_build_rejects_duplicates_and_wide_keys() {
        let store = |b: &mut CellBuilder, v: &u64| b.store_uint(*v, 8).map(|_| ());
        let dup = vec![(Integer::from(1u64), 1u64), (Integer::from(1u64), 2)];
        assert!(build_dict(8, &dup, store).is_err());
        let wide = vec![(Integer::from(256u64), 1u64)];
        assert!(build_dict(8, &wide, store).is_err());
        assert_eq!(build_dict(8, &[], store).unwrap(), None);
    }

    #[test]
    fn test_load_dict_absent() {
        let cell = Cell::new(vec![0x00], 1, vec![]).unwrap();
        let mut slice = cell.as_slice();
        assert!(slice.load_dict(8, load_u16).unwrap().is_empty());
        assert!(slice.is_empty());
    }

    #[test]
    fn test_shared_forks_are_capped() {
        // Every fork points both ways at the same child, so 17 cells
        // describe 2^17 keys.
        let mut leaf = CellBuilder::new();
        leaf.store_uint(0b00, 2).unwrap();
        leaf.store_uint(7, 16).unwrap();
        let mut node = Arc::new(leaf.build().unwrap());
        for _ in 0..17 {
            let mut fork = CellBuilder::new();
            fork.store_uint(0b00, 2).unwrap();
            fork.store_ref(node.clone()).unwrap();
            fork.store_ref(node).unwrap();
            node = Arc::new(fork.build().unwrap());
        }

        assert!(matches!(
            parse_dict(&node, 17, load_u16),
            Err(CellError::InvalidDict(_))
        ));
    }
}
