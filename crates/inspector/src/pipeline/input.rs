// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Text input decoding: base64 first, hex as the fallback.

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD};
use std::sync::Arc;
use thiserror::Error;

use crate::cell::{BocError, Cell, parse_boc};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputFormatError {
    #[error("Input is empty")]
    Empty,

    #[error("Input is not a bag of cells in base64 ({base64}) or hex ({hex})")]
    Unrecognized { base64: String, hex: String },
}

/// Decode base64 or hex text into the first root of the bag of cells it
/// carries. Whitespace anywhere in the text is ignored.
pub fn decode_base64_or_hex(text: &str) -> Result<Arc<Cell>, InputFormatError> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Err(InputFormatError::Empty);
    }

    let base64 = match from_base64(&compact) {
        Ok(root) => return Ok(root),
        Err(reason) => reason,
    };
    let hex = match from_hex(&compact) {
        Ok(root) => return Ok(root),
        Err(reason) => reason,
    };

    Err(InputFormatError::Unrecognized { base64, hex })
}

fn from_base64(text: &str) -> Result<Arc<Cell>, String> {
    let bytes = [STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD]
        .iter()
        .find_map(|engine| engine.decode(text).ok())
        .ok_or_else(|| "invalid base64".to_string())?;
    first_root(&bytes).map_err(|e| e.to_string())
}

fn from_hex(text: &str) -> Result<Arc<Cell>, String> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    let bytes = hex::decode(digits).map_err(|e| e.to_string())?;
    first_root(&bytes).map_err(|e| e.to_string())
}

fn first_root(bytes: &[u8]) -> Result<Arc<Cell>, BocError> {
    parse_boc(bytes)?.into_iter().next().ok_or(BocError::NoRoots)
}
