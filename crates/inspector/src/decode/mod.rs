// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Decoding strategies, payload expansion and canonicalization.

pub mod abi;
pub mod block;
pub mod canonical;
pub mod expand;
pub mod schema;
pub mod strategy;
pub mod value;

pub use abi::SchemaStrategy;
pub use block::BlockFormatStrategy;
pub use canonical::{CanonicalValue, CanonicalizeError, canonicalize, opaque_hex};
pub use expand::{Expansion, ExpansionLimitExceeded, PayloadExpander};
pub use schema::{FieldLayout, FieldType, MessageLayout, Schema, SchemaError};
pub use strategy::{Strategy, StrategyDecoder, StrategyError};
pub use value::{DecodedValue, Primitive};
