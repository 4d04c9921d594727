// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Ordered strategy selection with fallback.

use std::sync::Arc;
use thiserror::Error;

use super::abi::SchemaStrategy;
use super::block::BlockFormatStrategy;
use super::schema::Schema;
use super::value::DecodedValue;
use crate::cell::{Cell, CellError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StrategyError {
    #[error("Exotic cells are not decoded")]
    Exotic,

    #[error("No {strategy} layout matches")]
    NoMatch { strategy: &'static str },

    #[error(transparent)]
    Cell(#[from] CellError),
}

/// One way of interpreting a cell.
pub trait Strategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn decode(&self, cell: &Arc<Cell>) -> Result<DecodedValue, StrategyError>;
}

/// Tries its strategies in order and keeps the first success.
pub struct StrategyDecoder {
    strategies: Vec<Box<dyn Strategy>>,
}

impl StrategyDecoder {
    pub fn new(strategies: Vec<Box<dyn Strategy>>) -> Self {
        Self { strategies }
    }

    /// Schema messages first, then the built-in block shapes.
    pub fn standard(schema: Schema) -> Self {
        Self::new(vec![
            Box::new(SchemaStrategy::new(schema)),
            Box::new(BlockFormatStrategy),
        ])
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn decode(&self, cell: &Arc<Cell>) -> DecodedValue {
        self.decode_traced(cell).0
    }

    /// Decode and report which strategy matched, if any.
    pub fn decode_traced(&self, cell: &Arc<Cell>) -> (DecodedValue, Option<&'static str>) {
        for strategy in &self.strategies {
            match strategy.decode(cell) {
                Ok(value) => return (value, Some(strategy.name())),
                Err(e) => {
                    tracing::debug!(strategy = strategy.name(), error = %e, "Strategy did not match");
                }
            }
        }
        (DecodedValue::Undecoded(cell.clone()), None)
    }
}

impl std::fmt::Debug for StrategyDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyDecoder")
            .field("strategies", &self.strategy_names())
            .finish()
    }
}
