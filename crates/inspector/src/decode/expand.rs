// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Recursive re-decoding of embedded cells and flattening of dictionaries.

use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use super::strategy::StrategyDecoder;
use super::value::DecodedValue;
use crate::cell::Cell;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExpansionLimitExceeded {
    #[error("Expansion did not reach a fixed point within {passes} passes")]
    Passes { passes: usize },

    #[error("Expanded value grew past {budget} nodes")]
    Nodes { budget: usize },
}

/// Result of driving the expander to its fixed point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    pub value: DecodedValue,
    /// Expansion passes run, including the final pass that changed nothing.
    pub passes: usize,
}

/// Strategy outcome for one distinct cell.
struct Decoded {
    // Keeps the cell alive so its address is not reused while cached.
    _cell: Arc<Cell>,
    value: Option<DecodedValue>,
    nodes: usize,
}

/// Rewrites embedded cells and dictionaries until nothing changes.
///
/// Cells shared by several parents are decoded once; every copy still counts
/// against the node budget.
pub struct PayloadExpander<'a> {
    decoder: &'a StrategyDecoder,
    node_budget: usize,
    nodes: usize,
    decoded: HashMap<*const Cell, Decoded>,
}

impl<'a> PayloadExpander<'a> {
    pub fn new(decoder: &'a StrategyDecoder) -> Self {
        Self {
            decoder,
            node_budget: usize::MAX,
            nodes: 0,
            decoded: HashMap::new(),
        }
    }

    /// Fail once the expanded value holds more than `budget` nodes.
    pub fn with_node_budget(mut self, budget: usize) -> Self {
        self.node_budget = budget;
        self
    }

    /// Run one expansion pass. Returns the new value and whether anything
    /// changed.
    pub fn expand(&mut self, value: DecodedValue) -> Result<(DecodedValue, bool), ExpansionLimitExceeded> {
        Ok(match value {
            DecodedValue::EmbeddedContainer(cell) => {
                let decoder = self.decoder;
                let decoded = self
                    .decoded
                    .entry(Arc::as_ptr(&cell))
                    .or_insert_with(|| decode_cell(decoder, &cell));
                let Some(parsed) = &decoded.value else {
                    return Ok((DecodedValue::EmbeddedContainer(cell), false));
                };

                // The container node becomes a record holding `raw` and `parsed`.
                self.nodes += decoded.nodes + 1;
                if self.nodes > self.node_budget {
                    return Err(ExpansionLimitExceeded::Nodes {
                        budget: self.node_budget,
                    });
                }
                let record = DecodedValue::Record(vec![
                    ("raw".to_string(), DecodedValue::Undecoded(cell.clone())),
                    ("parsed".to_string(), parsed.clone()),
                ]);
                (record, true)
            }
            DecodedValue::CompositeMap(entries) => {
                let mut fields = Vec::with_capacity(entries.len());
                for (key, value) in entries {
                    fields.push((key.to_string(), self.expand(value)?.0));
                }
                (DecodedValue::Record(fields), true)
            }
            DecodedValue::Record(fields) => {
                let mut changed = false;
                let mut expanded = Vec::with_capacity(fields.len());
                for (name, value) in fields {
                    let (value, child_changed) = self.expand(value)?;
                    changed |= child_changed;
                    expanded.push((name, value));
                }
                (DecodedValue::Record(expanded), changed)
            }
            DecodedValue::Sequence(items) => {
                let mut changed = false;
                let mut expanded = Vec::with_capacity(items.len());
                for value in items {
                    let (value, child_changed) = self.expand(value)?;
                    changed |= child_changed;
                    expanded.push(value);
                }
                (DecodedValue::Sequence(expanded), changed)
            }
            value @ (DecodedValue::Primitive(_)
            | DecodedValue::Blob(_)
            | DecodedValue::Address(_)
            | DecodedValue::Undecoded(_)) => (value, false),
        })
    }

    /// Repeat [`Self::expand`] until nothing changes, failing once more than
    /// `max_passes` passes would be needed or the node budget runs out.
    pub fn expand_to_fixed_point(
        &mut self,
        mut value: DecodedValue,
        max_passes: usize,
    ) -> Result<Expansion, ExpansionLimitExceeded> {
        self.nodes = value.node_count();
        if self.nodes > self.node_budget {
            return Err(ExpansionLimitExceeded::Nodes {
                budget: self.node_budget,
            });
        }

        let mut passes = 0;
        loop {
            if passes >= max_passes {
                return Err(ExpansionLimitExceeded::Passes { passes });
            }
            passes += 1;
            let (next, changed) = self.expand(value)?;
            tracing::trace!(pass = passes, changed, nodes = self.nodes, "Expansion pass");
            value = next;
            if !changed {
                return Ok(Expansion { value, passes });
            }
        }
    }
}

fn decode_cell(decoder: &StrategyDecoder, cell: &Arc<Cell>) -> Decoded {
    let value = decoder.decode(cell);
    let (value, nodes) = if value.is_undecoded() {
        (None, 0)
    } else {
        let nodes = value.node_count();
        (Some(value), nodes)
    };
    Decoded {
        _cell: cell.clone(),
        value,
        nodes,
    }
}
