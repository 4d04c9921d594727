// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Text in, canonical value out.

pub mod input;
pub mod render;
pub mod session;

pub use input::{InputFormatError, decode_base64_or_hex};
pub use render::{Notation, RenderError, render};
pub use session::{DecodeSession, SessionState};

use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

use crate::cell::Cell;
use crate::decode::{
    CanonicalValue, CanonicalizeError, ExpansionLimitExceeded, PayloadExpander, StrategyDecoder,
    canonicalize,
};
use crate::consts::{EXPANSION_NODE_SLACK, EXPANSION_NODES_PER_UNIT};
use crate::metrics::{EXPANSION_PASSES, PIPELINE_RUNS, STRATEGY_MATCHES};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error(transparent)]
    InputFormat(#[from] InputFormatError),

    #[error(transparent)]
    ExpansionLimit(#[from] ExpansionLimitExceeded),

    #[error("Internal invariant violated: {0}")]
    Invariant(#[from] CanonicalizeError),
}

impl PipelineError {
    /// Faults in the pipeline itself rather than in the caller's input.
    pub fn is_internal(&self) -> bool {
        !matches!(self, PipelineError::InputFormat(_))
    }
}

/// Everything a host needs to present one decoded input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineOutput {
    #[serde(skip)]
    pub root: Arc<Cell>,
    /// Strategy that decoded the root cell; `None` when it stayed opaque.
    pub strategy: Option<&'static str>,
    pub passes: usize,
    pub value: CanonicalValue,
}

impl PipelineOutput {
    pub fn decoded(&self) -> bool {
        self.strategy.is_some()
    }
}

/// Upper bound on expansion passes for a tree: every pass consumes at least
/// one cell or one bit of inline data.
pub fn pass_cap(root: &Arc<Cell>) -> usize {
    Cell::count_distinct(root) + Cell::count_distinct_bits(root) + 1
}

/// Upper bound on expanded nodes for a tree. Shared cells are counted once
/// here, so deeply shared inputs run out of budget instead of growing the
/// output exponentially.
pub fn node_budget(root: &Arc<Cell>) -> usize {
    (Cell::count_distinct(root) + Cell::count_distinct_bits(root))
        .saturating_mul(EXPANSION_NODES_PER_UNIT)
        .saturating_add(EXPANSION_NODE_SLACK)
}

/// Decoder plus run-wide limits.
#[derive(Debug, Clone)]
pub struct Pipeline {
    decoder: Arc<StrategyDecoder>,
    max_passes: Option<usize>,
}

impl Pipeline {
    pub fn new(decoder: Arc<StrategyDecoder>) -> Self {
        Self {
            decoder,
            max_passes: None,
        }
    }

    /// Lower the per-tree pass bound to at most `max_passes`.
    pub fn with_max_passes(mut self, max_passes: Option<usize>) -> Self {
        self.max_passes = max_passes;
        self
    }

    pub fn decoder(&self) -> &Arc<StrategyDecoder> {
        &self.decoder
    }

    pub fn run(&self, input: &str) -> Result<PipelineOutput, PipelineError> {
        let result = decode_base64_or_hex(input)
            .map_err(PipelineError::from)
            .and_then(|root| self.run_cell(root));
        record_outcome(&result);
        result
    }

    /// Run on an already parsed root cell.
    pub fn run_cell(&self, root: Arc<Cell>) -> Result<PipelineOutput, PipelineError> {
        let (decoded, strategy) = self.decoder.decode_traced(&root);
        STRATEGY_MATCHES
            .with_label_values(&[strategy.unwrap_or("none")])
            .inc();

        let cap = match self.max_passes {
            Some(max) => pass_cap(&root).min(max),
            None => pass_cap(&root),
        };
        let expansion = PayloadExpander::new(&self.decoder)
            .with_node_budget(node_budget(&root))
            .expand_to_fixed_point(decoded, cap)?;
        EXPANSION_PASSES.observe(expansion.passes as f64);

        let value = canonicalize(&expansion.value)?;
        tracing::debug!(
            strategy = strategy.unwrap_or("none"),
            passes = expansion.passes,
            "Pipeline run complete"
        );

        Ok(PipelineOutput {
            root,
            strategy,
            passes: expansion.passes,
            value,
        })
    }
}

/// Decode `input` with `decoder` using the default pass bound.
pub fn run_pipeline(input: &str, decoder: &Arc<StrategyDecoder>) -> Result<PipelineOutput, PipelineError> {
    Pipeline::new(decoder.clone()).run(input)
}

fn record_outcome(result: &Result<PipelineOutput, PipelineError>) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(e) if e.is_internal() => {
            tracing::error!(error = %e, "Pipeline failed");
            "internal_error"
        }
        Err(e) => {
            tracing::warn!(error = %e, "Rejected input");
            "input_error"
        }
    };
    PIPELINE_RUNS.with_label_values(&[outcome]).inc();
}
