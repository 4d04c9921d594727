// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use config::InspectorConfig;
use std::sync::Arc;
use thiserror::Error;

use crate::decode::{Schema, SchemaError, StrategyDecoder};
use crate::pipeline::{Notation, Pipeline, RenderError};
use crate::routes::RouteRegistry;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("Failed to load message schema: {0}")]
    Schema(#[from] SchemaError),

    #[error("Invalid default format: {0}")]
    Format(#[from] RenderError),
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<InspectorConfig>,
    pub schema: Arc<Schema>,
    pub pipeline: Arc<Pipeline>,
    pub default_notation: Notation,
    pub route_registry: RouteRegistry,
}

impl AppState {
    pub fn new(config: InspectorConfig) -> Result<Self, StateError> {
        let schema = Schema::from_config(&config.decode)?;
        let default_notation = config.decode.default_format.parse()?;
        let decoder = Arc::new(StrategyDecoder::standard(schema.clone()));
        let pipeline = Pipeline::new(decoder).with_max_passes(config.decode.max_expansion_passes);

        tracing::debug!(
            messages = schema.messages.len(),
            builtin = config.decode.builtin_schema,
            schema_path = ?config.decode.schema_path,
            "Message schema loaded"
        );

        Ok(Self {
            config: Arc::new(config),
            schema: Arc::new(schema),
            pipeline: Arc::new(pipeline),
            default_notation,
            route_registry: RouteRegistry::new(),
        })
    }
}
