// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub strategies: Vec<String>,
    pub schema_messages: usize,
}

pub async fn get_health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let response = HealthResponse {
        status: "ok".to_string(),
        strategies: state
            .pipeline
            .decoder()
            .strategy_names()
            .into_iter()
            .map(str::to_string)
            .collect(),
        schema_messages: state.schema.messages.len(),
    };

    (StatusCode::OK, Json(response))
}
