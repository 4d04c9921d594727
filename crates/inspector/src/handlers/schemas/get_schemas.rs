// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::state::AppState;
use axum::{extract::State, response::Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageSummary {
    pub name: String,
    pub opcode: String,
    pub opcode_bits: usize,
    pub fields: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SchemasResponse {
    pub messages: Vec<MessageSummary>,
}

/// Handler for GET /v1/schemas
///
/// Lists the message layouts the schema strategy recognises.
pub async fn get_schemas(State(state): State<AppState>) -> Json<SchemasResponse> {
    let messages = state
        .schema
        .messages
        .iter()
        .map(|m| MessageSummary {
            name: m.name.clone(),
            opcode: format!("0x{:0width$x}", m.opcode, width = m.opcode_bits.div_ceil(4)),
            opcode_bits: m.opcode_bits,
            fields: m.fields.iter().map(|f| f.name.clone()).collect(),
        })
        .collect();

    Json(SchemasResponse { messages })
}
