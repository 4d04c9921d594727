// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Handler for the `/v1/decode` endpoint.
//!
//! Runs the full pipeline over one encoded bag of cells and returns both the
//! canonical value and its rendering in the requested notation.

use crate::pipeline::{Notation, PipelineError, PipelineOutput, RenderError, render};
use crate::state::AppState;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

#[derive(Debug, Deserialize)]
pub struct DecodeRequest {
    pub input: String,
    #[serde(default)]
    pub format: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DecodeResponse {
    pub decoded: bool,
    pub strategy: Option<&'static str>,
    pub passes: usize,
    pub format: Notation,
    pub value: Value,
    pub rendered: String,
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Format(RenderError),

    #[error("Failed to render output: {0}")]
    Render(RenderError),

    #[error("Decode task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl IntoResponse for DecodeError {
    fn into_response(self) -> Response {
        let status = match &self {
            DecodeError::Pipeline(e) if !e.is_internal() => StatusCode::BAD_REQUEST,
            DecodeError::Format(_) => StatusCode::BAD_REQUEST,
            DecodeError::Pipeline(_) | DecodeError::Render(_) | DecodeError::Task(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Decode request failed");
        } else {
            tracing::debug!(error = %self, "Rejected decode input");
        }

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

/// Handler for POST /v1/decode
///
/// The pipeline is CPU-bound, so it runs on the blocking pool.
pub async fn post_decode(
    State(state): State<AppState>,
    Json(request): Json<DecodeRequest>,
) -> Result<Json<DecodeResponse>, DecodeError> {
    let notation = match request.format.as_deref() {
        Some(format) => format.parse().map_err(DecodeError::Format)?,
        None => state.default_notation,
    };

    let pipeline = state.pipeline.clone();
    let input = request.input;
    let output = tokio::task::spawn_blocking(move || pipeline.run(&input)).await??;

    respond(output, notation).map(Json)
}

fn respond(output: PipelineOutput, notation: Notation) -> Result<DecodeResponse, DecodeError> {
    let rendered = render(&output, notation).map_err(DecodeError::Render)?;
    Ok(DecodeResponse {
        decoded: output.decoded(),
        strategy: output.strategy,
        passes: output.passes,
        format: notation,
        value: output.value,
        rendered,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::ExpansionLimitExceeded;
    use crate::pipeline::InputFormatError;

    #[test]
    fn test_input_errors_are_bad_requests() {
        let err = DecodeError::Pipeline(PipelineError::InputFormat(InputFormatError::Empty));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_expansion_limit_is_internal() {
        let err = DecodeError::Pipeline(PipelineError::from(ExpansionLimitExceeded::Nodes { budget: 3 }));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_unknown_format_is_bad_request() {
        let err = DecodeError::Format(RenderError::UnknownNotation("toml".to_string()));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
