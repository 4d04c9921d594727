// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

/// HTTP logger middleware that logs request method, path, status code, body
/// size and duration under the `http` target.
///
/// - DEBUG for 2xx/3xx responses (visible with the `http` log level)
/// - WARN for 4xx responses
/// - ERROR for 5xx responses
///
/// Log format: "METHOD /path STATUS DURATIONms"
/// Example: "POST /v1/decode 200 3ms"
pub async fn http_logger_middleware(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let request_bytes = req
        .headers()
        .get(axum::http::header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(0);
    let start = Instant::now();

    let response = next.run(req).await;

    let duration_ms = start.elapsed().as_millis();
    let status_code = response.status().as_u16();

    match status_code {
        200..=399 => tracing::debug!(
            target: "http",
            method = %method,
            path = %path,
            status = status_code,
            request_bytes,
            duration_ms,
            "{} {} {} {}ms", method, path, status_code, duration_ms
        ),
        400..=499 => tracing::warn!(
            target: "http",
            method = %method,
            path = %path,
            status = status_code,
            request_bytes,
            duration_ms,
            "{} {} {} {}ms", method, path, status_code, duration_ms
        ),
        _ => tracing::error!(
            target: "http",
            method = %method,
            path = %path,
            status = status_code,
            request_bytes,
            duration_ms,
            "{} {} {} {}ms", method, path, status_code, duration_ms
        ),
    }

    response
}
