// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use axum::{Json, http::StatusCode, response::IntoResponse};
use prometheus::proto::{Metric, MetricFamily};
use serde_json::{Value, json};

/// Handler for GET /metrics (Prometheus text exposition format)
pub async fn get_metrics() -> impl IntoResponse {
    match crate::metrics::gather_metrics() {
        Ok(metrics) => (
            StatusCode::OK,
            [("Content-Type", "text/plain; version=0.0.4")],
            metrics,
        )
            .into_response(),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            format!("Failed to gather metrics: {}", e),
        )
            .into_response(),
    }
}

/// Handler for GET /metrics.json
pub async fn get_metrics_json() -> impl IntoResponse {
    let families = match crate::metrics::gather_metric_families() {
        Ok(families) => families,
        Err(e) => {
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("Failed to gather metrics: {}", e),
            )
                .into_response();
        }
    };

    let body: Vec<Value> = families.iter().map(family_json).collect();
    (StatusCode::OK, Json(body)).into_response()
}

fn family_json(family: &MetricFamily) -> Value {
    json!({
        "name": family.get_name(),
        "help": family.get_help(),
        "type": format!("{:?}", family.get_field_type()),
        "metrics": family.get_metric().iter().map(metric_json).collect::<Vec<_>>(),
    })
}

fn metric_json(metric: &Metric) -> Value {
    let labels: serde_json::Map<String, Value> = metric
        .get_label()
        .iter()
        .map(|l| (l.get_name().to_string(), Value::from(l.get_value())))
        .collect();

    let value = if metric.has_counter() {
        json!(metric.get_counter().get_value())
    } else if metric.has_histogram() {
        let h = metric.get_histogram();
        json!({
            "sample_count": h.get_sample_count(),
            "sample_sum": h.get_sample_sum(),
        })
    } else {
        Value::Null
    };

    json!({ "labels": labels, "value": value })
}
