// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use lazy_static::lazy_static;
use prometheus::proto::MetricFamily;
use prometheus::{
    Counter, CounterVec, Encoder, Histogram, HistogramOpts, HistogramVec, Opts, Registry,
    TextEncoder,
};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetricsExportError {
    #[error("Metrics registry is not initialized")]
    NotInitialized,

    #[error("Failed to encode metrics: {0}")]
    Encode(#[from] prometheus::Error),

    #[error("Encoded metrics are not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

lazy_static! {
    static ref REGISTRY: Mutex<Option<Registry>> = Mutex::new(None);

    // Created unregistered; `init` attaches them to the prefixed registry.
    pub static ref HTTP_REQUESTS: Counter = Counter::new(
        "http_requests",
        "Total number of HTTP requests"
    )
    .expect("Failed to create http_requests counter");

    pub static ref HTTP_REQUEST_SUCCESS: Counter = Counter::new(
        "http_request_success",
        "Number of successful HTTP requests"
    )
    .expect("Failed to create http_request_success counter");

    pub static ref HTTP_REQUEST_ERROR: Counter = Counter::new(
        "http_request_error",
        "Number of HTTP request errors"
    )
    .expect("Failed to create http_request_error counter");

    pub static ref REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "request_duration_seconds",
            "Duration of HTTP requests in seconds"
        ).buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 2.0]),
        &["method", "route", "status_code"]
    )
    .expect("Failed to create request_duration_seconds histogram");

    pub static ref RESPONSE_SIZE_BYTES: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "response_size_bytes",
            "Size of HTTP responses in bytes"
        ).buckets(vec![100.0, 500.0, 1000.0, 5000.0, 10000.0, 50000.0, 100000.0, 500000.0, 1000000.0]),
        &["method", "route", "status_code"]
    )
    .expect("Failed to create response_size_bytes histogram");

    pub static ref PIPELINE_RUNS: CounterVec = CounterVec::new(
        Opts::new("pipeline_runs", "Decode pipeline runs by outcome"),
        &["outcome"]
    )
    .expect("Failed to create pipeline_runs counter");

    pub static ref STRATEGY_MATCHES: CounterVec = CounterVec::new(
        Opts::new("strategy_matches", "Root cells decoded, by matching strategy"),
        &["strategy"]
    )
    .expect("Failed to create strategy_matches counter");

    pub static ref EXPANSION_PASSES: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "expansion_passes",
            "Expansion passes needed to reach a fixed point"
        ).buckets(vec![1.0, 2.0, 3.0, 4.0, 6.0, 8.0, 16.0, 32.0])
    )
    .expect("Failed to create expansion_passes histogram");
}

/// Register every metric with a registry using `prefix`. Later calls are
/// no-ops.
pub fn init(prefix: &str) -> Result<(), prometheus::Error> {
    let mut guard = REGISTRY.lock().unwrap_or_else(PoisonError::into_inner);
    if guard.is_some() {
        return Ok(());
    }

    let registry = Registry::new_custom(Some(prefix.to_string()), None)?;
    registry.register(Box::new(HTTP_REQUESTS.clone()))?;
    registry.register(Box::new(HTTP_REQUEST_SUCCESS.clone()))?;
    registry.register(Box::new(HTTP_REQUEST_ERROR.clone()))?;
    registry.register(Box::new(REQUEST_DURATION_SECONDS.clone()))?;
    registry.register(Box::new(RESPONSE_SIZE_BYTES.clone()))?;
    registry.register(Box::new(PIPELINE_RUNS.clone()))?;
    registry.register(Box::new(STRATEGY_MATCHES.clone()))?;
    registry.register(Box::new(EXPANSION_PASSES.clone()))?;

    *guard = Some(registry);
    Ok(())
}

pub fn gather_metric_families() -> Result<Vec<MetricFamily>, MetricsExportError> {
    let guard = REGISTRY.lock().unwrap_or_else(PoisonError::into_inner);
    let registry = guard.as_ref().ok_or(MetricsExportError::NotInitialized)?;
    Ok(registry.gather())
}

/// Gather all metrics as Prometheus text format
pub fn gather_metrics() -> Result<String, MetricsExportError> {
    let families = gather_metric_families()?;
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}
