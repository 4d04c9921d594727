// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error(
        "Invalid Prometheus prefix '{0}': must start with [a-zA-Z_:] and contain only [a-zA-Z0-9_:]"
    )]
    InvalidPrometheusPrefix(String),
}

/// Configuration for Prometheus metrics
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Enable or disable metrics collection
    ///
    /// Env: CELL_INSPECTOR_METRICS_ENABLED
    pub enabled: bool,

    /// Prometheus metric name prefix (default: "cell_inspector")
    ///
    /// Env: CELL_INSPECTOR_METRICS_PROMETHEUS_PREFIX
    pub prometheus_prefix: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            prometheus_prefix: "cell_inspector".to_string(),
        }
    }
}

impl MetricsConfig {
    pub fn validate(&self) -> Result<(), MetricsError> {
        // Must match [a-zA-Z_:][a-zA-Z0-9_:]*
        let mut chars = self.prometheus_prefix.chars();
        if let Some(first_char) = chars.next() {
            if !first_char.is_ascii_alphabetic() && first_char != '_' && first_char != ':' {
                return Err(MetricsError::InvalidPrometheusPrefix(
                    self.prometheus_prefix.clone(),
                ));
            }

            if chars.any(|ch| !ch.is_ascii_alphanumeric() && ch != '_' && ch != ':') {
                return Err(MetricsError::InvalidPrometheusPrefix(
                    self.prometheus_prefix.clone(),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_prefix(prefix: &str) -> MetricsConfig {
        MetricsConfig {
            enabled: true,
            prometheus_prefix: prefix.to_string(),
        }
    }

    #[test]
    fn test_default_metrics_config() {
        let config = MetricsConfig::default();
        assert!(!config.enabled);
        assert_eq!(config.prometheus_prefix, "cell_inspector");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_valid_prometheus_prefix_with_underscore() {
        assert!(with_prefix("my_app_metrics").validate().is_ok());
    }

    #[test]
    fn test_valid_prometheus_prefix_with_colon() {
        assert!(with_prefix("app:metrics").validate().is_ok());
    }

    #[test]
    fn test_valid_prometheus_prefix_starting_with_underscore() {
        assert!(with_prefix("_metrics").validate().is_ok());
    }

    #[test]
    fn test_empty_prometheus_prefix_allowed() {
        assert!(with_prefix("").validate().is_ok());
    }

    #[test]
    fn test_invalid_prometheus_prefix_starting_with_number() {
        assert!(with_prefix("123metrics").validate().is_err());
    }

    #[test]
    fn test_invalid_prometheus_prefix_with_hyphen() {
        assert!(with_prefix("my-metrics").validate().is_err());
    }

    #[test]
    fn test_invalid_prometheus_prefix_with_special_chars() {
        assert!(with_prefix("my.metrics").validate().is_err());
    }
}
