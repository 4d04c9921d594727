// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::ConfigError;
use serde::Deserialize;
use std::net::IpAddr;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind the HTTP server to
    ///
    /// Env: CELL_INSPECTOR_SERVER_BIND_HOST
    /// Default: 127.0.0.1
    pub bind_host: String,

    /// Port to bind the HTTP server to
    ///
    /// Env: CELL_INSPECTOR_SERVER_PORT
    /// Default: 8080
    pub port: u16,

    /// Maximum accepted request body in bytes
    ///
    /// Env: CELL_INSPECTOR_SERVER_MAX_BODY_SIZE
    /// Default: 1048576
    pub max_body_size: usize,
}

fn default_port() -> u16 {
    8080
}

impl ServerConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::ValidateError(
                "Server port cannot be 0".to_string(),
            ));
        }

        if self.bind_host.parse::<IpAddr>().is_err() {
            return Err(ConfigError::ValidateError(format!(
                "Invalid bind host '{}': must be an IP address",
                self.bind_host
            )));
        }

        if self.max_body_size == 0 {
            return Err(ConfigError::ValidateError(
                "Maximum body size cannot be 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_host: "127.0.0.1".to_string(),
            port: default_port(),
            max_body_size: 1024 * 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_server_config() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.bind_host, "127.0.0.1");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_port_zero() {
        let config = ServerConfig {
            port: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_ipv6_host() {
        let config = ServerConfig {
            bind_host: "::1".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok())
    }

    #[test]
    fn test_validate_hostname_rejected() {
        let config = ServerConfig {
            bind_host: "localhost".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err())
    }
}
