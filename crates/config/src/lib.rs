// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

mod args;
mod decode;
mod error;
mod log;
mod metrics;
mod server;

pub use args::{Args, Command};
pub use decode::{DecodeConfig, VALID_FORMATS};
pub use error::ConfigError;
pub use log::LogConfig;
pub use metrics::{MetricsConfig, MetricsError};
pub use server::ServerConfig;

use serde::de::DeserializeOwned;
use std::path::Path;

/// Prefix shared by every environment variable the inspector reads
pub const ENV_PREFIX: &str = "CELL_INSPECTOR_";

#[derive(Debug, Clone, Default)]
pub struct InspectorConfig {
    pub server: ServerConfig,
    pub log: LogConfig,
    pub metrics: MetricsConfig,
    pub decode: DecodeConfig,
}

impl InspectorConfig {
    /// Load every section from `CELL_INSPECTOR_<SECTION>_*` variables and validate.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            server: section("SERVER")?,
            log: section("LOG")?,
            metrics: section("METRICS")?,
            decode: section("DECODE")?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load variables from `path` (when it exists) before reading the environment.
    ///
    /// Variables already present in the process environment win over the file.
    pub fn from_env_file(path: &str) -> Result<Self, ConfigError> {
        if Path::new(path).is_file() {
            dotenv::from_filename(path).map_err(|source| ConfigError::EnvFileError {
                path: path.to_string(),
                source,
            })?;
        }
        Self::from_env()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.log.validate()?;
        self.metrics.validate()?;
        self.decode.validate()?;
        Ok(())
    }
}

fn section<T: DeserializeOwned>(name: &str) -> Result<T, ConfigError> {
    let prefix = format!("{}{}_", ENV_PREFIX, name);
    Ok(envy::prefixed(prefix).from_env::<T>()?)
}
