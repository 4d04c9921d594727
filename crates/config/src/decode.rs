// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::ConfigError;
use serde::Deserialize;
use std::path::Path;

/// Output notations accepted by `default_format`
pub const VALID_FORMATS: [&str; 3] = ["yaml", "json", "plain"];

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DecodeConfig {
    /// Extra message schema file (JSON), loaded after the built-in schema
    ///
    /// Env: CELL_INSPECTOR_DECODE_SCHEMA_PATH
    /// Default: unset
    pub schema_path: Option<String>,

    /// Load the built-in message schema
    ///
    /// Env: CELL_INSPECTOR_DECODE_BUILTIN_SCHEMA
    /// Default: true
    pub builtin_schema: bool,

    /// Notation used when a request does not pick one
    ///
    /// Env: CELL_INSPECTOR_DECODE_DEFAULT_FORMAT
    /// Valid values: yaml, json, plain
    /// Default: yaml
    pub default_format: String,

    /// Hard ceiling on expansion passes, applied on top of the per-tree bound
    ///
    /// Env: CELL_INSPECTOR_DECODE_MAX_EXPANSION_PASSES
    /// Default: unset (bound by the cell count of the input)
    pub max_expansion_passes: Option<usize>,
}

impl DecodeConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_FORMATS.contains(&self.default_format.as_str()) {
            return Err(ConfigError::ValidateError(format!(
                "Invalid default format '{}'. Must be one of: {}",
                self.default_format,
                VALID_FORMATS.join(", ")
            )));
        }

        if let Some(path) = &self.schema_path
            && !Path::new(path).is_file()
        {
            return Err(ConfigError::ValidateError(format!(
                "Schema file '{}' does not exist",
                path
            )));
        }

        if self.max_expansion_passes == Some(0) {
            return Err(ConfigError::ValidateError(
                "Max expansion passes must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            schema_path: None,
            builtin_schema: true,
            default_format: "yaml".to_string(),
            max_expansion_passes: None,
        }
    }
}
