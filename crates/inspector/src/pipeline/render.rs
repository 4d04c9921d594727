// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Text rendering of pipeline output.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::PipelineOutput;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Unknown output format '{0}'. Must be one of: yaml, json, plain")]
    UnknownNotation(String),

    #[error("Failed to render YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Notation {
    #[default]
    Yaml,
    Json,
    Plain,
}

impl FromStr for Notation {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(Notation::Yaml),
            "json" => Ok(Notation::Json),
            "plain" | "text" => Ok(Notation::Plain),
            _ => Err(RenderError::UnknownNotation(s.to_string())),
        }
    }
}

impl fmt::Display for Notation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Notation::Yaml => "yaml",
            Notation::Json => "json",
            Notation::Plain => "plain",
        })
    }
}

/// Render stored output; never re-runs the pipeline.
///
/// Plain notation prints strings verbatim, dumps an undecoded root as its
/// cell tree and falls back to compact JSON for everything else.
pub fn render(output: &PipelineOutput, notation: Notation) -> Result<String, RenderError> {
    Ok(match notation {
        Notation::Yaml => serde_yaml::to_string(&output.value)?,
        Notation::Json => serde_json::to_string_pretty(&output.value)?,
        Notation::Plain => match &output.value {
            _ if !output.decoded() => output.root.to_string(),
            Value::String(s) => s.clone(),
            other => serde_json::to_string(other)?,
        },
    })
}
