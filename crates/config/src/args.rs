// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to .env file (e.g., .env.local)
    #[arg(short, long, default_value = ".env")]
    pub env_file: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Run the HTTP decode service
    Serve,

    /// Decode a single base64 or hex encoded bag of cells
    Decode {
        /// Encoded input, or "-" to read it from stdin
        input: String,

        /// Output notation: yaml, json or plain
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Decode every line read from stdin, printing only the latest result
    Watch {
        /// Output notation: yaml, json or plain
        #[arg(short, long)]
        format: Option<String>,
    },

    /// List the message layouts known to the schema decoder
    Schemas,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
