// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

mod get_schemas;

pub use get_schemas::{MessageSummary, SchemasResponse, get_schemas};
