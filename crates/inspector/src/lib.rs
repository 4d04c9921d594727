// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

pub mod app;
pub mod cell;
pub mod consts;
pub mod decode;
pub mod handlers;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod routes;
pub mod state;
pub mod types;
pub mod utils;
