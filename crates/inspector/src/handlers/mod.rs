// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

pub mod decode;
pub mod health;
pub mod metrics;
pub mod schemas;
pub mod version;
