// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

mod post_decode;

pub use post_decode::{DecodeError, DecodeRequest, DecodeResponse, post_decode};
