// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Value types shared by the cell reader, the decoders and the canonicalizer.

pub mod address;
pub mod integer;

pub use address::{ExternalAddress, FriendlyFlags, MsgAddress, StdAddress, VarAddress};
pub use integer::{Integer, MAX_SAFE_INTEGER};
