// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use std::fmt;

use crate::utils::crc16;

const TAG_BOUNCEABLE: u8 = 0x11;
const TAG_NON_BOUNCEABLE: u8 = 0x51;
const TAG_TEST_ONLY: u8 = 0x80;

/// Standard internal address (`addr_std`): workchain plus 256-bit account id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StdAddress {
    pub workchain: i8,
    pub hash: [u8; 32],
}

/// Flags carried by the user-friendly form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FriendlyFlags {
    pub bounceable: bool,
    pub test_only: bool,
}

impl Default for FriendlyFlags {
    fn default() -> Self {
        Self {
            bounceable: true,
            test_only: false,
        }
    }
}

impl StdAddress {
    pub fn new(workchain: i8, hash: [u8; 32]) -> Self {
        Self { workchain, hash }
    }

    /// 48-character user-friendly form: tag, workchain, hash and CRC16,
    /// base64 encoded (url-safe alphabet).
    pub fn to_friendly(&self, flags: FriendlyFlags) -> String {
        let mut tag = if flags.bounceable {
            TAG_BOUNCEABLE
        } else {
            TAG_NON_BOUNCEABLE
        };
        if flags.test_only {
            tag |= TAG_TEST_ONLY;
        }

        let mut buf = [0u8; 36];
        buf[0] = tag;
        buf[1] = self.workchain as u8;
        buf[2..34].copy_from_slice(&self.hash);
        let crc = crc16(&buf[..34]);
        buf[34..].copy_from_slice(&crc.to_be_bytes());
        URL_SAFE.encode(buf)
    }
}

/// Canonical text: bounceable, mainnet, url-safe user-friendly form.
impl fmt::Display for StdAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_friendly(FriendlyFlags::default()))
    }
}

/// Variable-length internal address (`addr_var`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VarAddress {
    pub workchain: i32,
    pub bit_len: usize,
    pub data: Vec<u8>,
}

/// External address (`addr_extern`), up to 511 bits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExternalAddress {
    pub bit_len: usize,
    pub data: Vec<u8>,
}

/// Any non-empty `MsgAddress`; `addr_none` is represented by its absence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MsgAddress {
    Std(StdAddress),
    Var(VarAddress),
    External(ExternalAddress),
}

impl MsgAddress {
    pub fn is_internal(&self) -> bool {
        !matches!(self, MsgAddress::External(_))
    }
}

impl From<StdAddress> for MsgAddress {
    fn from(address: StdAddress) -> Self {
        MsgAddress::Std(address)
    }
}

impl fmt::Display for MsgAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MsgAddress::Std(address) => address.fmt(f),
            MsgAddress::Var(address) => {
                write!(f, "{}:{}", address.workchain, hex::encode(&address.data))
            }
            MsgAddress::External(address) => {
                write!(f, "External<{}:{}>", address.bit_len, hex::encode(&address.data))
            }
        }
    }
}
