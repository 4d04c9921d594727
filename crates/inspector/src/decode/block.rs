// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Built-in record shapes from the block layout.
//!
//! ```text
//! message$_ {X:Type} info:CommonMsgInfo
//!   init:(Maybe (Either StateInit ^StateInit)) body:(Either X ^X) = Message X;
//! int_msg_info$0 ihr_disabled:Bool bounce:Bool bounced:Bool
//!   src:MsgAddressInt dest:MsgAddressInt value:CurrencyCollection
//!   ihr_fee:Grams fwd_fee:Grams created_lt:uint64 created_at:uint32 = CommonMsgInfo;
//! ext_in_msg_info$10 src:MsgAddressExt dest:MsgAddressInt import_fee:Grams = CommonMsgInfo;
//! ext_out_msg_info$11 src:MsgAddressInt dest:MsgAddressExt
//!   created_lt:uint64 created_at:uint32 = CommonMsgInfo;
//! _ split_depth:(Maybe (## 5)) special:(Maybe TickTock)
//!   code:(Maybe ^Cell) data:(Maybe ^Cell) library:(HashmapE 256 SimpleLib) = StateInit;
//! ```

use std::sync::Arc;

use super::abi::remainder;
use super::strategy::{Strategy, StrategyError};
use super::value::DecodedValue;
use crate::cell::{Cell, CellError, CellSlice};
use crate::consts::TEXT_COMMENT_OPCODE;
use crate::types::MsgAddress;

type Shape = fn(&mut CellSlice<'_>) -> Result<DecodedValue, CellError>;

const SHAPES: [(&str, Shape); 3] = [
    ("text_comment", text_comment),
    ("message", message),
    ("state_init", state_init),
];

pub struct BlockFormatStrategy;

impl Strategy for BlockFormatStrategy {
    fn name(&self) -> &'static str {
        "block"
    }

    fn decode(&self, cell: &Arc<Cell>) -> Result<DecodedValue, StrategyError> {
        if cell.is_exotic() {
            return Err(StrategyError::Exotic);
        }

        for (name, shape) in SHAPES {
            let mut slice = cell.as_slice();
            match shape(&mut slice).and_then(|value| slice.ensure_empty().map(|_| value)) {
                Ok(value) => return Ok(value),
                Err(e) => tracing::trace!(shape = name, error = %e, "Block shape did not match"),
            }
        }
        Err(StrategyError::NoMatch { strategy: "block" })
    }
}

fn field(name: &str, value: DecodedValue) -> (String, DecodedValue) {
    (name.to_string(), value)
}

fn text_comment(slice: &mut CellSlice<'_>) -> Result<DecodedValue, CellError> {
    let tag = slice.load_uint(32)?;
    if tag != TEXT_COMMENT_OPCODE as u64 {
        return Err(CellError::TagMismatch {
            expected: TEXT_COMMENT_OPCODE as u64,
            found: tag,
        });
    }
    let text = slice.load_snake_text()?;
    Ok(DecodedValue::typed_record("text_comment", vec![field("text", DecodedValue::text(text))]))
}

fn message(slice: &mut CellSlice<'_>) -> Result<DecodedValue, CellError> {
    let info = common_msg_info(slice)?;

    let init = if slice.load_bit()? {
        if slice.load_bit()? {
            DecodedValue::EmbeddedContainer(slice.load_ref()?)
        } else {
            state_init(slice)?
        }
    } else {
        DecodedValue::nil()
    };

    let body = if slice.load_bit()? {
        DecodedValue::EmbeddedContainer(slice.load_ref()?)
    } else {
        remainder(slice)?
    };

    Ok(DecodedValue::typed_record(
        "message",
        vec![field("info", info), field("init", init), field("body", body)],
    ))
}

fn common_msg_info(slice: &mut CellSlice<'_>) -> Result<DecodedValue, CellError> {
    if !slice.load_bit()? {
        let ihr_disabled = slice.load_bit()?;
        let bounce = slice.load_bit()?;
        let bounced = slice.load_bit()?;
        let src = load_int_address(slice, true)?;
        let dest = load_int_address(slice, false)?;
        let value = currency_collection(slice)?;
        let ihr_fee = slice.load_coins()?;
        let fwd_fee = slice.load_coins()?;
        let created_lt = slice.load_uint(64)?;
        let created_at = slice.load_uint(32)?;
        return Ok(DecodedValue::typed_record(
            "int_msg_info",
            vec![
                field("ihr_disabled", DecodedValue::bool(ihr_disabled)),
                field("bounce", DecodedValue::bool(bounce)),
                field("bounced", DecodedValue::bool(bounced)),
                field("src", src),
                field("dest", dest),
                field("value", value),
                field("ihr_fee", DecodedValue::integer(ihr_fee)),
                field("fwd_fee", DecodedValue::integer(fwd_fee)),
                field("created_lt", DecodedValue::integer(created_lt)),
                field("created_at", DecodedValue::integer(created_at)),
            ],
        ));
    }

    if !slice.load_bit()? {
        let src = load_ext_address(slice)?;
        let dest = load_int_address(slice, false)?;
        let import_fee = slice.load_coins()?;
        return Ok(DecodedValue::typed_record(
            "ext_in_msg_info",
            vec![
                field("src", src),
                field("dest", dest),
                field("import_fee", DecodedValue::integer(import_fee)),
            ],
        ));
    }

    let src = load_int_address(slice, true)?;
    let dest = load_ext_address(slice)?;
    let created_lt = slice.load_uint(64)?;
    let created_at = slice.load_uint(32)?;
    Ok(DecodedValue::typed_record(
        "ext_out_msg_info",
        vec![
            field("src", src),
            field("dest", dest),
            field("created_lt", DecodedValue::integer(created_lt)),
            field("created_at", DecodedValue::integer(created_at)),
        ],
    ))
}

/// `MsgAddressInt`. Outgoing messages leave `src` empty for the node to
/// fill in, so `allow_none` accepts `addr_none` there.
fn load_int_address(slice: &mut CellSlice<'_>, allow_none: bool) -> Result<DecodedValue, CellError> {
    match slice.load_address()? {
        Some(address) if address.is_internal() => Ok(DecodedValue::Address(address)),
        None if allow_none => Ok(DecodedValue::nil()),
        other => Err(CellError::InvalidAddress(format!(
            "expected an internal address, found {}",
            other.map_or("addr_none".to_string(), |a| a.to_string())
        ))),
    }
}

/// `MsgAddressExt`: `addr_none` or `addr_extern`.
fn load_ext_address(slice: &mut CellSlice<'_>) -> Result<DecodedValue, CellError> {
    match slice.load_address()? {
        None => Ok(DecodedValue::nil()),
        Some(address @ MsgAddress::External(_)) => Ok(DecodedValue::Address(address)),
        Some(other) => Err(CellError::InvalidAddress(format!(
            "expected an external address, found {}",
            other
        ))),
    }
}

/// `currencies$_ grams:Grams other:ExtraCurrencyCollection`
fn currency_collection(slice: &mut CellSlice<'_>) -> Result<DecodedValue, CellError> {
    let grams = slice.load_coins()?;
    let other = slice.load_dict(32, |leaf| leaf.load_var_uint(5).map(DecodedValue::integer))?;
    Ok(DecodedValue::Record(vec![
        field("grams", DecodedValue::integer(grams)),
        field("other", DecodedValue::CompositeMap(other)),
    ]))
}

fn state_init(slice: &mut CellSlice<'_>) -> Result<DecodedValue, CellError> {
    let split_depth = if slice.load_bit()? {
        DecodedValue::integer(slice.load_uint(5)?)
    } else {
        DecodedValue::nil()
    };
    let special = if slice.load_bit()? {
        let tick = slice.load_bit()?;
        let tock = slice.load_bit()?;
        DecodedValue::Record(vec![
            field("tick", DecodedValue::bool(tick)),
            field("tock", DecodedValue::bool(tock)),
        ])
    } else {
        DecodedValue::nil()
    };
    let code = maybe_container(slice)?;
    let data = maybe_container(slice)?;
    let library = slice.load_dict(256, |leaf| {
        let public = leaf.load_bit()?;
        let root = leaf.load_ref()?;
        Ok(DecodedValue::Record(vec![
            field("public", DecodedValue::bool(public)),
            field("root", DecodedValue::EmbeddedContainer(root)),
        ]))
    })?;

    Ok(DecodedValue::typed_record(
        "state_init",
        vec![
            field("split_depth", split_depth),
            field("special", special),
            field("code", code),
            field("data", data),
            field("library", DecodedValue::CompositeMap(library)),
        ],
    ))
}

fn maybe_container(slice: &mut CellSlice<'_>) -> Result<DecodedValue, CellError> {
    Ok(slice
        .load_maybe_ref()?
        .map_or(DecodedValue::nil(), DecodedValue::EmbeddedContainer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellBuilder;
    use crate::types::{ExternalAddress, Integer, StdAddress};

    fn decode(cell: Cell) -> Result<DecodedValue, StrategyError> {
        BlockFormatStrategy.decode(&Arc::new(cell))
    }

    fn comment(text: &str) -> Cell {
        let mut b = CellBuilder::new();
        b.store_uint(0, 32).unwrap();
        b.store_snake_text(text).unwrap();
        b.build().unwrap()
    }

    fn type_of(value: &DecodedValue) -> Option<&DecodedValue> {
        value.field("@type")
    }

    #[test]
    fn test_text_comment() {
        let value = decode(comment("hello")).unwrap();
        assert_eq!(type_of(&value), Some(&DecodedValue::text("text_comment")));
        assert_eq!(value.field("text"), Some(&DecodedValue::text("hello")));
    }

    #[test]
    fn test_internal_message_with_ref_body() {
        let dest = StdAddress::new(0, [0x22; 32]);
        let body = Arc::new(comment("gm"));
        let mut b = CellBuilder::new();
        b.store_bit(false).unwrap(); // int_msg_info
        b.store_bit(true).unwrap(); // ihr_disabled
        b.store_bit(true).unwrap(); // bounce
        b.store_bit(false).unwrap(); // bounced
        b.store_address(None).unwrap();
        b.store_address(Some(&MsgAddress::Std(dest))).unwrap();
        b.store_coins(&Integer::from(5_000_000u64)).unwrap();
        b.store_bit(false).unwrap(); // no extra currencies
        b.store_coins(&Integer::zero()).unwrap();
        b.store_coins(&Integer::zero()).unwrap();
        b.store_uint(1, 64).unwrap();
        b.store_uint(1_700_000_000, 32).unwrap();
        b.store_bit(false).unwrap(); // no init
        b.store_bit(true).unwrap(); // body in ref
        b.store_ref(body.clone()).unwrap();

        let value = decode(b.build().unwrap()).unwrap();
        assert_eq!(type_of(&value), Some(&DecodedValue::text("message")));
        let info = value.field("info").unwrap();
        assert_eq!(type_of(info), Some(&DecodedValue::text("int_msg_info")));
        assert_eq!(info.field("src"), Some(&DecodedValue::nil()));
        assert_eq!(info.field("dest"), Some(&DecodedValue::Address(MsgAddress::Std(dest))));
        assert_eq!(
            info.field("value").and_then(|v| v.field("grams")),
            Some(&DecodedValue::integer(5_000_000u64))
        );
        assert_eq!(
            info.field("value").and_then(|v| v.field("other")),
            Some(&DecodedValue::CompositeMap(vec![]))
        );
        assert_eq!(value.field("init"), Some(&DecodedValue::nil()));
        assert_eq!(value.field("body"), Some(&DecodedValue::EmbeddedContainer(body)));
    }

    #[test]
    fn test_external_in_message_with_inline_state_init() {
        let dest = StdAddress::new(-1, [0x33; 32]);
        let code = Arc::new(Cell::new(vec![0xff, 0x00], 16, vec![]).unwrap());
        let mut b = CellBuilder::new();
        b.store_uint(0b10, 2).unwrap(); // ext_in_msg_info
        b.store_address(None).unwrap();
        b.store_address(Some(&MsgAddress::Std(dest))).unwrap();
        b.store_coins(&Integer::zero()).unwrap();
        b.store_bit(true).unwrap(); // init present
        b.store_bit(false).unwrap(); // inline
        b.store_bit(false).unwrap(); // split_depth
        b.store_bit(false).unwrap(); // special
        b.store_maybe_ref(Some(code.clone())).unwrap();
        b.store_maybe_ref(None).unwrap();
        b.store_bit(false).unwrap(); // library
        b.store_bit(false).unwrap(); // inline body, empty

        let value = decode(b.build().unwrap()).unwrap();
        let info = value.field("info").unwrap();
        assert_eq!(type_of(info), Some(&DecodedValue::text("ext_in_msg_info")));
        let init = value.field("init").unwrap();
        assert_eq!(type_of(init), Some(&DecodedValue::text("state_init")));
        assert_eq!(init.field("code"), Some(&DecodedValue::EmbeddedContainer(code)));
        assert_eq!(init.field("data"), Some(&DecodedValue::nil()));
        assert_eq!(value.field("body"), Some(&DecodedValue::nil()));
    }

    #[test]
    fn test_external_out_message() {
        let src = StdAddress::new(0, [0x44; 32]);
        let dest = MsgAddress::External(ExternalAddress {
            bit_len: 8,
            data: vec![0x99],
        });
        let mut b = CellBuilder::new();
        b.store_uint(0b11, 2).unwrap();
        b.store_address(Some(&MsgAddress::Std(src))).unwrap();
        b.store_address(Some(&dest)).unwrap();
        b.store_uint(10, 64).unwrap();
        b.store_uint(20, 32).unwrap();
        b.store_bit(false).unwrap();
        b.store_bit(false).unwrap();
        b.store_uint(0xab, 8).unwrap(); // inline body

        let value = decode(b.build().unwrap()).unwrap();
        let info = value.field("info").unwrap();
        assert_eq!(type_of(info), Some(&DecodedValue::text("ext_out_msg_info")));
        assert_eq!(info.field("dest"), Some(&DecodedValue::Address(dest)));
        match value.field("body") {
            Some(DecodedValue::EmbeddedContainer(inline)) => assert_eq!(inline.data(), &[0xab]),
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[test]
    fn test_message_dest_must_be_internal() {
        let mut b = CellBuilder::new();
        b.store_uint(0, 4).unwrap();
        b.store_address(None).unwrap();
        b.store_address(None).unwrap();
        b.store_coins(&Integer::zero()).unwrap();
        b.store_bit(false).unwrap();
        b.store_coins(&Integer::zero()).unwrap();
        b.store_coins(&Integer::zero()).unwrap();
        b.store_uint(0, 64).unwrap();
        b.store_uint(0, 32).unwrap();
        b.store_uint(0, 2).unwrap();
        assert!(decode(b.build().unwrap()).is_err());
    }

    #[test]
    fn test_standalone_state_init_with_tick_tock() {
        let mut b = CellBuilder::new();
        b.store_bit(true).unwrap();
        b.store_uint(3, 5).unwrap();
        b.store_bit(true).unwrap();
        b.store_bit(true).unwrap();
        b.store_bit(false).unwrap();
        b.store_uint(0, 3).unwrap(); // code, data, library absent
        let value = decode(b.build().unwrap()).unwrap();
        assert_eq!(type_of(&value), Some(&DecodedValue::text("state_init")));
        assert_eq!(value.field("split_depth"), Some(&DecodedValue::integer(3u64)));
        assert_eq!(
            value.field("special"),
            Some(&DecodedValue::Record(vec![
                ("tick".to_string(), DecodedValue::bool(true)),
                ("tock".to_string(), DecodedValue::bool(false)),
            ]))
        );
    }

    #[test]
    fn test_unmatched_cell() {
        let cell = Cell::new(vec![0xff], 8, vec![]).unwrap();
        assert_eq!(decode(cell), Err(StrategyError::NoMatch { strategy: "block" }));
        assert_eq!(decode(Cell::empty()), Err(StrategyError::NoMatch { strategy: "block" }));
    }
}
