// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

mod common;

use cell_inspector::cell::{Cell, CellBuilder, build_dict};
use cell_inspector::decode::{DecodedValue, ExpansionLimitExceeded, canonicalize};
use cell_inspector::pipeline::{
    InputFormatError, Notation, Pipeline, PipelineError, render, run_pipeline,
};
use cell_inspector::types::{Integer, MsgAddress, StdAddress};
use common::*;
use serde_json::{Value, json};
use std::sync::Arc;

const MEMO_SCHEMA: &str = r#"{
    "messages": [
        { "name": "memo", "opcode": "0x00000000", "fields": [ { "name": "memo", "type": "text" } ] }
    ]
}"#;

const LEDGER_SCHEMA: &str = r#"{
    "messages": [
        {
            "name": "ledger",
            "opcode": 1,
            "fields": [
                { "name": "entries", "type": "dict", "key_bits": 32, "value": { "type": "uint", "bits": 16 } }
            ]
        }
    ]
}"#;

#[test]
fn test_empty_cell_has_documented_literal() {
    let decoder = builtin_decoder();

    let from_base64 = run_pipeline(EMPTY_CELL_BASE64, &decoder).unwrap();
    assert_eq!(from_base64.strategy, None);
    assert_eq!(from_base64.value, json!(EMPTY_CELL_HEX));

    let from_hex = run_pipeline(EMPTY_CELL_HEX, &decoder).unwrap();
    assert_eq!(from_hex.value, from_base64.value);
}

#[test]
fn test_whitespace_in_hex_input_is_ignored() {
    let spaced = "b5ee9c72 41010101\n00020000 004cacb9cd";
    let output = run_pipeline(spaced, &builtin_decoder()).unwrap();
    assert_eq!(output.value, json!(EMPTY_CELL_HEX));
}

#[test]
fn test_garbage_input_is_an_input_error() {
    let error = run_pipeline("not a bag of cells", &builtin_decoder()).unwrap_err();
    assert!(matches!(
        error,
        PipelineError::InputFormat(InputFormatError::Unrecognized { .. })
    ));
    assert!(!error.is_internal());
}

#[test]
fn test_schema_wins_over_block_format() {
    let input = to_hex(text_comment("hello"));

    let block_only = run_pipeline(&input, &builtin_decoder()).unwrap();
    assert_eq!(block_only.strategy, Some("block"));
    assert_eq!(block_only.value, json!({"@type": "text_comment", "text": "hello"}));

    let with_memo = run_pipeline(&input, &decoder_with(MEMO_SCHEMA)).unwrap();
    assert_eq!(with_memo.strategy, Some("schema"));
    assert_eq!(with_memo.value, json!({"@type": "memo", "memo": "hello"}));
}

fn jetton_transfer(forward_payload: Arc<Cell>) -> Cell {
    let mut b = CellBuilder::new();
    b.store_uint(JETTON_TRANSFER_OPCODE, 32).unwrap();
    b.store_uint(1, 64).unwrap();
    b.store_coins(&Integer::from(500u64)).unwrap();
    b.store_address(Some(&MsgAddress::Std(StdAddress::new(0, [0x22; 32]))))
        .unwrap();
    b.store_address(None).unwrap();
    b.store_maybe_ref(None).unwrap();
    b.store_coins(&Integer::from(0u64)).unwrap();
    b.store_bit(true).unwrap();
    b.store_ref(forward_payload).unwrap();
    b.build().unwrap()
}

#[test]
fn test_embedded_decodable_ref_expands_to_raw_and_parsed() {
    let payload = excesses(9);
    let output = run_pipeline(&to_hex(jetton_transfer(payload.clone())), &builtin_decoder()).unwrap();

    assert_eq!(output.strategy, Some("schema"));
    assert_eq!(output.passes, 2);
    assert_eq!(output.value["@type"], json!("jetton_transfer"));
    assert_eq!(output.value["amount"], json!(500));
    assert_eq!(output.value["response_destination"], Value::Null);

    let forward = &output.value["forward_payload"];
    assert_eq!(
        forward["raw"],
        canonicalize(&DecodedValue::Undecoded(payload)).unwrap()
    );
    assert_eq!(forward["parsed"], json!({"@type": "excesses", "query_id": 9}));
}

#[test]
fn test_embedded_opaque_ref_stays_opaque() {
    let payload = Arc::new(Cell::new(vec![0xff], 8, vec![]).unwrap());
    let output = run_pipeline(&to_hex(jetton_transfer(payload.clone())), &builtin_decoder()).unwrap();

    assert_eq!(output.passes, 1);
    assert_eq!(
        output.value["forward_payload"],
        canonicalize(&DecodedValue::Undecoded(payload)).unwrap()
    );
}

#[test]
fn test_dictionary_flattens_with_decimal_keys_in_order() {
    let entries = vec![(Integer::from(5u64), 50u64), (Integer::from(300u64), 3u64)];
    let dict = build_dict(32, &entries, |b, v| b.store_uint(*v, 16).map(|_| ()))
        .unwrap()
        .map(Arc::new);

    let mut root = CellBuilder::new();
    root.store_uint(1, 32).unwrap();
    root.store_maybe_ref(dict).unwrap();

    let output = run_pipeline(&to_hex(root.build().unwrap()), &decoder_with(LEDGER_SCHEMA)).unwrap();
    assert_eq!(output.passes, 2);

    let flattened = output.value["entries"].as_object().unwrap();
    let keys: Vec<&str> = flattened.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["5", "300"]);
    assert_eq!(flattened["5"], json!(50));
    assert_eq!(flattened["300"], json!(3));
}

#[test]
fn test_empty_dictionary_is_an_empty_object() {
    let mut root = CellBuilder::new();
    root.store_uint(1, 32).unwrap();
    root.store_maybe_ref(None).unwrap();

    let output = run_pipeline(&to_hex(root.build().unwrap()), &decoder_with(LEDGER_SCHEMA)).unwrap();
    assert_eq!(output.value, json!({"@type": "ledger", "entries": {}}));
}

#[test]
fn test_canonical_output_recanonicalizes_unchanged() {
    let output = run_pipeline(&to_hex(jetton_transfer(excesses(3))), &builtin_decoder()).unwrap();
    let lifted = DecodedValue::from(&output.value);
    assert_eq!(canonicalize(&lifted).unwrap(), output.value);
}

/// `state_init` links whose `code` and `data` both point at the next link.
fn shared_state_init_chain(depth: usize) -> Cell {
    let mut next = Arc::new(Cell::empty());
    for _ in 0..depth {
        let mut b = CellBuilder::new();
        b.store_bit(false).unwrap(); // no split_depth
        b.store_bit(false).unwrap(); // no special
        b.store_maybe_ref(Some(next.clone())).unwrap();
        b.store_maybe_ref(Some(next)).unwrap();
        b.store_bit(false).unwrap(); // no libraries
        next = Arc::new(b.build().unwrap());
    }
    Arc::try_unwrap(next).unwrap()
}

#[test]
fn test_shared_children_hit_the_node_budget() {
    let input = to_hex(shared_state_init_chain(64));
    let error = run_pipeline(&input, &builtin_decoder()).unwrap_err();

    assert!(matches!(
        error,
        PipelineError::ExpansionLimit(ExpansionLimitExceeded::Nodes { .. })
    ));
    assert!(error.is_internal());
}

#[test]
fn test_shallow_shared_children_still_expand() {
    let input = to_hex(shared_state_init_chain(2));
    let output = run_pipeline(&input, &builtin_decoder()).unwrap();

    assert_eq!(output.strategy, Some("block"));
    let code = &output.value["code"]["parsed"];
    assert_eq!(code["@type"], json!("state_init"));
    assert_eq!(code, &output.value["data"]["parsed"]);
}

#[test]
fn test_plain_dump_of_shared_opaque_tree_is_linear() {
    // Opaque at every level: 0xff bits match no shape.
    let mut next = Arc::new(Cell::empty());
    for _ in 0..64 {
        next = Arc::new(Cell::new(vec![0xff], 8, vec![next.clone(), next]).unwrap());
    }
    let input = to_hex(Arc::try_unwrap(next).unwrap());

    let output = Pipeline::new(builtin_decoder()).run(&input).unwrap();
    assert_eq!(output.strategy, None);
    let dump = render(&output, Notation::Plain).unwrap();
    assert_eq!(dump.lines().count(), 64 * 2 + 1);
}
