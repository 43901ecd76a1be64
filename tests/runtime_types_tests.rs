use serde_json::json;
use sublink::constants::GENESIS_PARENT_HASH;
use sublink::runtime::{BlockHeader, BlockRef, ChainProperties, RuntimeVersion, SignedBlock};

#[test]
fn test_header_parses_hex_number_and_detects_genesis() {
    let header: BlockHeader = serde_json::from_value(json!({
        "parentHash": GENESIS_PARENT_HASH,
        "number": "0x0",
        "stateRoot": "0x01",
        "extrinsicsRoot": "0x02",
        "digest": { "logs": [] }
    }))
    .unwrap();

    assert_eq!(header.number, 0);
    assert!(header.is_genesis());

    let header: BlockHeader = serde_json::from_value(json!({
        "parentHash": "0xabc0",
        "number": "0x1a",
    }))
    .unwrap();

    assert_eq!(header.number, 26);
    assert!(!header.is_genesis());
}

#[test]
fn test_header_accepts_integer_number() {
    let header: BlockHeader =
        serde_json::from_value(json!({ "parentHash": "0x11", "number": 5 })).unwrap();
    assert_eq!(header.number, 5);
}

#[test]
fn test_signed_block_parses() {
    let block: SignedBlock = serde_json::from_value(json!({
        "block": {
            "header": { "parentHash": "0x11", "number": "0x2" },
            "extrinsics": ["0x0400", "0x0500"]
        },
        "justifications": null
    }))
    .unwrap();

    assert_eq!(block.block.header.number, 2);
    assert_eq!(block.block.extrinsics.len(), 2);
}

#[test]
fn test_runtime_version_ignores_unknown_fields() {
    let version: RuntimeVersion = serde_json::from_value(json!({
        "specName": "polkadot",
        "implName": "parity-polkadot",
        "authoringVersion": 0,
        "specVersion": 1_002_000,
        "implVersion": 0,
        "apis": [["0xdf6acb689907609b", 5]],
        "transactionVersion": 26,
        "stateVersion": 1
    }))
    .unwrap();

    assert_eq!(version.spec_version, 1_002_000);
    assert_eq!(version.transaction_version, 26);
}

#[test]
fn test_chain_properties_single_and_multi_token() {
    let single = ChainProperties::from_value(json!({
        "ss58Format": 0,
        "tokenDecimals": 10,
        "tokenSymbol": "DOT"
    }))
    .unwrap();
    assert_eq!(single.ss58_format, Some(0));
    assert_eq!(single.token_symbol.as_deref(), Some("DOT"));
    assert_eq!(single.token_decimals, Some(10));

    let multi = ChainProperties::from_value(json!({
        "ss58Format": 8,
        "tokenDecimals": [12, 12],
        "tokenSymbol": ["KAR", "KUSD"]
    }))
    .unwrap();
    assert_eq!(multi.token_symbol.as_deref(), Some("KAR"));
    assert_eq!(multi.token_decimals, Some(12));
}

#[test]
fn test_chain_properties_defaults_when_absent() {
    let props = ChainProperties::from_value(serde_json::Value::Null).unwrap();

    assert_eq!(props.ss58_format_or_default(), 42);
    assert_eq!(props.token_symbol_or_default(), "UNIT");
    assert_eq!(props.token_decimals_or_default(), 0);
}

#[test]
fn test_block_ref_conversions() {
    assert_eq!(BlockRef::from(12), BlockRef::Number(12));
    assert_eq!(BlockRef::from("0xaa"), BlockRef::Hash("0xaa".to_string()));
    assert_eq!(BlockRef::Number(3).to_string(), "#3");
}
