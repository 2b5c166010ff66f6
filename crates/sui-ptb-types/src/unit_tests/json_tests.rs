// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::str::FromStr as _;

use super::*;
use crate::transaction::RawValue;
use crate::type_signature::{OpenMoveTypeSignature, OpenMoveTypeSignatureBody};

fn object_ref(fill: u8) -> ObjectRef {
    ObjectRef::new(
        ObjectID::from_bytes([fill; 32]),
        SequenceNumber::new(fill as u64),
        ObjectDigest::new([fill; 32]),
    )
}

fn representative_state() -> TransactionState {
    let mut intent_inputs = BTreeMap::new();
    intent_inputs.insert(
        "coin".to_owned(),
        IntentValue::Single(Argument::IntentResult(2)),
    );
    intent_inputs.insert(
        "amounts".to_owned(),
        IntentValue::List(vec![Argument::Input(0), Argument::NestedIntentResult(2, 1)]),
    );
    TransactionState {
        features: vec!["example".to_owned()],
        sender: Some(SuiAddress::from_str("0x11").unwrap()),
        expiration: Some(TransactionExpiration::Epoch(7)),
        gas_data: GasData {
            budget: Some(2_000_050),
            price: Some(1_000),
            owner: None,
            payment: Some(vec![object_ref(9)]),
        },
        inputs: vec![
            CallArg::Pure { bytes: vec![42, 0] },
            CallArg::Object(ObjectArg::ImmOrOwnedObject(object_ref(1))),
            CallArg::Object(ObjectArg::SharedObject(SharedObjectRef {
                object_id: ObjectID::from_bytes([2; 32]),
                initial_shared_version: SequenceNumber::new(4),
                mutable: true,
            })),
            CallArg::Object(ObjectArg::Receiving(object_ref(3))),
            CallArg::UnresolvedObject(UnresolvedObject {
                object_id: ObjectID::from_bytes([4; 32]),
                type_signatures: vec![OpenMoveTypeSignature::by_mut_ref(
                    OpenMoveTypeSignatureBody::U64,
                )],
            }),
            CallArg::RawValue(RawValue {
                value: serde_json::json!(42),
                kind: Some(RawValueKind::Pure),
            }),
        ],
        commands: vec![
            Command::MoveCall(Box::new(ProgrammableMoveCall {
                package: ObjectID::from_str("0x2").unwrap(),
                module: Identifier::new("coin").unwrap(),
                function: Identifier::new("split").unwrap(),
                type_arguments: vec![TypeTag::from_str("0x2::sui::SUI").unwrap()],
                arguments: vec![Argument::Input(1), Argument::Input(0)],
            })),
            Command::SplitCoins(Argument::GasCoin, vec![Argument::Input(0)]),
            Command::TransactionIntent(TransactionIntent {
                name: "example".to_owned(),
                inputs: intent_inputs,
                data: serde_json::json!({ "note": "opaque" }),
            }),
            Command::TransferObjects(vec![Argument::Result(1)], Argument::Input(0)),
            Command::MakeMoveVec(None, vec![Argument::NestedResult(1, 0)]),
            Command::Publish(vec![vec![1, 2]], vec![ObjectID::from_bytes([5; 32])]),
            Command::Upgrade(
                vec![vec![3]],
                vec![ObjectID::from_bytes([6; 32])],
                ObjectID::from_bytes([7; 32]),
                Argument::Result(5),
            ),
        ],
    }
}

#[test]
fn test_round_trip_preserves_state() {
    let state = representative_state();
    let value = to_json(&state);
    let restored = from_json(&value).unwrap();
    assert_eq!(restored, state);
}

#[test]
fn test_variants_carry_kind_mirror() {
    let state = representative_state();
    let value = to_json(&state);
    let inputs = value["inputs"].as_array().unwrap();
    assert_eq!(inputs[0]["$kind"], "Pure");
    assert!(inputs[0]["Pure"]["bytes"].is_string());
    assert_eq!(inputs[2]["Object"]["$kind"], "SharedObject");
    assert_eq!(
        inputs[2]["Object"]["SharedObject"]["initialSharedVersion"],
        "4"
    );
    let commands = value["commands"].as_array().unwrap();
    assert_eq!(commands[0]["$kind"], "MoveCall");
    assert_eq!(commands[0]["MoveCall"]["typeArguments"][0], "0x2::sui::SUI");
    assert_eq!(commands[1]["SplitCoins"]["coin"]["$kind"], "GasCoin");
}

#[test]
fn test_u64_fields_are_decimal_strings() {
    let state = representative_state();
    let value = to_json(&state);
    assert_eq!(value["gasData"]["budget"], "2000050");
    assert_eq!(value["gasData"]["price"], "1000");
    assert_eq!(value["gasData"]["payment"][0]["version"], "9");
}

#[test]
fn test_ingestion_accepts_untagged_single_key_variants() {
    let value = serde_json::json!({
        "version": 2,
        "inputs": [{ "Pure": { "bytes": "AAA=" } }],
        "commands": [],
    });
    let state = from_json(&value).unwrap();
    assert_eq!(state.inputs, vec![CallArg::Pure { bytes: vec![0, 0] }]);
}

#[test]
fn test_unknown_command_kind_is_fatal() {
    let value = serde_json::json!({
        "version": 2,
        "inputs": [],
        "commands": [{ "$kind": "Frobnicate", "Frobnicate": {} }],
    });
    assert_eq!(
        from_json(&value).unwrap_err(),
        TransactionStateError::UnexpectedCommandKind("Frobnicate".to_owned())
    );
}

#[test]
fn test_wrong_version_is_rejected() {
    let value = serde_json::json!({ "version": 1, "inputs": [], "commands": [] });
    assert!(from_json(&value).is_err());
}

#[test]
fn test_out_of_range_reference_is_rejected_on_ingestion() {
    let value = serde_json::json!({
        "version": 2,
        "inputs": [],
        "commands": [{ "SplitCoins": { "coin": { "Input": 3 }, "amounts": [] } }],
    });
    assert!(matches!(
        from_json(&value).unwrap_err(),
        TransactionStateError::ValidationFailed { .. }
    ));
}

#[test]
fn test_error_paths_are_precise() {
    let value = serde_json::json!({
        "version": 2,
        "inputs": [{ "Pure": { "bytes": 17 } }],
        "commands": [],
    });
    let err = from_json(&value).unwrap_err();
    assert!(matches!(
        err,
        TransactionStateError::ValidationFailed { ref path, .. }
            if path == "inputs[0].Pure.bytes"
    ));
}
