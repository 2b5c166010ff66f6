// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

use move_core_types::identifier::Identifier;
use serde_json::Value as JsonValue;

use super::*;
use crate::base_types::ObjectID;

fn move_call(arguments: Vec<Argument>) -> Command {
    Command::MoveCall(Box::new(ProgrammableMoveCall {
        package: ObjectID::random(),
        module: Identifier::new("m").unwrap(),
        function: Identifier::new("f").unwrap(),
        type_arguments: vec![],
        arguments,
    }))
}

fn collect_arguments(command: &Command) -> Vec<Argument> {
    let mut probe = command.clone();
    let mut seen = Vec::new();
    probe.map_arguments(&mut |arg| seen.push(*arg));
    seen
}

#[test]
fn test_traversal_covers_every_slot() {
    let a = Argument::Input(0);
    let b = Argument::Result(1);
    let c = Argument::NestedResult(1, 2);

    assert_eq!(collect_arguments(&move_call(vec![a, b])), vec![a, b]);
    assert_eq!(
        collect_arguments(&Command::TransferObjects(vec![a, c], b)),
        vec![a, c, b]
    );
    assert_eq!(
        collect_arguments(&Command::SplitCoins(a, vec![b, c])),
        vec![a, b, c]
    );
    assert_eq!(
        collect_arguments(&Command::MergeCoins(a, vec![b])),
        vec![a, b]
    );
    assert_eq!(
        collect_arguments(&Command::MakeMoveVec(None, vec![a, b])),
        vec![a, b]
    );
    assert_eq!(
        collect_arguments(&Command::Publish(vec![vec![0]], vec![ObjectID::random()])),
        vec![]
    );
    assert_eq!(
        collect_arguments(&Command::Upgrade(
            vec![vec![0]],
            vec![],
            ObjectID::random(),
            a
        )),
        vec![a]
    );
}

#[test]
fn test_traversal_visits_intent_inputs() {
    let mut inputs = BTreeMap::new();
    inputs.insert("single".to_owned(), IntentValue::Single(Argument::Input(0)));
    inputs.insert(
        "list".to_owned(),
        IntentValue::List(vec![Argument::Result(0), Argument::IntentResult(1)]),
    );
    let command = Command::TransactionIntent(TransactionIntent {
        name: "example".to_owned(),
        inputs,
        data: JsonValue::Null,
    });
    let mut seen = collect_arguments(&command);
    seen.sort_by_key(|arg| arg.kind());
    assert_eq!(seen.len(), 3);
}

#[test]
fn test_validate_accepts_in_range_references() {
    let state = TransactionState {
        inputs: vec![CallArg::Pure { bytes: vec![1] }],
        commands: vec![
            move_call(vec![Argument::Input(0)]),
            Command::TransferObjects(vec![Argument::Result(0)], Argument::GasCoin),
        ],
        ..TransactionState::default()
    };
    assert!(state.validate().is_ok());
}

#[test]
fn test_validate_rejects_out_of_range_input() {
    let state = TransactionState {
        inputs: vec![],
        commands: vec![move_call(vec![Argument::Input(3)])],
        ..TransactionState::default()
    };
    let err = state.validate().unwrap_err();
    assert!(matches!(
        err,
        crate::error::TransactionStateError::ValidationFailed { .. }
    ));
}

#[test]
fn test_validate_rejects_out_of_range_result() {
    let state = TransactionState {
        inputs: vec![],
        commands: vec![Command::TransferObjects(
            vec![Argument::Result(5)],
            Argument::GasCoin,
        )],
        ..TransactionState::default()
    };
    assert!(state.validate().is_err());
}
