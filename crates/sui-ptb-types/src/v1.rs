// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! The legacy (version 1) JSON snapshot shape and its lossless migration to
//! and from the current in-memory representation.
//!
//! V1 tags inputs positionally with `kind` in `Input | Pure | Object` and a
//! separate `value`/`type`; commands live under `transactions`, move calls
//! carry a joined `package::module::function` target, and gas configuration
//! sits under `gasConfig`. Command kinds v1 does not know become
//! `TransactionIntent` commands, carrying their raw payload.

use std::collections::BTreeMap;
use std::str::FromStr;

use move_core_types::identifier::Identifier;
use serde_json::{json, Map, Value as JsonValue};

use crate::base_types::{SequenceNumber, SharedObjectRef};
use crate::error::{StateResult, TransactionStateError};
use crate::json::{
    expect_array, expect_bool, expect_object, expect_str, expect_u16, expect_u64, field,
    opt_field, parse_address, parse_base64, parse_object_id, parse_type_tag, variant,
};
use crate::transaction::{
    Argument, CallArg, Command, GasData, ObjectArg, ProgrammableMoveCall, RawValue, RawValueKind,
    TransactionExpiration, TransactionIntent, TransactionState, UnresolvedObject,
};

#[cfg(test)]
#[path = "unit_tests/v1_tests.rs"]
mod v1_tests;

fn validation(path: &str, message: impl Into<String>) -> TransactionStateError {
    TransactionStateError::validation(path, message)
}

// ---------------------------------------------------------------------------
// v1 -> v2
// ---------------------------------------------------------------------------

pub fn from_json(value: &JsonValue) -> StateResult<TransactionState> {
    let top = expect_object(value, "")?;
    match top.get("version").and_then(JsonValue::as_u64) {
        Some(1) => {}
        _ => return Err(validation("version", "expected schema version 1")),
    }
    let sender = opt_field(top, "sender")
        .map(|sender| parse_address(sender, "sender"))
        .transpose()?;
    let expiration = opt_field(top, "expiration")
        .map(|expiration| parse_expiration(expiration, "expiration"))
        .transpose()?;
    let gas_data = match opt_field(top, "gasConfig") {
        None => GasData::default(),
        Some(config) => parse_gas_config(config, "gasConfig")?,
    };
    let inputs = match opt_field(top, "inputs") {
        None => Vec::new(),
        Some(inputs) => expect_array(inputs, "inputs")?
            .iter()
            .enumerate()
            .map(|(i, input)| parse_input(input, &format!("inputs[{i}]")))
            .collect::<StateResult<Vec<_>>>()?,
    };
    let commands = match opt_field(top, "transactions") {
        None => Vec::new(),
        Some(transactions) => expect_array(transactions, "transactions")?
            .iter()
            .enumerate()
            .map(|(i, transaction)| parse_transaction(transaction, &format!("transactions[{i}]")))
            .collect::<StateResult<Vec<_>>>()?,
    };

    let state = TransactionState {
        features: Vec::new(),
        sender,
        expiration,
        gas_data,
        inputs,
        commands,
    };
    state.validate()?;
    Ok(state)
}

fn parse_expiration(value: &JsonValue, path: &str) -> StateResult<TransactionExpiration> {
    let (kind, inner) = variant(value, path)?;
    match kind {
        "None" => Ok(TransactionExpiration::None),
        "Epoch" => Ok(TransactionExpiration::Epoch(expect_u64(
            inner,
            &format!("{path}.Epoch"),
        )?)),
        other => Err(validation(path, format!("unknown expiration kind `{other}`"))),
    }
}

fn parse_gas_config(value: &JsonValue, path: &str) -> StateResult<GasData> {
    let config = expect_object(value, path)?;
    Ok(GasData {
        budget: opt_field(config, "budget")
            .map(|budget| expect_u64(budget, &format!("{path}.budget")))
            .transpose()?,
        price: opt_field(config, "price")
            .map(|price| expect_u64(price, &format!("{path}.price")))
            .transpose()?,
        owner: opt_field(config, "owner")
            .map(|owner| parse_address(owner, &format!("{path}.owner")))
            .transpose()?,
        payment: opt_field(config, "payment")
            .map(|payment| {
                expect_array(payment, &format!("{path}.payment"))?
                    .iter()
                    .enumerate()
                    .map(|(i, oref)| {
                        crate::json::parse_object_ref(oref, &format!("{path}.payment[{i}]"))
                    })
                    .collect::<StateResult<Vec<_>>>()
            })
            .transpose()?,
    })
}

fn parse_input(value: &JsonValue, path: &str) -> StateResult<CallArg> {
    let input = expect_object(value, path)?;
    let kind = expect_str(field(input, "kind", path)?, &format!("{path}.kind"))?;
    let raw = field(input, "value", path)?;
    match kind {
        "Pure" => {
            // A v1 pure value is a `{ Pure: [bytes...] }` wrapper.
            let (tag, bytes) = variant(raw, &format!("{path}.value"))?;
            if tag != "Pure" {
                return Err(validation(
                    &format!("{path}.value"),
                    format!("expected a Pure value, got `{tag}`"),
                ));
            }
            Ok(CallArg::Pure {
                bytes: parse_byte_array(bytes, &format!("{path}.value.Pure"))?,
            })
        }
        "Object" => {
            let (tag, inner) = variant(raw, &format!("{path}.value"))?;
            if tag != "Object" {
                return Err(validation(
                    &format!("{path}.value"),
                    format!("expected an Object value, got `{tag}`"),
                ));
            }
            parse_object_value(inner, &format!("{path}.value.Object"))
        }
        "Input" => {
            let kind = match opt_field(input, "type") {
                None => None,
                Some(t) => Some(match expect_str(t, &format!("{path}.type"))? {
                    "pure" => RawValueKind::Pure,
                    "object" => RawValueKind::Object,
                    other => {
                        return Err(validation(
                            &format!("{path}.type"),
                            format!("unknown input type `{other}`"),
                        ))
                    }
                }),
            };
            // An object-typed raw string input is already known to be an
            // object id; keep that knowledge through the migration.
            if kind == Some(RawValueKind::Object) {
                if let Some(id) = raw.as_str() {
                    return Ok(CallArg::UnresolvedObject(UnresolvedObject {
                        object_id: parse_object_id(
                            &JsonValue::String(id.to_owned()),
                            &format!("{path}.value"),
                        )?,
                        type_signatures: Vec::new(),
                    }));
                }
            }
            Ok(CallArg::RawValue(RawValue {
                value: raw.clone(),
                kind,
            }))
        }
        other => Err(validation(
            &format!("{path}.kind"),
            format!("unknown input kind `{other}`"),
        )),
    }
}

fn parse_object_value(value: &JsonValue, path: &str) -> StateResult<CallArg> {
    let (tag, inner) = variant(value, path)?;
    match tag {
        "ImmOrOwned" => Ok(CallArg::Object(ObjectArg::ImmOrOwnedObject(
            crate::json::parse_object_ref(inner, &format!("{path}.ImmOrOwned"))?,
        ))),
        "Shared" => {
            let path = format!("{path}.Shared");
            let shared = expect_object(inner, &path)?;
            Ok(CallArg::Object(ObjectArg::SharedObject(SharedObjectRef {
                object_id: parse_object_id(
                    field(shared, "objectId", &path)?,
                    &format!("{path}.objectId"),
                )?,
                initial_shared_version: SequenceNumber::new(expect_u64(
                    field(shared, "initialSharedVersion", &path)?,
                    &format!("{path}.initialSharedVersion"),
                )?),
                mutable: match opt_field(shared, "mutable") {
                    None => true,
                    Some(mutable) => expect_bool(mutable, &format!("{path}.mutable"))?,
                },
            })))
        }
        "Receiving" => Ok(CallArg::Object(ObjectArg::Receiving(
            crate::json::parse_object_ref(inner, &format!("{path}.Receiving"))?,
        ))),
        other => Err(validation(path, format!("unknown object kind `{other}`"))),
    }
}

fn parse_argument(value: &JsonValue, path: &str) -> StateResult<Argument> {
    let argument = expect_object(value, path)?;
    let kind = expect_str(field(argument, "kind", path)?, &format!("{path}.kind"))?;
    match kind {
        "GasCoin" => Ok(Argument::GasCoin),
        "Input" => Ok(Argument::Input(expect_u16(
            field(argument, "index", path)?,
            &format!("{path}.index"),
        )?)),
        "Result" => Ok(Argument::Result(expect_u16(
            field(argument, "index", path)?,
            &format!("{path}.index"),
        )?)),
        "NestedResult" => Ok(Argument::NestedResult(
            expect_u16(field(argument, "index", path)?, &format!("{path}.index"))?,
            expect_u16(
                field(argument, "resultIndex", path)?,
                &format!("{path}.resultIndex"),
            )?,
        )),
        other => Err(validation(
            &format!("{path}.kind"),
            format!("unknown argument kind `{other}`"),
        )),
    }
}

fn parse_arguments(value: &JsonValue, path: &str) -> StateResult<Vec<Argument>> {
    expect_array(value, path)?
        .iter()
        .enumerate()
        .map(|(i, argument)| parse_argument(argument, &format!("{path}[{i}]")))
        .collect()
}

fn parse_transaction(value: &JsonValue, path: &str) -> StateResult<Command> {
    let transaction = expect_object(value, path)?;
    let kind = expect_str(field(transaction, "kind", path)?, &format!("{path}.kind"))?;
    match kind {
        "MoveCall" => {
            let target = expect_str(
                field(transaction, "target", path)?,
                &format!("{path}.target"),
            )?;
            let mut parts = target.split("::");
            let (Some(package), Some(module), Some(function), None) =
                (parts.next(), parts.next(), parts.next(), parts.next())
            else {
                return Err(validation(
                    &format!("{path}.target"),
                    format!("expected `package::module::function`, got `{target}`"),
                ));
            };
            Ok(Command::MoveCall(Box::new(ProgrammableMoveCall {
                package: parse_object_id(
                    &JsonValue::String(package.to_owned()),
                    &format!("{path}.target"),
                )?,
                module: parse_target_identifier(module, &format!("{path}.target"))?,
                function: parse_target_identifier(function, &format!("{path}.target"))?,
                type_arguments: match opt_field(transaction, "typeArguments") {
                    None => Vec::new(),
                    Some(tags) => expect_array(tags, &format!("{path}.typeArguments"))?
                        .iter()
                        .enumerate()
                        .map(|(i, tag)| {
                            parse_type_tag(tag, &format!("{path}.typeArguments[{i}]"))
                        })
                        .collect::<StateResult<Vec<_>>>()?,
                },
                arguments: parse_arguments(
                    field(transaction, "arguments", path)?,
                    &format!("{path}.arguments"),
                )?,
            })))
        }
        "TransferObjects" => Ok(Command::TransferObjects(
            parse_arguments(
                field(transaction, "objects", path)?,
                &format!("{path}.objects"),
            )?,
            parse_argument(
                field(transaction, "address", path)?,
                &format!("{path}.address"),
            )?,
        )),
        "SplitCoins" => Ok(Command::SplitCoins(
            parse_argument(field(transaction, "coin", path)?, &format!("{path}.coin"))?,
            parse_arguments(
                field(transaction, "amounts", path)?,
                &format!("{path}.amounts"),
            )?,
        )),
        "MergeCoins" => Ok(Command::MergeCoins(
            parse_argument(
                field(transaction, "destination", path)?,
                &format!("{path}.destination"),
            )?,
            parse_arguments(
                field(transaction, "sources", path)?,
                &format!("{path}.sources"),
            )?,
        )),
        "MakeMoveVec" => Ok(Command::MakeMoveVec(
            opt_field(transaction, "type")
                .map(|tag| parse_type_tag(tag, &format!("{path}.type")))
                .transpose()?,
            parse_arguments(
                field(transaction, "objects", path)?,
                &format!("{path}.objects"),
            )?,
        )),
        "Publish" => Ok(Command::Publish(
            parse_module_list(
                field(transaction, "modules", path)?,
                &format!("{path}.modules"),
            )?,
            parse_dependency_list(
                field(transaction, "dependencies", path)?,
                &format!("{path}.dependencies"),
            )?,
        )),
        "Upgrade" => Ok(Command::Upgrade(
            parse_module_list(
                field(transaction, "modules", path)?,
                &format!("{path}.modules"),
            )?,
            parse_dependency_list(
                field(transaction, "dependencies", path)?,
                &format!("{path}.dependencies"),
            )?,
            parse_object_id(
                field(transaction, "packageId", path)?,
                &format!("{path}.packageId"),
            )?,
            parse_argument(
                field(transaction, "ticket", path)?,
                &format!("{path}.ticket"),
            )?,
        )),
        // A kind this schema does not know is an intent: carry the whole
        // payload so it survives a round-trip.
        other => Ok(Command::TransactionIntent(TransactionIntent {
            name: other.to_owned(),
            inputs: BTreeMap::new(),
            data: value.clone(),
        })),
    }
}

fn parse_target_identifier(part: &str, path: &str) -> StateResult<Identifier> {
    Identifier::from_str(part)
        .map_err(|e| validation(path, format!("invalid identifier `{part}`: {e}")))
}

fn parse_module_list(value: &JsonValue, path: &str) -> StateResult<Vec<Vec<u8>>> {
    expect_array(value, path)?
        .iter()
        .enumerate()
        .map(|(i, module)| {
            let path = format!("{path}[{i}]");
            if module.is_string() {
                parse_base64(module, &path)
            } else {
                parse_byte_array(module, &path)
            }
        })
        .collect()
}

fn parse_dependency_list(value: &JsonValue, path: &str) -> StateResult<Vec<crate::base_types::ObjectID>> {
    expect_array(value, path)?
        .iter()
        .enumerate()
        .map(|(i, id)| parse_object_id(id, &format!("{path}[{i}]")))
        .collect()
}

fn parse_byte_array(value: &JsonValue, path: &str) -> StateResult<Vec<u8>> {
    expect_array(value, path)?
        .iter()
        .enumerate()
        .map(|(i, byte)| {
            let byte = expect_u64(byte, &format!("{path}[{i}]"))?;
            u8::try_from(byte).map_err(|_| validation(&format!("{path}[{i}]"), "expected a byte"))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// v2 -> v1
// ---------------------------------------------------------------------------

/// Renders a state in the legacy shape. Fails when the state uses features
/// v1 cannot express (intent-result references).
pub fn to_json(state: &TransactionState) -> StateResult<JsonValue> {
    let inputs = state
        .inputs
        .iter()
        .enumerate()
        .map(|(index, input)| input_to_json(index, input))
        .collect::<StateResult<Vec<_>>>()?;
    let transactions = state
        .commands
        .iter()
        .enumerate()
        .map(|(index, command)| transaction_to_json(index, command))
        .collect::<StateResult<Vec<_>>>()?;
    Ok(json!({
        "version": 1,
        "sender": state.sender.map(|sender| sender.to_string()),
        "expiration": state.expiration.map(|expiration| match expiration {
            TransactionExpiration::None => json!({ "None": true }),
            TransactionExpiration::Epoch(epoch) => json!({ "Epoch": epoch }),
        }),
        "gasConfig": {
            "budget": state.gas_data.budget.map(|budget| budget.to_string()),
            "price": state.gas_data.price.map(|price| price.to_string()),
            "owner": state.gas_data.owner.map(|owner| owner.to_string()),
            "payment": state.gas_data.payment.as_ref().map(|payment| {
                payment
                    .iter()
                    .map(crate::json::object_ref_to_json)
                    .collect::<Vec<_>>()
            }),
        },
        "inputs": inputs,
        "transactions": transactions,
    }))
}

fn input_to_json(index: usize, input: &CallArg) -> StateResult<JsonValue> {
    Ok(match input {
        CallArg::Pure { bytes } => json!({
            "kind": "Pure",
            "index": index,
            "value": { "Pure": bytes },
        }),
        CallArg::Object(object) => {
            let value = match object {
                ObjectArg::ImmOrOwnedObject(oref) => {
                    json!({ "ImmOrOwned": crate::json::object_ref_to_json(oref) })
                }
                ObjectArg::SharedObject(shared) => json!({
                    "Shared": {
                        "objectId": shared.object_id.to_string(),
                        "initialSharedVersion": shared.initial_shared_version.to_string(),
                        "mutable": shared.mutable,
                    }
                }),
                ObjectArg::Receiving(oref) => {
                    json!({ "Receiving": crate::json::object_ref_to_json(oref) })
                }
            };
            json!({
                "kind": "Object",
                "index": index,
                "value": { "Object": value },
            })
        }
        CallArg::UnresolvedObject(unresolved) => json!({
            "kind": "Input",
            "index": index,
            "value": unresolved.object_id.to_string(),
            "type": "object",
        }),
        CallArg::RawValue(raw) => {
            let mut entry = Map::new();
            entry.insert("kind".to_owned(), json!("Input"));
            entry.insert("index".to_owned(), json!(index));
            entry.insert("value".to_owned(), raw.value.clone());
            if let Some(kind) = raw.kind {
                let kind = match kind {
                    RawValueKind::Pure => "pure",
                    RawValueKind::Object => "object",
                };
                entry.insert("type".to_owned(), json!(kind));
            }
            JsonValue::Object(entry)
        }
    })
}

fn argument_to_json(index: usize, argument: Argument) -> StateResult<JsonValue> {
    Ok(match argument {
        Argument::GasCoin => json!({ "kind": "GasCoin" }),
        Argument::Input(input) => json!({ "kind": "Input", "index": input }),
        Argument::Result(command) => json!({ "kind": "Result", "index": command }),
        Argument::NestedResult(command, result) => {
            json!({ "kind": "NestedResult", "index": command, "resultIndex": result })
        }
        Argument::IntentResult(_) | Argument::NestedIntentResult(..) => {
            return Err(validation(
                &format!("commands[{index}]"),
                "intent results cannot be represented in schema version 1",
            ))
        }
    })
}

fn arguments_to_json(index: usize, arguments: &[Argument]) -> StateResult<Vec<JsonValue>> {
    arguments
        .iter()
        .map(|argument| argument_to_json(index, *argument))
        .collect()
}

fn transaction_to_json(index: usize, command: &Command) -> StateResult<JsonValue> {
    Ok(match command {
        Command::MoveCall(call) => json!({
            "kind": "MoveCall",
            "target": format!("{}::{}::{}", call.package, call.module, call.function),
            "typeArguments": call
                .type_arguments
                .iter()
                .map(|tag| tag.to_string())
                .collect::<Vec<_>>(),
            "arguments": arguments_to_json(index, &call.arguments)?,
        }),
        Command::TransferObjects(objects, recipient) => json!({
            "kind": "TransferObjects",
            "objects": arguments_to_json(index, objects)?,
            "address": argument_to_json(index, *recipient)?,
        }),
        Command::SplitCoins(coin, amounts) => json!({
            "kind": "SplitCoins",
            "coin": argument_to_json(index, *coin)?,
            "amounts": arguments_to_json(index, amounts)?,
        }),
        Command::MergeCoins(destination, sources) => json!({
            "kind": "MergeCoins",
            "destination": argument_to_json(index, *destination)?,
            "sources": arguments_to_json(index, sources)?,
        }),
        Command::MakeMoveVec(type_, elements) => json!({
            "kind": "MakeMoveVec",
            "type": type_.as_ref().map(|tag| tag.to_string()),
            "objects": arguments_to_json(index, elements)?,
        }),
        Command::Publish(modules, dependencies) => json!({
            "kind": "Publish",
            "modules": modules,
            "dependencies": dependencies
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>(),
        }),
        Command::Upgrade(modules, dependencies, package, ticket) => json!({
            "kind": "Upgrade",
            "modules": modules,
            "dependencies": dependencies
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>(),
            "packageId": package.to_string(),
            "ticket": argument_to_json(index, *ticket)?,
        }),
        Command::TransactionIntent(intent) => {
            // An intent that came out of a v1 migration carries its original
            // payload; emit it verbatim so the round-trip is exact.
            if intent.data.is_object() && intent.data.get("kind").is_some() {
                intent.data.clone()
            } else {
                let mut entry = Map::new();
                entry.insert("kind".to_owned(), json!(&intent.name));
                if !intent.data.is_null() {
                    entry.insert("data".to_owned(), intent.data.clone());
                }
                JsonValue::Object(entry)
            }
        }
    })
}
