// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! The canonical JSON snapshot form of a `TransactionState` (schema version
//! 2). Every variant value is an object with a single key equal to its tag
//! name, plus a `$kind` mirror field; u64s are decimal strings, byte blobs
//! base64, digests base58, addresses fixed-width hex.
//!
//! Ingestion is structural validation over `serde_json::Value`, reporting the
//! exact path of the offending node.

use std::collections::BTreeMap;
use std::str::FromStr;

use fastcrypto::encoding::{Base64, Encoding};
use move_core_types::identifier::Identifier;
use move_core_types::language_storage::TypeTag;
use serde_json::{json, Map, Value as JsonValue};

use crate::base_types::{ObjectID, ObjectRef, SequenceNumber, SharedObjectRef, SuiAddress};
use crate::digests::ObjectDigest;
use crate::error::{StateResult, TransactionStateError};
use crate::transaction::{
    Argument, CallArg, Command, GasData, IntentValue, ObjectArg, ProgrammableMoveCall, RawValue,
    RawValueKind, TransactionExpiration, TransactionIntent, TransactionState, UnresolvedObject,
};
use crate::type_signature::OpenMoveTypeSignature;

#[cfg(test)]
#[path = "unit_tests/json_tests.rs"]
mod json_tests;

fn validation(path: &str, message: impl Into<String>) -> TransactionStateError {
    TransactionStateError::validation(path, message)
}

fn tagged(kind: &str, value: JsonValue) -> JsonValue {
    let mut object = Map::with_capacity(2);
    object.insert("$kind".to_owned(), JsonValue::String(kind.to_owned()));
    object.insert(kind.to_owned(), value);
    JsonValue::Object(object)
}

// ---------------------------------------------------------------------------
// Emission
// ---------------------------------------------------------------------------

pub fn to_json(state: &TransactionState) -> JsonValue {
    json!({
        "version": TransactionState::VERSION,
        "features": &state.features,
        "sender": state.sender.map(|sender| sender.to_string()),
        "expiration": state.expiration.map(expiration_to_json),
        "gasData": gas_data_to_json(&state.gas_data),
        "inputs": state.inputs.iter().map(call_arg_to_json).collect::<Vec<_>>(),
        "commands": state.commands.iter().map(command_to_json).collect::<Vec<_>>(),
    })
}

fn expiration_to_json(expiration: TransactionExpiration) -> JsonValue {
    match expiration {
        TransactionExpiration::None => tagged("None", json!(true)),
        TransactionExpiration::Epoch(epoch) => tagged("Epoch", json!(epoch)),
    }
}

fn gas_data_to_json(gas_data: &GasData) -> JsonValue {
    json!({
        "budget": gas_data.budget.map(|budget| budget.to_string()),
        "price": gas_data.price.map(|price| price.to_string()),
        "owner": gas_data.owner.map(|owner| owner.to_string()),
        "payment": gas_data.payment.as_ref().map(|payment| {
            payment.iter().map(object_ref_to_json).collect::<Vec<_>>()
        }),
    })
}

pub(crate) fn object_ref_to_json(oref: &ObjectRef) -> JsonValue {
    json!({
        "objectId": oref.object_id.to_string(),
        "version": oref.version.to_string(),
        "digest": oref.digest.to_string(),
    })
}

pub(crate) fn call_arg_to_json(input: &CallArg) -> JsonValue {
    match input {
        CallArg::Pure { bytes } => tagged("Pure", json!({ "bytes": Base64::encode(bytes) })),
        CallArg::Object(object) => tagged("Object", object_arg_to_json(object)),
        CallArg::UnresolvedObject(unresolved) => tagged(
            "UnresolvedObject",
            json!({
                "value": unresolved.object_id.to_string(),
                "typeSignatures": &unresolved.type_signatures,
            }),
        ),
        CallArg::RawValue(raw) => tagged(
            "RawValue",
            json!({
                "value": &raw.value,
                "type": raw.kind.map(|kind| match kind {
                    RawValueKind::Pure => "pure",
                    RawValueKind::Object => "object",
                }),
            }),
        ),
    }
}

pub(crate) fn object_arg_to_json(object: &ObjectArg) -> JsonValue {
    match object {
        ObjectArg::ImmOrOwnedObject(oref) => tagged("ImmOrOwnedObject", object_ref_to_json(oref)),
        ObjectArg::SharedObject(shared) => tagged(
            "SharedObject",
            json!({
                "objectId": shared.object_id.to_string(),
                "initialSharedVersion": shared.initial_shared_version.to_string(),
                "mutable": shared.mutable,
            }),
        ),
        ObjectArg::Receiving(oref) => tagged("Receiving", object_ref_to_json(oref)),
    }
}

pub(crate) fn argument_to_json(argument: Argument) -> JsonValue {
    match argument {
        Argument::GasCoin => tagged("GasCoin", json!(true)),
        Argument::Input(input) => tagged("Input", json!(input)),
        Argument::Result(command) => tagged("Result", json!(command)),
        Argument::NestedResult(command, result) => {
            tagged("NestedResult", json!([command, result]))
        }
        Argument::IntentResult(command) => tagged("IntentResult", json!(command)),
        Argument::NestedIntentResult(command, result) => {
            tagged("NestedIntentResult", json!([command, result]))
        }
    }
}

fn arguments_to_json(arguments: &[Argument]) -> Vec<JsonValue> {
    arguments.iter().copied().map(argument_to_json).collect()
}

pub(crate) fn command_to_json(command: &Command) -> JsonValue {
    match command {
        Command::MoveCall(call) => tagged(
            "MoveCall",
            json!({
                "package": call.package.to_string(),
                "module": call.module.as_str(),
                "function": call.function.as_str(),
                "typeArguments": call
                    .type_arguments
                    .iter()
                    .map(|tag| tag.to_string())
                    .collect::<Vec<_>>(),
                "arguments": arguments_to_json(&call.arguments),
            }),
        ),
        Command::TransferObjects(objects, recipient) => tagged(
            "TransferObjects",
            json!({
                "objects": arguments_to_json(objects),
                "recipient": argument_to_json(*recipient),
            }),
        ),
        Command::SplitCoins(coin, amounts) => tagged(
            "SplitCoins",
            json!({
                "coin": argument_to_json(*coin),
                "amounts": arguments_to_json(amounts),
            }),
        ),
        Command::MergeCoins(destination, sources) => tagged(
            "MergeCoins",
            json!({
                "destination": argument_to_json(*destination),
                "sources": arguments_to_json(sources),
            }),
        ),
        Command::MakeMoveVec(type_, elements) => tagged(
            "MakeMoveVec",
            json!({
                "type": type_.as_ref().map(|tag| tag.to_string()),
                "elements": arguments_to_json(elements),
            }),
        ),
        Command::Publish(modules, dependencies) => tagged(
            "Publish",
            json!({
                "modules": modules.iter().map(Base64::encode).collect::<Vec<_>>(),
                "dependencies": dependencies
                    .iter()
                    .map(|id| id.to_string())
                    .collect::<Vec<_>>(),
            }),
        ),
        Command::Upgrade(modules, dependencies, package, ticket) => tagged(
            "Upgrade",
            json!({
                "modules": modules.iter().map(Base64::encode).collect::<Vec<_>>(),
                "dependencies": dependencies
                    .iter()
                    .map(|id| id.to_string())
                    .collect::<Vec<_>>(),
                "packageId": package.to_string(),
                "ticket": argument_to_json(*ticket),
            }),
        ),
        Command::TransactionIntent(intent) => tagged(
            "TransactionIntent",
            json!({
                "name": &intent.name,
                "inputs": intent
                    .inputs
                    .iter()
                    .map(|(key, value)| {
                        let value = match value {
                            IntentValue::Single(argument) => argument_to_json(*argument),
                            IntentValue::List(arguments) => json!(arguments_to_json(arguments)),
                        };
                        (key.clone(), value)
                    })
                    .collect::<Map<_, _>>(),
                "data": &intent.data,
            }),
        ),
    }
}

// ---------------------------------------------------------------------------
// Ingestion
// ---------------------------------------------------------------------------

pub fn from_json(value: &JsonValue) -> StateResult<TransactionState> {
    let top = expect_object(value, "")?;
    match top.get("version").and_then(JsonValue::as_u64) {
        Some(version) if version == TransactionState::VERSION => {}
        _ => return Err(validation("version", "expected schema version 2")),
    }
    let features = match opt_field(top, "features") {
        None => Vec::new(),
        Some(value) => expect_array(value, "features")?
            .iter()
            .enumerate()
            .map(|(i, feature)| {
                expect_str(feature, &format!("features[{i}]")).map(str::to_owned)
            })
            .collect::<StateResult<Vec<_>>>()?,
    };
    let sender = opt_field(top, "sender")
        .map(|value| parse_address(value, "sender"))
        .transpose()?;
    let expiration = opt_field(top, "expiration")
        .map(|value| parse_expiration(value, "expiration"))
        .transpose()?;
    let gas_data = match opt_field(top, "gasData") {
        None => GasData::default(),
        Some(value) => parse_gas_data(value, "gasData")?,
    };
    let inputs = expect_array(
        top.get("inputs").ok_or_else(|| validation("inputs", "missing field"))?,
        "inputs",
    )?
    .iter()
    .enumerate()
    .map(|(i, input)| parse_call_arg(input, &format!("inputs[{i}]")))
    .collect::<StateResult<Vec<_>>>()?;
    let commands = expect_array(
        top.get("commands")
            .ok_or_else(|| validation("commands", "missing field"))?,
        "commands",
    )?
    .iter()
    .enumerate()
    .map(|(i, command)| parse_command(command, &format!("commands[{i}]")))
    .collect::<StateResult<Vec<_>>>()?;

    let state = TransactionState {
        features,
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

fn parse_gas_data(value: &JsonValue, path: &str) -> StateResult<GasData> {
    let object = expect_object(value, path)?;
    Ok(GasData {
        budget: opt_field(object, "budget")
            .map(|value| expect_u64(value, &format!("{path}.budget")))
            .transpose()?,
        price: opt_field(object, "price")
            .map(|value| expect_u64(value, &format!("{path}.price")))
            .transpose()?,
        owner: opt_field(object, "owner")
            .map(|value| parse_address(value, &format!("{path}.owner")))
            .transpose()?,
        payment: opt_field(object, "payment")
            .map(|value| {
                expect_array(value, &format!("{path}.payment"))?
                    .iter()
                    .enumerate()
                    .map(|(i, oref)| parse_object_ref(oref, &format!("{path}.payment[{i}]")))
                    .collect::<StateResult<Vec<_>>>()
            })
            .transpose()?,
    })
}

pub(crate) fn parse_object_ref(value: &JsonValue, path: &str) -> StateResult<ObjectRef> {
    let object = expect_object(value, path)?;
    Ok(ObjectRef {
        object_id: parse_object_id(
            field(object, "objectId", path)?,
            &format!("{path}.objectId"),
        )?,
        version: SequenceNumber::new(expect_u64(
            field(object, "version", path)?,
            &format!("{path}.version"),
        )?),
        digest: parse_digest(field(object, "digest", path)?, &format!("{path}.digest"))?,
    })
}

pub(crate) fn parse_call_arg(value: &JsonValue, path: &str) -> StateResult<CallArg> {
    let (kind, inner) = variant(value, path)?;
    match kind {
        "Pure" => {
            let object = expect_object(inner, path)?;
            let bytes = parse_base64(
                field(object, "bytes", path)?,
                &format!("{path}.Pure.bytes"),
            )?;
            Ok(CallArg::Pure { bytes })
        }
        "Object" => Ok(CallArg::Object(parse_object_arg(
            inner,
            &format!("{path}.Object"),
        )?)),
        "UnresolvedObject" => {
            let object = expect_object(inner, path)?;
            let object_id = parse_object_id(
                field(object, "value", path)?,
                &format!("{path}.UnresolvedObject.value"),
            )?;
            let type_signatures = match opt_field(object, "typeSignatures") {
                None => Vec::new(),
                Some(signatures) => serde_json::from_value::<Vec<OpenMoveTypeSignature>>(
                    signatures.clone(),
                )
                .map_err(|e| {
                    validation(
                        &format!("{path}.UnresolvedObject.typeSignatures"),
                        e.to_string(),
                    )
                })?,
            };
            Ok(CallArg::UnresolvedObject(UnresolvedObject {
                object_id,
                type_signatures,
            }))
        }
        "RawValue" => {
            let object = expect_object(inner, path)?;
            let raw_value = field(object, "value", path)?.clone();
            let kind = match opt_field(object, "type") {
                None => None,
                Some(kind) => Some(match expect_str(kind, &format!("{path}.RawValue.type"))? {
                    "pure" => RawValueKind::Pure,
                    "object" => RawValueKind::Object,
                    other => {
                        return Err(validation(
                            &format!("{path}.RawValue.type"),
                            format!("unknown raw value type `{other}`"),
                        ))
                    }
                }),
            };
            Ok(CallArg::RawValue(RawValue {
                value: raw_value,
                kind,
            }))
        }
        other => Err(validation(path, format!("unknown input kind `{other}`"))),
    }
}

fn parse_object_arg(value: &JsonValue, path: &str) -> StateResult<ObjectArg> {
    let (kind, inner) = variant(value, path)?;
    match kind {
        "ImmOrOwnedObject" => Ok(ObjectArg::ImmOrOwnedObject(parse_object_ref(
            inner,
            &format!("{path}.ImmOrOwnedObject"),
        )?)),
        "SharedObject" => {
            let path = format!("{path}.SharedObject");
            let object = expect_object(inner, &path)?;
            Ok(ObjectArg::SharedObject(SharedObjectRef {
                object_id: parse_object_id(
                    field(object, "objectId", &path)?,
                    &format!("{path}.objectId"),
                )?,
                initial_shared_version: SequenceNumber::new(expect_u64(
                    field(object, "initialSharedVersion", &path)?,
                    &format!("{path}.initialSharedVersion"),
                )?),
                mutable: expect_bool(
                    field(object, "mutable", &path)?,
                    &format!("{path}.mutable"),
                )?,
            }))
        }
        "Receiving" => Ok(ObjectArg::Receiving(parse_object_ref(
            inner,
            &format!("{path}.Receiving"),
        )?)),
        other => Err(validation(path, format!("unknown object kind `{other}`"))),
    }
}

pub(crate) fn parse_argument(value: &JsonValue, path: &str) -> StateResult<Argument> {
    let (kind, inner) = variant(value, path)?;
    match kind {
        "GasCoin" => Ok(Argument::GasCoin),
        "Input" => Ok(Argument::Input(expect_u16(inner, &format!("{path}.Input"))?)),
        "Result" => Ok(Argument::Result(expect_u16(
            inner,
            &format!("{path}.Result"),
        )?)),
        "NestedResult" => {
            let (command, result) = expect_index_pair(inner, &format!("{path}.NestedResult"))?;
            Ok(Argument::NestedResult(command, result))
        }
        "IntentResult" => Ok(Argument::IntentResult(expect_u16(
            inner,
            &format!("{path}.IntentResult"),
        )?)),
        "NestedIntentResult" => {
            let (command, result) =
                expect_index_pair(inner, &format!("{path}.NestedIntentResult"))?;
            Ok(Argument::NestedIntentResult(command, result))
        }
        other => Err(validation(path, format!("unknown argument kind `{other}`"))),
    }
}

fn parse_arguments(value: &JsonValue, path: &str) -> StateResult<Vec<Argument>> {
    expect_array(value, path)?
        .iter()
        .enumerate()
        .map(|(i, argument)| parse_argument(argument, &format!("{path}[{i}]")))
        .collect()
}

fn parse_command(value: &JsonValue, path: &str) -> StateResult<Command> {
    let (kind, inner) = variant(value, path)?;
    let inner_path = format!("{path}.{kind}");
    let object = expect_object(inner, &inner_path)?;
    match kind {
        "MoveCall" => Ok(Command::MoveCall(Box::new(ProgrammableMoveCall {
            package: parse_object_id(
                field(object, "package", &inner_path)?,
                &format!("{inner_path}.package"),
            )?,
            module: parse_identifier(
                field(object, "module", &inner_path)?,
                &format!("{inner_path}.module"),
            )?,
            function: parse_identifier(
                field(object, "function", &inner_path)?,
                &format!("{inner_path}.function"),
            )?,
            type_arguments: match opt_field(object, "typeArguments") {
                None => Vec::new(),
                Some(tags) => parse_type_tags(tags, &format!("{inner_path}.typeArguments"))?,
            },
            arguments: parse_arguments(
                field(object, "arguments", &inner_path)?,
                &format!("{inner_path}.arguments"),
            )?,
        }))),
        "TransferObjects" => Ok(Command::TransferObjects(
            parse_arguments(
                field(object, "objects", &inner_path)?,
                &format!("{inner_path}.objects"),
            )?,
            parse_argument(
                field(object, "recipient", &inner_path)?,
                &format!("{inner_path}.recipient"),
            )?,
        )),
        "SplitCoins" => Ok(Command::SplitCoins(
            parse_argument(
                field(object, "coin", &inner_path)?,
                &format!("{inner_path}.coin"),
            )?,
            parse_arguments(
                field(object, "amounts", &inner_path)?,
                &format!("{inner_path}.amounts"),
            )?,
        )),
        "MergeCoins" => Ok(Command::MergeCoins(
            parse_argument(
                field(object, "destination", &inner_path)?,
                &format!("{inner_path}.destination"),
            )?,
            parse_arguments(
                field(object, "sources", &inner_path)?,
                &format!("{inner_path}.sources"),
            )?,
        )),
        "MakeMoveVec" => Ok(Command::MakeMoveVec(
            opt_field(object, "type")
                .map(|tag| parse_type_tag(tag, &format!("{inner_path}.type")))
                .transpose()?,
            parse_arguments(
                field(object, "elements", &inner_path)?,
                &format!("{inner_path}.elements"),
            )?,
        )),
        "Publish" => Ok(Command::Publish(
            parse_modules(
                field(object, "modules", &inner_path)?,
                &format!("{inner_path}.modules"),
            )?,
            parse_object_ids(
                field(object, "dependencies", &inner_path)?,
                &format!("{inner_path}.dependencies"),
            )?,
        )),
        "Upgrade" => Ok(Command::Upgrade(
            parse_modules(
                field(object, "modules", &inner_path)?,
                &format!("{inner_path}.modules"),
            )?,
            parse_object_ids(
                field(object, "dependencies", &inner_path)?,
                &format!("{inner_path}.dependencies"),
            )?,
            parse_object_id(
                field(object, "packageId", &inner_path)?,
                &format!("{inner_path}.packageId"),
            )?,
            parse_argument(
                field(object, "ticket", &inner_path)?,
                &format!("{inner_path}.ticket"),
            )?,
        )),
        "TransactionIntent" => {
            let inputs_path = format!("{inner_path}.inputs");
            let mut inputs = BTreeMap::new();
            for (key, value) in expect_object(field(object, "inputs", &inner_path)?, &inputs_path)?
            {
                let value_path = format!("{inputs_path}.{key}");
                let value = if value.is_array() {
                    IntentValue::List(parse_arguments(value, &value_path)?)
                } else {
                    IntentValue::Single(parse_argument(value, &value_path)?)
                };
                inputs.insert(key.clone(), value);
            }
            Ok(Command::TransactionIntent(TransactionIntent {
                name: expect_str(
                    field(object, "name", &inner_path)?,
                    &format!("{inner_path}.name"),
                )?
                .to_owned(),
                inputs,
                data: object.get("data").cloned().unwrap_or(JsonValue::Null),
            }))
        }
        other => Err(TransactionStateError::UnexpectedCommandKind(
            other.to_owned(),
        )),
    }
}

fn parse_modules(value: &JsonValue, path: &str) -> StateResult<Vec<Vec<u8>>> {
    expect_array(value, path)?
        .iter()
        .enumerate()
        .map(|(i, module)| parse_base64(module, &format!("{path}[{i}]")))
        .collect()
}

fn parse_object_ids(value: &JsonValue, path: &str) -> StateResult<Vec<ObjectID>> {
    expect_array(value, path)?
        .iter()
        .enumerate()
        .map(|(i, id)| parse_object_id(id, &format!("{path}[{i}]")))
        .collect()
}

fn parse_type_tags(value: &JsonValue, path: &str) -> StateResult<Vec<TypeTag>> {
    expect_array(value, path)?
        .iter()
        .enumerate()
        .map(|(i, tag)| parse_type_tag(tag, &format!("{path}[{i}]")))
        .collect()
}

pub(crate) fn parse_type_tag(value: &JsonValue, path: &str) -> StateResult<TypeTag> {
    let s = expect_str(value, path)?;
    TypeTag::from_str(s).map_err(|e| validation(path, format!("invalid type tag `{s}`: {e}")))
}

fn parse_identifier(value: &JsonValue, path: &str) -> StateResult<Identifier> {
    let s = expect_str(value, path)?;
    Identifier::new(s).map_err(|e| validation(path, format!("invalid identifier `{s}`: {e}")))
}

// ---------------------------------------------------------------------------
// Structural helpers
// ---------------------------------------------------------------------------

/// Splits a tag-keyed variant object into its tag and payload. The `$kind`
/// mirror is honored when present and skipped when resolving the payload key.
pub(crate) fn variant<'a>(
    value: &'a JsonValue,
    path: &str,
) -> StateResult<(&'a str, &'a JsonValue)> {
    let object = expect_object(value, path)?;
    if let Some(kind) = object.get("$kind") {
        let kind = expect_str(kind, &format!("{path}.$kind"))?;
        let inner = object
            .get(kind)
            .ok_or_else(|| validation(path, format!("missing `{kind}` payload")))?;
        return Ok((kind, inner));
    }
    let mut entries = object.iter().filter(|(key, _)| *key != "$kind");
    match (entries.next(), entries.next()) {
        (Some((kind, inner)), None) => Ok((kind.as_str(), inner)),
        _ => Err(validation(path, "expected a single-variant object")),
    }
}

pub(crate) fn expect_object<'a>(
    value: &'a JsonValue,
    path: &str,
) -> StateResult<&'a Map<String, JsonValue>> {
    value
        .as_object()
        .ok_or_else(|| validation(path, "expected an object"))
}

pub(crate) fn expect_array<'a>(value: &'a JsonValue, path: &str) -> StateResult<&'a [JsonValue]> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| validation(path, "expected an array"))
}

pub(crate) fn expect_str<'a>(value: &'a JsonValue, path: &str) -> StateResult<&'a str> {
    value
        .as_str()
        .ok_or_else(|| validation(path, "expected a string"))
}

pub(crate) fn expect_bool(value: &JsonValue, path: &str) -> StateResult<bool> {
    value
        .as_bool()
        .ok_or_else(|| validation(path, "expected a boolean"))
}

/// u64 fields are decimal strings in the JSON form; plain numbers are also
/// accepted on ingestion.
pub(crate) fn expect_u64(value: &JsonValue, path: &str) -> StateResult<u64> {
    match value {
        JsonValue::Number(n) => n
            .as_u64()
            .ok_or_else(|| validation(path, "expected an unsigned integer")),
        JsonValue::String(s) => s
            .parse()
            .map_err(|_| validation(path, format!("invalid unsigned integer `{s}`"))),
        _ => Err(validation(path, "expected an unsigned integer")),
    }
}

pub(crate) fn expect_u16(value: &JsonValue, path: &str) -> StateResult<u16> {
    let index = expect_u64(value, path)?;
    u16::try_from(index).map_err(|_| validation(path, "index out of range"))
}

fn expect_index_pair(value: &JsonValue, path: &str) -> StateResult<(u16, u16)> {
    let pair = expect_array(value, path)?;
    if pair.len() != 2 {
        return Err(validation(path, "expected a [command, result] pair"));
    }
    Ok((
        expect_u16(&pair[0], &format!("{path}[0]"))?,
        expect_u16(&pair[1], &format!("{path}[1]"))?,
    ))
}

pub(crate) fn parse_address(value: &JsonValue, path: &str) -> StateResult<SuiAddress> {
    let s = expect_str(value, path)?;
    SuiAddress::from_str(s).map_err(|e| validation(path, e.to_string()))
}

pub(crate) fn parse_object_id(value: &JsonValue, path: &str) -> StateResult<ObjectID> {
    let s = expect_str(value, path)?;
    ObjectID::from_str(s).map_err(|e| validation(path, e.to_string()))
}

pub(crate) fn parse_digest(value: &JsonValue, path: &str) -> StateResult<ObjectDigest> {
    let s = expect_str(value, path)?;
    ObjectDigest::from_str(s).map_err(|e| validation(path, e.to_string()))
}

pub(crate) fn parse_base64(value: &JsonValue, path: &str) -> StateResult<Vec<u8>> {
    let s = expect_str(value, path)?;
    Base64::decode(s).map_err(|e| validation(path, format!("invalid base64: {e}")))
}

pub(crate) fn field<'a>(
    object: &'a Map<String, JsonValue>,
    name: &str,
    path: &str,
) -> StateResult<&'a JsonValue> {
    object
        .get(name)
        .ok_or_else(|| validation(path, format!("missing field `{name}`")))
}

/// A field that may be absent or null.
pub(crate) fn opt_field<'a>(
    object: &'a Map<String, JsonValue>,
    name: &str,
) -> Option<&'a JsonValue> {
    object.get(name).filter(|value| !value.is_null())
}
