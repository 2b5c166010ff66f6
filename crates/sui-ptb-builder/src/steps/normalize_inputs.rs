// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Input normalization: fixed command slots get their raw values
//! force-encoded (split amounts as u64, transfer recipients as addresses),
//! and move-call slots are typed against the normalized on-chain signature of
//! the called function.

use std::collections::BTreeMap;
use std::str::FromStr;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::debug;

use sui_ptb_types::base_types::ObjectID;
use sui_ptb_types::error::TransactionStateError;
use sui_ptb_types::transaction::{
    Argument, CallArg, Command, ObjectArg, TransactionState, UnresolvedObject,
};
use sui_ptb_types::type_signature::{OpenMoveTypeSignature, PureBcsSchema};

use crate::client::NormalizedFunction;
use crate::error::{TransactionBuilderError, TransactionBuilderResult};
use crate::pipeline::{StepContext, TerminalHandler};

pub struct NormalizeInputs;

type Target = (ObjectID, String, String);

struct PendingCall {
    target: Target,
    arguments: Vec<Argument>,
}

#[async_trait]
impl TerminalHandler for NormalizeInputs {
    async fn run(&self, ctx: &mut StepContext<'_>) -> TransactionBuilderResult {
        normalize_fixed_slots(ctx)?;

        let pending = pending_move_calls(ctx.state());
        if pending.is_empty() {
            return Ok(());
        }
        debug!(calls = pending.len(), "typing move call inputs");

        let client = ctx.client()?;
        let mut targets: Vec<&Target> = Vec::new();
        for call in &pending {
            if !targets.contains(&&call.target) {
                targets.push(&call.target);
            }
        }
        let fetches = targets.iter().map(|(package, module, function)| {
            client.get_normalized_move_function(*package, module, function)
        });
        let mut functions: BTreeMap<Target, NormalizedFunction> = BTreeMap::new();
        for (target, function) in targets.iter().zip(join_all(fetches).await) {
            functions.insert((*target).clone(), function?);
        }

        for call in &pending {
            if let Some(function) = functions.get(&call.target) {
                apply_signature(ctx.state_mut(), call, function)?;
            }
        }
        Ok(())
    }
}

/// Resolves an input-bearing slot against a fixed schema: a raw value is
/// replaced with its serialized pure form, anything else is left alone.
fn normalize_raw_argument(
    state: &mut TransactionState,
    index: u16,
    schema: &PureBcsSchema,
) -> TransactionBuilderResult {
    let Some(input) = state.inputs.get_mut(usize::from(index)) else {
        return Ok(());
    };
    let CallArg::RawValue(raw) = input else {
        return Ok(());
    };
    let bytes = schema.serialize(&raw.value).map_err(|e| {
        TransactionStateError::validation(format!("inputs[{index}]"), e.to_string())
    })?;
    *input = CallArg::Pure { bytes };
    Ok(())
}

fn normalize_fixed_slots(ctx: &mut StepContext<'_>) -> TransactionBuilderResult {
    let mut slots: Vec<(u16, PureBcsSchema)> = Vec::new();
    for command in &ctx.state().commands {
        match command {
            Command::SplitCoins(_, amounts) => {
                for argument in amounts {
                    if let Argument::Input(index) = argument {
                        slots.push((*index, PureBcsSchema::U64));
                    }
                }
            }
            Command::TransferObjects(_, recipient) => {
                if let Argument::Input(index) = recipient {
                    slots.push((*index, PureBcsSchema::Address));
                }
            }
            _ => {}
        }
    }
    for (index, schema) in slots {
        normalize_raw_argument(ctx.state_mut(), index, &schema)?;
    }
    Ok(())
}

/// Move calls whose argument slots still point at raw or unresolved inputs.
fn pending_move_calls(state: &TransactionState) -> Vec<PendingCall> {
    state
        .commands
        .iter()
        .filter_map(|command| {
            let Command::MoveCall(call) = command else {
                return None;
            };
            let needs_signature = call.arguments.iter().any(|argument| {
                let Argument::Input(index) = argument else {
                    return false;
                };
                match state.inputs.get(usize::from(*index)) {
                    Some(CallArg::RawValue(_) | CallArg::UnresolvedObject(_)) => true,
                    // A shared input held immutably so far may still be
                    // upgraded by a by-value or `&mut` parameter.
                    Some(CallArg::Object(ObjectArg::SharedObject(shared))) => !shared.mutable,
                    _ => false,
                }
            });
            needs_signature.then(|| PendingCall {
                target: (
                    call.package,
                    call.module.to_string(),
                    call.function.to_string(),
                ),
                arguments: call.arguments.clone(),
            })
        })
        .collect()
}

fn apply_signature(
    state: &mut TransactionState,
    call: &PendingCall,
    function: &NormalizedFunction,
) -> TransactionBuilderResult {
    let mut parameters = function.parameters.clone();
    // An implicit trailing TxContext is never supplied by the caller.
    if parameters
        .last()
        .is_some_and(OpenMoveTypeSignature::is_tx_context)
    {
        parameters.pop();
    }
    if parameters.len() != call.arguments.len() {
        let (package, module, function) = call.target.clone();
        return Err(TransactionBuilderError::ArityMismatch {
            package,
            module,
            function,
            expected: parameters.len(),
            actual: call.arguments.len(),
        });
    }

    for (parameter, argument) in parameters.iter().zip(&call.arguments) {
        let Argument::Input(index) = argument else {
            continue;
        };
        let Some(input) = state.inputs.get_mut(usize::from(*index)) else {
            continue;
        };
        match input {
            CallArg::RawValue(raw) => {
                if let Some(schema) = parameter.body.pure_schema() {
                    let bytes = schema.serialize(&raw.value).map_err(|e| {
                        TransactionStateError::validation(
                            format!("inputs[{index}]"),
                            e.to_string(),
                        )
                    })?;
                    *input = CallArg::Pure { bytes };
                } else {
                    // An object-typed parameter: the raw value must name an
                    // object by id.
                    let Some(id) = raw.value.as_str() else {
                        return Err(TransactionBuilderError::ExpectedObjectIdString {
                            index: *index,
                        });
                    };
                    let object_id = ObjectID::from_str(id).map_err(|_| {
                        TransactionBuilderError::ExpectedObjectIdString { index: *index }
                    })?;
                    *input = CallArg::UnresolvedObject(UnresolvedObject {
                        object_id,
                        type_signatures: vec![parameter.clone()],
                    });
                }
            }
            CallArg::UnresolvedObject(unresolved) => {
                if parameter.body.pure_schema().is_none() {
                    unresolved.type_signatures.push(parameter.clone());
                }
            }
            CallArg::Object(ObjectArg::SharedObject(shared)) => {
                if parameter.body.pure_schema().is_none()
                    && (parameter.is_by_value() || parameter.is_mutable_reference())
                {
                    shared.mutable = true;
                }
            }
            CallArg::Pure { .. } | CallArg::Object(_) => {}
        }
    }
    Ok(())
}
